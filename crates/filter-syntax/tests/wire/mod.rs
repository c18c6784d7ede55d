//! Wire decoding tests
//!
//! These tests verify that filter, sort and page arguments decode from
//! their JSON wire form into compiler inputs.

mod clauses;
mod shaping;
