pub mod compile;
pub mod compiler;
pub mod error;
pub mod mutation;
pub mod resolve;
pub mod settings;

pub use compiler::QueryCompiler;
pub use error::{CompileError, Result};
