use crate::error::{CompileError, Result};
use serde::{Deserialize, Serialize};

/// How field paths and argument names are matched against schema members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberLookup {
    Exact,
    #[default]
    IgnoreAsciiCase,
}

impl MemberLookup {
    pub fn matches(&self, candidate: &str, requested: &str) -> bool {
        match self {
            MemberLookup::Exact => candidate == requested,
            MemberLookup::IgnoreAsciiCase => candidate.eq_ignore_ascii_case(requested),
        }
    }
}

/// What to do with a filter clause that has no field or not exactly one comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguousClausePolicy {
    #[default]
    Drop,
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileSettings {
    pub member_lookup: MemberLookup,
    pub ambiguous_clauses: AmbiguousClausePolicy,
}

impl CompileSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(CompileError::InvalidSettings)
    }
}
