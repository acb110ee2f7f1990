//! Agent domain module
//!
//! The run contract shared by every agent runner, in-process or isolated:
//! phases, the final [`AgentRunResult`], parsing of the model's result
//! block, profiles, and configuration issues.

pub mod outcome_parser;
pub mod profile;
pub mod run;
pub mod validation;

pub use outcome_parser::parse_run_outcome;
pub use profile::Profile;
pub use run::{
    AgentRunResult, CommentType, MAX_RUN_DURATION, RunComment, RunOutcome, RunPhase, RunStatus,
    TokenUsage,
};
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
