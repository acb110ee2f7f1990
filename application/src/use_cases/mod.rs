//! Use cases (application services)
//!
//! - [`run_agent`]: the in-process agent runner
//! - [`transition_ticket`]: the guarded ticket state machine
//! - [`apply_run_result`]: commit a finished run's comments and state change

pub mod apply_run_result;
pub mod run_agent;
pub(crate) mod shared;
pub(crate) mod tool_helpers;
pub mod transition_ticket;
