//! Configuration validation issues.
//!
//! Config loaders collect these instead of failing on the first problem, so
//! a user sees everything wrong with their file at once. Any issue with
//! [`Severity::Error`] aborts startup.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// Lifecycle override names a state that does not exist.
    UnknownState,
    /// Lifecycle override contains a self-loop.
    InvalidTransitionTable,
    /// Profile allows a tool that is not registered.
    UnknownTool,
    /// Gateway model name is empty.
    EmptyModel,
    /// A duration or turn limit is zero.
    ZeroLimit,
    /// A duration limit exceeds what a run can honour.
    LimitTooLarge,
    /// Command timeout default exceeds its own cap.
    TimeoutAboveCap,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_severity() {
        let issue = ConfigIssue::warning(ConfigIssueCode::ZeroLimit, "max_tool_turns is 0");
        assert_eq!(issue.to_string(), "warning: max_tool_turns is 0");
        assert!(!issue.is_error());
        assert!(ConfigIssue::error(ConfigIssueCode::EmptyModel, "x").is_error());
    }
}
