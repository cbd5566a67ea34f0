// Task outcome taxonomy. A node's status only ever moves towards a worse
// outcome once set, never back towards SUCCESS - callers overwrite with a
// worse status rather than merge or average.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Skip,
    Success,
    Fail,
    Error,
    Catastrophic,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Skip => "SKIP",
            Status::Success => "SUCCESS",
            Status::Fail => "FAIL",
            Status::Error => "ERROR",
            Status::Catastrophic => "CATASTROPHIC",
        };
        write!(f, "{s}")
    }
}

impl Status {
    /// Whether this status counts as a terminal-successful outcome for the
    /// purposes of overall run scoring: SKIP and SUCCESS only.
    pub fn is_terminal_success(self) -> bool {
        matches!(self, Status::Skip | Status::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_skip_and_success_count_as_terminal_success() {
        assert!(Status::Skip.is_terminal_success());
        assert!(Status::Success.is_terminal_success());
        assert!(!Status::Fail.is_terminal_success());
        assert!(!Status::Error.is_terminal_success());
        assert!(!Status::Catastrophic.is_terminal_success());
    }

    #[test]
    fn display_matches_taxonomy_names() {
        assert_eq!(Status::Catastrophic.to_string(), "CATASTROPHIC");
    }
}
