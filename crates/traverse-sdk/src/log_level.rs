/// Severity taxonomy for events emitted during a run.
///
/// Ordered roughly by how surprising the event is, mirroring the original
/// `LogLevel` enum used by the traversal engine's event sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Procedure,
    Info,
    Skip,
    Success,
    Error,
    Fail,
    Catastrophic,
}

impl LogLevel {
    /// Lowercase name, matching the wire/text representation used by emitters.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Procedure => "procedure",
            LogLevel::Info => "info",
            LogLevel::Skip => "skip",
            LogLevel::Success => "success",
            LogLevel::Error => "error",
            LogLevel::Fail => "fail",
            LogLevel::Catastrophic => "catastrophic",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
