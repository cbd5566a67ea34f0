// Shared formatting logic for line-oriented emitters: indentation by
// subcontext depth, plus ANSI coloring per log level. Concrete emitters
// (e.g. `TerminalEmitter`) supply only `emit(&self, line: &str)`.

use colored::{Color, Colorize};
use std::sync::atomic::{AtomicUsize, Ordering};
use traverse_sdk::LogLevel;

const CONTEXT_LEVEL_SPACES: usize = 4;

fn colorize(level: LogLevel, text: &str) -> String {
    match level {
        LogLevel::Debug => text.white().dimmed().to_string(),
        LogLevel::Procedure => text.color(Color::Blue).to_string(),
        LogLevel::Info => text.white().to_string(),
        LogLevel::Skip => text.magenta().bold().to_string(),
        LogLevel::Success => text.green().to_string(),
        LogLevel::Error => text.red().bold().to_string(),
        LogLevel::Fail => text.red().to_string(),
        LogLevel::Catastrophic => text.cyan().bold().to_string(),
    }
}

/// Tracks subcontext nesting depth and renders log lines with indentation
/// and (optionally) color. Shared by every line-oriented emitter.
pub struct SimpleLogState {
    context_level: AtomicUsize,
    use_color: bool,
}

impl SimpleLogState {
    pub fn new(use_color: bool) -> Self {
        Self {
            context_level: AtomicUsize::new(0),
            use_color,
        }
    }

    pub fn subcontext(&self) {
        self.context_level.fetch_add(1, Ordering::SeqCst);
    }

    pub fn pop_subcontext(&self, level: usize) {
        self.context_level.store(level, Ordering::SeqCst);
    }

    pub fn level(&self) -> usize {
        self.context_level.load(Ordering::SeqCst)
    }

    /// Render `text` (possibly multi-line) into indented, colorized lines
    /// ready to hand to `emit`, one call per physical line.
    pub fn render_lines(&self, level: LogLevel, text: &str) -> Vec<String> {
        let spaces = " ".repeat(self.level() * CONTEXT_LEVEL_SPACES);
        text.lines()
            .map(|line| {
                let line = line.trim_end();
                let body = if self.use_color {
                    colorize(level, line)
                } else {
                    line.to_string()
                };
                format!("{spaces}{body}")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_by_subcontext_depth() {
        let state = SimpleLogState::new(false);
        state.subcontext();
        state.subcontext();
        let lines = state.render_lines(LogLevel::Info, "hello");
        assert_eq!(lines, vec!["        hello".to_string()]);
    }

    #[test]
    fn pop_subcontext_restores_level() {
        let state = SimpleLogState::new(false);
        state.subcontext();
        state.subcontext();
        state.pop_subcontext(1);
        assert_eq!(state.level(), 1);
    }

    #[test]
    fn renders_each_physical_line() {
        let state = SimpleLogState::new(false);
        let lines = state.render_lines(LogLevel::Info, "a\nb\n");
        assert_eq!(lines, vec!["a".to_string(), "b".to_string()]);
    }
}
