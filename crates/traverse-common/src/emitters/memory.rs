// An emitter that records every call into memory instead of rendering
// anywhere. Used by engine tests to assert on the exact event sequence
// (scenario coverage in the engine's test suite) without parsing terminal
// output.

use parking_lot::Mutex;
use std::fs::File;
use std::io;
use traverse_sdk::{Emitter, LogLevel, TaskHandle};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartTask(String),
    EndTask(String),
    Subcontext,
    PopSubcontext(usize),
    Log(LogLevel, String),
    Finalize,
}

#[derive(Default)]
pub struct MemoryEmitter {
    events: Mutex<Vec<Event>>,
}

impl MemoryEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }
}

impl Emitter for MemoryEmitter {
    fn start_task(&self, task: &dyn TaskHandle) {
        self.events
            .lock()
            .push(Event::StartTask(task.display()));
    }

    fn end_task(&self, task: &dyn TaskHandle) {
        self.events.lock().push(Event::EndTask(task.display()));
    }

    fn subcontext(&self) {
        self.events.lock().push(Event::Subcontext);
    }

    fn pop_subcontext(&self, level: usize) {
        self.events.lock().push(Event::PopSubcontext(level));
    }

    fn log_message(&self, level: LogLevel, text: &str) {
        self.events.lock().push(Event::Log(level, text.to_string()));
    }

    fn log_file(&self, _description: &str, _extension: &str) -> io::Result<File> {
        std::fs::OpenOptions::new()
            .write(true)
            .open(if cfg!(windows) { "NUL" } else { "/dev/null" })
    }

    fn finalize(&self) {
        self.events.lock().push(Event::Finalize);
    }
}
