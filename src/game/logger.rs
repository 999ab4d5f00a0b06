//! Match logger
//!
//! Messages go to stdout, to an in-memory buffer, or both. Captured entries
//! are owned strings and are read back through a borrow guard.

use crate::game::VerbosityLevel;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g. "strategy_choice", "sale")
    pub category: Option<String>,
}

/// Read-only access to captured log entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Centralized logger for one match
pub struct MatchLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    /// Prefix logged lines with the current state hash
    debug_state_hash: bool,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl MatchLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        MatchLogger::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        MatchLogger {
            verbosity,
            output_mode: OutputMode::default(),
            debug_state_hash: false,
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture into memory only
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn disable_capture(&mut self) {
        self.output_mode = OutputMode::Stdout;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    fn is_printing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both)
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn set_debug_state_hash(&mut self, enabled: bool) {
        self.debug_state_hash = enabled;
    }

    pub fn debug_state_hash_enabled(&self) -> bool {
        self.debug_state_hash
    }

    /// Whether a message at `level` would end up anywhere
    pub fn wants(&self, level: VerbosityLevel) -> bool {
        level != VerbosityLevel::Silent && (level <= self.verbosity || self.is_capturing())
    }

    /// Print buffered entries allowed by the current verbosity, then clear
    pub fn flush_buffer(&mut self) {
        self.flush_tail(usize::MAX);
    }

    /// Print only the last `tail_lines` buffered entries, then clear
    pub fn flush_tail(&mut self, tail_lines: usize) {
        {
            let buffer = self.log_buffer.borrow();
            let skipped = buffer.len().saturating_sub(tail_lines);
            if skipped > 0 {
                println!(
                    ">>> {} LOG LINES ELIDED. PRINTING LAST {} LINES <<<",
                    skipped, tail_lines
                );
            }
            for entry in buffer.iter().skip(skipped) {
                if entry.level <= self.verbosity {
                    print_line(entry.level, &entry.message);
                }
            }
        }
        self.clear_logs();
    }

    /// Captured entries, borrowed
    ///
    /// ```ignore
    /// let sales = logger.logs().iter()
    ///     .filter(|log| log.category.as_deref() == Some("sale"))
    ///     .count();
    /// ```
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    fn log(&self, level: VerbosityLevel, message: &str, category: Option<&str>) {
        if !self.wants(level) {
            return;
        }
        if self.is_capturing() {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
                category: category.map(str::to_string),
            });
        }
        if self.is_printing() && level <= self.verbosity {
            print_line(level, message);
        }
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, message, None);
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, message, None);
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, message, None);
    }

    /// Log at Normal level under a category
    #[inline]
    pub fn event(&self, category: &str, message: &str) {
        self.log(VerbosityLevel::Normal, message, Some(category));
    }

    /// Log a strategy decision at Verbose level
    ///
    /// The strategy name only goes to stderr under state-hash debugging so
    /// the deterministic log reads the same whichever strategy decided.
    #[inline]
    pub fn strategy_choice(&self, strategy_name: &str, message: &str) {
        if self.debug_state_hash {
            eprintln!("  >>> {}: {}", strategy_name, message);
        }
        self.log(VerbosityLevel::Verbose, message, Some("strategy_choice"));
    }
}

#[inline]
fn print_line(level: VerbosityLevel, message: &str) {
    if level == VerbosityLevel::Minimal {
        println!("{}", message);
    } else {
        println!("  {}", message);
    }
}

impl Default for MatchLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MatchLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

/// Clones the settings, not the captured entries
impl Clone for MatchLogger {
    fn clone(&self) -> Self {
        MatchLogger {
            verbosity: self.verbosity,
            output_mode: self.output_mode,
            debug_state_hash: self.debug_state_hash,
            log_buffer: RefCell::new(Vec::new()),
        }
    }
}

impl Serialize for MatchLogger {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("MatchLogger", 2)?;
        state.serialize_field("verbosity", &self.verbosity)?;
        state.serialize_field("output_mode", &self.output_mode)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for MatchLogger {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct MatchLoggerData {
            verbosity: VerbosityLevel,
            #[serde(default)]
            output_mode: OutputMode,
        }

        let data = MatchLoggerData::deserialize(deserializer)?;
        let mut logger = MatchLogger::with_verbosity(data.verbosity);
        logger.output_mode = data.output_mode;
        Ok(logger)
    }
}
