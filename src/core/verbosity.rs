//! Verbosity levels and the level-gated logger.
//!
//! The threshold lives in a shared cell owned by [`Logger`]. Every clone of a
//! logger sees the same threshold, so the catalog, its commands and any hook
//! handler holding a clone observe a level change immediately.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Ordered log verbosity.
///
/// Levels are ordered from least to most verbose:
/// `Quiet < Error < Warn < Info < Debug < Crazy`
///
/// A message is emitted when its level is at or below the current threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Verbosity {
    /// Report nothing.
    Quiet = 0,
    /// Report errors only.
    #[default]
    Error = 1,
    /// Errors and warnings.
    Warn = 2,
    /// General information.
    Info = 3,
    /// Debug diagnostics.
    Debug = 4,
    /// Everything, including tracing chatter.
    Crazy = 5,
}

impl Verbosity {
    /// All levels in ascending order.
    pub const ALL: [Verbosity; 6] = [
        Verbosity::Quiet,
        Verbosity::Error,
        Verbosity::Warn,
        Verbosity::Info,
        Verbosity::Debug,
        Verbosity::Crazy,
    ];

    /// Get the lowercase name for this level.
    pub fn name(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Error => "error",
            Verbosity::Warn => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
            Verbosity::Crazy => "crazy",
        }
    }

    /// Convert from the numeric representation.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a string names no verbosity level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVerbosityError(pub String);

impl fmt::Display for ParseVerbosityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown verbosity level '{}'", self.0)
    }
}

impl std::error::Error for ParseVerbosityError {}

impl FromStr for Verbosity {
    type Err = ParseVerbosityError;

    /// Accepts level names (case-insensitive) or the numerals `0`..`5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<u8>() {
            return Self::from_u8(n).ok_or_else(|| ParseVerbosityError(s.to_string()));
        }

        let lower = trimmed.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.name() == lower)
            .ok_or_else(|| ParseVerbosityError(s.to_string()))
    }
}

/// Destination for messages that pass the verbosity gate.
pub trait LogSink: Send + Sync {
    /// Write one already formatted message.
    fn emit(&self, level: Verbosity, message: &str);
}

/// Level-gated logger handle.
///
/// Cheap to clone; clones share the threshold and the sink.
///
/// # Examples
///
/// ```ignore
/// let logger = Logger::new();
/// logger.set_verbose(Verbosity::Warn);
///
/// logger.logf(Verbosity::Debug, format_args!("suppressed"));
/// logger.logf(Verbosity::Error, format_args!("emitted"));
/// ```
#[derive(Clone)]
pub struct Logger {
    threshold: Arc<AtomicU8>,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    /// Create a logger at the default threshold that forwards to `tracing`.
    pub fn new() -> Self {
        Self::with_sink(crate::logging::TracingSink)
    }

    /// Create a logger with a custom sink.
    pub fn with_sink(sink: impl LogSink + 'static) -> Self {
        Self {
            threshold: Arc::new(AtomicU8::new(Verbosity::default() as u8)),
            sink: Arc::new(sink),
        }
    }

    /// Current threshold.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_u8(self.threshold.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Set an arbitrary threshold.
    pub fn set_verbose(&self, level: Verbosity) {
        self.threshold.store(level as u8, Ordering::Relaxed);
    }

    /// Raise the threshold to the most verbose level.
    pub fn set_debug_mode(&self) {
        self.set_verbose(Verbosity::Crazy);
    }

    /// Drop the threshold to [`Verbosity::Quiet`].
    pub fn set_quiet_mode(&self) {
        self.set_verbose(Verbosity::Quiet);
    }

    /// Whether a message at `level` would currently be emitted.
    #[inline]
    pub fn enabled(&self, level: Verbosity) -> bool {
        level <= self.verbosity()
    }

    /// Format and emit `args` if `level` passes the current threshold.
    ///
    /// Formatting is skipped entirely for suppressed messages.
    pub fn logf(&self, level: Verbosity, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        self.sink.emit(level, &args.to_string());
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("verbosity", &self.verbosity())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::{LogSink, Verbosity};

    /// Sink that keeps every emitted message in memory.
    #[derive(Clone, Default)]
    pub struct MemorySink(pub Arc<Mutex<Vec<(Verbosity, String)>>>);

    impl MemorySink {
        pub fn messages(&self) -> Vec<(Verbosity, String)> {
            self.0.lock().unwrap().clone()
        }
    }

    impl LogSink for MemorySink {
        fn emit(&self, level: Verbosity, message: &str) {
            self.0.lock().unwrap().push((level, message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MemorySink;
    use super::*;

    #[test]
    fn test_verbosity_ordering() {
        assert!(Verbosity::Quiet < Verbosity::Error);
        assert!(Verbosity::Error < Verbosity::Warn);
        assert!(Verbosity::Warn < Verbosity::Info);
        assert!(Verbosity::Info < Verbosity::Debug);
        assert!(Verbosity::Debug < Verbosity::Crazy);
    }

    #[test]
    fn test_verbosity_from_str() {
        assert_eq!("debug".parse::<Verbosity>(), Ok(Verbosity::Debug));
        assert_eq!("WARN".parse::<Verbosity>(), Ok(Verbosity::Warn));
        assert_eq!("5".parse::<Verbosity>(), Ok(Verbosity::Crazy));
        assert!("6".parse::<Verbosity>().is_err());
        assert!("loud".parse::<Verbosity>().is_err());
    }

    #[test]
    fn test_mode_setters() {
        let logger = Logger::with_sink(MemorySink::default());
        assert_eq!(logger.verbosity(), Verbosity::Error);

        logger.set_debug_mode();
        assert_eq!(logger.verbosity(), Verbosity::Crazy);

        logger.set_quiet_mode();
        assert_eq!(logger.verbosity(), Verbosity::Quiet);

        logger.set_verbose(Verbosity::Info);
        assert_eq!(logger.verbosity(), Verbosity::Info);
    }

    #[test]
    fn test_gating_depends_on_current_threshold() {
        let sink = MemorySink::default();
        let logger = Logger::with_sink(sink.clone());
        logger.set_verbose(Verbosity::Warn);

        logger.logf(Verbosity::Debug, format_args!("debug {}", 1));
        logger.logf(Verbosity::Error, format_args!("error {}", 2));
        // Reversed order, same outcome
        logger.logf(Verbosity::Error, format_args!("error {}", 3));
        logger.logf(Verbosity::Debug, format_args!("debug {}", 4));

        assert_eq!(
            sink.messages(),
            vec![
                (Verbosity::Error, "error 2".to_string()),
                (Verbosity::Error, "error 3".to_string()),
            ]
        );
    }

    #[test]
    fn test_clones_share_threshold() {
        let sink = MemorySink::default();
        let logger = Logger::with_sink(sink.clone());
        let held = logger.clone();

        logger.set_debug_mode();
        held.logf(Verbosity::Debug, format_args!("seen"));
        assert_eq!(sink.messages().len(), 1);

        held.set_quiet_mode();
        logger.logf(Verbosity::Error, format_args!("hidden"));
        assert_eq!(sink.messages().len(), 1);
    }

    #[test]
    fn test_quiet_messages_always_pass() {
        let sink = MemorySink::default();
        let logger = Logger::with_sink(sink.clone());
        logger.set_quiet_mode();

        logger.logf(Verbosity::Quiet, format_args!("always"));
        assert_eq!(sink.messages().len(), 1);
    }
}
