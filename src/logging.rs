//! `tracing` integration.
//!
//! [`TracingSink`] is the default [`LogSink`]: messages that pass the
//! verbosity gate become `tracing` events. [`LogCaptureLayer`] collects those
//! events for hosts that want to show them somewhere other than stderr.

use std::sync::mpsc;
use std::time::SystemTime;

use tracing::{Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::field::Visit;
use tracing_subscriber::filter::LevelFilter;

use crate::core::{LogSink, Verbosity};

/// Target used for every event emitted by [`TracingSink`].
pub const LOG_TARGET: &str = "cli_catalog";

/// Forwards gated messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, level: Verbosity, message: &str) {
        match level {
            Verbosity::Error => tracing::error!(target: LOG_TARGET, "{}", message),
            Verbosity::Warn => tracing::warn!(target: LOG_TARGET, "{}", message),
            Verbosity::Quiet | Verbosity::Info => tracing::info!(target: LOG_TARGET, "{}", message),
            Verbosity::Debug => tracing::debug!(target: LOG_TARGET, "{}", message),
            Verbosity::Crazy => tracing::trace!(target: LOG_TARGET, "{}", message),
        }
    }
}

/// The stderr `fmt` subscriber used by [`install_subscriber`].
///
/// Accepts every level. [`Logger`](crate::Logger) is the only gate.
pub fn fmt_subscriber() -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_writer(std::io::stderr)
        .finish()
}

/// Install [`fmt_subscriber`] as the global default.
///
/// Fails if a global subscriber is already set.
pub fn install_subscriber() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing::subscriber::set_global_default(fmt_subscriber())?;
    Ok(())
}

/// A captured `tracing` event.
#[derive(Debug, Clone)]
pub struct LogMessage {
    /// The message contents.
    pub message: String,

    /// The part of the system the event occurred in.
    pub target: &'static str,

    /// The level of the event.
    pub level: Level,

    /// The name of the Rust module where the event occurred,
    /// or `None` if this could not be determined.
    pub module_path: Option<&'static str>,

    /// The time the event occurred.
    pub time: SystemTime,
}

/// Receiving end of a [`LogCaptureLayer`].
pub struct CapturedLogs(mpsc::Receiver<LogMessage>);

impl CapturedLogs {
    /// Take every message captured so far.
    pub fn drain(&self) -> Vec<LogMessage> {
        self.0.try_iter().collect()
    }
}

/// Create a capture layer and the handle that reads from it.
///
/// ```ignore
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let (layer, logs) = capture_layer();
/// tracing::subscriber::set_global_default(tracing_subscriber::registry().with(layer))?;
/// ```
pub fn capture_layer() -> (LogCaptureLayer, CapturedLogs) {
    let (sender, receiver) = mpsc::channel();
    (LogCaptureLayer { sender }, CapturedLogs(receiver))
}

/// A [`Layer`] that sends every event with a message to [`CapturedLogs`].
pub struct LogCaptureLayer {
    sender: mpsc::Sender<LogMessage>,
}

impl<S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>> Layer<S>
    for LogCaptureLayer
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut message = None;
        event.record(&mut LogEventVisitor(&mut message));
        if let Some(message) = message {
            let metadata = event.metadata();
            let _ = self.sender.send(LogMessage {
                message,
                target: metadata.target(),
                level: *metadata.level(),
                module_path: metadata.module_path(),
                time: SystemTime::now(),
            });
        }
    }
}

/// Records the `message` field of an event.
struct LogEventVisitor<'a>(&'a mut Option<String>);

impl Visit for LogEventVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}
