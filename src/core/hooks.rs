//! Lifecycle hooks.
//!
//! Hooks are the extension points of an application and of each command:
//! - `init`: fired once when the app (or a command) finishes initializing
//! - `before` / `after`: fired by the dispatcher around a command run
//! - `error`: fired when a runtime error needs to be reported
//!
//! Any other name is accepted as [`HookEvent::Custom`].

use std::any::Any;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use crate::{EVT_AFTER, EVT_BEFORE, EVT_ERROR, EVT_INIT};

/// A named hook point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HookEvent {
    /// Initialization finished.
    Init,
    /// A resolved command is about to run.
    Before,
    /// A command finished running.
    After,
    /// A runtime error is being reported.
    Error,
    /// Application-defined event.
    Custom(Box<str>),
}

impl HookEvent {
    /// Create a custom event.
    pub fn custom(name: impl Into<Box<str>>) -> Self {
        HookEvent::Custom(name.into())
    }

    /// The event name.
    pub fn as_str(&self) -> &str {
        match self {
            HookEvent::Init => EVT_INIT,
            HookEvent::Before => EVT_BEFORE,
            HookEvent::After => EVT_AFTER,
            HookEvent::Error => EVT_ERROR,
            HookEvent::Custom(name) => name,
        }
    }

    /// Whether this is one of the four reserved events.
    pub fn is_reserved(&self) -> bool {
        !matches!(self, HookEvent::Custom(_))
    }
}

impl From<&str> for HookEvent {
    fn from(name: &str) -> Self {
        match name {
            EVT_INIT => HookEvent::Init,
            EVT_BEFORE => HookEvent::Before,
            EVT_AFTER => HookEvent::After,
            EVT_ERROR => HookEvent::Error,
            other => HookEvent::Custom(other.into()),
        }
    }
}

impl From<String> for HookEvent {
    fn from(name: String) -> Self {
        HookEvent::from(name.as_str())
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload handed to hook handlers.
#[derive(Clone, Copy)]
pub enum HookData<'a> {
    /// No payload (`init`).
    None,
    /// The command being dispatched (`before` / `after`).
    Command {
        /// Canonical command name.
        name: &'a str,
        /// Arguments left after the command name.
        args: &'a [String],
    },
    /// The error being reported (`error`).
    Error(&'a (dyn Error + 'static)),
    /// Opaque payload for custom events.
    Any(&'a dyn Any),
}

impl<'a> HookData<'a> {
    /// Get the error payload, if any.
    pub fn as_error(&self) -> Option<&'a (dyn Error + 'static)> {
        match self {
            HookData::Error(err) => Some(*err),
            _ => None,
        }
    }

    /// Downcast an opaque payload.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&'a T> {
        match self {
            HookData::Any(value) => value.downcast_ref(),
            _ => None,
        }
    }
}

impl fmt::Debug for HookData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookData::None => f.write_str("None"),
            HookData::Command { name, args } => f
                .debug_struct("Command")
                .field("name", name)
                .field("args", args)
                .finish(),
            HookData::Error(err) => f.debug_tuple("Error").field(&err.to_string()).finish(),
            HookData::Any(_) => f.write_str("Any(..)"),
        }
    }
}

/// Everything a handler sees when an event fires.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// Name of the app or command that fired the event.
    pub source: &'a str,
    /// The event being fired.
    pub event: &'a HookEvent,
    /// Event payload.
    pub data: HookData<'a>,
}

/// Type alias for hook handler functions.
pub type HookHandler = Box<dyn Fn(&HookContext<'_>) + Send + Sync>;

/// Ordered handler lists keyed by event.
///
/// Handlers run synchronously in registration order. Panics inside a handler
/// are not caught; a handler that needs to report a problem should fire the
/// `error` event or record it elsewhere.
///
/// # Examples
///
/// ```ignore
/// let mut hooks = Hooks::new();
/// hooks.on("init", |ctx| println!("{} ready", ctx.source));
/// hooks.fire(&HookEvent::Init, "app", HookData::None);
/// ```
#[derive(Default)]
pub struct Hooks {
    handlers: HashMap<HookEvent, Vec<HookHandler>>,
}

impl Hooks {
    /// Create an empty hook table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler for `event`.
    pub fn on<F>(&mut self, event: impl Into<HookEvent>, handler: F)
    where
        F: Fn(&HookContext<'_>) + Send + Sync + 'static,
    {
        self.handlers
            .entry(event.into())
            .or_default()
            .push(Box::new(handler));
    }

    /// Invoke every handler for `event` once, in registration order.
    ///
    /// Returns the number of handlers that ran.
    pub fn fire(&self, event: &HookEvent, source: &str, data: HookData<'_>) -> usize {
        let Some(handlers) = self.handlers.get(event) else {
            return 0;
        };

        let ctx = HookContext {
            source,
            event,
            data,
        };
        for handler in handlers {
            handler(&ctx);
        }
        handlers.len()
    }

    /// Check if any handler is registered for `event`.
    pub fn has(&self, event: &HookEvent) -> bool {
        self.count(event) > 0
    }

    /// Number of handlers registered for `event`.
    pub fn count(&self, event: &HookEvent) -> usize {
        self.handlers.get(event).map_or(0, Vec::len)
    }

    /// Number of events with at least one handler.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if no handler is registered at all.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<_> = self
            .handlers
            .iter()
            .map(|(event, list)| (event.as_str(), list.len()))
            .collect();
        counts.sort();
        f.debug_struct("Hooks").field("handlers", &counts).finish()
    }
}
