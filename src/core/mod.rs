//! Core types with zero optional dependencies.
//!
//! This module provides the fundamental building blocks:
//! - [`CliApp`] - Application object tying everything together
//! - [`CommandCatalog`] - Registered commands, modules and aliases
//! - [`Command`] - A single command entry
//! - [`Hooks`] - Ordered, synchronous lifecycle hooks
//! - [`Logger`] - Verbosity-gated logging

mod app;
mod catalog;
mod command;
mod hooks;
pub(crate) mod verbosity;

pub use app::{AppError, CliApp, Logo, exit_on_err};
pub use catalog::{CatalogError, CommandCatalog, NAME_MAX_LENGTH_FLOOR, Registration};
pub use command::{Command, CommandArgs, CommandError, CommandHandler, CommandResult};
pub use hooks::{HookContext, HookData, HookEvent, HookHandler, Hooks};
pub use verbosity::{LogSink, Logger, ParseVerbosityError, Verbosity};
