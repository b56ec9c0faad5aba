//! Command catalog and lifecycle hooks for command-line applications.
//!
//! cli_catalog is the registration core of a CLI framework:
//!
//! - **Command**: Named commands, optionally grouped by a `module:` prefix
//! - **CommandCatalog**: Name, module and alias bookkeeping
//! - **Hooks**: Synchronous `init` / `before` / `after` / `error` extension points
//! - **Logger**: Six-level verbosity gate in front of `tracing`
//!
//! Argument parsing, help rendering and command dispatch are left to the
//! surrounding runtime.
//!
//! # Features
//!
//! - `persist` (default): RON configuration files for app metadata and aliases
//!
//! # Quick Start
//!
//! ```ignore
//! use cli_catalog::prelude::*;
//!
//! fn main() {
//!     let mut app = CliApp::with(|app| {
//!         app.name = "deployer".into();
//!         app.version = "0.4.0".into();
//!     });
//!
//!     app.on("before", |ctx| {
//!         if let HookData::Command { name, .. } = ctx.data {
//!             println!("running {name}");
//!         }
//!     });
//!
//!     exit_on_err(app.add(
//!         Command::new("status").alias("st"),
//!         [Command::new("db:migrate").description("Run migrations")],
//!     ));
//! }
//! ```

// Core module (always available, zero optional deps)
pub mod core;

pub mod logging;

// Persistence module (feature-gated)
#[cfg(feature = "persist")]
pub mod persist;

// Re-export core types at crate root for convenience
pub use crate::core::{
    AppError, CliApp, Logo, exit_on_err,
    CatalogError, CommandCatalog, NAME_MAX_LENGTH_FLOOR, Registration,
    Command, CommandArgs, CommandError, CommandHandler, CommandResult,
    HookContext, HookData, HookEvent, HookHandler, Hooks,
    LogSink, Logger, ParseVerbosityError, Verbosity,
};

pub use logging::{TracingSink, install_subscriber};

#[cfg(feature = "persist")]
pub use persist::{AppConfigFile, ConfigError};

/// Success exit code.
pub const OK: i32 = 0;
/// Generic error exit code.
pub const ERR: i32 = 2;
/// Name of the built-in help command.
pub const HELP_COMMAND: &str = "help";

/// Fired once when initialization finishes.
pub const EVT_INIT: &str = "init";
/// Fired right before a resolved command runs.
pub const EVT_BEFORE: &str = "before";
/// Fired right after a command runs.
pub const EVT_AFTER: &str = "after";
/// Fired when a runtime error is reported.
pub const EVT_ERROR: &str = "error";

/// Log through a [`Logger`] with `format!` syntax.
///
/// ```ignore
/// logf!(logger, Verbosity::Debug, "loaded {} commands", n);
/// ```
#[macro_export]
macro_rules! logf {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.logf($level, format_args!($($arg)+))
    };
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::core::{
        CliApp, Command, CommandArgs, CommandCatalog, CatalogError, Registration,
        HookContext, HookData, HookEvent, Hooks,
        Logger, Verbosity, exit_on_err,
    };
    pub use crate::logf;
}
