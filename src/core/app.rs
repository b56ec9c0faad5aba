//! Application object.
//!
//! [`CliApp`] bundles the catalog, the app-level hooks, the logger and the
//! app metadata handed to the help renderer. It is built and configured in a
//! single-threaded setup phase, then handed to an external dispatcher.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use super::{
    CatalogError, Command, CommandCatalog, HookContext, HookData, HookEvent, Hooks, Logger,
    Registration, Verbosity,
};

/// Runtime error recorded by the application.
pub type AppError = Box<dyn Error + Send + Sync>;

/// ASCII logo shown by the help renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    /// Logo text.
    pub text: String,
    /// Color style name, e.g. `"info"`.
    pub style: String,
}

impl Default for Logo {
    fn default() -> Self {
        Self {
            text: String::new(),
            style: "info".to_string(),
        }
    }
}

/// A command-line application.
///
/// # Examples
///
/// ```ignore
/// let mut app = CliApp::with(|app| {
///     app.name = "demo".into();
///     app.version = "0.3.0".into();
/// });
///
/// app.on("before", |ctx| println!("running {:?}", ctx.data));
/// app.add(Command::new("serve").alias("s"), [Command::new("db:migrate")])?;
/// ```
pub struct CliApp {
    /// App name.
    pub name: String,
    /// App version, like "1.0.1".
    pub version: String,
    /// One-line description.
    pub description: String,
    /// ASCII logo.
    pub logo: Logo,
    /// Short options must start with `-`, long ones with `--`.
    pub strict: bool,
    catalog: CommandCatalog,
    hooks: Hooks,
    logger: Logger,
    errors: Vec<AppError>,
    vars: BTreeMap<String, String>,
    command_name: String,
    default_command: String,
    clean_args: Vec<String>,
}

impl CliApp {
    /// Create and initialize an app with default metadata.
    pub fn new() -> Self {
        Self::with(|_| {})
    }

    /// Create an app, run `configure` on it, then initialize it.
    pub fn with(configure: impl FnOnce(&mut CliApp)) -> Self {
        Self::with_logger(Logger::new(), configure)
    }

    /// Like [`CliApp::with`], logging through `logger`.
    pub fn with_logger(logger: Logger, configure: impl FnOnce(&mut CliApp)) -> Self {
        let mut app = Self {
            name: "My CLI App".to_string(),
            version: "1.0.0".to_string(),
            description: String::new(),
            logo: Logo::default(),
            strict: false,
            catalog: CommandCatalog::new(logger.clone()),
            hooks: Hooks::new(),
            logger,
            errors: Vec::new(),
            vars: BTreeMap::new(),
            command_name: String::new(),
            default_command: String::new(),
            clean_args: Vec::new(),
        };

        configure(&mut app);
        app.initialize();
        app
    }

    /// Build help vars, install the default error handler and fire `init`.
    fn initialize(&mut self) {
        let vars = self.app_vars();
        self.add_vars(vars);

        self.hooks.on(HookEvent::Error, default_error_handler);
        self.fire_event(&HookEvent::Init, HookData::None);
    }

    /// Apply further configuration. Call before adding commands.
    pub fn config(&mut self, configure: impl FnOnce(&mut CliApp)) {
        configure(self);
    }

    /// Set the logo text and, optionally, its style.
    pub fn set_logo(&mut self, text: impl Into<String>, style: Option<&str>) {
        self.logo.text = text.into();
        if let Some(style) = style {
            self.logo.style = style.to_string();
        }
    }

    /// Log everything.
    pub fn set_debug_mode(&self) {
        self.logger.set_debug_mode();
    }

    /// Log nothing.
    pub fn set_quiet_mode(&self) {
        self.logger.set_quiet_mode();
    }

    /// Set the verbosity threshold.
    pub fn set_verbose(&self, level: Verbosity) {
        self.logger.set_verbose(level);
    }

    /// Get the logger shared by the app, its catalog and its commands.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Set the command run when none is given on the command line.
    pub fn set_default_command(&mut self, name: impl Into<String>) {
        self.default_command = name.into();
    }

    /// Get the default command name, empty if unset.
    pub fn default_command(&self) -> &str {
        &self.default_command
    }

    /// Register one command.
    pub fn add_command(&mut self, cmd: Command) -> Result<Registration<'_>, CatalogError> {
        self.catalog.add_command(cmd)
    }

    /// Register one or more commands, stopping at the first invalid one.
    pub fn add<I>(&mut self, primary: Command, more: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = Command>,
    {
        self.catalog.add(primary, more)
    }

    /// Map aliases to a command name.
    pub fn add_aliases<I, S>(&mut self, name: &str, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.catalog.add_aliases(name, aliases);
    }

    /// Add an app-level hook handler.
    pub fn on<F>(&mut self, event: impl Into<HookEvent>, handler: F)
    where
        F: Fn(&HookContext<'_>) + Send + Sync + 'static,
    {
        let event = event.into();
        crate::logf!(
            self.logger,
            Verbosity::Debug,
            "[App.On] add application hook: {}",
            event
        );
        self.hooks.on(event, handler);
    }

    /// Fire an app-level event with the app name as source.
    pub fn fire_event(&self, event: &HookEvent, data: HookData<'_>) -> usize {
        crate::logf!(
            self.logger,
            Verbosity::Debug,
            "[App.Fire] trigger the application event: {}",
            event
        );
        self.hooks.fire(event, &self.name, data)
    }

    /// Record a runtime error for later inspection.
    pub fn add_error(&mut self, err: impl Into<AppError>) {
        self.errors.push(err.into());
    }

    /// Fire `error` with `err`, then record it.
    pub fn report_error(&mut self, err: impl Into<AppError>) {
        let err = err.into();
        let source: &(dyn Error + 'static) = &*err;
        self.fire_event(&HookEvent::Error, HookData::Error(source));
        self.errors.push(err);
    }

    /// Recorded runtime errors, oldest first.
    pub fn errors(&self) -> &[AppError] {
        &self.errors
    }

    /// Get the command catalog.
    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    /// Command names mapped to their length.
    pub fn names(&self) -> &BTreeMap<String, usize> {
        self.catalog.names()
    }

    /// All registered commands.
    pub fn commands(&self) -> &BTreeMap<String, Command> {
        self.catalog.commands()
    }

    /// Get the app-level hooks.
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Name of the command being run, set by the dispatcher.
    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    /// Record the command being run.
    pub fn set_command_name(&mut self, name: impl Into<String>) {
        self.command_name = name.into();
    }

    /// Arguments left after the binary and command names.
    pub fn clean_args(&self) -> &[String] {
        &self.clean_args
    }

    /// Store the arguments produced by the line processor.
    pub fn set_clean_args(&mut self, args: Vec<String>) {
        self.clean_args = args;
    }

    /// Add variables for the help renderer, overwriting existing keys.
    pub fn add_vars<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Variables for the help renderer.
    pub fn help_vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    fn app_vars(&self) -> [(&'static str, String); 5] {
        [
            ("name", self.name.clone()),
            ("version", self.version.clone()),
            ("description", self.description.clone()),
            ("logo_text", self.logo.text.clone()),
            ("logo_style", self.logo.style.clone()),
        ]
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CliApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliApp")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("commands", &self.catalog.len())
            .field("errors", &self.errors.len())
            .finish_non_exhaustive()
    }
}

/// Always-installed `error` handler so unhandled errors stay visible.
fn default_error_handler(ctx: &HookContext<'_>) {
    if let Some(err) = ctx.data.as_error() {
        eprintln!("ERROR: {}", err);
    }
}

/// Print a configuration error and exit with [`ERR`](crate::ERR).
///
/// Bootstrap code uses this to stop before the execution phase starts.
pub fn exit_on_err<T>(result: Result<T, CatalogError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(crate::ERR);
        }
    }
}
