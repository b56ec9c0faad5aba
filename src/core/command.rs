//! Command entries.
//!
//! A [`Command`] is a named, optionally module-scoped unit of functionality.
//! Its run logic belongs to the caller; the catalog only tracks it.

use std::error::Error;
use std::fmt;

use super::{HookContext, HookData, HookEvent, Hooks, Logger, Verbosity};

/// Arguments passed to a command handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    args: Vec<String>,
}

impl CommandArgs {
    /// Wrap parsed arguments (excluding the command name).
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    /// Get the number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if there are no arguments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Get an argument by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Get an argument or a default value.
    #[inline]
    pub fn get_or<'a>(&'a self, index: usize, default: &'a str) -> &'a str {
        self.get(index).unwrap_or(default)
    }

    /// Try to parse an argument as a specific type.
    pub fn parse<T: std::str::FromStr>(&self, index: usize) -> Option<T> {
        self.get(index).and_then(|s| s.parse().ok())
    }

    /// Parse an argument with a default value.
    pub fn parse_or<T: std::str::FromStr>(&self, index: usize, default: T) -> T {
        self.parse(index).unwrap_or(default)
    }

    /// Get all arguments as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[String] {
        &self.args
    }

    /// Iterate over arguments.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(String::as_str)
    }

    /// Join all arguments with a separator.
    pub fn join(&self, separator: &str) -> String {
        self.args.join(separator)
    }
}

impl From<Vec<String>> for CommandArgs {
    fn from(args: Vec<String>) -> Self {
        Self::new(args)
    }
}

/// Result returned by command handlers.
pub type CommandResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Type alias for command handler functions.
pub type CommandHandler = Box<dyn Fn(&CommandArgs) -> CommandResult + Send + Sync>;

/// Errors raised while running a command.
#[derive(Debug)]
pub enum CommandError {
    /// The command was registered without a handler.
    NoHandler(String),
    /// The handler returned an error.
    Failed(String, Box<dyn Error + Send + Sync>),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NoHandler(name) => write!(f, "command '{}' has no handler", name),
            CommandError::Failed(name, err) => write!(f, "command '{}' failed: {}", name, err),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CommandError::NoHandler(_) => None,
            CommandError::Failed(_, err) => Some(err.as_ref()),
        }
    }
}

/// A command entry.
///
/// # Examples
///
/// ```ignore
/// let build = Command::new("project:build")
///     .description("Build the project")
///     .aliases(["b", "mk"])
///     .handler(|args| {
///         println!("building {}", args.join(" "));
///         Ok(())
///     });
/// ```
pub struct Command {
    name: String,
    module: String,
    aliases: Vec<String>,
    description: String,
    disabled: bool,
    handler: Option<CommandHandler>,
    hooks: Hooks,
    logger: Option<Logger>,
}

impl Command {
    /// Create a new command with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: String::new(),
            aliases: Vec::new(),
            description: String::new(),
            disabled: false,
            handler: None,
            hooks: Hooks::new(),
            logger: None,
        }
    }

    /// Set the description.
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Add one alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Add several aliases, keeping their order.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Mark the command disabled; the catalog will skip it.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the run handler.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CommandArgs) -> CommandResult + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Register a hook on this command.
    pub fn on<F>(mut self, event: impl Into<HookEvent>, handler: F) -> Self
    where
        F: Fn(&HookContext<'_>) + Send + Sync + 'static,
    {
        self.hooks.on(event, handler);
        self
    }

    /// Get the command name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the module prefix, empty when the name has no colon.
    #[inline]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Get the aliases in registration order.
    #[inline]
    pub fn get_aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Get the description.
    #[inline]
    pub fn get_description(&self) -> &str {
        &self.description
    }

    /// Check if the command is disabled.
    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Check if a handler is set.
    #[inline]
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Check if the command has been accepted by a catalog.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.logger.is_some()
    }

    /// Get the command's own hooks.
    #[inline]
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Fire one of this command's hooks with the command name as source.
    pub fn fire_event(&self, event: &HookEvent, data: HookData<'_>) -> usize {
        if let Some(logger) = &self.logger {
            crate::logf!(
                logger,
                Verbosity::Crazy,
                "[Command.Fire] trigger the command event: {}",
                event
            );
        }
        self.hooks.fire(event, &self.name, data)
    }

    /// Run the handler.
    ///
    /// Exposed for the external dispatcher; the catalog never calls it.
    pub fn execute(&self, args: &CommandArgs) -> Result<(), CommandError> {
        let handler = self
            .handler
            .as_ref()
            .ok_or_else(|| CommandError::NoHandler(self.name.clone()))?;
        handler(args).map_err(|err| CommandError::Failed(self.name.clone(), err))
    }

    pub(crate) fn name_mut(&mut self) -> &mut String {
        &mut self.name
    }

    pub(crate) fn set_module(&mut self, module: &str) {
        module.clone_into(&mut self.module);
    }

    /// Link the command to its catalog and run its init hook.
    pub(crate) fn attach(&mut self, logger: Logger) {
        self.logger = Some(logger);
        self.initialize();
    }

    fn initialize(&self) {
        if let Some(logger) = &self.logger {
            crate::logf!(
                logger,
                Verbosity::Debug,
                "[Command.Init] initialize command: {}",
                self.name
            );
        }
        self.fire_event(&HookEvent::Init, HookData::None);
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("aliases", &self.aliases)
            .field("description", &self.description)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn test_command_args_basic() {
        let args = CommandArgs::new(vec!["hello".into(), "42".into()]);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(0), Some("hello"));
        assert_eq!(args.get(2), None);
        assert_eq!(args.get_or(2, "none"), "none");
        assert_eq!(args.parse::<i32>(1), Some(42));
        assert_eq!(args.parse_or::<i32>(0, -1), -1);
        assert_eq!(args.join(" "), "hello 42");
    }

    #[test]
    fn test_command_builder() {
        let cmd = Command::new("db:migrate")
            .description("Run migrations")
            .alias("m")
            .aliases(["mig", "migrate"]);

        assert_eq!(cmd.name(), "db:migrate");
        assert_eq!(cmd.get_description(), "Run migrations");
        assert_eq!(cmd.get_aliases(), ["m", "mig", "migrate"]);
        assert!(!cmd.is_disabled());
        assert!(!cmd.is_attached());
        assert!(!cmd.has_handler());
    }

    #[test]
    fn test_execute() {
        let cmd = Command::new("fail").handler(|args| {
            if args.is_empty() {
                Err("missing argument".into())
            } else {
                Ok(())
            }
        });

        assert!(cmd.execute(&CommandArgs::new(vec!["x".into()])).is_ok());
        let err = cmd.execute(&CommandArgs::default()).unwrap_err();
        assert_eq!(err.to_string(), "command 'fail' failed: missing argument");
        assert!(err.source().is_some());

        let bare = Command::new("bare");
        assert!(matches!(
            bare.execute(&CommandArgs::default()),
            Err(CommandError::NoHandler(_))
        ));
    }

    #[test]
    fn test_attach_fires_init_hook() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let slot = seen.clone();
        let mut cmd = Command::new("serve").on("init", move |ctx| {
            slot.lock().unwrap().push(ctx.source.to_string());
        });

        cmd.attach(Logger::default());

        assert!(cmd.is_attached());
        assert_eq!(*seen.lock().unwrap(), vec!["serve".to_string()]);
    }
}
