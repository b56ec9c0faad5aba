//! Command catalog.
//!
//! Central storage for registered commands with a module index, an alias
//! table and the running maximum name length used for help alignment.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::{Command, Logger, Verbosity};

/// Lower bound for [`CommandCatalog::name_max_length`].
pub const NAME_MAX_LENGTH_FLOOR: usize = 12;

/// Configuration mistakes rejected at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The command name is empty after trimming.
    EmptyName,
    /// The command name starts with a colon (module prefix is empty).
    EmptyModule(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::EmptyName => write!(f, "the added command name can not be empty"),
            CatalogError::EmptyModule(name) => {
                write!(f, "the added command module can not be empty: '{}'", name)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Outcome of a successful [`CommandCatalog::add_command`].
#[derive(Debug)]
pub enum Registration<'a> {
    /// The command is now stored in the catalog.
    Added(&'a Command),
    /// The command is disabled and was handed back without being stored.
    Skipped(Command),
}

impl Registration<'_> {
    /// Check if the command was stored.
    pub fn is_added(&self) -> bool {
        matches!(self, Registration::Added(_))
    }

    /// Name of the command, stored or not.
    pub fn name(&self) -> &str {
        match self {
            Registration::Added(cmd) => cmd.name(),
            Registration::Skipped(cmd) => cmd.name(),
        }
    }
}

/// Registry of commands.
///
/// Re-registering a name silently replaces the earlier command. Aliases
/// are last-writer-wins.
///
/// # Examples
///
/// ```ignore
/// let mut catalog = CommandCatalog::new(Logger::default());
///
/// catalog.add_command(Command::new("db:migrate").alias("m"))?;
///
/// assert_eq!(catalog.get("m").map(Command::module), Some("db"));
/// ```
#[derive(Debug)]
pub struct CommandCatalog {
    /// Command name -> name length.
    names: BTreeMap<String, usize>,
    commands: BTreeMap<String, Command>,
    /// Module -> names of the commands in it. `""` holds un-namespaced commands.
    module_commands: BTreeMap<String, BTreeSet<String>>,
    /// Alias -> canonical command name.
    aliases: BTreeMap<String, String>,
    name_max_length: usize,
    logger: Logger,
}

impl CommandCatalog {
    /// Create an empty catalog logging through `logger`.
    pub fn new(logger: Logger) -> Self {
        Self {
            names: BTreeMap::new(),
            commands: BTreeMap::new(),
            module_commands: BTreeMap::new(),
            aliases: BTreeMap::new(),
            name_max_length: NAME_MAX_LENGTH_FLOOR,
            logger,
        }
    }

    /// Get the logger shared with registered commands.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Register a command.
    ///
    /// The name is trimmed first. Disabled commands are returned untouched as
    /// [`Registration::Skipped`]. A name containing `:` places the command in
    /// the module named by the text before the first colon.
    pub fn add_command(&mut self, mut cmd: Command) -> Result<Registration<'_>, CatalogError> {
        let trimmed = cmd.name().trim().to_string();
        *cmd.name_mut() = trimmed;
        if cmd.name().is_empty() {
            return Err(CatalogError::EmptyName);
        }

        if cmd.is_disabled() {
            crate::logf!(
                self.logger,
                Verbosity::Debug,
                "command {} has been disabled, skip add",
                cmd.name()
            );
            return Ok(Registration::Skipped(cmd));
        }

        let module = match cmd.name().find(':') {
            Some(0) => return Err(CatalogError::EmptyModule(cmd.name().to_string())),
            Some(i) => cmd.name()[..i].to_string(),
            None => String::new(),
        };
        cmd.set_module(&module);

        let name = cmd.name().to_string();
        let name_len = name.len();

        self.names.insert(name.clone(), name_len);
        self.name_max_length = self.name_max_length.max(name_len);
        self.module_commands
            .entry(module)
            .or_default()
            .insert(name.clone());

        let aliases = cmd.get_aliases().to_vec();
        self.add_aliases(&name, aliases);
        crate::logf!(
            self.logger,
            Verbosity::Debug,
            "[Catalog.AddCommand] add a new CLI command: {}",
            name
        );

        let stored = match self.commands.entry(name) {
            Entry::Occupied(mut slot) => {
                slot.insert(cmd);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(cmd),
        };
        stored.attach(self.logger.clone());
        Ok(Registration::Added(stored))
    }

    /// Register one or more commands in order, stopping at the first error.
    pub fn add<I>(&mut self, primary: Command, more: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = Command>,
    {
        self.add_command(primary)?;
        for cmd in more {
            self.add_command(cmd)?;
        }
        Ok(())
    }

    /// Map each alias to `name`, overwriting earlier mappings.
    pub fn add_aliases<I, S>(&mut self, name: &str, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for alias in aliases {
            self.aliases.insert(alias.into(), name.to_string());
        }
    }

    /// Get the real command name for `name`.
    ///
    /// Returns the canonical name when `name` is an alias, otherwise `name`.
    pub fn resolve_alias<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }

    /// Check if `name` is a registered alias.
    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Get a command by name or alias.
    ///
    /// A registered command name wins over an alias spelled the same way.
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands
            .get(name)
            .or_else(|| self.commands.get(self.resolve_alias(name)))
    }

    /// Check if a command is registered under `name` (aliases excluded).
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Command names mapped to their length.
    pub fn names(&self) -> &BTreeMap<String, usize> {
        &self.names
    }

    /// All registered commands.
    pub fn commands(&self) -> &BTreeMap<String, Command> {
        &self.commands
    }

    /// Alias table (alias -> canonical name).
    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Iterate over the known module names, including `""`.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.module_commands.keys().map(String::as_str)
    }

    /// Iterate over the commands of one module.
    pub fn module_commands<'a>(&'a self, module: &str) -> impl Iterator<Item = &'a Command> {
        self.module_commands
            .get(module)
            .into_iter()
            .flatten()
            .filter_map(|name| self.commands.get(name))
    }

    /// Length of the longest registered name, at least [`NAME_MAX_LENGTH_FLOOR`].
    pub fn name_max_length(&self) -> usize {
        self.name_max_length
    }

    /// Get the number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::HookEvent;
    use crate::core::verbosity::testing::MemorySink;
    use super::*;

    fn catalog() -> CommandCatalog {
        CommandCatalog::new(Logger::with_sink(MemorySink::default()))
    }

    #[test]
    fn test_add_plain_command() {
        let mut catalog = catalog();

        let reg = catalog.add_command(Command::new("serve")).unwrap();
        assert!(reg.is_added());

        assert!(catalog.contains("serve"));
        assert_eq!(catalog.names().get("serve"), Some(&5));
        assert_eq!(catalog.get("serve").unwrap().module(), "");
        assert!(catalog.get("serve").unwrap().is_attached());
        assert_eq!(catalog.module_commands("").count(), 1);
        assert_eq!(catalog.name_max_length(), NAME_MAX_LENGTH_FLOOR);
    }

    #[test]
    fn test_name_is_trimmed() {
        let mut catalog = catalog();

        catalog.add_command(Command::new("  build \t")).unwrap();

        assert!(catalog.contains("build"));
        assert_eq!(catalog.names().get("build"), Some(&5));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut catalog = catalog();

        assert_eq!(
            catalog.add_command(Command::new("")).unwrap_err(),
            CatalogError::EmptyName
        );
        assert_eq!(
            catalog.add_command(Command::new("   ")).unwrap_err(),
            CatalogError::EmptyName
        );
        assert!(catalog.is_empty());
        assert!(catalog.names().is_empty());
    }

    #[test]
    fn test_leading_colon_rejected() {
        let mut catalog = catalog();

        let err = catalog.add_command(Command::new(":cmd")).unwrap_err();
        assert_eq!(err, CatalogError::EmptyModule(":cmd".to_string()));
        assert!(catalog.is_empty());
        assert_eq!(catalog.modules().count(), 0);
    }

    #[test]
    fn test_empty_name_checked_before_disabled() {
        let mut catalog = catalog();

        let err = catalog
            .add_command(Command::new(" ").disabled(true))
            .unwrap_err();
        assert_eq!(err, CatalogError::EmptyName);
    }

    #[test]
    fn test_disabled_command_skipped() {
        let sink = MemorySink::default();
        let logger = Logger::with_sink(sink.clone());
        logger.set_verbose(Verbosity::Debug);
        let mut catalog = CommandCatalog::new(logger);

        let reg = catalog
            .add_command(Command::new("legacy").alias("old").disabled(true))
            .unwrap();

        match reg {
            Registration::Skipped(cmd) => {
                assert_eq!(cmd.name(), "legacy");
                assert!(!cmd.is_attached());
            }
            Registration::Added(_) => panic!("disabled command was stored"),
        }
        assert!(!catalog.contains("legacy"));
        assert!(catalog.names().get("legacy").is_none());
        assert!(!catalog.is_alias("old"));
        assert!(
            sink.messages()
                .iter()
                .any(|(_, msg)| msg == "command legacy has been disabled, skip add")
        );
    }

    #[test]
    fn test_module_prefix() {
        let mut catalog = catalog();

        catalog.add_command(Command::new("mod:cmd")).unwrap();
        catalog.add_command(Command::new("mod:other:deep")).unwrap();

        let cmd = catalog.get("mod:cmd").unwrap();
        assert_eq!(cmd.module(), "mod");
        assert_eq!(catalog.get("mod:other:deep").unwrap().module(), "mod");

        let in_module: Vec<_> = catalog.module_commands("mod").map(Command::name).collect();
        assert_eq!(in_module, vec!["mod:cmd", "mod:other:deep"]);
        assert_eq!(catalog.module_commands("").count(), 0);
        assert_eq!(catalog.module_commands("missing").count(), 0);
    }

    #[test]
    fn test_name_max_length_tracks_longest() {
        let mut catalog = catalog();

        catalog.add_command(Command::new("short")).unwrap();
        assert_eq!(catalog.name_max_length(), 12);

        catalog
            .add_command(Command::new("a-rather-long-command-name"))
            .unwrap();
        assert_eq!(catalog.name_max_length(), 26);

        catalog.add_command(Command::new("tiny")).unwrap();
        assert_eq!(catalog.name_max_length(), 26);
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut catalog = catalog();

        catalog
            .add_command(Command::new("deploy").description("first"))
            .unwrap();
        catalog
            .add_command(Command::new("deploy").description("second"))
            .unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("deploy").unwrap().get_description(), "second");
        assert_eq!(catalog.module_commands("").count(), 1);
    }

    #[test]
    fn test_alias_last_write_wins() {
        let mut catalog = catalog();

        catalog.add_aliases("foo", ["f", "fo"]);
        catalog.add_aliases("bar", ["f"]);

        assert_eq!(catalog.resolve_alias("f"), "bar");
        assert_eq!(catalog.resolve_alias("fo"), "foo");
        assert_eq!(catalog.resolve_alias("unknown"), "unknown");
    }

    #[test]
    fn test_aliases_registered_with_command() {
        let mut catalog = catalog();

        catalog
            .add_command(Command::new("status").aliases(["st", "s"]))
            .unwrap();

        assert_eq!(catalog.resolve_alias("st"), "status");
        assert_eq!(catalog.get("s").unwrap().name(), "status");
        assert!(catalog.is_alias("st"));
        assert!(!catalog.contains("st"));
    }

    #[test]
    fn test_command_name_wins_over_alias() {
        let mut catalog = catalog();

        catalog.add_command(Command::new("list")).unwrap();
        catalog
            .add_command(Command::new("logs").alias("list"))
            .unwrap();

        assert_eq!(catalog.get("list").unwrap().name(), "list");
        assert_eq!(catalog.resolve_alias("list"), "logs");
    }

    #[test]
    fn test_add_batch_stops_at_first_error() {
        let mut catalog = catalog();

        let err = catalog
            .add(
                Command::new("one"),
                [Command::new("two"), Command::new(""), Command::new("three")],
            )
            .unwrap_err();

        assert_eq!(err, CatalogError::EmptyName);
        assert!(catalog.contains("one"));
        assert!(catalog.contains("two"));
        assert!(!catalog.contains("three"));
    }

    #[test]
    fn test_init_fires_on_stored_command() {
        let sink = MemorySink::default();
        let logger = Logger::with_sink(sink.clone());
        logger.set_debug_mode();
        let mut catalog = CommandCatalog::new(logger);
        let fired = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));

        catalog.add_command(Command::new("deploy")).unwrap();
        let counter = fired.clone();
        let reg = catalog
            .add_command(Command::new("deploy").on("init", move |ctx| {
                assert_eq!(ctx.source, "deploy");
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            }))
            .unwrap();

        let Registration::Added(stored) = reg else {
            panic!("deploy should be stored");
        };
        assert!(stored.is_attached());
        assert!(stored.hooks().has(&HookEvent::Init));
        assert_eq!(fired.load(std::sync::atomic::Ordering::SeqCst), 1);

        let messages: Vec<_> = sink.messages().into_iter().map(|(_, msg)| msg).collect();
        let added = messages
            .iter()
            .rposition(|msg| msg == "[Catalog.AddCommand] add a new CLI command: deploy");
        let initialized = messages
            .iter()
            .rposition(|msg| msg == "[Command.Init] initialize command: deploy");
        assert!(added.is_some() && added < initialized);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_add_logs_at_debug() {
        let sink = MemorySink::default();
        let logger = Logger::with_sink(sink.clone());
        let mut catalog = CommandCatalog::new(logger.clone());

        catalog.add_command(Command::new("quiet")).unwrap();
        assert!(sink.messages().is_empty());

        logger.set_debug_mode();
        catalog.add_command(Command::new("loud")).unwrap();
        assert!(
            sink.messages()
                .iter()
                .any(|(level, msg)| *level == Verbosity::Debug
                    && msg == "[Catalog.AddCommand] add a new CLI command: loud")
        );
    }
}
