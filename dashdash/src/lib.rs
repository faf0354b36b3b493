#![doc = include_str!("../README.md")]

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};

use biometrics::{Collector, Counter};

mod grammar;
mod usage;

pub use dashdash_derive::CommandLine;
pub use grammar::{alias, is_name, is_name_char, tokenize, Token};

//////////////////////////////////////////// biometrics ////////////////////////////////////////////

static PARSE: Counter = Counter::new("dashdash.parse");
static HELP: Counter = Counter::new("dashdash.help");
static READY: Counter = Counter::new("dashdash.ready");
static CONFIG_ERROR: Counter = Counter::new("dashdash.config_error");
static BAD_FORMAT: Counter = Counter::new("dashdash.bad_format");
static UNRECOGNIZED: Counter = Counter::new("dashdash.unrecognized");
static BAD_VALUE: Counter = Counter::new("dashdash.bad_value");

/// Registers this crate's biometrics with the provided Collector.
pub fn register_biometrics(collector: &Collector) {
    collector.register_counter(&PARSE);
    collector.register_counter(&HELP);
    collector.register_counter(&READY);
    collector.register_counter(&CONFIG_ERROR);
    collector.register_counter(&BAD_FORMAT);
    collector.register_counter(&UNRECOGNIZED);
    collector.register_counter(&BAD_VALUE);
}

/////////////////////////////////////////////// Error //////////////////////////////////////////////

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// What's wrong with the value supplied to a recognized option.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueFault {
    /// A flag was given `=value`.
    Unexpected,
    /// An option that takes a value was given none.
    Missing,
    /// The value is not one of the declared choices.
    InvalidChoice,
}

impl Display for ValueFault {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        match self {
            ValueFault::Unexpected => write!(f, "unexpected value"),
            ValueFault::Missing => write!(f, "missing value"),
            ValueFault::InvalidChoice => write!(f, "invalid choice"),
        }
    }
}

/// One offending token and why it was rejected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BadValue {
    pub token: String,
    pub fault: ValueFault,
}

impl Display for BadValue {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "{} ({})", self.token, self.fault)
    }
}

/// The declarations themselves are malformed.  This is a bug in the program, not in its input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// Aliases of every option whose name is not a run of `[0-9A-Za-z_-]`.
    BadNames(Vec<String>),
    /// Aliases of every option declared more than once.
    DuplicateNames(Vec<String>),
    /// Every option whose choices mix the free-form sentinel with real values.
    BadChoices(Vec<String>),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        match self {
            ConfigError::BadNames(names) => write!(f, "bad argument names: {}", join(names)),
            ConfigError::DuplicateNames(names) => {
                write!(f, "duplicate argument names: {}", join(names))
            }
            ConfigError::BadChoices(choices) => {
                write!(f, "bad argument choices: {}", join(choices))
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// The command line does not agree with the declarations.  Each variant carries every offending
/// token for its stage.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InputError {
    /// Tokens that are neither `--name` nor `--name=value`.
    BadFormat(Vec<String>),
    /// Well-formed tokens that name no declared option.
    Unrecognized(Vec<String>),
    /// Recognized tokens with an illegal (or illegally absent) value.
    BadValue(Vec<BadValue>),
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        match self {
            InputError::BadFormat(tokens) => write!(f, "bad argument format: {}", join(tokens)),
            InputError::Unrecognized(tokens) => {
                write!(f, "unrecognized arguments: {}", join(tokens))
            }
            InputError::BadValue(values) => write!(f, "bad argument values: {}", join(values)),
        }
    }
}

impl std::error::Error for InputError {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    Config(ConfigError),
    Input(InputError),
}

impl Error {
    /// The status a process should exit with after reporting this error.
    pub fn exit_status(&self) -> i32 {
        match self {
            Error::Config(_) => 1,
            Error::Input(_) => 2,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Error::Config(err) => write!(f, "{}", err),
            Error::Input(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<InputError> for Error {
    fn from(err: InputError) -> Self {
        Self::Input(err)
    }
}

///////////////////////////////////////////// Argument /////////////////////////////////////////////

/// How an option treats its value, derived from its choices.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// No choices:  `--name` only.
    Flag,
    /// Choices of exactly `[""]`:  `--name=anything`.
    Free,
    /// Two or more choices:  `--name=one-of-them`.
    Choice,
}

/// One declared option and, after parsing, what the command line said about it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Argument {
    name: String,
    help: String,
    choices: Vec<String>,
    value: String,
    active: bool,
}

impl Argument {
    fn new(name: String, help: String, choices: &[&str]) -> Self {
        Self {
            name,
            help,
            choices: choices.iter().map(|c| c.to_string()).collect(),
            value: String::new(),
            active: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `--name`.
    pub fn alias(&self) -> String {
        alias(&self.name)
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// The value from the command line, or the empty string.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// True iff the option appeared on the command line.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn kind(&self) -> Kind {
        match self.choices.as_slice() {
            [] => Kind::Flag,
            [only] if only.is_empty() => Kind::Free,
            _ => Kind::Choice,
        }
    }

    fn choices_are_consistent(&self) -> bool {
        match self.choices.as_slice() {
            [] => true,
            [only] => only.is_empty(),
            choices => choices.iter().all(|c| !c.is_empty()),
        }
    }
}

////////////////////////////////////////////// Outcome /////////////////////////////////////////////

/// What a successful parse asks of the caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Every token validated and the registry reflects the command line.
    Ready,
    /// There was nothing to parse, or `--help` was asked for.  The registry is untouched.
    Help,
}

///////////////////////////////////////////// Registry /////////////////////////////////////////////

/// The set of options a program understands.
///
/// Build it with [Registry::declare], hand it the command line once with [Registry::parse] (or
/// [Registry::parse_command_line]), then query it with [Registry::has] and [Registry::get].
#[derive(Clone, Debug, Default)]
pub struct Registry {
    name: String,
    description: String,
    args: Vec<Argument>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the program name shown in usage text.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Set the text shown beneath the usage line.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    /// Declare an option.
    ///
    /// `choices` decides what the option accepts:  `&[]` for a bare flag, `&[""]` for any single
    /// value, or two or more values to restrict it to exactly those.  Nothing is validated here;
    /// malformed names and inconsistent choices surface as a [ConfigError] from [Registry::parse].
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        help: impl Into<String>,
        choices: &[&str],
    ) -> &mut Self {
        let arg = Argument::new(name.into(), help.into(), choices);
        let idx = self.args.len();
        self.index.entry(arg.name.clone()).or_insert(idx);
        self.args.push(arg);
        self
    }

    /// True iff `name` was declared and appeared on the command line.
    pub fn has(&self, name: &str) -> bool {
        self.argument(name).map(Argument::is_active).unwrap_or(false)
    }

    /// The value given to `name`, or the empty string if there was none.
    pub fn get(&self, name: &str) -> &str {
        self.argument(name).map(Argument::value).unwrap_or("")
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.index.get(name).map(|idx| &self.args[*idx])
    }

    /// All declared options in declaration order.
    pub fn arguments(&self) -> impl Iterator<Item = &Argument> {
        self.args.iter()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Validate `args` (the command line without the program name) and record what they say.
    ///
    /// Validation runs in stages:  the declarations, then token format, then recognition, then
    /// values.  Each stage collects every offender before failing, and no later stage runs after
    /// a failure.  The registry is only modified once every stage passes, so an `Err` leaves it
    /// exactly as it was.
    pub fn parse<S: AsRef<str>>(&mut self, args: &[S]) -> Result<Outcome, Error> {
        PARSE.click();
        let outcome = self.parse_stages(args);
        match &outcome {
            Ok(Outcome::Ready) => READY.click(),
            Ok(Outcome::Help) => HELP.click(),
            Err(Error::Config(_)) => CONFIG_ERROR.click(),
            Err(Error::Input(InputError::BadFormat(_))) => BAD_FORMAT.click(),
            Err(Error::Input(InputError::Unrecognized(_))) => UNRECOGNIZED.click(),
            Err(Error::Input(InputError::BadValue(_))) => BAD_VALUE.click(),
        }
        outcome
    }

    /// Parse the process's command line.  Prints help and exits 0 on [Outcome::Help]; prints the
    /// diagnostic and exits with [Error::exit_status] on error.
    ///
    /// Arguments that are not UTF-8 are converted lossily; the replacement character is not a
    /// name character, so such arguments fail the format stage.
    pub fn parse_command_line(&mut self) {
        let args: Vec<String> = std::env::args_os()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        let argv0 = args.first().map(String::as_str).unwrap_or("");
        let rest = args.get(1..).unwrap_or(&[]);
        self.parse_or_exit(argv0, rest);
    }

    /// Like [Registry::parse_command_line], but with an explicit program name and arguments.
    pub fn parse_or_exit<S: AsRef<str>>(&mut self, argv0: &str, args: &[S]) {
        match self.parse(args) {
            Ok(Outcome::Ready) => {}
            Ok(Outcome::Help) => {
                print!("{}", self.help(argv0));
                std::process::exit(0);
            }
            Err(err) => {
                eprint!("{}", self.diagnostic(argv0, &err));
                std::process::exit(err.exit_status());
            }
        }
    }

    /// The command line that would reproduce the active options, in declaration order.
    pub fn canonical_arguments(&self) -> Vec<String> {
        self.args
            .iter()
            .filter(|arg| arg.active)
            .map(|arg| {
                if arg.value.is_empty() {
                    arg.alias()
                } else {
                    format!("{}={}", arg.alias(), arg.value)
                }
            })
            .collect()
    }

    fn parse_stages<S: AsRef<str>>(&mut self, args: &[S]) -> Result<Outcome, Error> {
        self.check_declarations()?;
        if args.is_empty() || self.args.is_empty() {
            return Ok(Outcome::Help);
        }
        if !self.index.contains_key("help") && args.iter().any(|arg| arg.as_ref() == "--help") {
            return Ok(Outcome::Help);
        }
        let tokens = check_format(args)?;
        let matched = self.recognize(tokens)?;
        let values = self.check_values(matched)?;
        for arg in self.args.iter_mut() {
            arg.active = false;
            arg.value.clear();
        }
        for (idx, value) in values {
            let arg = &mut self.args[idx];
            arg.active = true;
            arg.value = value.to_string();
        }
        Ok(Outcome::Ready)
    }

    fn check_declarations(&self) -> Result<(), ConfigError> {
        let bad_names: Vec<String> = self
            .args
            .iter()
            .filter(|arg| !is_name(&arg.name))
            .map(Argument::alias)
            .collect();
        if !bad_names.is_empty() {
            return Err(ConfigError::BadNames(bad_names));
        }
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for arg in self.args.iter() {
            if !seen.insert(arg.name.as_str()) && !duplicates.contains(&arg.alias()) {
                duplicates.push(arg.alias());
            }
        }
        if !duplicates.is_empty() {
            return Err(ConfigError::DuplicateNames(duplicates));
        }
        let bad_choices: Vec<String> = self
            .args
            .iter()
            .filter(|arg| !arg.choices_are_consistent())
            .map(|arg| {
                if arg.choices.len() == 1 {
                    format!("{}=v", arg.alias())
                } else {
                    format!("{}=v [{}]", arg.alias(), arg.choices.join(","))
                }
            })
            .collect();
        if !bad_choices.is_empty() {
            return Err(ConfigError::BadChoices(bad_choices));
        }
        Ok(())
    }

    fn recognize<'a>(&self, tokens: Vec<Token<'a>>) -> Result<Vec<(usize, Token<'a>)>, InputError> {
        let mut matched = Vec::with_capacity(tokens.len());
        let mut unrecognized = Vec::new();
        for token in tokens {
            match self.index.get(token.name) {
                Some(idx) => matched.push((*idx, token)),
                None => unrecognized.push(token.text.to_string()),
            }
        }
        if unrecognized.is_empty() {
            Ok(matched)
        } else {
            Err(InputError::Unrecognized(unrecognized))
        }
    }

    fn check_values<'a>(
        &self,
        matched: Vec<(usize, Token<'a>)>,
    ) -> Result<Vec<(usize, &'a str)>, InputError> {
        let mut values = Vec::with_capacity(matched.len());
        let mut faults = Vec::new();
        for (idx, token) in matched {
            let arg = &self.args[idx];
            let fault = match (arg.kind(), token.value) {
                (Kind::Flag, None) => None,
                (Kind::Flag, Some(_)) => Some(ValueFault::Unexpected),
                (Kind::Free | Kind::Choice, None) => Some(ValueFault::Missing),
                (Kind::Free, Some(_)) => None,
                (Kind::Choice, Some(value)) => {
                    if arg.choices.iter().any(|c| c == value) {
                        None
                    } else {
                        Some(ValueFault::InvalidChoice)
                    }
                }
            };
            match fault {
                Some(fault) => faults.push(BadValue {
                    token: token.text.to_string(),
                    fault,
                }),
                None => values.push((idx, token.value.unwrap_or(""))),
            }
        }
        if faults.is_empty() {
            Ok(values)
        } else {
            Err(InputError::BadValue(faults))
        }
    }
}

fn check_format<S: AsRef<str>>(args: &[S]) -> Result<Vec<Token<'_>>, InputError> {
    let mut tokens = Vec::with_capacity(args.len());
    let mut bad = Vec::new();
    for arg in args {
        match tokenize(arg.as_ref()) {
            Some(token) => tokens.push(token),
            None => bad.push(arg.as_ref().to_string()),
        }
    }
    if bad.is_empty() {
        Ok(tokens)
    } else {
        Err(InputError::BadFormat(bad))
    }
}

//////////////////////////////////////////// CommandLine ///////////////////////////////////////////

/// A struct whose fields are command-line options.  Usually derived:
///
/// ```
/// use dashdash::CommandLine;
///
/// #[derive(CommandLine, Debug, Default, Eq, PartialEq)]
/// struct Options {
///     #[dashdash(flag, "print more")]
///     verbose: bool,
///     #[dashdash(value, "where to write")]
///     output: Option<String>,
///     #[dashdash(choice, "how hard to try", "low", "high")]
///     effort: String,
/// }
///
/// let (options, _) = Options::from_arguments(&["--verbose", "--effort=high"]).unwrap();
/// assert!(options.verbose);
/// assert_eq!(None, options.output);
/// assert_eq!("high", options.effort);
/// ```
pub trait CommandLine: Sized + Default {
    /// Declare one option per field.
    fn declare(registry: &mut Registry);
    /// Copy parsed values out of the registry into the fields.
    fn extract(&mut self, registry: &Registry);

    fn registry() -> Registry {
        let mut registry = Registry::new();
        Self::declare(&mut registry);
        registry
    }

    /// Parse `args` without touching the process.  On [Outcome::Help] the fields keep their
    /// defaults.
    fn from_arguments<S: AsRef<str>>(args: &[S]) -> Result<(Self, Outcome), Error> {
        let mut registry = Self::registry();
        let outcome = registry.parse(args)?;
        let mut command_line = Self::default();
        command_line.extract(&registry);
        Ok((command_line, outcome))
    }

    /// Declare into a preconfigured registry (for a name or description) and parse the process's
    /// command line, exiting on help or error.
    fn from_registry(mut registry: Registry) -> Self {
        Self::declare(&mut registry);
        registry.parse_command_line();
        let mut command_line = Self::default();
        command_line.extract(&registry);
        command_line
    }

    fn from_command_line() -> Self {
        Self::from_registry(Registry::new())
    }
}
