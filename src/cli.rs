//! Command-line interface implementation for conseil.
//! Builds a clap command tree from the registered actions and turns parsed
//! arguments into option values for the selected action.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::registry::{Action, OptionKind, OptionSpec, OptionValue, OptionValues, Registry};
use clap::parser::ValueSource;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::debug;
use std::ffi::OsString;

/// An action resolved from the command line, with its option values.
#[derive(Debug)]
pub struct Invocation<'a> {
    pub action: &'a Action,
    pub values: OptionValues,
}

impl Invocation<'_> {
    pub fn run(&self) -> Result<()> {
        self.action.invoke(&self.values)
    }
}

fn build_arg(spec: &OptionSpec) -> Arg {
    let arg = Arg::new(spec.name).long(spec.name).help(spec.usage.clone());
    match &spec.default {
        OptionValue::Str(default) => arg.value_name("VALUE").default_value(default.clone()),
        OptionValue::Int(default) => arg
            .value_name("NUMBER")
            .value_parser(value_parser!(i64))
            .default_value(default.to_string()),
        OptionValue::Bool(_) => arg.action(ArgAction::SetTrue),
    }
}

/// Builds the clap command for every action of `registry`, in registration order.
pub fn build_command(registry: &Registry) -> Command {
    let mut command = Command::new("conseil")
        .version(env!("CARGO_PKG_VERSION"))
        .about("go rapid application development")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        );

    for action in registry.list() {
        let mut subcommand = Command::new(action.name)
            .about(action.usage.clone())
            .visible_aliases(action.aliases.iter().copied());
        for spec in &action.options {
            subcommand = subcommand.arg(build_arg(spec));
        }
        command = command.subcommand(subcommand);
    }
    command
}

/// Collects the option values of `action` from its subcommand matches.
///
/// Options left at their built-in default take the value from `settings`
/// when the defaults file sets one.
pub fn collect_values(
    action: &Action,
    matches: &ArgMatches,
    settings: &Settings,
) -> OptionValues {
    let mut values = OptionValues::defaults(action);
    for spec in &action.options {
        let given = matches.value_source(spec.name) == Some(ValueSource::CommandLine);
        if !given {
            if let Some(value) = settings.value_for(spec.name) {
                debug!("Using configured default for --{}: {}", spec.name, value);
                values.set(spec.name, value);
                continue;
            }
        }
        let value = match spec.kind() {
            OptionKind::Str => matches.get_one::<String>(spec.name).cloned().map(OptionValue::Str),
            OptionKind::Int => matches.get_one::<i64>(spec.name).copied().map(OptionValue::Int),
            OptionKind::Bool => Some(OptionValue::Bool(matches.get_flag(spec.name))),
        };
        if let Some(value) = value {
            values.set(spec.name, value);
        }
    }
    values
}

/// Resolves the selected action and its option values from parsed arguments.
///
/// `settings` is only called for actions that take options, so a broken
/// defaults file does not affect the others.
///
/// # Errors
/// * `Error::ValidationError` if no registered action matches the subcommand
/// * any error returned by `settings`
pub fn resolve<'a, F>(
    registry: &'a Registry,
    matches: &ArgMatches,
    settings: F,
) -> Result<Invocation<'a>>
where
    F: FnOnce() -> Result<Settings>,
{
    let (name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| Error::ValidationError("no action given".to_string()))?;
    let action = registry
        .find(name)
        .ok_or_else(|| Error::ValidationError(format!("unknown action '{name}'")))?;

    let settings = if action.options.is_empty() { Settings::default() } else { settings()? };
    Ok(Invocation { action, values: collect_values(action, sub_matches, &settings) })
}

/// Parses `args` against `registry`.
///
/// Help, version and usage errors are reported by clap, which exits the process.
pub fn get_matches<I, T>(registry: &Registry, args: I) -> ArgMatches
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    build_command(registry).get_matches_from(args)
}

/// Whether `--verbose` was given before or after the action name.
pub fn is_verbose(matches: &ArgMatches) -> bool {
    matches.get_flag("verbose")
        || matches.subcommand().is_some_and(|(_, sub_matches)| sub_matches.get_flag("verbose"))
}
