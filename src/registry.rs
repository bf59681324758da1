//! Command registry.
//! Holds the actions the dispatcher can resolve, in registration order, along
//! with the typed options each action accepts.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::fmt;

/// Kind of value an option carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Str,
    Int,
    Bool,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Str => write!(f, "string"),
            OptionKind::Int => write!(f, "int"),
            OptionKind::Bool => write!(f, "bool"),
        }
    }
}

/// A parsed option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Str(_) => OptionKind::Str,
            OptionValue::Int(_) => OptionKind::Int,
            OptionValue::Bool(_) => OptionKind::Bool,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Str(s) => write!(f, "{s}"),
            OptionValue::Int(i) => write!(f, "{i}"),
            OptionValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Declaration of a single option: its name, default and help text.
///
/// The kind is the kind of the default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub default: OptionValue,
    pub usage: String,
}

impl OptionSpec {
    pub fn string<D, U>(name: &'static str, default: D, usage: U) -> Self
    where
        D: Into<String>,
        U: Into<String>,
    {
        Self { name, default: OptionValue::Str(default.into()), usage: usage.into() }
    }

    pub fn int<S: Into<String>>(name: &'static str, default: i64, usage: S) -> Self {
        Self { name, default: OptionValue::Int(default), usage: usage.into() }
    }

    /// A boolean flag, off unless given.
    pub fn flag<S: Into<String>>(name: &'static str, usage: S) -> Self {
        Self { name, default: OptionValue::Bool(false), usage: usage.into() }
    }

    pub fn kind(&self) -> OptionKind {
        self.default.kind()
    }
}

/// Option values handed to an action's entry point, keyed by option name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionValues {
    values: IndexMap<String, OptionValue>,
}

impl OptionValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values of every option of `action`, each set to its default.
    pub fn defaults(action: &Action) -> Self {
        let mut values = Self::new();
        for spec in &action.options {
            values.set(spec.name, spec.default.clone());
        }
        values
    }

    pub fn set<S: Into<String>>(&mut self, name: S, value: OptionValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_str(&self, name: &str) -> Result<&str> {
        match self.require(name)? {
            OptionValue::Str(s) => Ok(s),
            other => Err(mismatch(name, OptionKind::Str, other)),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<i64> {
        match self.require(name)? {
            OptionValue::Int(i) => Ok(*i),
            other => Err(mismatch(name, OptionKind::Int, other)),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.require(name)? {
            OptionValue::Bool(b) => Ok(*b),
            other => Err(mismatch(name, OptionKind::Bool, other)),
        }
    }

    fn require(&self, name: &str) -> Result<&OptionValue> {
        self.values
            .get(name)
            .ok_or_else(|| Error::ValidationError(format!("option '{name}' has no value")))
    }
}

fn mismatch(name: &str, expected: OptionKind, actual: &OptionValue) -> Error {
    Error::ValidationError(format!(
        "option '{name}' expects a {expected} value, got {} '{actual}'",
        actual.kind()
    ))
}

/// Entry point invoked by the dispatcher once option values are collected.
pub type EntryPoint = fn(&OptionValues) -> Result<()>;

/// A named, dispatchable action.
#[derive(Clone)]
pub struct Action {
    pub name: &'static str,
    pub aliases: Vec<&'static str>,
    pub usage: String,
    pub options: Vec<OptionSpec>,
    entry_point: EntryPoint,
}

impl Action {
    pub fn new<S: Into<String>>(name: &'static str, usage: S, entry_point: EntryPoint) -> Self {
        Self { name, aliases: Vec::new(), usage: usage.into(), options: Vec::new(), entry_point }
    }

    pub fn alias(mut self, alias: &'static str) -> Self {
        self.aliases.push(alias);
        self
    }

    pub fn option(mut self, spec: OptionSpec) -> Self {
        self.options.push(spec);
        self
    }

    /// Name followed by every alias.
    pub fn identifiers(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }

    pub fn answers_to(&self, name: &str) -> bool {
        self.identifiers().any(|id| id == name)
    }

    pub fn invoke(&self, values: &OptionValues) -> Result<()> {
        (self.entry_point)(values)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("usage", &self.usage)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Ordered, append-only collection of actions.
#[derive(Debug, Default)]
pub struct Registry {
    actions: Vec<Action>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `action`.
    ///
    /// # Errors
    /// * `Error::DuplicateAction` if its name or one of its aliases is already
    ///   used by a registered action, or repeats within the action itself
    pub fn register(&mut self, action: Action) -> Result<()> {
        let mut seen: Vec<&str> = Vec::new();
        for id in action.identifiers() {
            if seen.contains(&id) || self.find(id).is_some() {
                return Err(Error::DuplicateAction { name: id.to_string() });
            }
            seen.push(id);
        }
        self.actions.push(action);
        Ok(())
    }

    /// Every action in registration order.
    pub fn list(&self) -> &[Action] {
        &self.actions
    }

    /// Resolves an action by name or alias.
    pub fn find(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|action| action.answers_to(name))
    }
}
