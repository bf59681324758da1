//! conseil scaffolds backend applications from bundled templates.
//! It provides a command registry, a template catalog and engine, and the
//! staged pipeline that writes the application, its database wiring and
//! initializes external tooling.

/// Built-in actions and the ordered construction of the registry
pub mod actions;

/// Read-only template asset catalogs (embedded or directory backed)
pub mod catalog;

/// Command-line dispatch built from the registry
pub mod cli;

/// Defaults file handling
/// Supports JSON and YAML formats (conseil.json, conseil.yml, conseil.yaml)
pub mod config;

/// Common constants: template paths, generated file names, defaults
pub mod constants;

/// Error types and handling
pub mod error;

/// Logger initialization
pub mod logger;

/// Staged application generation
/// Creates the application, stages migrations, wires the database and
/// initializes dependency management and version control
pub mod pipeline;

/// Actions, their options and the registry holding them
pub mod registry;

/// Template set construction, rendering and variant listing
pub mod template;

/// External tool invocation
pub mod tool;
