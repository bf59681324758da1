//! Built-in actions.
//! The registry is assembled here in a fixed order with the built-in option
//! defaults. A defaults file is applied later, when arguments are resolved.

use crate::catalog::EmbeddedCatalog;
use crate::constants::{
    DEFAULT_DIR, DEFAULT_DRIVER, DEFAULT_FRAMEWORK, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_REPO,
    SUPPORTED_DRIVERS,
};
use crate::error::Result;
use crate::pipeline::{scaffold, NewOptions};
use crate::registry::{Action, OptionSpec, OptionValues, Registry};
use crate::template::available_frameworks;
use crate::tool::SystemInvoker;

/// Builds the registry of every built-in action.
pub fn builtin() -> Result<Registry> {
    let mut registry = Registry::new();
    registry.register(new_action()?)?;
    registry.register(frameworks_action())?;
    Ok(registry)
}

/// `new`: bootstraps an application from the bundled templates.
pub fn new_action() -> Result<Action> {
    let frameworks = available_frameworks(&EmbeddedCatalog)?;

    Ok(Action::new("new", "bootstrap a new application", new_app)
        .alias("n")
        .option(OptionSpec::string("dir", DEFAULT_DIR, "directory to generate the application in"))
        .option(OptionSpec::string(
            "framework",
            DEFAULT_FRAMEWORK,
            format!("app framework [i.e. {}]", frameworks.join(", ")),
        ))
        .option(OptionSpec::string("host", DEFAULT_HOST, "ip address to bind"))
        .option(OptionSpec::int("port", DEFAULT_PORT, "local port to bind"))
        .option(OptionSpec::flag(
            "migrations",
            "whether or not to include support for database migrations",
        ))
        .option(OptionSpec::string(
            "driver",
            DEFAULT_DRIVER,
            format!("database driver [i.e. {}]", SUPPORTED_DRIVERS.join(", ")),
        ))
        .option(OptionSpec::string("repo", DEFAULT_REPO, "the git module repository"))
        .option(OptionSpec::flag(
            "dep",
            "whether or not to initialize dependency management through dep",
        ))
        .option(OptionSpec::flag(
            "mod",
            "whether or not to initialize dependency management using go modules",
        ))
        .option(OptionSpec::flag("git", "whether or not to initialize git repo")))
}

/// `frameworks`: prints the selectable application variants.
pub fn frameworks_action() -> Action {
    Action::new("frameworks", "list the available app frameworks", print_frameworks).alias("ls")
}

fn new_app(values: &OptionValues) -> Result<()> {
    let options = NewOptions::from_values(values)?;
    let invoker = SystemInvoker::new(&options.target_dir);
    let app_name = scaffold(&EmbeddedCatalog, &invoker, &options)?;
    println!("Application '{}' generated in {}.", app_name, options.target_dir.display());
    Ok(())
}

fn print_frameworks(_: &OptionValues) -> Result<()> {
    for framework in available_frameworks(&EmbeddedCatalog)? {
        println!("{framework}");
    }
    Ok(())
}
