//! conseil's main application entry point.
//! Builds the action registry, parses the command line, applies option
//! defaults and dispatches to the selected action.

use conseil::{
    actions::builtin,
    cli::{get_matches, is_verbose, resolve},
    config::get_settings,
    error::{default_error_handler, Result},
    logger::init_logger,
};

/// Main application entry point.
fn main() {
    if let Err(err) = run() {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Registers the built-in actions
/// 2. Parses arguments and initializes logging
/// 3. Applies defaults from `CONSEIL_CONFIG` or the current directory
/// 4. Runs the selected action
fn run() -> Result<()> {
    let registry = builtin()?;

    let matches = get_matches(&registry, std::env::args_os());
    init_logger(is_verbose(&matches));

    resolve(&registry, &matches, get_settings)?.run()
}
