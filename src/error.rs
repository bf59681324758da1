//! Error handling for conseil.
//! Defines the error taxonomy and result type shared by the registry,
//! the template engine and every pipeline stage.

use std::io;
use thiserror::Error;

/// Errors that can occur while dispatching an action or scaffolding an application.
///
/// Stages never terminate the process themselves; they return one of these
/// variants and leave the decision to [`default_error_handler`].
#[derive(Error, Debug)]
pub enum Error {
    /// A named asset is missing from the catalog.
    #[error("asset '{name}' not found")]
    NotFound { name: String },

    /// An asset exists but cannot be used as a template body.
    #[error("asset '{name}' is not a valid template: {reason}")]
    InvalidAsset { name: String, reason: String },

    /// A template body failed to parse while building the template set.
    #[error("failed to parse template '{path}': {source}")]
    TemplateParseError {
        path: String,
        #[source]
        source: minijinja::Error,
    },

    /// A template lookup missed.
    #[error("template '{path}' not found")]
    TemplateNotFound { path: String },

    /// Rendering failed, typically because of an unresolved placeholder.
    #[error("failed to render template '{path}': {source}")]
    RenderError {
        path: String,
        #[source]
        source: minijinja::Error,
    },

    /// No application template exists for the requested variant.
    #[error("unable to find a '{framework}' app framework template")]
    UnsupportedFramework { framework: String },

    /// The database driver is not in the supported allow-list.
    #[error("{driver} is not a supported database driver")]
    UnsupportedDriver { driver: String },

    /// An external executable could not be started or exited unsuccessfully.
    #[error("unable to run '{tool}': {output}")]
    ToolInvocationError { tool: String, output: String },

    /// A directory or file could not be created or written.
    #[error("filesystem error at '{path}': {source}")]
    FilesystemError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// An action name or alias is already taken.
    #[error("action '{name}' is already registered")]
    DuplicateAction { name: String },

    /// Option values that do not satisfy an action's requirements.
    #[error("Validation error: {0}.")]
    ValidationError(String),

    /// Errors loading or parsing the defaults file.
    #[error("Configuration error: {0}.")]
    ConfigError(String),
}

impl Error {
    pub(crate) fn filesystem<P: AsRef<std::path::Path>>(path: P, source: io::Error) -> Self {
        Error::FilesystemError { path: path.as_ref().display().to_string(), source }
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to report
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("{err}");
    std::process::exit(1);
}
