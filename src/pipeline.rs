//! Application generation pipeline.
//! Runs the scaffolding stages in a fixed order against a target directory,
//! stopping at the first failing stage. Files written by earlier stages are
//! left in place.

use crate::catalog::Catalog;
use crate::constants::{
    APP_FILE, DATABASE_TEMPLATES, DEFAULT_DIR, DEFAULT_DRIVER, DEFAULT_FRAMEWORK, DEFAULT_HOST,
    DEFAULT_PORT, DEFAULT_REPO, FALLBACK_APP_NAME, GITIGNORE_FILE, GITIGNORE_TEMPLATE,
    MIGRATIONS_DIR, MIGRATION_TEMPLATES, PROTO_DIR, PROTO_FILE, RPC_FRAMEWORKS, SQL_DIR,
};
use crate::error::{Error, Result};
use crate::registry::OptionValues;
use crate::template::{application_template, GenerationContext, TemplateSet};
use crate::tool::ToolInvoker;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// How dependency management is initialized after generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DependencyMode {
    #[default]
    None,
    /// `dep init`
    Dep,
    /// `go mod init` followed by `go get`
    Modules,
}

/// Options of a single `new` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOptions {
    pub target_dir: PathBuf,
    pub framework: String,
    pub host: String,
    pub port: u16,
    pub migrations: bool,
    pub driver: String,
    pub repo: String,
    pub dependencies: DependencyMode,
    pub git: bool,
}

impl Default for NewOptions {
    fn default() -> Self {
        Self {
            target_dir: PathBuf::from(DEFAULT_DIR),
            framework: DEFAULT_FRAMEWORK.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT as u16,
            migrations: false,
            driver: DEFAULT_DRIVER.to_string(),
            repo: DEFAULT_REPO.to_string(),
            dependencies: DependencyMode::None,
            git: false,
        }
    }
}

impl NewOptions {
    /// Builds typed options from the values collected by the dispatcher.
    ///
    /// # Errors
    /// * `Error::ValidationError` if a value is missing or has the wrong kind,
    ///   the port is out of range, or both `dep` and `mod` are set
    pub fn from_values(values: &OptionValues) -> Result<Self> {
        let port = values.get_int("port")?;
        let port = u16::try_from(port)
            .map_err(|_| Error::ValidationError(format!("port {port} is out of range")))?;

        let dependencies = match (values.get_bool("dep")?, values.get_bool("mod")?) {
            (true, true) => {
                return Err(Error::ValidationError(
                    "--dep and --mod are mutually exclusive".to_string(),
                ))
            }
            (true, false) => DependencyMode::Dep,
            (false, true) => DependencyMode::Modules,
            (false, false) => DependencyMode::None,
        };

        Ok(Self {
            target_dir: PathBuf::from(values.get_str("dir")?),
            framework: values.get_str("framework")?.to_string(),
            host: values.get_str("host")?.to_string(),
            port,
            migrations: values.get_bool("migrations")?,
            driver: values.get_str("driver")?.to_string(),
            repo: values.get_str("repo")?.to_string(),
            dependencies,
            git: values.get_bool("git")?,
        })
    }
}

/// Connection details derived from a database driver name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConnection {
    pub connection_string: String,
    pub import_path: &'static str,
}

/// Resolves the connection string and driver import path for `driver`.
///
/// # Errors
/// * `Error::UnsupportedDriver` for anything but `postgres` and `sqlite3`
pub fn resolve_driver(driver: &str, app_name: &str) -> Result<DriverConnection> {
    match driver {
        "postgres" => Ok(DriverConnection {
            connection_string: format!("postgres://localhost:5432/{app_name}"),
            import_path: "github.com/lib/pq",
        }),
        "sqlite3" => Ok(DriverConnection {
            connection_string: format!("file:{app_name}.sqlite"),
            import_path: "github.com/mattn/go-sqlite3",
        }),
        _ => Err(Error::UnsupportedDriver { driver: driver.to_string() }),
    }
}

/// Base name of `dir`, resolved through the filesystem when it exists.
pub fn app_name<P: AsRef<Path>>(dir: P) -> String {
    let dir = dir.as_ref();
    let resolved = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_APP_NAME.to_string())
}

fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::filesystem(path, e))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    debug!("Writing file: {}", path.display());
    fs::write(path, content).map_err(|e| Error::filesystem(path, e))
}

fn log_output(output: &str) {
    if !output.is_empty() {
        info!("{output}");
    }
}

/// The ordered generation stages of a `new` run.
pub struct Pipeline<'a> {
    templates: &'a TemplateSet,
    invoker: &'a dyn ToolInvoker,
    options: &'a NewOptions,
    app_name: String,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        templates: &'a TemplateSet,
        invoker: &'a dyn ToolInvoker,
        options: &'a NewOptions,
    ) -> Self {
        let app_name = app_name(&options.target_dir);
        Self { templates, invoker, options, app_name }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Runs every enabled stage in order.
    ///
    /// # Flow
    /// 1. Creates the application entry file
    /// 2. Stages migrations and wires the database, when migrations are enabled
    /// 3. Initializes dependency management, when a mode is selected
    /// 4. Initializes version control, when requested
    pub fn run(&self) -> Result<()> {
        self.create_application()?;

        if self.options.migrations {
            self.stage_migrations()?;
            self.setup_database()?;
        }

        self.init_dependencies()?;

        if self.options.git {
            self.init_version_control()?;
        }
        Ok(())
    }

    /// Renders the selected skeleton into `app.go`.
    ///
    /// RPC skeletons also get an empty `proto/rpc.proto`.
    ///
    /// # Errors
    /// * `Error::UnsupportedFramework` before anything is written if no
    ///   skeleton matches the framework
    pub fn create_application(&self) -> Result<()> {
        let template = application_template(self.templates, &self.options.framework)?;
        let context = GenerationContext {
            host: self.options.host.clone(),
            port: self.options.port,
            migrations: self.options.migrations,
            ..Default::default()
        };
        let content = self.templates.render(&template, &context)?;

        info!("creating app...");
        let target = &self.options.target_dir;
        create_dir_all(target)?;
        write_file(&target.join(APP_FILE), &content)?;

        if RPC_FRAMEWORKS.contains(&self.options.framework.as_str()) {
            let proto = target.join(PROTO_DIR);
            create_dir_all(&proto)?;
            write_file(&proto.join(PROTO_FILE), "")?;
        }
        Ok(())
    }

    /// Writes the first up and down migration stubs into `sql/migrations/`.
    pub fn stage_migrations(&self) -> Result<()> {
        info!("staging migrations...");
        let dir = self.options.target_dir.join(SQL_DIR).join(MIGRATIONS_DIR);
        create_dir_all(&dir)?;

        for (template, file) in MIGRATION_TEMPLATES {
            let content = self.templates.render(template, GenerationContext::default())?;
            write_file(&dir.join(file), &content)?;
        }
        Ok(())
    }

    /// Writes the database wiring files into `sql/`.
    ///
    /// # Errors
    /// * `Error::UnsupportedDriver` before anything is written if the driver
    ///   is not supported
    pub fn setup_database(&self) -> Result<()> {
        let connection = resolve_driver(&self.options.driver, &self.app_name)?;
        info!("setting up {} database...", self.options.driver);

        let dir = self.options.target_dir.join(SQL_DIR);
        create_dir_all(&dir)?;

        let context = GenerationContext {
            driver: self.options.driver.clone(),
            connection_string: connection.connection_string,
            import_path: connection.import_path.to_string(),
            ..Default::default()
        };
        for (template, file) in DATABASE_TEMPLATES {
            let content = self.templates.render(template, &context)?;
            write_file(&dir.join(file), &content)?;
        }
        Ok(())
    }

    /// Initializes dependency management according to the selected mode.
    pub fn init_dependencies(&self) -> Result<()> {
        match self.options.dependencies {
            DependencyMode::None => Ok(()),
            DependencyMode::Dep => {
                info!("initializing dependencies...");
                log_output(&self.invoker.run("dep", &["init"])?);
                Ok(())
            }
            DependencyMode::Modules => {
                let module = self.module_path();
                info!("initializing go module {module}...");
                log_output(&self.invoker.run("go", &["mod", "init", &module])?);

                info!("resolving dependencies...");
                log_output(&self.invoker.run("go", &["get"])?);
                Ok(())
            }
        }
    }

    /// Writes `.gitignore` and runs `git init`.
    ///
    /// The ignore file is rendered first; `git` is not invoked if that fails.
    pub fn init_version_control(&self) -> Result<()> {
        let context = GenerationContext { app_name: self.app_name.clone(), ..Default::default() };
        let content = self.templates.render(GITIGNORE_TEMPLATE, &context)?;
        write_file(&self.options.target_dir.join(GITIGNORE_FILE), &content)?;

        info!("initializing repo...");
        log_output(&self.invoker.run("git", &["init"])?);
        Ok(())
    }

    /// Module path `<repo>/<git user>/<app name>`.
    pub fn module_path(&self) -> String {
        format!("{}/{}/{}", self.options.repo, self.git_username(), self.app_name)
    }

    /// The configured git user name, or the app name when git has none.
    fn git_username(&self) -> String {
        debug!("checking git configuration...");
        match self.invoker.run("git", &["config", "--get", "user.name"]) {
            Ok(name) if !name.trim().is_empty() => name.trim().to_string(),
            Ok(_) => self.app_name.clone(),
            Err(e) => {
                debug!("{e}; using '{}' as module owner", self.app_name);
                self.app_name.clone()
            }
        }
    }
}

/// Builds the template set from `catalog` and runs the pipeline.
///
/// # Returns
/// * `Result<String>` - Name of the generated application
pub fn scaffold(
    catalog: &dyn Catalog,
    invoker: &dyn ToolInvoker,
    options: &NewOptions,
) -> Result<String> {
    let templates = TemplateSet::build(catalog)?;
    let pipeline = Pipeline::new(&templates, invoker, options);
    pipeline.run()?;
    Ok(pipeline.app_name().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::OptionValue;

    fn values() -> OptionValues {
        let mut values = OptionValues::new();
        values.set("dir", OptionValue::Str("./demo".to_string()));
        values.set("framework", OptionValue::Str("echo".to_string()));
        values.set("host", OptionValue::Str("0.0.0.0".to_string()));
        values.set("port", OptionValue::Int(9000));
        values.set("migrations", OptionValue::Bool(true));
        values.set("driver", OptionValue::Str("sqlite3".to_string()));
        values.set("repo", OptionValue::Str("gitlab.com".to_string()));
        values.set("dep", OptionValue::Bool(false));
        values.set("mod", OptionValue::Bool(true));
        values.set("git", OptionValue::Bool(true));
        values
    }

    #[test]
    fn test_options_from_values() {
        let options = NewOptions::from_values(&values()).unwrap();
        assert_eq!(options.target_dir, PathBuf::from("./demo"));
        assert_eq!(options.framework, "echo");
        assert_eq!(options.port, 9000);
        assert!(options.migrations);
        assert_eq!(options.dependencies, DependencyMode::Modules);
        assert!(options.git);
    }

    #[test]
    fn test_dep_and_mod_conflict() {
        let mut values = values();
        values.set("dep", OptionValue::Bool(true));
        assert!(matches!(NewOptions::from_values(&values), Err(Error::ValidationError(_))));
    }

    #[test]
    fn test_port_out_of_range() {
        let mut values = values();
        values.set("port", OptionValue::Int(70000));
        assert!(matches!(NewOptions::from_values(&values), Err(Error::ValidationError(_))));
    }

    #[test]
    fn test_resolve_driver() {
        let pg = resolve_driver("postgres", "shop").unwrap();
        assert_eq!(pg.connection_string, "postgres://localhost:5432/shop");
        assert_eq!(pg.import_path, "github.com/lib/pq");

        let sqlite = resolve_driver("sqlite3", "shop").unwrap();
        assert_eq!(sqlite.connection_string, "file:shop.sqlite");
        assert_eq!(sqlite.import_path, "github.com/mattn/go-sqlite3");

        assert!(matches!(
            resolve_driver("oracle", "shop"),
            Err(Error::UnsupportedDriver { driver }) if driver == "oracle"
        ));
    }

    #[test]
    fn test_app_name() {
        assert_eq!(app_name("/definitely/missing/shop"), "shop");
        assert_eq!(app_name("/"), FALLBACK_APP_NAME);
    }
}
