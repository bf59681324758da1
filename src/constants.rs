//! Common constants used throughout conseil.

/// Suffix marking a catalog entry as a template body
pub const TEMPLATE_SUFFIX: &str = ".tpl";

/// Virtual prefix of the application skeletons
pub const APP_PREFIX: &str = "templates/app/";

/// Virtual prefix of the REST-style skeletons
pub const REST_PREFIX: &str = "templates/rest/";

/// Migration stubs rendered by the migration stage, paired with their output names
pub const MIGRATION_TEMPLATES: [(&str, &str); 2] = [
    ("templates/sql/1.up.tpl", "1.up.sql"),
    ("templates/sql/1.down.tpl", "1.down.sql"),
];

/// Database wiring templates, paired with their output names
pub const DATABASE_TEMPLATES: [(&str, &str); 2] = [
    ("templates/sql/migrations.tpl", "migrations.go"),
    ("templates/sql/sql.tpl", "sql.go"),
];

pub const GITIGNORE_TEMPLATE: &str = "templates/gitignore.tpl";

/// Generated file names and directories, relative to the target directory
pub const APP_FILE: &str = "app.go";
pub const PROTO_DIR: &str = "proto";
pub const PROTO_FILE: &str = "rpc.proto";
pub const SQL_DIR: &str = "sql";
pub const MIGRATIONS_DIR: &str = "migrations";
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Skeletons that additionally get a protocol definition placeholder
pub const RPC_FRAMEWORKS: [&str; 1] = ["grpc"];

/// Database drivers with a known connection string and import path
pub const SUPPORTED_DRIVERS: [&str; 2] = ["postgres", "sqlite3"];

/// Built-in option defaults
pub const DEFAULT_DIR: &str = ".";
pub const DEFAULT_FRAMEWORK: &str = "gin";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 8080;
pub const DEFAULT_DRIVER: &str = "postgres";
pub const DEFAULT_REPO: &str = "github.com";

/// App name used when none can be derived from the target directory
pub const FALLBACK_APP_NAME: &str = "app";

/// Supported defaults file names
pub const CONFIG_FILES: [&str; 3] = ["conseil.json", "conseil.yml", "conseil.yaml"];

/// Environment variable pointing at an explicit defaults file
pub const CONFIG_ENV: &str = "CONSEIL_CONFIG";
