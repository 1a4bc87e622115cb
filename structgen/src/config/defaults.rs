//! Default configuration values - single source of truth

/// Default MySQL host (local server)
pub const DB_HOST: &str = "127.0.0.1";

/// Default MySQL port
pub const DB_PORT: u16 = 3306;

/// Default table list (none; falls back to the single-table flag)
pub const TABLES: &str = "";

/// Default Go package name for generated files
pub const MODEL_PACKAGE: &str = "main";

/// Default output directory (current working directory)
pub const OUTPUT_DIR: &str = ".";

/// Optional settings file looked up in the working directory
pub const CONFIG_FILE: &str = "structgen";

/// Whether to continue with the next table after a failure
pub const KEEP_GOING: bool = false;

/// Whether to run `gofmt -w` on written files
pub const FORMAT: bool = false;

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;

/// Environment file read from the working directory
pub const DOTENV_FILE: &str = ".env";

/// Prefix for settings read from the environment (besides DB_* and TABLES)
pub const ENV_PREFIX: &str = "STRUCTGEN";
