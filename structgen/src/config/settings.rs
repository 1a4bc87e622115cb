//! Configuration settings for structgen

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults;
use crate::codegen::{FieldCase, UnknownTypePolicy};
use crate::error::{GenError, Result};

/// Unprefixed environment variables and the settings they fill
const ENV_KEYS: &[(&str, &str)] = &[
    ("DB_USER", "db_user"),
    ("DB_PASSWORD", "db_password"),
    ("DB_NAME", "db_name"),
    ("DB_HOST", "db_host"),
    ("DB_PORT", "db_port"),
    ("TABLES", "tables"),
];

/// Main configuration struct for code generation
///
/// `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `DB_HOST`, `DB_PORT` and `TABLES`
/// are read as-is; any other setting can be given as `STRUCTGEN_<NAME>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenConfig {
    /// MySQL user
    #[serde(default)]
    pub db_user: Option<String>,

    /// MySQL password
    #[serde(default)]
    pub db_password: Option<String>,

    /// Database holding the tables
    #[serde(default)]
    pub db_name: Option<String>,

    #[serde(default = "default_db_host")]
    pub db_host: String,

    #[serde(default = "default_db_port")]
    pub db_port: u16,

    /// Tables to generate (comma-separated); wins over `table`
    #[serde(default = "default_tables")]
    pub tables: String,

    /// Single table, used only when `tables` is empty
    #[serde(default)]
    pub table: Option<String>,

    /// Go package name written at the top of every file
    #[serde(default = "default_model_package")]
    pub model_package: String,

    /// Directory receiving `<table>.go` files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// What to emit for a column type outside the mapping table
    #[serde(default)]
    pub unknown_types: UnknownTypePolicy,

    /// How column and table names become Go identifiers
    #[serde(default)]
    pub field_case: FieldCase,

    /// Continue with the next table after a failure and report at the end
    #[serde(default = "default_keep_going")]
    pub keep_going: bool,

    /// Run `gofmt -w` on every written file (best effort)
    #[serde(default = "default_format")]
    pub format: bool,

    /// Dry run mode - print generated code without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

// Default value functions for serde
fn default_db_host() -> String {
    defaults::DB_HOST.to_string()
}
fn default_db_port() -> u16 {
    defaults::DB_PORT
}
fn default_tables() -> String {
    defaults::TABLES.to_string()
}
fn default_model_package() -> String {
    defaults::MODEL_PACKAGE.to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_DIR)
}
fn default_keep_going() -> bool {
    defaults::KEEP_GOING
}
fn default_format() -> bool {
    defaults::FORMAT
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            db_user: None,
            db_password: None,
            db_name: None,
            db_host: default_db_host(),
            db_port: default_db_port(),
            tables: default_tables(),
            table: None,
            model_package: default_model_package(),
            output_dir: default_output_dir(),
            unknown_types: UnknownTypePolicy::default(),
            field_case: FieldCase::default(),
            keep_going: default_keep_going(),
            format: default_format(),
            dry_run: default_dry_run(),
            log_level: None,
        }
    }
}

/// Command-line values layered on top of the loaded configuration
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub table: Option<String>,
    pub db_name: Option<String>,
    pub model_package: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub unknown_types: Option<UnknownTypePolicy>,
    pub field_case: Option<FieldCase>,
    pub keep_going: bool,
    pub format: bool,
    pub dry_run: bool,
}

impl Overrides {
    /// Apply the overrides. A `--db` value replaces `DB_NAME`.
    pub fn apply(self, config: &mut GenConfig) {
        if let Some(table) = self.table {
            config.table = Some(table);
        }
        if let Some(db_name) = self.db_name {
            config.db_name = Some(db_name);
        }
        if let Some(package) = self.model_package {
            config.model_package = package;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(policy) = self.unknown_types {
            config.unknown_types = policy;
        }
        if let Some(case) = self.field_case {
            config.field_case = case;
        }
        config.keep_going |= self.keep_going;
        config.format |= self.format;
        config.dry_run |= self.dry_run;
    }
}

impl GenConfig {
    /// Load `./.env` into the process environment.
    ///
    /// Only the working directory is consulted, never its parents. Returns
    /// the path that was loaded, or `None` when there is no such file.
    pub fn load_dotenv() -> Result<Option<PathBuf>> {
        Self::load_dotenv_from(Path::new(defaults::DOTENV_FILE))
    }

    fn load_dotenv_from(path: &Path) -> Result<Option<PathBuf>> {
        match dotenvy::from_path(path) {
            Ok(()) => Ok(Some(path.to_path_buf())),
            Err(err) if err.not_found() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(
            config_path,
            Environment::with_prefix(defaults::ENV_PREFIX),
            |name| std::env::var(name).ok(),
        )
    }

    fn load_with_env(
        config_path: Option<&Path>,
        env: Environment,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from config file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            // Try default locations
            builder = builder.add_source(File::with_name(defaults::CONFIG_FILE).required(false));
        }

        // Prefixed environment variables (STRUCTGEN_MODEL_PACKAGE, ...)
        builder = builder.add_source(env.prefix_separator("_").ignore_empty(true));

        // Well-known unprefixed names win over everything above
        for (var, key) in ENV_KEYS {
            let value = lookup(var).filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        let config: GenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Resolve the ordered list of tables to generate.
    ///
    /// A non-empty `tables` list wins over the single `table` value.
    pub fn table_list(&self) -> Result<Vec<String>> {
        let listed: Vec<String> = self
            .tables
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !listed.is_empty() {
            return Ok(listed);
        }

        match self.table.as_deref().map(str::trim) {
            Some(table) if !table.is_empty() => Ok(vec![table.to_string()]),
            _ => Err(GenError::NoTablesSelected),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model_package.trim().is_empty() {
            return Err(GenError::ValidationError(
                "model_package must not be empty".into(),
            ));
        }
        self.table_list()?;
        Ok(())
    }

    /// Presence checks for a live database connection
    pub fn validate_credentials(&self) -> Result<()> {
        if is_blank(&self.db_user) {
            return Err(GenError::ValidationError("DB_USER is not set".into()));
        }
        if is_blank(&self.db_name) {
            return Err(GenError::ValidationError(
                "DB_NAME is not set (or pass --db)".into(),
            ));
        }
        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;

    fn vars(vars: &[(&str, &str)]) -> Map<String, String> {
        let mut map = Map::new();
        for (key, value) in vars {
            map.insert(key.to_string(), value.to_string());
        }
        map
    }

    /// Load with `vars` standing in for the whole process environment
    fn load(config_path: Option<&Path>, env: &[(&str, &str)]) -> Result<GenConfig> {
        let map = vars(env);
        let prefixed = Environment::with_prefix(defaults::ENV_PREFIX).source(Some(map.clone()));
        GenConfig::load_with_env(config_path, prefixed, |name| map.get(name).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = GenConfig::default();
        assert_eq!(config.model_package, "main");
        assert_eq!(config.db_port, 3306);
        assert_eq!(config.unknown_types, UnknownTypePolicy::Placeholder);
        assert_eq!(config.field_case, FieldCase::Title);
        assert!(!config.keep_going);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_load_from_environment() {
        let config = load(
            None,
            &[
                ("DB_USER", "app"),
                ("DB_PASSWORD", "secret"),
                ("DB_NAME", "shop"),
                ("DB_PORT", "3307"),
                ("TABLES", "users,orders"),
            ],
        )
        .unwrap();
        assert_eq!(config.db_user.as_deref(), Some("app"));
        assert_eq!(config.db_password.as_deref(), Some("secret"));
        assert_eq!(config.db_name.as_deref(), Some("shop"));
        assert_eq!(config.db_port, 3307);
        assert_eq!(config.table_list().unwrap(), vec!["users", "orders"]);
    }

    #[test]
    fn test_load_from_file_then_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("structgen.toml");
        std::fs::write(
            &path,
            r#"
                db_name = "from_file"
                model_package = "models"
                unknown_types = "skip"
            "#,
        )
        .unwrap();

        let config = load(Some(&path), &[("DB_NAME", "from_env")]).unwrap();
        assert_eq!(config.db_name.as_deref(), Some("from_env"));
        assert_eq!(config.model_package, "models");
        assert_eq!(config.unknown_types, UnknownTypePolicy::Skip);
    }

    #[test]
    fn test_unrelated_environment_is_ignored() {
        let config = load(
            None,
            &[
                ("DB_USER", "app"),
                ("FORMAT", "json"),
                ("TABLE", "stale_from_shell"),
                ("KEEP_GOING", "maybe"),
            ],
        )
        .unwrap();
        assert_eq!(config.db_user.as_deref(), Some("app"));
        assert!(!config.format);
        assert!(!config.keep_going);
        assert_eq!(config.table, None);
        assert!(matches!(
            config.table_list(),
            Err(GenError::NoTablesSelected)
        ));
    }

    #[test]
    fn test_prefixed_environment() {
        let config = load(
            None,
            &[
                ("STRUCTGEN_MODEL_PACKAGE", "models"),
                ("STRUCTGEN_KEEP_GOING", "true"),
                ("STRUCTGEN_TABLE", "users"),
            ],
        )
        .unwrap();
        assert_eq!(config.model_package, "models");
        assert!(config.keep_going);
        assert_eq!(config.table_list().unwrap(), vec!["users"]);
    }

    #[test]
    fn test_empty_tables_variable_falls_back() {
        let config = load(None, &[("TABLES", " "), ("STRUCTGEN_TABLE", "users")]).unwrap();
        assert_eq!(config.table_list().unwrap(), vec!["users"]);
    }

    #[test]
    fn test_missing_dotenv_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = GenConfig::load_dotenv_from(&dir.path().join(".env")).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_dotenv_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "STRUCTGEN_TEST_DOTENV_LOADED=yes\n").unwrap();

        let loaded = GenConfig::load_dotenv_from(&path).unwrap();
        assert_eq!(loaded, Some(path));
        assert_eq!(
            std::env::var("STRUCTGEN_TEST_DOTENV_LOADED").as_deref(),
            Ok("yes")
        );
    }

    #[test]
    fn test_malformed_dotenv_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "STRUCTGEN_TEST_DOTENV_BROKEN=\"unterminated\n").unwrap();

        assert!(matches!(
            GenConfig::load_dotenv_from(&path),
            Err(GenError::ConfigError(_))
        ));
    }

    #[test]
    fn test_tables_win_over_single_table() {
        let config = GenConfig {
            tables: "users, orders ,".to_string(),
            table: Some("ignored".to_string()),
            ..Default::default()
        };
        assert_eq!(config.table_list().unwrap(), vec!["users", "orders"]);
    }

    #[test]
    fn test_single_table_fallback() {
        let config = GenConfig {
            table: Some("users".to_string()),
            ..Default::default()
        };
        assert_eq!(config.table_list().unwrap(), vec!["users"]);
    }

    #[test]
    fn test_no_table_selected() {
        let config = GenConfig::default();
        assert!(matches!(
            config.table_list(),
            Err(GenError::NoTablesSelected)
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_db_override_replaces_env_name() {
        let mut config = GenConfig {
            db_name: Some("from_env".to_string()),
            ..Default::default()
        };
        Overrides {
            db_name: Some("from_flag".to_string()),
            model_package: Some("models".to_string()),
            ..Default::default()
        }
        .apply(&mut config);
        assert_eq!(config.db_name.as_deref(), Some("from_flag"));
        assert_eq!(config.model_package, "models");
    }

    #[test]
    fn test_validate_credentials() {
        let mut config = GenConfig {
            db_user: Some("app".to_string()),
            ..Default::default()
        };
        assert!(config.validate_credentials().is_err());

        config.db_name = Some("shop".to_string());
        assert!(config.validate_credentials().is_ok());
    }

    #[test]
    fn test_config_with_log_level() {
        let toml_content = r#"
            tables = "users"
            log_level = "debug"
        "#;
        let config: GenConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.log_level, Some("debug".to_string()));
    }
}
