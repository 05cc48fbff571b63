//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ChainsinkConfig;
use crate::config::secret_string;
use crate::domain::errors::SinkError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ChainsinkConfig
/// 4. Applies environment variable overrides (CHAINSINK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read, a referenced
/// environment variable is missing, parsing fails or validation fails.
///
/// # Examples
///
/// ```no_run
/// use chainsink::config::loader::load_config;
///
/// let config = load_config("chainsink.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ChainsinkConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SinkError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SinkError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text, applying substitution, overrides and validation
///
/// # Errors
///
/// Same as [`load_config`], minus file access.
pub fn parse_config(contents: &str) -> Result<ChainsinkConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ChainsinkConfig = toml::from_str(&contents)
        .map_err(|e| SinkError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        SinkError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SinkError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(SinkError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    let mut result = lines.join("\n");
    if input.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|val| val.parse().ok())
}

/// Applies environment variable overrides using the CHAINSINK_* prefix
///
/// Variables follow the pattern CHAINSINK_<SECTION>_<KEY>, for example
/// CHAINSINK_EXPORT_WORKER_COUNT. Values that fail to parse are ignored.
fn apply_env_overrides(config: &mut ChainsinkConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("CHAINSINK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env_parse("CHAINSINK_APPLICATION_DRY_RUN") {
        config.application.dry_run = val;
    }

    // PostgreSQL overrides
    if let Ok(val) = std::env::var("CHAINSINK_POSTGRESQL_CONNECTION_STRING") {
        config.postgresql.connection_string = secret_string(val);
    }
    if let Some(val) = env_parse("CHAINSINK_POSTGRESQL_MAX_CONNECTIONS") {
        config.postgresql.max_connections = val;
    }
    if let Some(val) = env_parse("CHAINSINK_POSTGRESQL_STATEMENT_TIMEOUT_SECONDS") {
        config.postgresql.statement_timeout_seconds = val;
    }
    if let Ok(val) = std::env::var("CHAINSINK_POSTGRESQL_SSL_MODE") {
        config.postgresql.ssl_mode = val;
    }
    if let Some(val) = env_parse("CHAINSINK_POSTGRESQL_PRINT_SQL") {
        config.postgresql.print_sql = val;
    }

    // Export overrides
    if let Some(val) = env_parse("CHAINSINK_EXPORT_CHUNK_SIZE") {
        config.export.chunk_size = val;
    }
    if let Some(val) = env_parse("CHAINSINK_EXPORT_WORKER_COUNT") {
        config.export.worker_count = val;
    }
    if let Some(val) = env_parse("CHAINSINK_EXPORT_BATCH_SIZE") {
        config.export.batch_size = val;
    }

    // Logging overrides
    if let Some(val) = env_parse("CHAINSINK_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val;
    }
    if let Ok(val) = std::env::var("CHAINSINK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("CHAINSINK_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}
