//! Validate config command implementation

use crate::adapters::postgresql::client::redact_connection_string;
use crate::config::load_config;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!(
            "  PostgreSQL: {}",
            redact_connection_string(config.postgresql.connection_string.expose_secret())
        );
        println!("  Max Connections: {}", config.postgresql.max_connections);
        println!("  SSL Mode: {}", config.postgresql.ssl_mode);
        println!("  Chunk Size: {}", config.export.chunk_size);
        println!("  Workers: {}", config.export.worker_count);
        println!("  Batch Size: {}", config.export.batch_size);
        println!("  Tables:");
        for mapping in &config.tables {
            let key = match &mapping.primary_key {
                Some(pk) if pk.is_empty() => "none".to_string(),
                Some(pk) => pk.join(", "),
                None => "reflected".to_string(),
            };
            println!(
                "    {} -> {} (primary key: {key})",
                mapping.item_type, mapping.table
            );
        }
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_invalid_file_returns_config_exit_code() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[postgresql]\nconnection_string = \"mysql://x\"\n")
            .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_missing_file_returns_config_exit_code() {
        let code = ValidateArgs {}.execute("does-not-exist.toml").await.unwrap();
        assert_eq!(code, 2);
    }
}
