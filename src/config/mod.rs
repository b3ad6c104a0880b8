mod file_config;

pub use file_config::{CatalogFileConfig, FileConfig};

use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub const CLIENT_ID_ENV: &str = "MIXTAPE_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "MIXTAPE_CLIENT_SECRET";

const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_SEARCH_URL: &str = "https://api.spotify.com/v1/search";
const DEFAULT_SEARCH_LIMIT: usize = 10;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML
/// config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub storage_dir: Option<PathBuf>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// Resolved catalog client settings. Present only when both secrets were
/// supplied; without them catalog search is disabled.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub search_url: String,
    pub search_limit: usize,
}

impl CatalogSettings {
    /// Settings with the default endpoints, for callers that only carry the
    /// two secrets.
    pub fn new(client_id: String, client_secret: String) -> CatalogSettings {
        CatalogSettings {
            client_id,
            client_secret,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_dir: PathBuf,
    pub catalog: Option<CatalogSettings>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file
    /// config. TOML values override CLI values where present; the catalog
    /// secrets fall back to the environment.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let storage_dir = file
            .storage_dir
            .map(PathBuf::from)
            .or_else(|| cli.storage_dir.clone())
            .ok_or_else(|| {
                anyhow!("storage_dir must be specified via --storage-dir or in config file")
            })?;

        let catalog_file = file.catalog.unwrap_or_default();

        let client_id = catalog_file
            .client_id
            .or_else(|| cli.client_id.clone())
            .or_else(|| std::env::var(CLIENT_ID_ENV).ok());
        let client_secret = catalog_file
            .client_secret
            .or_else(|| cli.client_secret.clone())
            .or_else(|| std::env::var(CLIENT_SECRET_ENV).ok());

        let catalog = match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Some(CatalogSettings {
                client_id,
                client_secret,
                token_url: catalog_file
                    .token_url
                    .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
                search_url: catalog_file
                    .search_url
                    .unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string()),
                search_limit: catalog_file.search_limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
            }),
            _ => None,
        };

        Ok(Self {
            storage_dir,
            catalog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_cli_only() {
        let cli = CliConfig {
            storage_dir: Some(PathBuf::from("/data")),
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
        };

        let config = AppConfig::resolve(&cli, None).unwrap();

        assert_eq!(config.storage_dir, PathBuf::from("/data"));
        let catalog = config.catalog.unwrap();
        assert_eq!(catalog.client_id, "id");
        assert_eq!(catalog.client_secret, "secret");
        assert_eq!(catalog.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(catalog.search_url, DEFAULT_SEARCH_URL);
        assert_eq!(catalog.search_limit, 10);
    }

    #[test]
    fn test_resolve_toml_overrides_cli() {
        let cli = CliConfig {
            storage_dir: Some(PathBuf::from("/should/be/overridden")),
            client_id: Some("cli-id".to_string()),
            client_secret: Some("cli-secret".to_string()),
        };

        let file_config: FileConfig = toml::from_str(
            r#"
            storage_dir = "/toml/data"

            [catalog]
            client_id = "toml-id"
            search_limit = 25
            "#,
        )
        .unwrap();

        let config = AppConfig::resolve(&cli, Some(file_config)).unwrap();

        // TOML values should override CLI
        assert_eq!(config.storage_dir, PathBuf::from("/toml/data"));
        let catalog = config.catalog.unwrap();
        assert_eq!(catalog.client_id, "toml-id");
        assert_eq!(catalog.search_limit, 25);
        // CLI value used when TOML doesn't specify
        assert_eq!(catalog.client_secret, "cli-secret");
    }

    #[test]
    fn test_resolve_missing_storage_dir_error() {
        let cli = CliConfig::default();
        let result = AppConfig::resolve(&cli, None);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("storage_dir must be specified"));
    }

    #[test]
    fn test_resolve_catalog_disabled_without_both_secrets() {
        let cli = CliConfig {
            storage_dir: Some(PathBuf::from("/data")),
            client_id: Some("id".to_string()),
            client_secret: None,
        };

        // Only meaningful when the env fallback is not set.
        if std::env::var(CLIENT_SECRET_ENV).is_err() {
            let config = AppConfig::resolve(&cli, None).unwrap();
            assert!(config.catalog.is_none());
        }
    }
}
