//! Command-line and environment configuration.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::deploy::{DeployError, HostingProvider, MockProvider, VercelClient};

/// Default port for the gateway.
pub const DEFAULT_PORT: u16 = 8787;

/// Default hosting provider API base.
pub const DEFAULT_DEPLOY_URL: &str = "https://api.vercel.com";

/// Gateway configuration. Every flag can also be set from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "sitecanvas", version, about = "SiteCanvas project, codegen and deployment gateway")]
pub struct Config {
    /// Port to bind on localhost.
    #[arg(long, env = "SITECANVAS_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory to mirror projects into as JSON files. In-memory only when unset.
    #[arg(long, env = "SITECANVAS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Hosting provider API token. Deployments are simulated when unset.
    #[arg(long, env = "VERCEL_API_KEY", hide_env_values = true)]
    pub vercel_api_key: Option<String>,

    /// Team to deploy under.
    #[arg(long, env = "VERCEL_TEAM_ID")]
    pub vercel_team_id: Option<String>,

    /// Hosting provider API base URL.
    #[arg(long, env = "SITECANVAS_DEPLOY_URL", default_value = DEFAULT_DEPLOY_URL)]
    pub deploy_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: None,
            vercel_api_key: None,
            vercel_team_id: None,
            deploy_url: DEFAULT_DEPLOY_URL.to_string(),
        }
    }
}

impl Config {
    /// API token, if one is configured and non-blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.vercel_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Build the hosting provider this configuration selects.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::InvalidUrl`] if the deploy URL is malformed.
    pub fn hosting_provider(&self) -> Result<Arc<dyn HostingProvider>, DeployError> {
        match self.api_key() {
            Some(key) => {
                let client = VercelClient::new(
                    &self.deploy_url,
                    key,
                    self.vercel_team_id.clone().filter(|t| !t.trim().is_empty()),
                )?;
                Ok(Arc::new(client))
            }
            None => {
                tracing::warn!("No hosting provider token configured; deployments are simulated");
                Ok(Arc::new(MockProvider::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::try_parse_from([
            "sitecanvas",
            "--port",
            "9000",
            "--data-dir",
            "/tmp/projects",
            "--deploy-url",
            "http://127.0.0.1:1234",
        ])
        .expect("parse");
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/projects")));
        assert_eq!(config.deploy_url, "http://127.0.0.1:1234");
    }

    #[test]
    fn test_blank_key_selects_mock() {
        let config = Config {
            vercel_api_key: Some("   ".to_string()),
            ..Config::default()
        };
        assert!(config.api_key().is_none());
        let provider = config.hosting_provider().expect("provider");
        assert_eq!(provider.name(), "mock");
    }

    #[test]
    fn test_key_selects_vercel() {
        let config = Config {
            vercel_api_key: Some("token".to_string()),
            ..Config::default()
        };
        let provider = config.hosting_provider().expect("provider");
        assert_eq!(provider.name(), "vercel");
    }

    #[test]
    fn test_bad_deploy_url() {
        let config = Config {
            vercel_api_key: Some("token".to_string()),
            deploy_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.hosting_provider(),
            Err(DeployError::InvalidUrl(_))
        ));
    }
}
