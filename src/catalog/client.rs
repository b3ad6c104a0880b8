//! HTTP client for the external track catalog.

use super::models::{CatalogTrack, SearchResponse, TokenResponse};
use crate::config::CatalogSettings;
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::blocking::Client;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Client-credentials catalog client.
///
/// The bearer token is cached in-process until its expiry. The cache lock is
/// held across the exchange, so concurrent first requests share a single
/// in-flight token fetch instead of issuing duplicates.
pub struct CatalogClient {
    client: Client,
    settings: CatalogSettings,
    cached_token: Mutex<Option<CachedToken>>,
}

impl CatalogClient {
    pub fn new(settings: CatalogSettings) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            settings,
            cached_token: Mutex::new(None),
        })
    }

    /// Returns a valid bearer token, exchanging the client credentials when
    /// the cached one is absent or expired.
    fn get_token(&self) -> Result<String> {
        let mut cached = self.cached_token.lock().unwrap();
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let encoded = BASE64.encode(format!(
            "{}:{}",
            self.settings.client_id, self.settings.client_secret
        ));
        let response = self
            .client
            .post(&self.settings.token_url)
            .header("Authorization", format!("Basic {}", encoded))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .context("Failed to reach the catalog token endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!("Token exchange failed with status {}", response.status());
        }

        let body: TokenResponse = response
            .json()
            .context("Unexpected token response body")?;
        debug!("Refreshed catalog token, valid for {}s", body.expires_in);

        let value = body.access_token;
        *cached = Some(CachedToken {
            value: value.clone(),
            expires_at: Instant::now() + Duration::from_secs(body.expires_in),
        });
        Ok(value)
    }

    /// Searches the catalog for tracks. An unexpected response body yields
    /// an empty list; transport failures are returned to the caller.
    pub fn search(&self, query: &str) -> Result<Vec<CatalogTrack>> {
        let token = self.get_token()?;

        let url = format!(
            "{}?q={}&type=track&limit={}",
            self.settings.search_url,
            urlencoding::encode(query),
            self.settings.search_limit,
        );
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .context("Failed to reach the catalog search endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!("Catalog search failed with status {}", response.status());
        }

        let body: SearchResponse = response.json().unwrap_or_default();
        Ok(body.tracks.and_then(|t| t.items).unwrap_or_default())
    }
}
