//! Google OAuth session persistence and refresh.
//!
//! One session file per account, stored as TOML under
//! `~/.config/daydeck/sessions/`. Files hold live tokens, so they are
//! written owner-only on unix.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app_config;

pub(crate) const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// The stored session can no longer be refreshed (token expired or
/// revoked). Callers downcast to this to show a "reconnect" state
/// instead of a hard error.
#[derive(Debug, thiserror::Error)]
#[error("Google session expired; run `daydeck auth google` to reconnect")]
pub struct NeedsReauth;

pub struct Session {
    account_email: String,
    data: SessionData,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

/// Token endpoint response, shared by the initial exchange and refresh.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

impl SessionData {
    pub(crate) fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Google usually omits the refresh token outside the first consent,
    /// so a previous one can be carried over.
    pub(crate) fn from_token_response(
        tokens: TokenResponse,
        previous_refresh_token: Option<&str>,
    ) -> Result<Self> {
        let refresh_token = tokens
            .refresh_token
            .or_else(|| previous_refresh_token.map(String::from))
            .context("Token response carried no refresh token")?;

        Ok(SessionData {
            access_token: tokens.access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(tokens.expires_in),
        })
    }
}

impl Session {
    pub fn new(account_email: &str, data: SessionData) -> Self {
        Session {
            account_email: account_email.to_string(),
            data,
        }
    }

    fn sessions_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Could not determine config directory")?
            .join("daydeck")
            .join("sessions"))
    }

    fn path_for_account_email(account_email: &str) -> Result<PathBuf> {
        let email_slug = account_email.replace(['/', '\\', ':'], "_");

        Ok(Self::sessions_dir()?.join(format!("{}.toml", email_slug)))
    }

    fn path(&self) -> Result<PathBuf> {
        Self::path_for_account_email(&self.account_email)
    }

    pub fn account_email(&self) -> &str {
        &self.account_email
    }

    pub fn access_token(&self) -> &str {
        &self.data.access_token
    }

    pub fn exists(account_email: &str) -> bool {
        Self::path_for_account_email(account_email)
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Remove the stored session, if any. Used by `auth disconnect`.
    pub fn delete(account_email: &str) -> Result<()> {
        let path = Self::path_for_account_email(account_email)?;

        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove session at {}", path.display()))?;
        }

        Ok(())
    }

    // Load a session and refresh it if expired:
    pub async fn load_valid(client: &reqwest::Client, account_email: &str) -> Result<Self> {
        let mut session = Self::load(account_email)?;

        if session.is_expired() {
            session.refresh(client).await?;
        }

        Ok(session)
    }

    fn load(account_email: &str) -> Result<Self> {
        let path = Self::path_for_account_email(account_email)?;

        if !path.exists() {
            anyhow::bail!(
                "No Google session for {}. Run `daydeck auth google` to connect.",
                account_email
            );
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read Google session from {}", path.display()))?;

        let data: SessionData = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse Google session from {}", path.display()))?;

        Ok(Session {
            account_email: account_email.to_string(),
            data,
        })
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        let path = self.path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;

        // Set to owner-only (0600) since file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    fn is_expired(&self) -> bool {
        Utc::now() >= self.data.expires_at
    }

    async fn refresh(&mut self, client: &reqwest::Client) -> Result<()> {
        debug!(account = %self.account_email, "access token expired, refreshing");

        let creds = app_config::load()?;

        let response = client
            .post(TOKEN_URL)
            .form(&[
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
                ("refresh_token", self.data.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .context("Failed to reach the Google token endpoint")?;

        // invalid_grant means the refresh token itself is dead; only a new
        // consent flow can recover from that.
        if matches!(
            response.status(),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(anyhow::Error::new(NeedsReauth));
        }

        if !response.status().is_success() {
            anyhow::bail!("Token refresh failed with HTTP {}", response.status());
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token refresh response")?;

        // Google typically doesn't return a new refresh_token on refresh
        self.data = SessionData::from_token_response(tokens, Some(&self.data.refresh_token))?;
        self.save()?;

        Ok(())
    }
}
