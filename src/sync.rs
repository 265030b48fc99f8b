//! HTTP client for the remote file sync server.

use once_cell::sync::Lazy;
use reqwest::{Client, Method, StatusCode};
use thiserror::Error;

use crate::config::SyncConfig;

static HTTP: Lazy<Client> = Lazy::new(Client::new);

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("sync request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("sync server rejected the token")]
    Unauthorized,
    #[error("sync server returned {0}")]
    Status(StatusCode),
}

/// Talks to the sync server's file endpoints with a bearer token.
///
/// Files are addressed by their library path, so `/games.pgn` maps to
/// `{base_url}/files/games.pgn`.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    base_url: String,
    token: String,
}

impl RemoteClient {
    /// Builds a client from settings, or `None` when sync is disabled or
    /// no server is configured.
    pub fn from_config(config: &SyncConfig) -> Option<Self> {
        if !config.enabled || config.base_url.trim().is_empty() {
            return None;
        }
        Some(Self {
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn request(&self, method: Method, url: String) -> reqwest::RequestBuilder {
        HTTP.request(method, url).bearer_auth(&self.token)
    }

    fn file_url(&self, path: &str) -> String {
        format!("{}/files{}", self.base_url, path)
    }

    /// Creates or overwrites a remote file.
    pub async fn upload(&self, path: &str, content: &str) -> Result<(), SyncError> {
        let resp = self
            .request(Method::PUT, self.file_url(path))
            .body(content.to_string())
            .send()
            .await?;
        check_status(resp.status())
    }

    /// Fetches a remote file, or `None` when the server does not have it.
    pub async fn download(&self, path: &str) -> Result<Option<String>, SyncError> {
        let resp = self.request(Method::GET, self.file_url(path)).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check_status(resp.status())?;
        Ok(Some(resp.text().await?))
    }

    /// Moves a remote file to a new path.
    pub async fn rename(&self, from: &str, to: &str) -> Result<(), SyncError> {
        let resp = self
            .request(Method::POST, format!("{}/files/rename", self.base_url))
            .json(&serde_json::json!({ "from": from, "to": to }))
            .send()
            .await?;
        check_status(resp.status())
    }

    /// Deletes a remote file. A missing file counts as deleted.
    pub async fn delete(&self, path: &str) -> Result<(), SyncError> {
        let resp = self
            .request(Method::DELETE, self.file_url(path))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check_status(resp.status())
    }
}

fn check_status(status: StatusCode) -> Result<(), SyncError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(SyncError::Unauthorized);
    }
    if !status.is_success() {
        return Err(SyncError::Status(status));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enabled: bool, base_url: &str) -> SyncConfig {
        SyncConfig {
            enabled,
            base_url: base_url.into(),
            token: "secret".into(),
        }
    }

    #[test]
    fn test_from_config_requires_enabled_and_url() {
        assert!(RemoteClient::from_config(&config(false, "https://example.com")).is_none());
        assert!(RemoteClient::from_config(&config(true, "")).is_none());
        assert!(RemoteClient::from_config(&config(true, "   ")).is_none());
        assert!(RemoteClient::from_config(&config(true, "https://example.com")).is_some());
    }

    #[test]
    fn test_file_url_strips_trailing_slash() {
        let client = RemoteClient::from_config(&config(true, "https://example.com/api/")).unwrap();
        assert_eq!(
            client.file_url("/games.pgn"),
            "https://example.com/api/files/games.pgn"
        );
    }

    #[test]
    fn test_check_status_maps_errors() {
        assert!(check_status(StatusCode::OK).is_ok());
        assert!(check_status(StatusCode::NO_CONTENT).is_ok());
        assert!(matches!(
            check_status(StatusCode::UNAUTHORIZED),
            Err(SyncError::Unauthorized)
        ));
        assert!(matches!(
            check_status(StatusCode::INTERNAL_SERVER_ERROR),
            Err(SyncError::Status(_))
        ));
    }
}
