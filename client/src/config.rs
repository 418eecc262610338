//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `STACKIT_*` environment variables or a `.stackit.toml`
//! file. Absent service URLs select the in-memory adapters.

use std::time::Duration;

use ortho_config::OrthoConfig;
use pagination::PageSize;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::{DEFAULT_DEBOUNCE, ListSettings, StaleResponsePolicy};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors raised when configured values cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// A service URL failed to parse.
    #[error("invalid {field} `{value}`: {message}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        message: String,
    },
    /// The page size was zero.
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// Connection and list settings for the StackIt client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STACKIT")]
pub struct ClientSettings {
    /// PostgREST root, e.g. `https://project.example.co/rest/v1/`.
    pub data_url: Option<String>,
    /// API key sent as `apikey` and bearer token to the data store.
    pub data_api_key: Option<String>,
    /// Identity Toolkit root, e.g. `https://identitytoolkit.googleapis.com/v1/`.
    pub identity_url: Option<String>,
    /// API key appended as `key=` to identity requests.
    pub identity_api_key: Option<String>,
    /// Questions per page.
    pub page_size: Option<u32>,
    /// Search debounce window in milliseconds.
    pub debounce_ms: Option<u64>,
    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: Option<u64>,
}

impl ClientSettings {
    /// Parsed data-store URL, if configured.
    pub fn data_url(&self) -> Result<Option<Url>, SettingsError> {
        parse_url("data_url", self.data_url.as_deref())
    }

    /// Parsed identity-provider URL, if configured.
    pub fn identity_url(&self) -> Result<Option<Url>, SettingsError> {
        parse_url("identity_url", self.identity_url.as_deref())
    }

    /// Configured page size, falling back to [`PageSize::DEFAULT`].
    pub fn page_size(&self) -> Result<PageSize, SettingsError> {
        match self.page_size {
            None => Ok(PageSize::DEFAULT),
            Some(size) => PageSize::new(size).map_err(|_| SettingsError::ZeroPageSize),
        }
    }

    /// Search debounce window, falling back to [`DEFAULT_DEBOUNCE`].
    pub fn debounce(&self) -> Duration {
        self.debounce_ms
            .map_or(DEFAULT_DEBOUNCE, Duration::from_millis)
    }

    /// Per-request HTTP timeout, falling back to ten seconds.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// List-controller settings with the given stale-response policy.
    pub fn list_settings(
        &self,
        stale_responses: StaleResponsePolicy,
    ) -> Result<ListSettings, SettingsError> {
        Ok(ListSettings {
            page_size: self.page_size()?,
            debounce: self.debounce(),
            stale_responses,
        })
    }
}

fn parse_url(field: &'static str, raw: Option<&str>) -> Result<Option<Url>, SettingsError> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            Url::parse(value).map_err(|err| SettingsError::InvalidUrl {
                field,
                value: value.to_owned(),
                message: err.to_string(),
            })
        })
        .transpose()
}
