//! # Handover Supabase
//!
//! [`ReportGateway`](handover_core::ReportGateway) backed by a hosted Supabase project.
//!
//! Reports live in the `icu_shift_reports` table and are reached through the PostgREST HTTP
//! API under `<project>/rest/v1`. Every request carries the project's anon key; when a signed-in
//! user's access token is configured it is sent as the bearer token instead, and new records
//! are stamped with that user's id.

mod client;

pub use client::SupabaseGateway;

use handover_core::GatewayError;

#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),
    #[error("invalid project URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request returned {status}: {message}")]
    Status { status: u16, message: String },
}

pub type SupabaseResult<T> = std::result::Result<T, SupabaseError>;

impl From<SupabaseError> for GatewayError {
    fn from(err: SupabaseError) -> Self {
        match err {
            SupabaseError::Http(e) if e.is_decode() => GatewayError::Decode(e.to_string()),
            SupabaseError::Http(e) => GatewayError::Network(e.to_string()),
            SupabaseError::Status { status, message } => GatewayError::Backend { status, message },
            other => GatewayError::Network(other.to_string()),
        }
    }
}

/// Connection settings for the hosted database, resolved once at startup.
#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    url: String,
    anon_key: String,
    access_token: Option<String>,
}

impl SupabaseConfig {
    pub fn new(url: String, anon_key: String, access_token: Option<String>) -> SupabaseResult<Self> {
        let url = url.trim().trim_end_matches('/').to_string();
        if url.is_empty() {
            return Err(SupabaseError::MissingConfig("SUPABASE_URL"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SupabaseError::InvalidUrl(url));
        }
        let anon_key = anon_key.trim().to_string();
        if anon_key.is_empty() {
            return Err(SupabaseError::MissingConfig("SUPABASE_ANON_KEY"));
        }
        let access_token = access_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Self {
            url,
            anon_key,
            access_token,
        })
    }

    /// Build a config from raw environment values. URL and anon key are required.
    pub fn from_env_values(
        url: Option<String>,
        anon_key: Option<String>,
        access_token: Option<String>,
    ) -> SupabaseResult<Self> {
        let url = url.ok_or(SupabaseError::MissingConfig("SUPABASE_URL"))?;
        let anon_key = anon_key.ok_or(SupabaseError::MissingConfig("SUPABASE_ANON_KEY"))?;
        Self::new(url, anon_key, access_token)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.anon_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_requires_url_and_key() {
        assert!(matches!(
            SupabaseConfig::from_env_values(None, Some("key".into()), None),
            Err(SupabaseError::MissingConfig("SUPABASE_URL"))
        ));
        assert!(matches!(
            SupabaseConfig::from_env_values(Some("https://x.supabase.co".into()), Some(" ".into()), None),
            Err(SupabaseError::MissingConfig("SUPABASE_ANON_KEY"))
        ));
    }

    #[test]
    fn test_config_trims_trailing_slash_and_blank_token() {
        let cfg = SupabaseConfig::new(
            "https://x.supabase.co/".into(),
            "anon".into(),
            Some("  ".into()),
        )
        .unwrap();

        assert_eq!(cfg.url(), "https://x.supabase.co");
        assert_eq!(cfg.access_token(), None);
        assert_eq!(cfg.bearer(), "anon");
    }

    #[test]
    fn test_config_rejects_non_http_url() {
        assert!(matches!(
            SupabaseConfig::new("x.supabase.co".into(), "anon".into(), None),
            Err(SupabaseError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_status_maps_to_backend_error() {
        let err: GatewayError = SupabaseError::Status {
            status: 401,
            message: "JWT expired".into(),
        }
        .into();

        assert!(matches!(err, GatewayError::Backend { status: 401, .. }));
    }
}
