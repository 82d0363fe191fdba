/// Supabase (managed auth/storage) client
///
/// A thin wrapper over Supabase's REST surface. The client is constructed
/// exactly once at process start and injected through the server state;
/// when the deployment has no Supabase credentials, construction fails
/// with [`SupabaseError::NotConfigured`] and the server runs without it
/// (the health endpoint reports the flag). Construction performs no
/// network I/O.
///
/// # Example
///
/// ```
/// use curricula_shared::supabase::{SupabaseClient, SupabaseConfig};
///
/// let config = SupabaseConfig {
///     url: "https://abc.supabase.co".into(),
///     anon_key: "anon".into(),
///     service_key: String::new(),
/// };
/// let client = SupabaseClient::new(&config).unwrap();
/// assert!(client
///     .storage_public_url("lesson-content", "intro/01.md")
///     .ends_with("/storage/v1/object/public/lesson-content/intro/01.md"));
/// ```
use serde::Deserialize;

/// Supabase connection settings
#[derive(Debug, Clone, Default)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://<project>.supabase.co`
    pub url: String,

    /// Public (anon) API key
    pub anon_key: String,

    /// Privileged (service-role) API key; optional, admin operations only
    pub service_key: String,
}

impl SupabaseConfig {
    /// Whether the project URL and public key are both present.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.anon_key.is_empty()
    }
}

/// Error type for Supabase operations
#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    /// Project URL or public key missing from configuration
    #[error("supabase credentials not configured")]
    NotConfigured,

    /// Transport-level failure
    #[error("supabase request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Supabase answered with a non-success status
    #[error("supabase returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// A user record as returned by Supabase auth
#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Handle to a configured Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    base_url: String,
    anon_key: String,
    http: reqwest::Client,
}

impl SupabaseClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::NotConfigured`] when the URL or public key
    /// is empty. No network call is made.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        if !config.is_configured() {
            return Err(SupabaseError::NotConfigured);
        }

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            http: reqwest::Client::new(),
        })
    }

    /// Project base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the auth user behind a Supabase access token.
    pub async fn auth_user(&self, access_token: &str) -> Result<SupabaseUser, SupabaseError> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SupabaseError::Api {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }

    /// Public download URL for an object in a public storage bucket.
    /// Purely string construction; no request is made.
    pub fn storage_public_url(&self, bucket: &str, object: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, object
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> SupabaseConfig {
        SupabaseConfig {
            url: "https://proj.supabase.co/".into(),
            anon_key: "anon-key".into(),
            service_key: "service-key".into(),
        }
    }

    #[test]
    fn test_unconfigured_when_url_or_key_empty() {
        let mut config = configured();
        config.url = String::new();
        assert!(!config.is_configured());
        assert!(matches!(
            SupabaseClient::new(&config),
            Err(SupabaseError::NotConfigured)
        ));

        let mut config = configured();
        config.anon_key = String::new();
        assert!(!config.is_configured());
        assert!(matches!(
            SupabaseClient::new(&config),
            Err(SupabaseError::NotConfigured)
        ));

        assert!(!SupabaseConfig::default().is_configured());
    }

    #[test]
    fn test_configured_client_builds_without_io() {
        let client = SupabaseClient::new(&configured()).expect("should build");
        assert_eq!(client.base_url(), "https://proj.supabase.co");
    }

    #[test]
    fn test_storage_public_url() {
        let client = SupabaseClient::new(&configured()).expect("should build");
        assert_eq!(
            client.storage_public_url("lesson-content", "rust/ownership.md"),
            "https://proj.supabase.co/storage/v1/object/public/lesson-content/rust/ownership.md"
        );
    }
}
