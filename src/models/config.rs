//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::domain::PhotoSizePolicy;

#[derive(Clone, Debug, Deserialize)]
/// Endpoints and policies of the listing client.
pub struct ClientConfig {
    pub api_base_url: String,
    pub listing_path: String,
    pub login_path: String,
    #[serde(default = "default_requires_explicit_credential")]
    pub requires_explicit_credential: bool,
    /// Per-photo cap in bytes; absent means no cap.
    #[serde(default)]
    pub max_photo_bytes: Option<u64>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_requires_explicit_credential() -> bool {
    true
}

impl ClientConfig {
    pub fn listing_url(&self) -> String {
        join_url(&self.api_base_url, &self.listing_path)
    }

    pub fn login_url(&self) -> String {
        join_url(&self.api_base_url, &self.login_path)
    }

    pub fn photo_size_policy(&self) -> PhotoSizePolicy {
        PhotoSizePolicy::from_limit(self.max_photo_bytes)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> ClientConfig {
        ClientConfig {
            api_base_url: base.to_string(),
            listing_path: "/api/cars".to_string(),
            login_path: "api/auth/login".to_string(),
            requires_explicit_credential: true,
            max_photo_bytes: Some(crate::DEFAULT_MAX_PHOTO_BYTES),
            request_timeout_secs: None,
        }
    }

    #[test]
    fn joins_urls_without_double_slashes() {
        let config = config("http://localhost:5000/");
        assert_eq!(config.listing_url(), "http://localhost:5000/api/cars");
        assert_eq!(config.login_url(), "http://localhost:5000/api/auth/login");
    }

    #[test]
    fn missing_photo_cap_is_unbounded() {
        let mut config = config("http://localhost:5000");
        assert_eq!(
            config.photo_size_policy(),
            PhotoSizePolicy::Capped(5 * crate::MIB)
        );
        config.max_photo_bytes = None;
        assert_eq!(config.photo_size_policy(), PhotoSizePolicy::Unbounded);
    }

    #[test]
    fn deserializes_with_defaults() {
        let settings = config::Config::builder()
            .set_override("api_base_url", "http://cars.local")
            .unwrap()
            .set_override("listing_path", "/api/cars")
            .unwrap()
            .set_override("login_path", "/api/auth/login")
            .unwrap()
            .build()
            .unwrap();

        let parsed: ClientConfig = settings.try_deserialize().unwrap();
        assert!(parsed.requires_explicit_credential);
        assert!(parsed.max_photo_bytes.is_none());
        assert!(parsed.request_timeout_secs.is_none());
    }
}
