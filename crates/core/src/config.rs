//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup (the binary reads the environment) and then
//! passed into the screens. Nothing in this crate reads process-wide environment variables.

use crate::constants::{
    APP_DIR_NAME, DEFAULT_API_BASE_URL, DEFAULT_DATA_DIR, LOCAL_STORAGE_FILENAME,
};
use crate::{ReportError, ReportResult};
use std::path::{Path, PathBuf};

/// Application configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    api_base_url: String,
    data_dir: PathBuf,
    output_dir: PathBuf,
}

impl AppConfig {
    /// Create a new `AppConfig`.
    ///
    /// The base URL must not be blank; a trailing slash is removed.
    pub fn new(api_base_url: String, data_dir: PathBuf, output_dir: PathBuf) -> ReportResult<Self> {
        let api_base_url = api_base_url.trim().trim_end_matches('/').to_string();
        if api_base_url.is_empty() {
            return Err(ReportError::InvalidInput(
                "api_base_url cannot be empty".into(),
            ));
        }

        Ok(Self {
            api_base_url,
            data_dir,
            output_dir,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the JSON file backing local storage.
    pub fn local_storage_path(&self) -> PathBuf {
        self.data_dir.join(LOCAL_STORAGE_FILENAME)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Resolve the authentication base URL from an optional override value.
///
/// `None` or a blank value yields the default local endpoint.
pub fn api_base_url_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

/// Resolve the data directory without reading environment variables.
///
/// An explicit override wins; otherwise the platform's local data directory is used, falling
/// back to a hidden directory relative to the working directory.
pub fn resolve_data_dir(override_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        return dir;
    }

    dirs::data_local_dir()
        .map(|base| base.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Resolve the output directory for exported reports (current directory by default).
pub fn resolve_output_dir(override_dir: Option<PathBuf>) -> PathBuf {
    override_dir
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_rejects_blank_base_url() {
        let err = AppConfig::new("  ".into(), PathBuf::from("d"), PathBuf::from("o")).unwrap_err();
        assert!(matches!(err, ReportError::InvalidInput(_)));
    }

    #[test]
    fn test_config_strips_trailing_slash() {
        let config = AppConfig::new(
            "http://localhost:5000/".into(),
            PathBuf::from("data"),
            PathBuf::from("out"),
        )
        .unwrap();
        assert_eq!(config.api_base_url(), "http://localhost:5000");
        assert_eq!(
            config.local_storage_path(),
            PathBuf::from("data").join(LOCAL_STORAGE_FILENAME)
        );
    }

    #[test]
    fn test_api_base_url_defaults_when_blank() {
        assert_eq!(api_base_url_from_env_value(None), DEFAULT_API_BASE_URL);
        assert_eq!(
            api_base_url_from_env_value(Some("   ".into())),
            DEFAULT_API_BASE_URL
        );
        assert_eq!(
            api_base_url_from_env_value(Some("https://auth.example".into())),
            "https://auth.example"
        );
    }

    #[test]
    fn test_resolve_data_dir_prefers_override() {
        let dir = resolve_data_dir(Some(PathBuf::from("/tmp/cr")));
        assert_eq!(dir, PathBuf::from("/tmp/cr"));
    }

    #[test]
    fn test_resolve_output_dir_defaults_to_cwd() {
        assert_eq!(resolve_output_dir(None), PathBuf::from("."));
        assert_eq!(resolve_output_dir(Some(PathBuf::new())), PathBuf::from("."));
    }
}
