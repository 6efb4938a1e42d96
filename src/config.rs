use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Layout of `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub desk: DeskConfig,
}

/// Installation URL and API key for one helpdesk.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DeskConfig {
    pub endpoint: String,
    pub api_key: String,
}

impl DeskConfig {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

pub fn load(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&config_str)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Merge command line / environment values over the config file.
///
/// The file is only read when at least one of `endpoint` or `api_key` is not
/// given explicitly.
pub fn resolve(path: &Path, endpoint: Option<&str>, api_key: Option<&str>) -> Result<DeskConfig> {
    let (endpoint, api_key) = match (endpoint, api_key) {
        (Some(endpoint), Some(api_key)) => (endpoint.to_string(), api_key.to_string()),
        (endpoint, api_key) => {
            let file = load(path)?.desk;
            (
                endpoint.map(str::to_string).unwrap_or(file.endpoint),
                api_key.map(str::to_string).unwrap_or(file.api_key),
            )
        }
    };

    if endpoint.trim().is_empty() {
        bail!("desk endpoint is not configured");
    }
    if api_key.is_empty() {
        bail!("desk api_key is not configured");
    }

    Ok(DeskConfig::new(&endpoint, &api_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_yaml_file() {
        let file = config_file("desk:\n  endpoint: https://acme.teamwork.com/\n  api_key: abc\n");
        let config = resolve(file.path(), None, None).unwrap();
        assert_eq!(config, DeskConfig::new("https://acme.teamwork.com", "abc"));
    }

    #[test]
    fn explicit_values_skip_the_file() {
        let config = resolve(
            Path::new("/nonexistent/config.yml"),
            Some("http://localhost:8080"),
            Some("key"),
        )
        .unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080");
        assert_eq!(config.api_key, "key");
    }

    #[test]
    fn explicit_key_overrides_file() {
        let file = config_file("desk:\n  endpoint: https://acme.teamwork.com\n  api_key: abc\n");
        let config = resolve(file.path(), None, Some("override")).unwrap();
        assert_eq!(config.endpoint, "https://acme.teamwork.com");
        assert_eq!(config.api_key, "override");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = resolve(Path::new("/nonexistent/config.yml"), None, Some("key")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn empty_key_is_rejected() {
        let file = config_file("desk:\n  endpoint: https://acme.teamwork.com\n  api_key: \"\"\n");
        let err = resolve(file.path(), None, None).unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = DeskConfig::new("https://acme.teamwork.com///", "k");
        assert_eq!(config.endpoint, "https://acme.teamwork.com");
    }
}
