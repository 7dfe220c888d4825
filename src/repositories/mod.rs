//! Process-wide catalog source configuration.

mod models;

use std::{fs, path::Path, sync::OnceLock};

pub use models::{Source, SourcesConfig, TrustedKey}; // Re-export the model types to callers.

use crate::signing::Keyring;

/// Environment variable holding the configuration as JSON.
pub const SOURCES_ENV: &str = "SIMPLESTREAMS_SOURCES";

/// Single, module-private cache (set exactly once).
static CACHE: OnceLock<SourcesConfig> = OnceLock::new();

// ---- Public API (serde hidden from callers) ----

/// Parse and validate a configuration document without touching the cache.
pub fn parse(json: &str) -> Result<SourcesConfig, ReposError> {
    let parsed: SourcesConfig = serde_json::from_str(json).map_err(ReposError::Json)?;
    if parsed.sources.is_empty() {
        return Err(ReposError::NoSources);
    }
    if let Some(duplicate) = parsed
        .sources
        .iter()
        .enumerate()
        .find(|(i, s)| parsed.sources[..*i].iter().any(|o| o.name == s.name))
        .map(|(_, s)| s.name.clone())
    {
        return Err(ReposError::DuplicateSource(duplicate));
    }
    Ok(parsed)
}

/// Initialize from a JSON file path.
pub fn init_from_file(path: impl AsRef<Path>) -> Result<(), ReposError> {
    let data = fs::read_to_string(path).map_err(ReposError::Io)?;
    init_from_json_str(&data)
}

/// Initialize from a JSON string.
pub fn init_from_json_str(json: &str) -> Result<(), ReposError> {
    init(parse(json)?)
}

/// Initialize from an env var containing JSON.
pub fn init_from_env(var: &str) -> Result<(), ReposError> {
    let s = std::env::var(var).map_err(|_| ReposError::MissingEnv(var.to_string()))?;
    init_from_json_str(&s)
}

pub fn init(config: SourcesConfig) -> Result<(), ReposError> {
    CACHE
        .set(config)
        .map_err(|_| ReposError::AlreadyInitialized)
}

pub fn settings() -> Result<&'static SourcesConfig, ReposError> {
    CACHE.get().ok_or(ReposError::NotInitialized)
}

/// Borrow every source, in precedence order.
pub fn all() -> Result<&'static [Source], ReposError> {
    settings().map(SourcesConfig::sources)
}

pub fn by_name(name: &str) -> Result<Option<&'static Source>, ReposError> {
    Ok(settings()?.source(name))
}

/// Base URLs in precedence order, ready for a lookup.
pub fn base_urls() -> Result<Vec<String>, ReposError> {
    Ok(all()?.iter().map(|s| s.url().to_string()).collect())
}

pub fn keyring() -> Result<Keyring, ReposError> {
    build_keyring(settings()?)
}

/// Decode the configured keys.
pub fn build_keyring(config: &SourcesConfig) -> Result<Keyring, ReposError> {
    let mut keyring = Keyring::new();
    for key in config.keys() {
        keyring
            .insert_encoded(key.id(), key.public_key())
            .map_err(|err| ReposError::InvalidKey(err.to_string()))?;
    }
    Ok(keyring)
}

/// ---- Errors ----
#[derive(thiserror::Error, Debug)]
pub enum ReposError {
    #[error("sources are not initialized")]
    NotInitialized,
    #[error("sources already initialized")]
    AlreadyInitialized,
    #[error("missing env var: {0}")]
    MissingEnv(String),
    #[error("configuration lists no sources")]
    NoSources,
    #[error("source {0:?} is configured twice")]
    DuplicateSource(String),
    #[error("{0}")]
    InvalidKey(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use ed25519_dalek::SigningKey;
    use std::time::Duration;

    #[test]
    fn parses_with_defaults() {
        let config = parse(r#"{"sources": [{"name": "local", "url": "file:///srv/streams"}]}"#).unwrap();
        assert_eq!(config.index_path(), "streams/v1/index.json");
        assert!(!config.require_signed());
        assert_eq!(config.deadline(), None);
        assert_eq!(config.sources()[0].url(), "file:///srv/streams");
    }

    #[test]
    fn parses_full_document() {
        let config = parse(
            r#"{
                "index_path": "streams/v1/index2.json",
                "require_signed": true,
                "deadline_secs": 45,
                "sources": [
                    {"name": "mirror", "url": "https://mirror.example/"},
                    {"name": "upstream", "url": "https://cloud-images.ubuntu.com/releases/"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.index_path(), "streams/v1/index2.json");
        assert!(config.require_signed());
        assert_eq!(config.deadline(), Some(Duration::from_secs(45)));
        let names: Vec<&str> = config.sources().iter().map(Source::name).collect();
        assert_eq!(names, vec!["mirror", "upstream"]);
    }

    #[test]
    fn finds_sources_by_name() {
        let config = parse(
            r#"{"sources": [
                {"name": "mirror", "url": "https://mirror.example/"},
                {"name": "upstream", "url": "https://cloud-images.ubuntu.com/releases/"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(config.source("upstream").map(Source::url), Some("https://cloud-images.ubuntu.com/releases/"));
        assert!(config.source("missing").is_none());
    }

    #[test]
    fn accessors_require_initialization() {
        // Tests never initialize the process-wide cache.
        assert!(matches!(by_name("mirror"), Err(ReposError::NotInitialized)));
        assert!(matches!(base_urls(), Err(ReposError::NotInitialized)));
    }

    #[test]
    fn rejects_empty_and_duplicate_sources() {
        assert!(matches!(parse(r#"{"sources": []}"#), Err(ReposError::NoSources)));
        assert!(matches!(
            parse(r#"{"sources": [{"name": "a", "url": "x"}, {"name": "a", "url": "y"}]}"#),
            Err(ReposError::DuplicateSource(ref name)) if name == "a"
        ));
    }

    #[test]
    fn builds_keyring_from_config() {
        let key = SigningKey::from_bytes(&[3u8; 32]);
        let json = format!(
            r#"{{"sources": [{{"name": "a", "url": "x"}}],
                "keys": [{{"id": "publisher", "public_key": "ed25519:{}"}}]}}"#,
            STANDARD.encode(key.verifying_key().as_bytes())
        );
        let keyring = build_keyring(&parse(&json).unwrap()).unwrap();
        assert_eq!(keyring.len(), 1);
        assert!(keyring.get("publisher").is_some());

        let bad = parse(
            r#"{"sources": [{"name": "a", "url": "x"}], "keys": [{"id": "k", "public_key": "rsa:AAAA"}]}"#,
        )
        .unwrap();
        assert!(matches!(build_keyring(&bad), Err(ReposError::InvalidKey(_))));
    }

    #[test]
    fn default_points_at_ubuntu_releases() {
        let config = SourcesConfig::default();
        assert_eq!(config.sources()[0].url(), "https://cloud-images.ubuntu.com/releases/");
    }
}
