//! API-key resolution: secrets file first, then the environment.
//!
//! The secrets store is a TOML file with top-level string entries:
//!
//! ```toml
//! GOOGLE_API_KEY = "AIza..."
//! ```
//!
//! When no explicit path is configured every existing file of
//! [`default_secrets_paths`] is tried in order, and the first one holding
//! the key wins. A secrets file that cannot be read or parsed is skipped
//! with a warning. No other source is consulted.

use crate::error::RewriteError;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Credential name used when none is configured.
pub const DEFAULT_CREDENTIAL_KEY: &str = "GOOGLE_API_KEY";

/// An API key. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw key, for handing to the provider.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Where a credential was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialOrigin {
    SecretsFile(PathBuf),
    Environment,
}

/// A credential together with its origin.
#[derive(Debug, Clone)]
pub struct ResolvedCredential {
    pub key: ApiKey,
    pub origin: CredentialOrigin,
}

/// Default secrets-file locations, most local first.
pub fn default_secrets_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".edgequake").join("secrets.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("edgequake-rewrite").join("secrets.toml"));
    }
    paths
}

/// Resolve `key_name` from the secrets store, then from the environment.
///
/// Fails with [`RewriteError::MissingCredential`] when neither has a
/// non-blank value.
pub fn resolve_credential(
    key_name: &str,
    secrets_path: Option<&Path>,
) -> Result<ResolvedCredential, RewriteError> {
    let candidates = match secrets_path {
        Some(p) => vec![p.to_path_buf()],
        None => default_secrets_paths(),
    };
    resolve_from(key_name, candidates, |name| std::env::var(name).ok())
}

/// Lookup over explicit candidates with an injectable environment.
fn resolve_from(
    key_name: &str,
    candidates: Vec<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedCredential, RewriteError> {
    for path in candidates.into_iter().filter(|p| p.is_file()) {
        match read_secret(&path, key_name) {
            Ok(Some(value)) => {
                debug!("Credential {} resolved from {}", key_name, path.display());
                return Ok(ResolvedCredential {
                    key: ApiKey::new(value),
                    origin: CredentialOrigin::SecretsFile(path),
                });
            }
            Ok(None) => debug!("{} has no entry for {}", path.display(), key_name),
            Err(e) => warn!("Ignoring secrets file: {}", e),
        }
    }

    if let Some(value) = non_blank(env(key_name)) {
        debug!("Credential {} resolved from environment", key_name);
        return Ok(ResolvedCredential {
            key: ApiKey::new(value),
            origin: CredentialOrigin::Environment,
        });
    }

    Err(RewriteError::MissingCredential {
        key: key_name.to_string(),
        hint: format!(
            "Set {key_name} in .edgequake/secrets.toml (or pass --secrets <FILE>), \
             or export it as an environment variable."
        ),
    })
}

/// Read one string entry from a TOML secrets file.
///
/// Returns `Ok(None)` when the entry is absent, blank, or not a string.
pub fn read_secret(path: &Path, key_name: &str) -> Result<Option<String>, RewriteError> {
    let content = std::fs::read_to_string(path).map_err(|e| RewriteError::InputReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    let table: toml::Table = toml::from_str(&content).map_err(|e| {
        RewriteError::InvalidConfig(format!(
            "secrets file '{}' is not valid TOML: {}",
            path.display(),
            e.message()
        ))
    })?;
    Ok(non_blank(
        table
            .get(key_name)
            .and_then(|v| v.as_str())
            .map(str::to_string),
    ))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
