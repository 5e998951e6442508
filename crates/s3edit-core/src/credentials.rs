//! Credential resolution for request signing
//!
//! Credentials are resolved once at startup, in priority order: explicit
//! flag overrides, then a named profile section, then the `default` section
//! of an INI-style `~/.aws/credentials` file. The resolved triple is
//! immutable afterwards.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Region used when neither a flag nor the credentials file supplies one
pub const DEFAULT_REGION: &str = "us-east-1";

/// The resolved signing credential triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

/// Explicit per-field overrides from the command line; each field can be
/// set independently of the others
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: Option<String>,
}

impl Credentials {
    /// Resolve credentials from overrides, an optional named profile, and
    /// an optional credentials file.
    ///
    /// A named profile requires a matching `profile <name>` section in the
    /// file; a missing file or section is fatal. Without a profile the
    /// `default` section is used when present. Flag overrides win per field.
    pub fn resolve(
        overrides: CredentialOverrides,
        profile: Option<&str>,
        credentials_file: Option<&Path>,
    ) -> Result<Self> {
        let file_section = load_section(profile, credentials_file)?;

        let lookup = |key: &str| {
            file_section
                .as_ref()
                .and_then(|section| section.get(key).cloned())
        };

        let access_key = overrides
            .access_key
            .or_else(|| lookup("aws_access_key_id"))
            .ok_or_else(|| {
                Error::missing_credentials("no access key (use --key or ~/.aws/credentials)")
            })?;
        let secret_key = overrides
            .secret_key
            .or_else(|| lookup("aws_secret_access_key"))
            .ok_or_else(|| {
                Error::missing_credentials("no secret key (use --secret or ~/.aws/credentials)")
            })?;
        let region = overrides
            .region
            .or_else(|| lookup("region"))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Ok(Self {
            access_key,
            secret_key,
            region,
        })
    }

    /// Default location of the credentials file (`~/.aws/credentials`)
    pub fn default_credentials_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".aws").join("credentials"))
    }
}

/// Load the relevant section of the credentials file, if any.
///
/// Returns `None` when no file exists and no profile was requested.
fn load_section(
    profile: Option<&str>,
    credentials_file: Option<&Path>,
) -> Result<Option<HashMap<String, String>>> {
    let path = match credentials_file {
        Some(path) if path.exists() => path,
        _ => {
            // A named profile cannot be honored without a file to read it from
            if let Some(name) = profile {
                return Err(Error::unknown_profile(name));
            }
            return Ok(None);
        }
    };

    debug!("reading credentials file: {}", path.display());
    let content = std::fs::read_to_string(path)?;
    let mut sections = parse_ini(&content);

    match profile {
        Some(name) => {
            let section_name = format!("profile {}", name);
            sections
                .remove(section_name.as_str())
                .map(Some)
                .ok_or_else(|| Error::unknown_profile(name))
        }
        None => Ok(sections.remove("default")),
    }
}

/// Minimal INI parser: `[section]` headers and `key = value` lines.
/// Comments (`#`, `;`) and lines outside any section are ignored.
fn parse_ini(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            let name = name.trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
        } else if let (Some(section), Some((key, value))) = (&current, line.split_once('=')) {
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    sections
}
