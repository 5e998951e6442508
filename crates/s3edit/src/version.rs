//! Version information for the s3edit CLI

/// Version information captured at build time
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Semantic version
    pub version: String,

    /// Git commit SHA (short)
    pub commit: Option<String>,

    /// Target triple
    pub target: Option<String>,
}

impl VersionInfo {
    /// Create version info for current build
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("GIT_SHA").map(String::from),
            target: option_env!("TARGET").map(String::from),
        }
    }
}

/// Version string rendered by `--version`
pub fn long_version() -> String {
    let info = VersionInfo::current();
    let mut parts = vec![info.version];

    if let Some(commit) = info.commit {
        parts.push(format!("({})", commit));
    }
    if let Some(target) = info.target {
        parts.push(target);
    }

    parts.join(" ")
}
