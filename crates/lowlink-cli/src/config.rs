//! Layered configuration for the `lowlink` CLI.
//!
//! Lookup order (first hit wins, no merging between files):
//! 1. `--config <path>`
//! 2. `./lowlink.toml`
//! 3. `<config dir>/lowlink/config.toml` (e.g. `~/.config/lowlink/config.toml`)
//! 4. Built-in defaults
//!
//! Every field has a serde default, so partial files are fine.

use anyhow::{Context, Result};
use lowlink_core::{AnalysisOptions, BridgeView};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputMode;

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "lowlink.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub bridge_view: BridgeView,
    #[serde(default)]
    pub dedup_edges: bool,
    #[serde(default = "default_true")]
    pub topological: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bridge_view: BridgeView::default(),
            dedup_edges: false,
            topological: default_true(),
        }
    }
}

impl AnalysisConfig {
    #[must_use]
    pub const fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            bridge_view: self.bridge_view,
            dedup_edges: self.dedup_edges,
            topological: self.topological,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_comment_prefix")]
    pub comment_prefix: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            comment_prefix: default_comment_prefix(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<OutputMode>,
    #[serde(default)]
    pub include_timing: bool,
}

const fn default_true() -> bool {
    true
}

fn default_comment_prefix() -> String {
    "#".to_string()
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Local(PathBuf),
    User(PathBuf),
    Defaults,
}

impl ConfigSource {
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Explicit(p) | Self::Local(p) | Self::User(p) => p.display().to_string(),
            Self::Defaults => "built-in defaults".to_string(),
        }
    }
}

/// Parse a config file.
///
/// # Errors
///
/// Fails if the file cannot be read or is not valid TOML for [`Config`].
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve the effective config following the documented lookup order.
///
/// # Errors
///
/// An explicit path that does not exist is an error; missing implicit files
/// are skipped. Any file that exists but fails to parse is an error.
pub fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<(Config, ConfigSource)> {
    resolve_config_inner(explicit, cwd, dirs::config_dir().as_deref())
}

fn resolve_config_inner(
    explicit: Option<&Path>,
    cwd: &Path,
    user_config_dir: Option<&Path>,
) -> Result<(Config, ConfigSource)> {
    if let Some(path) = explicit {
        let config = load_config_file(path)?;
        return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
    }

    let local = cwd.join(LOCAL_CONFIG_FILE);
    if local.exists() {
        let config = load_config_file(&local)?;
        return Ok((config, ConfigSource::Local(local)));
    }

    if let Some(dir) = user_config_dir {
        let user = dir.join("lowlink/config.toml");
        if user.exists() {
            let config = load_config_file(&user)?;
            return Ok((config, ConfigSource::User(user)));
        }
    }

    Ok((Config::default(), ConfigSource::Defaults))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").expect("parse");
        assert_eq!(config, Config::default());
        assert!(config.analysis.topological);
        assert_eq!(config.input.comment_prefix, "#");
        assert_eq!(config.output.format, None);
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let config: Config = toml::from_str(
            r#"
            [analysis]
            bridge_view = "directed"

            [output]
            format = "json"
            include_timing = true
            "#,
        )
        .expect("parse");

        assert_eq!(config.analysis.bridge_view, BridgeView::Directed);
        assert!(!config.analysis.dedup_edges);
        assert!(config.analysis.topological);
        assert_eq!(config.output.format, Some(OutputMode::Json));
        assert!(config.output.include_timing);
    }

    #[test]
    fn unknown_bridge_view_is_rejected() {
        let parsed = toml::from_str::<Config>("[analysis]\nbridge_view = \"sideways\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn explicit_path_wins_over_local_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(LOCAL_CONFIG_FILE), "[analysis]\ndedup_edges = true\n")
            .expect("write local");
        let explicit = dir.path().join("other.toml");
        std::fs::write(&explicit, "[analysis]\ntopological = false\n").expect("write explicit");

        let (config, source) =
            resolve_config_inner(Some(&explicit), dir.path(), None).expect("resolve");
        assert!(!config.analysis.topological);
        assert!(!config.analysis.dedup_edges);
        assert_eq!(source, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn local_file_wins_over_user_file() {
        let cwd = tempfile::tempdir().expect("tempdir");
        let user = tempfile::tempdir().expect("tempdir");
        std::fs::write(cwd.path().join(LOCAL_CONFIG_FILE), "[analysis]\ndedup_edges = true\n")
            .expect("write local");
        std::fs::create_dir_all(user.path().join("lowlink")).expect("mkdir");
        std::fs::write(
            user.path().join("lowlink/config.toml"),
            "[analysis]\nbridge_view = \"directed\"\n",
        )
        .expect("write user");

        let (config, source) =
            resolve_config_inner(None, cwd.path(), Some(user.path())).expect("resolve");
        assert!(config.analysis.dedup_edges);
        assert_eq!(config.analysis.bridge_view, BridgeView::Underlying);
        assert!(matches!(source, ConfigSource::Local(_)));
    }

    #[test]
    fn user_file_used_when_no_local_file() {
        let cwd = tempfile::tempdir().expect("tempdir");
        let user = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(user.path().join("lowlink")).expect("mkdir");
        std::fs::write(
            user.path().join("lowlink/config.toml"),
            "[analysis]\nbridge_view = \"directed\"\n",
        )
        .expect("write user");

        let (config, source) =
            resolve_config_inner(None, cwd.path(), Some(user.path())).expect("resolve");
        assert_eq!(config.analysis.bridge_view, BridgeView::Directed);
        assert!(matches!(source, ConfigSource::User(_)));
    }

    #[test]
    fn nothing_found_falls_back_to_defaults() {
        let cwd = tempfile::tempdir().expect("tempdir");
        let (config, source) = resolve_config_inner(None, cwd.path(), None).expect("resolve");
        assert_eq!(config, Config::default());
        assert_eq!(source, ConfigSource::Defaults);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let cwd = tempfile::tempdir().expect("tempdir");
        let missing = cwd.path().join("nope.toml");
        assert!(resolve_config_inner(Some(&missing), cwd.path(), None).is_err());
    }

    #[test]
    fn options_mirror_analysis_section() {
        let config = AnalysisConfig {
            bridge_view: BridgeView::Directed,
            dedup_edges: true,
            topological: false,
        };
        let options = config.options();
        assert_eq!(options.bridge_view, BridgeView::Directed);
        assert!(options.dedup_edges);
        assert!(!options.topological);
    }
}
