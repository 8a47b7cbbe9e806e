use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File name of the per-directory project config.
pub const PROJECT_CONFIG_FILE: &str = "sccpath.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub generate: GenerateConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Graph document analyzed when no path is given on the command line.
    #[serde(default)]
    pub default_input: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            out_dir: default_out_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    /// Output mode chosen from the CLI flag, env or user config, if any set a valid one.
    pub resolved_output: Option<String>,
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(PROJECT_CONFIG_FILE);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut config = toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    // Relative paths in the config are relative to the config file.
    if let Some(input) = config.analysis.default_input.as_mut() {
        if input.is_relative() {
            *input = project_root.join(&*input);
        }
    }
    if config.generate.out_dir.is_relative() {
        config.generate.out_dir = project_root.join(&config.generate.out_dir);
    }

    Ok(config)
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("sccpath/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load both config files and resolve the output mode.
///
/// `cli_format` is the mode named by `--format`/`--json`, if any; it wins
/// over `FORMAT` and the user config. Unrecognized values from any source
/// fall through to the next one.
pub fn resolve_config(project_root: &Path, cli_format: Option<&str>) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(cli_format, user.output.as_deref(), env_format.as_deref());

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
    })
}

fn resolve_output(
    cli_format: Option<&str>,
    user_output: Option<&str>,
    env_format: Option<&str>,
) -> Option<String> {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some("pretty"),
            "text" => Some("text"),
            "json" => Some("json"),
            _ => None,
        }
    }

    if let Some(mode) = cli_format.and_then(normalize_output_mode) {
        return Some(mode.to_string());
    }

    if let Some(raw) = env_format {
        match normalize_output_mode(raw) {
            Some(mode) => return Some(mode.to_string()),
            None => warn!(value = raw, "ignoring unrecognized FORMAT (expected pretty|text|json)"),
        }
    }

    if let Some(raw) = user_output {
        match normalize_output_mode(raw) {
            Some(mode) => return Some(mode.to_string()),
            None => warn!(value = raw, "ignoring unrecognized user output (expected pretty|text|json)"),
        }
    }

    None
}

const fn default_seed() -> u64 {
    42
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_project_config(dir.path()).unwrap();
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.generate.seed, 42);
        assert_eq!(config.generate.out_dir, PathBuf::from("data"));
        assert!(config.analysis.default_input.is_none());
    }

    #[test]
    fn project_config_paths_resolve_against_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            "[analysis]\ndefault_input = \"graphs/tasks.json\"\n\n[generate]\nseed = 7\n",
        )
        .unwrap();

        let config = load_project_config(dir.path()).unwrap();
        assert_eq!(
            config.analysis.default_input,
            Some(dir.path().join("graphs/tasks.json"))
        );
        assert_eq!(config.generate.seed, 7);
        assert_eq!(config.generate.out_dir, dir.path().join("data"));
    }

    #[test]
    fn broken_project_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_CONFIG_FILE), "[generate\nseed = ").unwrap();

        let err = load_project_config(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn env_format_wins_over_user_output() {
        let resolved = resolve_output(None, Some("text"), Some("JSON"));
        assert_eq!(resolved.as_deref(), Some("json"));
    }

    #[test]
    fn user_output_used_without_env() {
        assert_eq!(resolve_output(None, Some("human"), None).as_deref(), Some("pretty"));
        assert_eq!(resolve_output(None, None, None), None);
    }

    #[test]
    fn cli_format_wins_over_invalid_env() {
        let resolved = resolve_output(Some("json"), Some("text"), Some("yaml"));
        assert_eq!(resolved.as_deref(), Some("json"));
    }

    #[test]
    fn invalid_values_fall_through() {
        assert_eq!(resolve_output(None, Some("text"), Some("yaml")).as_deref(), Some("text"));
        assert_eq!(resolve_output(None, Some("xml"), None), None);
        assert_eq!(resolve_output(None, Some("xml"), Some("fancy")), None);
    }
}
