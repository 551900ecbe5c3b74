//! Configuration file loading for spreadpatch.
//!
//! Discovers and loads `spreadpatch.toml` from the root directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use spreadpatch_edit::catalog::{DEFAULT_TARGET, OBJECT_SPREAD_ID};
use spreadpatch_edit::{BackupOptions, DEFAULT_BACKUP_SUFFIX};
use spreadpatch_types::patch::MatchMode;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "spreadpatch.toml";

/// Top-level configuration from spreadpatch.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpreadpatchConfig {
    pub target: TargetConfig,
    pub patch: PatchConfig,
    pub backups: BackupsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// File to patch, relative to the root.
    pub path: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Built-in patch id.
    pub id: Option<String>,

    pub mode: Option<MatchMode>,
}

/// Backups section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackupsConfig {
    /// Whether to copy the target aside before overwriting it.
    pub enabled: bool,

    /// Suffix appended to the target path for the backup file.
    pub suffix: String,
}

impl Default for BackupsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

/// Discover the spreadpatch.toml config file.
///
/// Returns `None` if no config file is found in `root`.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a spreadpatch.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<SpreadpatchConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<SpreadpatchConfig> {
    let config: SpreadpatchConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from root, or return default if not found.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<SpreadpatchConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(SpreadpatchConfig::default()),
    }
}

/// CLI overrides for the apply command. `None`/`false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ApplyOverrides {
    pub target: Option<Utf8PathBuf>,
    pub patch: Option<String>,
    pub mode: Option<MatchMode>,
    pub backup: bool,
    pub no_backup: bool,
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    /// Target path relative to the root (or absolute).
    pub target: Utf8PathBuf,
    pub patch_id: String,
    pub mode: MatchMode,
    pub backup: Option<BackupOptions>,
}

impl MergedConfig {
    /// Target path resolved against `root`.
    pub fn target_in(&self, root: &Utf8Path) -> Utf8PathBuf {
        if self.target.is_absolute() {
            self.target.clone()
        } else {
            root.join(&self.target)
        }
    }
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: SpreadpatchConfig,
}

impl ConfigMerger {
    pub fn new(config: SpreadpatchConfig) -> Self {
        Self { config }
    }

    /// Merge with apply command CLI arguments.
    ///
    /// Explicit CLI values win; `--no-backup` beats both `--backup` and the config.
    pub fn merge_apply_args(self, cli: ApplyOverrides) -> MergedConfig {
        let target = cli
            .target
            .or(self.config.target.path)
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_TARGET));
        let patch_id = cli
            .patch
            .or(self.config.patch.id)
            .unwrap_or_else(|| OBJECT_SPREAD_ID.to_string());
        let mode = cli.mode.or(self.config.patch.mode).unwrap_or_default();

        let backup_enabled = !cli.no_backup && (cli.backup || self.config.backups.enabled);
        let backup = backup_enabled.then(|| BackupOptions {
            suffix: self.config.backups.suffix.clone(),
        });

        MergedConfig {
            target,
            patch_id,
            mode,
            backup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_example_config() {
        let contents = r#"
[target]
path = "build/recast.js"

[patch]
id = "recast-object-spread"
mode = "all"

[backups]
enabled = true
suffix = ".orig"
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(
            config.target.path,
            Some(Utf8PathBuf::from("build/recast.js"))
        );
        assert_eq!(config.patch.id.as_deref(), Some("recast-object-spread"));
        assert_eq!(config.patch.mode, Some(MatchMode::All));
        assert!(config.backups.enabled);
        assert_eq!(config.backups.suffix, ".orig");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.target.path.is_none());
        assert!(config.patch.mode.is_none());
        assert!(!config.backups.enabled);
        assert_eq!(config.backups.suffix, DEFAULT_BACKUP_SUFFIX);
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        let err = parse_config("[patch]\nmode = \"sometimes\"\n").unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn test_merge_defaults() {
        let merged = ConfigMerger::new(SpreadpatchConfig::default())
            .merge_apply_args(ApplyOverrides::default());
        assert_eq!(merged.target, Utf8PathBuf::from(DEFAULT_TARGET));
        assert_eq!(merged.patch_id, OBJECT_SPREAD_ID);
        assert_eq!(merged.mode, MatchMode::ExactlyOne);
        assert_eq!(merged.backup, None);
    }

    #[test]
    fn test_merge_cli_overrides_config() {
        let config = parse_config(
            r#"
[target]
path = "from/config.js"
[patch]
mode = "first"
"#,
        )
        .unwrap();

        let merged = ConfigMerger::new(config).merge_apply_args(ApplyOverrides {
            target: Some(Utf8PathBuf::from("from/cli.js")),
            mode: Some(MatchMode::All),
            ..Default::default()
        });

        assert_eq!(merged.target, Utf8PathBuf::from("from/cli.js"));
        assert_eq!(merged.mode, MatchMode::All);
    }

    #[test]
    fn test_merge_config_used_when_cli_silent() {
        let config = parse_config("[target]\npath = \"from/config.js\"\n").unwrap();
        let merged = ConfigMerger::new(config).merge_apply_args(ApplyOverrides::default());
        assert_eq!(merged.target, Utf8PathBuf::from("from/config.js"));
    }

    #[test]
    fn test_backup_flags() {
        let enabled = parse_config("[backups]\nenabled = true\nsuffix = \".b\"\n").unwrap();

        let merged = ConfigMerger::new(enabled.clone()).merge_apply_args(ApplyOverrides::default());
        assert_eq!(
            merged.backup,
            Some(BackupOptions {
                suffix: ".b".to_string()
            })
        );

        let merged = ConfigMerger::new(enabled).merge_apply_args(ApplyOverrides {
            no_backup: true,
            ..Default::default()
        });
        assert_eq!(merged.backup, None);

        let merged = ConfigMerger::new(SpreadpatchConfig::default()).merge_apply_args(
            ApplyOverrides {
                backup: true,
                ..Default::default()
            },
        );
        assert_eq!(merged.backup, Some(BackupOptions::default()));
    }

    #[test]
    fn test_target_in_root() {
        let merged = ConfigMerger::new(SpreadpatchConfig::default())
            .merge_apply_args(ApplyOverrides::default());
        assert_eq!(
            merged.target_in(Utf8Path::new("/repo")),
            Utf8PathBuf::from("/repo/tmp/src/recast.js")
        );
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        assert!(discover_config(&root).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "").expect("write config");
        assert!(discover_config(&root).is_some());
    }

    #[test]
    fn test_load_or_default_returns_default_when_missing() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let cfg = load_or_default(&root).expect("load default");
        assert!(cfg.target.path.is_none());
        assert!(!cfg.backups.enabled);
    }
}
