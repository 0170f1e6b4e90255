//! User configuration (`config.toml`) merged with command line overrides.

use crate::cli::Cli;
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use yearplan_model::{CurrencyLocale, NL_NL, currency_locale};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    scope: Option<String>,
    locale: Option<String>,
    keymap: Option<String>,
    timeout_secs: Option<u64>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
}

/// Effective settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub scope: Option<String>,
    pub locale: String,
    pub keymap: String,
    pub timeout_secs: u64,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            scope: None,
            locale: NL_NL.id.to_string(),
            keymap: "vim".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Read `path` (or the user config) and apply `cli` on top.
    ///
    /// Problems with the file never abort startup; they are returned as
    /// warnings and the defaults are used instead.
    pub fn load(cli: &Cli) -> (Config, Vec<String>) {
        let mut warnings = Vec::new();
        let explicit = cli.config.as_ref();
        let path = explicit.cloned().or_else(user_config_path);

        let mut config = Config::default();
        if let Some(path) = path.as_ref() {
            if path.exists() {
                if let Some(file) = read_config_file(path, &mut warnings) {
                    config.merge_file(file);
                }
            } else if explicit.is_some() {
                warnings.push(format!("Config file not found: {}", path.display()));
            }
        }
        config.merge_cli(cli);

        if currency_locale(&config.locale).is_none() {
            warnings.push(format!(
                "Unknown locale '{}'; using {}",
                config.locale, NL_NL.id
            ));
            config.locale = NL_NL.id.to_string();
        }
        (config, warnings)
    }

    fn merge_file(&mut self, file: ConfigFile) {
        if let Some(url) = file.base_url {
            self.base_url = url;
        }
        if file.scope.is_some() {
            self.scope = file.scope;
        }
        if let Some(locale) = file.locale {
            self.locale = locale;
        }
        if let Some(keymap) = file.keymap {
            self.keymap = keymap;
        }
        if let Some(secs) = file.timeout_secs.filter(|s| *s > 0) {
            self.timeout_secs = secs;
        }
        if file.log_file.is_some() {
            self.log_file = file.log_file;
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }
    }

    fn merge_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.url {
            self.base_url = url.clone();
        }
        if cli.scope.is_some() {
            self.scope = cli.scope.clone();
        }
        if let Some(locale) = &cli.locale {
            self.locale = locale.clone();
        }
        if let Some(keymap) = &cli.keymap {
            self.keymap = keymap.clone();
        }
        if let Some(secs) = cli.timeout_secs {
            self.timeout_secs = secs;
        }
        if cli.log_file.is_some() {
            self.log_file = cli.log_file.clone();
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn currency_locale(&self) -> &'static CurrencyLocale {
        currency_locale(&self.locale).unwrap_or(&NL_NL)
    }
}

fn read_config_file(path: &Path, warnings: &mut Vec<String>) -> Option<ConfigFile> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<ConfigFile>(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "yearplan")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn cli_with_config(path: &Path) -> Cli {
        Cli {
            config: Some(path.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn file_values_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
base_url = "https://plan.example"
scope = "school-7"
locale = "de-DE"
keymap = "emacs"
timeout_secs = 3
"#,
        )
        .unwrap();

        let (config, warnings) = Config::load(&cli_with_config(&path));
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(config.base_url, "https://plan.example");
        assert_eq!(config.scope.as_deref(), Some("school-7"));
        assert_eq!(config.currency_locale().id, "de-DE");
        assert_eq!(config.keymap, "emacs");
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = \"https://file.example\"\nkeymap = \"emacs\"\n").unwrap();

        let cli = Cli {
            url: Some("https://cli.example".into()),
            ..cli_with_config(&path)
        };
        let (config, _) = Config::load(&cli);
        assert_eq!(config.base_url, "https://cli.example");
        assert_eq!(config.keymap, "emacs");
    }

    #[test]
    fn unknown_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = \"https://x\"\ncolour = \"blue\"\n").unwrap();

        let (config, warnings) = Config::load(&cli_with_config(&path));
        assert_eq!(config, Config::default());
        assert!(warnings.iter().any(|w| w.contains("Failed to parse")));
    }

    #[test]
    fn oversized_file_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "#".repeat(MAX_CONFIG_FILE_BYTES as usize + 1)).unwrap();

        let (_, warnings) = Config::load(&cli_with_config(&path));
        assert!(warnings.iter().any(|w| w.contains("file too large")));
    }

    #[test]
    fn missing_explicit_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = Config::load(&cli_with_config(&dir.path().join("nope.toml")));
        assert_eq!(config, Config::default());
        assert!(warnings[0].starts_with("Config file not found"));
    }

    #[test]
    fn unknown_locale_falls_back_to_dutch() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            locale: Some("ja-JP".into()),
            ..cli_with_config(&dir.path().join("absent.toml"))
        };
        let (config, warnings) = Config::load(&cli);
        assert_eq!(config.locale, "nl-NL");
        assert!(warnings.iter().any(|w| w.contains("Unknown locale 'ja-JP'")));
    }
}
