use anyhow::Context;
use notetaker_engine::editing::{AbbreviationTable, BracketOptions};
use notetaker_engine::session::SessionOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Contents of `~/.config/notetaker/config.toml`.
///
/// ```toml
/// notes_path = "~/notes"
///
/// [abbreviations]
/// brb = "be right back"
///
/// [brackets]
/// auto_pair_open_bracket = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_path: Option<PathBuf>,
    pub abbreviations: AbbreviationTable,
    pub brackets: BracketOptions,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        if let Some(notes) = config.notes_path.take() {
            config.notes_path = Some(expand_path(&notes).unwrap_or(notes));
        }
        Ok(Some(config))
    }

    /// Loads `~/.config/notetaker/config.toml`; a missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    /// Writes the settings as TOML, creating parent directories.
    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(config_path, toml::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write {}", config_path.display()))
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        PathBuf::from(shellexpand::tilde("~/.config/notetaker/config.toml").as_ref())
    }

    /// Settings handed to each note session.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            abbreviations: self.abbreviations.clone(),
            brackets: self.brackets.clone(),
        }
    }

    /// Resolves a note path given on the command line: relative paths that do
    /// not exist as given are looked up under `notes_path`.
    pub fn resolve_note(&self, note: &Path) -> PathBuf {
        match &self.notes_path {
            Some(root) if note.is_relative() && !note.exists() => root.join(note),
            _ => note.to_path_buf(),
        }
    }
}

/// `~` and `$VAR` expansion for paths written in the config file.
fn expand_path(path: &Path) -> Option<PathBuf> {
    shellexpand::full(&path.to_string_lossy())
        .ok()
        .map(|expanded| PathBuf::from(expanded.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notetaker_engine::session::NoteSession;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert!(!config.brackets.auto_pair_open_bracket);
    }

    #[test]
    fn test_abbreviations_and_brackets_from_toml() {
        let config_content = r#"
[abbreviations]
brb = "be right back"
ty = "thank you"

[brackets]
auto_pair_open_bracket = true
"#;

        let config: Config = toml::from_str(config_content).unwrap();

        assert_eq!(config.abbreviations.get("brb"), Some("be right back"));
        assert_eq!(config.abbreviations.len(), 2);
        assert!(config.brackets.auto_pair_open_bracket);
        assert_eq!(config.notes_path, None);

        let options = config.session_options();
        assert_eq!(options.abbreviations, config.abbreviations);
        assert!(options.brackets.auto_pair_open_bracket);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_config_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[abbreviations]\nbrb = 3\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            notes_path: Some(PathBuf::from("/tmp/test-notes")),
            abbreviations: [("brb", "be right back")].into_iter().collect(),
            brackets: BracketOptions {
                auto_pair_open_bracket: true,
            },
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_config_with_env_var_in_toml() {
        unsafe {
            env::set_var("NOTETAKER_NOTES_ROOT", "/custom/notes");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "notes_path = \"$NOTETAKER_NOTES_ROOT/my-notes\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(
            config.notes_path,
            Some(PathBuf::from("/custom/notes/my-notes"))
        );

        unsafe {
            env::remove_var("NOTETAKER_NOTES_ROOT");
        }
    }

    #[test]
    fn test_loaded_settings_drive_a_session() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "[abbreviations]\nbrb = \"be right back\"\n\n[brackets]\nauto_pair_open_bracket = true\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        let mut session = NoteSession::new("ok brb", config.session_options());
        session.type_text(" ");
        session.type_text("[");

        assert_eq!(session.text(), "ok be right back []");
    }

    #[test]
    fn test_resolve_note_under_notes_path() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            notes_path: Some(temp_dir.path().to_path_buf()),
            ..Config::default()
        };

        assert_eq!(
            config.resolve_note(Path::new("journal/today.md")),
            temp_dir.path().join("journal/today.md")
        );
        assert_eq!(
            config.resolve_note(Path::new("/abs/note.md")),
            PathBuf::from("/abs/note.md")
        );
        assert_eq!(
            Config::default().resolve_note(Path::new("note.md")),
            PathBuf::from("note.md")
        );
    }
}
