use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use crate::colour::Colour;
use crate::dauber::DauberShape;
use crate::error::{BingoError, Result};

pub const CONFIG_FILE: &str = "config.json";

/// Defaults read from a JSON file; any command-line flag overrides them.
///
/// ```json
/// {
///   "card_colour": "green",
///   "dauber_colour": "#ff00ff",
///   "dauber_shape": "maple-leaf",
///   "title": "Friday Night Bingo",
///   "output": "/home/me/bingo",
///   "wkhtmltopdf": "/opt/wkhtmltox/bin/wkhtmltopdf"
/// }
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub card_colour: Option<Colour>,
    pub dauber_colour: Option<Colour>,
    pub dauber_shape: Option<DauberShape>,
    pub title: Option<String>,
    pub logo: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub wkhtmltopdf: Option<PathBuf>,
}

impl Config {
    pub fn read(path: &Path) -> Result<Self> {
        let file =
            File::open(path).map_err(|e| BingoError::io("failed to open config", path, e))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|source| BingoError::ConfigFile { path: path.to_path_buf(), source })
    }

    /// Loads the explicitly named file, or the per-user file when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }
        let Some(path) = default_path() else {
            return Ok(Self::default());
        };
        match Self::read(&path) {
            Err(BingoError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }
}

/// `<config dir>/bingo-cards/config.json`
pub fn default_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join("bingo-cards").join(CONFIG_FILE))
}

/// Where sheets go when neither the command line nor the config names a directory.
pub fn default_output_dir() -> PathBuf {
    dirs_next::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bingo-cards")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r##"{ "card_colour": "Green", "dauber_shape": "x-mark", "title": "Friday", "output": "out" }"##,
        )
        .unwrap();

        let config = Config::read(&path).expect("should read file");
        assert_eq!(config.card_colour.unwrap().as_css(), "green");
        assert_eq!(config.dauber_shape, Some(DauberShape::XMark));
        assert_eq!(config.title.as_deref(), Some("Friday"));
        assert_eq!(config.output, Some(PathBuf::from("out")));
        assert_eq!(config.dauber_colour, None);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "card_colour": "not a colour!" }"#).unwrap();
        assert!(matches!(Config::read(&path), Err(BingoError::ConfigFile { .. })));

        std::fs::write(&path, r#"{ "card_color": "blue" }"#).unwrap();
        assert!(matches!(Config::read(&path), Err(BingoError::ConfigFile { .. })));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let err = Config::load(Some(Path::new("no/such/config.json"))).unwrap_err();
        assert!(matches!(err, BingoError::Io { .. }));
    }
}
