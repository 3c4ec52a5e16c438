use crate::renderer::RenderOptions;
use crate::select::Selection;
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Configuration required to run the conversion.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
#[derive(Clone, Debug)]
pub struct ExportConfig {
    pub archive_path: PathBuf,
    pub selection: Selection,
    /// Print to stdout when unset.
    pub out_dir: Option<PathBuf>,
    pub render: RenderOptions,
    pub verbose: bool,
    pub quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    Printed,
    Created,
}

/// Preferences persisted in `config.toml`.
#[derive(Deserialize, Default, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub out_dir: Option<PathBuf>,
    pub frontmatter: Option<bool>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chatgpt-md/config.toml"))
}

pub fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = if let Some(p) = explicit_path {
        if !p.exists() {
            return Err(eyre!("Config file not found: {}", p.display()));
        }
        Some(p.to_path_buf())
    } else {
        default_config_path().filter(|p| p.exists())
    };

    match path {
        None => Ok(FileConfig::default()),
        Some(p) => {
            let content = fs::read_to_string(&p)
                .wrap_err_with(|| format!("Failed to read config: {}", p.display()))?;
            toml::from_str(&content)
                .wrap_err_with(|| format!("Failed to parse config: {}", p.display()))
        }
    }
}

/// Log to stderr so stdout stays reserved for rendered documents.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| eyre!(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = load_file_config(Some(Path::new("/no/such/config.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn parses_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "out_dir = \"/notes/chatgpt\"\nfrontmatter = false\n").unwrap();

        let cfg = load_file_config(Some(&path)).unwrap();
        assert_eq!(
            cfg,
            FileConfig {
                out_dir: Some(PathBuf::from("/notes/chatgpt")),
                frontmatter: Some(false),
            }
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "target = \"x\"\n").unwrap();
        assert!(load_file_config(Some(&path)).is_err());
    }
}
