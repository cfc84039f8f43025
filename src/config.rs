use std::fs;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use tracing::debug;

/// Extension suffixes recognized when no config overrides them.
pub const DEFAULT_EXTENSIONS: [&str; 5] = [".h", ".cpp", ".hxx", ".rc", ".inl"];

const CONFIG_FILENAME: &str = ".recoder.toml";

/// Root configuration document. Every key is optional; absent keys fall
/// back to the built-in defaults.
#[derive(Debug, Default, Deserialize)]
pub struct RecodeConfig {
    pub extensions: Option<Vec<String>>,
    pub ignore_hidden: Option<bool>,
    pub follow_links: Option<bool>,
}

impl RecodeConfig {
    /// Recognized suffixes, each normalized to carry a leading dot.
    pub fn extensions(&self) -> Vec<String> {
        match &self.extensions {
            Some(list) => list.iter().map(|ext| normalize_extension(ext)).collect(),
            None => DEFAULT_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_owned())
                .collect(),
        }
    }

    pub fn ignore_hidden(&self) -> bool {
        self.ignore_hidden.unwrap_or(false)
    }

    pub fn follow_links(&self) -> bool {
        self.follow_links.unwrap_or(false)
    }
}

fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim();
    if trimmed.starts_with('.') {
        trimmed.to_owned()
    } else {
        format!(".{trimmed}")
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigPathSource {
    Explicit,
    Discovered,
    HomeDefault,
}

impl ConfigPathSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigPathSource::Explicit => "explicit",
            ConfigPathSource::Discovered => "discovered",
            ConfigPathSource::HomeDefault => "home-default",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedConfigPath {
    pub path: Utf8PathBuf,
    pub source: ConfigPathSource,
}

/// Resolve which config file governs this run: an explicit path, else the
/// nearest `.recoder.toml` at or above the working directory, else the
/// home default.
pub fn resolve_config_path(explicit: Option<&Utf8Path>) -> Result<ResolvedConfigPath> {
    if let Some(path) = explicit {
        return Ok(ResolvedConfigPath {
            path: path.to_owned(),
            source: ConfigPathSource::Explicit,
        });
    }

    if let Ok(cwd) = current_working_dir() {
        if let Some(path) = discover_from(&cwd) {
            return Ok(ResolvedConfigPath {
                path,
                source: ConfigPathSource::Discovered,
            });
        }
    }

    let base =
        dirs::config_dir().ok_or_else(|| anyhow!("unable to determine config directory"))?;
    let mut path = base;
    path.push("recoder");
    path.push("config.toml");
    let path =
        Utf8PathBuf::from_path_buf(path).map_err(|_| anyhow!("config path must be valid UTF-8"))?;
    Ok(ResolvedConfigPath {
        path,
        source: ConfigPathSource::HomeDefault,
    })
}

/// Walk up from `start` looking for a `.recoder.toml`.
pub fn discover_from(start: &Utf8Path) -> Option<Utf8PathBuf> {
    let mut current: Option<&Utf8Path> = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

/// Load a configuration file from disk and deserialize it.
pub fn load_from_path(path: &Utf8Path) -> Result<RecodeConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path))
}

/// Load the effective configuration. An explicit path must exist and
/// parse; the discovered and home-default tiers fall back to the defaults
/// when no file is present.
pub fn load(explicit: Option<&Utf8Path>) -> Result<RecodeConfig> {
    let resolved = resolve_config_path(explicit)?;
    if resolved.source != ConfigPathSource::Explicit && !resolved.path.exists() {
        debug!("no config at {}; using defaults", resolved.path);
        return Ok(RecodeConfig::default());
    }
    debug!("config {} ({})", resolved.path, resolved.source.as_str());
    load_from_path(&resolved.path)
}

fn current_working_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("determining current directory")?;
    Utf8PathBuf::from_path_buf(cwd).map_err(|_| anyhow!("current directory is not valid UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_root(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn defaults_cover_the_recognized_set() {
        let config = RecodeConfig::default();
        assert_eq!(
            config.extensions(),
            vec![".h", ".cpp", ".hxx", ".rc", ".inl"]
        );
        assert!(!config.ignore_hidden());
        assert!(!config.follow_links());
    }

    #[test]
    fn extension_entries_gain_a_leading_dot() {
        let config = RecodeConfig {
            extensions: Some(vec!["h".into(), ".cpp".into(), " rc".into()]),
            ..Default::default()
        };
        assert_eq!(config.extensions(), vec![".h", ".cpp", ".rc"]);
    }

    #[test]
    fn discover_walks_up_to_the_nearest_config() {
        let dir = TempDir::new().unwrap();
        let root = utf8_root(&dir);
        let nested = root.join("a").join("b");
        fs::create_dir_all(nested.as_std_path()).unwrap();
        fs::write(
            root.join(CONFIG_FILENAME).as_std_path(),
            "ignore_hidden = true\n",
        )
        .unwrap();

        let found = discover_from(&nested).unwrap();
        assert_eq!(found, root.join(CONFIG_FILENAME));
    }

    #[test]
    fn nearest_config_shadows_outer_ones() {
        let dir = TempDir::new().unwrap();
        let root = utf8_root(&dir);
        let nested = root.join("inner");
        fs::create_dir_all(nested.as_std_path()).unwrap();
        fs::write(root.join(CONFIG_FILENAME).as_std_path(), "").unwrap();
        fs::write(nested.join(CONFIG_FILENAME).as_std_path(), "").unwrap();

        let found = discover_from(&nested).unwrap();
        assert_eq!(found, nested.join(CONFIG_FILENAME));
    }

    #[test]
    fn explicit_path_is_used_verbatim() {
        let dir = TempDir::new().unwrap();
        let root = utf8_root(&dir);
        let path = root.join("conf.toml");
        fs::write(path.as_std_path(), "extensions = ['txt']\n").unwrap();

        let resolved = resolve_config_path(Some(&path)).unwrap();
        assert_eq!(resolved.source, ConfigPathSource::Explicit);
        assert_eq!(resolved.path, path);

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.extensions(), vec![".txt"]);
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let root = utf8_root(&dir);
        assert!(load(Some(&root.join("missing.toml"))).is_err());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let root = utf8_root(&dir);
        let path = root.join("broken.toml");
        fs::write(path.as_std_path(), "extensions = 3\n").unwrap();
        assert!(load_from_path(&path).is_err());
    }
}
