//! View settings: built-in defaults, an optional TOML file, then flags.
//!
//! ```toml
//! [view]
//! width = 100
//! height = 40
//! inline_styles = true
//! skip = 0
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use caesium_core::TokenizeOptions;
use serde::Deserialize;

use crate::cli::Cli;

pub const DEFAULT_WIDTH: usize = 80;

/// Contents of a config file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub view: ViewSection,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewSection {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub inline_styles: Option<bool>,
    pub skip: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config '{}'", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Settings one run works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    pub width: usize,
    pub height: Option<usize>,
    pub inline_styles: bool,
    pub skip: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: None,
            inline_styles: false,
            skip: 0,
        }
    }
}

impl ViewConfig {
    /// Flags win over the file, the file wins over defaults.
    ///
    /// `--styles` can only switch styles on; a file that enables them is
    /// not overridden by its absence.
    pub fn resolve(cli: &Cli, file: Option<&FileConfig>) -> Self {
        let defaults = Self::default();
        let view = file.map(|f| f.view.clone()).unwrap_or_default();
        Self {
            width: cli.width.or(view.width).unwrap_or(defaults.width),
            height: cli.height.or(view.height).or(defaults.height),
            inline_styles: cli.styles || view.inline_styles.unwrap_or(defaults.inline_styles),
            skip: cli.skip.or(view.skip).unwrap_or(defaults.skip),
        }
    }

    pub fn tokenize_options(&self) -> TokenizeOptions {
        TokenizeOptions::default().with_inline_styles(self.inline_styles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(FileConfig::parse("").unwrap(), FileConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::parse("[view]\ncolour = true\n").is_err());
    }
}
