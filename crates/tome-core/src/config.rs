//! Configuration types for tome.
//!
//! [`Config::load`] reads `~/.config/tome/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).
//!
//! The debounce interval and the result cap are deliberately *not* here —
//! they are constants of the search behaviour, not user surface.

use serde::Deserialize;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[ui]
show_covers       = true
show_publish_year = true

[keybindings]
toggle_focus = "Tab"
search_focus = "/"
open_result  = "Enter"
clear_search = "C"
help         = "?"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from
/// `~/.config/tome/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_show_covers")]
    pub show_covers: bool,
    #[serde(default = "default_show_publish_year")]
    pub show_publish_year: bool,
}

fn default_show_covers() -> bool { true }
fn default_show_publish_year() -> bool { true }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_covers: default_show_covers(),
            show_publish_year: default_show_publish_year(),
        }
    }
}

/// `[keybindings]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeybindingsConfig {
    #[serde(default = "default_toggle_focus")]
    pub toggle_focus: String,
    #[serde(default = "default_search_focus")]
    pub search_focus: String,
    #[serde(default = "default_open_result")]
    pub open_result: String,
    #[serde(default = "default_clear_search")]
    pub clear_search: String,
    #[serde(default = "default_help")]
    pub help: String,
}

fn default_toggle_focus() -> String { "Tab".to_string() }
fn default_search_focus() -> String { "/".to_string() }
fn default_open_result() -> String { "Enter".to_string() }
fn default_clear_search() -> String { "C".to_string() }
fn default_help() -> String { "?".to_string() }

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            toggle_focus: default_toggle_focus(),
            search_focus: default_search_focus(),
            open_result: default_open_result(),
            clear_search: default_clear_search(),
            help: default_help(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/tome/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not
    /// exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("tome")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
