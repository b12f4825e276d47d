//! Player configuration: key bindings, file locations and the log filter.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Directory name under `~/.config`.
pub const APP_DIR: &str = "rough-steps";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub key_bindings: KeyBindings,
    /// Base URL the position is published under.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_forward")]
    pub forward: Vec<String>,
    #[serde(default = "default_backward")]
    pub backward: Vec<String>,
    #[serde(default = "default_quit")]
    pub quit: Vec<String>,
}

fn default_forward() -> Vec<String> {
    vec!["Space".into(), "Right".into(), "Enter".into()]
}
fn default_backward() -> Vec<String> {
    vec!["Left".into(), "Backspace".into()]
}
fn default_quit() -> Vec<String> {
    vec!["q".into(), "Esc".into()]
}
fn default_base_url() -> String {
    "http://localhost:5173/".into()
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            forward: default_forward(),
            backward: default_backward(),
            quit: default_quit(),
        }
    }
}

impl KeyBindings {
    /// Menu bar entries, e.g. `[←][Backspace] back`. Actions with no key
    /// bound are left out.
    pub fn menu_items(&self) -> Vec<String> {
        [
            (&self.backward, "back"),
            (&self.forward, "next"),
            (&self.quit, "quit"),
        ]
        .into_iter()
        .filter(|(keys, _)| !keys.is_empty())
        .map(|(keys, action)| {
            let mut item: String = keys.iter().map(|k| format!("[{}]", key_label(k))).collect();
            item.push(' ');
            item.push_str(action);
            item
        })
        .collect()
    }

    /// Short hint for the status bar, built from the first key of each action.
    pub fn hint(&self) -> String {
        let first = |keys: &[String]| keys.first().map(|k| key_label(k)).unwrap_or_default();
        let navigate = first(&self.backward[..]) + &first(&self.forward[..]);
        let quit = first(&self.quit[..]);

        let mut parts = Vec::new();
        if !navigate.is_empty() {
            parts.push(format!("{navigate}: navigate"));
        }
        if !quit.is_empty() {
            parts.push(format!("{quit}: quit"));
        }
        parts.join(" | ")
    }
}

/// Display form of a binding string; arrows become arrow glyphs.
pub fn key_label(binding: &str) -> String {
    match binding {
        "Left" => "\u{2190}".into(),
        "Up" => "\u{2191}".into(),
        "Right" => "\u{2192}".into(),
        "Down" => "\u{2193}".into(),
        other => other.into(),
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            key_bindings: KeyBindings::default(),
            base_url: default_base_url(),
        }
    }
}

impl PlayerConfig {
    pub fn load() -> Self {
        let config_path = config_dir().join("player.json");
        match std::fs::read_to_string(&config_path) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                warn!(path = %config_path.display(), "invalid player config ({e}), using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// `~/.config/rough-steps`, or `./.config/rough-steps` without a home.
pub fn config_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    let mut path = PathBuf::from(home);
    path.push(".config");
    path.push(APP_DIR);
    path
}

pub fn log_file_path() -> PathBuf {
    config_dir().join("logs").join("rough-steps.log")
}

pub fn default_state_path() -> PathBuf {
    config_dir().join("position.url")
}

/// Log filter from `RUST_LOG`-style directives, `warn` when none are given
/// or they do not parse.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = PlayerConfig::from_json(r#"{ "key_bindings": { "forward": ["n"] } }"#).unwrap();
        assert_eq!(config.key_bindings.forward, vec!["n".to_string()]);
        assert_eq!(config.key_bindings.backward, default_backward());
        assert_eq!(config.base_url, "http://localhost:5173/");
    }

    #[test]
    fn empty_object_is_default() {
        let config = PlayerConfig::from_json("{}").unwrap();
        assert_eq!(config.key_bindings, KeyBindings::default());
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(PlayerConfig::from_json("{ \"key_bindings\": 3 }").is_err());
    }

    #[test]
    fn menu_follows_bindings() {
        assert_eq!(
            KeyBindings::default().menu_items(),
            vec!["[\u{2190}][Backspace] back", "[Space][\u{2192}][Enter] next", "[q][Esc] quit"]
        );

        let custom = KeyBindings {
            forward: vec!["n".into()],
            backward: vec!["p".into(), "Up".into()],
            quit: Vec::new(),
        };
        assert_eq!(custom.menu_items(), vec!["[p][\u{2191}] back", "[n] next"]);
        assert_eq!(custom.hint(), "pn: navigate");
        assert_eq!(KeyBindings::default().hint(), "\u{2190}\u{2192}: navigate | q: quit");
    }

    #[test]
    fn log_filter_honours_directives() {
        use tracing_subscriber::filter::LevelFilter;

        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(Some("")).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            log_filter(Some("rough_steps=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }
}
