//! Input mapping — turns key events into navigation intents.
//!
//! Every press or auto-repeat of a bound key is one intent; nothing is
//! coalesced, so holding a key walks through the steps one at a time.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::KeyBindings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Forward,
    Backward,
    Quit,
}

pub struct InputMapper {
    bindings: KeyBindings,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl InputMapper {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn map(&self, event: &KeyEvent) -> Option<Intent> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let any = |list: &[String]| list.iter().any(|b| matches_binding(b, event));
        if any(&self.bindings.forward) {
            Some(Intent::Forward)
        } else if any(&self.bindings.backward) {
            Some(Intent::Backward)
        } else if any(&self.bindings.quit) {
            Some(Intent::Quit)
        } else {
            None
        }
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Alt-") {
        if !event.modifiers.contains(KeyModifiers::ALT) {
            return false;
        }
        return matches_key(rest, event.code);
    }

    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        if !event.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        return matches_key(rest, event.code);
    }

    // Plain bindings must not fire while Ctrl or Alt is held.
    if event.modifiers.contains(KeyModifiers::CONTROL)
        || event.modifiers.contains(KeyModifiers::ALT)
    {
        return false;
    }

    matches_key(binding, event.code)
}

fn matches_key(name: &str, code: KeyCode) -> bool {
    match name {
        "Right" => code == KeyCode::Right,
        "Left" => code == KeyCode::Left,
        "Up" => code == KeyCode::Up,
        "Down" => code == KeyCode::Down,
        "Enter" => code == KeyCode::Enter,
        "Esc" => code == KeyCode::Esc,
        "Space" => code == KeyCode::Char(' '),
        "Tab" => code == KeyCode::Tab,
        "Backspace" => code == KeyCode::Backspace,
        "PageUp" => code == KeyCode::PageUp,
        "PageDown" => code == KeyCode::PageDown,
        s => {
            if let Some(rest) = s.strip_prefix('F') {
                if let Ok(n) = rest.parse::<u8>() {
                    return code == KeyCode::F(n);
                }
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => code == KeyCode::Char(c),
                _ => false,
            }
        }
    }
}
