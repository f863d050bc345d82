//! Platform-agnostic input handling
//!
//! Both hosts translate their keyboard events into DOM-style key identifiers
//! (`"ArrowLeft"`, `"a"`, `" "`), so a single keymap serves web and native.

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(String),
}

/// What a recognized key asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    DropBomb,
}

/// Key mapping configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub drop: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec!["ArrowLeft".to_string(), "a".to_string()],
            right: vec!["ArrowRight".to_string(), "d".to_string()],
            drop: vec![" ".to_string(), "ArrowDown".to_string()],
        }
    }
}

fn matches_any(bound: &[String], key: &str) -> bool {
    bound.iter().any(|b| b.eq_ignore_ascii_case(key))
}

/// Maps key identifiers to game actions
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn action_for_key(&self, key: &str) -> Option<Action> {
        if matches_any(&self.bindings.left, key) {
            Some(Action::MoveLeft)
        } else if matches_any(&self.bindings.right, key) {
            Some(Action::MoveRight)
        } else if matches_any(&self.bindings.drop, key) {
            Some(Action::DropBomb)
        } else {
            None
        }
    }

    pub fn process_event(&self, event: &InputEvent) -> Option<Action> {
        match event {
            InputEvent::KeyDown(key) => self.action_for_key(key),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use super::*;
    use web_sys::KeyboardEvent;

    pub fn keyboard_event_to_input(e: &KeyboardEvent) -> InputEvent {
        InputEvent::KeyDown(e.key())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod native {
    use super::*;
    use winit::keyboard::{Key, NamedKey};

    /// Spell a winit logical key the way the DOM `KeyboardEvent.key` would
    pub fn key_to_input(key: &Key) -> Option<InputEvent> {
        let name = match key {
            Key::Named(NamedKey::ArrowLeft) => "ArrowLeft".to_string(),
            Key::Named(NamedKey::ArrowRight) => "ArrowRight".to_string(),
            Key::Named(NamedKey::ArrowDown) => "ArrowDown".to_string(),
            Key::Named(NamedKey::Space) => " ".to_string(),
            Key::Character(s) => s.to_string(),
            _ => return None,
        };
        Some(InputEvent::KeyDown(name))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_named_keys_use_dom_spelling() {
            assert_eq!(
                key_to_input(&Key::Named(NamedKey::Space)),
                Some(InputEvent::KeyDown(" ".to_string()))
            );
            assert_eq!(
                key_to_input(&Key::Named(NamedKey::ArrowLeft)),
                Some(InputEvent::KeyDown("ArrowLeft".to_string()))
            );
            assert_eq!(key_to_input(&Key::Named(NamedKey::Tab)), None);
            assert_eq!(key_to_input(&Key::Named(NamedKey::Escape)), None);
            assert_eq!(key_to_input(&Key::Named(NamedKey::ArrowUp)), None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let p = InputProcessor::default();
        assert_eq!(p.action_for_key("ArrowLeft"), Some(Action::MoveLeft));
        assert_eq!(p.action_for_key("a"), Some(Action::MoveLeft));
        assert_eq!(p.action_for_key("A"), Some(Action::MoveLeft));
        assert_eq!(p.action_for_key("ArrowRight"), Some(Action::MoveRight));
        assert_eq!(p.action_for_key("D"), Some(Action::MoveRight));
        assert_eq!(p.action_for_key(" "), Some(Action::DropBomb));
        assert_eq!(p.action_for_key("ArrowDown"), Some(Action::DropBomb));
    }

    #[test]
    fn test_other_keys_ignored() {
        let p = InputProcessor::default();
        for key in ["ArrowUp", "w", "Enter", "Shift", ""] {
            assert_eq!(p.action_for_key(key), None, "{key:?} should be ignored");
        }
    }

    #[test]
    fn test_custom_bindings() {
        let p = InputProcessor::new(KeyBindings {
            left: vec!["j".to_string()],
            right: vec!["l".to_string()],
            drop: vec!["k".to_string()],
        });
        assert_eq!(p.process_event(&InputEvent::KeyDown("j".to_string())), Some(Action::MoveLeft));
        assert_eq!(p.process_event(&InputEvent::KeyDown("k".to_string())), Some(Action::DropBomb));
        assert_eq!(p.process_event(&InputEvent::KeyDown("ArrowLeft".to_string())), None);
    }
}
