use serde::{Deserialize, Serialize};
use std::fmt;

/// Состояние клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    Pressed,
    Released,
}

impl KeyState {
    /// Значение для записи в uinput
    pub fn value(&self) -> i32 {
        match self {
            KeyState::Pressed => 1,
            KeyState::Released => 0,
        }
    }
}

/// Код клавиши (evdev коды)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KEY_{}", self.0)
    }
}

/// Модификаторы клавиш
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_ctrl(mut self, ctrl: bool) -> Self {
        self.ctrl = ctrl;
        self
    }

    #[cfg(test)]
    pub fn with_alt(mut self, alt: bool) -> Self {
        self.alt = alt;
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.super_key
    }

    pub fn to_vec(&self) -> Vec<String> {
        let mut result = Vec::new();
        if self.ctrl { result.push("ctrl".to_string()); }
        if self.alt { result.push("alt".to_string()); }
        if self.shift { result.push("shift".to_string()); }
        if self.super_key { result.push("super".to_string()); }
        result
    }

    pub fn from_vec(modifiers: &[String]) -> Self {
        let mut result = Self::new();
        for modifier in modifiers {
            match modifier.to_lowercase().as_str() {
                "ctrl" => result.ctrl = true,
                "alt" => result.alt = true,
                "shift" => result.shift = true,
                "super" => result.super_key = true,
                _ => {}
            }
        }
        result
    }

    /// Коды левых клавиш-модификаторов в порядке нажатия
    pub fn key_codes(&self) -> Vec<KeyCode> {
        let mut codes = Vec::with_capacity(4);
        if self.ctrl { codes.push(KeyCode(29)); }      // KEY_LEFTCTRL
        if self.alt { codes.push(KeyCode(56)); }       // KEY_LEFTALT
        if self.shift { codes.push(KeyCode(42)); }     // KEY_LEFTSHIFT
        if self.super_key { codes.push(KeyCode(125)); } // KEY_LEFTMETA
        codes
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = self.to_vec();
        if modifiers.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", modifiers.join("+"))
        }
    }
}

/// Комбинация клавиш, отправляемая в ответ на свайп
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyAction {
    pub key_code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyAction {
    pub fn new(key_code: KeyCode, modifiers: Modifiers) -> Self {
        Self { key_code, modifiers }
    }

    /// Последовательность событий: модификаторы вниз, клавиша, модификаторы вверх
    pub fn to_events(&self) -> Vec<VirtualKeyEvent> {
        let modifier_codes = self.modifiers.key_codes();
        let mut events = Vec::with_capacity(modifier_codes.len() * 2 + 2);

        events.extend(modifier_codes.iter().map(|&code| VirtualKeyEvent::press(code)));
        events.push(VirtualKeyEvent::press(self.key_code));
        events.push(VirtualKeyEvent::release(self.key_code));
        events.extend(modifier_codes.iter().rev().map(|&code| VirtualKeyEvent::release(code)));

        events
    }
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key_code.value())
        } else {
            write!(f, "{}+{}", self.modifiers, self.key_code.value())
        }
    }
}

/// События для виртуальной клавиатуры
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualKeyEvent {
    pub key_code: KeyCode,
    pub state: KeyState,
}

impl VirtualKeyEvent {
    pub fn new(key_code: KeyCode, state: KeyState) -> Self {
        Self { key_code, state }
    }

    pub fn press(key_code: KeyCode) -> Self {
        Self::new(key_code, KeyState::Pressed)
    }

    pub fn release(key_code: KeyCode) -> Self {
        Self::new(key_code, KeyState::Released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_to_from_vec() {
        let original = Modifiers::new().with_ctrl(true).with_alt(true);

        let vec = original.to_vec();
        let restored = Modifiers::from_vec(&vec);

        assert_eq!(original, restored);
        assert_eq!(original.to_string(), "ctrl+alt");
    }

    #[test]
    fn test_modifiers_from_vec_ignores_case() {
        let modifiers = Modifiers::from_vec(&["Alt".to_string(), "SUPER".to_string()]);
        assert_eq!(modifiers, Modifiers { alt: true, super_key: true, ..Modifiers::default() });
    }

    #[test]
    fn test_key_action_events_are_balanced() {
        let action = KeyAction::new(KeyCode::new(105), Modifiers::new().with_alt(true));
        let events = action.to_events();

        assert_eq!(
            events,
            vec![
                VirtualKeyEvent::press(KeyCode(56)),
                VirtualKeyEvent::press(KeyCode(105)),
                VirtualKeyEvent::release(KeyCode(105)),
                VirtualKeyEvent::release(KeyCode(56)),
            ]
        );
        assert_eq!(action.to_string(), "alt+105");
    }

    #[test]
    fn test_key_action_without_modifiers() {
        let action = KeyAction::new(KeyCode::new(158), Modifiers::new());
        assert_eq!(action.to_events().len(), 2);
        assert_eq!(action.to_string(), "158");
    }
}
