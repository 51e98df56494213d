use super::viewport::{ViewportProfile, ViewportSize};
use serde::Serialize;

/// Ширина, ниже которой навигация на мобильном складывается в столбец
pub const NAV_STACK_MAX_WIDTH: u32 = 480;
/// Отступ под поле ввода поверх высоты клавиатуры
pub const KEYBOARD_INPUT_PADDING: u32 = 80;
/// z-index закреплённой области ввода при открытой клавиатуре
pub const PINNED_INPUT_Z_INDEX: u32 = 1001;
/// Потолок авто-высоты поля ввода на мобильном
pub const INPUT_MAX_HEIGHT: u32 = 120;
/// Место под навигацию и поле ввода, вычитаемое из высоты ленты сообщений
pub const CHROME_HEIGHT: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavLayout {
    Inline,
    Stacked,
}

impl NavLayout {
    pub fn for_width(width: u32) -> Self {
        if width < NAV_STACK_MAX_WIDTH {
            NavLayout::Stacked
        } else {
            NavLayout::Inline
        }
    }
}

/// Открытая виртуальная клавиатура
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyboardInset {
    pub keyboard_height: u32,
    pub padding_bottom: u32,
    pub z_index: u32,
}

/// Высота клавиатуры как разница между окном и видимой областью.
/// Учитывается только на мобильных сенсорных вьюпортах.
pub fn keyboard_inset(
    inner_height: u32,
    visual_height: u32,
    profile: &ViewportProfile,
) -> Option<KeyboardInset> {
    if !profile.touch || !profile.is_mobile() {
        return None;
    }

    let keyboard_height = inner_height.saturating_sub(visual_height);
    (keyboard_height > 0).then(|| KeyboardInset {
        keyboard_height,
        padding_bottom: keyboard_height + KEYBOARD_INPUT_PADDING,
        z_index: PINNED_INPUT_Z_INDEX,
    })
}

/// Авто-высота поля ввода; `None` означает естественную высоту
pub fn input_height(scroll_height: u32, profile: &ViewportProfile) -> Option<u32> {
    profile
        .is_mobile()
        .then(|| scroll_height.min(INPUT_MAX_HEIGHT))
}

pub fn messages_max_height(viewport_height: u32, profile: &ViewportProfile) -> Option<u32> {
    profile
        .is_mobile()
        .then(|| viewport_height.saturating_sub(CHROME_HEIGHT))
}

/// Сводка раскладки для текущего вьюпорта
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutHints {
    pub nav: NavLayout,
    pub input_max_height: Option<u32>,
    pub messages_max_height: Option<u32>,
    pub keyboard: Option<KeyboardInset>,
}

impl LayoutHints {
    pub fn compute(size: ViewportSize, visual_height: u32, profile: &ViewportProfile) -> Self {
        let nav = if profile.is_mobile() {
            NavLayout::for_width(size.width)
        } else {
            NavLayout::Inline
        };

        Self {
            nav,
            input_max_height: input_height(u32::MAX, profile),
            messages_max_height: messages_max_height(visual_height, profile),
            keyboard: keyboard_inset(size.height, visual_height, profile),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> ViewportProfile {
        ViewportProfile::detect(ViewportSize::new(390, 844), true)
    }

    fn desktop() -> ViewportProfile {
        ViewportProfile::detect(ViewportSize::new(1440, 900), true)
    }

    #[test]
    fn test_keyboard_inset_on_phone() {
        let inset = keyboard_inset(844, 544, &phone()).unwrap();
        assert_eq!(inset.keyboard_height, 300);
        assert_eq!(inset.padding_bottom, 380);
        assert_eq!(inset.z_index, 1001);
    }

    #[test]
    fn test_keyboard_closed() {
        assert_eq!(keyboard_inset(844, 844, &phone()), None);
        // Видимая область больше окна (зум) не считается клавиатурой
        assert_eq!(keyboard_inset(844, 900, &phone()), None);
    }

    #[test]
    fn test_keyboard_ignored_off_mobile_or_without_touch() {
        assert_eq!(keyboard_inset(900, 600, &desktop()), None);

        let no_touch = ViewportProfile::detect(ViewportSize::new(390, 844), false);
        assert_eq!(keyboard_inset(844, 544, &no_touch), None);
    }

    #[test]
    fn test_input_height_is_capped_on_mobile() {
        assert_eq!(input_height(40, &phone()), Some(40));
        assert_eq!(input_height(400, &phone()), Some(120));
        assert_eq!(input_height(400, &desktop()), None);
    }

    #[test]
    fn test_messages_max_height() {
        assert_eq!(messages_max_height(844, &phone()), Some(694));
        assert_eq!(messages_max_height(100, &phone()), Some(0));
        assert_eq!(messages_max_height(900, &desktop()), None);
    }

    #[test]
    fn test_nav_layout() {
        assert_eq!(NavLayout::for_width(479), NavLayout::Stacked);
        assert_eq!(NavLayout::for_width(480), NavLayout::Inline);
    }

    #[test]
    fn test_compute_hints() {
        let size = ViewportSize::new(390, 844);
        let hints = LayoutHints::compute(size, 844, &phone());
        assert_eq!(hints.nav, NavLayout::Stacked);
        assert_eq!(hints.input_max_height, Some(120));
        assert_eq!(hints.messages_max_height, Some(694));
        assert_eq!(hints.keyboard, None);

        let hints = LayoutHints::compute(ViewportSize::new(1440, 900), 900, &desktop());
        assert_eq!(hints.nav, NavLayout::Inline);
        assert_eq!(hints.input_max_height, None);
        assert_eq!(hints.messages_max_height, None);
    }
}
