use serde::{Deserialize, Serialize};
use std::fmt;

/// Верхняя граница ширины мобильного вьюпорта (включительно)
pub const MOBILE_MAX_WIDTH: u32 = 768;
/// Верхняя граница ширины планшетного вьюпорта (включительно)
pub const TABLET_MAX_WIDTH: u32 = 992;

/// Размер вьюпорта в единицах координат
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for ViewportSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    Mobile,
    Tablet,
    Desktop,
}

impl ViewportClass {
    pub fn classify(width: u32) -> Self {
        if width <= MOBILE_MAX_WIDTH {
            ViewportClass::Mobile
        } else if width <= TABLET_MAX_WIDTH {
            ViewportClass::Tablet
        } else {
            ViewportClass::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewportClass::Mobile => "mobile",
            ViewportClass::Tablet => "tablet",
            ViewportClass::Desktop => "desktop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    /// Квадратный экран считается портретным
    pub fn of(size: ViewportSize) -> Self {
        if size.width > size.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        }
    }
}

/// Класс вьюпорта, ориентация и наличие сенсорного ввода
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportProfile {
    pub class: ViewportClass,
    pub orientation: Orientation,
    pub touch: bool,
}

impl ViewportProfile {
    pub fn detect(size: ViewportSize, touch: bool) -> Self {
        Self {
            class: ViewportClass::classify(size.width),
            orientation: Orientation::of(size),
            touch,
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.class == ViewportClass::Mobile
    }

    /// Набор CSS-классов для `<body>`: ровно один класс размера,
    /// `touch` при сенсорном вводе и ровно один класс ориентации
    pub fn css_classes(&self) -> Vec<&'static str> {
        let mut classes = Vec::with_capacity(3);
        classes.push(self.class.as_str());
        if self.touch {
            classes.push("touch");
        }
        classes.push(self.orientation.as_str());
        classes
    }
}

impl fmt::Display for ViewportProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.css_classes().join(" "))
    }
}
