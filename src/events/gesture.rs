use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Одно показание координат касания
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GesturePoint {
    pub x: i32,
    pub y: i32,
    pub timestamp: Instant,
}

impl GesturePoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            timestamp: Instant::now(),
        }
    }

    /// Смещение (dx, dy) от `start` до этой точки
    pub fn displacement_from(&self, start: &GesturePoint) -> (i64, i64) {
        (
            i64::from(self.x) - i64::from(start.x),
            i64::from(self.y) - i64::from(start.y),
        )
    }
}

impl fmt::Display for GesturePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Направление горизонтального свайпа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Имя события, которое получают подписчики
    pub fn event_name(&self) -> &'static str {
        match self {
            SwipeDirection::Left => "swipeLeft",
            SwipeDirection::Right => "swipeRight",
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Распознанный свайп, передаваемый из слушателя в диспетчер
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwipeEvent {
    pub direction: SwipeDirection,
    pub timestamp: Instant,
}

impl SwipeEvent {
    pub fn new(direction: SwipeDirection) -> Self {
        Self {
            direction,
            timestamp: Instant::now(),
        }
    }
}

impl fmt::Display for SwipeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}ms ago)",
            self.direction,
            self.timestamp.elapsed().as_millis()
        )
    }
}
