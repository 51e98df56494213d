pub mod gesture;
pub mod keyboard;

pub use gesture::{GesturePoint, SwipeDirection, SwipeEvent};
pub use keyboard::{KeyAction, KeyCode, KeyState, Modifiers, VirtualKeyEvent};
