//! Распознавание жестов
//!
//! Здесь живёт только классификатор двухточечного свайпа и троттлинг кадров.
//! Модуль ничего не знает об evdev: точки касания ему передаёт TouchListener,
//! а результат уходит подписчикам через `SwipeDetector::on_swipe`.

pub mod swipe_detector;
pub mod throttle;

pub use swipe_detector::{SwipeDetector, SwipeThresholds};
pub use throttle::FrameThrottle;
