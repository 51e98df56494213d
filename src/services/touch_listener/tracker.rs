use crate::events::{GesturePoint, SwipeDirection};
use crate::gesture::{FrameThrottle, SwipeDetector};
use crate::trace_if_enabled;
use std::time::Instant;

/// Сырые события сенсорного экрана, уже очищенные от специфики evdev
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTouchEvent {
    /// BTN_TOUCH: true при касании, false при отпускании
    Contact(bool),
    PositionX(i32),
    PositionY(i32),
    /// SYN_REPORT: конец кадра
    Report,
}

/// Начало или конец касания, собранные из кадра
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchSignal {
    Start(GesturePoint),
    End(GesturePoint),
}

/// Собирает кадры evdev в сигналы касания и передаёт их в SwipeDetector.
///
/// Переход BTN_TOUCH применяется только на SYN_REPORT: устройства присылают
/// кнопку и координаты кадра в произвольном порядке.
pub struct TouchTracker {
    detector: SwipeDetector,
    throttle: FrameThrottle,
    x: Option<i32>,
    y: Option<i32>,
    pending_contact: Option<bool>,
    in_contact: bool,
}

impl TouchTracker {
    pub fn new(detector: SwipeDetector) -> Self {
        Self {
            detector,
            throttle: FrameThrottle::default(),
            x: None,
            y: None,
            pending_contact: None,
            in_contact: false,
        }
    }

    pub fn feed(&mut self, event: RawTouchEvent) -> Option<SwipeDirection> {
        match self.assemble(event)? {
            TouchSignal::Start(point) => {
                self.detector.on_touch_start(point);
                None
            }
            TouchSignal::End(point) => self.detector.on_touch_end(point),
        }
    }

    fn assemble(&mut self, event: RawTouchEvent) -> Option<TouchSignal> {
        match event {
            RawTouchEvent::Contact(down) => {
                self.pending_contact = Some(down);
                None
            }
            RawTouchEvent::PositionX(x) => {
                self.x = Some(x);
                None
            }
            RawTouchEvent::PositionY(y) => {
                self.y = Some(y);
                None
            }
            RawTouchEvent::Report => self.commit_frame(),
        }
    }

    fn commit_frame(&mut self) -> Option<TouchSignal> {
        let point = self.x.zip(self.y).map(|(x, y)| GesturePoint::new(x, y));

        match (self.pending_contact, self.in_contact) {
            (Some(true), false) => {
                // Без координат касание остаётся отложенным до следующего кадра
                let point = point?;
                self.pending_contact = None;
                self.in_contact = true;
                Some(TouchSignal::Start(point))
            }
            (Some(false), true) => {
                self.pending_contact = None;
                self.in_contact = false;
                point.map(TouchSignal::End)
            }
            (Some(_), _) => {
                self.pending_contact = None;
                None
            }
            (None, true) => {
                if let Some(point) = point {
                    if self.throttle.try_acquire(Instant::now()) {
                        trace_if_enabled!("Движение касания {}", point);
                    }
                }
                None
            }
            (None, false) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::RawTouchEvent::*;

    fn feed_all(tracker: &mut TouchTracker, events: &[RawTouchEvent]) -> Vec<SwipeDirection> {
        events.iter().filter_map(|&event| tracker.feed(event)).collect()
    }

    #[test]
    fn test_swipe_across_frames() {
        let mut tracker = TouchTracker::new(SwipeDetector::default());
        let events = [
            Contact(true), PositionX(200), PositionY(300), Report,
            PositionX(120), Report,
            PositionX(10), PositionY(310), Report,
            Contact(false), Report,
        ];
        assert_eq!(feed_all(&mut tracker, &events), vec![SwipeDirection::Left]);
    }

    #[test]
    fn test_contact_before_coordinates_waits_for_position() {
        let mut tracker = TouchTracker::new(SwipeDetector::default());
        let events = [
            Contact(true), Report,
            PositionX(100), PositionY(300), Report,
            PositionX(260), PositionY(250), Report,
            Contact(false), Report,
        ];
        assert_eq!(feed_all(&mut tracker, &events), vec![SwipeDirection::Right]);
    }

    #[test]
    fn test_vertical_scroll_emits_nothing() {
        let mut tracker = TouchTracker::new(SwipeDetector::default());
        let events = [
            Contact(true), PositionX(100), PositionY(300), Report,
            PositionY(500), Report,
            Contact(false), Report,
        ];
        assert!(feed_all(&mut tracker, &events).is_empty());
    }

    #[test]
    fn test_release_without_contact_is_ignored() {
        let mut tracker = TouchTracker::new(SwipeDetector::default());
        let events = [PositionX(500), PositionY(0), Contact(false), Report];
        assert!(feed_all(&mut tracker, &events).is_empty());
    }

    #[test]
    fn test_repeated_contact_does_not_restart_session() {
        let mut tracker = TouchTracker::new(SwipeDetector::default());
        let events = [
            Contact(true), PositionX(0), PositionY(0), Report,
            PositionX(300), Contact(true), Report,
            Contact(false), Report,
        ];
        assert_eq!(feed_all(&mut tracker, &events), vec![SwipeDirection::Right]);
    }
}
