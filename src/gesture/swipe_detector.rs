use crate::debug_if_enabled;
use crate::events::{GesturePoint, SwipeDirection};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Пороги распознавания свайпа (в единицах координат устройства)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SwipeThresholds {
    /// Минимальное |dx|, чтобы жест считался свайпом (отсекает тапы и дрожание)
    pub min_horizontal_distance: u32,
    /// Максимальное |dy|, после которого жест считается прокруткой или диагональю
    pub max_vertical_drift: u32,
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self {
            min_horizontal_distance: 150,
            max_vertical_drift: 100,
        }
    }
}

/// Состояние распознавателя: одна незавершённая сессия максимум
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwipeState {
    #[default]
    Idle,
    Armed { start: GesturePoint },
}

pub type SwipeHandler = Box<dyn FnMut(SwipeDirection) + Send>;

/// Классификатор двухточечного горизонтального свайпа.
///
/// `on_touch_start` взводит сессию (перезаписывая незавершённую), `on_touch_end`
/// классифицирует смещение и возвращает распознаватель в `Idle`. Каждый
/// распознанный свайп доставляется всем подписчикам `on_swipe` в порядке регистрации.
pub struct SwipeDetector {
    thresholds: SwipeThresholds,
    state: SwipeState,
    handlers: SmallVec<[SwipeHandler; 2]>,
}

impl SwipeDetector {
    pub fn new(thresholds: SwipeThresholds) -> Self {
        Self {
            thresholds,
            state: SwipeState::Idle,
            handlers: SmallVec::new(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> SwipeState {
        self.state
    }

    /// Подписаться на распознанные свайпы
    pub fn on_swipe<F>(&mut self, handler: F)
    where
        F: FnMut(SwipeDirection) + Send + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn on_touch_start(&mut self, point: GesturePoint) {
        if let SwipeState::Armed { start } = self.state {
            debug_if_enabled!("Незавершённая сессия {} перезаписана новым касанием", start);
        }
        self.state = SwipeState::Armed { start: point };
    }

    pub fn on_touch_end(&mut self, point: GesturePoint) -> Option<SwipeDirection> {
        let start = match std::mem::take(&mut self.state) {
            SwipeState::Armed { start } => start,
            SwipeState::Idle => return None,
        };

        let direction = classify(&start, &point, &self.thresholds);
        debug_if_enabled!(
            "Жест {} -> {} за {}мс: {:?}",
            start,
            point,
            point.timestamp.saturating_duration_since(start.timestamp).as_millis(),
            direction
        );

        if let Some(direction) = direction {
            for handler in self.handlers.iter_mut() {
                handler(direction);
            }
        }

        direction
    }
}

impl Default for SwipeDetector {
    fn default() -> Self {
        Self::new(SwipeThresholds::default())
    }
}

/// Классифицировать пару точек без учёта состояния
pub fn classify(
    start: &GesturePoint,
    end: &GesturePoint,
    thresholds: &SwipeThresholds,
) -> Option<SwipeDirection> {
    let (dx, dy) = end.displacement_from(start);

    if dx.unsigned_abs() >= u64::from(thresholds.min_horizontal_distance)
        && dy.unsigned_abs() <= u64::from(thresholds.max_vertical_drift)
    {
        Some(if dx > 0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_detector() -> (SwipeDetector, Arc<Mutex<Vec<SwipeDirection>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut detector = SwipeDetector::default();
        let sink = seen.clone();
        detector.on_swipe(move |direction| sink.lock().unwrap().push(direction));
        (detector, seen)
    }

    fn gesture(detector: &mut SwipeDetector, start: (i32, i32), end: (i32, i32)) -> Option<SwipeDirection> {
        detector.on_touch_start(GesturePoint::new(start.0, start.1));
        detector.on_touch_end(GesturePoint::new(end.0, end.1))
    }

    #[test]
    fn test_swipe_left_scenario() {
        let (mut detector, seen) = recording_detector();
        assert_eq!(gesture(&mut detector, (200, 300), (10, 310)), Some(SwipeDirection::Left));
        assert_eq!(*seen.lock().unwrap(), vec![SwipeDirection::Left]);
    }

    #[test]
    fn test_swipe_right_scenario() {
        let (mut detector, seen) = recording_detector();
        assert_eq!(gesture(&mut detector, (100, 300), (260, 250)), Some(SwipeDirection::Right));
        assert_eq!(*seen.lock().unwrap(), vec![SwipeDirection::Right]);
    }

    #[test]
    fn test_vertical_scroll_is_ignored() {
        let (mut detector, seen) = recording_detector();
        assert_eq!(gesture(&mut detector, (100, 300), (100, 500)), None);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_tap_is_ignored() {
        let (mut detector, seen) = recording_detector();
        assert_eq!(gesture(&mut detector, (100, 300), (120, 310)), None);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_threshold_boundaries_are_inclusive() {
        let mut detector = SwipeDetector::default();
        assert_eq!(gesture(&mut detector, (0, 0), (150, 100)), Some(SwipeDirection::Right));
        assert_eq!(gesture(&mut detector, (0, 0), (-150, -100)), Some(SwipeDirection::Left));
        assert_eq!(gesture(&mut detector, (0, 0), (149, 0)), None);
        assert_eq!(gesture(&mut detector, (0, 0), (-149, 0)), None);
        assert_eq!(gesture(&mut detector, (0, 0), (150, 101)), None);
        assert_eq!(gesture(&mut detector, (0, 0), (-150, -101)), None);
    }

    #[test]
    fn test_classification_grid() {
        let thresholds = SwipeThresholds::default();
        let origin = GesturePoint::new(1000, 1000);
        for dx in (-600..=600).step_by(25) {
            for dy in (-300..=300).step_by(25) {
                let end = GesturePoint::new(1000 + dx, 1000 + dy);
                let expected = if dx.abs() < 150 || dy.abs() > 100 {
                    None
                } else if dx > 0 {
                    Some(SwipeDirection::Right)
                } else {
                    Some(SwipeDirection::Left)
                };
                assert_eq!(classify(&origin, &end, &thresholds), expected, "dx={dx} dy={dy}");
            }
        }
    }

    #[test]
    fn test_second_touch_end_is_noop() {
        let (mut detector, seen) = recording_detector();
        detector.on_touch_start(GesturePoint::new(200, 300));
        assert_eq!(detector.on_touch_end(GesturePoint::new(10, 310)), Some(SwipeDirection::Left));
        assert_eq!(detector.state(), SwipeState::Idle);
        assert_eq!(detector.on_touch_end(GesturePoint::new(10, 310)), None);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_touch_end_without_start_is_noop() {
        let (mut detector, seen) = recording_detector();
        assert_eq!(detector.on_touch_end(GesturePoint::new(500, 0)), None);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_new_touch_start_overwrites_pending_session() {
        let mut detector = SwipeDetector::default();
        detector.on_touch_start(GesturePoint::new(0, 0));
        detector.on_touch_start(GesturePoint::new(400, 0));
        // От (0, 0) это был бы свайп вправо, от (400, 0) это тап
        assert_eq!(detector.on_touch_end(GesturePoint::new(410, 0)), None);
    }

    #[test]
    fn test_non_qualifying_end_still_consumes_session() {
        let mut detector = SwipeDetector::default();
        detector.on_touch_start(GesturePoint::new(0, 0));
        assert_eq!(detector.on_touch_end(GesturePoint::new(10, 0)), None);
        assert_eq!(detector.state(), SwipeState::Idle);
        assert_eq!(detector.on_touch_end(GesturePoint::new(400, 0)), None);
    }

    #[test]
    fn test_all_handlers_are_notified_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut detector = SwipeDetector::default();
        for id in 0..3 {
            let order = order.clone();
            detector.on_swipe(move |direction| order.lock().unwrap().push((id, direction)));
        }

        gesture(&mut detector, (0, 0), (300, 0));

        assert_eq!(
            *order.lock().unwrap(),
            vec![
                (0, SwipeDirection::Right),
                (1, SwipeDirection::Right),
                (2, SwipeDirection::Right),
            ]
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let mut detector = SwipeDetector::new(SwipeThresholds {
            min_horizontal_distance: 50,
            max_vertical_drift: 10,
        });
        assert_eq!(gesture(&mut detector, (0, 0), (60, 5)), Some(SwipeDirection::Right));
        assert_eq!(gesture(&mut detector, (0, 0), (60, 20)), None);
    }
}
