use crate::config::Config;
use crate::error::Result;
use crate::gesture::SwipeDetector;
use crate::layout::ViewportSize;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

use super::r#trait::TouchListenerTrait;
use super::tracker::{RawTouchEvent, TouchTracker};

/// Поверхность по умолчанию для эмуляции: портретный телефон
const DEFAULT_SURFACE: ViewportSize = ViewportSize {
    width: 390,
    height: 844,
};

/// Сценарий эмуляции: свайп влево, свайп вправо, прокрутка, тап
const SCRIPT: [((i32, i32), (i32, i32)); 4] = [
    ((200, 300), (10, 310)),
    ((100, 300), (260, 250)),
    ((100, 300), (100, 500)),
    ((100, 300), (120, 310)),
];

pub struct DryRunTouchListener {
    config: Arc<Config>,
    tracker: TouchTracker,
}

impl DryRunTouchListener {
    pub fn new(config: Arc<Config>, detector: SwipeDetector) -> Self {
        info!("Инициализация DryRunTouchListener");
        Self {
            config,
            tracker: TouchTracker::new(detector),
        }
    }

    /// Кадры evdev для прямого жеста от `start` до `end`
    fn gesture_frames(start: (i32, i32), end: (i32, i32)) -> Vec<RawTouchEvent> {
        let middle = ((start.0 + end.0) / 2, (start.1 + end.1) / 2);
        vec![
            RawTouchEvent::Contact(true),
            RawTouchEvent::PositionX(start.0),
            RawTouchEvent::PositionY(start.1),
            RawTouchEvent::Report,
            RawTouchEvent::PositionX(middle.0),
            RawTouchEvent::PositionY(middle.1),
            RawTouchEvent::Report,
            RawTouchEvent::PositionX(end.0),
            RawTouchEvent::PositionY(end.1),
            RawTouchEvent::Report,
            RawTouchEvent::Contact(false),
            RawTouchEvent::Report,
        ]
    }

    async fn run_impl(mut self) -> Result<()> {
        info!("Dry-run режим - TouchListener работает в режиме эмуляции");
        info!("Настроено {} действий для свайпов (dry-run)", self.config.actions.len());

        let mut ticker = interval(Duration::from_secs(5));

        for (start, end) in SCRIPT.iter().cycle() {
            ticker.tick().await;
            debug!("Dry-run: эмулируем жест {:?} -> {:?}", start, end);

            for raw in Self::gesture_frames(*start, *end) {
                self.tracker.feed(raw);
            }
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl TouchListenerTrait for DryRunTouchListener {
    fn surface(&self) -> Option<ViewportSize> {
        Some(DEFAULT_SURFACE)
    }

    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SwipeDirection;

    #[test]
    fn test_script_produces_expected_swipes() {
        let mut tracker = TouchTracker::new(SwipeDetector::default());

        let results: Vec<Option<SwipeDirection>> = SCRIPT
            .iter()
            .map(|(start, end)| {
                DryRunTouchListener::gesture_frames(*start, *end)
                    .into_iter()
                    .filter_map(|raw| tracker.feed(raw))
                    .last()
            })
            .collect();

        assert_eq!(
            results,
            vec![
                Some(SwipeDirection::Left),
                Some(SwipeDirection::Right),
                None,
                None,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dry_run_feeds_subscribers() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut detector = SwipeDetector::default();
        detector.on_swipe(move |direction| {
            let _ = tx.send(direction);
        });

        let listener = Box::new(DryRunTouchListener::new(Arc::new(Config::default()), detector));
        let handle = tokio::spawn(listener.run());

        assert_eq!(rx.recv().await, Some(SwipeDirection::Left));
        assert_eq!(rx.recv().await, Some(SwipeDirection::Right));
        // Прокрутка и тап пропускаются, следующий круг снова начинается со свайпа влево
        assert_eq!(rx.recv().await, Some(SwipeDirection::Left));

        handle.abort();
    }
}
