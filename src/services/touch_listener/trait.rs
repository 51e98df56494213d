use crate::config::Config;
use crate::error::Result;
use crate::gesture::SwipeDetector;
use crate::layout::ViewportSize;
use std::sync::Arc;

/// Trait for touch listeners that can run in different modes
#[async_trait::async_trait]
pub trait TouchListenerTrait {
    /// Size of the touch surface in device coordinates, when known
    fn surface(&self) -> Option<ViewportSize>;

    /// Run the touch listener
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create an appropriate touch listener based on the dry_run flag
pub fn create_touch_listener(
    config: Arc<Config>,
    detector: SwipeDetector,
    dry_run: bool,
) -> Result<Box<dyn TouchListenerTrait + Send>> {
    if dry_run {
        Ok(Box::new(super::dry_touch_listener::DryRunTouchListener::new(
            config, detector,
        )))
    } else {
        Ok(Box::new(super::touch_listener::RealTouchListener::new(
            config, detector,
        )?))
    }
}
