pub mod hints;
pub mod viewport;

pub use hints::LayoutHints;
pub use viewport::{ViewportProfile, ViewportSize};
