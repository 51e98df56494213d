pub mod key_names;
pub mod swipe_dispatcher;
pub mod touch_listener;
pub mod virtual_device;

pub use key_names::KeyNames;
pub use swipe_dispatcher::SwipeDispatcher;
pub use touch_listener::create_touch_listener;
pub use virtual_device::VirtualDevice;
