pub mod controller;
pub mod debounce;
pub mod host;
pub mod reconciler;
pub mod registry;

pub use controller::Controller;
pub use host::{Host, PaneId, PaneView};
pub use reconciler::PassOutcome;
