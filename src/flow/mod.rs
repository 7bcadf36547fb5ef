//! Stage orchestration and the host-facing sink trait.

pub mod controller;
pub mod presenter;
pub mod stage;

pub use controller::StageFlowController;
pub use presenter::{HapticCommand, Presenter};
pub use stage::{Choice, Stage};
