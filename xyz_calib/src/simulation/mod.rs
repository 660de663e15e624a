//! Software simulation of a manipulator rig.
//!
//! Development and testing without hardware:
//!
//! - [`SimulatedController`] - in-memory multi-axis controller
//! - [`ManipulatorGeometry`] - how a manipulator's native axes sit in the logical frame
//! - [`SimulatedStage`] - a stage that can be re-centered
//! - [`StageCentering`] - centers the stage on the simulated tip during calibration

mod controller;
mod manipulator;
mod stage;

pub use controller::SimulatedController;
pub use manipulator::ManipulatorGeometry;
pub use stage::{SimulatedStage, StageCentering};
