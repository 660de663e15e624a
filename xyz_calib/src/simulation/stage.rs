//! Simulated reference stage.

use crate::procedure::ViewCentering;
use crate::simulation::ManipulatorGeometry;
use std::sync::{Mutex, PoisonError};
use tracing::debug;
use xyz_common::device::{DeviceError, StageReference};
use xyz_common::geometry::Vec3;

/// Stage whose logical position can be set directly.
///
/// Interior mutability lets several units hold `&SimulatedStage` while the
/// operator (or a test) moves it.
#[derive(Debug)]
pub struct SimulatedStage {
    position: Mutex<Vec3>,
}

impl SimulatedStage {
    /// Stage at `position`.
    pub fn new(position: Vec3) -> Self {
        Self {
            position: Mutex::new(position),
        }
    }

    /// Move the stage so `point` is centered in view.
    pub fn center_on(&self, point: Vec3) {
        debug!(?point, "stage centered");
        *self.position.lock().unwrap_or_else(PoisonError::into_inner) = point;
    }
}

impl Default for SimulatedStage {
    fn default() -> Self {
        Self::new(Vec3::zeros())
    }
}

impl StageReference for SimulatedStage {
    fn position(&self) -> Result<Vec3, DeviceError> {
        Ok(*self.position.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Centers a simulated stage on a simulated manipulator tip.
///
/// Stands in for the operator who, during calibration, brings the pipette
/// tip to the middle of the microscope view.
pub struct StageCentering<'a> {
    geometry: &'a ManipulatorGeometry,
    stage: &'a SimulatedStage,
}

impl<'a> StageCentering<'a> {
    /// Tie a manipulator geometry to the stage that follows its tip.
    pub fn new(geometry: &'a ManipulatorGeometry, stage: &'a SimulatedStage) -> Self {
        Self { geometry, stage }
    }
}

impl ViewCentering for StageCentering<'_> {
    fn center_on_tip(&mut self, native: &Vec3) -> Result<(), DeviceError> {
        self.stage.center_on(self.geometry.tip_position(native));
        Ok(())
    }
}
