//! In-memory multi-axis controller.
//!
//! Axes are numbered from 1. Moves complete instantly. A fault can be
//! injected to exercise error paths; while set, every call fails with it.

use tracing::debug;
use xyz_common::consts::DEFAULT_CONTROLLER_AXES;
use xyz_common::device::{AxisController, DeviceError};

/// Simulated controller holding one position per axis.
#[derive(Debug, Clone)]
pub struct SimulatedController {
    positions: Vec<f64>,
    fault: Option<DeviceError>,
}

impl SimulatedController {
    /// Controller with `axis_count` axes, all at 0.
    pub fn new(axis_count: usize) -> Self {
        debug!(axis_count, "creating simulated controller");
        Self {
            positions: vec![0.0; axis_count],
            fault: None,
        }
    }

    /// Make every subsequent call fail with `fault`, or clear it with `None`.
    pub fn set_fault(&mut self, fault: Option<DeviceError>) {
        self.fault = fault;
    }

    fn check_fault(&self) -> Result<(), DeviceError> {
        match &self.fault {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl Default for SimulatedController {
    fn default() -> Self {
        Self::new(DEFAULT_CONTROLLER_AXES)
    }
}

impl AxisController for SimulatedController {
    fn axis_count(&self) -> usize {
        self.positions.len()
    }

    fn position(&mut self, axis: usize) -> Result<f64, DeviceError> {
        self.check_fault()?;
        self.check_axis(axis)?;
        Ok(self.positions[axis - 1])
    }

    fn absolute_move(&mut self, axis: usize, x: f64) -> Result<(), DeviceError> {
        self.check_fault()?;
        self.check_axis(axis)?;
        self.positions[axis - 1] = x;
        Ok(())
    }
}
