//! Groups three axes of a multi-axis controller into one XYZ device.
//!
//! Controllers address axes individually and only move them to absolute
//! positions. `XyzAxes` picks three axis numbers, reads and writes them as
//! a native `Vec3`, and synthesizes relative moves from a fresh read.

use tracing::trace;
use xyz_common::device::{AxisController, DeviceError, XyzDevice};
use xyz_common::geometry::Vec3;

/// Three controller axes presented as an [`XyzDevice`].
pub struct XyzAxes<C> {
    controller: C,
    axes: [usize; 3],
}

impl<C: AxisController> XyzAxes<C> {
    /// Map native x, y, z to the given 1-based controller axes.
    ///
    /// # Errors
    /// `DeviceError::InvalidAxis` if any axis is outside the controller.
    pub fn new(controller: C, axes: [usize; 3]) -> Result<Self, DeviceError> {
        for axis in axes {
            controller.check_axis(axis)?;
        }
        Ok(Self { controller, axes })
    }

    /// Controller axis numbers backing native x, y, z.
    pub fn axes(&self) -> [usize; 3] {
        self.axes
    }

    /// Underlying controller.
    pub fn controller(&self) -> &C {
        &self.controller
    }
}

impl<C: AxisController> XyzDevice for XyzAxes<C> {
    fn position(&mut self) -> Result<Vec3, DeviceError> {
        let mut out = Vec3::zeros();
        for (i, axis) in self.axes.into_iter().enumerate() {
            out[i] = self.controller.position(axis)?;
        }
        Ok(out)
    }

    fn absolute_move(&mut self, target: Vec3) -> Result<(), DeviceError> {
        for (i, axis) in self.axes.into_iter().enumerate() {
            trace!(axis, x = target[i], "axis absolute move");
            self.controller.absolute_move(axis, target[i])?;
        }
        Ok(())
    }

    fn relative_move(&mut self, delta: Vec3) -> Result<(), DeviceError> {
        let current = self.position()?;
        self.absolute_move(current + delta)
    }
}
