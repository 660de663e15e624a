//! Device capability traits and error types.
//!
//! This module defines:
//! - `XyzDevice` trait - a raw 3-axis positioner in its own native frame
//! - `StageReference` trait - the reference stage, read in the logical frame
//! - `AxisController` trait - a multi-axis controller addressed per axis
//! - `DeviceError` enum - hardware-layer failures
//!
//! The calibration engine consumes only these capabilities. Handles are
//! borrowed from the caller, so the traits are also implemented for
//! `&mut T` / `Box<T>` (devices) and `&T` / `Arc<T>` (stages).

use crate::geometry::Vec3;
use std::sync::Arc;
use thiserror::Error;

/// Error types for device operations.
///
/// Raised by the hardware collaborators and propagated unchanged by
/// everything built on top of them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeviceError {
    /// Hardware communication error
    #[error("Hardware communication error: {0}")]
    Communication(String),

    /// Device did not answer in time
    #[error("Device timeout: {0}")]
    Timeout(String),

    /// Device reported a fault
    #[error("Device fault: {0}")]
    Fault(String),

    /// Axis number outside the controller's range
    #[error("Invalid axis {axis} (controller has {count} axes)")]
    InvalidAxis {
        /// Requested axis number (1-based)
        axis: usize,
        /// Number of axes the controller exposes
        count: usize,
    },
}

/// A raw 3-axis positioning device.
///
/// Positions are micrometers in the device's own native frame.
///
/// # Contract
///
/// | Operation | Frame | Blocking |
/// |-----------|-------|----------|
/// | `position()` | native | may block on hardware I/O |
/// | `absolute_move()` | native | may block until accepted |
/// | `relative_move()` | native | may block until accepted |
///
/// Failures are reported as `DeviceError` and must not be retried by
/// callers of this trait.
pub trait XyzDevice {
    /// Current native position.
    fn position(&mut self) -> Result<Vec3, DeviceError>;

    /// Move to an absolute native position.
    fn absolute_move(&mut self, target: Vec3) -> Result<(), DeviceError>;

    /// Move by a native displacement.
    fn relative_move(&mut self, delta: Vec3) -> Result<(), DeviceError>;
}

/// The reference stage, reporting positions in the logical frame.
pub trait StageReference {
    /// Current logical position.
    fn position(&self) -> Result<Vec3, DeviceError>;
}

/// A multi-axis motor controller addressed by 1-based axis number.
///
/// Controllers only understand per-axis absolute moves; grouping three
/// axes into an [`XyzDevice`] is done by an adapter on top.
pub trait AxisController {
    /// Number of axes exposed (axes are numbered `1..=axis_count()`).
    fn axis_count(&self) -> usize;

    /// Current position of one axis in micrometers.
    fn position(&mut self, axis: usize) -> Result<f64, DeviceError>;

    /// Move one axis to an absolute position in micrometers.
    fn absolute_move(&mut self, axis: usize, x: f64) -> Result<(), DeviceError>;

    /// Check an axis number against `axis_count()`.
    fn check_axis(&self, axis: usize) -> Result<(), DeviceError> {
        let count = self.axis_count();
        if axis == 0 || axis > count {
            return Err(DeviceError::InvalidAxis { axis, count });
        }
        Ok(())
    }
}

impl<T: XyzDevice + ?Sized> XyzDevice for &mut T {
    fn position(&mut self) -> Result<Vec3, DeviceError> {
        (**self).position()
    }

    fn absolute_move(&mut self, target: Vec3) -> Result<(), DeviceError> {
        (**self).absolute_move(target)
    }

    fn relative_move(&mut self, delta: Vec3) -> Result<(), DeviceError> {
        (**self).relative_move(delta)
    }
}

impl<T: XyzDevice + ?Sized> XyzDevice for Box<T> {
    fn position(&mut self) -> Result<Vec3, DeviceError> {
        (**self).position()
    }

    fn absolute_move(&mut self, target: Vec3) -> Result<(), DeviceError> {
        (**self).absolute_move(target)
    }

    fn relative_move(&mut self, delta: Vec3) -> Result<(), DeviceError> {
        (**self).relative_move(delta)
    }
}

impl<T: StageReference + ?Sized> StageReference for &T {
    fn position(&self) -> Result<Vec3, DeviceError> {
        (**self).position()
    }
}

impl<T: StageReference + ?Sized> StageReference for Arc<T> {
    fn position(&self) -> Result<Vec3, DeviceError> {
        (**self).position()
    }
}

impl<T: AxisController + ?Sized> AxisController for &mut T {
    fn axis_count(&self) -> usize {
        (**self).axis_count()
    }

    fn position(&mut self, axis: usize) -> Result<f64, DeviceError> {
        (**self).position(axis)
    }

    fn absolute_move(&mut self, axis: usize, x: f64) -> Result<(), DeviceError> {
        (**self).absolute_move(axis, x)
    }
}
