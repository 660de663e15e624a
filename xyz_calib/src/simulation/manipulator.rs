//! Placement of a simulated manipulator in the logical frame.
//!
//! A pipette approaches the sample along `direction`. The manipulator's
//! native x axis runs along that direction, native z is vertical, and
//! native y completes the frame horizontally (`x × ẑ`). The tip sits at
//! `tip_offset` when all native axes read zero.

use xyz_common::config::ConfigError;
use xyz_common::geometry::{Mat3, Vec3};

/// Rigid placement of a manipulator's native frame in the logical frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ManipulatorGeometry {
    tip_offset: Vec3,
    basis: Mat3,
}

impl ManipulatorGeometry {
    /// Build the frame from the tip's rest position and the pipette
    /// direction.
    ///
    /// # Errors
    /// `ConfigError::ValidationError` if `direction` is zero or vertical.
    pub fn new(tip_offset: Vec3, direction: Vec3) -> Result<Self, ConfigError> {
        let x = direction.try_normalize(f64::EPSILON).ok_or_else(|| {
            ConfigError::ValidationError("manipulator direction must be non-zero".to_string())
        })?;
        let z = Vec3::z();
        let y = x.cross(&z).try_normalize(1e-9).ok_or_else(|| {
            ConfigError::ValidationError(
                "manipulator direction must not be vertical".to_string(),
            )
        })?;
        Ok(Self {
            tip_offset,
            basis: Mat3::from_columns(&[x, y, z]),
        })
    }

    /// Logical position of the tip for a native reading.
    pub fn tip_position(&self, native: &Vec3) -> Vec3 {
        self.tip_offset + self.basis * native
    }

    /// Native axes expressed in the logical frame, as columns.
    ///
    /// This is the linear part a correct calibration recovers.
    pub fn basis(&self) -> &Mat3 {
        &self.basis
    }

    /// Tip position at native zero.
    pub fn tip_offset(&self) -> &Vec3 {
        &self.tip_offset
    }
}
