//! Calibration and unit error types.

use thiserror::Error;
use xyz_common::config::ConfigError;
use xyz_common::device::DeviceError;

/// Reasons a calibration or transform construction is rejected.
///
/// A rejected calibration never mutates the unit's transform or
/// calibration flag.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    /// The three device-frame displacement vectors are linearly dependent.
    #[error("Device-frame displacements are degenerate (relative determinant {0:.3e})")]
    SingularDeviceDisplacements(f64),

    /// The three stage-frame displacement vectors are linearly dependent,
    /// so the estimated linear map has no inverse.
    #[error("Stage-frame displacements are degenerate (relative determinant {0:.3e})")]
    SingularStageDisplacements(f64),

    /// A linear map, supplied directly or estimated from well-conditioned
    /// points, is not invertible.
    #[error("Linear map is singular (relative determinant {0:.3e})")]
    SingularMatrix(f64),
}

/// Any failure surfaced by a unit-level workflow.
///
/// Device errors are carried as-is; nothing is retried.
#[derive(Debug, Clone, Error)]
pub enum UnitError {
    /// Raw device or stage failure
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// Calibration rejected
    #[error("Calibration failed: {0}")]
    Calibration(#[from] CalibrationError),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_error_display() {
        let err = CalibrationError::SingularDeviceDisplacements(1.5e-12);
        assert!(err.to_string().contains("Device-frame"));
        assert!(err.to_string().contains("1.500e-12"));
    }

    #[test]
    fn test_unit_error_keeps_device_error() {
        let err: UnitError = DeviceError::Fault("stall".to_string()).into();
        assert!(matches!(
            err,
            UnitError::Device(DeviceError::Fault(ref msg)) if msg == "stall"
        ));
        assert_eq!(err.to_string(), "Device fault: stall");
    }
}
