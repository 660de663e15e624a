//! Workspace-wide constants.
//!
//! Single source of truth for numeric limits and tolerances shared by the
//! device layer and the calibration engine.

/// Maximum number of axes a single controller may expose.
pub const MAX_AXES: usize = 64;

/// Number of axes of the simulated controller when none is configured.
pub const DEFAULT_CONTROLLER_AXES: usize = 9;

/// Number of correspondence pairs taken by a primary calibration.
pub const CALIBRATION_POINTS: usize = 4;

/// Relative determinant threshold below which a 3×3 displacement matrix
/// is considered rank-deficient.
///
/// Compared against `|det A| / ∏ ‖A[:,k]‖`, which is scale invariant and
/// equals 1 for orthogonal columns.
pub const SINGULARITY_TOLERANCE: f64 = 1e-9;

/// Default per-row norm deviation above which a calibration is reported
/// as suspicious.
pub const DEFAULT_PRECISION_THRESHOLD: f64 = 0.01;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_consistent() {
        assert!(DEFAULT_CONTROLLER_AXES >= 3);
        assert!(DEFAULT_CONTROLLER_AXES <= MAX_AXES);
        assert_eq!(CALIBRATION_POINTS, 4);
        assert!(SINGULARITY_TOLERANCE > 0.0 && SINGULARITY_TOLERANCE < 1e-3);
    }
}
