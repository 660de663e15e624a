//! Virtual XYZ unit: a raw device seen through a calibrated transform.
//!
//! The unit converts every logical-frame command into the device's native
//! frame through the inverse of its [`Transform`], and every native reading
//! back through the forward map. Calibration operations mutate the transform
//! in place; device failures pass through untouched.
//!
//! # Data Flow
//!
//! ```text
//! caller ──logical──► VirtualXyzUnit ──M⁻¹(x − x0)──► XyzDevice
//! caller ◄─logical─── VirtualXyzUnit ◄──M·y + x0───── XyzDevice
//! ```

use crate::error::CalibrationError;
use crate::transform::{Transform, checked_inverse};
use serde::Serialize;
use tracing::{debug, info, trace, warn};
use xyz_common::consts::CALIBRATION_POINTS;
use xyz_common::device::{DeviceError, StageReference, XyzDevice};
use xyz_common::geometry::{Axis, Mat3, Vec3, to_array};

/// Snapshot of a unit's calibration, for display or caller-side storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationReport {
    /// Linear part `M`, row-major.
    pub matrix: [[f64; 3]; 3],
    /// Offset `x0`.
    pub offset: [f64; 3],
    /// Whether a primary calibration has succeeded.
    pub calibrated: bool,
    /// Per-row norm deviation of `M` from 1.
    pub precision: [f64; 3],
}

/// A raw device mapped into the logical frame defined by a stage.
///
/// `D` and `S` are handles to externally owned collaborators (typically
/// `&mut Device` and `&Stage`); the unit never closes them.
pub struct VirtualXyzUnit<D, S> {
    dev: D,
    stage: S,
    transform: Transform,
    calibrated: bool,
}

impl<D: XyzDevice, S: StageReference> VirtualXyzUnit<D, S> {
    /// Create an uncalibrated unit with the identity transform.
    pub fn new(dev: D, stage: S) -> Self {
        Self {
            dev,
            stage,
            transform: Transform::identity(),
            calibrated: false,
        }
    }

    /// Current transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// True once a primary calibration has succeeded.
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Replace the transform and calibration flag, e.g. with values the
    /// caller stored from an earlier session.
    pub fn restore(&mut self, transform: Transform, calibrated: bool) {
        self.transform = transform;
        self.calibrated = calibrated;
    }

    /// Underlying device handle.
    pub fn device(&self) -> &D {
        &self.dev
    }

    /// Underlying device handle, for raw native-frame access.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.dev
    }

    /// Reference stage handle.
    pub fn stage(&self) -> &S {
        &self.stage
    }

    /// Current position in the logical frame.
    pub fn position(&mut self) -> Result<Vec3, DeviceError> {
        let native = self.dev.position()?;
        trace!(?native, "raw device position");
        Ok(self.transform.forward(&native))
    }

    /// One component of the current logical position.
    pub fn axis_position(&mut self, axis: Axis) -> Result<f64, DeviceError> {
        Ok(self.position()?[axis.index()])
    }

    /// Move to an absolute logical position.
    pub fn absolute_move(&mut self, target: Vec3) -> Result<(), DeviceError> {
        let native = self.transform.inverse(&target);
        debug!(?target, ?native, "absolute move");
        self.dev.absolute_move(native)
    }

    /// Move a single logical axis, holding the others at their current
    /// logical values.
    ///
    /// Reads the position once per call; a failed read aborts before any
    /// move is issued.
    pub fn absolute_move_axis(&mut self, axis: Axis, x: f64) -> Result<(), DeviceError> {
        let mut target = self.position()?;
        target[axis.index()] = x;
        self.absolute_move(target)
    }

    /// Move by a logical displacement. The offset `x0` plays no part.
    pub fn relative_move(&mut self, delta: Vec3) -> Result<(), DeviceError> {
        let native = self.transform.inverse_delta(&delta);
        debug!(?delta, ?native, "relative move");
        self.dev.relative_move(native)
    }

    /// Move by `dx` along a single logical axis.
    pub fn relative_move_axis(&mut self, axis: Axis, dx: f64) -> Result<(), DeviceError> {
        self.relative_move(axis.unit() * dx)
    }

    /// Move to the stage's current logical position.
    pub fn go(&mut self) -> Result<(), DeviceError> {
        let target = self.stage.position()?;
        self.absolute_move(target)
    }

    /// Offset-only recalibration: `x0 = stage − M · device`.
    ///
    /// Assumes the tip is centered in view and `M` is already correct.
    /// Leaves `M` and the calibration flag alone.
    pub fn secondary_calibration(&mut self) -> Result<(), DeviceError> {
        let stage = self.stage.position()?;
        let native = self.dev.position()?;
        let offset = stage - self.transform.linear_forward(&native);
        self.transform = self.transform.with_offset(offset);
        info!(offset = ?to_array(&offset), "secondary calibration applied");
        Ok(())
    }

    /// Full affine estimate from four correspondences.
    ///
    /// `stage_points[k]` and `device_points[k]` are the stage-frame and
    /// device-frame coordinates of the same physical position. Displacements
    /// from the first point give `M = dx · dy⁻¹`; the first pair anchors
    /// `x0`. Nothing is changed on error.
    pub fn primary_calibration(
        &mut self,
        stage_points: &[Vec3; CALIBRATION_POINTS],
        device_points: &[Vec3; CALIBRATION_POINTS],
    ) -> Result<(), CalibrationError> {
        let dx = displacements(stage_points);
        let dy = displacements(device_points);

        let dy_inv = checked_inverse(&dy).map_err(|rel_det| {
            warn!(rel_det, "primary calibration rejected: device points degenerate");
            CalibrationError::SingularDeviceDisplacements(rel_det)
        })?;
        checked_inverse(&dx).map_err(|rel_det| {
            warn!(rel_det, "primary calibration rejected: stage points degenerate");
            CalibrationError::SingularStageDisplacements(rel_det)
        })?;
        let matrix = dx * dy_inv;
        let offset = stage_points[0] - matrix * device_points[0];

        // Both point sets pass, yet the product can still be ill-conditioned.
        let transform = Transform::from_parts(matrix, offset).inspect_err(|err| {
            warn!(%err, "primary calibration rejected: estimated map singular");
        })?;

        self.transform = transform;
        self.calibrated = true;
        info!(
            offset = ?to_array(&offset),
            precision = ?self.transform.precision(),
            "primary calibration applied"
        );
        Ok(())
    }

    /// Per-row deviation of `M`'s norm from 1. Diagnostic only.
    pub fn calibration_precision(&self) -> [f64; 3] {
        self.transform.precision()
    }

    /// Snapshot of the current calibration.
    pub fn calibration_report(&self) -> CalibrationReport {
        let m = self.transform.matrix();
        CalibrationReport {
            matrix: [0, 1, 2].map(|i| [m[(i, 0)], m[(i, 1)], m[(i, 2)]]),
            offset: to_array(self.transform.offset()),
            calibrated: self.calibrated,
            precision: self.calibration_precision(),
        }
    }
}

/// Columns `p[k] − p[0]` for k = 1..3.
fn displacements(points: &[Vec3; CALIBRATION_POINTS]) -> Mat3 {
    Mat3::from_columns(&[
        points[1] - points[0],
        points[2] - points[0],
        points[3] - points[0],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::relative_determinant;
    use std::cell::Cell;

    const EPS: f64 = 1e-9;

    #[derive(Default)]
    struct MockDevice {
        position: Vec3,
        absolute_moves: Vec<Vec3>,
        relative_moves: Vec<Vec3>,
        fail_reads: bool,
    }

    impl XyzDevice for MockDevice {
        fn position(&mut self) -> Result<Vec3, DeviceError> {
            if self.fail_reads {
                return Err(DeviceError::Timeout("read".to_string()));
            }
            Ok(self.position)
        }

        fn absolute_move(&mut self, target: Vec3) -> Result<(), DeviceError> {
            self.absolute_moves.push(target);
            self.position = target;
            Ok(())
        }

        fn relative_move(&mut self, delta: Vec3) -> Result<(), DeviceError> {
            self.relative_moves.push(delta);
            self.position += delta;
            Ok(())
        }
    }

    struct MockStage(Cell<Vec3>);

    impl StageReference for MockStage {
        fn position(&self) -> Result<Vec3, DeviceError> {
            Ok(self.0.get())
        }
    }

    fn rotation_z_90() -> Mat3 {
        Mat3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0)
    }

    #[test]
    fn test_uncalibrated_unit_is_identity() {
        let mut dev = MockDevice {
            position: Vec3::new(10.0, 20.0, 30.0),
            ..Default::default()
        };
        let stage = MockStage(Cell::new(Vec3::zeros()));
        let mut unit = VirtualXyzUnit::new(&mut dev, &stage);

        assert!(!unit.is_calibrated());
        assert_eq!(unit.position().unwrap(), Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(unit.axis_position(Axis::Z).unwrap(), 30.0);

        unit.absolute_move(Vec3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(dev.absolute_moves, vec![Vec3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn test_secondary_calibration_scenario() {
        let mut dev = MockDevice {
            position: Vec3::new(10.0, 20.0, 30.0),
            ..Default::default()
        };
        let stage = MockStage(Cell::new(Vec3::zeros()));
        let mut unit = VirtualXyzUnit::new(&mut dev, &stage);

        unit.secondary_calibration().unwrap();
        assert_eq!(*unit.transform().offset(), Vec3::new(-10.0, -20.0, -30.0));
        assert_eq!(*unit.transform().matrix(), Mat3::identity());
        assert!(!unit.is_calibrated());
        assert_eq!(unit.position().unwrap(), Vec3::zeros());
    }

    #[test]
    fn test_relative_move_axis_uses_linear_part_only() {
        let mut dev = MockDevice::default();
        let stage = MockStage(Cell::new(Vec3::zeros()));
        let mut unit = VirtualXyzUnit::new(&mut dev, &stage);
        unit.restore(
            Transform::from_parts(rotation_z_90(), Vec3::new(7.0, 8.0, 9.0)).unwrap(),
            true,
        );

        unit.relative_move_axis(Axis::X, 5.0).unwrap();
        let delta = dev.relative_moves[0];
        assert!((delta - Vec3::new(0.0, -5.0, 0.0)).norm() < EPS);
        assert!(dev.absolute_moves.is_empty());
    }

    #[test]
    fn test_absolute_move_axis_read_failure_issues_no_move() {
        let mut dev = MockDevice {
            fail_reads: true,
            ..Default::default()
        };
        let stage = MockStage(Cell::new(Vec3::zeros()));
        let mut unit = VirtualXyzUnit::new(&mut dev, &stage);

        let err = unit.absolute_move_axis(Axis::Y, 5.0).unwrap_err();
        assert_eq!(err, DeviceError::Timeout("read".to_string()));
        assert!(dev.absolute_moves.is_empty());
    }

    #[test]
    fn test_secondary_calibration_read_failure_keeps_offset() {
        let mut dev = MockDevice {
            fail_reads: true,
            ..Default::default()
        };
        let stage = MockStage(Cell::new(Vec3::new(1.0, 1.0, 1.0)));
        let mut unit = VirtualXyzUnit::new(&mut dev, &stage);

        assert!(unit.secondary_calibration().is_err());
        assert_eq!(*unit.transform().offset(), Vec3::zeros());
    }

    #[test]
    fn test_go_moves_to_stage_position() {
        let mut dev = MockDevice::default();
        let stage = MockStage(Cell::new(Vec3::new(4.0, 5.0, 6.0)));
        let mut unit = VirtualXyzUnit::new(&mut dev, &stage);
        unit.restore(
            Transform::from_parts(Mat3::identity(), Vec3::new(1.0, 1.0, 1.0)).unwrap(),
            false,
        );

        unit.go().unwrap();
        assert_eq!(dev.absolute_moves, vec![Vec3::new(3.0, 4.0, 5.0)]);
    }

    #[test]
    fn test_primary_calibration_rejects_degenerate_stage_points() {
        let mut dev = MockDevice::default();
        let stage = MockStage(Cell::new(Vec3::zeros()));
        let mut unit = VirtualXyzUnit::new(&mut dev, &stage);

        let device_points = [
            Vec3::zeros(),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        // All stage points on one line.
        let stage_points = [
            Vec3::zeros(),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
        ];
        let err = unit
            .primary_calibration(&stage_points, &device_points)
            .unwrap_err();
        assert!(matches!(err, CalibrationError::SingularStageDisplacements(_)));
        assert!(!unit.is_calibrated());
        assert_eq!(*unit.transform(), Transform::identity());
    }

    #[test]
    fn test_primary_calibration_rejects_ill_conditioned_map() {
        let mut dev = MockDevice::default();
        let stage = MockStage(Cell::new(Vec3::zeros()));
        let mut unit = VirtualXyzUnit::new(&mut dev, &stage);

        // Device columns (1,1,0), (0,ε,0), (0,0,1) are well conditioned,
        // but its rows are nearly parallel, so its inverse is not.
        let device_points = [
            Vec3::zeros(),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1e-10, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let stage_points = [
            Vec3::zeros(),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        assert!(relative_determinant(&displacements(&device_points)) > 0.5);
        assert!(relative_determinant(&displacements(&stage_points)) > 0.5);

        let err = unit
            .primary_calibration(&stage_points, &device_points)
            .unwrap_err();
        match err {
            CalibrationError::SingularMatrix(rel_det) => assert!(rel_det < 1e-9),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!unit.is_calibrated());
        assert_eq!(*unit.transform(), Transform::identity());
    }

    #[test]
    fn test_calibration_report_layout() {
        let mut dev = MockDevice::default();
        let stage = MockStage(Cell::new(Vec3::zeros()));
        let mut unit = VirtualXyzUnit::new(&mut dev, &stage);
        unit.restore(
            Transform::from_parts(rotation_z_90(), Vec3::new(1.0, 2.0, 3.0)).unwrap(),
            true,
        );

        let report = unit.calibration_report();
        assert_eq!(report.matrix[0], [0.0, -1.0, 0.0]);
        assert_eq!(report.matrix[1], [1.0, 0.0, 0.0]);
        assert_eq!(report.offset, [1.0, 2.0, 3.0]);
        assert!(report.calibrated);
    }
}
