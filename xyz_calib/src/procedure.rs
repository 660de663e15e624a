//! Four-point primary calibration procedure.
//!
//! For each native target the manipulator is driven there directly (no
//! transform involved), the view is centered on the tip, and the stage and
//! device readings are recorded as one correspondence. The four pairs then
//! feed [`VirtualXyzUnit::primary_calibration`].

use crate::error::UnitError;
use crate::unit::{CalibrationReport, VirtualXyzUnit};
use tracing::{debug, info, warn};
use xyz_common::consts::CALIBRATION_POINTS;
use xyz_common::device::{DeviceError, StageReference, XyzDevice};
use xyz_common::geometry::{Axis, Vec3};

/// Brings the manipulator tip to the center of the view.
///
/// On a real rig this is the operator moving the stage; in simulation it
/// is computed from the manipulator geometry.
pub trait ViewCentering {
    /// Center the view on the tip at native position `native`.
    fn center_on_tip(&mut self, native: &Vec3) -> Result<(), DeviceError>;
}

/// Paired stage-frame and device-frame readings of the calibration
/// positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Correspondences {
    /// Stage (logical) readings.
    pub stage: [Vec3; CALIBRATION_POINTS],
    /// Device (native) readings.
    pub device: [Vec3; CALIBRATION_POINTS],
}

/// Visit each native target and record the correspondence there.
///
/// The device reading is taken after the move, so any positioning error
/// of the hardware ends up in the fit rather than being hidden by it.
pub fn measure_correspondences<D, S, V>(
    unit: &mut VirtualXyzUnit<D, S>,
    targets: &[Vec3; CALIBRATION_POINTS],
    view: &mut V,
) -> Result<Correspondences, DeviceError>
where
    D: XyzDevice,
    S: StageReference,
    V: ViewCentering + ?Sized,
{
    let mut stage = [Vec3::zeros(); CALIBRATION_POINTS];
    let mut device = [Vec3::zeros(); CALIBRATION_POINTS];

    for (k, target) in targets.iter().enumerate() {
        unit.device_mut().absolute_move(*target)?;
        let native = unit.device_mut().position()?;
        view.center_on_tip(&native)?;
        let logical = unit.stage().position()?;
        debug!(point = k, ?native, ?logical, "correspondence recorded");
        stage[k] = logical;
        device[k] = native;
    }

    Ok(Correspondences { stage, device })
}

/// Measure four correspondences, run the primary calibration, and check
/// each row of the fit against `precision_threshold`.
///
/// Rows above the threshold are logged, not rejected.
pub fn calibrate<D, S, V>(
    unit: &mut VirtualXyzUnit<D, S>,
    targets: &[Vec3; CALIBRATION_POINTS],
    view: &mut V,
    precision_threshold: f64,
) -> Result<CalibrationReport, UnitError>
where
    D: XyzDevice,
    S: StageReference,
    V: ViewCentering + ?Sized,
{
    let pairs = measure_correspondences(unit, targets, view)?;
    unit.primary_calibration(&pairs.stage, &pairs.device)?;

    let report = unit.calibration_report();
    for (axis, deviation) in Axis::ALL.into_iter().zip(report.precision) {
        if deviation > precision_threshold {
            warn!(
                %axis,
                deviation,
                precision_threshold,
                "calibration row norm deviates from 1; check unit scaling"
            );
        }
    }
    info!(precision = ?report.precision, "calibration complete");
    Ok(report)
}
