//! Configuration for a simulated calibration session.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! log_level = "info"
//! service_name = "xyz-calib-sim"
//!
//! [controller]
//! axis_count = 9
//!
//! [manipulator]
//! axes = [1, 2, 3]
//! tip_position = [0.0, 0.0, 0.0]
//! direction = [1.0, 1.0, -0.5]
//!
//! [stage]
//! position = [0.0, 0.0, 0.0]
//!
//! [calibration]
//! targets = [[0.0, 0.0, 0.0], [100.0, 0.0, 0.0], [0.0, 100.0, 0.0], [0.0, 0.0, 100.0]]
//! precision_threshold = 0.01
//! ```
//!
//! Every section is optional and falls back to the values above.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use xyz_common::config::{ConfigError, SharedConfig};
use xyz_common::consts::{
    CALIBRATION_POINTS, DEFAULT_CONTROLLER_AXES, DEFAULT_PRECISION_THRESHOLD, MAX_AXES,
};
use xyz_common::geometry::{Vec3, vec3};

fn default_axis_count() -> usize {
    DEFAULT_CONTROLLER_AXES
}

fn default_manipulator_axes() -> [usize; 3] {
    [1, 2, 3]
}

fn default_direction() -> [f64; 3] {
    [1.0, 1.0, -0.5]
}

fn default_targets() -> [[f64; 3]; CALIBRATION_POINTS] {
    [
        [0.0, 0.0, 0.0],
        [100.0, 0.0, 0.0],
        [0.0, 100.0, 0.0],
        [0.0, 0.0, 100.0],
    ]
}

fn default_precision_threshold() -> f64 {
    DEFAULT_PRECISION_THRESHOLD
}

/// Full session configuration loaded from `rig.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RigConfig {
    /// Logging and instance name.
    #[serde(default)]
    pub shared: SharedConfig,

    /// Simulated controller.
    #[serde(default)]
    pub controller: ControllerConfig,

    /// Manipulator placement and wiring.
    #[serde(default)]
    pub manipulator: ManipulatorConfig,

    /// Initial stage position.
    #[serde(default)]
    pub stage: StageConfig,

    /// Calibration targets and acceptance threshold.
    #[serde(default)]
    pub calibration: CalibrationConfig,
}

/// `[controller]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    /// Number of axes the controller exposes.
    #[serde(default = "default_axis_count")]
    pub axis_count: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            axis_count: default_axis_count(),
        }
    }
}

/// `[manipulator]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManipulatorConfig {
    /// Controller axes (1-based) backing native x, y, z.
    #[serde(default = "default_manipulator_axes")]
    pub axes: [usize; 3],

    /// Logical tip position with all native axes at zero, µm.
    #[serde(default)]
    pub tip_position: [f64; 3],

    /// Pipette direction in the logical frame.
    #[serde(default = "default_direction")]
    pub direction: [f64; 3],
}

impl Default for ManipulatorConfig {
    fn default() -> Self {
        Self {
            axes: default_manipulator_axes(),
            tip_position: [0.0; 3],
            direction: default_direction(),
        }
    }
}

/// `[stage]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageConfig {
    /// Initial logical position, µm.
    #[serde(default)]
    pub position: [f64; 3],
}

/// `[calibration]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationConfig {
    /// Native positions visited during primary calibration.
    #[serde(default = "default_targets")]
    pub targets: [[f64; 3]; CALIBRATION_POINTS],

    /// Row-norm deviation above which the fit is flagged.
    #[serde(default = "default_precision_threshold")]
    pub precision_threshold: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            precision_threshold: default_precision_threshold(),
        }
    }
}

impl CalibrationConfig {
    /// Targets as vectors.
    pub fn target_vectors(&self) -> [Vec3; CALIBRATION_POINTS] {
        self.targets.map(vec3)
    }
}

impl RigConfig {
    /// Validate the session configuration.
    ///
    /// # Validation Rules
    /// 1. `shared` is valid
    /// 2. `1 <= controller.axis_count <= MAX_AXES`
    /// 3. manipulator axes are distinct and within `1..=axis_count`
    /// 4. manipulator direction is finite, non-zero and not vertical
    /// 5. `precision_threshold` is positive
    ///
    /// Degenerate calibration targets are left to the calibration itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        let count = self.controller.axis_count;
        if count == 0 || count > MAX_AXES {
            return Err(ConfigError::ValidationError(format!(
                "axis_count must be in 1..={MAX_AXES}, got {count}"
            )));
        }

        let mut seen = HashSet::new();
        for axis in self.manipulator.axes {
            if axis == 0 || axis > count {
                return Err(ConfigError::ValidationError(format!(
                    "manipulator axis {axis} outside 1..={count}"
                )));
            }
            if !seen.insert(axis) {
                return Err(ConfigError::ValidationError(format!(
                    "manipulator axis {axis} used twice"
                )));
            }
        }

        let [dx, dy, dz] = self.manipulator.direction;
        if ![dx, dy, dz].iter().all(|c| c.is_finite()) {
            return Err(ConfigError::ValidationError(
                "manipulator direction must be finite".to_string(),
            ));
        }
        if dx == 0.0 && dy == 0.0 {
            return Err(ConfigError::ValidationError(
                "manipulator direction must have a horizontal component".to_string(),
            ));
        }

        let threshold = self.calibration.precision_threshold;
        if threshold.is_nan() || threshold <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "precision_threshold must be positive, got {threshold}"
            )));
        }

        Ok(())
    }
}
