//! Prelude module for common re-exports.
//!
//! ```rust
//! use xyz_common::prelude::*;
//! ```

// ─── Geometry ───────────────────────────────────────────────────────
pub use crate::geometry::{Axis, Mat3, Vec3};

// ─── Devices ────────────────────────────────────────────────────────
pub use crate::device::{AxisController, DeviceError, StageReference, XyzDevice};

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{CALIBRATION_POINTS, MAX_AXES, SINGULARITY_TOLERANCE};
