//! # XYZ Calibration Library
//!
//! Coordinate transform and calibration engine for motorized XYZ
//! manipulators.
//!
//! Every manipulator reports positions in its own native frame. A
//! [`VirtualXyzUnit`] learns the affine map from that frame to the logical
//! frame of the microscope stage and routes every move and position read
//! through it.
//!
//! # Module Structure
//!
//! - [`transform`] - `Transform`, the affine map with its cached inverse
//! - [`unit`] - `VirtualXyzUnit`, calibrated moves and calibration operations
//! - [`procedure`] - four-point measurement and primary calibration workflow
//! - [`axes`] - `XyzAxes`, three controller axes as one XYZ device
//! - [`simulation`] - simulated controller, stage and manipulator geometry
//! - [`config`] - `RigConfig` for the simulated session binary
//! - [`error`] - `CalibrationError` and `UnitError`
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       xyz_calib                              │
//! │  ┌──────────────┐   ┌────────────────┐   ┌───────────────┐   │
//! │  │  procedure   │──►│ VirtualXyzUnit │──►│  Transform    │   │
//! │  └──────────────┘   └───────┬────────┘   └───────────────┘   │
//! │                             │                                │
//! │               ┌─────────────┴─────────────┐                  │
//! │               ▼                           ▼                  │
//! │        ┌────────────┐             ┌────────────────┐         │
//! │        │ XyzDevice  │             │ StageReference │ (traits)│
//! │        └─────┬──────┘             └────────────────┘         │
//! │              ▼                                               │
//! │        ┌────────────┐     ┌──────────────────────┐           │
//! │        │  XyzAxes   │────►│ AxisController       │           │
//! │        └────────────┘     └──────────────────────┘           │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod axes;
pub mod config;
pub mod error;
pub mod procedure;
pub mod simulation;
pub mod transform;
pub mod unit;

// Re-export key types for convenience
pub use crate::axes::XyzAxes;
pub use crate::error::{CalibrationError, UnitError};
pub use crate::procedure::{Correspondences, ViewCentering, calibrate, measure_correspondences};
pub use crate::transform::Transform;
pub use crate::unit::{CalibrationReport, VirtualXyzUnit};
