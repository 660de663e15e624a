//! XYZ Common Library
//!
//! Shared vocabulary for the XYZ calibration workspace: vector and matrix
//! aliases, the device capability traits every manipulator backend
//! implements, and TOML configuration loading.
//!
//! # Module Structure
//!
//! - [`geometry`] - `Vec3` / `Mat3` aliases and the typed [`geometry::Axis`]
//! - [`device`] - `XyzDevice`, `StageReference`, `AxisController` traits and `DeviceError`
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Workspace-wide constants
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use xyz_common::prelude::*;
//!
//! let v = Vec3::new(1.0, 2.0, 3.0);
//! assert_eq!(v[Axis::Y.index()], 2.0);
//! ```

pub mod config;
pub mod consts;
pub mod device;
pub mod geometry;
pub mod prelude;
