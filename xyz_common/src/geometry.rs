//! Vector and matrix aliases plus the typed axis selector.
//!
//! All positions are in micrometers. Whether a `Vec3` is expressed in a
//! device's native frame or in the logical (microscope) frame is a matter
//! of context; the calibration engine converts between the two.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-component position or displacement in micrometers.
pub type Vec3 = nalgebra::Vector3<f64>;

/// 3×3 linear map between frames.
pub type Mat3 = nalgebra::Matrix3<f64>;

/// One of the three Cartesian axes of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// First component (index 0).
    X,
    /// Second component (index 1).
    Y,
    /// Third component (index 2).
    Z,
}

impl Axis {
    /// All axes in component order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index (0, 1 or 2).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Axis for a component index, `None` outside `0..3`.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            _ => None,
        }
    }

    /// Unit vector along this axis.
    pub fn unit(self) -> Vec3 {
        let mut v = Vec3::zeros();
        v[self.index()] = 1.0;
        v
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Build a `Vec3` from a plain array (config and report representation).
#[inline]
pub fn vec3(a: [f64; 3]) -> Vec3 {
    Vec3::new(a[0], a[1], a[2])
}

/// Plain array view of a `Vec3`.
#[inline]
pub fn to_array(v: &Vec3) -> [f64; 3] {
    [v.x, v.y, v.z]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_index_round_trip() {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_index(axis.index()), Some(axis));
        }
        assert_eq!(Axis::from_index(3), None);
    }

    #[test]
    fn test_axis_unit_vector() {
        assert_eq!(Axis::Y.unit(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(Axis::Z.unit().norm(), 1.0);
    }

    #[test]
    fn test_axis_display_and_serde() {
        assert_eq!(Axis::X.to_string(), "x");

        #[derive(Debug, Deserialize, PartialEq)]
        struct Wrapper {
            axis: Axis,
        }
        let parsed: Wrapper = toml::from_str("axis = \"z\"").unwrap();
        assert_eq!(parsed.axis, Axis::Z);
    }

    #[test]
    fn test_array_conversions() {
        let v = vec3([1.5, -2.0, 3.25]);
        assert_eq!(to_array(&v), [1.5, -2.0, 3.25]);
    }
}
