//! Affine transform between a device's native frame and the logical frame.
//!
//! `logical = M · native + x0`
//!
//! The inverse of `M` is computed once whenever a `Transform` is built and
//! cached next to it, so the two can never drift apart. A `Transform` with
//! a singular `M` cannot be constructed.

use crate::error::CalibrationError;
use xyz_common::consts::SINGULARITY_TOLERANCE;
use xyz_common::geometry::{Mat3, Vec3};

/// Affine map `logical = M · native + x0` with a cached `M⁻¹`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Mat3,
    inverse: Mat3,
    offset: Vec3,
}

impl Transform {
    /// Identity map with zero offset.
    pub fn identity() -> Self {
        Self {
            matrix: Mat3::identity(),
            inverse: Mat3::identity(),
            offset: Vec3::zeros(),
        }
    }

    /// Build a transform from its linear part and offset.
    ///
    /// # Errors
    /// `CalibrationError::SingularMatrix` if `matrix` is not invertible.
    pub fn from_parts(matrix: Mat3, offset: Vec3) -> Result<Self, CalibrationError> {
        let inverse = checked_inverse(&matrix).map_err(CalibrationError::SingularMatrix)?;
        Ok(Self {
            matrix,
            inverse,
            offset,
        })
    }

    /// Same linear part, new offset.
    pub fn with_offset(&self, offset: Vec3) -> Self {
        Self { offset, ..*self }
    }

    /// Linear part `M`.
    pub fn matrix(&self) -> &Mat3 {
        &self.matrix
    }

    /// Cached `M⁻¹`.
    pub fn inverse_matrix(&self) -> &Mat3 {
        &self.inverse
    }

    /// Offset `x0`.
    pub fn offset(&self) -> &Vec3 {
        &self.offset
    }

    /// Native position to logical position.
    #[inline]
    pub fn forward(&self, native: &Vec3) -> Vec3 {
        self.matrix * native + self.offset
    }

    /// Logical position to native position.
    #[inline]
    pub fn inverse(&self, logical: &Vec3) -> Vec3 {
        self.inverse * (logical - self.offset)
    }

    /// Native displacement to logical displacement (`M · v`, no offset).
    #[inline]
    pub fn linear_forward(&self, native_delta: &Vec3) -> Vec3 {
        self.matrix * native_delta
    }

    /// Logical displacement to native displacement (`M⁻¹ · v`, no offset).
    #[inline]
    pub fn inverse_delta(&self, logical_delta: &Vec3) -> Vec3 {
        self.inverse * logical_delta
    }

    /// Deviation of each row norm of `M` from 1.
    ///
    /// Both frames are in micrometers, so a correct fit is a rotation or
    /// reflection and every row has unit norm. Large values point to a
    /// scale mismatch or a bad fit. Heuristic, not an error bound.
    pub fn precision(&self) -> [f64; 3] {
        [0, 1, 2].map(|i| (1.0 - self.matrix.row(i).norm()).abs())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Determinant normalized by the product of column norms.
///
/// 1 for orthogonal columns, 0 for linearly dependent ones, independent of
/// the overall scale of the columns.
pub fn relative_determinant(m: &Mat3) -> f64 {
    let scale: f64 = m.column_iter().map(|c| c.norm()).product();
    if scale == 0.0 {
        return 0.0;
    }
    m.determinant() / scale
}

/// Invert `m`, rejecting rank-deficient input.
///
/// On rejection the relative determinant is returned as the error value.
pub fn checked_inverse(m: &Mat3) -> Result<Mat3, f64> {
    let rel_det = relative_determinant(m);
    if !rel_det.is_finite() || rel_det.abs() <= SINGULARITY_TOLERANCE {
        return Err(rel_det);
    }
    m.try_inverse().ok_or(rel_det)
}
