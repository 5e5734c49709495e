use std::fmt;
use std::ops::Mul;

use super::{MathError, Vector3, Vector4};

const COLS: usize = 4;
const ROWS: usize = 4;
const SIZE: usize = COLS * ROWS;

/// 4x4 matrix stored row-major: element `(row, col)` lives at `col + row * 4`.
///
/// Vectors are columns, so `a * b` applies `b` first.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix4 {
    m: [f32; SIZE],
}

impl Matrix4 {
    #[rustfmt::skip]
    pub const IDENTITY: Matrix4 = Matrix4 { m: [
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ] };

    pub const fn from_array(m: [f32; SIZE]) -> Self {
        Self { m }
    }

    pub fn from_slice(m: &[f32]) -> Result<Self, MathError> {
        let m: [f32; SIZE] = m.try_into().map_err(|_| MathError::BadLength {
            expected: SIZE,
            actual: m.len(),
        })?;
        Ok(Self { m })
    }

    /// Translation, then rotation, then scale, as applied to a point:
    /// `T * R * S`.
    pub fn transform(translation: Vector3, rotation: Vector3, scale: Vector3) -> Self {
        Self::translate(translation) * Self::rotate(rotation) * Self::scale(scale)
    }

    #[rustfmt::skip]
    pub fn translate(v: Vector3) -> Self {
        Self::from_array([
            1.0, 0.0, 0.0, v.x,
            0.0, 1.0, 0.0, v.y,
            0.0, 0.0, 1.0, v.z,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Euler rotation in radians, equivalent to `Rx * Ry * Rz`.
    pub fn rotate(v: Vector3) -> Self {
        let (b, a) = v.x.sin_cos();
        let (d, c) = v.y.sin_cos();
        let (f, e) = v.z.sin_cos();
        let mut m = [0.0; SIZE];
        m[0] = c * e;
        m[1] = -c * f;
        m[2] = d;
        m[4] = b * d * e + a * f;
        m[5] = -b * d * f + a * e;
        m[6] = -b * c;
        m[8] = -a * d * e + b * f;
        m[9] = a * d * f + b * e;
        m[10] = a * c;
        m[15] = 1.0;
        Self { m }
    }

    pub fn scale_uniform(s: f32) -> Self {
        Self::scale(Vector3::new(s, s, s))
    }

    #[rustfmt::skip]
    pub fn scale(v: Vector3) -> Self {
        Self::from_array([
            v.x, 0.0, 0.0, 0.0,
            0.0, v.y, 0.0, 0.0,
            0.0, 0.0, v.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[col + row * COLS]
    }

    pub fn to_array(&self) -> [f32; SIZE] {
        self.m
    }

    /// Column-major layout expected by WGSL `mat4x4<f32>`.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        let t = self.transpose().m;
        [
            [t[0], t[1], t[2], t[3]],
            [t[4], t[5], t[6], t[7]],
            [t[8], t[9], t[10], t[11]],
            [t[12], t[13], t[14], t[15]],
        ]
    }

    /// Mirrors the values along the major diagonal.
    #[rustfmt::skip]
    pub fn transpose(&self) -> Self {
        let m = &self.m;
        Self::from_array([
            m[0], m[4], m[8],  m[12],
            m[1], m[5], m[9],  m[13],
            m[2], m[6], m[10], m[14],
            m[3], m[7], m[11], m[15],
        ])
    }

    pub fn determinant(&self) -> f32 {
        let inv = cofactors(&self.m);
        let m = &self.m;
        m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12]
    }

    /// Inverse by cofactor expansion (the MESA `gluInvertMatrix` layout).
    ///
    /// Fails only when the determinant is exactly zero; nearly singular
    /// matrices invert to large values.
    pub fn invert(&self) -> Result<Self, MathError> {
        let mut inv = cofactors(&self.m);
        let m = &self.m;
        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        if det == 0.0 {
            return Err(MathError::SingularMatrix);
        }
        let inv_det = 1.0 / det;
        for value in inv.iter_mut() {
            *value *= inv_det;
        }
        Ok(Self { m: inv })
    }

    /// Transforms a point (`w = 1`) and drops the `w` component.
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        (*self * Vector4::extend(p, 1.0)).truncate()
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, factor: Matrix4) -> Matrix4 {
        let mut m = [0.0; SIZE];
        for row in 0..ROWS {
            for col in 0..COLS {
                for i in 0..COLS {
                    m[col + row * COLS] += self.m[i + row * COLS] * factor.m[col + i * COLS];
                }
            }
        }
        Matrix4 { m }
    }
}

impl Mul<Vector4> for Matrix4 {
    type Output = Vector4;

    fn mul(self, v: Vector4) -> Vector4 {
        let m = &self.m;
        Vector4::new(
            m[0] * v.x + m[1] * v.y + m[2] * v.z + m[3] * v.w,
            m[4] * v.x + m[5] * v.y + m[6] * v.z + m[7] * v.w,
            m[8] * v.x + m[9] * v.y + m[10] * v.z + m[11] * v.w,
            m[12] * v.x + m[13] * v.y + m[14] * v.z + m[15] * v.w,
        )
    }
}

impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Matrix4{")?;
        for row in 0..ROWS {
            if row != 0 {
                f.write_str(", ")?;
            }
            f.write_str("{")?;
            for col in 0..COLS {
                if col != 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{:.2}", self.get(row, col))?;
            }
            f.write_str("}")?;
        }
        f.write_str("}")
    }
}

impl From<Matrix4> for glam::Mat4 {
    fn from(m: Matrix4) -> Self {
        glam::Mat4::from_cols_array_2d(&m.to_cols_array_2d())
    }
}

impl From<glam::Mat4> for Matrix4 {
    fn from(m: glam::Mat4) -> Self {
        Matrix4::from_array(m.transpose().to_cols_array())
    }
}

/// Transposed cofactor matrix (the adjugate) of `m`.
fn cofactors(m: &[f32; SIZE]) -> [f32; SIZE] {
    let mut inv = [0.0; SIZE];

    inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
        + m[9] * m[7] * m[14]
        + m[13] * m[6] * m[11]
        - m[13] * m[7] * m[10];
    inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
        - m[8] * m[7] * m[14]
        - m[12] * m[6] * m[11]
        + m[12] * m[7] * m[10];
    inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
        + m[8] * m[7] * m[13]
        + m[12] * m[5] * m[11]
        - m[12] * m[7] * m[9];
    inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
        - m[8] * m[6] * m[13]
        - m[12] * m[5] * m[10]
        + m[12] * m[6] * m[9];

    inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
        - m[9] * m[3] * m[14]
        - m[13] * m[2] * m[11]
        + m[13] * m[3] * m[10];
    inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
        + m[8] * m[3] * m[14]
        + m[12] * m[2] * m[11]
        - m[12] * m[3] * m[10];
    inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
        - m[8] * m[3] * m[13]
        - m[12] * m[1] * m[11]
        + m[12] * m[3] * m[9];
    inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
        + m[8] * m[2] * m[13]
        + m[12] * m[1] * m[10]
        - m[12] * m[2] * m[9];

    inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
        + m[5] * m[3] * m[14]
        + m[13] * m[2] * m[7]
        - m[13] * m[3] * m[6];
    inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
        - m[4] * m[3] * m[14]
        - m[12] * m[2] * m[7]
        + m[12] * m[3] * m[6];
    inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
        + m[4] * m[3] * m[13]
        + m[12] * m[1] * m[7]
        - m[12] * m[3] * m[5];
    inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
        - m[4] * m[2] * m[13]
        - m[12] * m[1] * m[6]
        + m[12] * m[2] * m[5];

    inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
        - m[5] * m[3] * m[10]
        - m[9] * m[2] * m[7]
        + m[9] * m[3] * m[6];
    inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
        + m[4] * m[3] * m[10]
        + m[8] * m[2] * m[7]
        - m[8] * m[3] * m[6];
    inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
        - m[4] * m[3] * m[9]
        - m[8] * m[1] * m[7]
        + m[8] * m[3] * m[5];
    inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
        + m[4] * m[2] * m[9]
        + m[8] * m[1] * m[6]
        - m[8] * m[2] * m[5];

    inv
}
