//! 2×2 unitary arithmetic for single-qubit rewriting.

use num_complex::Complex64;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use qbridge_ir::{Op, OpType};

/// Tolerance for floating point comparisons.
pub const EPSILON: f64 = 1e-10;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A 2×2 matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unitary2x2(pub [[Complex64; 2]; 2]);

/// Euler angles `(θ, φ, λ)` and global phase `α` with
/// `U = e^{iα} · U3(θ, φ, λ)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct U3Angles {
    /// Polar angle, in `[0, π]`.
    pub theta: f64,
    /// First phase.
    pub phi: f64,
    /// Second phase.
    pub lambda: f64,
    /// Global phase.
    pub phase: f64,
}

impl Unitary2x2 {
    /// Identity.
    pub fn identity() -> Self {
        Self([[ONE, ZERO], [ZERO, ONE]])
    }

    /// `diag(1, e^{iλ})`.
    pub fn u1(lambda: f64) -> Self {
        Self([[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, lambda)]])
    }

    /// `U3(θ, φ, λ)`.
    pub fn u3(theta: f64, phi: f64, lambda: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        Self([
            [Complex64::new(c, 0.0), -Complex64::from_polar(s, lambda)],
            [Complex64::from_polar(s, phi), Complex64::from_polar(c, phi + lambda)],
        ])
    }

    /// Rotation about X.
    pub fn rx(theta: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        Self([
            [Complex64::new(c, 0.0), Complex64::new(0.0, -s)],
            [Complex64::new(0.0, -s), Complex64::new(c, 0.0)],
        ])
    }

    /// Rotation about Y.
    pub fn ry(theta: f64) -> Self {
        Self::u3(theta, 0.0, 0.0)
    }

    /// Rotation about Z.
    pub fn rz(theta: f64) -> Self {
        Self([
            [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
            [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
        ])
    }

    /// Matrix of a single-qubit gate kind with numeric parameters.
    pub fn from_gate(kind: OpType, params: &[f64]) -> Option<Self> {
        let p = |i: usize| params.get(i).copied();
        let sx = {
            let a = Complex64::new(0.5, 0.5);
            let b = Complex64::new(0.5, -0.5);
            Self([[a, b], [b, a]])
        };
        Some(match kind {
            OpType::X => Self::u3(PI, 0.0, PI),
            OpType::Y => Self::u3(PI, FRAC_PI_2, FRAC_PI_2),
            OpType::Z => Self::u1(PI),
            OpType::H => Self::u3(FRAC_PI_2, 0.0, PI),
            OpType::S => Self::u1(FRAC_PI_2),
            OpType::Sdg => Self::u1(-FRAC_PI_2),
            OpType::T => Self::u1(FRAC_PI_4),
            OpType::Tdg => Self::u1(-FRAC_PI_4),
            OpType::SX => sx,
            OpType::SXdg => sx.dagger(),
            OpType::Rx => Self::rx(p(0)?),
            OpType::Ry => Self::ry(p(0)?),
            OpType::Rz => Self::rz(p(0)?),
            OpType::U1 => Self::u1(p(0)?),
            OpType::U2 => Self::u3(FRAC_PI_2, p(0)?, p(1)?),
            OpType::U3 => Self::u3(p(0)?, p(1)?, p(2)?),
            _ => return None,
        })
    }

    /// Matrix of a single-qubit operation, if it has numeric parameters.
    pub fn from_op(op: &Op) -> Option<Self> {
        match op {
            Op::Gate(g) => Self::from_gate(g.kind(), &g.param_values()?),
            Op::Unitary1qBox(u) => Some(Self(u.matrix())),
            _ => None,
        }
    }

    /// Conjugate transpose.
    #[must_use]
    pub fn dagger(&self) -> Self {
        let m = self.0;
        Self([[m[0][0].conj(), m[1][0].conj()], [m[0][1].conj(), m[1][1].conj()]])
    }

    /// If this is `e^{iα}·I`, return `α`.
    pub fn identity_phase(&self) -> Option<f64> {
        let m = self.0;
        if m[0][1].norm() > EPSILON || m[1][0].norm() > EPSILON || (m[0][0] - m[1][1]).norm() > EPSILON {
            return None;
        }
        Some(m[0][0].arg())
    }

    /// Decompose as `e^{iα} · U3(θ, φ, λ)`.
    pub fn u3_angles(&self) -> U3Angles {
        let m = self.0;
        let theta = 2.0 * m[1][0].norm().atan2(m[0][0].norm());
        let (phase, phi, lambda) = if m[1][0].norm() < EPSILON {
            // Diagonal: only φ + λ is defined.
            let phase = m[0][0].arg();
            (phase, 0.0, m[1][1].arg() - phase)
        } else if m[0][0].norm() < EPSILON {
            // Anti-diagonal: only λ - φ is defined.
            let phase = m[1][0].arg();
            (phase, 0.0, (-m[0][1]).arg() - phase)
        } else {
            let phase = m[0][0].arg();
            (phase, m[1][0].arg() - phase, (-m[0][1]).arg() - phase)
        };
        U3Angles {
            theta,
            phi: normalize_angle(phi),
            lambda: normalize_angle(lambda),
            phase,
        }
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (a, b) = (self.0, rhs.0);
        let mut out = [[ZERO; 2]; 2];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, entry) in row.iter_mut().enumerate() {
                *entry = a[i][0] * b[0][j] + a[i][1] * b[1][j];
            }
        }
        Self(out)
    }
}

/// Map an angle into `(-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let a = angle.rem_euclid(2.0 * PI);
    if a > PI { a - 2.0 * PI } else { a }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Unitary2x2, b: Unitary2x2) {
        for i in 0..2 {
            for j in 0..2 {
                assert!(
                    (a.0[i][j] - b.0[i][j]).norm() < 1e-9,
                    "mismatch at ({i},{j}): {:?} vs {:?}",
                    a.0[i][j],
                    b.0[i][j]
                );
            }
        }
    }

    fn rebuild(u: Unitary2x2) -> Unitary2x2 {
        let a = u.u3_angles();
        let phase = Complex64::from_polar(1.0, a.phase);
        let v = Unitary2x2::u3(a.theta, a.phi, a.lambda);
        Unitary2x2([
            [v.0[0][0] * phase, v.0[0][1] * phase],
            [v.0[1][0] * phase, v.0[1][1] * phase],
        ])
    }

    #[test]
    fn test_pauli_squares_are_identity() {
        for kind in [OpType::X, OpType::Y, OpType::Z, OpType::H] {
            let u = Unitary2x2::from_gate(kind, &[]).unwrap();
            assert!((u * u).identity_phase().is_some(), "{kind}² is not identity");
        }
    }

    #[test]
    fn test_sx_squared_is_x() {
        let sx = Unitary2x2::from_gate(OpType::SX, &[]).unwrap();
        assert_close(sx * sx, Unitary2x2::from_gate(OpType::X, &[]).unwrap());
    }

    #[test]
    fn test_u3_angles_reconstruct() {
        let cases = [
            Unitary2x2::from_gate(OpType::H, &[]).unwrap(),
            Unitary2x2::from_gate(OpType::Y, &[]).unwrap(),
            Unitary2x2::from_gate(OpType::SX, &[]).unwrap(),
            Unitary2x2::rz(0.7),
            Unitary2x2::rx(-1.3),
            Unitary2x2::rx(PI),
            Unitary2x2::u3(0.4, 1.1, -2.5),
            Unitary2x2::rz(0.3) * Unitary2x2::ry(2.0) * Unitary2x2::rx(0.9),
        ];
        for u in cases {
            assert_close(rebuild(u), u);
        }
    }

    #[test]
    fn test_rz_is_u1_up_to_phase() {
        let a = Unitary2x2::rz(0.8).u3_angles();
        assert!(a.theta.abs() < 1e-12);
        assert!((a.phi + a.lambda - 0.8).abs() < 1e-12);
        assert!((a.phase + 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_identity_phase() {
        let u = Unitary2x2::rz(2.0 * PI);
        let phase = u.identity_phase().unwrap();
        assert!((phase.abs() - PI).abs() < 1e-9);
        assert!(Unitary2x2::rx(0.1).identity_phase().is_none());
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((normalize_angle(-0.5) + 0.5).abs() < 1e-12);
        assert_eq!(normalize_angle(f64::NAN), 0.0);
    }
}
