//! 2x2 unitaries for single-qubit resynthesis.

use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::ops::Mul;

use num_complex::Complex64;
use qopt_ir::StandardGate;

const EPSILON: f64 = 1e-10;

/// A 2x2 complex matrix in row-major order `[[a, b], [c, d]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unitary2x2 {
    /// Matrix elements `[a, b, c, d]`.
    pub data: [Complex64; 4],
}

#[inline]
fn re(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

#[inline]
fn phase(theta: f64) -> Complex64 {
    Complex64::from_polar(1.0, theta)
}

impl Unitary2x2 {
    /// Create from row-major elements.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// Identity.
    pub fn identity() -> Self {
        Self::diagonal(re(1.0), re(1.0))
    }

    fn diagonal(a: Complex64, d: Complex64) -> Self {
        Self::new(a, re(0.0), re(0.0), d)
    }

    /// Rotation about X.
    pub fn rx(theta: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        let ms = Complex64::new(0.0, -s);
        Self::new(re(c), ms, ms, re(c))
    }

    /// Rotation about Y.
    pub fn ry(theta: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        Self::new(re(c), re(-s), re(s), re(c))
    }

    /// Rotation about Z.
    pub fn rz(theta: f64) -> Self {
        Self::diagonal(phase(-theta / 2.0), phase(theta / 2.0))
    }

    /// Phase gate `diag(1, e^{iλ})`.
    pub fn p(lambda: f64) -> Self {
        Self::diagonal(re(1.0), phase(lambda))
    }

    /// `U(θ, φ, λ)`.
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        Self::new(
            re(c),
            -Complex64::from_polar(s, lambda),
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        )
    }

    /// Matrix of a single-qubit standard gate; `None` for multi-qubit gates.
    pub fn from_gate(gate: &StandardGate) -> Option<Self> {
        let h = FRAC_1_SQRT_2;
        let u = match *gate {
            StandardGate::I => Self::identity(),
            StandardGate::X => Self::new(re(0.0), re(1.0), re(1.0), re(0.0)),
            StandardGate::Y => Self::new(
                re(0.0),
                Complex64::new(0.0, -1.0),
                Complex64::new(0.0, 1.0),
                re(0.0),
            ),
            StandardGate::Z => Self::p(PI),
            StandardGate::H => Self::new(re(h), re(h), re(h), re(-h)),
            StandardGate::S => Self::p(PI / 2.0),
            StandardGate::Sdg => Self::p(-PI / 2.0),
            StandardGate::T => Self::p(PI / 4.0),
            StandardGate::Tdg => Self::p(-PI / 4.0),
            StandardGate::SX => {
                let a = Complex64::new(0.5, 0.5);
                let b = Complex64::new(0.5, -0.5);
                Self::new(a, b, b, a)
            }
            StandardGate::Rx(t) => Self::rx(t),
            StandardGate::Ry(t) => Self::ry(t),
            StandardGate::Rz(t) => Self::rz(t),
            StandardGate::P(l) => Self::p(l),
            StandardGate::U(t, p, l) => Self::u(t, p, l),
            _ => return None,
        };
        Some(u)
    }

    /// Equal to the identity up to global phase.
    pub fn is_identity(&self) -> bool {
        let [a, b, c, d] = self.data;
        b.norm() < EPSILON && c.norm() < EPSILON && (a - d).norm() < EPSILON
    }

    /// ZYZ Euler angles: `self = e^{iφ} · Rz(α) · Ry(β) · Rz(γ)`.
    ///
    /// Returns `(α, β, γ, φ)`. As a circuit the order is `Rz(γ)`, then
    /// `Ry(β)`, then `Rz(α)`.
    pub fn zyz_decomposition(&self) -> (f64, f64, f64, f64) {
        let [a, b, c, d] = self.data;
        let global_phase = (a * d - b * c).arg() / 2.0;

        // Strip the phase to land in SU(2).
        let strip = phase(-global_phase);
        let (a, c) = (a * strip, c * strip);

        let beta = 2.0 * c.norm().atan2(a.norm());

        if beta.abs() < EPSILON {
            let sum = -2.0 * a.arg();
            return (sum / 2.0, 0.0, sum / 2.0, global_phase);
        }
        if (beta - PI).abs() < EPSILON {
            let diff = 2.0 * c.arg();
            return (diff / 2.0, PI, -diff / 2.0, global_phase);
        }

        let sum = -2.0 * a.arg();
        let diff = 2.0 * c.arg();
        ((sum + diff) / 2.0, beta, (sum - diff) / 2.0, global_phase)
    }

    /// Wrap an angle into `(-π, π]`. Non-finite angles map to zero.
    pub fn normalize_angle(angle: f64) -> f64 {
        if !angle.is_finite() {
            return 0.0;
        }
        let a = angle.rem_euclid(2.0 * PI);
        if a > PI { a - 2.0 * PI } else { a }
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Unitary2x2 {
    type Output = Self;

    #[allow(clippy::many_single_char_names)]
    fn mul(self, rhs: Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = rhs.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq_up_to_phase(u: &Unitary2x2, v: &Unitary2x2) -> bool {
        // u · v† must be a multiple of the identity
        let [a, b, c, d] = v.data;
        let dagger = Unitary2x2::new(a.conj(), c.conj(), b.conj(), d.conj());
        (*u * dagger).is_identity()
    }

    fn rebuild(u: &Unitary2x2) -> Unitary2x2 {
        let (alpha, beta, gamma, _) = u.zyz_decomposition();
        Unitary2x2::rz(alpha) * Unitary2x2::ry(beta) * Unitary2x2::rz(gamma)
    }

    #[test]
    fn test_self_inverse_gates() {
        for g in [StandardGate::H, StandardGate::X, StandardGate::Y, StandardGate::Z] {
            let u = Unitary2x2::from_gate(&g).unwrap();
            assert!((u * u).is_identity(), "{g:?} squared");
        }
    }

    #[test]
    fn test_s_squared_is_z() {
        let s = Unitary2x2::from_gate(&StandardGate::S).unwrap();
        let z = Unitary2x2::from_gate(&StandardGate::Z).unwrap();
        assert!(approx_eq_up_to_phase(&(s * s), &z));
    }

    #[test]
    fn test_sx_squared_is_x() {
        let sx = Unitary2x2::from_gate(&StandardGate::SX).unwrap();
        let x = Unitary2x2::from_gate(&StandardGate::X).unwrap();
        assert!(approx_eq_up_to_phase(&(sx * sx), &x));
    }

    #[test]
    fn test_zyz_roundtrip() {
        let cases = [
            Unitary2x2::identity(),
            Unitary2x2::from_gate(&StandardGate::H).unwrap(),
            Unitary2x2::from_gate(&StandardGate::X).unwrap(),
            Unitary2x2::from_gate(&StandardGate::Y).unwrap(),
            Unitary2x2::from_gate(&StandardGate::T).unwrap(),
            Unitary2x2::u(0.3, -1.2, 2.5),
            Unitary2x2::rx(1.1) * Unitary2x2::rz(0.4),
        ];
        for u in &cases {
            assert!(approx_eq_up_to_phase(&rebuild(u), u), "{u:?}");
        }
    }

    #[test]
    fn test_multi_qubit_has_no_matrix() {
        assert!(Unitary2x2::from_gate(&StandardGate::CZ).is_none());
    }

    #[test]
    fn test_normalize_angle() {
        assert!((Unitary2x2::normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-12);
        assert!(Unitary2x2::normalize_angle(2.0 * PI).abs() < 1e-12);
        assert!((Unitary2x2::normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert_eq!(Unitary2x2::normalize_angle(f64::NAN), 0.0);
    }
}
