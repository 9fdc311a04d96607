// src/formula.rs
//
// Pointwise pieces of the anisotropic phase-field model.
//
// gx = dphi/dx, gy = dphi/dy. The four-fold anisotropy enters through
//   n4 = (gx^4 + gy^4) / (gx^2 + gy^2)^2   in [0, 1]
// which is 1 along the grid axes and 1/2 along the diagonals.
//
// Each coefficient-carrying formula is a small Copy value built once from the
// physical parameters; `eval` is pure.

/// Phase value of the liquid.
pub const LIQUID: f64 = -1.0;
/// Phase value of the solid.
pub const SOLID: f64 = 1.0;

/// 1 / |grad phi|^4, or 0 where the gradient vanishes.
#[inline]
pub fn inv_abs_n4(gx: f64, gy: f64) -> f64 {
    let abs2 = gx * gx + gy * gy;
    let abs4 = abs2 * abs2;
    if abs4 == 0.0 {
        0.0
    } else {
        1.0 / abs4
    }
}

/// Four-fold orientation measure (gx^4 + gy^4) / |grad phi|^4.
#[inline]
pub fn n4(gx: f64, gy: f64, inv_abs_n4: f64) -> f64 {
    let gx2 = gx * gx;
    let gy2 = gy * gy;
    (gx2 * gx2 + gy2 * gy2) * inv_abs_n4
}

/// Clamp a phase value into [LIQUID, SOLID].
#[inline]
pub fn clamp_phase(phi: f64) -> f64 {
    phi.clamp(LIQUID, SOLID)
}

/// a_c(n4) = (1 - 3 eps_c) + 4 eps_c n4
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientEnergyAnisotropy {
    c1: f64,
    c2: f64,
}

impl GradientEnergyAnisotropy {
    pub fn new(epsilon_c: f64) -> Self {
        Self {
            c1: 1.0 - 3.0 * epsilon_c,
            c2: 4.0 * epsilon_c,
        }
    }

    #[inline]
    pub fn eval(&self, n4: f64) -> f64 {
        self.c1 + self.c2 * n4
    }
}

/// a_k(n4) = (1 + 3 eps_k) - 4 eps_k n4
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KineticAnisotropy {
    c1: f64,
    c2: f64,
}

impl KineticAnisotropy {
    pub fn new(epsilon_k: f64) -> Self {
        Self {
            c1: 1.0 + 3.0 * epsilon_k,
            c2: 4.0 * epsilon_k,
        }
    }

    #[inline]
    pub fn eval(&self, n4: f64) -> f64 {
        self.c1 - self.c2 * n4
    }
}

/// Orientation-dependent interface width W = W0 a_c.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterfaceWidth {
    w0: f64,
}

impl InterfaceWidth {
    pub fn new(w0: f64) -> Self {
        Self { w0 }
    }

    #[inline]
    pub fn eval(&self, a_c: f64) -> f64 {
        self.w0 * a_c
    }
}

/// Inverse relaxation time 1 / (tau0 a_c a_k), 0 where the product vanishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TauInv {
    tau0: f64,
}

impl TauInv {
    pub fn new(tau0: f64) -> Self {
        Self { tau0 }
    }

    #[inline]
    pub fn eval(&self, a_c: f64, a_k: f64) -> f64 {
        let tau = self.tau0 * a_c * a_k;
        if tau == 0.0 {
            0.0
        } else {
            1.0 / tau
        }
    }
}

/// Flux correction along one axis: (W^2 - W0^2) g.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aniso2 {
    w0_sq: f64,
}

impl Aniso2 {
    pub fn new(w0: f64) -> Self {
        Self { w0_sq: w0 * w0 }
    }

    #[inline]
    pub fn eval(&self, w: f64, g: f64) -> f64 {
        (w * w - self.w0_sq) * g
    }
}

/// Cross-coupling flux 16 W0 eps_c W (ga^3 gb^2 - ga gb^4) / |grad phi|^4.
///
/// For the x-axis term call with (gx, gy); for the y-axis term with (gy, gx).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aniso3 {
    c1: f64,
}

impl Aniso3 {
    pub fn new(w0: f64, epsilon_c: f64) -> Self {
        Self {
            c1: 16.0 * w0 * epsilon_c,
        }
    }

    #[inline]
    pub fn eval(&self, w: f64, ga: f64, gb: f64, inv_abs_n4: f64) -> f64 {
        let gb2 = gb * gb;
        let ga3 = ga * ga * ga;
        self.c1 * w * (ga3 * gb2 - ga * (gb2 * gb2)) * inv_abs_n4
    }
}

/// Double-well driving force with undercooling bias:
/// (phi - u lambda (1 - phi^2)) (1 - phi^2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChemicalPotential {
    u: f64,
    lambda: f64,
}

impl ChemicalPotential {
    pub fn new(u: f64, lambda: f64) -> Self {
        Self { u, lambda }
    }

    #[inline]
    pub fn eval(&self, phi: f64) -> f64 {
        let dw = 1.0 - phi * phi;
        (phi - self.u * self.lambda * dw) * dw
    }
}

/// Explicit Euler update phi + dt tau_inv rhs, clamped to [LIQUID, SOLID].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplicitEuler {
    dt: f64,
}

impl ExplicitEuler {
    pub fn new(dt: f64) -> Self {
        Self { dt }
    }

    #[inline]
    pub fn eval(&self, tau_inv: f64, rhs: f64, prev: f64) -> f64 {
        clamp_phase(rhs * tau_inv * self.dt + prev)
    }
}
