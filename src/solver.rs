// src/solver.rs
//
// One explicit Euler step of the anisotropic Allen–Cahn phase-field model:
//
//   phi' = clamp( phi + dt / (tau0 a_c a_k) * [ W0^2 lap(phi)
//                                               + d/dx (aniso2(W, gx)) + d/dy (aniso2(W, gy))
//                                               + d/dx (aniso3(W, gx, gy)) + d/dy (aniso3(W, gy, gx))
//                                               + chem_pot(phi) ] )
//
// The solver is immutable after construction. Intermediate fields live in a
// `PredictScratch` owned by the caller, so one solver can serve several threads
// as long as each uses its own scratch.

use tracing::debug;

use crate::error::Result;
use crate::formula::{
    inv_abs_n4, n4, Aniso2, Aniso3, ChemicalPotential, ExplicitEuler, GradientEnergyAnisotropy,
    InterfaceWidth, KineticAnisotropy, TauInv,
};
use crate::grid::Shape2D;
use crate::params::SimulationParameters;
use crate::scalar_field::ScalarField2D;
use crate::stencil::{conv2d, Boundary, StencilSet};

/// Intermediate fields of one `predict` call.
pub struct PredictScratch {
    shape: Shape2D,
    dphi_dx: ScalarField2D,
    dphi_dy: ScalarField2D,
    inv_abs_n4: ScalarField2D,
    n4: ScalarField2D,
    a_c: ScalarField2D,
    a_k: ScalarField2D,
    w: ScalarField2D,
    tau_inv: ScalarField2D,
    flux: ScalarField2D,
    term1: ScalarField2D,
    term2_dx: ScalarField2D,
    term2_dy: ScalarField2D,
    term3_dx: ScalarField2D,
    term3_dy: ScalarField2D,
    term4: ScalarField2D,
    rhs: ScalarField2D,
}

impl PredictScratch {
    pub fn new(shape: Shape2D) -> Self {
        let z = || ScalarField2D::new(shape);
        Self {
            shape,
            dphi_dx: z(),
            dphi_dy: z(),
            inv_abs_n4: z(),
            n4: z(),
            a_c: z(),
            a_k: z(),
            w: z(),
            tau_inv: z(),
            flux: z(),
            term1: z(),
            term2_dx: z(),
            term2_dy: z(),
            term3_dx: z(),
            term3_dy: z(),
            term4: z(),
            rhs: z(),
        }
    }

    pub fn shape(&self) -> Shape2D {
        self.shape
    }

    /// Gradient components of the last `predict` input.
    pub fn gradients(&self) -> (&ScalarField2D, &ScalarField2D) {
        (&self.dphi_dx, &self.dphi_dy)
    }

    /// Bracketed right-hand side of the last `predict` call (before dt / tau).
    pub fn rhs(&self) -> &ScalarField2D {
        &self.rhs
    }
}

/// Single-step solver for a 2D phase field.
#[derive(Debug, Clone)]
pub struct PhaseField2D {
    params: SimulationParameters,
    boundary: Boundary,
    stencils: StencilSet,
    w0_sq: f64,
    a_c: GradientEnergyAnisotropy,
    a_k: KineticAnisotropy,
    width: InterfaceWidth,
    tau_inv: TauInv,
    aniso2: Aniso2,
    aniso3: Aniso3,
    chem_pot: ChemicalPotential,
    euler: ExplicitEuler,
}

impl PhaseField2D {
    /// Build a solver with the default (`Replicate`) boundary policy.
    ///
    /// `params` must have been `setup`; otherwise this fails with `UnsetParameter`.
    pub fn new(params: &SimulationParameters) -> Result<Self> {
        Self::with_boundary(params, Boundary::default())
    }

    pub fn with_boundary(params: &SimulationParameters, boundary: Boundary) -> Result<Self> {
        let d = *params.derived()?;
        debug!(%boundary, dx = d.dx, dt = d.dt, "building phase-field solver");
        Ok(Self {
            params: params.clone(),
            boundary,
            stencils: StencilSet::new(d.dx),
            w0_sq: d.w0 * d.w0,
            a_c: GradientEnergyAnisotropy::new(params.epsilon_c),
            a_k: KineticAnisotropy::new(params.epsilon_k),
            width: InterfaceWidth::new(d.w0),
            tau_inv: TauInv::new(d.tau0),
            aniso2: Aniso2::new(d.w0),
            aniso3: Aniso3::new(d.w0, params.epsilon_c),
            chem_pot: ChemicalPotential::new(params.u, params.lambda),
            euler: ExplicitEuler::new(d.dt),
        })
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn stencils(&self) -> &StencilSet {
        &self.stencils
    }

    /// Advance `phi` by one step into `out`, allocating fresh scratch.
    pub fn predict(&self, phi: &ScalarField2D, out: &mut ScalarField2D) -> Result<()> {
        let mut scratch = PredictScratch::new(phi.shape());
        self.predict_with_scratch(phi, out, &mut scratch)
    }

    /// Advance `phi` by one step and return the new field.
    pub fn predict_new(&self, phi: &ScalarField2D) -> Result<ScalarField2D> {
        let mut out = ScalarField2D::like(phi);
        self.predict(phi, &mut out)?;
        Ok(out)
    }

    /// Advance `phi` by one step into `out`, reusing `scratch`.
    ///
    /// `out` must have the shape of `phi` (`ShapeMismatch` otherwise). A scratch
    /// built for another shape is reallocated.
    pub fn predict_with_scratch(
        &self,
        phi: &ScalarField2D,
        out: &mut ScalarField2D,
        scratch: &mut PredictScratch,
    ) -> Result<()> {
        phi.ensure_same_shape(out)?;
        if scratch.shape != phi.shape() {
            *scratch = PredictScratch::new(phi.shape());
        }
        let PredictScratch {
            dphi_dx,
            dphi_dy,
            inv_abs_n4: inv_n4,
            n4: n4_field,
            a_c,
            a_k,
            w,
            tau_inv,
            flux,
            term1,
            term2_dx,
            term2_dy,
            term3_dx,
            term3_dy,
            term4,
            rhs,
            ..
        } = scratch;
        let b = self.boundary;
        let st = &self.stencils;

        // --- derivatives and orientation ---
        conv2d(phi, &st.dx, b, dphi_dx)?;
        conv2d(phi, &st.dy, b, dphi_dy)?;
        inv_n4.zip_map([&*dphi_dx, &*dphi_dy], |[gx, gy]| inv_abs_n4(gx, gy))?;
        n4_field.zip_map([&*dphi_dx, &*dphi_dy, &*inv_n4], |[gx, gy, inv]| {
            n4(gx, gy, inv)
        })?;

        // --- anisotropic coefficients ---
        let (ac_f, ak_f, width_f, tau_f) = (self.a_c, self.a_k, self.width, self.tau_inv);
        a_c.zip_map([&*n4_field], |[n]| ac_f.eval(n))?;
        a_k.zip_map([&*n4_field], |[n]| ak_f.eval(n))?;
        w.zip_map([&*a_c], |[ac]| width_f.eval(ac))?;
        tau_inv.zip_map([&*a_c, &*a_k], |[ac, ak]| tau_f.eval(ac, ak))?;

        // --- isotropic diffusion ---
        conv2d(phi, &st.laplacian, b, term1)?;
        let w0_sq = self.w0_sq;
        term1.map_inplace(|v| v * w0_sq);

        // --- anisotropic flux divergence ---
        let (aniso2, aniso3) = (self.aniso2, self.aniso3);
        flux.zip_map([&*w, &*dphi_dx], |[w, g]| aniso2.eval(w, g))?;
        conv2d(flux, &st.dx, b, term2_dx)?;
        flux.zip_map([&*w, &*dphi_dy], |[w, g]| aniso2.eval(w, g))?;
        conv2d(flux, &st.dy, b, term2_dy)?;
        flux.zip_map([&*w, &*dphi_dx, &*dphi_dy, &*inv_n4], |[w, gx, gy, inv]| {
            aniso3.eval(w, gx, gy, inv)
        })?;
        conv2d(flux, &st.dx, b, term3_dx)?;
        flux.zip_map([&*w, &*dphi_dy, &*dphi_dx, &*inv_n4], |[w, gy, gx, inv]| {
            aniso3.eval(w, gy, gx, inv)
        })?;
        conv2d(flux, &st.dy, b, term3_dy)?;

        // --- driving force ---
        let chem = self.chem_pot;
        term4.zip_map([phi], |[p]| chem.eval(p))?;

        rhs.zip_map(
            [
                &*term1, &*term2_dx, &*term2_dy, &*term3_dx, &*term3_dy, &*term4,
            ],
            |[t1, t2x, t2y, t3x, t3y, t4]| t1 + t2x + t2y + t3x + t3y + t4,
        )?;

        let euler = self.euler;
        out.zip_map([&*tau_inv, &*rhs, phi], |[ti, r, p]| euler.eval(ti, r, p))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhaseFieldError;
    use crate::formula::{LIQUID, SOLID};
    use crate::initial_states::set_nucleus_at_corner;

    fn reference_params() -> SimulationParameters {
        let mut p = SimulationParameters::pure_ni().with_inputs(-0.2, 16.0);
        p.setup().unwrap();
        p
    }

    #[test]
    fn solver_requires_setup() {
        let p = SimulationParameters::pure_ni().with_inputs(-0.2, 16.0);
        assert!(matches!(
            PhaseField2D::new(&p),
            Err(PhaseFieldError::UnsetParameter(_))
        ));
    }

    #[test]
    fn uniform_phases_are_fixed_points() {
        let solver = PhaseField2D::new(&reference_params()).unwrap();
        for value in [SOLID, LIQUID] {
            let phi = ScalarField2D::filled(Shape2D::new(12, 9), value);
            let next = solver.predict_new(&phi).unwrap();
            assert_eq!(next, phi);
        }
    }

    #[test]
    fn predict_rejects_mismatched_output() {
        let solver = PhaseField2D::new(&reference_params()).unwrap();
        let phi = ScalarField2D::new(Shape2D::new(8, 8));
        let mut out = ScalarField2D::new(Shape2D::new(8, 9));
        let err = solver.predict(&phi, &mut out).unwrap_err();
        assert!(matches!(err, PhaseFieldError::ShapeMismatch { .. }));
        // Output untouched.
        assert!(out.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn scratch_reuse_matches_fresh_allocation() {
        let solver = PhaseField2D::new(&reference_params()).unwrap();
        let mut phi = ScalarField2D::new(Shape2D::new(24, 24));
        set_nucleus_at_corner(&mut phi, 6).unwrap();

        let mut scratch = PredictScratch::new(Shape2D::new(3, 3));
        let mut a = ScalarField2D::like(&phi);
        let mut b = ScalarField2D::like(&phi);
        solver.predict_with_scratch(&phi, &mut a, &mut scratch).unwrap();
        assert_eq!(scratch.shape(), phi.shape());
        solver.predict_with_scratch(&phi, &mut b, &mut scratch).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, solver.predict_new(&phi).unwrap());
    }

    #[test]
    fn nucleus_grows_in_undercooled_melt() {
        let solver = PhaseField2D::new(&reference_params()).unwrap();
        let mut phi = ScalarField2D::new(Shape2D::new(32, 32));
        set_nucleus_at_corner(&mut phi, 8).unwrap();
        let mut next = ScalarField2D::like(&phi);
        let mut scratch = PredictScratch::new(phi.shape());
        let solid_before: f64 = phi.as_slice().iter().sum();
        for _ in 0..20 {
            solver.predict_with_scratch(&phi, &mut next, &mut scratch).unwrap();
            std::mem::swap(&mut phi, &mut next);
        }
        let solid_after: f64 = phi.as_slice().iter().sum();
        assert!(solid_after > solid_before);
        // Far corner still liquid, seed corner still solid (the interface
        // softens it slightly).
        assert_eq!(phi[(31, 31)], LIQUID);
        assert!(phi[(0, 0)] > 0.99, "seed corner {}", phi[(0, 0)]);
    }

    #[test]
    fn stale_parameters_are_rejected() {
        let mut p = reference_params();
        p.lambda = 4.0;
        assert!(matches!(
            PhaseField2D::new(&p),
            Err(PhaseFieldError::StaleParameters)
        ));
        p.setup().unwrap();
        let solver = PhaseField2D::new(&p).unwrap();
        assert_eq!(solver.params().lambda, 4.0);
        assert_eq!(solver.stencils(), &StencilSet::new(p.dx().unwrap()));
    }

    #[test]
    fn scratch_exposes_gradients_and_rhs() {
        let solver = PhaseField2D::with_boundary(&reference_params(), Boundary::Reflect).unwrap();
        assert_eq!(solver.boundary(), Boundary::Reflect);

        let mut phi = ScalarField2D::new(Shape2D::new(20, 20));
        set_nucleus_at_corner(&mut phi, 6).unwrap();
        let mut out = ScalarField2D::like(&phi);
        let mut scratch = PredictScratch::new(phi.shape());
        solver.predict_with_scratch(&phi, &mut out, &mut scratch).unwrap();

        let mut gx = ScalarField2D::like(&phi);
        let mut gy = ScalarField2D::like(&phi);
        conv2d(&phi, &solver.stencils().dx, solver.boundary(), &mut gx).unwrap();
        conv2d(&phi, &solver.stencils().dy, solver.boundary(), &mut gy).unwrap();
        let (sx, sy) = scratch.gradients();
        assert_eq!(sx, &gx);
        assert_eq!(sy, &gy);

        // tau_inv > 0, so every change follows the sign of the bracket.
        let rhs = scratch.rhs();
        for i in 0..phi.as_slice().len() {
            let (p, o, r) = (phi.as_slice()[i], out.as_slice()[i], rhs.as_slice()[i]);
            if r == 0.0 {
                assert_eq!(o, p);
            }
            if o != p {
                assert_eq!((o - p).signum(), r.signum());
            }
        }
        // Bulk cells have a zero bracket.
        assert_eq!(rhs[(0, 0)], 0.0);
        assert_eq!(rhs[(19, 19)], 0.0);
    }
}
