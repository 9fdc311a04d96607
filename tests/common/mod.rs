// tests/common/mod.rs
//
// Cell-by-cell restatement of one explicit step, written directly from the
// model equations with replicated edges. Used to cross-check the field-based
// solver.

#![allow(dead_code)]

use dendrite_sim::params::SimulationParameters;
use dendrite_sim::scalar_field::ScalarField2D;

pub fn reference_params() -> SimulationParameters {
    let mut p = SimulationParameters::pure_ni().with_inputs(-0.2, 16.0);
    p.setup().unwrap();
    p
}

fn at(f: &ScalarField2D, r: isize, c: isize) -> f64 {
    let r = r.clamp(0, f.rows() as isize - 1) as usize;
    let c = c.clamp(0, f.cols() as isize - 1) as usize;
    f[(r, c)]
}

fn ddx(f: &ScalarField2D, r: isize, c: isize, dx: f64) -> f64 {
    (at(f, r, c + 1) - at(f, r, c - 1)) / (2.0 * dx)
}

fn ddy(f: &ScalarField2D, r: isize, c: isize, dx: f64) -> f64 {
    (at(f, r + 1, c) - at(f, r - 1, c)) / (2.0 * dx)
}

pub fn reference_step(phi: &ScalarField2D, p: &SimulationParameters) -> ScalarField2D {
    let d = p.derived().unwrap();
    let (w0, tau0, dx, dt) = (d.w0, d.tau0, d.dx, d.dt);
    let (ec, ek) = (p.epsilon_c, p.epsilon_k);
    let (rows, cols) = (phi.rows(), phi.cols());

    let mut gx = ScalarField2D::like(phi);
    let mut gy = ScalarField2D::like(phi);
    for r in 0..rows {
        for c in 0..cols {
            gx[(r, c)] = ddx(phi, r as isize, c as isize, dx);
            gy[(r, c)] = ddy(phi, r as isize, c as isize, dx);
        }
    }

    let mut tau_inv = ScalarField2D::like(phi);
    let mut flux2x = ScalarField2D::like(phi);
    let mut flux2y = ScalarField2D::like(phi);
    let mut flux3x = ScalarField2D::like(phi);
    let mut flux3y = ScalarField2D::like(phi);
    for r in 0..rows {
        for c in 0..cols {
            let (x, y) = (gx[(r, c)], gy[(r, c)]);
            let mag4 = (x * x + y * y).powi(2);
            let i = if mag4 == 0.0 { 0.0 } else { 1.0 / mag4 };
            let n4 = (x.powi(4) + y.powi(4)) * i;
            let ac = 1.0 - 3.0 * ec + 4.0 * ec * n4;
            let ak = 1.0 + 3.0 * ek - 4.0 * ek * n4;
            let w = w0 * ac;
            let t = tau0 * ac * ak;
            tau_inv[(r, c)] = if t == 0.0 { 0.0 } else { 1.0 / t };
            flux2x[(r, c)] = (w * w - w0 * w0) * x;
            flux2y[(r, c)] = (w * w - w0 * w0) * y;
            flux3x[(r, c)] =
                16.0 * w0 * ec * w * (x.powi(3) * y.powi(2) - x * y.powi(4)) * i;
            flux3y[(r, c)] =
                16.0 * w0 * ec * w * (y.powi(3) * x.powi(2) - y * x.powi(4)) * i;
        }
    }

    let mut out = ScalarField2D::like(phi);
    for r in 0..rows {
        for c in 0..cols {
            let (ri, ci) = (r as isize, c as isize);
            let lap = (at(phi, ri - 1, ci)
                + at(phi, ri + 1, ci)
                + at(phi, ri, ci - 1)
                + at(phi, ri, ci + 1)
                - 4.0 * at(phi, ri, ci))
                / (dx * dx);
            let v = phi[(r, c)];
            let dw = 1.0 - v * v;
            let chem = (v - p.u * p.lambda * dw) * dw;
            let rhs = w0 * w0 * lap
                + ddx(&flux2x, ri, ci, dx)
                + ddy(&flux2y, ri, ci, dx)
                + ddx(&flux3x, ri, ci, dx)
                + ddy(&flux3y, ri, ci, dx)
                + chem;
            out[(r, c)] = (v + dt * tau_inv[(r, c)] * rhs).clamp(-1.0, 1.0);
        }
    }
    out
}

/// Phase values lie in [-1, 1]: relative tolerance with an absolute floor of `tol`.
pub fn close(a: f64, b: f64, tol: f64) -> bool {
    a == b || (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.0)
}

/// Smooth, deliberately asymmetric test field with values in (-1, 1).
pub fn smooth_blob(rows: usize, cols: usize) -> ScalarField2D {
    let mut f = ScalarField2D::new(dendrite_sim::grid::Shape2D::new(rows, cols));
    let (cy, cx) = (rows as f64 * 0.4, cols as f64 * 0.3);
    for r in 0..rows {
        for c in 0..cols {
            let dy = (r as f64 - cy) / 1.3;
            let dx = c as f64 - cx;
            let dist = (dx * dx + dy * dy).sqrt();
            f[(r, c)] = -(0.9 * ((dist - 5.0) / 2.0).tanh());
        }
    }
    f
}
