// src/lib.rs

//! Two-dimensional phase-field simulation of dendritic solidification of a pure
//! material with four-fold anisotropic interface energy and kinetics.
//!
//! ```no_run
//! use dendrite_sim::{
//!     initial_states::set_nucleus_at_corner, grid::Shape2D, params::SimulationParameters,
//!     scalar_field::ScalarField2D, solver::{PhaseField2D, PredictScratch},
//! };
//!
//! let mut params = SimulationParameters::pure_ni().with_inputs(-0.2, 16.0);
//! params.setup()?;
//! let solver = PhaseField2D::new(&params)?;
//!
//! let mut phi = ScalarField2D::new(Shape2D::new(80, 80));
//! set_nucleus_at_corner(&mut phi, 10)?;
//! let mut next = ScalarField2D::like(&phi);
//! let mut scratch = PredictScratch::new(phi.shape());
//! for _ in 0..100 {
//!     solver.predict_with_scratch(&phi, &mut next, &mut scratch)?;
//!     std::mem::swap(&mut phi, &mut next);
//! }
//! # Ok::<(), dendrite_sim::error::PhaseFieldError>(())
//! ```

pub mod config;
pub mod error;
pub mod formula;
pub mod grid;
pub mod initial_states;
pub mod io;
pub mod logging;
pub mod params;
pub mod scalar_field;
pub mod solver;
pub mod stencil;
pub mod visualisation;
pub mod vtk;

pub use error::{PhaseFieldError, Result};
pub use scalar_field::ScalarField2D;
pub use solver::PhaseField2D;
