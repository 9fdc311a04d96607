// src/params.rs
//
// Physical inputs of the pure-material phase-field model and the numerical
// constants derived from them.
//
// Derivation chain (run by `setup`, in this order):
//   T    = Tm + u L / cp
//   W0   = lambda d0 / a1,            a1 = 5 sqrt(2) / 8
//   tau0 = lambda^2 d0 beta0 / a1^2
//   dx   = 0.8 W0
//   dt   = 0.004 tau0
//
// Only the inputs are serialised; derived values are always recomputed.

use std::f64::consts::SQRT_2;
use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PhaseFieldError, Result};

/// Coupling constant a1 of the thin-interface asymptotics.
pub const A1: f64 = 5.0 * SQRT_2 / 8.0;
/// Boltzmann constant (J/K).
pub const KB: f64 = 1.380649e-23;

/// Values computed by [`SimulationParameters::setup`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedParams {
    /// Temperature (K).
    pub t: f64,
    /// Interface width (m).
    pub w0: f64,
    /// Relaxation time (s).
    pub tau0: f64,
    /// Grid spacing (m).
    pub dx: f64,
    /// Time step (s).
    pub dt: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Melting temperature (K).
    #[serde(rename = "Tm")]
    pub tm: f64,
    /// Latent heat (J/m^3).
    #[serde(rename = "L")]
    pub l: f64,
    /// Heat capacity (J/(m^3 K)).
    pub cp: f64,
    /// Capillary length (m).
    pub d0: f64,
    /// Interface energy (J/m^2). Informational, not used by the update.
    pub gamma0: f64,
    /// Kinetic coefficient (s/m).
    pub beta0: f64,
    pub epsilon_c: f64,
    pub epsilon_k: f64,
    /// Dimensionless undercooling.
    pub u: f64,
    /// Coupling constant.
    pub lambda: f64,

    #[serde(skip)]
    derived: Option<DerivedParams>,
}

fn require(name: &'static str, value: f64) -> Result<f64> {
    if value == 0.0 || !value.is_finite() {
        return Err(PhaseFieldError::UnsetParameter(name));
    }
    Ok(value)
}

impl SimulationParameters {
    /// Pure nickel. `u` and `lambda` are left unset.
    pub fn pure_ni() -> Self {
        Self {
            tm: 1726.0,
            l: 2.311e9,
            cp: 5.313e6,
            d0: 5.56e-10,
            gamma0: 0.326,
            beta0: 5.084e-3,
            epsilon_c: 0.018,
            epsilon_k: 0.13,
            ..Self::default()
        }
    }

    /// Set the user inputs. Invalidates any previous `setup`.
    pub fn with_inputs(mut self, u: f64, lambda: f64) -> Self {
        self.u = u;
        self.lambda = lambda;
        self.derived = None;
        self
    }

    // -------------------------
    // Derivations
    // -------------------------

    pub fn calc_t(&self) -> Result<f64> {
        let u = require("u", self.u)?;
        let l = require("L", self.l)?;
        let cp = require("cp", self.cp)?;
        Ok(self.tm + u * l / cp)
    }

    /// Conventional undercooling (Tm - T) / (L / cp) at temperature `t`.
    ///
    /// Positive below the melting point, so it is the negative of the `u`
    /// that `calc_t` consumes: `calc_u(calc_t()?)? == -u`.
    pub fn calc_u(&self, t: f64) -> Result<f64> {
        let t = require("T", t)?;
        let l = require("L", self.l)?;
        let cp = require("cp", self.cp)?;
        Ok((self.tm - t) / (l / cp))
    }

    pub fn calc_w0(&self) -> Result<f64> {
        let lambda = require("lambda", self.lambda)?;
        let d0 = require("d0", self.d0)?;
        Ok(lambda * d0 / A1)
    }

    pub fn calc_tau0(&self) -> Result<f64> {
        let lambda = require("lambda", self.lambda)?;
        let d0 = require("d0", self.d0)?;
        let beta0 = require("beta0", self.beta0)?;
        Ok(lambda * lambda * d0 * beta0 / (A1 * A1))
    }

    pub fn calc_dx(w0: f64) -> Result<f64> {
        Ok(0.8 * require("W0", w0)?)
    }

    pub fn calc_dt(tau0: f64) -> Result<f64> {
        Ok(0.004 * require("tau0", tau0)?)
    }

    /// Diagnostic kB Tm^2 cp / (L^2 d0^3). Not used by the update.
    pub fn fexpt(&self) -> Result<f64> {
        let tm = require("Tm", self.tm)?;
        let cp = require("cp", self.cp)?;
        let l = require("L", self.l)?;
        let d0 = require("d0", self.d0)?;
        Ok(KB * tm * tm * cp / (l * l) / (d0 * d0 * d0))
    }

    fn derive(&self) -> Result<DerivedParams> {
        let t = self.calc_t()?;
        let w0 = self.calc_w0()?;
        let tau0 = self.calc_tau0()?;
        let dx = Self::calc_dx(w0)?;
        let dt = Self::calc_dt(tau0)?;
        Ok(DerivedParams {
            t,
            w0,
            tau0,
            dx,
            dt,
        })
    }

    /// Run the derivation chain. Must succeed before building a solver.
    pub fn setup(&mut self) -> Result<()> {
        let d = self.derive()?;
        self.derived = Some(d);
        debug!(
            t = d.t,
            w0 = d.w0,
            tau0 = d.tau0,
            dx = d.dx,
            dt = d.dt,
            "derived simulation parameters"
        );
        Ok(())
    }

    // -------------------------
    // Derived accessors
    // -------------------------

    /// True when `setup` ran and the inputs have not changed since.
    pub fn is_set_up(&self) -> bool {
        self.derived().is_ok()
    }

    /// Values from the last `setup`.
    ///
    /// Inputs are public fields, so the cache is re-derived and compared on
    /// every call: editing `u`, `lambda`, `L`, `cp`, `d0`, `beta0` or `Tm` after
    /// `setup` yields `StaleParameters` until `setup` runs again.
    pub fn derived(&self) -> Result<&DerivedParams> {
        let cached = self
            .derived
            .as_ref()
            .ok_or(PhaseFieldError::UnsetParameter("derived parameters (call setup)"))?;
        match self.derive() {
            Ok(fresh) if fresh == *cached => Ok(cached),
            _ => Err(PhaseFieldError::StaleParameters),
        }
    }

    pub fn t(&self) -> Result<f64> {
        Ok(self.derived()?.t)
    }

    pub fn w0(&self) -> Result<f64> {
        Ok(self.derived()?.w0)
    }

    pub fn tau0(&self) -> Result<f64> {
        Ok(self.derived()?.tau0)
    }

    pub fn dx(&self) -> Result<f64> {
        Ok(self.derived()?.dx)
    }

    pub fn dt(&self) -> Result<f64> {
        Ok(self.derived()?.dt)
    }

    // -------------------------
    // JSON
    // -------------------------

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| PhaseFieldError::file(path, format!("could not read: {e}")))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

/// One aligned "title: value [unit]" line.
fn fmt_entry(f: &mut fmt::Formatter<'_>, title: &str, val: Option<f64>, unit: &str) -> fmt::Result {
    write!(f, "  {:<10}", format!("{title}:"))?;
    match val {
        Some(v) => {
            let exponent = v.abs().log10().floor();
            if exponent.abs() <= 3.0 {
                write!(f, "{:>12.3}", v)?;
            } else {
                write!(f, "{:>12.3e}", v)?;
            }
        }
        None => write!(f, "{:>12}", "(unset)")?,
    }
    if !unit.is_empty() {
        write!(f, " [{unit}]")?;
    }
    Ok(())
}

impl fmt::Display for SimulationParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.derived().ok();
        let rows: [(&str, Option<f64>, &str); 16] = [
            ("Tm", Some(self.tm), "K"),
            ("L", Some(self.l), "J/m^3"),
            ("cp", Some(self.cp), "J/(m^3K)"),
            ("d0", Some(self.d0), "m"),
            ("gamma0", Some(self.gamma0), "J/m^2"),
            ("beta0", Some(self.beta0), "sec/m"),
            ("epsilon_c", Some(self.epsilon_c), ""),
            ("epsilon_k", Some(self.epsilon_k), ""),
            ("<u>", Some(self.u), ""),
            ("<lambda>", Some(self.lambda), ""),
            ("(Fexpt)", self.fexpt().ok(), ""),
            ("(T)", d.map(|d| d.t), "K"),
            ("(W0)", d.map(|d| d.w0), ""),
            ("(tau0)", d.map(|d| d.tau0), ""),
            ("(dx)", d.map(|d| d.dx), "m"),
            ("(dt)", d.map(|d| d.dt), "sec"),
        ];
        for (i, (title, val, unit)) in rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            fmt_entry(f, title, *val, unit)?;
        }
        Ok(())
    }
}
