// src/config.rs
//
// Run provenance written next to the outputs of a simulation (config.json).

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::grid::Shape2D;
use crate::params::SimulationParameters;
use crate::stencil::Boundary;

#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    pub geometry: GeometryConfig,
    pub material: SimulationParameters,
    pub numerics: NumericsConfig,
    pub run: RunInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeometryConfig {
    pub shape: Shape2D,
    /// Grid spacing (m).
    pub dx: f64,
    /// Radius of the corner nucleus in cells.
    pub nucleus_radius: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NumericsConfig {
    pub integrator: String,
    /// Fixed time step (s).
    pub dt: f64,
    pub steps: usize,
    pub output_stride: usize,
    pub boundary: Boundary,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunInfo {
    pub binary: String,
    pub version: String,
}

impl RunConfig {
    pub fn write_to_dir(&self, out_dir: &Path) -> Result<()> {
        let path = out_dir.join("config.json");
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_serialises_inputs_and_numerics() {
        let mut params = SimulationParameters::pure_ni().with_inputs(-0.2, 16.0);
        params.setup().unwrap();
        let cfg = RunConfig {
            geometry: GeometryConfig {
                shape: Shape2D::new(80, 80),
                dx: params.dx().unwrap(),
                nucleus_radius: 10,
            },
            material: params.clone(),
            numerics: NumericsConfig {
                integrator: "euler".to_string(),
                dt: params.dt().unwrap(),
                steps: 5000,
                output_stride: 100,
                boundary: Boundary::Replicate,
            },
            run: RunInfo {
                binary: "phase_field_2d".to_string(),
                version: "test".to_string(),
            },
        };
        let v = serde_json::to_value(&cfg).unwrap();
        assert_eq!(v["geometry"]["shape"]["rows"], 80);
        assert_eq!(v["material"]["lambda"], 16.0);
        assert_eq!(v["numerics"]["boundary"], "replicate");
        assert_eq!(v["numerics"]["output_stride"], 100);
    }
}
