// src/visualisation.rs
//
// Terminal and PNG views of a phase field.
//
// Colour code (terminal):
//   red    solid         phi >=  0.8
//   yellow interface     0 <= phi < 0.8
//   green  interface  -0.8 < phi < 0
//   cyan   liquid        phi <= -0.8
//
// Rows are printed from the last to the first so that +y points up.

use std::io::{self, Write};
use std::path::Path;

use plotters::prelude::*;

use crate::error::{PhaseFieldError, Result};
use crate::formula::{LIQUID, SOLID};
use crate::scalar_field::ScalarField2D;

pub mod color {
    pub const RST: &str = "\x1B[0m";
    pub const RED: &str = "\x1B[31m";
    pub const GRN: &str = "\x1B[32m";
    pub const YEL: &str = "\x1B[33m";
    pub const CYN: &str = "\x1B[36m";
}

const THRESHOLD: f64 = 0.8;
const SQUARE_CELLS: usize = 32;

/// ANSI colour for one phase value.
pub fn color_prefix(val: f64) -> &'static str {
    if val >= SOLID * THRESHOLD {
        color::RED
    } else if val <= LIQUID * THRESHOLD {
        color::CYN
    } else if val >= 0.0 {
        color::YEL
    } else {
        color::GRN
    }
}

/// Every cell as coloured scientific text.
pub fn fmt_visual<W: Write>(w: &mut W, field: &ScalarField2D) -> io::Result<()> {
    for r in (0..field.rows()).rev() {
        for v in field.row(r) {
            write!(w, "{}{:>9.1e}{}", color_prefix(*v), v, color::RST)?;
        }
        if r > 0 {
            writeln!(w)?;
        }
    }
    Ok(())
}

/// Down-sampled view, at most 32x32 coloured blocks.
pub fn fmt_visual_square<W: Write>(w: &mut W, field: &ScalarField2D) -> io::Result<()> {
    let dsp_y = field.rows().min(SQUARE_CELLS);
    let dsp_x = field.cols().min(SQUARE_CELLS);
    if dsp_y == 0 || dsp_x == 0 {
        return Ok(());
    }
    let sp_y = field.rows() / dsp_y;
    let sp_x = field.cols() / dsp_x;
    for y in (0..dsp_y).rev() {
        let row = field.row(y * sp_y);
        for x in 0..dsp_x {
            write!(w, "{}{:>4}{}", color_prefix(row[x * sp_x]), "■", color::RST)?;
        }
        if y > 0 {
            writeln!(w)?;
        }
    }
    Ok(())
}

/// `fmt_visual_square` into a `String`.
pub fn render_visual_square(field: &ScalarField2D) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = fmt_visual_square(&mut buf, field);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Map phi in [-1, 1] to blue (liquid) – white – red (solid).
fn phase_to_color(phi: f64) -> RGBColor {
    let x = if phi.is_finite() {
        ((phi - LIQUID) / (SOLID - LIQUID)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let r = (255.0 * (2.0 * x).min(1.0)) as u8;
    let b = (255.0 * (2.0 * (1.0 - x)).min(1.0)) as u8;
    let g = (255.0 * (1.0 - (2.0 * (x - 0.5).abs()))).clamp(0.0, 255.0) as u8;
    RGBColor(r, g, b)
}

/// Save phi as a PNG heatmap, one rectangle per cell, row 0 at the bottom.
pub fn save_phase_plot(field: &ScalarField2D, path: &Path) -> Result<()> {
    let plot_err = |e: &dyn std::fmt::Display| PhaseFieldError::Plot(e.to_string());
    let nx = field.cols() as i32;
    let ny = field.rows() as i32;
    if nx == 0 || ny == 0 {
        return Err(PhaseFieldError::InvalidArgument(
            "cannot plot an empty field".to_string(),
        ));
    }

    let px = (800 / nx.max(ny)).max(1) as u32;
    let size = (nx as u32 * px, ny as u32 * px);
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| plot_err(&e))?;

    let mut chart = ChartBuilder::on(&root)
        .build_cartesian_2d(0..nx, 0..ny)
        .map_err(|e| plot_err(&e))?;

    chart
        .draw_series((0..ny).flat_map(|j| {
            (0..nx).map(move |i| {
                let phi = field[(j as usize, i as usize)];
                Rectangle::new([(i, j), (i + 1, j + 1)], phase_to_color(phi).filled())
            })
        }))
        .map_err(|e| plot_err(&e))?;

    root.present().map_err(|e| plot_err(&e))?;
    Ok(())
}
