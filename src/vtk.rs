// src/vtk.rs
//
// Export to VTK XML ImageData (.vti) for ParaView & co.
//
// The simulated field is one quadrant of a four-fold symmetric crystal seeded at
// cell (0, 0). `mirror_four_fold` rebuilds the full crystal by reflecting that
// quadrant about both axes; `write_vti` stores any field as point data with
// origin 0 and unit spacing (x fastest, then y).

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::grid::Shape2D;
use crate::scalar_field::ScalarField2D;

/// Mirror a corner-seeded quadrant into a (2 rows) x (2 cols) field.
pub fn mirror_four_fold(field: &ScalarField2D) -> ScalarField2D {
    let (ny, nx) = (field.rows(), field.cols());
    let mut out = ScalarField2D::new(Shape2D::new(2 * ny, 2 * nx));
    for y in 0..ny {
        for x in 0..nx {
            let v = field[(y, x)];
            out[(ny + y, nx + x)] = v;
            out[(ny + y, nx - 1 - x)] = v;
            out[(ny - 1 - y, nx - 1 - x)] = v;
            out[(ny - 1 - y, nx + x)] = v;
        }
    }
    out
}

/// Serialise `field` as an ASCII VTK ImageData document with one `phi` array.
pub fn fmt_vti<W: Write>(w: &mut W, field: &ScalarField2D) -> std::io::Result<()> {
    let x_end = field.cols().saturating_sub(1);
    let y_end = field.rows().saturating_sub(1);

    writeln!(w, r#"<?xml version="1.0"?>"#)?;
    writeln!(
        w,
        r#"<VTKFile type="ImageData" version="0.1" byte_order="LittleEndian">"#
    )?;
    writeln!(
        w,
        r#"  <ImageData WholeExtent="0 {x_end} 0 {y_end} 0 0" Origin="0 0 0" Spacing="1 1 1">"#
    )?;
    writeln!(w, r#"    <Piece Extent="0 {x_end} 0 {y_end} 0 0">"#)?;
    writeln!(w, r#"      <PointData Scalars="phi">"#)?;
    writeln!(
        w,
        r#"        <DataArray type="Float64" Name="phi" NumberOfComponents="1" format="ascii">"#
    )?;
    for r in 0..field.rows() {
        write!(w, "         ")?;
        for v in field.row(r) {
            write!(w, " {v}")?;
        }
        writeln!(w)?;
    }
    writeln!(w, "        </DataArray>")?;
    writeln!(w, "      </PointData>")?;
    writeln!(w, "      <CellData>")?;
    writeln!(w, "      </CellData>")?;
    writeln!(w, "    </Piece>")?;
    writeln!(w, "  </ImageData>")?;
    writeln!(w, "</VTKFile>")?;
    Ok(())
}

/// Write `field` to `path` as a `.vti` file, creating parent directories.
pub fn write_vti(path: &Path, field: &ScalarField2D) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    let mut w = BufWriter::new(File::create(path)?);
    fmt_vti(&mut w, field)?;
    w.flush()?;
    debug!(path = %path.display(), shape = %field.shape(), "wrote vti");
    Ok(())
}
