// src/io.rs
//
// Plain-text snapshots of a phase field.
//
// Format: one line per grid row, values separated by a single space, decimal
// notation, no header. The shape is inferred from the row and column counts.
// Values are written with Rust's shortest round-trip formatting, so a
// write/read cycle reproduces every f64 exactly.

use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{PhaseFieldError, Result};
use crate::scalar_field::ScalarField2D;

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write `field` row by row, without a trailing newline after the last row.
pub fn fmt_raw<W: Write>(w: &mut W, field: &ScalarField2D, delimiter: char) -> std::io::Result<()> {
    for r in 0..field.rows() {
        if r > 0 {
            writeln!(w)?;
        }
        for (c, v) in field.row(r).iter().enumerate() {
            if c > 0 {
                write!(w, "{delimiter}")?;
            }
            write!(w, "{v}")?;
        }
    }
    Ok(())
}

/// Snapshot file name for a step, e.g. `pf_step000100.dat`.
pub fn snapshot_file_name(step: usize) -> String {
    format!("pf_step{:06}.dat", step)
}

/// Write a snapshot. Refuses to replace an existing file unless `overwrite`.
pub fn write_snapshot(path: &Path, field: &ScalarField2D, overwrite: bool) -> Result<()> {
    if path.exists() {
        if !overwrite {
            return Err(PhaseFieldError::file(path, "already exists"));
        }
        warn!(path = %path.display(), "overwriting snapshot");
    }
    ensure_parent_dir(path)?;
    let file = File::create(path)
        .map_err(|e| PhaseFieldError::file(path, format!("could not open: {e}")))?;
    let mut w = BufWriter::new(file);
    fmt_raw(&mut w, field, ' ')?;
    writeln!(w)?;
    w.flush()?;
    debug!(path = %path.display(), shape = %field.shape(), "wrote snapshot");
    Ok(())
}

/// Parse snapshot text. Blank lines are ignored; every other line is one row.
pub fn parse_snapshot<R: BufRead>(reader: R) -> Result<ScalarField2D> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut row = Vec::with_capacity(rows.first().map_or(0, Vec::len));
        for (c, token) in line.split_ascii_whitespace().enumerate() {
            let v = token.parse::<f64>().map_err(|_| PhaseFieldError::Parse {
                line: n + 1,
                column: c + 1,
                token: token.to_string(),
            })?;
            row.push(v);
        }
        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(PhaseFieldError::Ragged {
                    line: n + 1,
                    expected: first.len(),
                    got: row.len(),
                });
            }
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(PhaseFieldError::Empty);
    }
    ScalarField2D::from_rows(rows)
}

/// Read a snapshot written by [`write_snapshot`].
pub fn read_snapshot(path: &Path) -> Result<ScalarField2D> {
    if !path.exists() {
        return Err(PhaseFieldError::file(path, "does not exist"));
    }
    if !path.is_file() {
        return Err(PhaseFieldError::file(path, "is not a regular file"));
    }
    let file = File::open(path)
        .map_err(|e| PhaseFieldError::file(path, format!("could not open: {e}")))?;
    let field = parse_snapshot(BufReader::new(file))?;
    debug!(path = %path.display(), shape = %field.shape(), "read snapshot");
    Ok(field)
}

/// Writes `pf_stepNNNNNN.dat` into `dir` every `every` steps.
pub struct SnapshotSeries {
    pub dir: PathBuf,
    pub every: usize,
    written: usize,
}

impl SnapshotSeries {
    pub fn new(dir: PathBuf, every: usize) -> Result<Self> {
        create_dir_all(&dir)?;
        Ok(Self {
            dir,
            every: every.max(1),
            written: 0,
        })
    }

    pub fn is_due(&self, step: usize) -> bool {
        step % self.every == 0
    }

    pub fn path_for(&self, step: usize) -> PathBuf {
        self.dir.join(snapshot_file_name(step))
    }

    /// Write the snapshot for `step` if one is due. Existing files are replaced.
    pub fn maybe_write(&mut self, step: usize, field: &ScalarField2D) -> Result<Option<PathBuf>> {
        if !self.is_due(step) {
            return Ok(None);
        }
        let path = self.path_for(step);
        write_snapshot(&path, field, true)?;
        self.written += 1;
        Ok(Some(path))
    }

    /// Write the snapshot for the last step whether or not it falls on the stride.
    pub fn write_final(&mut self, step: usize, field: &ScalarField2D) -> Result<PathBuf> {
        let path = self.path_for(step);
        write_snapshot(&path, field, true)?;
        self.written += 1;
        Ok(path)
    }

    /// Number of snapshots written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}
