// src/initial_states.rs
//
// Initial phase fields (seed generators).
//
// Coordinate system:
// - Cell (row, col) sits at (x, y) = (col, row) in grid units.
// - A corner nucleus is centred on cell (0, 0): the grid then holds one quadrant
//   of a four-fold symmetric crystal (see `vtk::mirror_four_fold`).

use crate::error::{PhaseFieldError, Result};
use crate::formula::{LIQUID, SOLID};
use crate::scalar_field::ScalarField2D;

/// Set cells within `radius` of `center` (row, col) to solid, all others to liquid.
///
/// Distances are measured between cell indices; the boundary circle is inclusive.
pub fn seed_circular_nucleus(field: &mut ScalarField2D, center: (f64, f64), radius: f64) {
    let (cy, cx) = center;
    let r_sq = radius * radius;
    let cols = field.cols();
    for (i, v) in field.as_mut_slice().iter_mut().enumerate() {
        let dy = (i / cols) as f64 - cy;
        let dx = (i % cols) as f64 - cx;
        *v = if dx * dx + dy * dy <= r_sq { SOLID } else { LIQUID };
    }
}

/// Solid quarter-disc of `radius` cells centred on cell (0, 0).
///
/// Fails if the grid is not larger than `radius` in both directions.
pub fn set_nucleus_at_corner(field: &mut ScalarField2D, radius: usize) -> Result<()> {
    if field.rows() <= radius || field.cols() <= radius {
        return Err(PhaseFieldError::InvalidArgument(format!(
            "nucleus radius {} does not fit in a {} grid",
            radius,
            field.shape()
        )));
    }
    seed_circular_nucleus(field, (0.0, 0.0), radius as f64);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Shape2D;

    #[test]
    fn corner_nucleus_is_a_quarter_disc() {
        let mut f = ScalarField2D::new(Shape2D::new(20, 30));
        set_nucleus_at_corner(&mut f, 10).unwrap();
        assert_eq!(f[(0, 0)], SOLID);
        assert_eq!(f[(0, 10)], SOLID);
        assert_eq!(f[(10, 0)], SOLID);
        assert_eq!(f[(6, 8)], SOLID); // 36 + 64 = 100, inclusive
        assert_eq!(f[(7, 8)], LIQUID);
        assert_eq!(f[(0, 11)], LIQUID);
        assert_eq!(f[(19, 29)], LIQUID);
        assert!(f.as_slice().iter().all(|&v| v == SOLID || v == LIQUID));
    }

    #[test]
    fn corner_nucleus_must_fit() {
        let mut f = ScalarField2D::new(Shape2D::new(10, 40));
        assert!(matches!(
            set_nucleus_at_corner(&mut f, 10),
            Err(PhaseFieldError::InvalidArgument(_))
        ));
        assert!(set_nucleus_at_corner(&mut f, 9).is_ok());
    }

    #[test]
    fn centred_nucleus_is_symmetric() {
        let mut f = ScalarField2D::new(Shape2D::new(11, 11));
        seed_circular_nucleus(&mut f, (5.0, 5.0), 3.0);
        assert_eq!(f, f.transpose());
        assert_eq!(f[(5, 5)], SOLID);
        assert_eq!(f[(5, 8)], SOLID);
        assert_eq!(f[(5, 9)], LIQUID);
    }
}
