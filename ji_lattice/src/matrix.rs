// Pairwise interval matrix for a sequence of pitch classes.
//
// Row i holds `pitch[j] / pitch[i]` for every j, so the full square matrix is
// kept (i→j and j→i are both present, usually reciprocal). Intervals are not
// octave-normalized; only the pitch classes themselves are.
//
// `render_matrix` flattens the matrix row-major into `classify`, groups the
// delegates by prime limit, colours them, and produces `Cell` triples of
// (text, colour, weight). Turning those into terminal markup is `display.rs`'s
// job. Input order is preserved end to end, so the same scale always renders
// with the same colours.

use crate::classify::classify;
use crate::color::{Color, assign_colors};
use crate::config::LatticeConfig;
use crate::error::Result;
use ji_lattice_ratio::{Ratio, show_fraction};
use tracing::debug;

/// Square table of intervals between pitch classes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntervalMatrix {
    pitch_classes: Vec<Ratio>,
    rows: Vec<Vec<Ratio>>,
}

impl IntervalMatrix {
    /// Compute every `pitch_classes[j] / pitch_classes[i]`.
    pub fn new(pitch_classes: &[Ratio]) -> Result<Self> {
        let rows = pitch_classes
            .iter()
            .map(|&from| {
                pitch_classes
                    .iter()
                    .map(|&to| to.checked_div(from))
                    .collect::<std::result::Result<Vec<_>, _>>()
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            pitch_classes: pitch_classes.to_vec(),
            rows,
        })
    }

    pub fn pitch_classes(&self) -> &[Ratio] {
        &self.pitch_classes
    }

    pub fn rows(&self) -> &[Vec<Ratio>] {
        &self.rows
    }

    /// Interval from pitch `from` to pitch `to`.
    pub fn get(&self, from: usize, to: usize) -> Option<Ratio> {
        self.rows.get(from)?.get(to).copied()
    }

    /// All entries, row-major.
    pub fn flatten(&self) -> Vec<Ratio> {
        self.rows.iter().flatten().copied().collect()
    }
}

/// Text emphasis for a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weight {
    Normal,
    /// Intervals above unison.
    Bold,
    /// Unison and descending intervals.
    Dim,
}

/// One rendered cell: what to print and how to style it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub color: Color,
    pub weight: Weight,
}

impl Cell {
    fn plain(text: String) -> Self {
        Self {
            text,
            color: Color::Plain,
            weight: Weight::Normal,
        }
    }
}

/// A row label (the starting pitch) and its coloured intervals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedRow {
    pub label: Cell,
    pub cells: Vec<Cell>,
}

/// Styled cells for a whole matrix, ready for a display backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedMatrix {
    /// A blank corner cell followed by one cell per pitch class.
    pub header: Vec<Cell>,
    pub rows: Vec<RenderedRow>,
}

/// Build the coloured interval matrix for `pitch_classes`.
pub fn render_matrix(pitch_classes: &[Ratio], config: &LatticeConfig) -> Result<RenderedMatrix> {
    let matrix = IntervalMatrix::new(pitch_classes)?;
    let classes = classify(&matrix.flatten());
    let groups = classes.delegates_by_prime_limit();
    let colors = assign_colors(&classes, &groups, &config.palette);
    debug!(
        pitches = pitch_classes.len(),
        classes = classes.len(),
        groups = groups.len(),
        "rendering interval matrix"
    );

    let padding = config.padding();
    let corner = " ".repeat(padding.unwrap_or(0));
    let header = std::iter::once(Cell::plain(corner))
        .chain(
            pitch_classes
                .iter()
                .map(|&p| Cell::plain(show_fraction(p, padding))),
        )
        .collect();

    let rows = pitch_classes
        .iter()
        .zip(matrix.rows())
        .map(|(&pitch, intervals)| RenderedRow {
            label: Cell::plain(show_fraction(pitch, padding)),
            cells: intervals
                .iter()
                .map(|&interval| Cell {
                    text: show_fraction(interval, padding),
                    color: colors.color_of(interval).unwrap_or(Color::Plain),
                    weight: if interval > Ratio::UNISON {
                        Weight::Bold
                    } else {
                        Weight::Dim
                    },
                })
                .collect(),
        })
        .collect();

    Ok(RenderedMatrix { header, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::OCTAVE_GREY;

    fn r(n: i64, d: i64) -> Ratio {
        Ratio::new(n, d).unwrap()
    }

    #[test]
    fn test_unison_and_fifth_matrix() {
        let m = IntervalMatrix::new(&[r(1, 1), r(3, 2)]).unwrap();
        assert_eq!(
            m.rows(),
            &[vec![r(1, 1), r(3, 2)], vec![r(2, 3), r(1, 1)]]
        );
        assert_eq!(m.get(1, 0), Some(r(2, 3)));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn test_flatten_is_row_major() {
        let m = IntervalMatrix::new(&[r(1, 1), r(5, 4), r(3, 2)]).unwrap();
        let flat = m.flatten();
        assert_eq!(flat.len(), 9);
        assert_eq!(&flat[..3], &[r(1, 1), r(5, 4), r(3, 2)]);
        assert_eq!(&flat[3..6], &[r(4, 5), r(1, 1), r(6, 5)]);
    }

    #[test]
    fn test_intervals_are_not_normalized() {
        let m = IntervalMatrix::new(&[r(16, 9), r(9, 8)]).unwrap();
        assert_eq!(m.get(0, 1), Some(r(81, 128)));
    }

    #[test]
    fn test_render_cells_and_weights() {
        let config = LatticeConfig {
            show_padding: false,
            ..LatticeConfig::default()
        };
        let rendered = render_matrix(&[r(1, 1), r(3, 2)], &config).unwrap();

        let header: Vec<&str> = rendered.header.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(header, vec!["", "1/1", "3/2"]);
        assert!(rendered.header.iter().all(|c| c.color == Color::Plain));

        assert_eq!(rendered.rows.len(), 2);
        let first = &rendered.rows[0];
        assert_eq!(first.label.text, "1/1");
        assert_eq!(first.label.color, Color::Plain);
        assert_eq!(first.cells[0].weight, Weight::Dim);
        assert_eq!(first.cells[0].color, OCTAVE_GREY);
        assert_eq!(first.cells[1].weight, Weight::Bold);

        let second = &rendered.rows[1];
        assert_eq!(second.cells[0].text, "2/3");
        assert_eq!(second.cells[0].weight, Weight::Dim);
        // 2/3 and 3/2 are distinct classes in the 3-limit group.
        assert_ne!(second.cells[0].color, first.cells[1].color);
    }

    #[test]
    fn test_render_padding() {
        let rendered = render_matrix(&[r(1, 1), r(9, 8)], &LatticeConfig::default()).unwrap();
        assert_eq!(rendered.header[0].text, " ".repeat(12));
        assert_eq!(rendered.rows[1].cells[0].text, "         8/9");
    }

    #[test]
    fn test_render_is_deterministic() {
        let scale = LatticeConfig::default().scale;
        let a = render_matrix(&scale, &LatticeConfig::default()).unwrap();
        let b = render_matrix(&scale, &LatticeConfig::default()).unwrap();
        assert_eq!(a, b);
        assert!(a.rows.iter().flat_map(|row| &row.cells).all(|c| c.color != Color::Plain));
    }
}
