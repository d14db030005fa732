// Console output for rendered matrices.
//
// `matrix.rs` decides what each cell says and how it should look; this module
// only turns those cells into text. `to_terminal` emits ANSI truecolor and
// bold/dim markup through `colored`; `to_plain_text` drops all styling for
// logs, pipes and tests.
//
// Layout: the header is the corner cell plus pitch classes joined by single
// spaces; each row is `label|interval interval ...`.

use crate::color::Color;
use crate::matrix::{Cell, RenderedMatrix, Weight};
use colored::{ColoredString, Colorize};

/// Apply a cell's colour and weight.
pub fn paint(cell: &Cell) -> ColoredString {
    let text = ColoredString::from(cell.text.as_str());
    let text = match cell.color {
        Color::Rgb { r, g, b } => text.truecolor(r, g, b),
        Color::Plain => text,
    };
    match cell.weight {
        Weight::Bold => text.bold(),
        Weight::Dim => text.dimmed(),
        Weight::Normal => text,
    }
}

/// Styled text, one line per matrix row, header first.
pub fn to_terminal(matrix: &RenderedMatrix) -> String {
    layout(matrix, |cell| paint(cell).to_string())
}

/// Unstyled text with the same layout as `to_terminal`.
pub fn to_plain_text(matrix: &RenderedMatrix) -> String {
    layout(matrix, |cell| cell.text.clone())
}

fn layout(matrix: &RenderedMatrix, show: impl Fn(&Cell) -> String) -> String {
    let join = |cells: &[Cell]| cells.iter().map(&show).collect::<Vec<_>>().join(" ");
    let mut lines = vec![join(&matrix.header)];
    for row in &matrix.rows {
        lines.push(format!("{}|{}", show(&row.label), join(&row.cells)));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LatticeConfig;
    use crate::matrix::render_matrix;
    use ji_lattice_ratio::Ratio;

    fn scale() -> Vec<Ratio> {
        vec![Ratio::UNISON, Ratio::new(3, 2).unwrap()]
    }

    #[test]
    fn test_plain_text_layout() {
        let config = LatticeConfig {
            show_padding: false,
            ..LatticeConfig::default()
        };
        let rendered = render_matrix(&scale(), &config).unwrap();
        assert_eq!(to_plain_text(&rendered), " 1/1 3/2\n1/1|1/1 3/2\n3/2|2/3 1/1");
    }

    #[test]
    fn test_padded_columns_line_up() {
        let rendered = render_matrix(&scale(), &LatticeConfig::default()).unwrap();
        let text = to_plain_text(&rendered);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.chars().count() == 12 * 3 + 2));
    }

    #[test]
    fn test_terminal_output_carries_markup() {
        colored::control::set_override(true);
        let rendered = render_matrix(&scale(), &LatticeConfig::default()).unwrap();
        let styled = to_terminal(&rendered);
        assert!(styled.contains("\u{1b}["));
        assert!(styled.contains("3/2"));
        assert_eq!(styled.lines().count(), 3);
    }
}
