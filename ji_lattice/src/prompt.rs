// Confirmation hook for tuning steps.
//
// `TuningSystem::tune_interval_with` hands a `NeighborPreview` to a
// `ConfirmExtension` before committing a new pitch. The reviewer can be
// anything: `AcceptAll` for batch runs, a closure in tests, or `LinePrompt`
// for an interactive terminal session.
//
// `LinePrompt` owns its reader so a session can share one stdin lock for both
// the steps it reads and the y/N answers. Only an exact "y" accepts; anything
// else, including EOF and read errors, declines.

use crate::tuning::NeighborPreview;
use std::io::{BufRead, Write};
use tracing::warn;

/// Decides whether a previewed pitch should be committed.
pub trait ConfirmExtension {
    fn confirm(&mut self, preview: &NeighborPreview) -> bool;
}

/// Commits every extension without asking.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl ConfirmExtension for AcceptAll {
    fn confirm(&mut self, _preview: &NeighborPreview) -> bool {
        true
    }
}

impl<F> ConfirmExtension for F
where
    F: FnMut(&NeighborPreview) -> bool,
{
    fn confirm(&mut self, preview: &NeighborPreview) -> bool {
        self(preview)
    }
}

/// Line-oriented prompt over any reader/writer pair.
pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
    padding: Option<usize>,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(reader: R, writer: W, padding: Option<usize>) -> Self {
        Self {
            reader,
            writer,
            padding,
        }
    }

    /// Next input line without its line terminator, or `None` at EOF.
    pub fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Write a line of output, e.g. a step result.
    pub fn say(&mut self, text: &str) -> std::io::Result<()> {
        writeln!(self.writer, "{text}")?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    fn show(&mut self, preview: &NeighborPreview) -> std::io::Result<()> {
        writeln!(
            self.writer,
            "{} {} {}",
            preview.start, preview.edge, preview.candidate.pitch
        )?;
        writeln!(self.writer, "{}", preview.pitch_line(self.padding))?;
        writeln!(self.writer, "{}", preview.cents_line())?;
        write!(self.writer, "Extend scale with new pitch? ('y' to accept) ")?;
        self.writer.flush()
    }
}

impl<R: BufRead, W: Write> ConfirmExtension for LinePrompt<R, W> {
    fn confirm(&mut self, preview: &NeighborPreview) -> bool {
        if let Err(e) = self.show(preview) {
            warn!(error = %e, "failed to write confirmation prompt");
            return false;
        }
        match self.read_line() {
            Ok(Some(answer)) => answer == "y",
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "failed to read confirmation answer");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{Direction, PitchCents, TuningEdge};
    use ji_lattice_ratio::Ratio;
    use std::io::Cursor;

    fn preview() -> NeighborPreview {
        let fifth = Ratio::new(3, 2).unwrap();
        let candidate = PitchCents::new(fifth);
        NeighborPreview {
            start: Ratio::UNISON,
            edge: TuningEdge::new(fifth, Direction::Up),
            candidate,
            window: vec![PitchCents::new(Ratio::UNISON), candidate],
            candidate_index: 1,
        }
    }

    fn answer(input: &str) -> (bool, String) {
        let mut prompt = LinePrompt::new(Cursor::new(input.as_bytes()), Vec::new(), None);
        let accepted = prompt.confirm(&preview());
        let (_, out) = prompt.into_inner();
        (accepted, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_only_exact_y_accepts() {
        assert!(answer("y\n").0);
        assert!(answer("y").0);
        assert!(!answer("Y\n").0);
        assert!(!answer("yes\n").0);
        assert!(!answer(" y\n").0);
        assert!(!answer("\n").0);
    }

    #[test]
    fn test_eof_declines() {
        assert!(!answer("").0);
    }

    #[test]
    fn test_prompt_shows_neighbors_and_cents() {
        let (_, out) = answer("n\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "1/1 ---3/2---> 3/2");
        assert_eq!(lines[1], "1/1\t3/2");
        assert_eq!(lines[2], "         0¢\t       702¢");
        assert_eq!(lines[3], "Extend scale with new pitch? ('y' to accept) ");
    }

    #[test]
    fn test_read_line_strips_terminators() {
        let mut prompt = LinePrompt::new(Cursor::new("1/1 3/2\r\n5/4 3/2 down\n"), Vec::new(), None);
        assert_eq!(prompt.read_line().unwrap().as_deref(), Some("1/1 3/2"));
        assert_eq!(prompt.read_line().unwrap().as_deref(), Some("5/4 3/2 down"));
        assert_eq!(prompt.read_line().unwrap(), None);
    }

    #[test]
    fn test_closure_reviewer() {
        let mut calls = 0;
        let mut reviewer = |_: &NeighborPreview| {
            calls += 1;
            calls > 1
        };
        assert!(!reviewer.confirm(&preview()));
        assert!(reviewer.confirm(&preview()));
        assert!(AcceptAll.confirm(&preview()));
    }
}
