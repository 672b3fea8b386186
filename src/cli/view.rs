use std::io::Write;

use ansi_term::Style;
use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::{tick::Surface, timer::TimerRecord, utils::time::format_birthday};

const TITLE: &str = "Time Remaining";
const LABEL_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStyle {
    /// Appends the block once per render. Used for one-shot output and non-terminal writers.
    Plain,
    /// Bold countdown, redrawn in place on every tick.
    Terminal,
}

/// Main countdown screen: title, countdown, birthday and expected age.
pub struct CountdownView<W> {
    record: TimerRecord,
    out: W,
    style: ViewStyle,
    drawn_lines: usize,
}

impl<W: Write> CountdownView<W> {
    pub fn new(record: TimerRecord, out: W, style: ViewStyle) -> Self {
        Self {
            record,
            out,
            style,
            drawn_lines: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// The unstyled text of the screen at `now`.
    pub fn lines(&self, now: DateTime<Utc>) -> Vec<String> {
        vec![
            TITLE.to_string(),
            self.record.breakdown_at(now).to_string(),
            format!("{:<LABEL_WIDTH$}{}", "Birthday", "Expected Age"),
            format!(
                "{:<LABEL_WIDTH$}{} years",
                format_birthday(self.record.birthday()),
                self.record.expected_lifespan_years()
            ),
        ]
    }
}

impl<W: Write> Surface for CountdownView<W> {
    fn render(&mut self, now: DateTime<Utc>) -> Result<()> {
        let lines = self.lines(now);
        match self.style {
            ViewStyle::Plain => {
                for line in &lines {
                    writeln!(self.out, "{line}")?;
                }
            }
            ViewStyle::Terminal => {
                if self.drawn_lines > 0 {
                    // Cursor up over the previous block, then clear to the end of the screen.
                    write!(self.out, "\x1b[{}A\x1b[J", self.drawn_lines)?;
                }
                let dimmed = Style::new().dimmed();
                let bold = Style::new().bold();
                writeln!(self.out, "{}", dimmed.paint(lines[0].as_str()))?;
                writeln!(self.out, "{}", bold.paint(lines[1].as_str()))?;
                writeln!(self.out, "{}", dimmed.paint(lines[2].as_str()))?;
                writeln!(self.out, "{}", lines[3])?;
            }
        }
        self.drawn_lines = lines.len();
        self.out.flush()?;
        Ok(())
    }
}
