//! Interactive terminal screen.
//!
//! Draws the lister view to any `Write` and reads commands from any
//! `BufRead`, so the whole session can be scripted in tests.

use std::io::{self, BufRead, Write};

use crate::attendance::{AttendanceRow, AttendanceSource};
use crate::lister::{ListerState, ListerView};

const MIN_NAME_WIDTH: usize = 20;

/// One line of user input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Re-run the query for the current date.
    Refresh,
    /// Switch to a new date and query it.
    SetDate(String),
    Quit,
}

#[must_use]
pub fn parse_input(line: &str) -> Input {
    match line.trim() {
        "" => Input::Refresh,
        "q" | "quit" | "exit" => Input::Quit,
        other => Input::SetDate(other.to_string()),
    }
}

pub struct Screen<'a, R, W> {
    source: &'a dyn AttendanceSource,
    state: ListerState,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Screen<'a, R, W> {
    pub fn new(source: &'a dyn AttendanceSource, state: ListerState, input: R, output: W) -> Self {
        Self { source, state, input, output }
    }

    #[must_use]
    pub fn state(&self) -> &ListerState {
        &self.state
    }

    /// Load once for the initial date, then serve commands until quit or EOF.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub async fn run(mut self) -> io::Result<ListerState> {
        writeln!(self.output, "Attendance")?;
        self.refresh().await?;
        loop {
            write!(self.output, "Enter Date YYYY-MM-DD [{}]: ", self.state.current_date)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }
            match parse_input(&line) {
                Input::Quit => break,
                Input::Refresh => self.refresh().await?,
                Input::SetDate(date) => {
                    self.state.set_date(date);
                    self.refresh().await?;
                }
            }
        }
        Ok(self.state)
    }

    /// Run one load, drawing the loading state while it is in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if writing output fails.
    pub async fn refresh(&mut self) -> io::Result<()> {
        if let Some(date) = self.state.begin_load() {
            render(&self.state, &mut self.output)?;
            let result = self.source.fetch_by_date(&date).await;
            self.state.finish_load(result);
        }
        render(&self.state, &mut self.output)
    }
}

/// Draw the current view.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn render(state: &ListerState, out: &mut impl Write) -> io::Result<()> {
    match state.view() {
        ListerView::Loading => writeln!(out, "Loading..."),
        ListerView::Error(message) => writeln!(out, "Error: {message}"),
        ListerView::Empty => writeln!(out, "No records found"),
        ListerView::Rows(rows) => render_rows(rows, out),
    }
}

fn render_rows(rows: &[AttendanceRow], out: &mut impl Write) -> io::Result<()> {
    let name_width = rows
        .iter()
        .map(|row| row.std_name.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_NAME_WIDTH);
    let index_width = rows.len().to_string().len();
    for (i, row) in rows.iter().enumerate() {
        writeln!(
            out,
            "{:>index_width$}. {:<name_width$}  {}",
            i + 1,
            row.std_name,
            row.presence,
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "screen_test.rs"]
mod tests;
