//! View state for the attendance list screen.
//!
//! DESIGN
//! ======
//! `ListerState` holds the same three things the screen shows: the date
//! being edited, the rows of the last successful query, and the loading /
//! error status. A load is split into `begin_load` and `finish_load` so the
//! caller can draw the loading state while the request is in flight.
//!
//! A failed load keeps the previous rows; `view` reports the error instead
//! of them until the next load.

use crate::attendance::{AttendanceError, AttendanceRow, AttendanceSource, today, validate_date};

#[derive(Debug, Clone, PartialEq)]
pub struct ListerState {
    pub current_date: String,
    pub rows: Vec<AttendanceRow>,
    pub loading: bool,
    pub error: Option<String>,
}

/// What the screen should draw for the current state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListerView<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Rows(&'a [AttendanceRow]),
}

impl Default for ListerState {
    fn default() -> Self {
        Self::new(today())
    }
}

impl ListerState {
    #[must_use]
    pub fn new(current_date: impl Into<String>) -> Self {
        Self { current_date: current_date.into(), rows: Vec::new(), loading: false, error: None }
    }

    /// Replace the date being edited. Validation happens on load.
    pub fn set_date(&mut self, date: impl Into<String>) {
        self.current_date = date.into();
    }

    /// Mark a load as started and clear any previous error.
    ///
    /// Returns the date to query, or `None` when the date is malformed; in
    /// that case the load is already finished with a validation error.
    pub fn begin_load(&mut self) -> Option<String> {
        self.loading = true;
        self.error = None;
        match validate_date(&self.current_date) {
            Ok(()) => Some(self.current_date.clone()),
            Err(e) => {
                self.finish_load(Err(e));
                None
            }
        }
    }

    /// Apply the outcome of a load and clear the loading flag.
    pub fn finish_load(&mut self, result: Result<Vec<AttendanceRow>, AttendanceError>) {
        match result {
            Ok(rows) => self.rows = rows,
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(date = %self.current_date, error = %message, "attendance load failed");
                self.error = Some(if message.is_empty() { "unknown error".to_string() } else { message });
            }
        }
        self.loading = false;
    }

    /// Validate the date and query `source` for it.
    pub async fn load(&mut self, source: &dyn AttendanceSource) {
        let Some(date) = self.begin_load() else {
            return;
        };
        let result = source.fetch_by_date(&date).await;
        self.finish_load(result);
    }

    #[must_use]
    pub fn view(&self) -> ListerView<'_> {
        if self.loading {
            ListerView::Loading
        } else if let Some(error) = &self.error {
            ListerView::Error(error)
        } else if self.rows.is_empty() {
            ListerView::Empty
        } else {
            ListerView::Rows(&self.rows)
        }
    }
}

#[cfg(test)]
#[path = "lister_test.rs"]
mod tests;
