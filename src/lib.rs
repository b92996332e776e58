//! # roll-call
//!
//! Terminal attendance viewer for a hosted Supabase project. Lists the rows
//! of the `Attendance` table recorded for one date.
//!
//! The crate is split the same way the data flows: `config` and `storage`
//! feed the `supabase` client handle, `attendance` turns that handle into a
//! typed row source, and `lister` / `screen` hold and draw the view state.

pub mod attendance;
pub mod config;
pub mod lister;
pub mod screen;
pub mod storage;
pub mod supabase;
