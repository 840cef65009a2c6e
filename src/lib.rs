//! Core library for the timetable-tools command line application.
//!
//! The library converts an institution's hourly timetable export into an
//! ERP-ready weekly schedule and a session-block workbook for the
//! scheduling template. The modules are structured to keep
//! responsibilities narrow and composable: IO adapters live under [`io`],
//! row and configuration types inside [`model`], lecturer and cohort
//! resolution in [`lecturer`] and [`cohort`], session aggregation in
//! [`session`], output shaping in [`output`], and the run orchestration
//! under [`sync`].

pub mod cohort;
pub mod error;
pub mod io;
pub mod lecturer;
pub mod model;
pub mod output;
pub mod session;
pub mod sync;
pub mod text;

pub use error::{Result, ToolError};
