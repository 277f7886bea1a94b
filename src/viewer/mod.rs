//! Desktop preview: open a table, tune the pipeline, export outputs.

pub mod app;
pub mod state;
pub mod ui;
