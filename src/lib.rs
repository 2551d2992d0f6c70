//! Claims & climate explorer: the dataset view pipeline behind the
//! dashboard.
//!
//! ```text
//!  DatasetCache ──► Table ──► select ──► filter ──► { export, charts }
//!                               ╰──────── view::render ────────╯
//! ```
//!
//! Everything here is free of UI code; the `claims-explorer` binary draws
//! whatever [`view::render`] returns.

pub mod charts;
pub mod config;
pub mod data;
pub mod state;
pub mod view;
