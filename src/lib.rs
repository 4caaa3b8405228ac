//! Marine pollution incident data: loading, cleaning, filtering, summaries
//! and export. The egui dashboard in `main.rs` is built on top of this.

pub mod config;
pub mod data;
pub mod report;
