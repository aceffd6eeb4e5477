pub mod api;
pub mod config;
pub mod core;
pub mod extract;
pub mod history;
pub mod inference;
pub mod scoring;
pub mod sources;
pub mod synth;
