// Library root for the `mlbw` binary: CLI definitions, the schedule client,
// the daily pipeline, descriptions, and rendering.

pub mod app;
pub mod cli;
pub mod descriptions;
pub mod markdown;
pub mod pipeline;
pub mod schedule;
pub mod time_format;
