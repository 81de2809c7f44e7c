//! Port traits for the collaborators around the pipeline.

pub mod config_port;
pub mod data_port;
pub mod report_port;
