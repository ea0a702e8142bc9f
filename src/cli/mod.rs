//! CLI subcommand implementations for the tablehop binary.

pub mod doctor;
pub mod run_cmd;
