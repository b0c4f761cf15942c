//! CLI subcommands

pub mod check;
pub mod demo;
