#[macro_use]
extern crate tracing;

pub mod cli;
pub mod commands;
pub mod state;
pub mod tree;
pub mod utils;
