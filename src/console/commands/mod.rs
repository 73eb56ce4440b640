mod callable;
pub mod cli;

pub use callable::*;
