//! Observable state containers.

mod selection;

pub use selection::*;
