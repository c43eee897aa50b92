//! Domain models for the SafePills system.

mod drug;
mod evaluation;
mod flow;
mod interaction;
mod search;

pub use drug::*;
pub use evaluation::*;
pub use flow::*;
pub use interaction::*;
pub use search::*;
