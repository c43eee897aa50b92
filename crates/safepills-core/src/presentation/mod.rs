//! Result presentation: pure mappings from verdicts to localized view models.

mod interaction;
mod score;

pub use interaction::*;
pub use score::*;
