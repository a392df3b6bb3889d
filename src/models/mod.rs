pub mod utterance;
pub mod verdict;

pub use utterance::*;
pub use verdict::*;
