//! Locating, validating and expanding abbreviations.

pub mod expand;
pub mod locator;
pub mod location;
pub mod orchestrator;
pub mod validity;

pub use expand::expand_one;
pub use locator::{extract_abbreviation, locate_abbreviation};
pub use location::is_valid_location;
pub use orchestrator::{
    ExpansionBatch, ExpansionRequest, expand_all, prepare_wrap_range, wrap_text_for,
};
pub use validity::is_abbreviation_valid;
