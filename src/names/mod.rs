//! Person-name handling: cleaning, normalization, and synonym expansion.

pub mod clean;
pub mod normalize;
pub mod synonyms;

pub use clean::clean_name;
pub use normalize::normalize_for_matching;
pub use synonyms::name_to_synonyms;
