mod suggest;
mod walker;

#[cfg(test)]
mod tests;

pub use suggest::{CaseFoldMatcher, EditDistanceMatcher, KeyMatcher};
pub use walker::{Validator, validate, validate_without_source};
