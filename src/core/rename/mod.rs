//! # Rename Module
//!
//! Gives every surviving file a random numeric name.
//!
//! New names have the form `{parent}/{identifier}{.extension}` where the
//! identifier is a ten-digit number drawn uniformly from
//! `[1_000_000_000, 9_999_999_999]`. No identifier is used twice within a
//! run, and the generator is seeded from OS entropy so separate runs draw
//! different sequences.

mod executor;
mod generator;

pub use executor::{RenameExecutor, RenameResult, RenamedFile};
pub use generator::{
    target_path, RenameConfig, UniqueNameGenerator, ID_RANGE_HIGH, ID_RANGE_LOW,
    MAX_NAME_ATTEMPTS,
};
