//! # Pipeline Module
//!
//! Orchestrates one dedup-and-rename run.
//!
//! ## Pipeline Stages
//! 1. **Validate** - Reject an empty, missing or non-directory root
//! 2. **Scan & classify** - Fingerprint every regular file, keep the first
//!    path per fingerprint, report (and optionally delete) the rest
//! 3. **Rename** - Optionally give each survivor a unique random name
//!
//! Stages run one after another on the calling thread.

mod executor;

pub use executor::{
    DuplicateRecord, Pipeline, PipelineBuilder, PipelineConfig, PipelineResult,
};
