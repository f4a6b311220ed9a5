//! Form editor seam: typed edits, step navigation and completeness scoring.
//!
//! The editor only ever produces new `ResumeData` values; it is fed through
//! `ResumeStore::set_data`, never mutating the live aggregate directly.

pub mod completeness;
pub mod edits;
pub mod steps;

pub use completeness::{compute_completeness_report, CompletenessReport};
pub use edits::Edit;
pub use steps::{all_steps_complete, Step};
