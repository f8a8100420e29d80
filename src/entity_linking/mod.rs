//! Entity Linking
//!
//! Grounds NER detections to vocabulary concepts:
//! - [`slot`]: NER payload parsing, parenthetical cleanup, sub-term splitting
//! - [`category`]: label -> admissible vocabulary categories
//! - [`matcher`]: per-request memoized lookup and first-qualifying-match selection
//! - [`result`]: the linked concept returned to callers

pub mod category;
pub mod matcher;
pub mod result;
pub mod slot;

pub use category::{CategoryResolver, CategorySet, CANCER_LABEL, GENDER_LABEL};
pub use matcher::{EntityLinker, MatchParams};
pub use result::LinkResult;
pub use slot::{extract_slots, strip_parentheticals, Slot};
