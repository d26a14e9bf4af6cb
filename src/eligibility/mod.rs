//! Demographic eligibility engine
//!
//! One shared implementation of tag extraction, matching and the profile
//! query builder, used by publication, registration and invitation responses.

pub mod demographics;
pub mod matcher;
pub mod query;
pub mod tags;

pub use demographics::extract_demographics;
pub use matcher::{evaluate, is_eligible, Eligibility, EligibilityPolicy};
pub use query::{build_query, MatchCriteria, ProfileFilters, Selection};
pub use tags::{AgeBand, Tag, TagSet};
