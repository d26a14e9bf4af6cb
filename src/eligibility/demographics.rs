//! Demographic tag extraction from youth profiles

use chrono::NaiveDate;

use super::tags::{AgeBand, Tag, TagSet};
use crate::models::Profile;
use crate::utils::helpers::{age_on, is_yes, non_blank};

const NOT_STUDYING: &str = "not studying";

/// Derive the canonical tag set for a profile as of `today`.
///
/// Missing or blank fields contribute nothing.
pub fn extract_demographics(profile: &Profile, today: NaiveDate) -> TagSet {
    let mut tags = TagSet::new();

    if let Some(band) = profile
        .birthdate
        .and_then(|birthdate| age_on(birthdate, today))
        .and_then(AgeBand::for_age)
    {
        tags.insert(Tag::Age(band));
    }

    tags.extend(profile.gender.as_deref().and_then(Tag::gender));
    tags.extend(profile.educational_background.as_deref().and_then(Tag::education));
    tags.extend(profile.work_status.as_deref().and_then(Tag::employment));
    tags.extend(profile.civil_status.as_deref().and_then(Tag::civil_status));

    match non_blank(profile.studying_level.as_deref()) {
        Some(level) if !level.eq_ignore_ascii_case(NOT_STUDYING) => {
            tags.insert(Tag::Student);
        }
        _ if non_blank(profile.school_name.as_deref()).is_none() => {
            tags.insert(Tag::OutOfSchoolYouth);
        }
        _ => {}
    }

    let flags = [
        (&profile.pwd, Tag::Pwd),
        (&profile.athlete, Tag::Athlete),
        (&profile.sk_voter, Tag::SkVoter),
        (&profile.national_voter, Tag::NationalVoter),
        (&profile.lgbtqia_member, Tag::Lgbtqia),
    ];
    for (value, tag) in flags {
        if is_yes(value.as_deref()) {
            tags.insert(tag);
        }
    }

    tags
}
