//! Eligibility decision between an event's required tags and a youth's tags

use serde::{Deserialize, Serialize};

use super::tags::{Tag, TagSet};
use crate::config::EligibilityConfig;

/// Policy switches for the matcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EligibilityPolicy {
    pub volunteers_bypass_demographics: bool,
}

impl From<&EligibilityConfig> for EligibilityPolicy {
    fn from(config: &EligibilityConfig) -> Self {
        Self {
            volunteers_bypass_demographics: config.volunteers_bypass_demographics,
        }
    }
}

/// Outcome of an eligibility check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eligibility {
    /// Event carries no demographic restriction
    Unrestricted,
    /// A required tag matched one of the user's tags
    Matched { required: Tag, user: Tag },
    /// Volunteer accepted on a volunteer event, or bypassing demographics by policy
    Volunteer,
    NotVolunteer,
    NoMatchingTag,
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(
            self,
            Eligibility::Unrestricted | Eligibility::Matched { .. } | Eligibility::Volunteer
        )
    }

    pub fn summary(&self) -> String {
        match self {
            Eligibility::Unrestricted => "event has no demographic restriction".to_string(),
            Eligibility::Matched { required, user } => {
                format!("profile tag '{user}' matches required tag '{required}'")
            }
            Eligibility::Volunteer => "registered volunteer".to_string(),
            Eligibility::NotVolunteer => "event is open to registered volunteers only".to_string(),
            Eligibility::NoMatchingTag => {
                "your profile does not match the event's target demographics".to_string()
            }
        }
    }
}

/// First pair of fuzzily matching tags, if any
pub fn first_match<'a>(required: &'a TagSet, user: &'a TagSet) -> Option<(&'a Tag, &'a Tag)> {
    required
        .iter()
        .find_map(|r| user.iter().find(|u| r.fuzzy_matches(u)).map(|u| (r, u)))
}

pub fn evaluate(
    required: &TagSet,
    user: &TagSet,
    is_volunteer_event: bool,
    user_is_volunteer: bool,
    policy: EligibilityPolicy,
) -> Eligibility {
    if is_volunteer_event {
        return if user_is_volunteer {
            Eligibility::Volunteer
        } else {
            Eligibility::NotVolunteer
        };
    }

    if user_is_volunteer && policy.volunteers_bypass_demographics {
        return Eligibility::Volunteer;
    }

    if required.is_empty() {
        return Eligibility::Unrestricted;
    }

    match first_match(required, user) {
        Some((r, u)) => Eligibility::Matched {
            required: r.clone(),
            user: u.clone(),
        },
        None => Eligibility::NoMatchingTag,
    }
}

pub fn is_eligible(
    required: &TagSet,
    user: &TagSet,
    is_volunteer_event: bool,
    user_is_volunteer: bool,
    policy: EligibilityPolicy,
) -> bool {
    evaluate(required, user, is_volunteer_event, user_is_volunteer, policy).is_eligible()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::tags::AgeBand;
    use proptest::prelude::*;

    fn tags(labels: &[&str]) -> TagSet {
        TagSet::from_labels(labels)
    }

    const STRICT: EligibilityPolicy = EligibilityPolicy {
        volunteers_bypass_demographics: false,
    };

    #[test]
    fn matching_age_band_is_eligible() {
        let required = tags(&["Core Youth(18-24 yrs old)"]);
        let user = tags(&["core youth(18-24 yrs old)", "male"]);
        let outcome = evaluate(&required, &user, false, false, STRICT);
        assert_eq!(
            outcome,
            Eligibility::Matched {
                required: Tag::Age(AgeBand::CoreYouth),
                user: Tag::Age(AgeBand::CoreYouth),
            }
        );
    }

    #[test]
    fn legacy_required_spelling_still_matches() {
        let required = tags(&["child youth (15-17)"]);
        let user = tags(&["child youth(15-17 yrs old)"]);
        assert!(is_eligible(&required, &user, false, false, STRICT));
    }

    #[test]
    fn missing_flag_is_not_eligible() {
        let required = tags(&["PWD"]);
        let user = tags(&["core youth(18-24 yrs old)", "male"]);
        assert_eq!(evaluate(&required, &user, false, false, STRICT), Eligibility::NoMatchingTag);
    }

    #[test]
    fn partial_labels_match_in_both_directions() {
        let user = tags(&["college grad"]);
        assert!(is_eligible(&tags(&["college"]), &user, false, false, STRICT));
        assert!(is_eligible(&tags(&["college grad students"]), &user, false, false, STRICT));
    }

    #[test]
    fn volunteer_event_requires_volunteer_account() {
        let user = tags(&["pwd"]);
        assert_eq!(evaluate(&tags(&["pwd"]), &user, true, false, STRICT), Eligibility::NotVolunteer);
        assert_eq!(evaluate(&TagSet::new(), &user, true, true, STRICT), Eligibility::Volunteer);
    }

    #[test]
    fn volunteer_bypass_is_a_policy_choice() {
        let required = tags(&["athlete"]);
        let user = tags(&["female"]);
        assert!(!is_eligible(&required, &user, false, true, STRICT));

        let lenient = EligibilityPolicy {
            volunteers_bypass_demographics: true,
        };
        assert!(is_eligible(&required, &user, false, true, lenient));
    }

    #[test]
    fn empty_user_tags_never_match_restricted_events() {
        assert!(!is_eligible(&tags(&["student"]), &TagSet::new(), false, false, STRICT));
    }

    proptest! {
        #[test]
        fn unrestricted_events_accept_any_profile(labels in prop::collection::vec("[a-z ]{1,20}", 1..6)) {
            let user = TagSet::from_labels(&labels);
            prop_assert!(is_eligible(&TagSet::new(), &user, false, false, STRICT));
        }

        #[test]
        fn identical_tag_sets_always_match(labels in prop::collection::vec("[a-z]{1,12}", 1..6)) {
            let set = TagSet::from_labels(&labels);
            prop_assert!(is_eligible(&set, &set, false, false, STRICT));
        }
    }
}
