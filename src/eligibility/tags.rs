//! Canonical demographic tag vocabulary
//!
//! Every tag has exactly one lowercase label. Known categories get typed
//! variants so matching and query building can be exhaustive; anything else
//! is carried as a free-form tag. Older label spellings are migrated to the
//! canonical ones when parsed.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::helpers::normalize_label;

/// Youth age brackets, in completed years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    ChildYouth,
    CoreYouth,
    YoungAdult,
}

impl AgeBand {
    pub const ALL: [AgeBand; 3] = [AgeBand::ChildYouth, AgeBand::CoreYouth, AgeBand::YoungAdult];

    pub fn label(self) -> &'static str {
        match self {
            AgeBand::ChildYouth => "child youth(15-17 yrs old)",
            AgeBand::CoreYouth => "core youth(18-24 yrs old)",
            AgeBand::YoungAdult => "young adult(25-30 yrs old)",
        }
    }

    /// Inclusive age range covered by the band
    pub fn range(self) -> (u32, u32) {
        match self {
            AgeBand::ChildYouth => (15, 17),
            AgeBand::CoreYouth => (18, 24),
            AgeBand::YoungAdult => (25, 30),
        }
    }

    pub fn for_age(age: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|band| {
            let (low, high) = band.range();
            (low..=high).contains(&age)
        })
    }

    fn from_normalized(label: &str) -> Option<Self> {
        // Covers both "child youth(15-17 yrs old)" and "child youth (15-17)".
        if label.starts_with("child youth") {
            Some(AgeBand::ChildYouth)
        } else if label.starts_with("core youth") {
            Some(AgeBand::CoreYouth)
        } else if label.starts_with("young adult") {
            Some(AgeBand::YoungAdult)
        } else {
            None
        }
    }
}

pub const GENDER_VALUES: &[&str] = &["male", "female"];

pub const EDUCATION_VALUES: &[&str] = &[
    "elementary level",
    "elementary grad",
    "high school level",
    "high school grad",
    "vocational grad",
    "college level",
    "college grad",
    "masters level",
    "masters grad",
    "doctorate level",
    "doctorate graduate",
];

pub const EMPLOYMENT_VALUES: &[&str] = &[
    "employed",
    "unemployed",
    "self-employed",
    "currently looking for a job",
    "not interested looking for a job",
];

pub const CIVIL_STATUS_VALUES: &[&str] = &[
    "single",
    "married",
    "widowed",
    "divorced",
    "separated",
    "annulled",
    "live-in",
];

/// A single demographic tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Age(AgeBand),
    Student,
    OutOfSchoolYouth,
    Pwd,
    Athlete,
    SkVoter,
    NationalVoter,
    Lgbtqia,
    Gender(String),
    Education(String),
    Employment(String),
    CivilStatus(String),
    Other(String),
}

impl Tag {
    /// Parse a raw label; `None` for blank input
    pub fn parse(raw: &str) -> Option<Tag> {
        let label = normalize_label(raw);
        if label.is_empty() {
            return None;
        }

        if let Some(band) = AgeBand::from_normalized(&label) {
            return Some(Tag::Age(band));
        }

        let tag = match label.as_str() {
            "student" | "students" => Tag::Student,
            "out of school youth" | "out-of-school youth" | "osy" => Tag::OutOfSchoolYouth,
            "pwd" | "person with disability" => Tag::Pwd,
            "athlete" | "athletes" => Tag::Athlete,
            "sk voter" | "sk voters" => Tag::SkVoter,
            "national voter" | "national voters" => Tag::NationalVoter,
            "lgbtqia+" | "lgbtqia" | "lgbtqia+ member" => Tag::Lgbtqia,
            other if GENDER_VALUES.contains(&other) => Tag::Gender(other.to_string()),
            other if EDUCATION_VALUES.contains(&other) => Tag::Education(other.to_string()),
            other if EMPLOYMENT_VALUES.contains(&other) => Tag::Employment(other.to_string()),
            other if CIVIL_STATUS_VALUES.contains(&other) => Tag::CivilStatus(other.to_string()),
            other => Tag::Other(other.to_string()),
        };

        Some(tag)
    }

    /// Free-form gender tag from a raw profile value
    pub fn gender(raw: &str) -> Option<Tag> {
        free_form(raw).map(Tag::Gender)
    }

    pub fn education(raw: &str) -> Option<Tag> {
        free_form(raw).map(Tag::Education)
    }

    pub fn employment(raw: &str) -> Option<Tag> {
        free_form(raw).map(Tag::Employment)
    }

    pub fn civil_status(raw: &str) -> Option<Tag> {
        free_form(raw).map(Tag::CivilStatus)
    }

    /// Canonical lowercase label
    pub fn label(&self) -> &str {
        match self {
            Tag::Age(band) => band.label(),
            Tag::Student => "student",
            Tag::OutOfSchoolYouth => "out of school youth",
            Tag::Pwd => "pwd",
            Tag::Athlete => "athlete",
            Tag::SkVoter => "sk voter",
            Tag::NationalVoter => "national voter",
            Tag::Lgbtqia => "lgbtqia+",
            Tag::Gender(value)
            | Tag::Education(value)
            | Tag::Employment(value)
            | Tag::CivilStatus(value)
            | Tag::Other(value) => value,
        }
    }

    /// Partial, bidirectional containment of canonical labels
    pub fn fuzzy_matches(&self, other: &Tag) -> bool {
        let (a, b) = (self.label(), other.label());
        a.contains(b) || b.contains(a)
    }
}

fn free_form(raw: &str) -> Option<String> {
    let label = normalize_label(raw);
    (!label.is_empty()).then_some(label)
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Tag::parse(&raw).ok_or_else(|| serde::de::Error::custom("tag must not be blank"))
    }
}

/// Ordered set of tags, serialized as an array of canonical labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<Tag>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse labels, dropping blank entries
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels.into_iter().filter_map(|l| Tag::parse(l.as_ref())).collect()
    }

    pub fn insert(&mut self, tag: Tag) -> bool {
        self.0.insert(tag)
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.0.contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(Tag::label).collect()
    }
}

impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Blank entries in stored or submitted arrays are ignored rather than rejected.
        let raw = Vec::<String>::deserialize(deserializer)?;
        Ok(TagSet::from_labels(raw))
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        TagSet(iter.into_iter().collect())
    }
}

impl Extend<Tag> for TagSet {
    fn extend<I: IntoIterator<Item = Tag>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = std::collections::btree_set::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
