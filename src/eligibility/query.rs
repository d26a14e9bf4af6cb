//! Profile matching query builder
//!
//! Translates tags, structured filters and a barangay scope into a SQL
//! predicate over `profiles p`. Used to materialize invitee lists at publish
//! time and to count eligible profiles without side effects.

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

use super::tags::{AgeBand, Tag, TagSet};

/// Structured demographic filters. Each group is an OR over its flags; groups are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileFilters {
    pub gender: GenderFilter,
    pub age: AgeFilter,
    pub civil_status: CivilStatusFilter,
    pub voter: VoterFilter,
    pub education: EducationFilter,
    pub employment: EmploymentFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenderFilter {
    pub male: bool,
    pub female: bool,
}

impl GenderFilter {
    fn values(&self) -> Vec<String> {
        selected(&[(self.male, &["male"]), (self.female, &["female"])])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeFilter {
    pub child_youth: bool,
    pub core_youth: bool,
    pub young_adult: bool,
}

impl AgeFilter {
    fn bands(&self) -> Vec<AgeBand> {
        [
            (self.child_youth, AgeBand::ChildYouth),
            (self.core_youth, AgeBand::CoreYouth),
            (self.young_adult, AgeBand::YoungAdult),
        ]
        .into_iter()
        .filter_map(|(on, band)| on.then_some(band))
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CivilStatusFilter {
    pub single: bool,
    pub married: bool,
    pub widowed: bool,
    pub divorced: bool,
    pub separated: bool,
    pub annulled: bool,
    pub live_in: bool,
}

impl CivilStatusFilter {
    fn values(&self) -> Vec<String> {
        selected(&[
            (self.single, &["single"]),
            (self.married, &["married"]),
            (self.widowed, &["widowed"]),
            (self.divorced, &["divorced"]),
            (self.separated, &["separated"]),
            (self.annulled, &["annulled"]),
            (self.live_in, &["live-in"]),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoterFilter {
    pub sk_voter: bool,
    pub national_voter: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationFilter {
    pub elementary: bool,
    pub high_school: bool,
    pub vocational: bool,
    pub college: bool,
    pub graduate_studies: bool,
}

impl EducationFilter {
    fn values(&self) -> Vec<String> {
        selected(&[
            (self.elementary, &["elementary level", "elementary grad"]),
            (self.high_school, &["high school level", "high school grad"]),
            (self.vocational, &["vocational grad"]),
            (self.college, &["college level", "college grad"]),
            (
                self.graduate_studies,
                &["masters level", "masters grad", "doctorate level", "doctorate graduate"],
            ),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmploymentFilter {
    pub employed: bool,
    pub self_employed: bool,
    pub unemployed: bool,
}

impl EmploymentFilter {
    fn values(&self) -> Vec<String> {
        selected(&[
            (self.employed, &["employed"]),
            (self.self_employed, &["self-employed"]),
            (
                self.unemployed,
                &[
                    "unemployed",
                    "currently looking for a job",
                    "not interested looking for a job",
                ],
            ),
        ])
    }
}

fn selected(groups: &[(bool, &[&str])]) -> Vec<String> {
    groups
        .iter()
        .filter(|(on, _)| *on)
        .flat_map(|(_, values)| values.iter().map(|v| v.to_string()))
        .collect()
}

/// What to match profiles against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchCriteria {
    pub tags: TagSet,
    pub filters: ProfileFilters,
    pub barangay: Option<String>,
    /// Match the volunteer roster instead of demographics
    pub volunteers_only: bool,
}

impl MatchCriteria {
    pub fn demographic(tags: TagSet, filters: ProfileFilters, barangay: Option<String>) -> Self {
        Self {
            tags,
            filters,
            barangay,
            volunteers_only: false,
        }
    }

    pub fn volunteer_roster(barangay: Option<String>) -> Self {
        Self {
            barangay,
            volunteers_only: true,
            ..Self::default()
        }
    }
}

/// Columns produced by the built query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Profiles,
    ProfileIds,
    Count,
}

const PROFILE_COLUMNS: &str = "p.id, p.account_id, p.barangay, p.first_name, p.middle_name, p.last_name, \
     p.gender, p.birthdate, p.civil_status, p.educational_background, p.work_status, \
     p.studying_level, p.school_name, p.pwd, p.athlete, p.sk_voter, p.national_voter, \
     p.lgbtqia_member, p.created_at, p.updated_at";

/// Build the full SELECT for the given criteria
pub fn build_query(criteria: &MatchCriteria, selection: Selection) -> QueryBuilder<'static, Postgres> {
    let columns = match selection {
        Selection::Profiles => PROFILE_COLUMNS,
        Selection::ProfileIds => "p.id",
        Selection::Count => "COUNT(*)",
    };

    let mut builder = QueryBuilder::new(format!("SELECT {columns} FROM profiles p"));
    if criteria.volunteers_only {
        builder.push(" JOIN accounts a ON a.id = p.account_id");
    }
    builder.push(" WHERE NOT EXISTS (SELECT 1 FROM profile_archives pa WHERE pa.profile_id = p.id)");
    push_conditions(&mut builder, criteria);

    if selection != Selection::Count {
        builder.push(" ORDER BY p.id");
    }
    builder
}

/// Append `AND ...` conditions for the criteria
pub fn push_conditions(builder: &mut QueryBuilder<'static, Postgres>, criteria: &MatchCriteria) {
    if let Some(barangay) = criteria.barangay.as_ref().filter(|b| !b.trim().is_empty()) {
        builder.push(" AND p.barangay = ");
        builder.push_bind(barangay.trim().to_string());
    }

    if criteria.volunteers_only {
        builder.push(" AND a.is_volunteer = 'yes'");
        return;
    }

    push_tag_group(builder, &criteria.tags);
    push_filters(builder, &criteria.filters);
}

fn push_tag_group(builder: &mut QueryBuilder<'static, Postgres>, tags: &TagSet) {
    let recognised: Vec<&Tag> = tags.iter().filter(|t| !matches!(t, Tag::Other(_))).collect();
    if recognised.is_empty() {
        return;
    }

    builder.push(" AND (");
    for (i, tag) in recognised.into_iter().enumerate() {
        if i > 0 {
            builder.push(" OR ");
        }
        push_tag_predicate(builder, tag);
    }
    builder.push(")");
}

fn push_tag_predicate(builder: &mut QueryBuilder<'static, Postgres>, tag: &Tag) {
    match tag {
        Tag::Age(band) => push_age_band(builder, *band),
        Tag::Student => {
            builder.push(
                "(COALESCE(TRIM(p.studying_level), '') <> '' \
                 AND LOWER(TRIM(p.studying_level)) <> 'not studying')",
            );
        }
        Tag::OutOfSchoolYouth => {
            builder.push(
                "((COALESCE(TRIM(p.studying_level), '') = '' \
                 OR LOWER(TRIM(p.studying_level)) = 'not studying') \
                 AND COALESCE(TRIM(p.school_name), '') = '')",
            );
        }
        Tag::Pwd => push_yes_flag(builder, "pwd"),
        Tag::Athlete => push_yes_flag(builder, "athlete"),
        Tag::SkVoter => push_yes_flag(builder, "sk_voter"),
        Tag::NationalVoter => push_yes_flag(builder, "national_voter"),
        Tag::Lgbtqia => push_yes_flag(builder, "lgbtqia_member"),
        Tag::Gender(value) => push_text_equals(builder, "gender", value),
        Tag::Education(value) => push_text_equals(builder, "educational_background", value),
        Tag::Employment(value) => push_text_equals(builder, "work_status", value),
        Tag::CivilStatus(value) => push_text_equals(builder, "civil_status", value),
        // Filtered out by the caller.
        Tag::Other(_) => {
            builder.push("TRUE");
        }
    }
}

fn push_filters(builder: &mut QueryBuilder<'static, Postgres>, filters: &ProfileFilters) {
    push_value_group(builder, "gender", filters.gender.values());
    push_value_group(builder, "civil_status", filters.civil_status.values());
    push_value_group(builder, "educational_background", filters.education.values());
    push_value_group(builder, "work_status", filters.employment.values());

    let bands = filters.age.bands();
    if !bands.is_empty() {
        builder.push(" AND (");
        for (i, band) in bands.into_iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            push_age_band(builder, band);
        }
        builder.push(")");
    }

    let voter = &filters.voter;
    match (voter.sk_voter, voter.national_voter) {
        (false, false) => {}
        (true, false) => {
            builder.push(" AND ");
            push_yes_flag(builder, "sk_voter");
        }
        (false, true) => {
            builder.push(" AND ");
            push_yes_flag(builder, "national_voter");
        }
        (true, true) => {
            builder.push(" AND (");
            push_yes_flag(builder, "sk_voter");
            builder.push(" OR ");
            push_yes_flag(builder, "national_voter");
            builder.push(")");
        }
    }
}

fn push_value_group(builder: &mut QueryBuilder<'static, Postgres>, column: &'static str, values: Vec<String>) {
    if values.is_empty() {
        return;
    }
    builder.push(format!(" AND LOWER(TRIM(p.{column})) = ANY("));
    builder.push_bind(values);
    builder.push(")");
}

fn push_age_band(builder: &mut QueryBuilder<'static, Postgres>, band: AgeBand) {
    let (low, high) = band.range();
    builder.push(format!(
        "(p.birthdate IS NOT NULL AND EXTRACT(YEAR FROM AGE(CURRENT_DATE, p.birthdate)) BETWEEN {low} AND {high})"
    ));
}

fn push_yes_flag(builder: &mut QueryBuilder<'static, Postgres>, column: &'static str) {
    builder.push(format!("LOWER(TRIM(COALESCE(p.{column}, ''))) = 'yes'"));
}

fn push_text_equals(builder: &mut QueryBuilder<'static, Postgres>, column: &'static str, value: &str) {
    builder.push(format!("LOWER(TRIM(p.{column})) = "));
    builder.push_bind(value.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql(criteria: &MatchCriteria, selection: Selection) -> String {
        build_query(criteria, selection).sql().to_string()
    }

    #[test]
    fn archived_profiles_are_always_excluded() {
        let query = sql(&MatchCriteria::default(), Selection::Count);
        assert!(query.starts_with("SELECT COUNT(*) FROM profiles p WHERE NOT EXISTS"));
        assert!(query.contains("profile_archives"));
        assert!(!query.contains("ORDER BY"));
    }

    #[test]
    fn barangay_scope_is_bound() {
        let criteria = MatchCriteria::demographic(TagSet::new(), ProfileFilters::default(), Some("Poblacion".into()));
        let query = sql(&criteria, Selection::ProfileIds);
        assert!(query.starts_with("SELECT p.id FROM profiles p"));
        assert!(query.contains("AND p.barangay = $1"));
        assert!(query.ends_with("ORDER BY p.id"));
    }

    #[test]
    fn blank_barangay_is_ignored() {
        let criteria = MatchCriteria::demographic(TagSet::new(), ProfileFilters::default(), Some("  ".into()));
        assert!(!sql(&criteria, Selection::Count).contains("barangay"));
    }

    #[test]
    fn fixed_tags_become_an_or_group() {
        let tags = TagSet::from_labels(["Student", "PWD"]);
        let criteria = MatchCriteria::demographic(tags, ProfileFilters::default(), None);
        let query = sql(&criteria, Selection::Count);
        assert!(query.contains("AND ((COALESCE(TRIM(p.studying_level), '') <> ''"));
        assert!(query.contains(" OR LOWER(TRIM(COALESCE(p.pwd, ''))) = 'yes')"));
    }

    #[test]
    fn unknown_tags_impose_no_restriction() {
        let tags = TagSet::from_labels(["basketball league"]);
        let criteria = MatchCriteria::demographic(tags, ProfileFilters::default(), None);
        assert_eq!(sql(&criteria, Selection::Count), sql(&MatchCriteria::default(), Selection::Count));
    }

    #[test]
    fn filter_groups_are_anded_with_bound_value_lists() {
        let filters = ProfileFilters {
            gender: GenderFilter { male: true, female: false },
            education: EducationFilter { college: true, ..Default::default() },
            ..Default::default()
        };
        let criteria = MatchCriteria::demographic(TagSet::new(), filters, None);
        let query = sql(&criteria, Selection::Count);
        assert!(query.contains("AND LOWER(TRIM(p.gender)) = ANY($1)"));
        assert!(query.contains("AND LOWER(TRIM(p.educational_background)) = ANY($2)"));
    }

    #[test]
    fn age_and_voter_filters_use_or_within_group() {
        let filters = ProfileFilters {
            age: AgeFilter { child_youth: true, young_adult: true, ..Default::default() },
            voter: VoterFilter { sk_voter: true, national_voter: true },
            ..Default::default()
        };
        let criteria = MatchCriteria::demographic(TagSet::new(), filters, None);
        let query = sql(&criteria, Selection::Count);
        assert!(query.contains("BETWEEN 15 AND 17) OR (p.birthdate IS NOT NULL"));
        assert!(query.contains("BETWEEN 25 AND 30)"));
        assert!(query.contains("p.sk_voter, ''))) = 'yes' OR LOWER(TRIM(COALESCE(p.national_voter"));
    }

    #[test]
    fn volunteer_roster_ignores_demographics() {
        let mut criteria = MatchCriteria::volunteer_roster(Some("San Roque".into()));
        criteria.tags = TagSet::from_labels(["pwd"]);
        let query = sql(&criteria, Selection::ProfileIds);
        assert!(query.contains("JOIN accounts a ON a.id = p.account_id"));
        assert!(query.contains("a.is_volunteer = 'yes'"));
        assert!(!query.contains("p.pwd"));
    }

    #[test]
    fn filters_deserialize_from_partial_json() {
        let filters: ProfileFilters =
            serde_json::from_str(r#"{"gender": {"female": true}, "employment": {"unemployed": true}}"#).unwrap();
        assert!(filters.gender.female);
        assert!(!filters.gender.male);
        assert_eq!(filters.employment.values().len(), 3);
        assert!(filters.civil_status.values().is_empty());
    }
}
