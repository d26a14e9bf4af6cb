//! Profile repository implementation

use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use crate::eligibility::{build_query, MatchCriteria, Selection};
use crate::models::profile::{Profile, ProfileArchive, ProfileFields};
use crate::utils::errors::PortalError;

const PROFILE_COLUMNS: &str = "id, account_id, barangay, first_name, middle_name, last_name, gender, birthdate, civil_status, educational_background, work_status, studying_level, school_name, pwd, athlete, sk_voter, national_voter, lgbtqia_member, created_at, updated_at";

const NOT_ARCHIVED: &str = "NOT EXISTS (SELECT 1 FROM profile_archives pa WHERE pa.profile_id = profiles.id)";

#[derive(Clone, Debug)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a profile; the caller holds the transaction that checked for an active one
    pub async fn create_in(&self, conn: &mut PgConnection, account_id: i64, fields: ProfileFields) -> Result<Profile, PortalError> {
        let now = Utc::now();
        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles (account_id, barangay, first_name, middle_name, last_name, gender, birthdate,
                civil_status, educational_background, work_status, studying_level, school_name,
                pwd, athlete, sk_voter, national_voter, lgbtqia_member, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $18)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(account_id)
        .bind(fields.barangay)
        .bind(fields.first_name)
        .bind(fields.middle_name)
        .bind(fields.last_name)
        .bind(fields.gender)
        .bind(fields.birthdate)
        .bind(fields.civil_status)
        .bind(fields.educational_background)
        .bind(fields.work_status)
        .bind(fields.studying_level)
        .bind(fields.school_name)
        .bind(fields.pwd)
        .bind(fields.athlete)
        .bind(fields.sk_voter)
        .bind(fields.national_voter)
        .bind(fields.lgbtqia_member)
        .bind(now)
        .fetch_one(conn)
        .await?;

        Ok(profile)
    }

    /// Find profile by ID, archived or not
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Profile>, PortalError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// The account's non-archived profile
    pub async fn find_active_by_account(&self, account_id: i64) -> Result<Option<Profile>, PortalError> {
        let mut conn = self.pool.acquire().await?;
        self.find_active_by_account_in(&mut conn, account_id).await
    }

    pub async fn find_active_by_account_in(&self, conn: &mut PgConnection, account_id: i64) -> Result<Option<Profile>, PortalError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE account_id = $1 AND {NOT_ARCHIVED} ORDER BY id DESC LIMIT 1"
        ))
        .bind(account_id)
        .fetch_optional(conn)
        .await?;

        Ok(profile)
    }

    /// Update the demographic answers of a profile
    pub async fn update(&self, id: i64, fields: ProfileFields) -> Result<Profile, PortalError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET barangay = $2, first_name = $3, middle_name = $4, last_name = $5, gender = $6,
                birthdate = $7, civil_status = $8, educational_background = $9, work_status = $10,
                studying_level = $11, school_name = $12, pwd = $13, athlete = $14, sk_voter = $15,
                national_voter = $16, lgbtqia_member = $17, updated_at = $18
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(fields.barangay)
        .bind(fields.first_name)
        .bind(fields.middle_name)
        .bind(fields.last_name)
        .bind(fields.gender)
        .bind(fields.birthdate)
        .bind(fields.civil_status)
        .bind(fields.educational_background)
        .bind(fields.work_status)
        .bind(fields.studying_level)
        .bind(fields.school_name)
        .bind(fields.pwd)
        .bind(fields.athlete)
        .bind(fields.sk_voter)
        .bind(fields.national_voter)
        .bind(fields.lgbtqia_member)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Record an archive entry for a profile
    pub async fn archive(&self, profile_id: i64, archived_by: i64, reason: Option<String>) -> Result<ProfileArchive, PortalError> {
        let archive = sqlx::query_as::<_, ProfileArchive>(
            r#"
            INSERT INTO profile_archives (profile_id, archived_by, reason, archived_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, profile_id, archived_by, reason, archived_at
            "#,
        )
        .bind(profile_id)
        .bind(archived_by)
        .bind(reason)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(archive)
    }

    /// Profiles matching the criteria, archived ones excluded
    pub async fn find_matching(&self, criteria: &MatchCriteria) -> Result<Vec<Profile>, PortalError> {
        let mut query = build_query(criteria, Selection::Profiles);
        let profiles = query.build_query_as::<Profile>().fetch_all(&self.pool).await?;
        Ok(profiles)
    }

    /// Dry-run count of matching profiles
    pub async fn count_matching(&self, criteria: &MatchCriteria) -> Result<i64, PortalError> {
        let mut query = build_query(criteria, Selection::Count);
        let count: i64 = query.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(count)
    }

    /// Matching profile ids, read inside the publishing transaction
    pub async fn matching_ids_in(&self, conn: &mut PgConnection, criteria: &MatchCriteria) -> Result<Vec<i64>, PortalError> {
        let mut query = build_query(criteria, Selection::ProfileIds);
        let ids: Vec<i64> = query.build_query_scalar::<i64>().fetch_all(conn).await?;
        Ok(ids)
    }
}
