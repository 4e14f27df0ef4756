//! Profile Store: identifying data kept outside the search index.
//!
//! Lookups are batched per ranking run. A missing id is simply absent from the
//! returned map; callers decide what to show instead. Single rows are also
//! served directly through `GET /api/v1/profiles/:resume_id`.

pub mod handlers;

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::profile::{Profile, ProfileRow};

#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

const PROFILE_COLUMNS: &str = "resume_id::text AS resume_id, name, email, phone_number, \
     address, linkedin_url, s3_bucket, s3_key, original_filename, file_type";

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn lookup(&self, ids: &[String]) -> Result<HashMap<String, Profile>, ProfileStoreError>;

    /// The stored row for one resume, as written.
    async fn find(&self, resume_id: Uuid) -> Result<Option<ProfileRow>, ProfileStoreError>;

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Reads profiles from the `resume_pii` table.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    /// Creates the connection pool backing the store.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }
}

/// Ids as UUIDs, deduplicated. Anything else cannot be in the table.
fn parse_ids(ids: &[String]) -> Vec<Uuid> {
    let mut parsed: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        match Uuid::parse_str(id.trim()) {
            Ok(uuid) if !parsed.contains(&uuid) => parsed.push(uuid),
            Ok(_) => {}
            Err(_) => debug!("Skipping profile lookup for non-UUID id '{id}'"),
        }
    }
    parsed
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn lookup(&self, ids: &[String]) -> Result<HashMap<String, Profile>, ProfileStoreError> {
        let uuids = parse_ids(ids);
        if uuids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM resume_pii WHERE resume_id = ANY($1)"
        ))
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await?;

        info!("Found profiles for {} of {} ids", rows.len(), uuids.len());

        // Index by the caller's spelling of each id so lookups by hit id succeed.
        let by_uuid: HashMap<Uuid, Profile> = rows
            .into_iter()
            .filter_map(|row| {
                let uuid = Uuid::parse_str(&row.resume_id).ok()?;
                Some((uuid, Profile::from(row)))
            })
            .collect();

        let mut profiles = HashMap::with_capacity(by_uuid.len());
        for id in ids {
            if let Ok(uuid) = Uuid::parse_str(id.trim()) {
                if let Some(profile) = by_uuid.get(&uuid) {
                    profiles.insert(id.clone(), profile.clone());
                }
            }
        }
        Ok(profiles)
    }

    async fn find(&self, resume_id: Uuid) -> Result<Option<ProfileRow>, ProfileStoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM resume_pii WHERE resume_id = $1"
        ))
        .bind(resume_id)
        .fetch_optional(&self.pool)
        .await?;

        debug!("Profile {resume_id} found: {}", row.is_some());
        Ok(row)
    }
}

/// Used when no database is configured; every lookup comes back empty.
pub struct DisabledProfileStore;

#[async_trait]
impl ProfileStore for DisabledProfileStore {
    async fn lookup(&self, ids: &[String]) -> Result<HashMap<String, Profile>, ProfileStoreError> {
        if !ids.is_empty() {
            warn!("Profile store disabled; {} profiles will be synthesized", ids.len());
        }
        Ok(HashMap::new())
    }

    async fn find(&self, _resume_id: Uuid) -> Result<Option<ProfileRow>, ProfileStoreError> {
        Ok(None)
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
