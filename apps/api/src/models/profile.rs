use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `resume_pii` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ProfileRow {
    pub resume_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub linkedin_url: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_key: Option<String>,
    pub original_filename: Option<String>,
    pub file_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub linkedin_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub s3_bucket: String,
    pub s3_key: String,
    pub original_filename: String,
    pub file_type: String,
}

/// Identifying profile data for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub personal_info: PersonalInfo,
    pub file_info: FileInfo,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            personal_info: PersonalInfo {
                name: row.name.unwrap_or_default(),
                email: row.email.unwrap_or_default(),
                phone_number: row.phone_number.unwrap_or_default(),
                address: row.address.unwrap_or_default(),
                linkedin_url: row.linkedin_url.unwrap_or_default(),
            },
            file_info: FileInfo {
                s3_bucket: row.s3_bucket.unwrap_or_default(),
                s3_key: row.s3_key.unwrap_or_default(),
                original_filename: row
                    .original_filename
                    .unwrap_or_else(|| "unknown.pdf".to_string()),
                file_type: row.file_type.unwrap_or_else(|| "pdf".to_string()),
            },
        }
    }
}
