use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// A folder of design references. `image_count` is denormalized and kept in
/// sync by the catalog service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignFolder {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_count: u32,
    #[serde(default)]
    pub cover_image_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignImage {
    pub id: Uuid,
    pub folder_id: Uuid,
    pub uri: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewFolder {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewImage {
    pub uri: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DesignFolder {
    pub fn create(input: NewFolder, now: DateTime<Utc>) -> Result<Self, ModelError> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: crate::validate_name("folder name", &input.name)?,
            description: input.description.trim().to_string(),
            image_count: 0,
            cover_image_id: None,
            created_at: now,
        })
    }
}

impl DesignImage {
    pub fn create(folder_id: Uuid, input: NewImage, now: DateTime<Utc>) -> Result<Self, ModelError> {
        let uri = input.uri.trim();
        if uri.is_empty() {
            return Err(ModelError::validation("image uri required"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            folder_id,
            uri: uri.to_string(),
            title: input.title.trim().to_string(),
            tags: normalize_tags(input.tags),
            created_at: now,
        })
    }
}

/// Lowercase, trim, drop empties and duplicates while keeping first-seen order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let t = tag.trim().trim_start_matches('#').to_lowercase();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}
