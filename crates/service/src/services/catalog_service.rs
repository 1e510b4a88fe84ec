use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::catalog::{DesignFolder, DesignImage, NewFolder, NewImage};

use crate::clock::Clock;
use crate::errors::ServiceError;
use crate::storage::{Collection, DataKind, KvStore, UserScope};

/// Design folders and their images. Folder `image_count` and cover are
/// denormalized; every image operation here keeps them in step.
#[derive(Clone)]
pub struct CatalogService {
    folders: Collection<DesignFolder>,
    images: Collection<DesignImage>,
    clock: Arc<dyn Clock>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            folders: Collection::new(store.clone(), DataKind::DesignFolders),
            images: Collection::new(store, DataKind::DesignImages),
            clock,
        }
    }

    #[instrument(skip(self, scope, input), fields(user_id = %scope.user_id()))]
    pub async fn create_folder(&self, scope: &UserScope, input: NewFolder) -> Result<DesignFolder, ServiceError> {
        let folder = DesignFolder::create(input, self.clock.now_utc())?;
        let stored = folder.clone();
        self.folders
            .update(scope, move |items| {
                if items.iter().any(|f| f.name.eq_ignore_ascii_case(&stored.name)) {
                    return Err(ServiceError::Conflict(format!("folder '{}' already exists", stored.name)));
                }
                items.push(stored);
                Ok(())
            })
            .await?;
        info!(folder_id = %folder.id, "folder_created");
        Ok(folder)
    }

    pub async fn get_folder(&self, scope: &UserScope, id: Uuid) -> Result<Option<DesignFolder>, ServiceError> {
        Ok(self.folders.load(scope).await?.into_iter().find(|f| f.id == id))
    }

    pub async fn list_folders(&self, scope: &UserScope) -> Result<Vec<DesignFolder>, ServiceError> {
        let mut folders = self.folders.load(scope).await?;
        folders.sort_by_key(|f| f.name.to_lowercase());
        Ok(folders)
    }

    pub async fn rename_folder(&self, scope: &UserScope, id: Uuid, input: NewFolder) -> Result<DesignFolder, ServiceError> {
        let name = models::validate_name("folder name", &input.name)?;
        self.folders
            .update(scope, |items| {
                if items.iter().any(|f| f.id != id && f.name.eq_ignore_ascii_case(&name)) {
                    return Err(ServiceError::Conflict(format!("folder '{name}' already exists")));
                }
                let folder = items.iter_mut().find(|f| f.id == id).ok_or_else(|| ServiceError::not_found("folder"))?;
                folder.name = name;
                folder.description = input.description.trim().to_string();
                Ok(folder.clone())
            })
            .await
    }

    /// Delete a folder together with its images; returns how many images went.
    #[instrument(skip(self, scope), fields(user_id = %scope.user_id()))]
    pub async fn delete_folder(&self, scope: &UserScope, id: Uuid) -> Result<usize, ServiceError> {
        let mut folders = self.folders.load(scope).await?;
        let before = folders.len();
        folders.retain(|f| f.id != id);
        if folders.len() == before {
            return Err(ServiceError::not_found("folder"));
        }
        let removed = self
            .images
            .update(scope, |items| {
                let n = items.len();
                items.retain(|i| i.folder_id != id);
                Ok(n - items.len())
            })
            .await?;
        self.folders.save(scope, &folders).await?;
        info!(folder_id = %id, images_removed = removed, "folder_deleted");
        Ok(removed)
    }

    /// Add an image to a folder; the first image becomes the cover.
    #[instrument(skip(self, scope, input), fields(user_id = %scope.user_id()))]
    pub async fn add_image(&self, scope: &UserScope, folder_id: Uuid, input: NewImage) -> Result<DesignImage, ServiceError> {
        let image = DesignImage::create(folder_id, input, self.clock.now_utc())?;
        let image_id = image.id;
        self.folders
            .update(scope, |items| {
                let folder = items.iter_mut().find(|f| f.id == folder_id).ok_or_else(|| ServiceError::not_found("folder"))?;
                folder.image_count += 1;
                if folder.cover_image_id.is_none() {
                    folder.cover_image_id = Some(image_id);
                }
                Ok(())
            })
            .await?;
        let stored = image.clone();
        self.images.update(scope, move |items| { items.push(stored); Ok(()) }).await?;
        info!(folder_id = %folder_id, image_id = %image.id, "image_added");
        Ok(image)
    }

    pub async fn list_images(&self, scope: &UserScope, folder_id: Uuid) -> Result<Vec<DesignImage>, ServiceError> {
        let mut images: Vec<DesignImage> = self.images.load(scope).await?.into_iter().filter(|i| i.folder_id == folder_id).collect();
        images.sort_by_key(|i| i.created_at);
        Ok(images)
    }

    /// Images carrying `tag` across all folders.
    pub async fn find_by_tag(&self, scope: &UserScope, tag: &str) -> Result<Vec<DesignImage>, ServiceError> {
        let tag = tag.trim().trim_start_matches('#').to_lowercase();
        Ok(self.images.load(scope).await?.into_iter().filter(|i| i.tags.contains(&tag)).collect())
    }

    #[instrument(skip(self, scope), fields(user_id = %scope.user_id()))]
    pub async fn remove_image(&self, scope: &UserScope, image_id: Uuid) -> Result<bool, ServiceError> {
        let mut images = self.images.load(scope).await?;
        let Some(pos) = images.iter().position(|i| i.id == image_id) else {
            return Ok(false);
        };
        let removed = images.remove(pos);
        let next_cover = images.iter().find(|i| i.folder_id == removed.folder_id).map(|i| i.id);
        self.images.save(scope, &images).await?;
        self.folders
            .update(scope, |items| {
                if let Some(folder) = items.iter_mut().find(|f| f.id == removed.folder_id) {
                    folder.image_count = folder.image_count.saturating_sub(1);
                    if folder.cover_image_id == Some(image_id) {
                        folder.cover_image_id = next_cover;
                    }
                }
                Ok(())
            })
            .await?;
        Ok(true)
    }

    /// Move an image between folders, adjusting both counts.
    #[instrument(skip(self, scope), fields(user_id = %scope.user_id()))]
    pub async fn move_image(&self, scope: &UserScope, image_id: Uuid, to_folder: Uuid) -> Result<DesignImage, ServiceError> {
        if self.get_folder(scope, to_folder).await?.is_none() {
            return Err(ServiceError::not_found("folder"));
        }
        let (from_folder, moved, next_cover) = self
            .images
            .update(scope, |items| {
                let image = items.iter_mut().find(|i| i.id == image_id).ok_or_else(|| ServiceError::not_found("image"))?;
                let from = image.folder_id;
                image.folder_id = to_folder;
                let moved = image.clone();
                let next_cover = items.iter().find(|i| i.folder_id == from).map(|i| i.id);
                Ok((from, moved, next_cover))
            })
            .await?;
        if from_folder == to_folder {
            return Ok(moved);
        }
        self.folders
            .update(scope, |items| {
                for folder in items.iter_mut() {
                    if folder.id == from_folder {
                        folder.image_count = folder.image_count.saturating_sub(1);
                        if folder.cover_image_id == Some(image_id) {
                            folder.cover_image_id = next_cover;
                        }
                    } else if folder.id == to_folder {
                        folder.image_count += 1;
                        if folder.cover_image_id.is_none() {
                            folder.cover_image_id = Some(image_id);
                        }
                    }
                }
                Ok(())
            })
            .await?;
        Ok(moved)
    }

    /// Recompute denormalized counts and covers from the stored images.
    /// Returns how many folders were corrected.
    #[instrument(skip(self, scope), fields(user_id = %scope.user_id()))]
    pub async fn recount(&self, scope: &UserScope) -> Result<usize, ServiceError> {
        let images = self.images.load(scope).await?;
        let mut by_folder: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for image in &images {
            by_folder.entry(image.folder_id).or_default().push(image.id);
        }
        let fixed = self
            .folders
            .update(scope, |items| {
                let mut fixed = 0;
                for folder in items.iter_mut() {
                    let ids = by_folder.get(&folder.id).map(Vec::as_slice).unwrap_or(&[]);
                    let count = ids.len() as u32;
                    let cover_ok = match folder.cover_image_id {
                        Some(cover) => ids.contains(&cover),
                        None => ids.is_empty(),
                    };
                    if folder.image_count != count || !cover_ok {
                        folder.image_count = count;
                        if !cover_ok {
                            folder.cover_image_id = ids.first().copied();
                        }
                        fixed += 1;
                    }
                }
                Ok(fixed)
            })
            .await?;
        if fixed > 0 {
            warn!(fixed, "folder counts repaired");
        }
        Ok(fixed)
    }
}
