use std::path::PathBuf;

use anyhow::Context as _;
use uuid::Uuid;

use crate::domain::image::DecodedImage;
use crate::domain::repository::ImageStore;
use crate::error::ApiError;

/// Writes images under `root/recipes/` on the local filesystem.
#[derive(Clone)]
pub struct LocalImageStore {
    pub root: PathBuf,
}

impl ImageStore for LocalImageStore {
    async fn save(&self, image: &DecodedImage) -> Result<String, ApiError> {
        let relative = format!("recipes/{}.{}", Uuid::now_v7(), image.extension);
        let path = self.root.join(&relative);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create media dir {}", dir.display()))?;
        }
        tokio::fs::write(&path, &image.bytes)
            .await
            .with_context(|| format!("write image {}", path.display()))?;
        Ok(relative)
    }
}
