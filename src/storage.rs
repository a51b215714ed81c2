use std::path::{Path, PathBuf};

use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

use crate::{error::AppResult, forms::UploadedFile};

pub const LAND_PHOTOS: &str = "land_photos";
pub const PRODUCT_IMAGES: &str = "product_images";

/// Uploaded images on local disk under a media root.
/// Rows only keep the path relative to that root.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `file` to `<folder>/<owner_id>/<unique>_<name>` and returns that
    /// relative reference.
    pub async fn save(&self, folder: &str, owner_id: Uuid, file: &UploadedFile) -> AppResult<String> {
        let dir = self.root.join(folder).join(owner_id.to_string());
        fs::create_dir_all(&dir).await?;

        let name = format!(
            "{}_{}",
            Uuid::new_v4().simple(),
            sanitize_file_name(&file.file_name)
        );
        let mut f = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(dir.join(&name))
            .await?;
        f.write_all(&file.bytes).await?;
        f.flush().await?;

        Ok(format!("{folder}/{owner_id}/{name}"))
    }

    /// Best-effort removal; a missing file is not an error.
    pub async fn remove_all(&self, references: &[String]) {
        for reference in references {
            let path = self.root.join(reference);
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    tracing::warn!(error = %err, path = %path.display(), "could not remove media file");
                }
            }
        }
    }
}

fn sanitize_file_name(name: &str) -> String {
    // Drop any client-side directory part.
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.chars().take(100).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    #[test]
    fn file_names_are_flattened() {
        assert_eq!(sanitize_file_name("farm.jpg"), "farm.jpg");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\my farm.png"), "myfarm.png");
        assert_eq!(sanitize_file_name(".."), "upload");
        assert_eq!(sanitize_file_name(""), "upload");
    }

    #[tokio::test]
    async fn saves_and_removes_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());
        let owner = Uuid::new_v4();
        let file = UploadedFile {
            file_name: "field.png".into(),
            content_type: Some("image/png".into()),
            bytes: Bytes::from_static(b"\x89PNG"),
        };

        let reference = store.save(LAND_PHOTOS, owner, &file).await.unwrap();
        assert!(reference.starts_with(&format!("land_photos/{owner}/")));
        assert!(reference.ends_with("_field.png"));
        let path = store.root().join(&reference);
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG");

        store.remove_all(&[reference.clone(), reference]).await;
        assert!(!path.exists());
    }
}
