// SPDX-License-Identifier: Apache-2.0

//! Local-filesystem photo storage. One photo per owning record, stored as
//! `<owner-id>.<ext>` under the configured directory; saving replaces and
//! removes any prior file for the same owner.

use lanyard_api::{ApiError, ApiErrorCode};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[must_use]
pub fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

pub fn extension_of(filename: &str) -> Result<String, ApiError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(ApiError::new(
            ApiErrorCode::UnsupportedMediaType,
            format!("file type not allowed: {filename}"),
            json!({"allowed": ALLOWED_EXTENSIONS}),
        ))
    }
}

fn owner_path(dir: &Path, owner_id: &str, ext: &str) -> PathBuf {
    dir.join(format!("{owner_id}.{ext}"))
}

/// Writes the new photo and removes any prior photo of the same owner with a
/// different extension.
pub fn save_photo(
    dir: &Path,
    owner_id: &str,
    ext: &str,
    bytes: &[u8],
) -> Result<PathBuf, ApiError> {
    fs::create_dir_all(dir)
        .map_err(|e| ApiError::internal(format!("photo dir {dir:?}: {e}")))?;
    for prior_ext in ALLOWED_EXTENSIONS {
        if prior_ext != ext {
            let prior = owner_path(dir, owner_id, prior_ext);
            if prior.exists() {
                let _ = fs::remove_file(prior);
            }
        }
    }
    let path = owner_path(dir, owner_id, ext);
    fs::write(&path, bytes)
        .map_err(|e| ApiError::internal(format!("photo write {path:?}: {e}")))?;
    Ok(path)
}

/// The owner's stored photo, if any, with its content type.
#[must_use]
pub fn load_photo(dir: &Path, owner_id: &str) -> Option<(Vec<u8>, &'static str)> {
    for ext in ALLOWED_EXTENSIONS {
        let path = owner_path(dir, owner_id, ext);
        if let Ok(bytes) = fs::read(&path) {
            return Some((bytes, content_type_for(ext)));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_allow_list_is_enforced() {
        assert_eq!(extension_of("me.PNG").expect("png"), "png");
        assert_eq!(extension_of("photo.jpeg").expect("jpeg"), "jpeg");
        assert!(extension_of("script.sh").is_err());
        assert!(extension_of("noextension").is_err());
    }

    #[test]
    fn save_replaces_prior_photo_with_other_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        save_photo(dir.path(), "u-1", "png", b"png-bytes").expect("save png");
        save_photo(dir.path(), "u-1", "jpg", b"jpg-bytes").expect("save jpg");

        assert!(!dir.path().join("u-1.png").exists());
        let (bytes, content_type) = load_photo(dir.path(), "u-1").expect("photo");
        assert_eq!(bytes, b"jpg-bytes");
        assert_eq!(content_type, "image/jpeg");
    }

    #[test]
    fn load_returns_none_without_a_photo() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_photo(dir.path(), "u-1").is_none());
    }
}
