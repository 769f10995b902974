//! On-disk storage for uploaded role description documents, plus the
//! `GET /attachments/:filename` handler.
//!
//! Stored filenames are `{5-hex-prefix}_{sanitized-original}`; lookups take
//! the basename only, so a stored name can never escape the root directory.

use std::{
  io,
  path::{Path as FsPath, PathBuf},
};

use axum::{
  extract::{Path, State},
  http::header,
  response::{IntoResponse, Response},
};
use sigh_core::store::TrackerStore;
use tokio::fs;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// A directory of uploaded documents.
pub struct AttachmentStore {
  root: PathBuf,
}

impl AttachmentStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &FsPath {
    &self.root
  }

  /// Basename-only resolution; path components in `stored_name` are dropped.
  fn resolve(&self, stored_name: &str) -> PathBuf {
    let base = FsPath::new(stored_name)
      .file_name()
      .map(|n| n.to_os_string())
      .unwrap_or_default();
    self.root.join(base)
  }

  /// Write `bytes` under a fresh stored name derived from `original_name`.
  /// Returns the stored name.
  pub async fn save(
    &self,
    original_name: &str,
    bytes: &[u8],
  ) -> io::Result<String> {
    fs::create_dir_all(&self.root).await?;
    let stored = build_stored_filename(original_name);
    fs::write(self.resolve(&stored), bytes).await?;
    Ok(stored)
  }

  /// Read a stored file; `None` if it does not exist.
  pub async fn read(&self, stored_name: &str) -> io::Result<Option<Vec<u8>>> {
    match fs::read(self.resolve(stored_name)).await {
      Ok(bytes) => Ok(Some(bytes)),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e),
    }
  }

  /// Best-effort unlink; a missing file is not an error.
  pub async fn remove(&self, stored_name: &str) {
    let _ = fs::remove_file(self.resolve(stored_name)).await;
  }
}

/// Trim the name, then replace every run of characters outside
/// `[a-zA-Z0-9._-]` with a single underscore; a name with nothing left
/// becomes `document`.
pub fn sanitize_filename(name: &str) -> String {
  let name = name.trim();
  let mut out = String::with_capacity(name.len());
  let mut in_run = false;
  for c in name.chars() {
    if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
      out.push(c);
      in_run = false;
    } else if !in_run {
      out.push('_');
      in_run = true;
    }
  }
  if out.is_empty() { "document".to_string() } else { out }
}

fn build_stored_filename(original_name: &str) -> String {
  let hex = Uuid::new_v4().simple().to_string();
  format!("{}_{}", &hex[..5], sanitize_filename(original_name))
}

// ─── Handler ─────────────────────────────────────────────────────────────────

/// `GET /attachments/:filename`
pub async fn serve<S>(
  State(state): State<AppState<S>>,
  Path(filename): Path<String>,
) -> Result<Response, ApiError>
where
  S: TrackerStore,
{
  let bytes = state
    .attachments
    .read(&filename)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("attachment {filename} not found")))?;
  Ok(
    (
      [
        (header::CONTENT_TYPE, "application/octet-stream"),
        (header::CONTENT_DISPOSITION, "inline"),
      ],
      bytes,
    )
      .into_response(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sanitize_keeps_safe_characters() {
    assert_eq!(sanitize_filename("posting-v2.pdf"), "posting-v2.pdf");
    assert_eq!(sanitize_filename("my_file.PDF"), "my_file.PDF");
  }

  #[test]
  fn sanitize_collapses_runs() {
    assert_eq!(sanitize_filename("job posting (final).pdf"), "job_posting_final_.pdf");
    assert_eq!(sanitize_filename("a//b\\c"), "a_b_c");
  }

  #[test]
  fn sanitize_trims_surrounding_whitespace() {
    assert_eq!(sanitize_filename(" jd.pdf "), "jd.pdf");
    assert_eq!(sanitize_filename("\tjd.pdf\n"), "jd.pdf");
  }

  #[test]
  fn sanitize_empty_falls_back() {
    assert_eq!(sanitize_filename(""), "document");
    assert_eq!(sanitize_filename("   "), "document");
    assert_eq!(sanitize_filename("???"), "_");
  }

  #[test]
  fn stored_names_are_prefixed_and_unique() {
    let a = build_stored_filename("jd.pdf");
    let b = build_stored_filename("jd.pdf");
    assert!(a.ends_with("_jd.pdf"));
    assert_eq!(a.len(), "_jd.pdf".len() + 5);
    assert_ne!(a, b);
  }

  #[tokio::test]
  async fn save_read_remove_round_trip() {
    let root = std::env::temp_dir()
      .join(format!("sigh-attachments-{}", Uuid::new_v4().simple()));
    let store = AttachmentStore::new(&root);

    let stored = store.save("jd.pdf", b"posting body").await.unwrap();
    assert_eq!(
      store.read(&stored).await.unwrap().as_deref(),
      Some(&b"posting body"[..])
    );

    // Directory traversal in the name stays confined to the root.
    let sneaky = format!("../{stored}");
    assert!(store.read(&sneaky).await.unwrap().is_some());

    store.remove(&stored).await;
    assert!(store.read(&stored).await.unwrap().is_none());

    let _ = tokio::fs::remove_dir_all(&root).await;
  }
}
