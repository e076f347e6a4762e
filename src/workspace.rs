//! ワークスペース内のカタログファイル探索

/// Catalog file pattern matcher
mod matcher;

use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;
use thiserror::Error;

use crate::config::EditorSettings;
pub use matcher::CatalogMatcher;

/// 探索のエラー
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Invalid include pattern '{pattern}': {source}")]
    InvalidIncludePattern {
        /// 不正なパターン
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        /// 不正なパターン
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),

    #[error("Workspace root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// ワークスペース配下のカタログファイルをパス順で返す
///
/// `.gitignore` を尊重し、`includePatterns` / `excludePatterns` で絞り込む。
///
/// # Errors
/// - 不正な glob パターン
/// - ルートがディレクトリでない
pub fn find_catalogs(root: &Path, settings: &EditorSettings) -> Result<Vec<PathBuf>, WorkspaceError> {
    if !root.is_dir() {
        return Err(WorkspaceError::NotADirectory(root.to_path_buf()));
    }
    let matcher = CatalogMatcher::new(root.to_path_buf(), settings)?;

    let mut found_files = Vec::new();
    for result in WalkBuilder::new(matcher.workspace_root())
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        // ファイルのみを対象
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        if matcher.is_catalog_file(entry.path()) {
            found_files.push(entry.into_path());
        }
    }

    found_files.sort();
    tracing::debug!(root = ?matcher.workspace_root(), count = found_files.len(), "Found catalog files");
    Ok(found_files)
}
