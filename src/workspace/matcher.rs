//! Catalog file pattern matcher.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::WorkspaceError;
use crate::config::EditorSettings;

/// Matches files against the configured catalog glob patterns.
#[derive(Debug, Clone)]
pub struct CatalogMatcher {
    /// Root the patterns are relative to
    workspace_root: PathBuf,
    /// `includePatterns`
    include_set: GlobSet,
    /// `excludePatterns`
    exclude_set: GlobSet,
}

impl CatalogMatcher {
    /// Creates a new matcher from settings.
    ///
    /// # Errors
    /// - Invalid include or exclude pattern
    pub fn new(workspace_root: PathBuf, settings: &EditorSettings) -> Result<Self, WorkspaceError> {
        let include_set = Self::build_glob_set(&settings.include_patterns, |pattern, source| {
            WorkspaceError::InvalidIncludePattern { pattern, source }
        })?;

        let exclude_set = Self::build_glob_set(&settings.exclude_patterns, |pattern, source| {
            WorkspaceError::InvalidExcludePattern { pattern, source }
        })?;

        Ok(Self { workspace_root, include_set, exclude_set })
    }

    /// Compiles `patterns` into one set, reporting the first bad pattern
    fn build_glob_set<F>(patterns: &[String], make_error: F) -> Result<GlobSet, WorkspaceError>
    where
        F: Fn(String, globset::Error) -> WorkspaceError,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| make_error(pattern.clone(), e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Returns true if the path matches `includePatterns` but not `excludePatterns`.
    ///
    /// The path must be absolute and under the workspace root.
    #[must_use]
    pub fn is_catalog_file(&self, absolute_path: &Path) -> bool {
        let Some(relative_path) = absolute_path.strip_prefix(&self.workspace_root).ok() else {
            return false;
        };

        self.is_catalog_file_relative(relative_path)
    }

    /// Same as [`Self::is_catalog_file`] for a path relative to the workspace root.
    #[must_use]
    pub fn is_catalog_file_relative(&self, relative_path: &Path) -> bool {
        self.include_set.is_match(relative_path) && !self.exclude_set.is_match(relative_path)
    }
}
