//! Addressing of nodes inside a variation tree.
//!
//! The text form is a dot-joined chain of `type:key` segments, e.g.
//! `device:iphone.plural:one`. It is parsed once at the boundary; the tree
//! code only ever sees [`VariationPath`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors for malformed path text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path text contained no segments.
    #[error("Variation path is empty")]
    EmptyPath,
    /// A segment had no `:` separating type from key.
    #[error("Variation path segment '{0}' is missing the ':' separator")]
    MissingSeparator(String),
    /// A segment had an empty type or key.
    #[error("Variation path segment '{0}' has an empty type or key")]
    EmptyComponent(String),
}

/// One `type:key` step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    /// Variation type, e.g. `plural`.
    pub kind: String,
    /// Variation key within the type, e.g. `other`.
    pub key: String,
}

impl PathSegment {
    #[must_use]
    pub fn new(kind: impl Into<String>, key: impl Into<String>) -> Self {
        Self { kind: kind.into(), key: key.into() }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.key)
    }
}

impl FromStr for PathSegment {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, key) = s.split_once(':').ok_or_else(|| PathError::MissingSeparator(s.to_string()))?;
        if kind.is_empty() || key.is_empty() {
            return Err(PathError::EmptyComponent(s.to_string()));
        }
        Ok(Self::new(kind, key))
    }
}

/// Non-empty ordered list of segments from the variations root down to one node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariationPath {
    /// Always holds at least one segment.
    segments: Vec<PathSegment>,
}

impl VariationPath {
    /// Path with a single segment.
    #[must_use]
    pub fn root(segment: PathSegment) -> Self {
        Self { segments: vec![segment] }
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments minus one, i.e. the row depth of the addressed node.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    /// Last segment of the path.
    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl FromStr for VariationPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathError::EmptyPath);
        }
        let segments = s.split('.').map(str::parse).collect::<Result<Vec<PathSegment>, _>>()?;
        Ok(Self { segments })
    }
}

impl fmt::Display for VariationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[googletest::test]
    fn test_parse_nested_path() {
        let path: VariationPath = "device:iphone.plural:one".parse().unwrap();

        assert_eq!(
            path.segments(),
            [PathSegment::new("device", "iphone"), PathSegment::new("plural", "one")]
        );
        expect_that!(path.depth(), eq(1));
        expect_that!(path.to_string(), eq("device:iphone.plural:one"));
    }

    #[rstest]
    fn test_key_keeps_extra_colons() {
        let path: VariationPath = "device:mac:catalyst".parse().unwrap();

        assert_eq!(path.last(), Some(&PathSegment::new("device", "mac:catalyst")));
    }

    #[rstest]
    #[case::empty("", PathError::EmptyPath)]
    #[case::no_colon("plural", PathError::MissingSeparator("plural".to_string()))]
    #[case::second_segment("plural:one.other", PathError::MissingSeparator("other".to_string()))]
    #[case::empty_key("plural:", PathError::EmptyComponent("plural:".to_string()))]
    #[case::empty_type(":one", PathError::EmptyComponent(":one".to_string()))]
    #[case::trailing_dot("plural:one.", PathError::MissingSeparator(String::new()))]
    fn test_parse_rejects_malformed(#[case] text: &str, #[case] expected: PathError) {
        assert_eq!(text.parse::<VariationPath>(), Err(expected));
    }

    #[googletest::test]
    fn test_child_extends_without_touching_parent() {
        let parent = VariationPath::root(PathSegment::new("device", "ipad"));

        let child = parent.child(PathSegment::new("plural", "other"));

        expect_that!(parent.to_string(), eq("device:ipad"));
        expect_that!(child.to_string(), eq("device:ipad.plural:other"));
        expect_that!(child.depth(), eq(1));
    }
}
