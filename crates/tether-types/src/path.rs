//! Dotted slice paths.
//!
//! A path like `very.nested.songs` names a location inside the state tree.
//! Every segment is a literal mapping key: `items.0` addresses the key `"0"`
//! of a mapping, never the first element of a sequence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PathError, PathResult};

/// A validated, non-empty dotted path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlicePath {
    segments: Vec<String>,
}

impl SlicePath {
    /// Parse a dotted string such as `song.listeners`.
    ///
    /// Rejects the empty string and any empty segment (`a..b`, `.a`, `a.`).
    /// Segments are not trimmed; whitespace is part of the key.
    pub fn parse(input: &str) -> PathResult<Self> {
        if input.is_empty() {
            return Err(PathError::Empty);
        }
        Self::from_segments(input.split('.'))
    }

    /// Build a path from already-split segments.
    pub fn from_segments<I, S>(segments: I) -> PathResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        if let Some(index) = segments.iter().position(String::is_empty) {
            return Err(PathError::EmptySegment {
                path: segments.join("."),
                index,
            });
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments. Always at least one.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The final key of the path.
    pub fn leaf(&self) -> &str {
        // Construction guarantees at least one segment.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// The path without its final key, or `None` for a single-segment path.
    pub fn parent(&self) -> Option<SlicePath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Extend the path by one key. Returns an error if `key` is empty.
    pub fn child(&self, key: &str) -> PathResult<SlicePath> {
        Self::from_segments(self.segments.iter().map(String::as_str).chain([key]))
    }

    pub fn to_dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for SlicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dotted())
    }
}

impl FromStr for SlicePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for SlicePath {
    type Error = PathError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SlicePath {
    type Error = PathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<SlicePath> for String {
    fn from(path: SlicePath) -> Self {
        path.to_dotted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_segment() {
        let path = SlicePath::parse("songs").unwrap();
        assert_eq!(path.segments(), ["songs"]);
        assert_eq!(path.depth(), 1);
        assert_eq!(path.leaf(), "songs");
        assert!(path.parent().is_none());
    }

    #[test]
    fn parse_nested_path() {
        let path: SlicePath = "very.nested.songs".parse().unwrap();
        assert_eq!(path.segments(), ["very", "nested", "songs"]);
        assert_eq!(path.leaf(), "songs");
        assert_eq!(path.parent().unwrap().to_dotted(), "very.nested");
        assert_eq!(path.to_string(), "very.nested.songs");
    }

    #[test]
    fn empty_path_is_rejected() {
        assert_eq!(SlicePath::parse(""), Err(PathError::Empty));
        let none: Vec<String> = Vec::new();
        assert_eq!(SlicePath::from_segments(none), Err(PathError::Empty));
    }

    #[test]
    fn empty_segments_are_rejected() {
        assert!(matches!(
            SlicePath::parse("a..b"),
            Err(PathError::EmptySegment { index: 1, .. })
        ));
        assert!(matches!(
            SlicePath::parse(".a"),
            Err(PathError::EmptySegment { index: 0, .. })
        ));
        assert!(matches!(
            SlicePath::parse("a."),
            Err(PathError::EmptySegment { index: 1, .. })
        ));
    }

    #[test]
    fn numeric_segments_stay_literal_keys() {
        let path = SlicePath::parse("items.0").unwrap();
        assert_eq!(path.leaf(), "0");
    }

    #[test]
    fn child_extends_path() {
        let path = SlicePath::parse("song").unwrap();
        assert_eq!(path.child("listeners").unwrap().to_dotted(), "song.listeners");
        assert!(path.child("").is_err());
    }

    #[test]
    fn serde_as_dotted_string() {
        let path = SlicePath::parse("a.b").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"a.b\"");
        let back: SlicePath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
        assert!(serde_json::from_str::<SlicePath>("\"\"").is_err());
    }
}
