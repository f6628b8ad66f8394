//! Path pattern parsing and matching.
//!
//! # Responsibilities
//! - Parse route patterns into literal, parameter and catch-all segments
//! - Match request paths and capture parameters
//! - Rank patterns by specificity
//!
//! # Design Decisions
//! - Segment comparison only, no regex in the hot path
//! - Trailing slashes and empty segments are ignored
//! - Path matching is case-sensitive
//! - Catch-all matches zero or more remaining segments and must come last

use std::fmt;

use crate::routing::router::RouteError;
use crate::routing::PathParams;

const RANK_CATCH_ALL: u8 = 1;
const RANK_END: u8 = 2;
const RANK_PARAM: u8 = 2;
const RANK_LITERAL: u8 = 3;

/// One segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment.
    Literal(String),
    /// Matches any single segment and captures it (`:id` or `{id}`).
    Param(String),
    /// Matches every remaining segment (`*`, `*rest` or `{*rest}`).
    CatchAll(String),
}

impl Segment {
    fn rank(&self) -> u8 {
        match self {
            Segment::Literal(_) => RANK_LITERAL,
            Segment::Param(_) => RANK_PARAM,
            Segment::CatchAll(_) => RANK_CATCH_ALL,
        }
    }

    /// Same kind of segment, ignoring parameter names.
    fn same_shape(&self, other: &Segment) -> bool {
        match (self, other) {
            (Segment::Literal(a), Segment::Literal(b)) => a == b,
            (Segment::Param(_), Segment::Param(_)) => true,
            (Segment::CatchAll(_), Segment::CatchAll(_)) => true,
            _ => false,
        }
    }
}

/// A parsed route pattern such as `/users/:id/posts/*rest`.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern. It must start with `/`.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: raw.to_string(),
            reason: reason.to_string(),
        };

        if !raw.starts_with('/') {
            return Err(invalid("pattern must start with '/'"));
        }

        let parts: Vec<&str> = split_path(raw).collect();
        let mut segments = Vec::with_capacity(parts.len());

        for (i, part) in parts.iter().enumerate() {
            let segment = parse_segment(part);
            match &segment {
                Segment::Param(name) if name.is_empty() => {
                    return Err(invalid("parameter name must not be empty"));
                }
                Segment::Param(name) | Segment::CatchAll(name) => {
                    let duplicate = segments.iter().any(|s| match s {
                        Segment::Param(n) | Segment::CatchAll(n) => n == name,
                        Segment::Literal(_) => false,
                    });
                    if duplicate {
                        return Err(invalid("duplicate parameter name"));
                    }
                    if matches!(segment, Segment::CatchAll(_)) && i + 1 != parts.len() {
                        return Err(invalid("catch-all must be the last segment"));
                    }
                }
                Segment::Literal(_) => {}
            }
            segments.push(segment);
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when every segment is a literal.
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Two patterns match exactly the same set of paths.
    pub fn same_shape(&self, other: &PathPattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a.same_shape(b))
    }

    /// Match a whole path, already split into segments.
    pub fn matches(&self, path: &[&str]) -> Option<PathParams> {
        let mut params = PathParams::new();

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::CatchAll(name) => {
                    params.insert(name.clone(), path.get(i..).unwrap_or_default().join("/"));
                    return Some(params);
                }
                Segment::Literal(expected) => {
                    if path.get(i) != Some(&expected.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = path.get(i)?;
                    params.insert(name.clone(), (*value).to_string());
                }
            }
        }

        (path.len() == self.segments.len()).then_some(params)
    }

    /// Match a literal prefix. Returns the number of path segments consumed.
    pub fn match_prefix(&self, path: &[&str]) -> Option<usize> {
        if self.segments.len() > path.len() {
            return None;
        }
        let matched = self.segments.iter().zip(path).all(|(segment, part)| match segment {
            Segment::Literal(expected) => expected == part,
            _ => false,
        });
        matched.then_some(self.segments.len())
    }

    /// Specificity key. Larger keys are more specific.
    ///
    /// Keys compare lexicographically; only keys of patterns matching the same
    /// path are ever compared.
    pub fn specificity(&self) -> Vec<u8> {
        let mut rank: Vec<u8> = self.segments.iter().map(Segment::rank).collect();
        if !matches!(self.segments.last(), Some(Segment::CatchAll(_))) {
            rank.push(RANK_END);
        }
        rank
    }

    /// Key of a literal prefix followed by the key of whatever matched below it.
    pub(crate) fn prefix_specificity(&self, below: &[u8]) -> Vec<u8> {
        let mut rank = vec![RANK_LITERAL; self.segments.len()];
        rank.extend_from_slice(below);
        rank
    }

    /// Key used for a fallback handler: ranks like a catch-all.
    pub(crate) fn fallback_specificity() -> Vec<u8> {
        vec![RANK_CATCH_ALL]
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split a path into non-empty segments, dropping any query string.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    let path = path.split('?').next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty())
}

/// Re-join segments into a rooted path.
pub fn join_path(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

fn parse_segment(part: &str) -> Segment {
    if let Some(inner) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
        return match inner.strip_prefix('*') {
            Some(name) => Segment::CatchAll(catch_all_name(name)),
            None => Segment::Param(inner.to_string()),
        };
    }
    if let Some(name) = part.strip_prefix(':') {
        return Segment::Param(name.to_string());
    }
    if let Some(name) = part.strip_prefix('*') {
        return Segment::CatchAll(catch_all_name(name));
    }
    Segment::Literal(part.to_string())
}

fn catch_all_name(name: &str) -> String {
    if name.is_empty() {
        "*".to_string()
    } else {
        name.to_string()
    }
}
