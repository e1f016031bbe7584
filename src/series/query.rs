//! Query definitions
//!
//! A [`Query`] identifies one logical search over the document set: what kind
//! of thing to look for and the target string to look for. Queries are
//! immutable after construction and compared by kind + target; the numeric id
//! records assignment order and doubles as the series index inside a
//! [`crate::series::SeriesCollection`].

use serde::{Deserialize, Serialize};

/// What a query searches for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// Inline `#tag` occurrences in the body plus front-matter tag list entries
    Tag,
    /// A front-matter key holding a numeric value
    FrontmatterField,
    /// Existence of a front-matter key (predicate, not a value extractor)
    FrontmatterExists,
    /// Literal text occurrences in the body
    Text,
}

impl QueryKind {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tag" => Some(Self::Tag),
            "frontmatter" | "frontmatter_field" => Some(Self::FrontmatterField),
            "frontmatter_exists" => Some(Self::FrontmatterExists),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tag => write!(f, "tag"),
            Self::FrontmatterField => write!(f, "frontmatter_field"),
            Self::FrontmatterExists => write!(f, "frontmatter_exists"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// One logical search over the document set
///
/// Two queries are equal iff kind and target match; `id` is excluded from
/// equality because it only records assignment order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// Assignment order; index of the matching series in the collection
    pub id: usize,
    /// What to search for
    pub kind: QueryKind,
    /// The tag name, front-matter key, or literal text to match
    pub target: String,
}

impl Query {
    /// Create a new query
    pub fn new(id: usize, kind: QueryKind, target: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            target: target.into(),
        }
    }
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.target == other.target
    }
}

impl Eq for Query {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_equality_ignores_id() {
        let a = Query::new(0, QueryKind::Tag, "weight");
        let b = Query::new(5, QueryKind::Tag, "weight");
        assert_eq!(a, b);
    }

    #[test]
    fn test_query_inequality() {
        let a = Query::new(0, QueryKind::Tag, "weight");
        let b = Query::new(0, QueryKind::Text, "weight");
        let c = Query::new(0, QueryKind::Tag, "mood");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(QueryKind::from_str("tag"), Some(QueryKind::Tag));
        assert_eq!(
            QueryKind::from_str("frontmatter_exists"),
            Some(QueryKind::FrontmatterExists)
        );
        assert_eq!(QueryKind::from_str("TEXT"), Some(QueryKind::Text));
        assert_eq!(QueryKind::from_str("unknown"), None);
    }
}
