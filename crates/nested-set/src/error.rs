//! Error types for nested-set encoding.

use thiserror::Error;

use crate::node::{NodeId, NodePath};

/// Result type alias for nested-set operations.
pub type Result<T> = std::result::Result<T, NestedSetError>;

/// Errors that can occur while decoding, encoding or validating a forest.
#[derive(Error, Debug)]
pub enum NestedSetError {
    /// The input does not have the shape traversal requires.
    #[error("malformed input at {path}: {reason}")]
    MalformedInput {
        /// Position of the offending node in the forest.
        path: NodePath,
        /// What is wrong with it.
        reason: String,
    },

    /// An identifier occurred twice while duplicates are rejected.
    #[error("duplicate identifier {id} at {path}")]
    DuplicateIdentifier {
        /// The repeated identifier.
        id: NodeId,
        /// Position of the second occurrence.
        path: NodePath,
    },

    /// A boundary or level does not fit its integer type.
    #[error("{what} overflows at {path}")]
    Overflow {
        /// Position of the node being numbered.
        path: NodePath,
        /// The quantity that overflowed.
        what: &'static str,
    },

    /// A flat table violates a nested-set invariant.
    #[error("invalid encoding for {id}: {reason}")]
    InvalidEncoding {
        /// Record that failed the check.
        id: NodeId,
        /// The violated invariant.
        reason: String,
    },

    /// The document is not valid JSON.
    #[cfg(feature = "serde")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NestedSetError {
    pub(crate) fn malformed(path: NodePath, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            path,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(id: NodeId, reason: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            id,
            reason: reason.into(),
        }
    }

    /// Returns true for [`NestedSetError::MalformedInput`].
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = NestedSetError::malformed(NodePath::from(vec![3, 1]), "missing identifier");
        assert_eq!(
            err.to_string(),
            "malformed input at [3].children[1]: missing identifier"
        );
        assert!(err.is_malformed());

        let err = NestedSetError::DuplicateIdentifier {
            id: NodeId(7),
            path: NodePath::from(vec![0]),
        };
        assert_eq!(err.to_string(), "duplicate identifier 7 at [0]");
        assert!(!err.is_malformed());

        let err = NestedSetError::Overflow {
            path: NodePath::from(vec![0, 2]),
            what: "right boundary",
        };
        assert_eq!(err.to_string(), "right boundary overflows at [0].children[2]");

        let err = NestedSetError::invalid(NodeId(2), "right must exceed left");
        assert_eq!(
            err.to_string(),
            "invalid encoding for 2: right must exceed left"
        );
    }
}
