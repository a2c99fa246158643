use std::fmt;

use serde::Serialize;

use crate::doc::GroupId;

/// An error raised while rendering a document.
///
/// The document tree itself is closed, so malformed shapes cannot be
/// constructed; the only failure left is a reference between nodes that the
/// render order cannot satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrintError {
    /// An if-break referenced a group identifier that no group had rendered
    /// by the time the if-break was reached.
    UnresolvedGroupReference(GroupId),
}

impl fmt::Display for PrintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedGroupReference(id) => {
                write!(f, "if-break references {id}, which has not rendered yet")
            }
        }
    }
}

impl std::error::Error for PrintError {}
