//! Error types shared by the document model, the CSS object model and the
//! synchronizers.

/// Errors raised by tree mutations on the document model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The node is owned by a different document than the parent.
    #[error("node belongs to a different document")]
    WrongDocument,

    /// The node cannot be inserted at this position of the tree.
    #[error("node cannot be inserted under this parent")]
    HierarchyRequest,

    /// The node is not a child of the given parent.
    #[error("node is not a child of this parent")]
    NotFound,
}

/// Errors raised by the live rule list of a style sheet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The index is past the end of the rule list.
    #[error("rule index {index} is out of range for a list of {len} rules")]
    IndexOutOfRange { index: usize, len: usize },

    /// The rule text is not valid for direct insertion.
    #[error("failed to parse rule `{rule}`: {reason}")]
    Syntax { rule: String, reason: String },

    /// The rule text did not contain exactly one rule.
    #[error("expected exactly one rule, found {0}")]
    RuleCount(usize),
}

impl RuleError {
    /// Create a syntax error for the given rule text.
    pub fn syntax(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Syntax {
            rule: rule.into(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the two synchronization entry points.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The target document has no `<body>` to hold content.
    #[error("target document has no content root")]
    MissingContentRoot,

    /// The target document has no `<head>` to hold the managed style container.
    #[error("target document has no metadata root")]
    MissingMetadataRoot,

    /// A tree mutation crossed a document boundary or broke the hierarchy.
    #[error("isolation violated: {0}")]
    Isolation(#[from] DomError),

    /// The managed `<style>` element was removed from the document, so it
    /// has no live sheet to write into.
    #[error("managed style container is no longer attached to the document")]
    ContainerDetached,

    /// A parsed rule was rejected when inserted into the live container.
    #[error("rule {index} (`{rule}`) was rejected: {source}")]
    RuleInsertion {
        index: usize,
        rule: String,
        #[source]
        source: RuleError,
    },

    /// A stale rule could not be removed from the live container.
    #[error("rule {index} could not be deleted: {source}")]
    RuleDeletion {
        index: usize,
        #[source]
        source: RuleError,
    },
}
