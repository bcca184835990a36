use thiserror::Error;

/// Errors raised by model writes and post-fixing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("document has no root")]
    NoRoot,

    #[error("no element at path {0:?}")]
    InvalidPath(Vec<usize>),

    #[error("offset {offset} is out of bounds for {path:?}")]
    InvalidOffset { path: Vec<usize>, offset: usize },

    #[error("'{child}' is not allowed in '{parent}'")]
    NotAllowed { parent: &'static str, child: &'static str },

    #[error("attribute '{attribute}' is not allowed in '{parent}'")]
    AttributeNotAllowed { parent: &'static str, attribute: &'static str },

    #[error("'{0}' does not hold inline content")]
    NotInline(&'static str),

    #[error("post-fixers still changing the document after {0} passes")]
    PostFixLimit(usize),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

/// Display name of the parent at `path`, `$root` for the root.
pub(crate) fn parent_name(kind: Option<&crate::model::ElementKind>) -> &'static str {
    kind.map_or("$root", crate::model::ElementKind::name)
}
