use crate::object::ObjectId;

/// Alias for `Result<T, SlError>`.
pub type SlResult<T> = Result<T, SlError>;

/// Errors that can occur when manipulating or decoding a zone.
#[derive(Debug, thiserror::Error)]
pub enum SlError {
    /// The requested object ID does not exist in the zone.
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// An object with the same ID is already part of the zone.
    #[error("object already exists: \"{0}\"")]
    DuplicateId(ObjectId),

    /// A rail without any points was used where at least one is required.
    #[error("rail {0} has no points")]
    EmptyRail(ObjectId),

    /// A persisted record had an unexpected structure.
    #[error("malformed record ({context}): {reason}")]
    MalformedRecord {
        /// Where in the document the problem was found.
        context: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A link points at an object that is not part of the zone.
    #[error("object {source_id} links to missing object {target} via \"{name}\"")]
    DanglingLink {
        /// The object holding the link.
        source_id: ObjectId,
        /// The link name.
        name: String,
        /// The unresolved target ID.
        target: ObjectId,
    },

    /// An editor setting is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A document could not be parsed as JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SlError {
    /// Shorthand for building a [`SlError::MalformedRecord`].
    pub fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            context: context.into(),
            reason: reason.into(),
        }
    }
}
