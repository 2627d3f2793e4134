use crate::types::AnnotationKind;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Index out of range: {index} is not a valid {kind} index (count {len})")]
    IndexOutOfRange {
        kind: AnnotationKind,
        index: usize,
        len: usize,
    },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Persist failed: {0}")]
    Persist(String),
}
