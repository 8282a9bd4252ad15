use keyline_animation::AnimationError;
use keyline_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("invalid {field}: {input:?} is not a number")]
    InvalidNumber { field: &'static str, input: String },

    #[error("invalid timecode {0:?}, expected h:m:s")]
    InvalidTimecode(String),

    #[error("no key edit form is open")]
    NoOpenForm,

    #[error(transparent)]
    Animation(#[from] AnimationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("malformed saved key data: {0}")]
    SavedData(#[from] serde_json::Error),
}
