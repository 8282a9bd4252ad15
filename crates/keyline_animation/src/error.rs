use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnimationError {
    #[error("unknown easing: {0}")]
    UnknownEasing(String),

    #[error("not a numeric property value: {0:?}")]
    InvalidValue(String),
}
