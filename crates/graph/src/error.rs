use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Match threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
}
