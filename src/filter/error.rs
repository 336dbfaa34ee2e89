use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("{field} must be non-negative")]
    Negative { field: &'static str },

    #[error("Min employees cannot be greater than max")]
    InvertedRange,
}
