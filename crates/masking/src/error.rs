use thiserror::Error;

/// Result type for masking operations
pub type Result<T> = std::result::Result<T, MaskError>;

/// Errors that abort the rewrite of a whole text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// Two spans share characters and the policy does not allow choosing one
    #[error("Overlapping spans: {first_start}..{first_end} and {second_start}..{second_end}")]
    Overlap {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    /// Span does not fit the text it is applied to
    #[error("Invalid span {start}..{end} for text of {len} characters")]
    InvalidSpan { start: usize, end: usize, len: usize },

    /// Spans handed to the rewriter are not sorted descending
    #[error("Spans out of order at {start}..{end}; expected descending (start, end)")]
    Unordered { start: usize, end: usize },
}

impl MaskError {
    pub fn overlap(first: (usize, usize), second: (usize, usize)) -> Self {
        Self::Overlap {
            first_start: first.0,
            first_end: first.1,
            second_start: second.0,
            second_end: second.1,
        }
    }
}
