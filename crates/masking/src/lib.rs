//! # Deid Masking
//!
//! Rewrites a text by replacing entity spans with canonical placeholders.
//!
//! ```text
//! LabeledMention[]
//!     │
//!     ├──> Resolution
//!     │      ├─ drop malformed spans (out of bounds, inverted, empty)
//!     │      ├─ exact duplicates: last writer wins in category order
//!     │      ├─ overlaps: reject, or keep by category priority
//!     │      └─ sort descending by (start, end)
//!     │
//!     └──> Rewrite
//!            └─ splice right-to-left so earlier offsets stay valid
//! ```
//!
//! Offsets are character offsets; the rewriter maps them to byte offsets once
//! per text.

mod engine;
mod error;
mod resolve;
mod rewrite;
mod span;

pub use engine::{mask_text, MaskOutcome, MaskingEngine};
pub use error::{MaskError, Result};
pub use resolve::{descending, resolve_spans, Resolution};
pub use rewrite::apply_spans;
pub use span::{DropReason, DroppedSpan, OverlapPolicy, ReplacementSpan};
