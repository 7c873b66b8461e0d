//! # Deid Pipeline
//!
//! Batch de-identification of free-text records.
//!
//! ## Architecture
//!
//! ```text
//! Record[]
//!     │
//!     ├──> Classifier (injected; pattern, precomputed, or a model wrapper)
//!     │      └─ RawEntity[] per record, failures isolated per record
//!     │
//!     ├──> Category map + confidence filter
//!     │      └─ Mention[] in consolidated categories
//!     │
//!     ├──> Consolidation, once per category over the whole batch
//!     │      └─ canonical labels such as PersonName2
//!     │
//!     └──> Masking engine, per record
//!            └─ MaskedRecord[] in input order
//! ```
//!
//! ## Example
//!
//! ```rust
//! use deid_pipeline::{Orchestrator, PatternClassifier, PipelineConfig};
//! use deid_protocol::Record;
//!
//! let classifier = PatternClassifier::new().unwrap();
//! let orchestrator = Orchestrator::new(classifier, PipelineConfig::default()).unwrap();
//!
//! let out = orchestrator.process(&[Record::new(1, "call 555-1234 or 555-1234")]);
//! assert_eq!(out[0].text, "call Contact1 or Contact1");
//! ```

mod classifier;
mod config;
mod error;
mod orchestrator;
mod pattern;

pub use classifier::{Classifier, PrecomputedClassifier};
pub use config::{ConsolidationMode, PipelineConfig};
pub use error::{ClassifierError, PipelineError, Result};
pub use orchestrator::{BatchSummary, Orchestrator};
pub use pattern::PatternClassifier;
