use deid_graph::GraphError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PipelineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Failure of the external classifier for one text.
///
/// Recoverable: the orchestrator records it on the affected record and keeps
/// processing the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{classifier} classifier failed: {message}")]
pub struct ClassifierError {
    pub classifier: String,
    pub message: String,
}

impl ClassifierError {
    pub fn new(classifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            classifier: classifier.into(),
            message: message.into(),
        }
    }
}
