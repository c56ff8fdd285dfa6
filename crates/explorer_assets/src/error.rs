use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TourError {
    #[error("Malformed tour: {0}")]
    MalformedGraph(String),

    #[error("Scene '{scene}' links to unknown scene '{target}'")]
    DanglingLink { scene: String, target: String },

    #[error("Tour has no scenes")]
    EmptyTour,

    #[error("No scene with id '{0}'")]
    NotFound(String),

    #[error("Hotspot {index} out of range for scene '{scene}' ({count} available)")]
    IndexOutOfRange {
        scene: String,
        index: usize,
        count: usize,
    },
}

impl From<serde_json::Error> for TourError {
    fn from(err: serde_json::Error) -> Self {
        TourError::MalformedGraph(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Tour(#[from] TourError),

    #[error("Asset worker stopped before answering")]
    WorkerGone,

    #[error("No load in flight for handle {0}")]
    UnknownHandle(Uuid),
}
