use serde::Serialize;

// ---------------------------------------------------------------------------
// DatasetError – every failure the store, inspector and renderers surface
// ---------------------------------------------------------------------------

/// Errors raised by the dataset layer.
///
/// Callers translate [`ErrorKind`] into their own status codes; the layer
/// itself never retries.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`DatasetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Parse,
    Render,
    Io,
}

pub type Result<T> = std::result::Result<T, DatasetError>;

impl DatasetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DatasetError::InvalidInput(_) => ErrorKind::InvalidInput,
            DatasetError::NotFound(_) => ErrorKind::NotFound,
            DatasetError::Parse(_) => ErrorKind::Parse,
            DatasetError::Render(_) => ErrorKind::Render,
            DatasetError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Reader/writer I/O failures stay `Io`; everything else the csv crate
/// reports is a malformed table.
impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => DatasetError::Io(io),
            _ => DatasetError::Parse(message),
        }
    }
}

impl From<image::ImageError> for DatasetError {
    fn from(err: image::ImageError) -> Self {
        DatasetError::Render(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// ErrorReport – serializable failure object handed to callers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    pub detail: String,
}

impl From<&DatasetError> for ErrorReport {
    fn from(err: &DatasetError) -> Self {
        let detail = match err {
            DatasetError::Io(io) => format!("{:?}", io.kind()),
            _ => "No details".to_string(),
        };
        ErrorReport {
            kind: err.kind(),
            message: err.to_string(),
            detail,
        }
    }
}
