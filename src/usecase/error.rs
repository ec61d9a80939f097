use std::fmt;

use crate::usecase::ports::repo::RepoError;

#[derive(Debug)]
pub enum GridError {
    Config(String),
    InvalidRequest(String),
    Repo(RepoError),
    Render(String),
    NonConformingRow { index: usize },
    Serialize(serde_json::Error),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::Config(msg) => write!(f, "grid configuration error: {msg}"),
            GridError::InvalidRequest(msg) => write!(f, "invalid grid request: {msg}"),
            GridError::Repo(e) => write!(f, "query failed: {e}"),
            GridError::Render(msg) => write!(f, "failed to render actions: {msg}"),
            GridError::NonConformingRow { index } => {
                write!(f, "row {index} cannot be projected into grid columns")
            }
            GridError::Serialize(e) => write!(f, "failed to encode grid response: {e}"),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GridError::Repo(e) => Some(e),
            GridError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl GridError {
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            GridError::InvalidRequest(_) => http::StatusCode::BAD_REQUEST,
            GridError::Config(_)
            | GridError::Repo(_)
            | GridError::Render(_)
            | GridError::NonConformingRow { .. }
            | GridError::Serialize(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepoError> for GridError {
    fn from(e: RepoError) -> Self {
        GridError::Repo(e)
    }
}

impl From<serde_json::Error> for GridError {
    fn from(e: serde_json::Error) -> Self {
        GridError::Serialize(e)
    }
}
