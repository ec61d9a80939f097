use crate::domain::entities::criteria::Criteria;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Message(String),
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoError::Message(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for RepoError {}

/// Query layer a grid reads from. Connections are the implementation's
/// business; callers only hand over criteria.
pub trait GridRepository<R>: Send + Sync {
    /// Fails when the backing source cannot be queried as a table.
    fn validate(&self) -> Result<(), RepoError>;

    fn count(&self, criteria: &Criteria) -> Result<i64, RepoError>;
    fn find_all(&self, criteria: &Criteria) -> Result<Vec<R>, RepoError>;
}
