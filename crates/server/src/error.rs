use thiserror::Error;

/// Failure of a whole recommendation request.
///
/// Ordinary store errors are absorbed stage by stage; only a store that was
/// unreachable from every stage reaches the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    #[error("store unavailable at every stage: {0}")]
    StoreUnavailable(String),
}
