//! The seam between the orchestrator and the candidate strategies.

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::StoreResult;
use crate::types::{CandidateSet, CandidateSource};

/// A way of deriving recommendation candidates for a user.
///
/// The orchestrator and merger only see this trait, so the co-occurrence
/// heuristic behind the collaborative slot can be replaced by a real
/// similarity model without touching them.
#[async_trait]
pub trait CandidateStrategy: Send + Sync {
    /// Returns the name of this strategy (for logging)
    fn name(&self) -> &str;

    /// Which slot this strategy fills
    fn source(&self) -> CandidateSource;

    /// Derive candidates for `user_id`.
    ///
    /// An empty set means "no signal" and is not an error.
    async fn candidates(&self, ctx: &RequestContext, user_id: &str) -> StoreResult<CandidateSet>;
}
