//! Candidate types shared by the strategies and the merger.

use catalog::{Film, FilmId};

/// Which strategy produced a candidate set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    /// Interaction co-occurrence
    Collaborative,
    /// Watchlist category overlap, or the global rank fallback
    ContentBased,
}

impl std::fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateSource::Collaborative => write!(f, "collaborative"),
            CandidateSource::ContentBased => write!(f, "content-based"),
        }
    }
}

/// Output of a candidate strategy.
///
/// Some strategies only know film ids and leave hydration to the caller;
/// others read full rows as part of their query.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateSet {
    Ids(Vec<FilmId>),
    Films(Vec<Film>),
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        match self {
            CandidateSet::Ids(ids) => ids.len(),
            CandidateSet::Films(films) => films.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Film ids in candidate order
    pub fn ids(&self) -> Vec<FilmId> {
        match self {
            CandidateSet::Ids(ids) => ids.clone(),
            CandidateSet::Films(films) => films.iter().map(|f| f.id).collect(),
        }
    }
}

impl Default for CandidateSet {
    fn default() -> Self {
        CandidateSet::Ids(Vec::new())
    }
}
