use serde::Serialize;
use chrono::{DateTime, Utc};

use crate::digest::{Digest, SummarizedPaper};
use crate::topics::TopicSelection;

/// Form or query-string pairs as submitted, e.g. `topics=Arxiv+CV&topics=JMLR`.
/// Kept as raw pairs because `topics` repeats.
pub type FormPairs = Vec<(String, String)>;

pub fn selection_from_pairs(pairs: &FormPairs) -> TopicSelection {
    TopicSelection::from_labels(
        pairs
            .iter()
            .filter(|(key, _)| key == "topics")
            .map(|(_, value)| value.as_str()),
    )
}

#[derive(Serialize)]
pub struct DigestResponse {
    pub selected_topics: Vec<&'static str>,
    pub arxiv_papers: Vec<SummarizedPaper>,
    pub jmlr_papers: Vec<SummarizedPaper>,
    pub paper_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl From<Digest> for DigestResponse {
    fn from(digest: Digest) -> Self {
        let paper_count = digest.arxiv_papers.len() + digest.jmlr_papers.len();
        Self {
            selected_topics: digest.selected_topics,
            arxiv_papers: digest.arxiv_papers,
            jmlr_papers: digest.jmlr_papers,
            paper_count,
            generated_at: Utc::now(),
        }
    }
}
