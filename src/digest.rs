//! One request's worth of papers: fetch the selected sources, then summarize
//! every paper in turn.

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::sources::{ArxivClient, JmlrClient, PaperRecord};
use crate::summarizer::Summarizer;
use crate::topics::TopicSelection;

#[derive(Debug, Clone, Serialize)]
pub struct SummarizedPaper {
    pub title: String,
    pub link: String,
    /// Markdown as returned by the AI service.
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub selected_topics: Vec<&'static str>,
    pub arxiv_papers: Vec<SummarizedPaper>,
    pub jmlr_papers: Vec<SummarizedPaper>,
}

pub struct PaperSources {
    pub arxiv: ArxivClient,
    pub jmlr: JmlrClient,
}

impl PaperSources {
    /// Fetches whatever the selection asks for and summarizes it. Fetch
    /// errors abort the whole digest.
    pub async fn collect(&self, selection: &TopicSelection, summarizer: &Summarizer) -> Result<Digest> {
        let arxiv = if selection.wants_arxiv() {
            self.arxiv.fetch(selection).await?
        } else {
            Vec::new()
        };
        let jmlr = if selection.wants_jmlr() {
            self.jmlr.fetch().await?
        } else {
            Vec::new()
        };

        info!(arxiv = arxiv.len(), jmlr = jmlr.len(), "summarizing papers");

        Ok(Digest {
            selected_topics: selection.labels(),
            arxiv_papers: summarize_all(arxiv, summarizer).await,
            jmlr_papers: summarize_all(jmlr, summarizer).await,
        })
    }
}

async fn summarize_all(papers: Vec<PaperRecord>, summarizer: &Summarizer) -> Vec<SummarizedPaper> {
    let mut summarized = Vec::with_capacity(papers.len());
    for paper in papers {
        let summary = summarizer.get_summary(&paper.summary).await;
        summarized.push(SummarizedPaper {
            title: paper.title,
            link: paper.link,
            summary,
        });
    }
    summarized
}
