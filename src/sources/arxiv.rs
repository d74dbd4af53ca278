//! Recent submissions from the arXiv Atom API.
//!
//! The query joins the selected categories as a disjunction and asks for the
//! newest [`MAX_RESULTS`] submissions:
//!
//! ```text
//! {endpoint}?search_query=cat:cs.AI+OR+cat:cs.LG&start=0&max_results=5&sortBy=submittedDate&sortOrder=descending
//! ```

use quick_xml::de::from_str;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::{fetch_text, PaperRecord};
use crate::error::Result;
use crate::topics::TopicSelection;

pub const MAX_RESULTS: usize = 5;

/// Atom feed returned by the arXiv API.
#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    title: String,
    summary: String,
    /// Abstract page URL, e.g. `http://arxiv.org/abs/2301.07041v1`
    #[serde(rename = "id")]
    link: String,
}

pub struct ArxivClient {
    client: Client,
    endpoint: String,
}

impl ArxivClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }

    /// Newest papers across the selected arXiv categories, in feed order.
    /// Returns nothing, without a request, when no arXiv topic is selected.
    pub async fn fetch(&self, selection: &TopicSelection) -> Result<Vec<PaperRecord>> {
        let categories = selection.arxiv_categories();
        if categories.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.query_url(&categories);
        debug!("Fetching from arXiv via: {url}");

        let body = fetch_text(&self.client, &url).await?;
        let papers = parse_feed(&body)?;

        info!(count = papers.len(), categories = %categories.join(","), "fetched arXiv papers");
        Ok(papers)
    }

    fn query_url(&self, categories: &[&str]) -> String {
        format!(
            "{}?search_query={}&start=0&max_results={}&sortBy=submittedDate&sortOrder=descending",
            self.endpoint,
            search_query(categories),
            MAX_RESULTS
        )
    }
}

/// `cat:A+OR+cat:B`, the `+` standing for spaces in the query string.
pub fn search_query(categories: &[&str]) -> String {
    categories
        .iter()
        .map(|c| format!("cat:{c}"))
        .collect::<Vec<_>>()
        .join("+OR+")
}

fn parse_feed(body: &str) -> Result<Vec<PaperRecord>> {
    let feed: Feed = from_str(body)?;
    Ok(feed
        .entries
        .into_iter()
        .map(|entry| PaperRecord {
            title: entry.title,
            summary: entry.summary,
            link: entry.link,
        })
        .collect())
}
