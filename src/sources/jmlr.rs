//! Latest articles from the JMLR RSS feed.

use quick_xml::de::from_str;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::{fetch_text, PaperRecord};
use crate::error::Result;

pub const MAX_ARTICLES: usize = 10;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

/// JMLR puts the abstract in `description`. Items missing a field keep an
/// empty string rather than failing the whole feed.
#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    link: String,
}

pub struct JmlrClient {
    client: Client,
    feed_url: String,
}

impl JmlrClient {
    pub fn new(client: Client, feed_url: impl Into<String>) -> Self {
        Self { client, feed_url: feed_url.into() }
    }

    /// The first [`MAX_ARTICLES`] items of the feed, in feed order.
    pub async fn fetch(&self) -> Result<Vec<PaperRecord>> {
        debug!("Fetching JMLR feed: {}", self.feed_url);

        let body = fetch_text(&self.client, &self.feed_url).await?;
        let articles = parse_feed(&body)?;

        info!(count = articles.len(), "fetched JMLR articles");
        Ok(articles)
    }
}

fn parse_feed(body: &str) -> Result<Vec<PaperRecord>> {
    let rss: Rss = from_str(body)?;
    Ok(rss
        .channel
        .items
        .into_iter()
        .take(MAX_ARTICLES)
        .map(|item| PaperRecord {
            title: item.title,
            summary: item.description,
            link: item.link,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_with(items: usize) -> String {
        let items: String = (1..=items)
            .map(|i| {
                format!(
                    "<item><title>Paper {i}</title><link>https://jmlr.org/papers/v25/{i}.html</link>\
                     <description>Abstract number {i}.</description></item>"
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0"?><rss version="2.0"><channel><title>JMLR</title>
<link>http://www.jmlr.org</link><description>Journal of Machine Learning Research</description>{items}</channel></rss>"#
        )
    }

    #[test]
    fn items_map_to_records() {
        let papers = parse_feed(&feed_with(2)).unwrap();
        assert_eq!(
            papers[0],
            PaperRecord {
                title: "Paper 1".into(),
                summary: "Abstract number 1.".into(),
                link: "https://jmlr.org/papers/v25/1.html".into(),
            }
        );
        assert_eq!(papers[1].title, "Paper 2");
    }

    #[test]
    fn only_the_first_ten_items_are_kept() {
        let papers = parse_feed(&feed_with(14)).unwrap();
        assert_eq!(papers.len(), MAX_ARTICLES);
        assert_eq!(papers.last().unwrap().title, "Paper 10");
    }

    #[test]
    fn item_without_description_has_empty_summary() {
        let body = "<rss><channel><item><title>Bare</title><link>x</link></item></channel></rss>";
        let papers = parse_feed(body).unwrap();
        assert_eq!(papers[0].summary, "");
    }

    #[test]
    fn non_rss_document_is_a_parse_error() {
        assert!(parse_feed("<html><body>maintenance</body></html>").is_err());
    }
}
