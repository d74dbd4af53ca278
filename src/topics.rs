//! Topic labels offered on the page and the arXiv categories behind them.

use std::collections::HashSet;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    ArxivAi,
    ArxivMl,
    ArxivCv,
    ArxivNn,
    ArxivStatsMl,
    Jmlr,
}

impl Topic {
    /// Every topic, in the order they are shown on the page.
    pub const ALL: [Topic; 6] = [
        Topic::ArxivAi,
        Topic::ArxivMl,
        Topic::ArxivCv,
        Topic::ArxivNn,
        Topic::ArxivStatsMl,
        Topic::Jmlr,
    ];

    /// The form label submitted by the page.
    pub fn label(self) -> &'static str {
        match self {
            Topic::ArxivAi => "Arxiv AI",
            Topic::ArxivMl => "Arxiv ML",
            Topic::ArxivCv => "Arxiv CV",
            Topic::ArxivNn => "Arxiv NN",
            Topic::ArxivStatsMl => "Arxiv StatsML",
            Topic::Jmlr => "JMLR",
        }
    }

    /// arXiv category code, `None` for topics served by another source.
    pub fn arxiv_category(self) -> Option<&'static str> {
        match self {
            Topic::ArxivAi => Some("cs.AI"),
            Topic::ArxivMl => Some("cs.LG"),
            Topic::ArxivCv => Some("cs.CV"),
            Topic::ArxivNn => Some("cs.NE"),
            Topic::ArxivStatsMl => Some("stat.ML"),
            Topic::Jmlr => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Topic> {
        Topic::ALL.into_iter().find(|t| t.label() == label.trim())
    }

    /// Checks the label table once at startup: labels must be unique and
    /// category codes non-empty.
    pub fn validate_table() -> Result<()> {
        let mut seen = HashSet::new();
        for topic in Topic::ALL {
            if !seen.insert(topic.label()) {
                return Err(AppError::ConfigError(format!(
                    "duplicate topic label: {}",
                    topic.label()
                )));
            }
            if topic.arxiv_category().is_some_and(|c| c.trim().is_empty()) {
                return Err(AppError::ConfigError(format!(
                    "empty arXiv category for topic {}",
                    topic.label()
                )));
            }
        }
        Ok(())
    }
}

/// The recognised topics picked on one request, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSelection {
    topics: Vec<Topic>,
}

impl TopicSelection {
    pub fn all() -> Self {
        Self { topics: Topic::ALL.to_vec() }
    }

    /// Builds a selection from submitted labels. An empty submission selects
    /// everything; unknown labels are dropped.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut submitted = 0;
        let picked: HashSet<Topic> = labels
            .into_iter()
            .inspect(|_| submitted += 1)
            .filter_map(|l| Topic::from_label(l.as_ref()))
            .collect();

        if submitted == 0 {
            return Self::all();
        }

        let topics = Topic::ALL.into_iter().filter(|t| picked.contains(t)).collect();
        Self { topics }
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn contains(&self, topic: Topic) -> bool {
        self.topics.contains(&topic)
    }

    pub fn wants_arxiv(&self) -> bool {
        self.topics.iter().any(|t| t.arxiv_category().is_some())
    }

    pub fn wants_jmlr(&self) -> bool {
        self.contains(Topic::Jmlr)
    }

    pub fn arxiv_categories(&self) -> Vec<&'static str> {
        self.topics.iter().filter_map(|t| t.arxiv_category()).collect()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.topics.iter().map(|t| t.label()).collect()
    }
}
