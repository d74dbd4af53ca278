//! Abstract → summary, through the cache first and the AI service second.
//!
//! [`Summarizer::get_summary`] never fails. Quota errors are retried on the
//! [`RetryPolicy`] schedule; any other failure gives up at once. Both end in
//! [`QUOTA_EXCEEDED`], which is never cached.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::cache::SummaryCache;
use crate::llm::{GenerateError, SummaryGenerator};
use crate::retry::RetryPolicy;

/// Returned (and cached) when the service answers without any text.
pub const NO_SUMMARY: &str = "Summary not available.";

/// Returned when no summary could be generated. Not cached.
pub const QUOTA_EXCEEDED: &str = "Daily API quota exceeded. Try again later!";

pub fn build_prompt(abstract_text: &str) -> String {
    let mut result = String::with_capacity(abstract_text.len() + 128);
    result.push_str("Summarize this research paper and provide key ideas and main points. Include key mathematical ideas or results as well:\n");
    result.push_str(abstract_text);
    result.push_str("\n\n.");
    result
}

pub struct Summarizer {
    cache: SummaryCache,
    generator: Arc<dyn SummaryGenerator>,
    retry: RetryPolicy,
}

impl Summarizer {
    pub fn new(cache: SummaryCache, generator: Arc<dyn SummaryGenerator>, retry: RetryPolicy) -> Self {
        Self { cache, generator, retry }
    }

    pub fn cache(&self) -> &SummaryCache {
        &self.cache
    }

    pub async fn get_summary(&self, abstract_text: &str) -> String {
        if abstract_text.trim().is_empty() {
            return NO_SUMMARY.to_string();
        }

        if let Some(hit) = self.cache.get(abstract_text).await {
            debug!("summary cache hit");
            return hit;
        }

        let prompt = build_prompt(abstract_text);
        let summary = match self.generate_with_retry(&prompt).await {
            Ok(text) => text.unwrap_or_else(|| NO_SUMMARY.to_string()),
            Err(e) if e.is_quota() => {
                warn!("giving up after {} attempts: {}", self.retry.max_attempts, e);
                return QUOTA_EXCEEDED.to_string();
            }
            Err(e) => {
                error!("summary generation failed: {}", e);
                return QUOTA_EXCEEDED.to_string();
            }
        };

        if let Err(e) = self.cache.insert(abstract_text, &summary).await {
            warn!(path = %self.cache.path().display(), "failed to persist summary cache: {}", e);
        }
        summary
    }

    /// Wipes the cache, used at the start of a page request when the reset
    /// policy is on.
    pub async fn reset_cache(&self) {
        if let Err(e) = self.cache.reset().await {
            warn!(path = %self.cache.path().display(), "failed to reset summary cache: {}", e);
        }
    }

    async fn generate_with_retry(&self, prompt: &str) -> Result<Option<String>, GenerateError> {
        let mut attempt = 0;
        loop {
            match self.generator.generate(prompt).await {
                Ok(text) => {
                    info!(attempt = attempt + 1, "summary generated");
                    return Ok(text);
                }
                Err(e) if e.is_quota() => {
                    attempt += 1;
                    let Some(delay) = self.retry.delay_before(attempt) else {
                        return Err(e);
                    };
                    warn!("quota exhausted, retrying in {:?} (attempt {} of {})", delay, attempt + 1, self.retry.max_attempts);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
