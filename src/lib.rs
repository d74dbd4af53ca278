pub mod api;
pub mod cache;
pub mod config;
pub mod digest;
pub mod error;
pub mod llm;
pub mod render;
pub mod retry;
pub mod sources;
pub mod summarizer;
pub mod topics;

use std::sync::Arc;
use std::time::Duration;

use cache::SummaryCache;
use config::Config;
use digest::PaperSources;
use llm::{GeminiClient, SummaryGenerator};
use retry::RetryPolicy;
use sources::{ArxivClient, JmlrClient};
use summarizer::Summarizer;

/// Upper bound for a single completion call.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub summarizer: Arc<Summarizer>,
    pub sources: Arc<PaperSources>,
}

impl AppState {
    /// Wires the real Gemini client.
    pub fn new(config: Config) -> error::Result<Self> {
        let client = sources::http_client(GENERATION_TIMEOUT)?;
        let generator = GeminiClient::new(
            client,
            &config.gemini_base_url,
            &config.gemini_model,
            &config.gemini_api_key,
        );
        Self::with_generator(config, Arc::new(generator))
    }

    pub fn with_generator(config: Config, generator: Arc<dyn SummaryGenerator>) -> error::Result<Self> {
        let client = sources::http_client(sources::FEED_TIMEOUT)?;
        let sources = PaperSources {
            arxiv: ArxivClient::new(client.clone(), config.arxiv_endpoint.clone()),
            jmlr: JmlrClient::new(client, config.jmlr_feed_url.clone()),
        };

        let cache = SummaryCache::open(config.cache_path.clone());
        let summarizer = Summarizer::new(cache, generator, RetryPolicy::new(config.retry_unit));

        Ok(AppState {
            config: Arc::new(config),
            summarizer: Arc::new(summarizer),
            sources: Arc::new(sources),
        })
    }
}
