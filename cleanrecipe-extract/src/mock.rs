//! MVP extractor
//!
//! Probes the submitted link, waits a fixed delay, then returns a constant
//! carbonara draft. Probe failures and timeouts are logged and ignored.

use crate::extractor::RecipeExtractor;
use crate::Result;
use async_trait::async_trait;
use cleanrecipe_common::config::ExtractorSettings;
use cleanrecipe_common::ExtractedRecipe;
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("CleanRecipe/", env!("CARGO_PKG_VERSION"));

const MOCK_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1473093295043-cdd812d0e601?auto=format&fit=crop&w=1200&q=80";

/// Extractor returning fixed content after a bounded reachability probe
#[derive(Debug, Clone)]
pub struct MockRecipeExtractor {
    http_client: reqwest::Client,
    probe_timeout: Duration,
    artificial_delay: Duration,
}

impl MockRecipeExtractor {
    pub fn new(settings: &ExtractorSettings) -> Result<Self> {
        Self::with_timing(settings.probe_timeout(), settings.artificial_delay())
    }

    pub fn with_timing(probe_timeout: Duration, artificial_delay: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http_client,
            probe_timeout,
            artificial_delay,
        })
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    pub fn artificial_delay(&self) -> Duration {
        self.artificial_delay
    }

    /// GET the link once, giving up after `probe_timeout`
    async fn probe(&self, url: &Url) {
        let request = self.http_client.get(url.clone()).send();
        match tokio::time::timeout(self.probe_timeout, request).await {
            Ok(Ok(response)) => debug!("Probe of {} returned {}", url, response.status()),
            Ok(Err(e)) => debug!("Probe of {} failed: {}", url, e),
            Err(_) => debug!("Probe of {} timed out after {:?}", url, self.probe_timeout),
        }
    }
}

#[async_trait]
impl RecipeExtractor for MockRecipeExtractor {
    fn source_id(&self) -> &'static str {
        "Mock"
    }

    async fn extract(&self, url: &Url) -> Result<ExtractedRecipe> {
        self.probe(url).await;
        tokio::time::sleep(self.artificial_delay).await;
        Ok(carbonara(url.as_str()))
    }
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn carbonara(url: &str) -> ExtractedRecipe {
    ExtractedRecipe {
        title: "Pasta Carbonara".to_string(),
        url: url.to_string(),
        image_url: Some(MOCK_IMAGE_URL.to_string()),
        ingredients: lines(&[
            "400 g spaghetti",
            "150 g guanciale lub pancetta",
            "3 żółtka",
            "1 całe jajko",
            "80 g pecorino romano",
            "świeżo mielony pieprz",
            "sól",
        ]),
        steps: lines(&[
            "Ugotuj spaghetti al dente w osolonej wodzie.",
            "Podsmaż pokrojone guanciale do chrupkości.",
            "Wymieszaj żółtka, jajko, ser i pieprz w misce.",
            "Połącz makaron z guanciale poza ogniem.",
            "Dodaj masę jajeczną i wymieszaj energicznie, dodając odrobinę wody z makaronu.",
            "Podawaj od razu z dodatkowym pecorino i pieprzem.",
        ]),
        category: Some("Obiad".to_string()),
        tags: lines(&["włoskie", "makaron", "30 min"]),
        cook_time: Some("30 min".to_string()),
        servings: Some("2-3".to_string()),
    }
}
