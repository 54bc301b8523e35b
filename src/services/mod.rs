//! External collaborators: cat pictures, stock quotes, text completion.
//!
//! Each one is a single-method trait with a thin HTTP implementation.
//! Handlers treat any error the same way, by substituting a fixed fallback
//! text, so the implementations just propagate whatever went wrong.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::texts;

/// Source of random cat images.
#[async_trait]
pub trait CatService: Send + Sync {
    async fn random_cat_url(&self) -> Result<String>;
}

/// Source of live market quotes.
#[async_trait]
pub trait TickerService: Send + Sync {
    async fn price(&self, symbol: &str) -> Result<f64>;
}

/// Text-generation backend for the ask trigger.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// The service set handlers receive.
#[derive(Clone)]
pub struct Services {
    pub cats: Arc<dyn CatService>,
    pub ticker: Arc<dyn TickerService>,
    pub completions: Arc<dyn CompletionService>,
}

impl Services {
    /// Production wiring over one shared HTTP client.
    pub fn http(openai_api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            cats: Arc::new(TheCatApi::new(client.clone())),
            ticker: Arc::new(YahooTicker::new(client.clone())),
            completions: Arc::new(OpenAiCompletions::new(client, openai_api_key)),
        })
    }
}

/// thecatapi.com image search.
pub struct TheCatApi {
    client: reqwest::Client,
}

impl TheCatApi {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct CatImage {
    url: String,
}

#[async_trait]
impl CatService for TheCatApi {
    async fn random_cat_url(&self) -> Result<String> {
        let images: Vec<CatImage> = self
            .client
            .get("https://api.thecatapi.com/v1/images/search")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        images
            .into_iter()
            .next()
            .map(|image| image.url)
            .context("cat API returned an empty result")
    }
}

/// Yahoo Finance chart endpoint, metadata only.
pub struct YahooTicker {
    client: reqwest::Client,
}

impl YahooTicker {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    result: Vec<ChartResult>,
}

#[derive(Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: f64,
}

#[async_trait]
impl TickerService for YahooTicker {
    async fn price(&self, symbol: &str) -> Result<f64> {
        let url = format!("https://query1.finance.yahoo.com/v8/finance/chart/{symbol}");
        let response: ChartResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .chart
            .result
            .first()
            .map(|r| r.meta.regular_market_price)
            .with_context(|| format!("no quote data for {symbol}"))
    }
}

/// OpenAI legacy completions endpoint.
///
/// The credential is taken once from the config at startup. Without one,
/// every call errors and the ask handler falls back to its apology text.
pub struct OpenAiCompletions {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl OpenAiCompletions {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

#[async_trait]
impl CompletionService for OpenAiCompletions {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .context("OPENAI_API_KEY is not configured")?;

        let response: CompletionResponse = self
            .client
            .post("https://api.openai.com/v1/completions")
            .bearer_auth(api_key)
            .json(&json!({
                "model": texts::GPT_MODEL,
                "prompt": prompt,
                "max_tokens": 50,
                "temperature": 0.0,
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text.trim().to_string())
            .context("completion returned no choices")?;

        Ok(text)
    }
}
