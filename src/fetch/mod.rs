pub mod messages;

use crate::api::{self, HttpRecommender, RecommendationSet, RecommendationSource, Source};
use crate::config::{Config, ConfigError};
use messages::{CycleResult, FetchSender};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Identifies one fetch cycle. Later cycles get larger numbers.
pub type Generation = u64;

/// Why a fetch cycle produced no results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("{recommender} request failed: {reason}")]
    Network {
        recommender: Source,
        reason: String,
        timed_out: bool,
    },

    #[error("{recommender} response could not be decoded: {reason}")]
    Decode { recommender: Source, reason: String },
}

impl FetchError {
    pub fn network(recommender: Source, err: &reqwest::Error) -> Self {
        Self::Network {
            recommender,
            reason: err.to_string(),
            timed_out: err.is_timeout(),
        }
    }

    pub fn recommender(&self) -> Source {
        match self {
            Self::Network { recommender, .. } | Self::Decode { recommender, .. } => *recommender,
        }
    }

    /// Network trouble may clear up; a malformed body will not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Short message for the status bar.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network {
                recommender,
                timed_out: true,
                ..
            } => format!("{} recommender timed out", recommender.title()),
            Self::Network { recommender, .. } => {
                format!("Could not reach the {} recommender", recommender.title())
            }
            Self::Decode { recommender, .. } => {
                format!("{} recommender sent an unreadable reply", recommender.title())
            }
        }
    }
}

/// Hands out cycle generations and remembers the newest one.
///
/// Only the newest cycle's outcome may touch the view, so a slow response
/// from an older cycle can never overwrite a newer one.
#[derive(Debug, Default)]
pub struct CycleTracker {
    latest: Generation,
}

impl CycleTracker {
    pub fn begin(&mut self) -> Generation {
        self.latest += 1;
        self.latest
    }

    /// Retire every outstanding cycle without starting a new one.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.latest
    }

    pub fn latest(&self) -> Generation {
        self.latest
    }
}

/// Query both live recommenders for `item_id`.
///
/// The two requests run concurrently and both are awaited to completion
/// before anything is returned. If either fails the whole cycle fails; the
/// `azure` list is always empty.
pub async fn fetch_recommendations<C, T>(
    collaborative: &C,
    content: &T,
    item_id: &str,
) -> Result<RecommendationSet, FetchError>
where
    C: RecommendationSource + ?Sized,
    T: RecommendationSource + ?Sized,
{
    tracing::debug!(
        item_id,
        first = %collaborative.source(),
        second = %content.source(),
        "starting fetch cycle"
    );
    let (collaborative, content) = futures_util::future::join(
        collaborative.recommend(item_id),
        content.recommend(item_id),
    )
    .await;

    if let (Err(first), Err(second)) = (&collaborative, &content) {
        tracing::warn!(%first, %second, "both recommenders failed");
    }

    let collaborative = collaborative?;
    let content = content?;
    tracing::debug!(?content, "content-based response");

    Ok(RecommendationSet {
        collaborative,
        content,
        azure: Vec::new(),
    })
}

/// The pair of live recommenders a fetch cycle queries.
#[derive(Clone)]
pub struct Recommenders {
    pub collaborative: Arc<dyn RecommendationSource>,
    pub content: Arc<dyn RecommendationSource>,
}

impl Recommenders {
    pub fn new(
        collaborative: Arc<dyn RecommendationSource>,
        content: Arc<dyn RecommendationSource>,
    ) -> Self {
        Self {
            collaborative,
            content,
        }
    }

    /// HTTP recommenders at the endpoints named by `config`.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let client = api::build_client(config.request_timeout()).map_err(ConfigError::Client)?;
        let live = |source: Source| {
            HttpRecommender::from_config(client.clone(), config, source)
                .map(Arc::new)
                .ok_or(ConfigError::NoEndpoint(source))
        };
        let collaborative = live(Source::Collaborative)?;
        let content = live(Source::Content)?;
        tracing::info!(
            collaborative = collaborative.url(),
            content = content.url(),
            "recommender endpoints configured"
        );
        Ok(Self::new(collaborative, content))
    }

    pub async fn fetch(&self, item_id: &str) -> Result<RecommendationSet, FetchError> {
        fetch_recommendations(self.collaborative.as_ref(), self.content.as_ref(), item_id).await
    }
}

/// Run one cycle in the background and post its outcome to `tx`.
pub fn spawn_cycle(
    recommenders: Recommenders,
    generation: Generation,
    item_id: String,
    tx: FetchSender,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = recommenders.fetch(&item_id).await;
        let result = CycleResult {
            generation,
            item_id,
            outcome,
        };
        if tx.send(result).is_err() {
            tracing::debug!(generation, "UI closed before fetch cycle finished");
        }
    })
}
