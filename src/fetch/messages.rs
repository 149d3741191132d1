use super::{FetchError, Generation};
use crate::api::RecommendationSet;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Outcome of one fetch cycle, sent from its task to the UI loop.
#[derive(Debug, Clone)]
pub struct CycleResult {
    pub generation: Generation,
    pub item_id: String,
    pub outcome: Result<RecommendationSet, FetchError>,
}

/// Sender held by fetch tasks.
pub type FetchSender = UnboundedSender<CycleResult>;

/// Receiver drained by the UI loop on every tick.
pub type FetchReceiver = UnboundedReceiver<CycleResult>;

pub fn channel() -> (FetchSender, FetchReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Take every result that has arrived so far without waiting.
pub fn drain(rx: &mut FetchReceiver) -> Vec<CycleResult> {
    let mut results = Vec::new();
    while let Ok(result) = rx.try_recv() {
        results.push(result);
    }
    results
}
