//! Memoized feed builds.
//!
//! Every pipeline stage is pure, so a build can be cached under a structural
//! signature of its inputs. Two levels are kept: the normalized sequence
//! (keyed by the sources alone) and the finished view model (keyed by the
//! sources plus all UI options). A search-box keystroke therefore only
//! re-runs filter/arrange/gate over the cached normalized items.

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::item::UnifiedContentItem;
use super::normalize::normalize;
use super::view_model::{build_feed_from_normalized, FeedOptions, FeedViewModel};
use crate::domain::SourceCollections;

/// SHA-256 signature of any serializable input, hex encoded
pub fn signature<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let bytes = serde_json::to_vec(value)?;
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    Ok(hex::encode(hasher.finalize()))
}

/// Signature of the sources only
pub fn source_signature(sources: &SourceCollections) -> serde_json::Result<String> {
    signature(sources)
}

/// Signature of everything a build depends on
pub fn feed_signature(sources_sig: &str, options: &FeedOptions) -> serde_json::Result<String> {
    signature(&(sources_sig, options))
}

/// Cache key for a signature result. `None` never matches, so a failed
/// signature forces a rebuild instead of sharing a key.
fn cache_key(sig: serde_json::Result<String>) -> Option<String> {
    sig.map_err(|e| warn!("Cannot sign feed inputs, bypassing memo: {}", e)).ok()
}

fn same_key(cached: &Option<String>, current: &Option<String>) -> bool {
    matches!((cached, current), (Some(a), Some(b)) if a == b)
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    /// Builds served from the cached view model
    pub hits: u64,

    /// Builds that re-ran filter/arrange/gate
    pub misses: u64,

    /// Times the sources were re-normalized
    pub normalizations: u64,
}

/// Cache of the last build
#[derive(Debug, Default)]
pub struct FeedMemo {
    normalized: Option<(Option<String>, Vec<UnifiedContentItem>)>,
    feed: Option<(Option<String>, FeedViewModel)>,
    stats: MemoStats,
}

impl FeedMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the feed, reusing whatever the inputs allow
    pub fn build(&mut self, sources: &SourceCollections, options: &FeedOptions) -> &FeedViewModel {
        let sources_sig = cache_key(source_signature(sources));
        let feed_sig = sources_sig
            .as_deref()
            .and_then(|sig| cache_key(feed_signature(sig, options)));

        let fresh = matches!(&self.feed, Some((sig, _)) if same_key(sig, &feed_sig));
        if fresh {
            self.stats.hits += 1;
            debug!("Feed memo hit");
        } else {
            self.stats.misses += 1;
            self.feed = None;

            let reusable =
                matches!(&self.normalized, Some((sig, _)) if same_key(sig, &sources_sig));
            if !reusable {
                self.stats.normalizations += 1;
                debug!("Sources changed, re-normalizing");
                self.normalized = Some((sources_sig, normalize(sources)));
            }
        }

        let normalized = self
            .normalized
            .as_ref()
            .map(|(_, items)| items.as_slice())
            .unwrap_or_default();
        let (_, feed) = self
            .feed
            .get_or_insert_with(|| (feed_sig, build_feed_from_normalized(normalized, options)));
        feed
    }

    pub fn stats(&self) -> MemoStats {
        self.stats
    }

    /// Drop all cached state
    pub fn clear(&mut self) {
        self.normalized = None;
        self.feed = None;
    }
}
