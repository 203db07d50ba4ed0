//! Single-flight artwork fetch sequencer
//!
//! Requests are consumed by one spawned sequencer task in arrival order;
//! outcomes fan out on a broadcast stream so every caller waiting on the same
//! URL is satisfied by the single network fetch. An in-flight registry keeps
//! concurrent cold-miss callers for one URL attached to the same pending
//! fetch instead of racing the network.

use bytes::Bytes;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{ArtworkCache, ArtworkImage};
use bridge_http::HttpClient;

/// Broadcast capacity for completed fetches; waiters that lag simply keep
/// listening for their own URL.
const RESULT_CHANNEL_CAPACITY: usize = 256;

/// One queued fetch: the URL and its already-running network task.
struct FetchJob {
    url: String,
    task: JoinHandle<bridge_http::Result<Bytes>>,
}

/// Outcome published for every settled fetch; `image` is `None` on failure.
#[derive(Debug, Clone)]
struct FetchOutcome {
    url: String,
    image: Option<ArtworkImage>,
}

/// Single-flight, cache-backed artwork retrieval
///
/// Shared process-wide; clone the `Arc` into every cell that needs artwork.
pub struct ArtworkFetcher {
    http_client: Arc<dyn HttpClient>,
    cache: Arc<Mutex<ArtworkCache>>,
    in_flight: Arc<Mutex<HashSet<String>>>,
    queue: mpsc::UnboundedSender<FetchJob>,
    results: broadcast::Sender<FetchOutcome>,
}

impl ArtworkFetcher {
    /// Create a fetcher with the given cache byte budget and spawn its
    /// sequencer task. The sequencer exits when the fetcher is dropped.
    pub fn new(http_client: Arc<dyn HttpClient>, cache_budget_bytes: usize) -> Arc<Self> {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let (results_tx, _) = broadcast::channel(RESULT_CHANNEL_CAPACITY);
        let cache = Arc::new(Mutex::new(ArtworkCache::new(cache_budget_bytes)));
        let in_flight = Arc::new(Mutex::new(HashSet::new()));

        tokio::spawn(run_sequencer(
            queue_rx,
            Arc::clone(&cache),
            Arc::clone(&in_flight),
            results_tx.clone(),
        ));

        Arc::new(Self {
            http_client,
            cache,
            in_flight,
            queue: queue_tx,
            results: results_tx,
        })
    }

    /// Fetch artwork for a URL, suspending until the fetch settles.
    ///
    /// Returns `None` for an absent URL, a failed fetch, or an undecodable
    /// payload. Cache hits return immediately without touching the network;
    /// a URL already in flight attaches to the pending fetch.
    pub async fn fetch(&self, url: Option<&str>) -> Option<ArtworkImage> {
        let url = url?;

        if let Some(image) = self.cache.lock().await.get(url) {
            return Some(image);
        }

        // Subscribe before registering so this caller cannot miss its own
        // outcome on the result stream.
        let mut results = self.results.subscribe();

        {
            let mut in_flight = self.in_flight.lock().await;
            if !in_flight.contains(url) {
                // The sequencer may have settled this URL since the miss above.
                if let Some(image) = self.cache.lock().await.get(url) {
                    return Some(image);
                }

                in_flight.insert(url.to_string());
                let http_client = Arc::clone(&self.http_client);
                let target = url.to_string();
                let task = tokio::spawn(async move { http_client.get_bytes(&target).await });

                if self
                    .queue
                    .send(FetchJob {
                        url: url.to_string(),
                        task,
                    })
                    .is_err()
                {
                    in_flight.remove(url);
                    return None;
                }
            }
        }

        loop {
            match results.recv().await {
                Ok(outcome) if outcome.url == url => return outcome.image,
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    debug!(missed, "Artwork result stream lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Current cache (item count, total bytes)
    pub async fn cache_stats(&self) -> (usize, usize) {
        self.cache.lock().await.stats()
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }
}

/// Sequencer loop: awaits each queued fetch in arrival order, stores
/// successes in the cache, and publishes every settled outcome.
async fn run_sequencer(
    mut queue: mpsc::UnboundedReceiver<FetchJob>,
    cache: Arc<Mutex<ArtworkCache>>,
    in_flight: Arc<Mutex<HashSet<String>>>,
    results: broadcast::Sender<FetchOutcome>,
) {
    while let Some(job) = queue.recv().await {
        let image = match job.task.await {
            Ok(Ok(bytes)) => decode_and_store(&job.url, bytes, &cache).await,
            Ok(Err(err)) if err.is_cancelled() => {
                debug!(url = %job.url, "Artwork fetch superseded");
                None
            }
            Ok(Err(err)) => {
                warn!(url = %job.url, error = %err, "Artwork fetch failed");
                None
            }
            Err(err) if err.is_cancelled() => {
                debug!(url = %job.url, "Artwork fetch task cancelled");
                None
            }
            Err(err) => {
                warn!(url = %job.url, error = %err, "Artwork fetch task panicked");
                None
            }
        };

        in_flight.lock().await.remove(&job.url);
        results
            .send(FetchOutcome {
                url: job.url,
                image,
            })
            .ok();
    }
}

async fn decode_and_store(
    url: &str,
    bytes: Bytes,
    cache: &Arc<Mutex<ArtworkCache>>,
) -> Option<ArtworkImage> {
    match image::load_from_memory(&bytes) {
        Ok(decoded) => {
            let image = ArtworkImage {
                width: decoded.width(),
                height: decoded.height(),
                bytes,
            };
            cache.lock().await.insert(url.to_string(), image.clone());
            debug!(url = %url, width = image.width, height = image.height, "Cached artwork");
            Some(image)
        }
        Err(err) => {
            warn!(url = %url, error = %err, "Failed to decode artwork");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_http::{BridgeError, HttpRequest, HttpResponse};
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    fn encode_test_image() -> Bytes {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            4,
            4,
            image::Rgb([10, 20, 30]),
        ));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        Bytes::from(buffer)
    }

    /// Test transport that counts requests and can hold them until released.
    struct GatedHttp {
        calls: AtomicUsize,
        gate: Option<Semaphore>,
        response: Box<dyn Fn() -> bridge_http::Result<HttpResponse> + Send + Sync>,
    }

    impl GatedHttp {
        fn ok(body: Bytes) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: None,
                response: Box::new(move || {
                    Ok(HttpResponse {
                        status: 200,
                        headers: HashMap::new(),
                        body: body.clone(),
                    })
                }),
            }
        }

        fn gated(body: Bytes) -> Self {
            let mut http = Self::ok(body);
            http.gate = Some(Semaphore::new(0));
            http
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: None,
                response: Box::new(|| Err(BridgeError::Network("unreachable".to_string()))),
            }
        }

        fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.add_permits(16);
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpClient for GatedHttp {
        async fn execute(&self, _request: HttpRequest) -> bridge_http::Result<HttpResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                let _permit = gate.acquire().await;
            }
            (self.response)()
        }
    }

    #[tokio::test]
    async fn test_absent_url_returns_none() {
        let http = Arc::new(GatedHttp::ok(encode_test_image()));
        let fetcher = ArtworkFetcher::new(http.clone(), 1024 * 1024);

        assert!(fetcher.fetch(None).await.is_none());
        assert_eq!(http.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_decodes_and_caches() {
        let http = Arc::new(GatedHttp::ok(encode_test_image()));
        let fetcher = ArtworkFetcher::new(http.clone(), 1024 * 1024);

        let image = fetcher.fetch(Some("https://img/a")).await.unwrap();
        assert_eq!(image.width, 4);
        assert_eq!(image.height, 4);

        // Second fetch is served from the cache.
        let again = fetcher.fetch(Some("https://img/a")).await.unwrap();
        assert_eq!(again, image);
        assert_eq!(http.call_count(), 1);

        let (items, bytes) = fetcher.cache_stats().await;
        assert_eq!(items, 1);
        assert_eq!(bytes, image.cost());
    }

    #[tokio::test]
    async fn test_concurrent_cold_fetches_share_one_request() {
        let http = Arc::new(GatedHttp::gated(encode_test_image()));
        let fetcher = ArtworkFetcher::new(http.clone(), 1024 * 1024);

        let first = tokio::spawn({
            let fetcher = Arc::clone(&fetcher);
            async move { fetcher.fetch(Some("https://img/a")).await }
        });
        let second = tokio::spawn({
            let fetcher = Arc::clone(&fetcher);
            async move { fetcher.fetch(Some("https://img/a")).await }
        });

        // Wait until the single network call is in flight, then release it.
        while http.call_count() == 0 {
            tokio::task::yield_now().await;
        }
        tokio::task::yield_now().await;
        http.release();

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(http.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_resolves_none() {
        let http = Arc::new(GatedHttp::failing());
        let fetcher = ArtworkFetcher::new(http.clone(), 1024 * 1024);

        assert!(fetcher.fetch(Some("https://img/a")).await.is_none());
        assert_eq!(fetcher.cache_stats().await, (0, 0));

        // A failed URL is retried on the next request.
        assert!(fetcher.fetch(Some("https://img/a")).await.is_none());
        assert_eq!(http.call_count(), 2);
    }

    #[tokio::test]
    async fn test_undecodable_payload_resolves_none() {
        let http = Arc::new(GatedHttp::ok(Bytes::from_static(b"not an image")));
        let fetcher = ArtworkFetcher::new(http.clone(), 1024 * 1024);

        assert!(fetcher.fetch(Some("https://img/a")).await.is_none());
        assert_eq!(fetcher.cache_stats().await, (0, 0));
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let http = Arc::new(GatedHttp::ok(encode_test_image()));
        let fetcher = ArtworkFetcher::new(http.clone(), 1024 * 1024);

        fetcher.fetch(Some("https://img/a")).await.unwrap();
        fetcher.clear_cache().await;
        assert_eq!(fetcher.cache_stats().await, (0, 0));
    }
}
