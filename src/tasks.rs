//! Async task management for non-blocking page fetches.
//!
//! The UI loop never awaits network calls. Instead:
//! 1. The pager hands the app a [`PageRequest`]
//! 2. The main loop passes it to [`TaskSpawner::spawn_fetch_page`]
//! 3. A tokio task runs the fetch and sends an [`ApiMessage`] back
//! 4. The main loop drains the channel with `try_recv()` and resolves the pager

use std::future::Future;

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{ApiError, MojiraClient};
use crate::error::AppError;
use crate::pager::{FetchError, Page, PageKey, PageRequest, PageResponse};

/// Messages sent from background tasks to the main event loop.
#[derive(Debug)]
pub enum ApiMessage {
    /// A page fetch finished (successfully or not).
    PageFetched(PageResponse),
}

/// Something that can fetch one page of search results.
pub trait PageSource: Clone + Send + Sync + 'static {
    fn fetch_page(&self, key: PageKey) -> impl Future<Output = Result<Page, ApiError>> + Send;
}

impl PageSource for MojiraClient {
    async fn fetch_page(&self, key: PageKey) -> Result<Page, ApiError> {
        MojiraClient::fetch_page(self, &key).await
    }
}

impl From<ApiError> for FetchError {
    fn from(error: ApiError) -> Self {
        let error = AppError::from(error);
        if error.is_recoverable() {
            FetchError::new(error.user_message())
        } else {
            FetchError::permanent(error.user_message())
        }
    }
}

/// Spawns background fetches for pager requests.
#[derive(Clone)]
pub struct TaskSpawner<S> {
    tx: mpsc::UnboundedSender<ApiMessage>,
    source: S,
}

impl<S: PageSource> TaskSpawner<S> {
    /// Create a new TaskSpawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<ApiMessage>, source: S) -> Self {
        Self { tx, source }
    }

    /// Spawn a task to fetch the requested page.
    pub fn spawn_fetch_page(&self, request: PageRequest) {
        let tx = self.tx.clone();
        let source = self.source.clone();
        tokio::spawn(async move {
            debug!(page = request.key.page, generation = request.generation, "Fetching page");
            let result = source
                .fetch_page(request.key.clone())
                .await
                .map_err(|e| {
                    debug!(error = %e, "Page fetch error");
                    FetchError::from(e)
                });
            let _ = tx.send(ApiMessage::PageFetched(PageResponse::for_request(
                &request, result,
            )));
        });
    }
}

/// Create a new task channel and spawner.
///
/// Returns a tuple of (receiver, spawner). The receiver should be polled
/// in the main event loop, and the spawner should be used to spawn tasks.
pub fn create_task_channel<S: PageSource>(
    source: S,
) -> (mpsc::UnboundedReceiver<ApiMessage>, TaskSpawner<S>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(tx, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::IssueFields;
    use crate::api::Issue;
    use crate::pager::Pager;
    use crate::query::QueryKey;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Serves `total` synthetic issues, or fails every call.
    #[derive(Clone)]
    struct FakeSource {
        total: usize,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn new(total: usize) -> Self {
            Self {
                total,
                fail: false,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(0)
            }
        }
    }

    impl PageSource for FakeSource {
        async fn fetch_page(&self, key: PageKey) -> Result<Page, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ApiError::RateLimited);
            }
            let request = key.search_request();
            let start = request.start_at as usize;
            let end = (start + request.max_results as usize).min(self.total);
            let issues = (start..end.max(start))
                .map(|n| Issue {
                    key: format!("{}-{}", key.query.project, n),
                    fields: IssueFields {
                        summary: format!("Issue {}", n),
                        ..Default::default()
                    },
                })
                .collect();
            Ok(Page {
                number: key.page,
                issues,
                request,
            })
        }
    }

    fn key() -> QueryKey {
        QueryKey {
            project: "MC".to_string(),
            filter: "all".to_string(),
            sort_field: "created".to_string(),
            sort_ascending: false,
            advanced: false,
            search: String::new(),
        }
    }

    async fn round_trip<S: PageSource>(
        pager: &mut Pager,
        spawner: &TaskSpawner<S>,
        rx: &mut mpsc::UnboundedReceiver<ApiMessage>,
        request: PageRequest,
    ) -> Option<PageRequest> {
        spawner.spawn_fetch_page(request);
        match rx.recv().await {
            Some(ApiMessage::PageFetched(response)) => pager.resolve(response),
            None => panic!("channel closed"),
        }
    }

    #[tokio::test]
    async fn test_pages_flow_through_channel() {
        let source = FakeSource::new(30);
        let (mut rx, spawner) = create_task_channel(source.clone());
        let mut pager = Pager::new();

        let first = pager.set_key(Some(key())).unwrap();
        round_trip(&mut pager, &spawner, &mut rx, first).await;
        assert_eq!(pager.issue_count(), 25);
        assert!(!pager.is_reaching_end());

        let second = pager.load_more().unwrap();
        round_trip(&mut pager, &spawner, &mut rx, second).await;
        assert_eq!(pager.issue_count(), 30);
        assert!(pager.is_reaching_end());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_error_reaches_pager() {
        let (mut rx, spawner) = create_task_channel(FakeSource::failing());
        let mut pager = Pager::new();

        let first = pager.set_key(Some(key())).unwrap();
        round_trip(&mut pager, &spawner, &mut rx, first).await;

        let error = pager.error().expect("error should be recorded");
        assert!(error.message().contains("Too many requests"));
        assert!(!pager.is_loading_more());
    }

    #[test]
    fn test_fetch_error_from_api_error() {
        let error = FetchError::from(ApiError::Forbidden);
        assert!(error.message().contains("Access denied"));
        assert!(!error.is_retryable());

        let error = FetchError::from(ApiError::ServerError("HTTP 502".to_string()));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_spawn_inside_runtime() {
        let source = FakeSource::new(3);
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (mut rx, spawner) = create_task_channel(source);
        let mut pager = Pager::new();
        let request = pager.set_key(Some(key())).unwrap();

        runtime.block_on(async { spawner.spawn_fetch_page(request) });
        let message = tokio_test::block_on(rx.recv());

        match message {
            Some(ApiMessage::PageFetched(response)) => {
                assert_eq!(response.page, 1);
                pager.resolve(response);
            }
            None => panic!("channel closed"),
        }
        assert_eq!(pager.issue_count(), 3);
        assert!(pager.is_reaching_end());
    }
}
