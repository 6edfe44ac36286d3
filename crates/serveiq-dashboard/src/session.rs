//! A mounted dashboard view.
//!
//! Mounting issues exactly one fetch. Until it resolves the view is
//! `Loading`; afterwards it is `Ready` with the records, or with an empty list
//! if the fetch failed. Dropping or unmounting the view before the fetch
//! resolves discards the result: nothing is written to the view's state after
//! unmount.

use chrono::TimeZone;
use serveiq_common::InferenceRecord;
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::client::RecordSource;
use crate::error::ClientError;
use crate::render::Renderer;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready(Vec<InferenceRecord>),
}

/// Where a click landed while the detail modal is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed area around the modal; closes it.
    Backdrop,
    /// The modal body; ignored.
    Content,
}

#[derive(Debug, Default)]
struct ViewState {
    load: LoadState,
    selected: Option<usize>,
}

pub struct Dashboard {
    state: Arc<RwLock<ViewState>>,
    mounted: Arc<AtomicBool>,
    fetch: Option<JoinHandle<()>>,
}

impl Dashboard {
    /// Mount the view and start its single fetch.
    pub fn mount(source: Arc<dyn RecordSource>) -> Self {
        let state = Arc::new(RwLock::new(ViewState::default()));
        let mounted = Arc::new(AtomicBool::new(true));

        let fetch = tokio::spawn(load(source, state.clone(), mounted.clone()));

        Self { state, mounted, fetch: Some(fetch) }
    }

    /// Wait for the fetch to resolve.
    pub async fn settle(&mut self) {
        if let Some(fetch) = self.fetch.take() {
            if let Err(e) = fetch.await {
                error!("Dashboard fetch task failed: {}", e);
            }
        }
    }

    /// Unmount the view. Returns the fetch task if it is still running so the
    /// caller can wait for it; its result will be discarded.
    pub fn unmount(mut self) -> Option<JoinHandle<()>> {
        self.mounted.store(false, Ordering::Release);
        self.fetch.take()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub async fn load_state(&self) -> LoadState {
        self.state.read().await.load.clone()
    }

    pub async fn is_loading(&self) -> bool {
        matches!(self.state.read().await.load, LoadState::Loading)
    }

    /// Open the detail modal for the record at `index`. Returns false when
    /// there is no such record.
    pub async fn select(&self, index: usize) -> bool {
        let mut state = self.state.write().await;
        let exists = matches!(&state.load, LoadState::Ready(records) if index < records.len());
        if exists {
            state.selected = Some(index);
        }
        exists
    }

    pub async fn handle_click(&self, target: ClickTarget) {
        if target == ClickTarget::Backdrop {
            self.state.write().await.selected = None;
        }
    }

    pub async fn selected(&self) -> Option<usize> {
        self.state.read().await.selected
    }

    /// Render the current view as a full HTML page.
    pub async fn render<Tz>(&self, renderer: &Renderer, tz: &Tz) -> Result<String, ClientError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let state = self.state.read().await;
        renderer.render_page(&state.load, state.selected, tz)
    }

    /// Render the closing half of the page for the current state.
    pub async fn render_body<Tz>(&self, renderer: &Renderer, tz: &Tz) -> Result<String, ClientError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let state = self.state.read().await;
        renderer.render_body(&state.load, state.selected, tz)
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.mounted.store(false, Ordering::Release);
    }
}

async fn load(source: Arc<dyn RecordSource>, state: Arc<RwLock<ViewState>>, mounted: Arc<AtomicBool>) {
    let records = match source.fetch_recent().await {
        Ok(records) => records,
        Err(e) => {
            error!("Error fetching data: {}", e);
            Vec::new()
        }
    };

    let mut state = state.write().await;
    if !mounted.load(Ordering::Acquire) {
        debug!("Dashboard unmounted, discarding {} records", records.len());
        return;
    }
    state.load = LoadState::Ready(records);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serveiq_test_utils::{record, records};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    struct StubSource {
        result: Result<Vec<InferenceRecord>, u16>,
        release: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn ok(records: Vec<InferenceRecord>) -> Self {
            Self { result: Ok(records), release: None, calls: AtomicUsize::new(0) }
        }

        fn failing(status: u16) -> Self {
            Self { result: Err(status), release: None, calls: AtomicUsize::new(0) }
        }

        fn gated(records: Vec<InferenceRecord>, release: Arc<Notify>) -> Self {
            Self { result: Ok(records), release: Some(release), calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl RecordSource for StubSource {
        async fn fetch_recent(&self) -> Result<Vec<InferenceRecord>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(release) = &self.release {
                release.notified().await;
            }
            self.result.clone().map_err(ClientError::Status)
        }
    }

    #[tokio::test]
    async fn test_mount_fetches_once_and_becomes_ready() {
        let source = Arc::new(StubSource::ok(records(3)));
        let mut dashboard = Dashboard::mount(source.clone());
        assert!(dashboard.is_mounted());
        dashboard.settle().await;

        assert!(dashboard.is_mounted());
        assert!(!dashboard.is_loading().await);
        assert!(matches!(dashboard.load_state().await, LoadState::Ready(r) if r.len() == 3));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_loading_until_fetch_resolves() {
        let release = Arc::new(Notify::new());
        let source = Arc::new(StubSource::gated(records(2), release.clone()));
        let mut dashboard = Dashboard::mount(source);

        assert!(dashboard.is_loading().await);

        release.notify_one();
        dashboard.settle().await;
        assert!(!dashboard.is_loading().await);
    }

    #[tokio::test]
    async fn test_failed_fetch_shows_empty_grid() {
        let mut dashboard = Dashboard::mount(Arc::new(StubSource::failing(500)));
        dashboard.settle().await;

        assert_eq!(dashboard.load_state().await, LoadState::Ready(Vec::new()));
    }

    #[tokio::test]
    async fn test_unmount_before_resolve_discards_result() {
        let release = Arc::new(Notify::new());
        let source = Arc::new(StubSource::gated(records(5), release.clone()));
        let dashboard = Dashboard::mount(source);
        let state = dashboard.state.clone();

        let pending = dashboard.unmount().expect("fetch still running");
        release.notify_one();
        pending.await.expect("fetch task must not panic");

        assert_eq!(state.read().await.load, LoadState::Loading);
    }

    #[tokio::test]
    async fn test_drop_counts_as_unmount() {
        let release = Arc::new(Notify::new());
        let source = Arc::new(StubSource::gated(records(1), release.clone()));
        let dashboard = Dashboard::mount(source.clone());
        let state = dashboard.state.clone();
        let mounted = dashboard.mounted.clone();

        drop(dashboard);
        assert!(!mounted.load(Ordering::Acquire));

        release.notify_one();
        // Let the detached fetch run to completion.
        while Arc::strong_count(&state) > 1 {
            tokio::task::yield_now().await;
        }
        assert_eq!(state.read().await.load, LoadState::Loading);
    }

    #[tokio::test]
    async fn test_modal_selection_and_clicks() {
        let mut dashboard = Dashboard::mount(Arc::new(StubSource::ok(vec![record(1, 10), record(2, 20)])));
        dashboard.settle().await;

        assert!(!dashboard.select(2).await);
        assert_eq!(dashboard.selected().await, None);

        assert!(dashboard.select(1).await);
        dashboard.handle_click(ClickTarget::Content).await;
        assert_eq!(dashboard.selected().await, Some(1));

        dashboard.handle_click(ClickTarget::Backdrop).await;
        assert_eq!(dashboard.selected().await, None);
    }

    #[tokio::test]
    async fn test_render_reflects_selection() {
        let renderer = Renderer::new("https://via.placeholder.com/200").unwrap();
        let mut dashboard = Dashboard::mount(Arc::new(StubSource::ok(records(2))));
        dashboard.settle().await;
        dashboard.select(1).await;

        let page = dashboard.render(&renderer, &chrono::Utc).await.unwrap();
        assert!(page.contains(r#"id="modal-1" class="modal-backdrop" style="display: flex""#));

        let body = dashboard.render_body(&renderer, &chrono::Utc).await.unwrap();
        assert!(!body.contains("Loading..."));
        assert_eq!(body.matches(r#"class="tile""#).count(), 2);
    }

    #[tokio::test]
    async fn test_select_is_rejected_while_loading() {
        let release = Arc::new(Notify::new());
        let dashboard = Dashboard::mount(Arc::new(StubSource::gated(records(2), release.clone())));
        assert!(!dashboard.select(0).await);
        release.notify_one();
    }
}
