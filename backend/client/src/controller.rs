//! The session controller: sole owner of [`SessionState`].
//!
//! Every transition goes through `&mut self`. Extraction requests run on
//! spawned tasks and report back over an mpsc channel as
//! [`SessionEvent::Response`]; the controller applies them (and notification
//! expiries) from [`SessionController::next_event`] or
//! [`SessionController::drain_ready`]. Each transition publishes a fresh
//! snapshot on a watch channel for observers.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use textsnap_config::ClientConfig;
use textsnap_core::OcrRequest;

use crate::candidate::ImageCandidate;
use crate::intake::{read_picked_file, ClipboardPayload, DropPayload};
use crate::messages;
use crate::notification::{NotificationCenter, NotificationId, Severity};
use crate::session::{ActiveImage, SessionState};
use crate::transport::{ExtractionRequest, ExtractionResult, ExtractionTransport, RequestId};
use crate::validation::{ValidationError, ValidationPolicy};

/// Message delivered to the controller from a dispatched request.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Response {
        request: RequestId,
        result: ExtractionResult,
    },
}

/// Whether a response was applied or discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDisposition {
    Applied,
    Stale,
}

/// What [`SessionController::next_event`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The in-flight request completed and the state was updated.
    ResponseApplied {
        request: RequestId,
        result: ExtractionResult,
    },
    /// A superseded request completed; nothing changed.
    ResponseDiscarded { request: RequestId },
    NotificationsExpired(Vec<NotificationId>),
    /// Nothing in flight and no notification left to expire.
    Idle,
}

/// Result of submitting through one of the capture channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Dispatched(RequestId),
    Rejected(ValidationError),
    /// The channel carried no image.
    NoImage,
    /// The picked file could not be read.
    Unreadable(String),
}

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub policy: ValidationPolicy,
    pub notification_ttl: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            policy: ValidationPolicy::default(),
            notification_ttl: Duration::from_millis(4000),
        }
    }
}

impl ControllerSettings {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            policy: ValidationPolicy::from_config(config),
            notification_ttl: Duration::from_millis(config.effective_notification_ttl_ms()),
        }
    }
}

pub struct SessionController {
    state: SessionState,
    notifications: NotificationCenter,
    policy: ValidationPolicy,
    transport: Arc<dyn ExtractionTransport>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    snapshot_tx: watch::Sender<SessionState>,
    next_request: u64,
}

impl SessionController {
    pub fn new(transport: Arc<dyn ExtractionTransport>, settings: ControllerSettings) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(SessionState::default());
        Self {
            state: SessionState::default(),
            notifications: NotificationCenter::new(settings.notification_ttl),
            policy: settings.policy,
            transport,
            events_tx,
            events_rx,
            snapshot_tx,
            next_request: 1,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Receive a snapshot after every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.snapshot_tx.subscribe()
    }

    /// Validate and dispatch a candidate.
    ///
    /// A rejected candidate only adds an error notification. An accepted one
    /// replaces the current image, clears the previous result, and spawns the
    /// request on the current tokio runtime.
    pub fn submit_candidate(&mut self, candidate: ImageCandidate) -> Result<RequestId, ValidationError> {
        if let Err(e) = self.policy.validate(&candidate) {
            info!(
                filename = %candidate.filename,
                origin = %candidate.origin,
                size = candidate.len(),
                reason = %e,
                "Image rejected"
            );
            self.notifications.push(e.to_string(), Severity::Error);
            self.publish();
            return Err(e);
        }

        let id = RequestId(self.next_request);
        self.next_request += 1;

        let request = ExtractionRequest {
            id,
            body: OcrRequest::from_bytes(&candidate.bytes),
        };
        let image = ActiveImage::from_candidate(candidate);
        info!(
            request = %id,
            image = %image.id,
            filename = %image.filename,
            size = image.size,
            "Dispatching extraction"
        );

        self.state.image = Some(image);
        self.state.result = None;
        self.state.busy = true;
        self.state.pending = Some(id);
        self.notifications.push(messages::PROCESSING, Severity::Info);

        let transport = Arc::clone(&self.transport);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = transport.extract(&request).await;
            // The controller may already be gone.
            let _ = tx.send(SessionEvent::Response { request: id, result });
        });

        self.publish();
        Ok(id)
    }

    /// Apply a response if it belongs to the request in flight.
    pub fn on_response(&mut self, request: RequestId, result: ExtractionResult) -> ResponseDisposition {
        if self.state.pending != Some(request) {
            debug!(request = %request, current = ?self.state.pending, "Discarding stale response");
            return ResponseDisposition::Stale;
        }

        self.state.pending = None;
        self.state.busy = false;

        let (message, severity) = match &result {
            ExtractionResult::Success { text } if text.is_empty() => {
                info!(request = %request, "No text found");
                (messages::NO_TEXT_FOUND.to_string(), Severity::Info)
            }
            ExtractionResult::Success { text } => {
                info!(request = %request, chars = text.chars().count(), "Extraction succeeded");
                (messages::EXTRACTION_SUCCEEDED.to_string(), Severity::Success)
            }
            ExtractionResult::Failure { kind, message } => {
                warn!(request = %request, kind = ?kind, error = %message, "Extraction failed");
                (messages::extraction_failed(message), Severity::Error)
            }
        };
        self.notifications.push(message, severity);
        // A failure leaves no result behind.
        self.state.result = result.is_success().then_some(result);

        self.publish();
        ResponseDisposition::Applied
    }

    pub fn dismiss_notification(&mut self, id: NotificationId) {
        if self.notifications.dismiss(id) {
            self.publish();
        }
    }

    /// Reset image, result, and notifications. An in-flight request keeps
    /// running but its response will be discarded.
    pub fn clear(&mut self) {
        self.state.image = None;
        self.state.result = None;
        self.state.busy = false;
        self.state.pending = None;
        self.notifications.clear();
        self.publish();
    }

    /// Current text for the clipboard, if there is any.
    pub fn copy_text(&mut self) -> Option<String> {
        let text = self.state.text().filter(|t| !t.is_empty())?.to_string();
        self.notifications.push(messages::TEXT_COPIED, Severity::Success);
        self.publish();
        Some(text)
    }

    /// Length of the current text in characters.
    pub fn character_count(&self) -> usize {
        self.state.text().map(|t| t.chars().count()).unwrap_or(0)
    }

    /// Remove notifications whose deadline has passed.
    pub fn prune_expired(&mut self) -> Vec<NotificationId> {
        let removed = self.notifications.prune_expired(Instant::now());
        if !removed.is_empty() {
            self.publish();
        }
        removed
    }

    pub async fn submit_picked_file(&mut self, path: &Path) -> SubmitOutcome {
        match read_picked_file(path).await {
            Ok(candidate) => self.submit(candidate),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read picked file");
                let message = messages::unreadable_file(&e.to_string());
                self.notifications.push(message.clone(), Severity::Error);
                self.publish();
                SubmitOutcome::Unreadable(message)
            }
        }
    }

    /// An empty drop is ignored.
    pub fn submit_drop(&mut self, payload: DropPayload) -> SubmitOutcome {
        match payload.into_candidate() {
            Some(candidate) => self.submit(candidate),
            None => SubmitOutcome::NoImage,
        }
    }

    pub fn submit_paste(&mut self, payload: ClipboardPayload) -> SubmitOutcome {
        match payload.into_candidate() {
            Some(candidate) => self.submit(candidate),
            None => {
                self.notifications
                    .push(messages::NO_IMAGE_IN_CLIPBOARD, Severity::Info);
                self.publish();
                SubmitOutcome::NoImage
            }
        }
    }

    /// Wait for the next response or notification expiry and apply it.
    pub async fn next_event(&mut self) -> ControllerEvent {
        enum Wake {
            Event(Option<SessionEvent>),
            Deadline,
        }

        let deadline = self.notifications.next_deadline();
        if deadline.is_none() && self.state.pending.is_none() {
            return ControllerEvent::Idle;
        }

        let wake = tokio::select! {
            event = self.events_rx.recv() => Wake::Event(event),
            _ = sleep_until_deadline(deadline) => Wake::Deadline,
        };

        match wake {
            Wake::Event(Some(event)) => self.apply(event),
            Wake::Event(None) => ControllerEvent::Idle,
            Wake::Deadline => ControllerEvent::NotificationsExpired(self.prune_expired()),
        }
    }

    /// Apply everything already queued without waiting.
    pub fn drain_ready(&mut self) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            events.push(self.apply(event));
        }
        let expired = self.prune_expired();
        if !expired.is_empty() {
            events.push(ControllerEvent::NotificationsExpired(expired));
        }
        events
    }

    fn submit(&mut self, candidate: ImageCandidate) -> SubmitOutcome {
        match self.submit_candidate(candidate) {
            Ok(id) => SubmitOutcome::Dispatched(id),
            Err(e) => SubmitOutcome::Rejected(e),
        }
    }

    fn apply(&mut self, event: SessionEvent) -> ControllerEvent {
        match event {
            SessionEvent::Response { request, result } => {
                match self.on_response(request, result.clone()) {
                    ResponseDisposition::Applied => ControllerEvent::ResponseApplied { request, result },
                    ResponseDisposition::Stale => ControllerEvent::ResponseDiscarded { request },
                }
            }
        }
    }

    fn publish(&mut self) {
        self.state.notifications = self.notifications.items().to_vec();
        self.snapshot_tx.send_replace(self.state.clone());
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::candidate::ImageOrigin;
    use crate::http_transport::HttpTransport;
    use crate::intake::{ClipboardItem, DroppedFile};
    use crate::transport::FailureKind;

    const MIB: usize = 1024 * 1024;

    /// Answers each request after a per-request delay; counts calls.
    #[derive(Default)]
    struct ScriptedTransport {
        script: HashMap<u64, (Duration, ExtractionResult)>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn respond(mut self, request: u64, delay_ms: u64, result: ExtractionResult) -> Self {
            self.script
                .insert(request, (Duration::from_millis(delay_ms), result));
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExtractionTransport for ScriptedTransport {
        async fn extract(&self, request: &ExtractionRequest) -> ExtractionResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay, result) = self
                .script
                .get(&request.id.0)
                .cloned()
                .unwrap_or((Duration::ZERO, ExtractionResult::success("")));
            tokio::time::sleep(delay).await;
            result
        }
    }

    fn png(size: usize) -> ImageCandidate {
        ImageCandidate::new(vec![0u8; size], "image/png", "shot.png", ImageOrigin::Picker)
    }

    fn messages_of(controller: &SessionController) -> Vec<(Severity, String)> {
        controller
            .state()
            .notifications()
            .iter()
            .map(|n| (n.severity, n.message.clone()))
            .collect()
    }

    async fn next_applied(controller: &mut SessionController) -> ControllerEvent {
        loop {
            match controller.next_event().await {
                ControllerEvent::NotificationsExpired(_) => continue,
                other => return other,
            }
        }
    }

    #[tokio::test]
    async fn oversized_image_never_reaches_transport() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut controller = SessionController::new(transport.clone(), ControllerSettings::default());

        let candidate = ImageCandidate::new(vec![0u8; 15 * MIB], "image/jpeg", "big.jpg", ImageOrigin::Drop);
        let err = controller.submit_candidate(candidate).unwrap_err();

        assert!(matches!(err, ValidationError::TooLarge { .. }));
        assert_eq!(transport.calls(), 0);
        assert!(controller.state().image().is_none());
        assert!(!controller.state().is_busy());
        assert_eq!(
            messages_of(&controller),
            vec![(
                Severity::Error,
                "File size too large. Please use an image under 10MB".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn rejection_leaves_previous_session_untouched() {
        let transport = Arc::new(ScriptedTransport::default().respond(1, 0, ExtractionResult::success("first")));
        let mut controller = SessionController::new(transport.clone(), ControllerSettings::default());

        controller.submit_candidate(png(64)).unwrap();
        next_applied(&mut controller).await;
        let image_id = controller.state().image().unwrap().id;

        let bad = ImageCandidate::new(vec![1u8; 8], "image/gif", "a.gif", ImageOrigin::Picker);
        assert!(controller.submit_candidate(bad).is_err());

        assert_eq!(controller.state().image().unwrap().id, image_id);
        assert_eq!(controller.state().text(), Some("first"));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn submission_sets_busy_and_publishes() {
        let transport = Arc::new(ScriptedTransport::default().respond(1, 50, ExtractionResult::success("x")));
        let mut controller = SessionController::new(transport, ControllerSettings::default());
        let rx = controller.subscribe();

        let id = controller.submit_candidate(png(32)).unwrap();
        {
            let snapshot = rx.borrow();
            assert!(snapshot.is_busy());
            assert_eq!(snapshot.pending_request(), Some(id));
            assert_eq!(snapshot.image().unwrap().size, 32);
            assert_eq!(snapshot.notifications()[0].message, messages::PROCESSING);
        }

        next_applied(&mut controller).await;
        assert!(!rx.borrow().is_busy());
        assert_eq!(rx.borrow().text(), Some("x"));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_is_discarded() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .respond(1, 500, ExtractionResult::success("from A"))
                .respond(2, 10, ExtractionResult::success("from B")),
        );
        let mut controller = SessionController::new(transport, ControllerSettings::default());

        let a = controller.submit_candidate(png(16)).unwrap();
        let b = controller.submit_candidate(png(16)).unwrap();
        assert!(b > a);

        assert_eq!(
            next_applied(&mut controller).await,
            ControllerEvent::ResponseApplied {
                request: b,
                result: ExtractionResult::success("from B")
            }
        );
        assert_eq!(
            next_applied(&mut controller).await,
            ControllerEvent::ResponseDiscarded { request: a }
        );
        assert_eq!(controller.state().text(), Some("from B"));
        assert!(!controller.state().is_busy());
    }

    #[tokio::test]
    async fn response_after_clear_is_discarded() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut controller = SessionController::new(transport, ControllerSettings::default());

        let id = controller.submit_candidate(png(16)).unwrap();
        controller.clear();

        assert_eq!(
            controller.on_response(id, ExtractionResult::success("late")),
            ResponseDisposition::Stale
        );
        assert!(controller.state().result().is_none());
        assert!(controller.state().image().is_none());
        assert!(controller.state().notifications().is_empty());
    }

    #[tokio::test]
    async fn empty_text_is_info_not_error() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut controller = SessionController::new(transport, ControllerSettings::default());

        let id = controller.submit_candidate(png(16)).unwrap();
        controller.on_response(id, ExtractionResult::success(""));

        assert_eq!(controller.state().text(), Some(""));
        assert_eq!(
            messages_of(&controller).last().cloned(),
            Some((Severity::Info, messages::NO_TEXT_FOUND.to_string()))
        );
        assert_eq!(controller.copy_text(), None);
        assert_eq!(controller.character_count(), 0);
    }

    #[tokio::test]
    async fn failure_clears_previous_result() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut controller = SessionController::new(transport, ControllerSettings::default());

        let first = controller.submit_candidate(png(16)).unwrap();
        controller.on_response(first, ExtractionResult::success("old text"));

        let second = controller.submit_candidate(png(16)).unwrap();
        controller.on_response(second, ExtractionResult::failure(FailureKind::Backend, "boom"));

        assert!(controller.state().result().is_none());
        assert!(!controller.state().is_busy());
        assert_eq!(
            messages_of(&controller).last().cloned(),
            Some((Severity::Error, "Failed to extract text: boom".to_string()))
        );
    }

    #[tokio::test]
    async fn copy_reports_text_and_notifies() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut controller = SessionController::new(transport, ControllerSettings::default());

        let id = controller.submit_candidate(png(16)).unwrap();
        controller.on_response(id, ExtractionResult::success("Grüße\nWelt"));

        assert_eq!(controller.character_count(), 10);
        assert_eq!(controller.copy_text().as_deref(), Some("Grüße\nWelt"));
        assert_eq!(
            messages_of(&controller).last().cloned(),
            Some((Severity::Success, messages::TEXT_COPIED.to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn notifications_expire_independently() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut controller = SessionController::new(transport, ControllerSettings::default());

        controller.submit_paste(ClipboardPayload::default());
        tokio::time::advance(Duration::from_millis(2000)).await;
        controller.submit_drop(DropPayload::new(vec![DroppedFile {
            name: "notes.txt".into(),
            media_type: "text/plain".into(),
            bytes: bytes::Bytes::from_static(b"hi"),
        }]));
        assert_eq!(controller.state().notifications().len(), 2);

        tokio::time::advance(Duration::from_millis(1900)).await;
        controller.drain_ready();
        assert_eq!(controller.state().notifications().len(), 2);

        tokio::time::advance(Duration::from_millis(200)).await;
        controller.drain_ready();
        assert_eq!(
            messages_of(&controller),
            vec![(Severity::Error, "Please upload only image files".to_string())]
        );

        tokio::time::advance(Duration::from_millis(2000)).await;
        controller.drain_ready();
        assert!(controller.state().notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn next_event_wakes_for_expiry() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut controller = SessionController::new(transport, ControllerSettings::default());

        controller.submit_paste(ClipboardPayload::default());
        let id = controller.state().notifications()[0].id;

        let started = Instant::now();
        assert_eq!(
            controller.next_event().await,
            ControllerEvent::NotificationsExpired(vec![id])
        );
        assert!(started.elapsed() >= Duration::from_millis(4000));
        assert!(started.elapsed() < Duration::from_millis(4100));
        assert_eq!(controller.next_event().await, ControllerEvent::Idle);
    }

    #[tokio::test]
    async fn dismiss_removes_immediately() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut controller = SessionController::new(transport, ControllerSettings::default());

        controller.submit_paste(ClipboardPayload::default());
        let id = controller.state().notifications()[0].id;
        controller.dismiss_notification(id);
        assert!(controller.state().notifications().is_empty());
    }

    #[tokio::test]
    async fn paste_without_image_notifies_and_empty_drop_is_silent() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut controller = SessionController::new(transport.clone(), ControllerSettings::default());

        assert_eq!(controller.submit_drop(DropPayload::default()), SubmitOutcome::NoImage);
        assert!(controller.state().notifications().is_empty());

        let clipboard = ClipboardPayload::new(vec![ClipboardItem {
            media_type: "text/plain".into(),
            bytes: bytes::Bytes::from_static(b"hello"),
        }]);
        assert_eq!(controller.submit_paste(clipboard), SubmitOutcome::NoImage);
        assert_eq!(
            messages_of(&controller),
            vec![(Severity::Info, messages::NO_IMAGE_IN_CLIPBOARD.to_string())]
        );
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn unreadable_picked_file_notifies() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut controller = SessionController::new(transport.clone(), ControllerSettings::default());
        let dir = tempfile::tempdir().unwrap();

        let outcome = controller.submit_picked_file(&dir.path().join("missing.png")).await;
        assert!(matches!(outcome, SubmitOutcome::Unreadable(_)));
        assert_eq!(controller.state().notifications()[0].severity, Severity::Error);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn end_to_end_through_gateway() {
        use textsnap_core::TextBlock;
        use textsnap_gateway::{GatewayState, build_router};
        use textsnap_ocr::StaticBackend;

        let backend = StaticBackend::new(vec![
            TextBlock::line("Hello"),
            TextBlock::word("Hello"),
            TextBlock::line("World"),
        ]);
        let app = build_router(GatewayState::new(Arc::new(backend), 15 * MIB));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.png");
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.resize(2048, 0);
        tokio::fs::write(&path, &bytes).await.unwrap();

        let transport = Arc::new(HttpTransport::new(format!("http://{}", addr)));
        let mut controller = SessionController::new(transport, ControllerSettings::default());

        let outcome = controller.submit_picked_file(&path).await;
        let id = match outcome {
            SubmitOutcome::Dispatched(id) => id,
            other => panic!("expected dispatch, got {:?}", other),
        };

        assert_eq!(
            next_applied(&mut controller).await,
            ControllerEvent::ResponseApplied {
                request: id,
                result: ExtractionResult::success("Hello\nWorld")
            }
        );
        assert_eq!(controller.state().text(), Some("Hello\nWorld"));
        assert_eq!(
            messages_of(&controller).last().cloned(),
            Some((Severity::Success, messages::EXTRACTION_SUCCEEDED.to_string()))
        );
    }
}
