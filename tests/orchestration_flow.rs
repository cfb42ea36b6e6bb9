//! Integration tests for request orchestration
//!
//! Drives a session against a gated in-process service so the test decides when,
//! and in which order, each service call completes.

use daxlift::workbench::clipboard::MemoryClipboard;
use daxlift::workbench::error::ClientError;
use daxlift::workbench::objects::{ObjectCategory, ObjectEntry};
use daxlift::workbench::orchestrator::{CONVERT_SUCCESS, VALIDATE_FAILED};
use daxlift::workbench::presenter::StatusMessage;
use daxlift::workbench::refresh::{RecordingRefresh, RefreshTarget};
use daxlift::workbench::request::{
    ConversionOutcome, ConversionRequest, ObjectCollection, ValidationOutcome,
};
use daxlift::workbench::service_client::ConversionService;
use daxlift::workbench::state::BusyState;
use daxlift::{ConverterSession, WorkbenchConfig};
use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

type ConvertReply = oneshot::Sender<Result<ConversionOutcome, ClientError>>;
type ValidateReply = oneshot::Sender<Result<ValidationOutcome, ClientError>>;

/// Every call parks until the test answers it.
#[derive(Default)]
struct GatedService {
    converts: Mutex<VecDeque<(ConversionRequest, ConvertReply)>>,
    validates: Mutex<VecDeque<(ConversionRequest, ValidateReply)>>,
}

impl GatedService {
    fn pending(&self) -> (usize, usize) {
        (self.converts.lock().len(), self.validates.lock().len())
    }

    fn answer_convert(&self, outcome: Result<ConversionOutcome, ClientError>) -> ConversionRequest {
        let (request, reply) = self.converts.lock().pop_front().expect("pending convert");
        let _ = reply.send(outcome);
        request
    }

    fn answer_validate(&self, outcome: Result<ValidationOutcome, ClientError>) -> ConversionRequest {
        let (request, reply) = self.validates.lock().pop_front().expect("pending validate");
        let _ = reply.send(outcome);
        request
    }
}

impl ConversionService for GatedService {
    fn convert(
        &self,
        request: ConversionRequest,
    ) -> BoxFuture<'_, Result<ConversionOutcome, ClientError>> {
        let (tx, rx) = oneshot::channel();
        self.converts.lock().push_back((request, tx));
        async move {
            rx.await
                .unwrap_or_else(|_| Err(ClientError::MalformedResponse("gate dropped".into())))
        }
        .boxed()
    }

    fn validate(
        &self,
        request: ConversionRequest,
    ) -> BoxFuture<'_, Result<ValidationOutcome, ClientError>> {
        let (tx, rx) = oneshot::channel();
        self.validates.lock().push_back((request, tx));
        async move {
            rx.await
                .unwrap_or_else(|_| Err(ClientError::MalformedResponse("gate dropped".into())))
        }
        .boxed()
    }
}

fn session(service: Arc<GatedService>) -> (ConverterSession, Arc<RecordingRefresh>) {
    let refresh = Arc::new(RecordingRefresh::new());
    let session = ConverterSession::with_parts(
        WorkbenchConfig::default(),
        service,
        Arc::new(MemoryClipboard::new()),
        refresh.clone(),
    );
    (session, refresh)
}

async fn wait_for(service: &GatedService, expected: (usize, usize)) {
    for _ in 0..100 {
        if service.pending() == expected {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("expected pending calls {expected:?}, got {:?}", service.pending());
}

fn converted(objects: ObjectCollection, warnings: &[&str]) -> ConversionOutcome {
    ConversionOutcome::Success {
        converted_code: "Total = SUM(Orders[OrderAmount])".into(),
        identified_objects: objects,
        warnings: warnings.iter().map(|w| w.to_string()).collect(),
        notes: Vec::new(),
    }
}

#[tokio::test]
async fn explicit_convert_is_busy_until_outcome_applies() {
    let service = Arc::new(GatedService::default());
    let (session, refresh) = session(service.clone());
    session.orchestrator().set_source("  SELECT SUM(OrderAmount) FROM Orders  ");

    let orchestrator = session.orchestrator().clone();
    let task = tokio::spawn(async move { orchestrator.request_convert().await });
    wait_for(&service, (1, 0)).await;

    let in_flight = session.snapshot();
    assert_eq!(in_flight.busy, BusyState::Busy);
    assert!(in_flight.loading_visible());
    assert!(in_flight.messages.state().placeholder_visible());

    let objects = ObjectCollection {
        tables: vec!["Orders".into(), "Customers".into()],
        columns: vec!["OrderAmount".into(), "CustomerID".into(), "OrderAmount".into()],
        functions: vec!["SUM".into()],
        aliases: vec![],
    };
    let request = service.answer_convert(Ok(converted(objects, &["W1"])));
    task.await.unwrap();

    assert_eq!(request.source_text(), "SELECT SUM(OrderAmount) FROM Orders");

    let state = session.snapshot();
    assert_eq!(state.busy, BusyState::Idle);
    assert!(!state.empty_state_visible());
    let columns: Vec<&str> = state
        .objects
        .entries(ObjectCategory::Column)
        .iter()
        .map(ObjectEntry::text)
        .collect();
    assert_eq!(columns, vec!["OrderAmount", "CustomerID", "OrderAmount"]);
    assert_eq!(
        state.objects.entries(ObjectCategory::Alias),
        &[ObjectEntry::Placeholder("No aliases identified".into())]
    );
    assert_eq!(
        state.messages.state().status,
        StatusMessage::Success(CONVERT_SUCCESS.into())
    );
    assert_eq!(state.messages.state().warnings, vec!["W1".to_string()]);
    assert!(state.messages.state().has_any_message());

    let seen = refresh.seen();
    assert!(seen.contains(&RefreshTarget::Objects));
    assert!(seen.contains(&RefreshTarget::Messages));
}

#[tokio::test]
async fn silent_validate_never_touches_busy_state() {
    let service = Arc::new(GatedService::default());
    let (session, _refresh) = session(service.clone());
    session.orchestrator().set_source("Sum([Sales]");

    let orchestrator = session.orchestrator().clone();
    let task = tokio::spawn(async move { orchestrator.request_validate(true).await });
    wait_for(&service, (0, 1)).await;
    assert_eq!(session.snapshot().busy, BusyState::Idle);

    service.answer_validate(Ok(ValidationOutcome::Valid));
    task.await.unwrap();

    let state = session.snapshot();
    assert_eq!(state.busy, BusyState::Idle);
    assert!(state.messages.state().placeholder_visible());
}

#[tokio::test]
async fn late_silent_invalid_overwrites_convert_success() {
    let service = Arc::new(GatedService::default());
    let (session, _refresh) = session(service.clone());
    session.orchestrator().set_source("SELECT * FROM Orders");

    let silent = session.orchestrator().clone();
    let validate_task = tokio::spawn(async move { silent.request_validate(true).await });
    wait_for(&service, (0, 1)).await;

    let explicit = session.orchestrator().clone();
    let convert_task = tokio::spawn(async move { explicit.request_convert().await });
    wait_for(&service, (1, 1)).await;

    service.answer_convert(Ok(converted(ObjectCollection::default(), &[])));
    convert_task.await.unwrap();
    assert_eq!(
        session.snapshot().messages.state().status,
        StatusMessage::Success(CONVERT_SUCCESS.into())
    );

    service.answer_validate(Ok(ValidationOutcome::Invalid {
        suggestions: vec!["S1".into()],
        errors: vec!["E1".into(), "E2".into()],
    }));
    validate_task.await.unwrap();

    let state = session.snapshot();
    assert_eq!(state.busy, BusyState::Idle);
    assert!(state.converted_code.is_some());
    assert_eq!(
        state.messages.state().status,
        StatusMessage::Error {
            text: VALIDATE_FAILED.into(),
            suggestions: vec!["S1".into()],
        }
    );
    assert_eq!(
        state.messages.state().error_entries,
        vec!["E1".to_string(), "E2".to_string()]
    );
}

#[tokio::test]
async fn first_explicit_completion_returns_to_idle() {
    let service = Arc::new(GatedService::default());
    let (session, _refresh) = session(service.clone());
    session.orchestrator().set_source("SELECT 1");

    let first = session.orchestrator().clone();
    let first_task = tokio::spawn(async move { first.request_convert().await });
    wait_for(&service, (1, 0)).await;
    let second = session.orchestrator().clone();
    let second_task = tokio::spawn(async move { second.request_validate(false).await });
    wait_for(&service, (1, 1)).await;

    service.answer_convert(Err(ClientError::MalformedResponse("boom".into())));
    first_task.await.unwrap();
    // No lock between explicit actions: the first to finish clears busy.
    assert_eq!(session.snapshot().busy, BusyState::Idle);

    service.answer_validate(Ok(ValidationOutcome::Valid));
    second_task.await.unwrap();
    assert_eq!(session.snapshot().busy, BusyState::Idle);
}

#[tokio::test]
async fn dropped_explicit_request_still_restores_idle() {
    let service = Arc::new(GatedService::default());
    let (session, _refresh) = session(service.clone());
    session.orchestrator().set_source("SELECT 1");

    let timed_out =
        tokio::time::timeout(Duration::from_millis(10), session.convert()).await;
    assert!(timed_out.is_err());
    assert_eq!(session.snapshot().busy, BusyState::Idle);
}

#[tokio::test(start_paused = true)]
async fn debounce_fires_alongside_explicit_convert() {
    let service = Arc::new(GatedService::default());
    let (session, _refresh) = session(service.clone());

    session.edit_source("SELECT 1");
    let explicit = session.orchestrator().clone();
    let convert_task = tokio::spawn(async move { explicit.request_convert().await });
    wait_for(&service, (1, 0)).await;

    // The explicit action does not cancel the pending timer.
    assert!(session.debouncer().is_pending());
    tokio::time::sleep(Duration::from_millis(1600)).await;
    wait_for(&service, (1, 1)).await;

    service.answer_validate(Ok(ValidationOutcome::Valid));
    service.answer_convert(Ok(converted(ObjectCollection::default(), &[])));
    convert_task.await.unwrap();
    tokio::task::yield_now().await;

    let state = session.snapshot();
    assert_eq!(state.busy, BusyState::Idle);
    assert_eq!(
        state.messages.state().status,
        StatusMessage::Success(CONVERT_SUCCESS.into())
    );
}

#[tokio::test(start_paused = true)]
async fn in_flight_silent_validate_survives_new_input() {
    let service = Arc::new(GatedService::default());
    let (session, _refresh) = session(service.clone());

    session.edit_source("SELECT");
    tokio::time::sleep(Duration::from_millis(1600)).await;
    wait_for(&service, (0, 1)).await;

    // New typing reschedules the timer but must not cancel the call in flight.
    session.edit_source("SELECT 1");
    service.answer_validate(Ok(ValidationOutcome::Invalid {
        suggestions: vec![],
        errors: vec!["Incomplete SELECT".into()],
    }));
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert_eq!(
        session.snapshot().messages.state().error_entries,
        vec!["Incomplete SELECT".to_string()]
    );
    assert!(session.debouncer().is_pending());
}

#[tokio::test]
async fn clear_after_failure_returns_to_baseline() {
    let service = Arc::new(GatedService::default());
    let (session, _refresh) = session(service.clone());
    session.orchestrator().set_source("SELECT 1");

    let orchestrator = session.orchestrator().clone();
    let task = tokio::spawn(async move { orchestrator.request_validate(false).await });
    wait_for(&service, (0, 1)).await;
    service.answer_validate(Ok(ValidationOutcome::Invalid {
        suggestions: vec!["S1".into()],
        errors: vec!["E1".into()],
    }));
    task.await.unwrap();
    assert!(session.snapshot().messages.state().has_any_message());

    session.clear();

    let state = session.snapshot();
    assert!(state.source.is_empty());
    assert!(state.objects.is_cleared());
    assert!(state.messages.state().placeholder_visible());
    assert!(state.empty_state_visible());
    assert_eq!(service.pending(), (0, 0));
}
