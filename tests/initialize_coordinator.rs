mod common;

use std::sync::Arc;

use common::{fixed_clock, MockApi};
use semanario::error::TimetableError;
use semanario::loader::{CoordinatorStatus, ResourceId, SubResource};
use semanario::models::LoadState;
use semanario::upstream::SemesterPayload;
use semanario::{Config, Timetable};

fn timetable(api: &Arc<MockApi>) -> Timetable {
    Timetable::with_clock(api.clone(), &Config::default(), fixed_clock())
}

#[tokio::test]
async fn test_concurrent_initialize_issues_one_call_per_resource() {
    let api = Arc::new(MockApi::new());
    let tt = timetable(&api);

    let (first, second) = tokio::join!(tt.initialize(), tt.initialize());

    assert_eq!(api.calls(), (1, 1, 0));
    assert_eq!(first, second);
    assert!(first.is_ready());
    assert!(first.semester_loaded && first.sections_loaded);
    assert_eq!(first.total_weeks, Some(19));
    assert_eq!(first.current_week, Some(3));
}

#[tokio::test]
async fn test_initialize_when_ready_is_noop() {
    let api = Arc::new(MockApi::new());
    let tt = timetable(&api);

    let first = tt.initialize().await;
    let again = tt.initialize().await;

    assert_eq!(api.calls(), (1, 1, 0));
    assert_eq!(first, again);
    assert_eq!(tt.coordinator().status(), CoordinatorStatus::Ready);
}

#[tokio::test]
async fn test_sections_failure_keeps_semester() {
    let api = Arc::new(MockApi::new());
    api.set_sections(Err(TimetableError::Fetch("503 Service Unavailable".into())));
    let tt = timetable(&api);

    let snapshot = tt.initialize().await;

    assert!(snapshot.semester_loaded);
    assert!(!snapshot.sections_loaded);
    assert!(!snapshot.is_ready());
    assert_eq!(snapshot.total_weeks, Some(19));
    let failures = snapshot.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].resource, SubResource::Sections);
    assert_eq!(failures[0].to_string(), "sections: 503 Service Unavailable");

    // el semestre sigue consultable
    let semester = tt.semester().expect("semestre cargado");
    assert_eq!(semester.window.name, "2024 Spring");
    assert!(tt.sections().is_empty());
}

#[tokio::test]
async fn test_retry_after_partial_failure_only_refetches_failed() {
    let api = Arc::new(MockApi::new());
    api.set_sections(Err(TimetableError::Fetch("timeout".into())));
    let tt = timetable(&api);

    let failed = tt.initialize().await;
    assert!(matches!(failed.status, CoordinatorStatus::PartialFailure { .. }));

    api.set_sections(Ok(common::default_sections()));
    let retried = tt.initialize().await;

    assert_eq!(api.calls(), (1, 2, 0));
    assert!(retried.is_ready());
    let ids: Vec<u32> = tt.sections().iter().map(|s| s.section_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_both_failures_are_reported() {
    let api = Arc::new(MockApi::new());
    api.set_semester(Err(TimetableError::Fetch("connection refused".into())));
    api.set_sections(Err(TimetableError::Fetch("connection refused".into())));
    let tt = timetable(&api);

    let snapshot = tt.initialize().await;

    let resources: Vec<SubResource> = snapshot.failures().iter().map(|f| f.resource).collect();
    assert_eq!(resources, vec![SubResource::Semester, SubResource::Sections]);
    assert_eq!(snapshot.current_week, None);
    assert_eq!(snapshot.total_weeks, None);
}

#[tokio::test]
async fn test_incomplete_semester_payload_is_validation_error() {
    let api = Arc::new(MockApi::new());
    api.set_semester(Ok(SemesterPayload {
        semester_id: Some(1),
        semester_name: Some("2024 Spring".into()),
        start_date: Some("2024-02-26".into()),
        end_date: None,
        ..Default::default()
    }));
    let tt = timetable(&api);

    let snapshot = tt.initialize().await;

    assert!(!snapshot.semester_loaded);
    assert!(snapshot.sections_loaded);
    let failure = &snapshot.failures()[0];
    assert_eq!(failure.resource, SubResource::Semester);
    assert!(matches!(failure.error, TimetableError::Validation(_)));
    assert!(matches!(tt.coordinator().semester().state(), LoadState::Failed(_)));
}

#[tokio::test]
async fn test_initialize_emits_load_state_transitions() {
    let api = Arc::new(MockApi::new());
    let tt = timetable(&api);
    let mut rx = tt.subscribe();

    tt.initialize().await;

    let mut seen = Vec::new();
    while let Ok(event) = rx.try_recv() {
        seen.push((event.resource, event.state));
    }
    assert!(seen.contains(&(ResourceId::Semester, LoadState::Loading)));
    assert!(seen.contains(&(ResourceId::Semester, LoadState::Loaded)));
    assert!(seen.contains(&(ResourceId::Sections, LoadState::Loading)));
    assert!(seen.contains(&(ResourceId::Sections, LoadState::Loaded)));
    assert_eq!(seen.len(), 4);

    // una segunda inicialización no produce transiciones
    tt.initialize().await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_semester_refetch_replaces_window_and_weeks() {
    let api = Arc::new(MockApi::new());
    let tt = timetable(&api);
    let resolver = tt.coordinator().semester();

    let first = resolver.resolve().await.unwrap();
    assert_eq!(first.window.id, 1);
    assert_eq!(resolver.week_info().map(|w| w.total_weeks), Some(19));

    api.set_semester(Ok(SemesterPayload {
        semester_id: Some(2),
        semester_name: Some("2024 Intensivo".to_string()),
        start_date: Some("2024-02-19".to_string()),
        end_date: Some("2024-03-31".to_string()),
        term_type: None,
        academic_year: None,
    }));
    resolver.resolve().await.unwrap();

    let current = resolver.current().unwrap();
    assert_eq!(current.window.id, 2);
    assert_eq!(current.window.name, "2024 Intensivo");
    // reemplazo completo: los campos opcionales anteriores no sobreviven
    assert_eq!(current.window.term_type, None);
    let weeks = resolver.week_info().unwrap();
    assert_eq!((weeks.total_weeks, weeks.current_week), (6, 4));
    assert_eq!(api.calls().0, 2);
}

#[tokio::test]
async fn test_failed_semester_refetch_clears_window() {
    let api = Arc::new(MockApi::new());
    let tt = timetable(&api);
    let resolver = tt.coordinator().semester();
    resolver.resolve().await.unwrap();

    api.set_semester(Err(TimetableError::Fetch("timeout".into())));
    assert!(matches!(resolver.resolve().await, Err(TimetableError::Fetch(_))));

    assert!(resolver.current().is_none());
    assert!(resolver.week_info().is_none());
    assert_eq!(resolver.state(), LoadState::Failed("timeout".to_string()));
}

#[tokio::test]
async fn test_invalidated_catalog_is_fetched_again() {
    let api = Arc::new(MockApi::new());
    let tt = timetable(&api);
    let sections = tt.coordinator().sections();

    sections.load().await.unwrap();
    sections.load().await.unwrap();
    assert_eq!(api.calls().1, 1);

    sections.invalidate();
    assert_eq!(sections.state(), LoadState::NotRequested);
    assert!(sections.catalog().is_empty());

    let catalog = sections.load().await.unwrap();
    assert_eq!(api.calls().1, 2);
    assert_eq!(catalog.iter().map(|s| s.section_id).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(sections.is_loaded());
}
