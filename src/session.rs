//! `Timetable`: sesión que compone la inicialización y el horario semanal,
//! y guarda la semana seleccionada por el usuario.

use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use crate::config::Config;
use crate::error::TimetableError;
use crate::loader::{
    lock, Clock, EventBus, InitSnapshot, InitializationCoordinator, ResourceEvent, ScheduleLoader, ScheduleView,
    SectionCatalogLoader, SemesterWindowResolver,
};
use crate::models::{ResolvedSemester, ScheduleEntry, Section};
use crate::upstream::TimetableApi;

pub struct Timetable {
    coordinator: InitializationCoordinator,
    schedule: ScheduleLoader,
    events: EventBus,
    selected_week: Mutex<Option<u32>>,
}

impl Timetable {
    pub fn new(api: Arc<dyn TimetableApi>, config: &Config) -> Self {
        Self::build(api, config, None)
    }

    /// Igual que `new`, con un reloj fijo para calcular la semana actual.
    pub fn with_clock(api: Arc<dyn TimetableApi>, config: &Config, clock: Clock) -> Self {
        Self::build(api, config, Some(clock))
    }

    fn build(api: Arc<dyn TimetableApi>, config: &Config, clock: Option<Clock>) -> Self {
        let events = EventBus::default();
        let mut resolver = SemesterWindowResolver::new(Arc::clone(&api), events.clone());
        if let Some(clock) = clock {
            resolver = resolver.with_clock(clock);
        }
        let sections = SectionCatalogLoader::new(Arc::clone(&api), events.clone());
        Timetable {
            coordinator: InitializationCoordinator::new(Arc::new(resolver), Arc::new(sections)),
            schedule: ScheduleLoader::new(api, events.clone(), config.schedule_policy),
            events,
            selected_week: Mutex::new(None),
        }
    }

    pub async fn initialize(&self) -> InitSnapshot {
        self.coordinator.initialize().await
    }

    pub fn snapshot(&self) -> InitSnapshot {
        self.coordinator.snapshot()
    }

    pub fn coordinator(&self) -> &InitializationCoordinator {
        &self.coordinator
    }

    pub fn schedule(&self) -> &ScheduleLoader {
        &self.schedule
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ResourceEvent> {
        self.events.subscribe()
    }

    pub fn semester(&self) -> Option<Arc<ResolvedSemester>> {
        self.coordinator.semester().current()
    }

    pub fn sections(&self) -> Arc<Vec<Section>> {
        self.coordinator.sections().catalog()
    }

    /// Semana elegida por el usuario; si no eligió, la semana actual.
    pub fn selected_week(&self) -> Option<u32> {
        let selected = *lock(&self.selected_week);
        selected.or_else(|| self.coordinator.semester().week_info().map(|w| w.current_week))
    }

    /// Navega a `week` y pide su horario para el semestre actual.
    ///
    /// `Precondition` si la inicialización no está `Ready`; `Validation` si
    /// `week` queda fuera de `[1, total_weeks]`.
    pub async fn select_week(&self, week: u32) -> Result<Arc<Vec<ScheduleEntry>>, TimetableError> {
        if !self.coordinator.snapshot().is_ready() {
            return Err(TimetableError::Precondition(
                "timetable must be initialized before requesting a week".to_string(),
            ));
        }
        let semester = self.semester().ok_or_else(|| {
            TimetableError::Precondition("no semester loaded".to_string())
        })?;
        let total = semester.weeks.total_weeks;
        if week < 1 || week > total {
            log::warn!("horario: semana {} rechazada (total de semanas {})", week, total);
            return Err(TimetableError::Validation(format!("week must be between 1 and {}", total)));
        }
        *lock(&self.selected_week) = Some(week);
        self.schedule.fetch_week(semester.window.id, week).await
    }

    /// Vuelve a pedir la semana seleccionada (o la actual).
    pub async fn refresh_week(&self) -> Result<Arc<Vec<ScheduleEntry>>, TimetableError> {
        let week = self.selected_week().ok_or_else(|| {
            TimetableError::Precondition("timetable must be initialized before requesting a week".to_string())
        })?;
        self.select_week(week).await
    }

    pub fn schedule_view(&self) -> ScheduleView {
        self.schedule.view()
    }

    /// Logout: vacía semestre, catálogo, horario y selección.
    pub fn teardown(&self) {
        log::info!("horario: cierre de sesión, se vacía el estado");
        self.coordinator.teardown();
        self.schedule.clear();
        *lock(&self.selected_week) = None;
    }
}
