// Resolución de la ventana del semestre actual y de sus semanas derivadas.

use chrono::NaiveDate;
use futures_util::FutureExt;
use std::sync::{Arc, Mutex};

use super::{lock, EventBus, ResourceId, SharedFetch};
use crate::calendar::derive_week_info;
use crate::error::TimetableError;
use crate::models::{DerivedWeekInfo, LoadState, ResolvedSemester};
use crate::upstream::TimetableApi;

/// Fuente de "hoy" para calcular la semana actual (inyectable en pruebas).
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

pub fn local_clock() -> Clock {
    Arc::new(|| chrono::Local::now().date_naive())
}

#[derive(Default)]
struct SemesterSlot {
    state: LoadState,
    resolved: Option<Arc<ResolvedSemester>>,
    in_flight: Option<SharedFetch<Arc<ResolvedSemester>>>,
    // sube en cada `clear`; respuestas de una generación anterior se ignoran
    generation: u64,
}

pub struct SemesterWindowResolver {
    api: Arc<dyn TimetableApi>,
    slot: Arc<Mutex<SemesterSlot>>,
    events: EventBus,
    clock: Clock,
}

impl SemesterWindowResolver {
    pub fn new(api: Arc<dyn TimetableApi>, events: EventBus) -> Self {
        SemesterWindowResolver {
            api,
            slot: Arc::new(Mutex::new(SemesterSlot::default())),
            events,
            clock: local_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Pide el semestre actual al upstream y reemplaza ventana + semanas de
    /// una vez. Si ya hay una petición en vuelo, espera esa misma.
    pub async fn resolve(&self) -> Result<Arc<ResolvedSemester>, TimetableError> {
        let fetch = {
            let mut slot = lock(&self.slot);
            match slot.in_flight.clone() {
                Some(existing) => {
                    log::debug!("semestre: ya hay una petición en vuelo, se espera esa");
                    existing
                }
                None => self.dispatch(&mut slot),
            }
        };
        fetch.await
    }

    /// Como `resolve`, pero no hace nada si ya está cargado.
    pub async fn ensure_resolved(&self) -> Result<Arc<ResolvedSemester>, TimetableError> {
        let fetch = {
            let mut slot = lock(&self.slot);
            if let (LoadState::Loaded, Some(resolved)) = (&slot.state, &slot.resolved) {
                return Ok(Arc::clone(resolved));
            }
            match slot.in_flight.clone() {
                Some(existing) => existing,
                None => self.dispatch(&mut slot),
            }
        };
        fetch.await
    }

    fn dispatch(&self, slot: &mut SemesterSlot) -> SharedFetch<Arc<ResolvedSemester>> {
        let api = Arc::clone(&self.api);
        let shared_slot = Arc::clone(&self.slot);
        let events = self.events.clone();
        let clock = Arc::clone(&self.clock);
        let generation = slot.generation;

        let fetch = async move {
            let outcome = match api.get_current_semester().await {
                Ok(payload) => payload.validate().map(|window| {
                    let weeks = derive_week_info(&window, clock());
                    Arc::new(ResolvedSemester { window, weeks })
                }),
                Err(e) => Err(e),
            };

            let mut slot = lock(&shared_slot);
            if slot.generation != generation {
                log::debug!("semestre: respuesta de una sesión ya limpiada, se descarta");
                return outcome;
            }
            slot.in_flight = None;
            match &outcome {
                Ok(resolved) => {
                    log::info!(
                        "semestre {} ({}) cargado: {} semanas, semana actual {}",
                        resolved.window.id, resolved.window.name, resolved.weeks.total_weeks, resolved.weeks.current_week
                    );
                    slot.resolved = Some(Arc::clone(resolved));
                    events.transition(&mut slot.state, LoadState::Loaded, ResourceId::Semester);
                }
                Err(e) => {
                    log::warn!("semestre: falló la carga: {}", e);
                    slot.resolved = None;
                    events.transition(&mut slot.state, LoadState::Failed(e.message().to_string()), ResourceId::Semester);
                }
            }
            outcome
        }
        .boxed()
        .shared();

        slot.in_flight = Some(fetch.clone());
        self.events.transition(&mut slot.state, LoadState::Loading, ResourceId::Semester);
        fetch
    }

    pub fn state(&self) -> LoadState {
        lock(&self.slot).state.clone()
    }

    pub fn is_loaded(&self) -> bool {
        lock(&self.slot).state.is_loaded()
    }

    pub fn current(&self) -> Option<Arc<ResolvedSemester>> {
        lock(&self.slot).resolved.clone()
    }

    pub fn week_info(&self) -> Option<DerivedWeekInfo> {
        lock(&self.slot).resolved.as_ref().map(|r| r.weeks)
    }

    /// Vacía ventana y semanas (logout). Una respuesta en vuelo se descarta.
    pub fn clear(&self) {
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        slot.in_flight = None;
        slot.resolved = None;
        self.events.transition(&mut slot.state, LoadState::NotRequested, ResourceId::Semester);
    }
}
