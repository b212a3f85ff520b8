// Horario de una semana, con clave (semestre, semana).
//
// Sólo se guarda el conjunto de entradas de la última respuesta aplicada; no
// es un caché acumulativo. Con varias semanas en vuelo, `SchedulePolicy`
// decide qué respuesta se queda.

use futures_util::FutureExt;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use super::{lock, EventBus, ResourceId, SharedFetch};
use crate::config::SchedulePolicy;
use crate::error::TimetableError;
use crate::models::{LoadState, ScheduleEntry, WeekKey};
use crate::upstream::TimetableApi;

type Entries = Arc<Vec<ScheduleEntry>>;

#[derive(Default)]
struct ScheduleSlot {
    states: BTreeMap<WeekKey, LoadState>,
    in_flight: HashMap<WeekKey, SharedFetch<Entries>>,
    stored_key: Option<WeekKey>,
    entries: Entries,
    error: Option<TimetableError>,
    // número de secuencia de la última petición emitida
    issued: u64,
    generation: u64,
}

impl ScheduleSlot {
    fn transition(&mut self, events: &EventBus, key: WeekKey, next: LoadState) {
        let state = self.states.entry(key).or_default();
        events.transition(state, next, ResourceId::Schedule(key));
    }

    /// Olvida estados de claves que ya no están en vuelo ni almacenadas.
    fn prune(&mut self) {
        let stored = self.stored_key;
        let in_flight = &self.in_flight;
        self.states.retain(|k, _| in_flight.contains_key(k) || Some(*k) == stored);
    }
}

/// Lo que la UI muestra del horario semanal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub key: Option<WeekKey>,
    pub entries: Entries,
    pub error: Option<TimetableError>,
    pub loading: bool,
}

pub struct ScheduleLoader {
    api: Arc<dyn TimetableApi>,
    slot: Arc<Mutex<ScheduleSlot>>,
    events: EventBus,
    policy: SchedulePolicy,
}

impl ScheduleLoader {
    pub fn new(api: Arc<dyn TimetableApi>, events: EventBus, policy: SchedulePolicy) -> Self {
        ScheduleLoader {
            api,
            slot: Arc::new(Mutex::new(ScheduleSlot::default())),
            events,
            policy,
        }
    }

    pub fn policy(&self) -> SchedulePolicy {
        self.policy
    }

    /// Pide las entradas de `(semester_id, week)`.
    ///
    /// Una segunda llamada para la misma clave mientras la primera está en
    /// vuelo no emite otra petición: ambas reciben el mismo resultado. Claves
    /// distintas sí pueden estar en vuelo a la vez.
    ///
    /// No verifica que la inicialización haya terminado; eso le corresponde
    /// al llamador (ver `Timetable::select_week`).
    pub async fn fetch_week(&self, semester_id: i64, week: u32) -> Result<Entries, TimetableError> {
        let key = WeekKey::new(semester_id, week);
        if semester_id < 1 || week < 1 {
            let err = TimetableError::Validation(format!("invalid semester or week ({})", key));
            let mut slot = lock(&self.slot);
            slot.stored_key = None;
            slot.entries = Arc::new(Vec::new());
            slot.error = Some(err.clone());
            return Err(err);
        }

        let fetch = {
            let mut slot = lock(&self.slot);
            match slot.in_flight.get(&key).cloned() {
                Some(existing) => {
                    log::debug!("horario semanal: {} ya se está cargando, se omite la petición duplicada", key);
                    existing
                }
                None => self.dispatch(&mut slot, key),
            }
        };
        fetch.await
    }

    fn dispatch(&self, slot: &mut ScheduleSlot, key: WeekKey) -> SharedFetch<Entries> {
        slot.issued += 1;
        let seq = slot.issued;
        let generation = slot.generation;
        let api = Arc::clone(&self.api);
        let shared_slot = Arc::clone(&self.slot);
        let events = self.events.clone();
        let policy = self.policy;

        let fetch = async move {
            let outcome = api.get_schedule_for_week(key.semester_id, key.week).await.map(Arc::new);

            let mut slot = lock(&shared_slot);
            if slot.generation != generation {
                log::debug!("horario semanal: respuesta de {} de una sesión ya limpiada, se descarta", key);
                return outcome;
            }
            slot.in_flight.remove(&key);
            let superseded = policy == SchedulePolicy::LatestIssued && seq < slot.issued;

            match &outcome {
                Ok(entries) => {
                    slot.transition(&events, key, LoadState::Loaded);
                    if superseded {
                        log::debug!("horario semanal: {} respondió después de una petición más nueva, se descarta", key);
                    } else {
                        log::info!("horario semanal: {} cargado ({} entradas)", key, entries.len());
                        slot.entries = Arc::clone(entries);
                        slot.stored_key = Some(key);
                        slot.error = None;
                    }
                }
                Err(e) => {
                    log::warn!("horario semanal: {} falló: {}", key, e);
                    slot.transition(&events, key, LoadState::Failed(e.message().to_string()));
                    if !superseded {
                        // no se conservan datos de la semana anterior
                        slot.entries = Arc::new(Vec::new());
                        slot.stored_key = Some(key);
                        slot.error = Some(e.clone());
                    }
                }
            }
            slot.prune();
            outcome
        }
        .boxed()
        .shared();

        slot.in_flight.insert(key, fetch.clone());
        slot.transition(&self.events, key, LoadState::Loading);
        // mientras carga, la vista queda vacía y sin clave
        slot.stored_key = None;
        slot.entries = Arc::new(Vec::new());
        slot.error = None;
        fetch
    }

    pub fn state(&self, semester_id: i64, week: u32) -> LoadState {
        lock(&self.slot)
            .states
            .get(&WeekKey::new(semester_id, week))
            .cloned()
            .unwrap_or_default()
    }

    pub fn view(&self) -> ScheduleView {
        let slot = lock(&self.slot);
        ScheduleView {
            key: slot.stored_key,
            entries: Arc::clone(&slot.entries),
            error: slot.error.clone(),
            loading: !slot.in_flight.is_empty(),
        }
    }

    pub fn entries(&self) -> Entries {
        Arc::clone(&lock(&self.slot).entries)
    }

    /// Vacía todo; respuestas en vuelo se descartan al llegar.
    pub fn clear(&self) {
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        slot.in_flight.clear();
        slot.stored_key = None;
        slot.entries = Arc::new(Vec::new());
        slot.error = None;
        let keys: Vec<WeekKey> = slot.states.keys().copied().collect();
        for key in keys {
            slot.transition(&self.events, key, LoadState::NotRequested);
        }
        slot.states.clear();
    }
}
