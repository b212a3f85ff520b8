// Catálogo de bloques horarios: se carga una vez por sesión.

use futures_util::FutureExt;
use std::sync::{Arc, Mutex};

use super::{lock, EventBus, ResourceId, SharedFetch};
use crate::error::TimetableError;
use crate::models::{LoadState, Section};
use crate::upstream::{SectionPayload, TimetableApi};

#[derive(Default)]
struct CatalogSlot {
    state: LoadState,
    catalog: Arc<Vec<Section>>,
    in_flight: Option<SharedFetch<Arc<Vec<Section>>>>,
    generation: u64,
}

pub struct SectionCatalogLoader {
    api: Arc<dyn TimetableApi>,
    slot: Arc<Mutex<CatalogSlot>>,
    events: EventBus,
}

impl SectionCatalogLoader {
    pub fn new(api: Arc<dyn TimetableApi>, events: EventBus) -> Self {
        SectionCatalogLoader {
            api,
            slot: Arc::new(Mutex::new(CatalogSlot::default())),
            events,
        }
    }

    /// Devuelve el catálogo ordenado por `section_id`.
    ///
    /// - `Loaded`: devuelve el caché sin llamar al upstream.
    /// - `Loading`: espera la petición en vuelo.
    /// - `NotRequested` / `Failed`: emite una petición nueva.
    pub async fn load(&self) -> Result<Arc<Vec<Section>>, TimetableError> {
        let fetch = {
            let mut slot = lock(&self.slot);
            if slot.state.is_loaded() {
                return Ok(Arc::clone(&slot.catalog));
            }
            match slot.in_flight.clone() {
                Some(existing) => {
                    log::debug!("bloques: ya se están cargando, se espera la petición en vuelo");
                    existing
                }
                None => self.dispatch(&mut slot),
            }
        };
        fetch.await
    }

    fn dispatch(&self, slot: &mut CatalogSlot) -> SharedFetch<Arc<Vec<Section>>> {
        let api = Arc::clone(&self.api);
        let shared_slot = Arc::clone(&self.slot);
        let events = self.events.clone();
        let generation = slot.generation;

        let fetch = async move {
            let outcome = api
                .get_all_sections()
                .await
                .and_then(SectionPayload::validate_catalog)
                .map(Arc::new);

            let mut slot = lock(&shared_slot);
            if slot.generation != generation {
                log::debug!("bloques: respuesta posterior a la invalidación, se descarta");
                return outcome;
            }
            slot.in_flight = None;
            match &outcome {
                Ok(catalog) => {
                    log::info!("bloques: {} bloques horarios cargados", catalog.len());
                    slot.catalog = Arc::clone(catalog);
                    events.transition(&mut slot.state, LoadState::Loaded, ResourceId::Sections);
                }
                Err(e) => {
                    log::warn!("bloques: falló la carga: {}", e);
                    slot.catalog = Arc::new(Vec::new());
                    events.transition(&mut slot.state, LoadState::Failed(e.message().to_string()), ResourceId::Sections);
                }
            }
            outcome
        }
        .boxed()
        .shared();

        slot.in_flight = Some(fetch.clone());
        self.events.transition(&mut slot.state, LoadState::Loading, ResourceId::Sections);
        fetch
    }

    pub fn state(&self) -> LoadState {
        lock(&self.slot).state.clone()
    }

    pub fn is_loaded(&self) -> bool {
        lock(&self.slot).state.is_loaded()
    }

    /// Catálogo actual (vacío si no se ha cargado).
    pub fn catalog(&self) -> Arc<Vec<Section>> {
        Arc::clone(&lock(&self.slot).catalog)
    }

    /// Fuerza a que el próximo `load` vuelva a pedir el catálogo.
    pub fn invalidate(&self) {
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        slot.in_flight = None;
        slot.catalog = Arc::new(Vec::new());
        self.events.transition(&mut slot.state, LoadState::NotRequested, ResourceId::Sections);
    }
}
