use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::{LoadState, WeekKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "resource", content = "key", rename_all = "snake_case")]
pub enum ResourceId {
    Semester,
    Sections,
    Schedule(WeekKey),
}

/// Se emite exactamente cuando un `LoadState` cambia.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceEvent {
    pub resource: ResourceId,
    pub state: LoadState,
}

/// Canal de difusión compartido por todos los componentes de una sesión.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ResourceEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        EventBus::new(64)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        EventBus { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ResourceEvent> {
        self.tx.subscribe()
    }

    /// Cambia `state` a `next` y notifica sólo si hubo transición.
    pub(crate) fn transition(&self, state: &mut LoadState, next: LoadState, resource: ResourceId) {
        if *state == next {
            return;
        }
        *state = next.clone();
        // sin suscriptores, send falla; no es un error
        let _ = self.tx.send(ResourceEvent { resource, state: next });
    }
}
