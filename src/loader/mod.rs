//! Orquestación de carga del horario.
//!
//! Submódulos:
//! - `events`: notificaciones de transición de `LoadState`
//! - `semester`: `SemesterWindowResolver` (ventana + semanas derivadas)
//! - `sections`: `SectionCatalogLoader` (catálogo de bloques, una vez por sesión)
//! - `schedule`: `ScheduleLoader` (entradas de una semana)
//! - `coordinator`: `InitializationCoordinator` (semestre + catálogo)
//!
//! Cada componente es dueño exclusivo de su estado. Una petición en vuelo se
//! guarda como un futuro compartido: un segundo llamador para la misma clave
//! espera ese futuro en vez de emitir otra llamada, y el propio futuro aplica
//! su resultado al estado una sola vez.

pub mod coordinator;
pub mod events;
pub mod schedule;
pub mod sections;
pub mod semester;

pub use coordinator::{CoordinatorStatus, InitSnapshot, InitializationCoordinator, SubResource, SubResourceFailure};
pub use events::{EventBus, ResourceEvent, ResourceId};
pub use schedule::{ScheduleLoader, ScheduleView};
pub use sections::SectionCatalogLoader;
pub use semester::{Clock, SemesterWindowResolver};

use futures_util::future::{BoxFuture, Shared};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::TimetableError;

/// Petición en vuelo compartible entre varios llamadores.
pub(crate) type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, TimetableError>>>;

/// Las secciones críticas nunca cruzan un `.await`; un mutex envenenado sólo
/// puede venir de un panic en otra parte, así que se recupera el estado.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
