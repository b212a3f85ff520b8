// Inicialización idempotente: semestre + catálogo de bloques.

use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex};

use super::{lock, SectionCatalogLoader, SemesterWindowResolver};
use crate::error::TimetableError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubResource {
    Semester,
    Sections,
}

impl fmt::Display for SubResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubResource::Semester => f.write_str("semester"),
            SubResource::Sections => f.write_str("sections"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubResourceFailure {
    pub resource: SubResource,
    pub error: TimetableError,
}

impl fmt::Display for SubResourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.resource, self.error.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CoordinatorStatus {
    #[default]
    Idle,
    Resolving,
    Ready,
    PartialFailure { failures: Vec<SubResourceFailure> },
}

/// Lo que devuelve `initialize`: con esto el llamador decide si puede pedir
/// el horario de una semana.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitSnapshot {
    pub status: CoordinatorStatus,
    pub semester_loaded: bool,
    pub sections_loaded: bool,
    pub current_week: Option<u32>,
    pub total_weeks: Option<u32>,
}

impl InitSnapshot {
    pub fn is_ready(&self) -> bool {
        self.status == CoordinatorStatus::Ready
    }

    pub fn failures(&self) -> &[SubResourceFailure] {
        match &self.status {
            CoordinatorStatus::PartialFailure { failures } => failures,
            _ => &[],
        }
    }
}

pub struct InitializationCoordinator {
    semester: Arc<SemesterWindowResolver>,
    sections: Arc<SectionCatalogLoader>,
    status: Mutex<CoordinatorStatus>,
}

impl InitializationCoordinator {
    pub fn new(semester: Arc<SemesterWindowResolver>, sections: Arc<SectionCatalogLoader>) -> Self {
        InitializationCoordinator {
            semester,
            sections,
            status: Mutex::new(CoordinatorStatus::Idle),
        }
    }

    /// Lleva semestre y catálogo a `Loaded`. Se puede llamar en cada montaje:
    ///
    /// - ambos cargados: no hace nada;
    /// - otra inicialización en curso: se une a las peticiones en vuelo sin
    ///   emitir nuevas;
    /// - tras un fallo parcial: reintenta sólo lo que falló.
    ///
    /// Nunca reintenta por su cuenta.
    pub async fn initialize(&self) -> InitSnapshot {
        if self.semester.is_loaded() && self.sections.is_loaded() {
            self.set_status(CoordinatorStatus::Ready);
            return self.snapshot();
        }

        {
            let mut status = lock(&self.status);
            if *status != CoordinatorStatus::Resolving {
                log::info!("horario: inicializando (semestre: {:?}, bloques: {:?})", self.semester.state(), self.sections.state());
                *status = CoordinatorStatus::Resolving;
            }
        }

        // independientes: se resuelven concurrentemente
        let (semester, sections) = futures_util::future::join(self.semester.ensure_resolved(), self.sections.load()).await;

        let mut failures: Vec<SubResourceFailure> = Vec::new();
        if let Err(error) = semester {
            failures.push(SubResourceFailure { resource: SubResource::Semester, error });
        }
        if let Err(error) = sections {
            failures.push(SubResourceFailure { resource: SubResource::Sections, error });
        }

        let next = if !failures.is_empty() {
            let summary: Vec<String> = failures.iter().map(|f| f.to_string()).collect();
            log::warn!("horario: inicialización incompleta: {}", summary.join("; "));
            CoordinatorStatus::PartialFailure { failures }
        } else if self.semester.is_loaded() && self.sections.is_loaded() {
            CoordinatorStatus::Ready
        } else {
            // limpiado mientras estaba en vuelo
            CoordinatorStatus::Idle
        };
        self.set_status(next);
        self.snapshot()
    }

    fn set_status(&self, next: CoordinatorStatus) {
        *lock(&self.status) = next;
    }

    pub fn status(&self) -> CoordinatorStatus {
        lock(&self.status).clone()
    }

    pub fn snapshot(&self) -> InitSnapshot {
        let semester_loaded = self.semester.is_loaded();
        let weeks = if semester_loaded { self.semester.week_info() } else { None };
        InitSnapshot {
            status: self.status(),
            semester_loaded,
            sections_loaded: self.sections.is_loaded(),
            current_week: weeks.map(|w| w.current_week),
            total_weeks: weeks.map(|w| w.total_weeks),
        }
    }

    pub fn semester(&self) -> &Arc<SemesterWindowResolver> {
        &self.semester
    }

    pub fn sections(&self) -> &Arc<SectionCatalogLoader> {
        &self.sections
    }

    /// Vacía semestre y catálogo; vuelve a `Idle`.
    pub fn teardown(&self) {
        self.semester.clear();
        self.sections.invalidate();
        self.set_status(CoordinatorStatus::Idle);
    }
}
