use crate::model::{Configuration, Member, ShiftEntry};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Entrées d'un appel de génération (instantanés immuables).
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub config: &'a Configuration,
    /// Instant de référence utilisé quand l'historique est vide.
    pub start: DateTime<Utc>,
    pub previous: &'a [ShiftEntry],
    pub members: &'a [Member],
    /// Nombre de cycles à générer.
    pub shifts_to_schedule: usize,
}

impl<'a> Request<'a> {
    pub fn new(config: &'a Configuration, start: DateTime<Utc>, members: &'a [Member]) -> Self {
        Self {
            config,
            start,
            previous: &[],
            members,
            shifts_to_schedule: config.shifts_to_schedule,
        }
    }

    pub fn with_previous(mut self, previous: &'a [ShiftEntry]) -> Self {
        self.previous = previous;
        self
    }

    pub fn with_count(mut self, shifts_to_schedule: usize) -> Self {
        self.shifts_to_schedule = shifts_to_schedule;
        self
    }
}

#[derive(Error, Debug)]
pub enum GenError {
    #[error("{kind}: {name:?} not found")]
    NotFound { kind: &'static str, name: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("rota has no shifts configured")]
    EmptyLayout,
    #[error("unknown member: {0}")]
    UnknownMember(String),
}
