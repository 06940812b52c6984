use super::cursor::RotationCursor;
use super::engine::make_shifts;
use super::{ensure_layout, rotation_start, GenError, Request};
use crate::bucket::{split_members, split_shift_entries};
use crate::model::ShiftEntry;

/// Rotation équitable dans l'ordre de déclaration des membres.
///
/// Reprend chaque sous-créneau au membre qui suit le dernier servi dans
/// l'historique.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fair;

impl Fair {
    pub fn generate(&self, req: &Request<'_>) -> Result<Vec<ShiftEntry>, GenError> {
        ensure_layout(req.config)?;

        let members = split_members(req.config, req.members);
        if !members.excluded.is_empty() {
            log_debug!(
                "{} member(s) not mapped to any shift of {:?}",
                members.excluded.len(),
                req.config.name
            );
        }
        let history = split_shift_entries(req.config, req.previous);
        let mut cursor = RotationCursor::from_history(&history);
        let start = rotation_start(req.config, req.start, &history);

        Ok(make_shifts(
            &req.config.config,
            start,
            &members,
            req.shifts_to_schedule,
            &mut cursor,
        ))
    }
}
