use crate::bucket::Buckets;
use crate::model::{occurrences, ShiftEntry};

/// Position de reprise de la rotation, une par sous-créneau.
///
/// Le curseur n'avance que sur une affectation acceptée ; le nombre
/// d'affectations déjà enregistrées pour un sous-créneau le reconstruit donc
/// exactement, à condition de compter une seule fois les morceaux d'une même
/// occurrence. Il est réduit modulo la taille du vivier au moment de l'usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationCursor {
    positions: Vec<usize>,
}

impl RotationCursor {
    pub fn new(nb_shifts: usize) -> Self {
        Self {
            positions: vec![0; nb_shifts],
        }
    }

    /// Reconstruit le curseur à partir de l'historique réparti par sous-créneau.
    pub fn from_history(history: &Buckets<ShiftEntry>) -> Self {
        Self {
            positions: history
                .per_shift
                .iter()
                .map(|entries| {
                    occurrences(entries)
                        .iter()
                        .map(|e| e.on_call.len())
                        .sum()
                })
                .collect(),
        }
    }

    pub fn get(&self, shift_idx: usize) -> usize {
        self.positions.get(shift_idx).copied().unwrap_or(0)
    }

    pub fn set(&mut self, shift_idx: usize, value: usize) {
        if self.positions.len() <= shift_idx {
            self.positions.resize(shift_idx + 1, 0);
        }
        self.positions[shift_idx] = value;
    }

    pub fn advance(&mut self, shift_idx: usize) {
        let next = self.get(shift_idx) + 1;
        self.set(shift_idx, next);
    }

    /// Décalage effectif dans un vivier de `pool_len` membres.
    pub fn offset(&self, shift_idx: usize, pool_len: usize) -> usize {
        if pool_len == 0 {
            return 0;
        }
        self.get(shift_idx) % pool_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShiftMember;
    use chrono::{TimeZone, Utc};

    #[test]
    fn offset_wraps_modulo_pool() {
        let mut c = RotationCursor::new(2);
        for _ in 0..7 {
            c.advance(1);
        }
        assert_eq!(c.get(0), 0);
        assert_eq!(c.get(1), 7);
        assert_eq!(c.offset(1, 5), 2);
        assert_eq!(c.offset(1, 0), 0);
    }

    #[test]
    fn advance_grows_missing_slots() {
        let mut c = RotationCursor::default();
        c.advance(3);
        assert_eq!(c.get(3), 1);
        assert_eq!(c.get(2), 0);
    }

    #[test]
    fn history_counts_accepted_assignments() {
        let t0 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let mut full = ShiftEntry::new("a", t0, t0);
        full.on_call = vec![ShiftMember::new("x@x.com", "a"), ShiftMember::new("y@y.com", "a")];
        let empty = ShiftEntry::new("a", t0, t0);
        let history = Buckets {
            per_shift: vec![vec![full.clone(), empty], vec![], vec![full]],
            excluded: vec![],
        };

        let c = RotationCursor::from_history(&history);
        assert_eq!(c.get(0), 2);
        assert_eq!(c.get(1), 0);
        assert_eq!(c.get(2), 2);
    }

    #[test]
    fn split_pieces_count_as_one_assignment() {
        let t0 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let pieces: Vec<ShiftEntry> = (0..7)
            .map(|d| {
                let start = t0 + chrono::Duration::days(d);
                let mut e = ShiftEntry::new("a", start, start + chrono::Duration::days(1));
                e.on_call = vec![ShiftMember::new("x@x.com", "a")];
                e.occurrence = Some(t0);
                e
            })
            .collect();
        let history = Buckets {
            per_shift: vec![pieces],
            excluded: vec![],
        };

        assert_eq!(RotationCursor::from_history(&history).get(0), 1);
    }
}
