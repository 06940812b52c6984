//! Répartition par sous-créneau.
//!
//! Les éléments dont l'étiquette ne correspond à aucun sous-créneau déclaré
//! ne sont placés dans aucun seau : ils sont rendus dans `excluded`.

use crate::model::{Configuration, Member, ShiftEntry};

/// Un seau ordonné par sous-créneau déclaré, plus les éléments écartés.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buckets<T> {
    pub per_shift: Vec<Vec<T>>,
    pub excluded: Vec<T>,
}

impl<T> Buckets<T> {
    fn split<F>(cfg: &Configuration, items: &[T], slot: F) -> Self
    where
        T: Clone,
        F: Fn(&T) -> Option<usize>,
    {
        let mut per_shift: Vec<Vec<T>> = vec![Vec::new(); cfg.config.shifts.len()];
        let mut excluded = Vec::new();
        for item in items {
            match slot(item) {
                Some(idx) => per_shift[idx].push(item.clone()),
                None => excluded.push(item.clone()),
            }
        }
        Self {
            per_shift,
            excluded,
        }
    }

    pub fn len(&self) -> usize {
        self.per_shift.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_shift.is_empty()
    }

    pub fn get(&self, idx: usize) -> &[T] {
        self.per_shift.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Répartit un historique d'occurrences selon leur nom de sous-créneau.
pub fn split_shift_entries(cfg: &Configuration, entries: &[ShiftEntry]) -> Buckets<ShiftEntry> {
    Buckets::split(cfg, entries, |e| cfg.config.position(&e.name))
}

/// Répartit les membres selon le sous-créneau que la configuration leur attribue.
///
/// Un membre absent de `cfg.members` n'est jamais planifié.
pub fn split_members(cfg: &Configuration, members: &[Member]) -> Buckets<Member> {
    Buckets::split(cfg, members, |m| {
        cfg.shift_of(&m.email)
            .and_then(|name| cfg.config.position(name))
    })
}
