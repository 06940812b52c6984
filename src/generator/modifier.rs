use crate::model::ShiftEntry;
use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

/// Transformation appliquée après génération.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    WeekendSkip(WeekendSkip),
    SplitShift(SplitShift),
}

impl Modifier {
    pub fn name(&self) -> &'static str {
        match self {
            Modifier::WeekendSkip(_) => super::WEEKEND_SKIP,
            Modifier::SplitShift(_) => super::SPLIT_SHIFT,
        }
    }

    /// Liste ordonnée en entrée, liste ordonnée neuve en sortie.
    pub fn modify(&self, shifts: &[ShiftEntry]) -> Vec<ShiftEntry> {
        match self {
            Modifier::WeekendSkip(m) => m.modify(shifts),
            Modifier::SplitShift(m) => m.modify(shifts),
        }
    }
}

fn piece(shift: &ShiftEntry, start: DateTime<Utc>, end: DateTime<Utc>) -> ShiftEntry {
    ShiftEntry {
        start,
        end,
        evt_id: None,
        occurrence: Some(shift.occurrence_start()),
        ..shift.clone()
    }
}

/// Retire les jours de week-end des occurrences.
///
/// Chaque occurrence est découpée en tranches de 24h depuis son début ; les
/// tranches qui commencent un samedi ou un dimanche (UTC) sont retirées et les
/// tranches contiguës restantes sont recollées.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekendSkip;

impl WeekendSkip {
    pub fn modify(&self, shifts: &[ShiftEntry]) -> Vec<ShiftEntry> {
        let mut out = Vec::with_capacity(shifts.len());
        for shift in shifts {
            if shift.end <= shift.start {
                out.push(shift.clone());
                continue;
            }
            let mut run: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
            let mut at = shift.start;
            while at < shift.end {
                let slice_end = (at + Duration::days(1)).min(shift.end);
                if is_weekend(at) {
                    if let Some((s, e)) = run.take() {
                        out.push(piece(shift, s, e));
                    }
                } else {
                    let s = run.map_or(at, |(s, _)| s);
                    run = Some((s, slice_end));
                }
                at = slice_end;
            }
            if let Some((s, e)) = run {
                out.push(piece(shift, s, e));
            }
        }
        out
    }
}

fn is_weekend(t: DateTime<Utc>) -> bool {
    matches!(t.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Découpe chaque occurrence en morceaux consécutifs de `period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitShift {
    pub period: Duration,
}

impl Default for SplitShift {
    fn default() -> Self {
        Self {
            period: Duration::days(1),
        }
    }
}

impl SplitShift {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn modify(&self, shifts: &[ShiftEntry]) -> Vec<ShiftEntry> {
        if self.period <= Duration::zero() {
            return shifts.to_vec();
        }
        let mut out = Vec::with_capacity(shifts.len());
        for shift in shifts {
            if shift.end <= shift.start {
                out.push(shift.clone());
                continue;
            }
            let mut at = shift.start;
            while at < shift.end {
                let end = (at + self.period).min(shift.end);
                out.push(piece(shift, at, end));
                at = end;
            }
        }
        out
    }
}
