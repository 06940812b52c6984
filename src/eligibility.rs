use crate::model::{Member, Preference};
use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Raison pour laquelle un membre est écarté d'une occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    Outage,
    NoOncall,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::Outage => f.write_str("outage"),
            BlockReason::NoOncall => f.write_str("no-oncall preference"),
        }
    }
}

/// Vrai si une absence du membre touche l'un des `shift_days` jours.
///
/// Chaque jour couvre `[début du jour, début du jour + shift_duration]` ; la
/// borne haute est fermée : une absence qui commence pile à la fin du jour
/// bloque quand même.
pub fn personal_outage(
    shift_start: DateTime<Utc>,
    shift_days: u32,
    shift_duration: Duration,
    member: &Member,
) -> bool {
    member.ooo.iter().any(|outage| {
        let outage_end = outage.end();
        (0..i64::from(shift_days)).any(|day| {
            let today_start = shift_start + Duration::days(day);
            let today_end = today_start + shift_duration;
            today_start < outage_end && today_end >= outage.start
        })
    })
}

/// Faux si le membre a demandé à ne jamais être d'astreinte.
pub fn personal_preference(member: &Member) -> bool {
    for pref in &member.preferences {
        match pref {
            Preference::NoOncall => return false,
            Preference::Unknown => {}
        }
    }
    true
}

/// Combine les deux filtres, absences d'abord.
pub fn check_member(
    shift_start: DateTime<Utc>,
    shift_days: u32,
    shift_duration: Duration,
    member: &Member,
) -> Option<BlockReason> {
    if personal_outage(shift_start, shift_days, shift_duration, member) {
        return Some(BlockReason::Outage);
    }
    if !personal_preference(member) {
        return Some(BlockReason::NoOncall);
    }
    None
}
