use super::cursor::RotationCursor;
use crate::bucket::Buckets;
use crate::eligibility::check_member;
use crate::model::{Member, ShiftConfig, ShiftEntry, ShiftMember};
use crate::shift_time::shift_start_end;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Génère `cycles` cycles d'occurrences à partir de `start`.
///
/// Pour chaque occurrence, le vivier du sous-créneau est tourné de la valeur
/// du curseur puis parcouru dans l'ordre : un candidat absent ou opposé à
/// l'astreinte est écarté pour cette occurrence seulement, un candidat retenu
/// fait avancer le curseur. Une occurrence peut sortir avec moins de
/// `shift_members` personnes, voire aucune.
///
/// Ex. curseur 2 sur `[A, B, C, D, E, F]` : on essaie `C, D, E, F, A, B`.
///
/// `sc.shifts` ne doit pas être vide.
pub fn make_shifts(
    sc: &ShiftConfig,
    start: DateTime<Utc>,
    members: &Buckets<Member>,
    cycles: usize,
    cursor: &mut RotationCursor,
) -> Vec<ShiftEntry> {
    let mut out = Vec::with_capacity(cycles * sc.shifts.len());

    for cycle in 0..cycles {
        for (idx, sub) in sc.shifts.iter().enumerate() {
            let (shift_start, shift_end) = shift_start_end(&start, cycle, idx, sc);
            let mut entry = ShiftEntry::new(sub.name.clone(), shift_start, shift_end);

            let pool = members.get(idx);
            if pool.is_empty() {
                log_warn!("no members for shift {:?}, leaving it unassigned", sub.name);
                out.push(entry);
                continue;
            }

            let mut queue: VecDeque<&Member> = pool.iter().collect();
            queue.rotate_left(cursor.offset(idx, pool.len()));

            while entry.on_call.len() < sc.shift_members {
                let Some(candidate) = queue.pop_front() else {
                    break;
                };
                if let Some(reason) = check_member(shift_start, sc.length, sub.duration, candidate)
                {
                    log_debug!(
                        "{} skipped for {:?} at {}: {}",
                        candidate.email,
                        sub.name,
                        shift_start,
                        reason
                    );
                    continue;
                }
                entry
                    .on_call
                    .push(ShiftMember::new(candidate.email.clone(), sub.name.clone()));
                cursor.advance(idx);
            }

            if entry.on_call.len() < sc.shift_members {
                log_warn!(
                    "shift {:?} at {} staffed {}/{}",
                    sub.name,
                    shift_start,
                    entry.on_call.len(),
                    sc.shift_members
                );
            }
            out.push(entry);
        }
    }

    out
}
