#![forbid(unsafe_code)]
//! Roulement — moteur de génération de rotations d'astreinte.
//!
//! - Générateurs nommés (`Fair`, `Random`) et modificateurs (`WeekendSkip`, `SplitShift`).
//! - Rotation qui reprend là où l'historique s'est arrêté.
//! - Absences et préférences respectées ; occurrences sous-dotées tolérées.
//! - Aucune persistance, aucun appel réseau : entrées immuables, sorties neuves.

#[macro_use]
mod log;

pub mod bucket;
pub mod eligibility;
pub mod generator;
pub mod io;
pub mod model;
pub mod plan;
pub mod shift_time;

pub use bucket::{split_members, split_shift_entries, Buckets};
pub use eligibility::{check_member, personal_outage, personal_preference, BlockReason};
pub use generator::{
    make_shifts, Fair, GenError, Generator, Generators, IndexSource, Modifier, RandomGen, Request,
    RngSource, RotationCursor, Shuffle, SplitShift, WeekendSkip,
};
pub use model::{
    occurrences, Configuration, Member, Outage, Preference, ShiftConfig, ShiftEntry, ShiftMember,
    SubShift,
};
pub use plan::{resolve_members, schedule_rota};
pub use shift_time::{full_day, shift_start_end};
