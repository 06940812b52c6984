//! Planification périodique d'une rotation autour du moteur.

use crate::generator::{GenError, Generators, IndexSource, Request};
use crate::model::{occurrences, Configuration, Member, ShiftEntry};
use chrono::{DateTime, Utc};

/// Membres déclarés par la configuration, dans l'ordre de déclaration.
///
/// Échoue si un email déclaré n'a pas de fiche dans `known`.
pub fn resolve_members(cfg: &Configuration, known: &[Member]) -> Result<Vec<Member>, GenError> {
    cfg.members
        .iter()
        .map(|sm| {
            known
                .iter()
                .find(|m| m.email == sm.email)
                .cloned()
                .ok_or_else(|| GenError::UnknownMember(sm.email.clone()))
        })
        .collect()
}

/// Planifie de nouvelles occurrences si la rotation en manque.
///
/// Renvoie `Ok(None)` quand la rotation est désactivée ou qu'il reste plus
/// de `expiration` cycles à venir dans `history` (occurrences distinctes,
/// morceaux confondus). Sinon génère
/// `shifts_to_schedule` cycles avec le générateur configuré et applique les
/// modificateurs configurés.
pub fn schedule_rota(
    generators: &Generators,
    cfg: &Configuration,
    now: DateTime<Utc>,
    history: &[ShiftEntry],
    members: &[Member],
    source: &mut dyn IndexSource,
) -> Result<Option<Vec<ShiftEntry>>, GenError> {
    if cfg.expiration == 0 || !cfg.enabled {
        log_info!("scheduling of shifts for rota {:?} disabled", cfg.name);
        return Ok(None);
    }
    cfg.validate().map_err(GenError::InvalidConfig)?;

    let upcoming = occurrences(history.iter().filter(|s| s.end >= now)).len();
    if upcoming / cfg.config.shifts.len() > cfg.expiration {
        log_info!("still enough shifts scheduled for rota {:?}", cfg.name);
        return Ok(None);
    }

    let generator = generators.fetch(&cfg.config.generator)?;
    let req = Request::new(cfg, now, members)
        .with_previous(history)
        .with_count(cfg.shifts_to_schedule);
    let shifts = generator.generate(&req, source)?;
    let shifts = generators.apply_modifiers(&cfg.config.modifiers, &shifts)?;

    log_info!(
        "scheduled {} shift(s) for rota {:?} with {}",
        shifts.len(),
        cfg.name,
        generator.name()
    );
    Ok(Some(shifts))
}
