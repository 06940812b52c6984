mod cursor;
mod engine;
mod fair;
mod modifier;
mod random;
mod registry;
mod types;

pub use cursor::RotationCursor;
pub use engine::make_shifts;
pub use fair::Fair;
pub use modifier::{Modifier, SplitShift, WeekendSkip};
pub use random::{IndexSource, RandomGen, RngSource, Shuffle};
pub use registry::Generators;
pub use types::{GenError, Request};

use crate::bucket::Buckets;
use crate::model::{Configuration, ShiftEntry};
use chrono::{DateTime, Duration, Utc};

pub const FAIR: &str = "Fair";
pub const RANDOM: &str = "Random";
pub const WEEKEND_SKIP: &str = "WeekendSkip";
pub const SPLIT_SHIFT: &str = "SplitShift";

/// Algorithme de génération nommé.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    Fair(Fair),
    Random(RandomGen),
}

impl Generator {
    pub fn name(&self) -> &'static str {
        match self {
            Generator::Fair(_) => FAIR,
            Generator::Random(_) => RANDOM,
        }
    }

    /// Génère `req.shifts_to_schedule` cycles ; seul `Random` consomme `source`.
    pub fn generate(
        &self,
        req: &Request<'_>,
        source: &mut dyn IndexSource,
    ) -> Result<Vec<ShiftEntry>, GenError> {
        match self {
            Generator::Fair(g) => g.generate(req),
            Generator::Random(g) => g.generate(req, source),
        }
    }
}

pub(crate) fn ensure_layout(cfg: &Configuration) -> Result<(), GenError> {
    if cfg.config.shifts.is_empty() {
        return Err(GenError::EmptyLayout);
    }
    Ok(())
}

/// Début de la rotation : un cycle après la dernière occurrence connue du
/// premier sous-créneau, sinon `fallback`. Un morceau produit par un
/// modificateur compte pour le début de son occurrence.
pub(crate) fn rotation_start(
    cfg: &Configuration,
    fallback: DateTime<Utc>,
    history: &Buckets<ShiftEntry>,
) -> DateTime<Utc> {
    history
        .get(0)
        .iter()
        .map(ShiftEntry::occurrence_start)
        .max()
        .map_or(fallback, |last| {
            last + Duration::days(cfg.config.cycle_days())
        })
}
