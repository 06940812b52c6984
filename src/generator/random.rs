use super::cursor::RotationCursor;
use super::engine::make_shifts;
use super::{ensure_layout, rotation_start, GenError, Request};
use crate::bucket::{split_members, split_shift_entries};
use crate::model::ShiftEntry;
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use std::fmt;
use std::str::FromStr;

/// Source d'indices aléatoires injectée dans la génération.
pub trait IndexSource {
    /// Indice uniforme dans `[0, bound)` ; `bound > 0`.
    fn next_index(&mut self, bound: usize) -> usize;
}

/// Adapte n'importe quel générateur `rand`.
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngSource<Mcg128Xsl64> {
    /// Source reproductible.
    pub fn seeded(seed: u64) -> Self {
        Self(Mcg128Xsl64::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(Mcg128Xsl64::from_entropy())
    }
}

impl<R: Rng> IndexSource for RngSource<R> {
    fn next_index(&mut self, bound: usize) -> usize {
        self.0.gen_range(0..bound)
    }
}

/// Algorithme de mélange du vivier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Shuffle {
    /// Échange chaque position avec un indice tiré sur tout le vivier.
    /// Biaisé ; conservé pour rejouer d'anciens plannings.
    Legacy,
    /// Fisher–Yates.
    #[default]
    Uniform,
}

impl FromStr for Shuffle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(Shuffle::Legacy),
            "uniform" => Ok(Shuffle::Uniform),
            other => Err(format!("unknown shuffle: {other} (expected legacy or uniform)")),
        }
    }
}

impl fmt::Display for Shuffle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shuffle::Legacy => f.write_str("legacy"),
            Shuffle::Uniform => f.write_str("uniform"),
        }
    }
}

impl Shuffle {
    pub fn apply<T>(self, items: &mut [T], source: &mut dyn IndexSource) {
        let len = items.len();
        match self {
            Shuffle::Legacy => {
                for i in 0..len {
                    let dest = source.next_index(len);
                    items.swap(i, dest);
                }
            }
            Shuffle::Uniform => {
                for i in (1..len).rev() {
                    let dest = source.next_index(i + 1);
                    items.swap(i, dest);
                }
            }
        }
    }
}

/// Rotation dans un ordre tiré au hasard à chaque appel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomGen {
    pub shuffle: Shuffle,
}

impl RandomGen {
    pub fn new(shuffle: Shuffle) -> Self {
        Self { shuffle }
    }

    pub fn generate(
        &self,
        req: &Request<'_>,
        source: &mut dyn IndexSource,
    ) -> Result<Vec<ShiftEntry>, GenError> {
        ensure_layout(req.config)?;

        let mut pool = req.members.to_vec();
        self.shuffle.apply(&mut pool, source);

        let members = split_members(req.config, &pool);
        let history = split_shift_entries(req.config, req.previous);
        let start = rotation_start(req.config, req.start, &history);
        let mut cursor = RotationCursor::new(req.config.config.shifts.len());

        Ok(make_shifts(
            &req.config.config,
            start,
            &members,
            req.shifts_to_schedule,
            &mut cursor,
        ))
    }
}
