use super::{
    Fair, GenError, Generator, Modifier, RandomGen, SplitShift, WeekendSkip, FAIR, RANDOM,
    SPLIT_SHIFT, WEEKEND_SKIP,
};
use crate::model::ShiftEntry;
use std::collections::HashMap;

/// Table nom → générateur / modificateur.
///
/// `register*` prend `&mut self` : un partage entre threads passe par un verrou
/// externe, tandis que les `fetch*` concurrents sur `&self` sont sûrs.
#[derive(Debug, Clone, Default)]
pub struct Generators {
    registered: HashMap<String, Generator>,
    modifiers: HashMap<String, Modifier>,
}

impl Generators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registre garni des générateurs et modificateurs fournis par la lib.
    pub fn with_defaults() -> Self {
        let mut g = Self::new();
        g.register(FAIR, Generator::Fair(Fair));
        g.register(RANDOM, Generator::Random(RandomGen::default()));
        g.register_modifier(WEEKEND_SKIP, Modifier::WeekendSkip(WeekendSkip));
        g.register_modifier(SPLIT_SHIFT, Modifier::SplitShift(SplitShift::default()));
        g
    }

    /// Enregistre un générateur ; un homonyme est remplacé.
    pub fn register<N: Into<String>>(&mut self, name: N, generator: Generator) {
        self.registered.insert(name.into(), generator);
    }

    pub fn register_modifier<N: Into<String>>(&mut self, name: N, modifier: Modifier) {
        self.modifiers.insert(name.into(), modifier);
    }

    pub fn fetch(&self, name: &str) -> Result<&Generator, GenError> {
        self.registered.get(name).ok_or_else(|| GenError::NotFound {
            kind: "algorithm",
            name: name.to_string(),
        })
    }

    pub fn fetch_modifier(&self, name: &str) -> Result<&Modifier, GenError> {
        self.modifiers.get(name).ok_or_else(|| GenError::NotFound {
            kind: "modifier",
            name: name.to_string(),
        })
    }

    /// Noms enregistrés, triés.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registered.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn list_modifiers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modifiers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Applique les modificateurs nommés, dans l'ordre.
    pub fn apply_modifiers<S: AsRef<str>>(
        &self,
        names: &[S],
        shifts: &[ShiftEntry],
    ) -> Result<Vec<ShiftEntry>, GenError> {
        let mut out = shifts.to_vec();
        for name in names {
            let modifier = self.fetch_modifier(name.as_ref())?;
            out = modifier.modify(&out);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn defaults_are_listed() {
        let g = Generators::with_defaults();
        assert_eq!(g.list(), vec!["Fair", "Random"]);
        assert_eq!(g.list_modifiers(), vec!["SplitShift", "WeekendSkip"]);
    }

    #[test]
    fn register_overwrites_same_name() {
        let mut g = Generators::new();
        g.register("Fair", Generator::Fair(Fair));
        g.register("Fair", Generator::Random(RandomGen::default()));
        assert_eq!(g.list(), vec!["Fair"]);
        assert!(matches!(g.fetch("Fair").unwrap(), Generator::Random(_)));
    }

    #[test]
    fn fetch_unknown_names_fail() {
        let g = Generators::with_defaults();
        match g.fetch("Nope") {
            Err(GenError::NotFound { kind, name }) => {
                assert_eq!(kind, "algorithm");
                assert_eq!(name, "Nope");
            }
            other => panic!("unexpected: {other:?}"),
        }
        let err = g.fetch_modifier("Nope").unwrap_err();
        assert_eq!(err.to_string(), "modifier: \"Nope\" not found");
    }

    #[test]
    fn apply_modifiers_in_order() {
        let g = Generators::with_defaults();
        // lundi 7 -> lundi 14
        let t0 = Utc.with_ymd_and_hms(2018, 5, 7, 0, 0, 0).unwrap();
        let shifts = vec![ShiftEntry::new("main", t0, t0 + Duration::days(7))];

        let out = g
            .apply_modifiers(&["WeekendSkip", "SplitShift"], &shifts)
            .unwrap();
        assert_eq!(out.len(), 5);
        assert!(g.apply_modifiers(&["Missing"], &shifts).is_err());
        assert_eq!(g.apply_modifiers::<&str>(&[], &shifts).unwrap(), shifts);
    }
}
