use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Sérialisation des `chrono::Duration` en secondes entières.
mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(d)?;
        Ok(Duration::seconds(secs))
    }
}

/// Préférence déclarée par un membre.
///
/// Les valeurs inconnues sont acceptées et ignorées par les filtres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    /// Ne jamais planifier ce membre.
    NoOncall,
    #[serde(other)]
    Unknown,
}

/// Absence d'un membre (intervalle UTC [start, start + duration)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outage {
    pub start: DateTime<Utc>,
    #[serde(with = "duration_secs")]
    pub duration: Duration,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl Outage {
    pub fn new(start: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start,
            duration,
            comment: String::new(),
        }
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start + self.duration
    }
}

/// Membre d'astreinte, identifié par son email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub email: String,
    #[serde(default = "default_tz")]
    pub tz: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ooo: Vec<Outage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferences: Vec<Preference>,
}

fn default_tz() -> String {
    "UTC".to_string()
}

impl Member {
    pub fn new<E: Into<String>>(email: E) -> Self {
        Self {
            email: email.into(),
            tz: default_tz(),
            ooo: Vec::new(),
            preferences: Vec::new(),
        }
    }

    pub fn with_outage(mut self, outage: Outage) -> Self {
        self.ooo.push(outage);
        self
    }

    pub fn with_preference(mut self, pref: Preference) -> Self {
        self.preferences.push(pref);
        self
    }
}

/// Sous-créneau nommé d'un cycle ("primary", "secondary"...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubShift {
    pub name: String,
    #[serde(with = "duration_secs")]
    pub duration: Duration,
}

impl SubShift {
    pub fn new<N: Into<String>>(name: N, duration: Duration) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Disposition d'une rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftConfig {
    /// Heure de début (UTC) de chaque cycle ; seules heures et minutes comptent.
    #[serde(default = "midnight")]
    pub start_time: NaiveTime,
    /// Jours par cycle.
    pub length: u32,
    /// Jours chômés ajoutés à la fin de chaque cycle.
    #[serde(default)]
    pub skip: u32,
    pub shifts: Vec<SubShift>,
    /// Nombre de personnes d'astreinte simultanées par occurrence.
    pub shift_members: usize,
    pub generator: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
}

fn midnight() -> NaiveTime {
    NaiveTime::MIN
}

impl ShiftConfig {
    /// Durée d'un cycle complet en jours (`length + skip`).
    pub fn cycle_days(&self) -> i64 {
        i64::from(self.length) + i64::from(self.skip)
    }

    pub fn position(&self, shift_name: &str) -> Option<usize> {
        self.shifts.iter().position(|s| s.name == shift_name)
    }
}

/// Affectation d'un email à un sous-créneau.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftMember {
    pub email: String,
    pub shift_name: String,
}

impl ShiftMember {
    pub fn new<E: Into<String>, S: Into<String>>(email: E, shift_name: S) -> Self {
        Self {
            email: email.into(),
            shift_name: shift_name.into(),
        }
    }
}

/// Configuration complète d'une rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
    /// Seuil (en cycles restants) en dessous duquel on replanifie ; 0 désactive.
    #[serde(default)]
    pub expiration: usize,
    #[serde(default)]
    pub shifts_to_schedule: usize,
    pub config: ShiftConfig,
    /// Ordre de déclaration = ordre de rotation de base.
    #[serde(default)]
    pub members: Vec<ShiftMember>,
}

impl Configuration {
    /// Vérifie qu'une configuration peut être confiée au moteur.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("rota name cannot be empty".to_string());
        }
        let sc = &self.config;
        if sc.shifts.is_empty() {
            return Err(format!("no shifts configured for rota: {:?}", self.name));
        }
        if sc.length == 0 {
            return Err("shift length must be > 0".to_string());
        }
        if sc.shift_members == 0 {
            return Err("shift_members must be > 0".to_string());
        }
        if sc.generator.trim().is_empty() {
            return Err("generator name cannot be empty".to_string());
        }
        let mut seen = HashSet::new();
        for s in &sc.shifts {
            if !seen.insert(s.name.as_str()) {
                return Err(format!("duplicate shift name: {:?}", s.name));
            }
        }
        Ok(())
    }

    /// Sous-créneau auquel `email` est rattaché, s'il est déclaré.
    pub fn shift_of(&self, email: &str) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.email == email)
            .map(|m| m.shift_name.as_str())
    }
}

/// Occurrence générée d'un sous-créneau.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftEntry {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub on_call: Vec<ShiftMember>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    /// Identifiant d'événement calendrier, renseigné hors du moteur.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evt_id: Option<String>,
    /// Début de l'occurrence générée dont cette entrée est un morceau ;
    /// posé par les modificateurs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence: Option<DateTime<Utc>>,
}

impl ShiftEntry {
    pub fn new<N: Into<String>>(name: N, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            on_call: Vec::new(),
            comment: String::new(),
            evt_id: None,
            occurrence: None,
        }
    }

    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.on_call.iter().map(|m| m.email.as_str())
    }

    /// Début de l'occurrence d'origine (`start` si l'entrée n'a pas été découpée).
    pub fn occurrence_start(&self) -> DateTime<Utc> {
        self.occurrence.unwrap_or(self.start)
    }
}

/// Une entrée par occurrence distincte `(nom, début d'origine)`, dans l'ordre
/// de première apparition. Les morceaux d'une même occurrence comptent une fois.
pub fn occurrences<'a, I>(entries: I) -> Vec<&'a ShiftEntry>
where
    I: IntoIterator<Item = &'a ShiftEntry>,
{
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e: &&'a ShiftEntry| {
            let e: &'a ShiftEntry = *e;
            seen.insert((e.name.as_str(), e.occurrence_start()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Configuration {
        Configuration {
            name: "postmaster".into(),
            description: String::new(),
            enabled: true,
            expiration: 2,
            shifts_to_schedule: 4,
            config: ShiftConfig {
                start_time: NaiveTime::MIN,
                length: 7,
                skip: 0,
                shifts: vec![SubShift::new("postmaster", Duration::hours(24))],
                shift_members: 1,
                generator: "Fair".into(),
                modifiers: Vec::new(),
            },
            members: vec![ShiftMember::new("a@example.com", "postmaster")],
        }
    }

    #[test]
    fn validate_rejects_empty_layout() {
        let mut cfg = sample();
        assert!(cfg.validate().is_ok());
        cfg.config.shifts.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_shift_names() {
        let mut cfg = sample();
        cfg.config
            .shifts
            .push(SubShift::new("postmaster", Duration::hours(8)));
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("duplicate"));
    }

    #[test]
    fn unknown_preferences_deserialize() {
        let m: Member = serde_json::from_str(
            r#"{"email":"a@example.com","preferences":["no_oncall","prefer_weekends"]}"#,
        )
        .unwrap();
        assert_eq!(m.preferences, vec![Preference::NoOncall, Preference::Unknown]);
        assert_eq!(m.tz, "UTC");
    }

    #[test]
    fn durations_serialize_as_seconds() {
        let s = SubShift::new("day", Duration::hours(8));
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"name":"day","duration":28800}"#);
    }

    #[test]
    fn pieces_of_one_occurrence_count_once() {
        use chrono::TimeZone;
        let t0 = Utc.with_ymd_and_hms(2018, 5, 7, 0, 0, 0).unwrap();
        let whole = ShiftEntry::new("postmaster", t0, t0 + Duration::days(2));
        let mut first = ShiftEntry::new("postmaster", t0, t0 + Duration::days(1));
        first.occurrence = Some(t0);
        let mut second = first.clone();
        second.start = t0 + Duration::days(1);
        second.end = t0 + Duration::days(2);
        let other = ShiftEntry::new("backup", t0, t0 + Duration::days(2));

        assert_eq!(second.occurrence_start(), t0);
        let entries = [first, second, whole, other];
        let got = occurrences(&entries);
        let keys: Vec<_> = got.iter().map(|e| (e.name.as_str(), e.start)).collect();
        assert_eq!(keys, [("postmaster", t0), ("backup", t0)]);
    }

    #[test]
    fn occurrence_marker_survives_json() {
        use chrono::TimeZone;
        let t0 = Utc.with_ymd_and_hms(2018, 5, 7, 0, 0, 0).unwrap();
        let plain = ShiftEntry::new("postmaster", t0, t0 + Duration::days(1));
        assert!(!serde_json::to_string(&plain).unwrap().contains("occurrence"));

        let mut piece = plain.clone();
        piece.occurrence = Some(t0 - Duration::days(1));
        let back: ShiftEntry =
            serde_json::from_str(&serde_json::to_string(&piece).unwrap()).unwrap();
        assert_eq!(back.occurrence_start(), t0 - Duration::days(1));
    }
}
