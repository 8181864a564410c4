use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifiant fort pour un membre de l'équipe
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StaffId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifiant fort pour Shift
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShiftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Créneau à pourvoir : une date, une plage horaire et un nombre de personnes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: ShiftId,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub required_count: u32,
}

impl Shift {
    /// Crée un shift en validant que `end > start` et `required_count >= 1`.
    pub fn new<S: AsRef<str>>(
        id: S,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        required_count: u32,
    ) -> Result<Self, String> {
        if end_time <= start_time {
            return Err("end must be strictly after start".to_string());
        }
        if required_count == 0 {
            return Err("required count must be at least 1".to_string());
        }
        Ok(Self {
            id: ShiftId::new(id),
            date,
            start_time,
            end_time,
            required_count,
        })
    }

    /// Durée en secondes (les heures peuvent porter des secondes).
    pub fn duration_seconds(&self) -> i64 {
        (self.end_time - self.start_time).num_seconds()
    }
}

/// Plage de disponibilité déclarée (sans identifiant : la clé de la map porte la personne).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSpec {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl WindowSpec {
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            date,
            start_time,
            end_time,
        }
    }
}

/// Plage de disponibilité rattachée à une personne.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl AvailabilityWindow {
    pub fn covers(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start_time <= start && end <= self.end_time
    }
}

/// Entrée du moteur, telle que fournie par la couche appelante.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[serde(default)]
    pub shifts: Vec<Shift>,
    #[serde(default)]
    pub availability: BTreeMap<StaffId, Vec<WindowSpec>>,
    #[serde(default)]
    pub staff_list: Vec<StaffId>,
    #[serde(default)]
    pub allow_multiple_shifts_per_day: bool,
}

impl ScheduleRequest {
    pub fn find_shift<'a>(&'a self, id: &ShiftId) -> Option<&'a Shift> {
        self.shifts.iter().find(|s| &s.id == id)
    }
}

/// Affectation d'une personne à un shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub shift_id: ShiftId,
    pub staff_id: StaffId,
    pub hours: f64,
}

/// Places restées vides pour un shift en fin de run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfilledSlot {
    pub shift_id: ShiftId,
    pub missing_count: u32,
}

/// Charge cumulée d'une personne sur le run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffLoad {
    pub staff_id: StaffId,
    pub shift_count: u32,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStats {
    pub fairness_score: f64,
    pub total_shifts: usize,
    pub total_staff_considered: usize,
    pub unfilled_count: u64,
    pub required_slots: u64,
    pub filled_slots: u64,
}

/// Sortie du moteur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub assignments: Vec<Assignment>,
    pub unfilled: Vec<UnfilledSlot>,
    pub loads: Vec<StaffLoad>,
    pub stats: ScheduleStats,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ScheduleResult {
    pub fn assignments_for<'a>(
        &'a self,
        shift: &'a ShiftId,
    ) -> impl Iterator<Item = &'a Assignment> {
        self.assignments.iter().filter(move |a| &a.shift_id == shift)
    }

    pub fn is_complete(&self) -> bool {
        self.unfilled.is_empty()
    }
}

/// Heures au format `HH:MM`, ou `HH:MM:SS` quand les secondes ne sont pas nulles.
pub(crate) mod hhmm {
    use chrono::{NaiveTime, Timelike};
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::fmt;

    const FORMAT: &str = "%H:%M";
    const FORMAT_SECS: &str = "%H:%M:%S";

    /// Forme canonique : relire la sortie redonne la même heure à la seconde près.
    pub fn display(t: &NaiveTime) -> impl fmt::Display {
        t.format(if t.second() == 0 { FORMAT } else { FORMAT_SECS })
    }

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&display(t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveTime, String> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw, FORMAT_SECS))
            .map_err(|e| format!("invalid time {raw:?}: {e}"))
    }
}
