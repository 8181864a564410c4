use super::util;
use crate::model::{StaffId, StaffLoad};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Load {
    seconds: i64,
    shifts: u32,
}

/// Compteurs de charge d'un run. Une instance par run, jamais partagée.
#[derive(Debug, Default, Clone)]
pub struct FairnessTracker {
    loads: BTreeMap<StaffId, Load>,
}

impl FairnessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre que ces personnes ont eu au moins une occasion d'être affectées.
    pub fn note_candidates(&mut self, candidates: &[StaffId]) {
        for staff in candidates {
            self.loads.entry(staff.clone()).or_default();
        }
    }

    /// Classe les candidats du moins chargé au plus chargé.
    /// Clé : durée cumulée, puis nombre de shifts, puis identifiant.
    pub fn rank(&self, mut candidates: Vec<StaffId>) -> Vec<StaffId> {
        candidates.sort_by(|a, b| {
            let la = self.loads.get(a).copied().unwrap_or_default();
            let lb = self.loads.get(b).copied().unwrap_or_default();
            la.cmp(&lb).then_with(|| a.cmp(b))
        });
        candidates
    }

    pub fn record_assignment(&mut self, staff: &StaffId, seconds: i64) {
        let load = self.loads.entry(staff.clone()).or_default();
        load.seconds += seconds;
        load.shifts += 1;
    }

    /// Charges finales, triées par identifiant.
    pub fn snapshot(&self) -> Vec<StaffLoad> {
        self.loads
            .iter()
            .map(|(staff, load)| StaffLoad {
                staff_id: staff.clone(),
                shift_count: load.shifts,
                hours: util::seconds_to_hours(load.seconds),
            })
            .collect()
    }
}

/// Score d'équité dans [0, 1] : `1 - min(1, écart-type / moyenne)` des heures
/// des personnes ayant reçu au moins une affectation.
/// Vaut 1.0 si zéro ou une personne est affectée, ou si toutes ont les mêmes heures.
pub fn fairness_score(loads: &[StaffLoad]) -> f64 {
    let hours: Vec<f64> = loads
        .iter()
        .filter(|l| l.shift_count > 0)
        .map(|l| l.hours)
        .collect();

    if hours.len() <= 1 || hours.iter().all(|h| *h == hours[0]) {
        return 1.0;
    }

    let n = hours.len() as f64;
    let mean = hours.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 1.0;
    }
    let variance = hours.iter().map(|h| (h - mean).powi(2)).sum::<f64>() / n;
    let cv = variance.sqrt() / mean;

    (1.0 - cv.min(1.0)).clamp(0.0, 1.0)
}
