use super::types::ValidationWarning;
use crate::model::{AvailabilityWindow, StaffId, WindowSpec};
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;

/// Index des disponibilités : personne → jour → plages.
#[derive(Debug, Default, Clone)]
pub struct AvailabilityIndex {
    by_staff: BTreeMap<StaffId, BTreeMap<NaiveDate, Vec<AvailabilityWindow>>>,
}

impl AvailabilityIndex {
    /// Construit l'index. Les plages avec `end <= start` sont écartées et signalées.
    pub fn build(raw: &BTreeMap<StaffId, Vec<WindowSpec>>) -> (Self, Vec<ValidationWarning>) {
        let mut index = Self::default();
        let mut warnings = Vec::new();

        for (staff_id, windows) in raw {
            for w in windows {
                if w.end_time <= w.start_time {
                    warnings.push(ValidationWarning::MalformedWindow {
                        staff_id: staff_id.clone(),
                        date: w.date,
                        start: w.start_time,
                        end: w.end_time,
                    });
                    continue;
                }
                index
                    .by_staff
                    .entry(staff_id.clone())
                    .or_default()
                    .entry(w.date)
                    .or_default()
                    .push(AvailabilityWindow {
                        staff_id: staff_id.clone(),
                        date: w.date,
                        start_time: w.start_time,
                        end_time: w.end_time,
                    });
            }
        }

        for days in index.by_staff.values_mut() {
            for windows in days.values_mut() {
                windows.sort_by_key(|w| (w.start_time, w.end_time));
            }
        }

        (index, warnings)
    }

    /// Vrai si une plage unique de `staff` ce jour-là contient entièrement `[start, end)`.
    pub fn is_available(
        &self,
        staff: &StaffId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> bool {
        self.windows(staff, date).iter().any(|w| w.covers(start, end))
    }

    pub fn windows(&self, staff: &StaffId, date: NaiveDate) -> &[AvailabilityWindow] {
        self.by_staff
            .get(staff)
            .and_then(|days| days.get(&date))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
