//! Moteur de planification équitable.
//!
//! Fonction pure : la requête entre, le résultat sort. Aucun état partagé entre
//! deux appels ; chaque run construit son propre index et son propre suivi de charge.

mod assignment;
pub mod availability;
pub mod candidates;
mod conflicts;
pub mod demand;
pub mod fairness;
pub mod report;
mod types;
mod util;

pub use availability::AvailabilityIndex;
pub use conflicts::detect_conflicts;
pub use fairness::{fairness_score, FairnessTracker};
pub use report::RunTotals;
pub use types::{Conflict, ConflictKind, SchedError, ScheduleOptions, ValidationWarning};

use crate::model::{ScheduleRequest, ScheduleResult, StaffId};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Génère un planning pour `request`.
///
/// Rejette tout le run si un shift est invalide ; les disponibilités mal formées
/// sont seulement écartées et signalées dans `warnings`.
pub fn generate_schedule(request: &ScheduleRequest) -> Result<ScheduleResult, SchedError> {
    validate_shifts(request)?;

    let opts = ScheduleOptions::from(request);
    let (roster, mut warnings) = normalize_roster(&request.staff_list);

    let known: BTreeSet<&StaffId> = roster.iter().collect();
    warnings.extend(
        request
            .availability
            .keys()
            .filter(|id| !known.contains(id))
            .cloned()
            .map(ValidationWarning::UnknownAvailabilityStaff),
    );

    let (index, window_warnings) = AvailabilityIndex::build(&request.availability);
    warnings.extend(window_warnings);
    for w in &warnings {
        warn!("{w}");
    }

    let queue = demand::build(&request.shifts);
    let totals = RunTotals {
        total_shifts: queue.len(),
        total_staff_considered: roster.len(),
        required_slots: queue.iter().map(|d| u64::from(d.remaining_slots)).sum(),
    };

    let outcome = assignment::assign_fair(queue, &roster, &index, opts);
    let loads = outcome.tracker.snapshot();
    let score = fairness_score(&loads);

    let result = report::compile(
        outcome.assignments,
        outcome.unfilled,
        loads,
        score,
        totals,
        warnings.iter().map(ToString::to_string).collect(),
    );

    info!(
        shifts = result.stats.total_shifts,
        staff = result.stats.total_staff_considered,
        filled = result.stats.filled_slots,
        unfilled = result.stats.unfilled_count,
        fairness = result.stats.fairness_score,
        "schedule generated"
    );

    Ok(result)
}

fn validate_shifts(request: &ScheduleRequest) -> Result<(), SchedError> {
    let mut seen = BTreeSet::new();
    for shift in &request.shifts {
        if shift.id.as_str().trim().is_empty() {
            return Err(SchedError::EmptyShiftId);
        }
        if shift.end_time <= shift.start_time {
            return Err(SchedError::InvalidShift {
                shift_id: shift.id.as_str().to_string(),
            });
        }
        if shift.required_count == 0 {
            return Err(SchedError::InvalidRequiredCount {
                shift_id: shift.id.as_str().to_string(),
            });
        }
        if !seen.insert(&shift.id) {
            return Err(SchedError::DuplicateShift(shift.id.as_str().to_string()));
        }
    }
    Ok(())
}

/// Dédoublonne le roster en gardant la première occurrence.
fn normalize_roster(staff: &[StaffId]) -> (Vec<StaffId>, Vec<ValidationWarning>) {
    let mut seen = BTreeSet::new();
    let mut roster = Vec::with_capacity(staff.len());
    let mut warnings = Vec::new();
    for id in staff {
        if seen.insert(id) {
            roster.push(id.clone());
        } else {
            warnings.push(ValidationWarning::DuplicateStaff(id.clone()));
        }
    }
    (roster, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Shift, WindowSpec};
    use chrono::{NaiveDate, NaiveTime};

    fn d() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 6).unwrap()
    }
    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn shift(id: &str, from: u32, to: u32, required: u32) -> Shift {
        Shift {
            id: crate::model::ShiftId::new(id),
            date: d(),
            start_time: t(from),
            end_time: t(to),
            required_count: required,
        }
    }

    #[test]
    fn rejects_invalid_shifts_before_assigning() {
        let mut req = ScheduleRequest {
            shifts: vec![shift("a", 8, 12, 1), shift("a", 13, 14, 1)],
            ..Default::default()
        };
        assert!(matches!(
            generate_schedule(&req),
            Err(SchedError::DuplicateShift(id)) if id == "a"
        ));

        req.shifts = vec![shift("b", 12, 8, 1)];
        assert!(matches!(
            generate_schedule(&req),
            Err(SchedError::InvalidShift { .. })
        ));

        req.shifts = vec![shift("c", 8, 12, 0)];
        assert!(matches!(
            generate_schedule(&req),
            Err(SchedError::InvalidRequiredCount { .. })
        ));

        req.shifts = vec![shift(" ", 8, 12, 1)];
        assert!(matches!(generate_schedule(&req), Err(SchedError::EmptyShiftId)));
    }

    #[test]
    fn degenerate_input_is_not_an_error() {
        let empty = generate_schedule(&ScheduleRequest::default()).unwrap();
        assert!(empty.assignments.is_empty());
        assert!(empty.unfilled.is_empty());
        assert_eq!(empty.stats.fairness_score, 1.0);

        let no_staff = ScheduleRequest {
            shifts: vec![shift("a", 8, 12, 2)],
            ..Default::default()
        };
        let result = generate_schedule(&no_staff).unwrap();
        assert!(result.assignments.is_empty());
        assert_eq!(result.unfilled[0].missing_count, 2);
        assert_eq!(result.stats.unfilled_count, 2);
        assert_eq!(result.stats.fairness_score, 1.0);
    }

    #[test]
    fn slot_totals_do_not_overflow_on_huge_required_counts() {
        let mut req = ScheduleRequest {
            shifts: vec![shift("a", 8, 12, u32::MAX), shift("b", 13, 17, 2)],
            staff_list: vec![StaffId::new("alice")],
            ..Default::default()
        };
        req.availability
            .insert(StaffId::new("alice"), vec![WindowSpec::new(d(), t(6), t(20))]);

        let result = generate_schedule(&req).unwrap();
        let required = u64::from(u32::MAX) + 2;
        assert_eq!(result.stats.required_slots, required);
        assert_eq!(result.stats.filled_slots, 1);
        assert_eq!(result.stats.unfilled_count, required - 1);
        assert_eq!(result.unfilled[0].missing_count, u32::MAX - 1);
        assert_eq!(result.unfilled[1].missing_count, 2);
    }

    #[test]
    fn warnings_are_reported_not_fatal() {
        let mut req = ScheduleRequest {
            shifts: vec![shift("a", 8, 12, 1)],
            staff_list: vec![StaffId::new("alice"), StaffId::new("alice")],
            ..Default::default()
        };
        req.availability.insert(
            StaffId::new("alice"),
            vec![WindowSpec::new(d(), t(12), t(8)), WindowSpec::new(d(), t(8), t(12))],
        );
        req.availability
            .insert(StaffId::new("ghost"), vec![WindowSpec::new(d(), t(8), t(12))]);

        let result = generate_schedule(&req).unwrap();
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.stats.total_staff_considered, 1);
        assert_eq!(result.warnings.len(), 3);
        assert!(result.warnings[0].contains("more than once"));
    }
}
