#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveTime};
use equiplan::{
    detect_conflicts, generate_schedule, ScheduleRequest, Shift, ShiftId, StaffId, WindowSpec,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn day(offset: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 6 + offset).unwrap()
}

fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

fn shift_strategy() -> impl Strategy<Value = (u32, u32, u32, u32)> {
    // (jour, début, durée, places)
    (0u32..3, 0u32..20, 1u32..5, 1u32..4)
}

fn window_strategy() -> impl Strategy<Value = (u32, u32, u32)> {
    // (jour, début, durée) ; durée 0 => plage mal formée
    (0u32..3, 0u32..20, 0u32..10)
}

prop_compose! {
    fn request_strategy()(
        shifts in prop::collection::vec(shift_strategy(), 0..10),
        windows in prop::collection::vec(prop::collection::vec(window_strategy(), 0..5), 0..6),
        allow in any::<bool>(),
    ) -> ScheduleRequest {
        let shifts = shifts
            .into_iter()
            .enumerate()
            .map(|(i, (d, start, len, req))| {
                let end = (start + len).min(23);
                Shift::new(format!("s{i:02}"), day(d), hour(start), hour(end), req).unwrap()
            })
            .collect();
        let mut availability = BTreeMap::new();
        let mut staff_list = Vec::new();
        for (i, ws) in windows.into_iter().enumerate() {
            let id = StaffId::new(format!("staff{i}"));
            staff_list.push(id.clone());
            let specs = ws
                .into_iter()
                .map(|(d, start, len)| {
                    let end = (start + len).min(23);
                    WindowSpec::new(day(d), hour(start), hour(end))
                })
                .collect::<Vec<_>>();
            availability.insert(id, specs);
        }
        ScheduleRequest {
            shifts,
            availability,
            staff_list,
            allow_multiple_shifts_per_day: allow,
        }
    }
}

proptest! {
    #[test]
    fn schedule_respects_invariants(req in request_strategy()) {
        let result = generate_schedule(&req).unwrap();

        // couverture : affectés + manquants = requis
        for shift in &req.shifts {
            let assigned = result.assignments_for(&shift.id).count() as u32;
            let missing = result
                .unfilled
                .iter()
                .find(|u| u.shift_id == shift.id)
                .map_or(0, |u| u.missing_count);
            prop_assert_eq!(assigned + missing, shift.required_count);
        }

        // disponibilité, chevauchement, un shift par jour
        let mut by_staff: BTreeMap<&StaffId, Vec<&Shift>> = BTreeMap::new();
        for a in &result.assignments {
            let shift = req.find_shift(&a.shift_id).unwrap();
            let covered = req.availability[&a.staff_id].iter().any(|w| {
                w.date == shift.date && w.start_time <= shift.start_time && shift.end_time <= w.end_time
            });
            prop_assert!(covered, "{} not available for {}", a.staff_id, a.shift_id);
            by_staff.entry(&a.staff_id).or_default().push(shift);
        }
        for shifts in by_staff.values() {
            for (i, a) in shifts.iter().enumerate() {
                for b in shifts.iter().skip(i + 1) {
                    if a.date != b.date {
                        continue;
                    }
                    prop_assert!(!(a.start_time < b.end_time && b.start_time < a.end_time));
                    prop_assert!(req.allow_multiple_shifts_per_day);
                }
            }
        }

        let score = result.stats.fairness_score;
        prop_assert!((0.0..=1.0).contains(&score));
        let assigned: Vec<f64> = result
            .loads
            .iter()
            .filter(|l| l.shift_count > 0)
            .map(|l| l.hours)
            .collect();
        if assigned.windows(2).all(|w| w[0] == w[1]) {
            prop_assert_eq!(score, 1.0);
        }

        prop_assert!(detect_conflicts(&req, &result).is_empty());

        let again = generate_schedule(&req).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&result).unwrap(),
            serde_json::to_string(&again).unwrap()
        );
    }

    #[test]
    fn unknown_shift_ids_never_appear(req in request_strategy()) {
        let result = generate_schedule(&req).unwrap();
        let ids: Vec<&ShiftId> = req.shifts.iter().map(|s| &s.id).collect();
        for a in &result.assignments {
            prop_assert!(ids.contains(&&a.shift_id));
        }
        for u in &result.unfilled {
            prop_assert!(ids.contains(&&u.shift_id));
        }
    }
}
