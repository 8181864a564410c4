use super::{availability::AvailabilityIndex, util, Conflict, ConflictKind};
use crate::model::{ScheduleRequest, ScheduleResult, Shift, StaffId};
use std::collections::{BTreeMap, BTreeSet};

/// Contrôle un résultat (éventuellement retouché à la main) contre sa requête.
pub fn detect_conflicts(request: &ScheduleRequest, result: &ScheduleResult) -> Vec<Conflict> {
    let mut out = Vec::new();
    let (index, _) = AvailabilityIndex::build(&request.availability);
    let roster: BTreeSet<&StaffId> = request.staff_list.iter().collect();

    let mut per_staff: BTreeMap<&StaffId, Vec<&Shift>> = BTreeMap::new();
    let mut per_shift: BTreeMap<&str, u32> = BTreeMap::new();

    for a in &result.assignments {
        let Some(shift) = request.find_shift(&a.shift_id) else {
            out.push(Conflict {
                staff: Some(a.staff_id.clone()),
                shift_a: a.shift_id.clone(),
                shift_b: None,
                kind: ConflictKind::UnknownShift,
            });
            continue;
        };
        if !roster.contains(&a.staff_id) {
            out.push(Conflict {
                staff: Some(a.staff_id.clone()),
                shift_a: a.shift_id.clone(),
                shift_b: None,
                kind: ConflictKind::UnknownStaff,
            });
        }
        if !index.is_available(&a.staff_id, shift.date, shift.start_time, shift.end_time) {
            out.push(Conflict {
                staff: Some(a.staff_id.clone()),
                shift_a: a.shift_id.clone(),
                shift_b: None,
                kind: ConflictKind::OutsideAvailability,
            });
        }
        *per_shift.entry(shift.id.as_str()).or_default() += 1;
        per_staff.entry(&a.staff_id).or_default().push(shift);
    }

    for shift in &request.shifts {
        if per_shift.get(shift.id.as_str()).copied().unwrap_or(0) > shift.required_count {
            out.push(Conflict {
                staff: None,
                shift_a: shift.id.clone(),
                shift_b: None,
                kind: ConflictKind::OverStaffed,
            });
        }
    }

    for (staff, mut shifts) in per_staff {
        shifts.sort_by_key(|s| (s.date, s.start_time));

        for (idx, a) in shifts.iter().enumerate() {
            for b in shifts.iter().skip(idx + 1).take_while(|b| b.date == a.date) {
                let kind = if util::overlaps(a.start_time, a.end_time, b.start_time, b.end_time) {
                    ConflictKind::Overlap
                } else if !request.allow_multiple_shifts_per_day {
                    ConflictKind::SameDay
                } else {
                    continue;
                };
                out.push(Conflict {
                    staff: Some(staff.clone()),
                    shift_a: a.id.clone(),
                    shift_b: Some(b.id.clone()),
                    kind,
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Assignment, ShiftId, WindowSpec};
    use crate::scheduler::generate_schedule;
    use chrono::{NaiveDate, NaiveTime};

    fn d() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 6).unwrap()
    }
    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn request() -> ScheduleRequest {
        let mut req = ScheduleRequest {
            shifts: vec![
                Shift::new("am", d(), t(8), t(12), 1).unwrap(),
                Shift::new("mid", d(), t(11), t(15), 1).unwrap(),
                Shift::new("pm", d(), t(13), t(17), 1).unwrap(),
            ],
            staff_list: vec![StaffId::new("alice"), StaffId::new("bob")],
            ..Default::default()
        };
        req.availability
            .insert(StaffId::new("alice"), vec![WindowSpec::new(d(), t(8), t(17))]);
        req.availability
            .insert(StaffId::new("bob"), vec![WindowSpec::new(d(), t(8), t(12))]);
        req
    }

    fn assign(shift: &str, staff: &str) -> Assignment {
        Assignment {
            shift_id: ShiftId::new(shift),
            staff_id: StaffId::new(staff),
            hours: 4.0,
        }
    }

    #[test]
    fn engine_output_audits_clean() {
        for allow in [false, true] {
            let mut req = request();
            req.allow_multiple_shifts_per_day = allow;
            let result = generate_schedule(&req).unwrap();
            assert!(detect_conflicts(&req, &result).is_empty());
        }
    }

    #[test]
    fn flags_hand_edited_violations() {
        let req = request();
        let mut result = generate_schedule(&req).unwrap();
        result.assignments = vec![
            assign("am", "alice"),
            assign("mid", "alice"),
            assign("pm", "alice"),
            assign("pm", "bob"),
            assign("ghost", "alice"),
            assign("am", "mallory"),
        ];

        let kinds: Vec<ConflictKind> = detect_conflicts(&req, &result)
            .into_iter()
            .map(|c| c.kind)
            .collect();
        assert!(kinds.contains(&ConflictKind::Overlap));
        assert!(kinds.contains(&ConflictKind::SameDay));
        assert!(kinds.contains(&ConflictKind::OutsideAvailability));
        assert!(kinds.contains(&ConflictKind::OverStaffed));
        assert!(kinds.contains(&ConflictKind::UnknownShift));
        assert!(kinds.contains(&ConflictKind::UnknownStaff));
    }
}
