use super::{availability::AvailabilityIndex, util, ScheduleOptions};
use crate::model::{Shift, ShiftId, StaffId};
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Booking {
    shift: ShiftId,
    start: NaiveTime,
    end: NaiveTime,
}

/// Registre des affectations déjà validées, par personne et par jour.
#[derive(Debug, Default, Clone)]
pub struct DayLedger {
    bookings: BTreeMap<StaffId, BTreeMap<NaiveDate, Vec<Booking>>>,
}

impl DayLedger {
    pub fn record(&mut self, staff: &StaffId, shift: &Shift) {
        self.bookings
            .entry(staff.clone())
            .or_default()
            .entry(shift.date)
            .or_default()
            .push(Booking {
                shift: shift.id.clone(),
                start: shift.start_time,
                end: shift.end_time,
            });
    }

    pub fn count_on(&self, staff: &StaffId, date: NaiveDate) -> usize {
        self.day(staff, date).len()
    }

    /// Premier shift déjà tenu ce jour-là qui chevauche `[start, end)`.
    pub fn overlapping(
        &self,
        staff: &StaffId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Option<&ShiftId> {
        self.day(staff, date)
            .iter()
            .find(|b| util::overlaps(b.start, b.end, start, end))
            .map(|b| &b.shift)
    }

    fn day(&self, staff: &StaffId, date: NaiveDate) -> &[Booking] {
        self.bookings
            .get(staff)
            .and_then(|days| days.get(&date))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Vérifie si `staff` peut prendre `shift` selon les contraintes dures.
pub(super) fn staff_ok_for_shift(
    staff: &StaffId,
    shift: &Shift,
    index: &AvailabilityIndex,
    ledger: &DayLedger,
    opts: ScheduleOptions,
) -> bool {
    if !index.is_available(staff, shift.date, shift.start_time, shift.end_time) {
        return false;
    }
    if ledger
        .overlapping(staff, shift.date, shift.start_time, shift.end_time)
        .is_some()
    {
        return false;
    }
    if !opts.allow_multiple_per_day && ledger.count_on(staff, shift.date) > 0 {
        return false;
    }
    true
}

/// Personnes éligibles pour `shift`, dans l'ordre du roster (pas de classement ici).
pub fn eligible_staff(
    shift: &Shift,
    roster: &[StaffId],
    index: &AvailabilityIndex,
    ledger: &DayLedger,
    opts: ScheduleOptions,
) -> Vec<StaffId> {
    roster
        .iter()
        .filter(|staff| staff_ok_for_shift(staff, shift, index, ledger, opts))
        .cloned()
        .collect()
}
