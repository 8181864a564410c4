use super::{
    availability::AvailabilityIndex,
    candidates::{self, DayLedger},
    demand::ShiftDemand,
    fairness::FairnessTracker,
    util, ScheduleOptions,
};
use crate::model::{Assignment, StaffId, UnfilledSlot};
use tracing::debug;

/// État final d'un run du glouton.
#[derive(Debug, Default)]
pub(super) struct EngineOutcome {
    pub assignments: Vec<Assignment>,
    pub unfilled: Vec<UnfilledSlot>,
    pub tracker: FairnessTracker,
}

/// Vide la file dans l'ordre ; chaque place est validée immédiatement, sans retour arrière.
pub(super) fn assign_fair(
    queue: Vec<ShiftDemand<'_>>,
    roster: &[StaffId],
    index: &AvailabilityIndex,
    opts: ScheduleOptions,
) -> EngineOutcome {
    let mut out = EngineOutcome::default();
    let mut ledger = DayLedger::default();

    for mut demand in queue {
        let shift = demand.shift;
        let seconds = shift.duration_seconds();

        while demand.remaining_slots > 0 {
            let eligible = candidates::eligible_staff(shift, roster, index, &ledger, opts);
            out.tracker.note_candidates(&eligible);

            let Some(chosen) = out.tracker.rank(eligible).into_iter().next() else {
                break;
            };

            debug!(shift = %shift.id, staff = %chosen, seconds, "assigned");
            ledger.record(&chosen, shift);
            out.tracker.record_assignment(&chosen, seconds);
            out.assignments.push(Assignment {
                shift_id: shift.id.clone(),
                staff_id: chosen,
                hours: util::seconds_to_hours(seconds),
            });
            demand.remaining_slots -= 1;
        }

        if demand.remaining_slots > 0 {
            debug!(
                shift = %shift.id,
                filled = demand.filled(),
                missing = demand.remaining_slots,
                "no eligible staff left"
            );
            out.unfilled.push(UnfilledSlot {
                shift_id: shift.id.clone(),
                missing_count: demand.remaining_slots,
            });
        }
    }

    out
}
