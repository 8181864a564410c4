use crate::model::{Assignment, ScheduleResult, ScheduleStats, StaffLoad, UnfilledSlot};

/// Totaux connus avant le run, repris tels quels dans les statistiques.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunTotals {
    pub total_shifts: usize,
    pub total_staff_considered: usize,
    pub required_slots: u64,
}

/// Assemble le résultat final. Agrégation pure.
pub fn compile(
    assignments: Vec<Assignment>,
    unfilled: Vec<UnfilledSlot>,
    loads: Vec<StaffLoad>,
    fairness_score: f64,
    totals: RunTotals,
    warnings: Vec<String>,
) -> ScheduleResult {
    // sommes en u64 : plusieurs `requiredCount` proches de u32::MAX restent représentables
    let unfilled_count: u64 = unfilled.iter().map(|u| u64::from(u.missing_count)).sum();
    let filled_slots = u64::try_from(assignments.len()).unwrap_or(u64::MAX);

    ScheduleResult {
        stats: ScheduleStats {
            fairness_score,
            total_shifts: totals.total_shifts,
            total_staff_considered: totals.total_staff_considered,
            unfilled_count,
            required_slots: totals.required_slots,
            filled_slots,
        },
        assignments,
        unfilled,
        loads,
        warnings,
    }
}
