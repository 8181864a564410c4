use crate::model::{hhmm, ScheduleRequest, ShiftId, StaffId};
use chrono::{NaiveDate, NaiveTime};
use std::fmt;
use thiserror::Error;

/// Options d'assignation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleOptions {
    /// Autorise plusieurs shifts (non chevauchants) le même jour pour une personne.
    pub allow_multiple_per_day: bool,
}

impl From<&ScheduleRequest> for ScheduleOptions {
    fn from(req: &ScheduleRequest) -> Self {
        Self {
            allow_multiple_per_day: req.allow_multiple_shifts_per_day,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    Overlap,
    SameDay,
    OutsideAvailability,
    OverStaffed,
    UnknownShift,
    UnknownStaff,
}

impl ConflictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictKind::Overlap => "overlap",
            ConflictKind::SameDay => "same_day",
            ConflictKind::OutsideAvailability => "outside_availability",
            ConflictKind::OverStaffed => "over_staffed",
            ConflictKind::UnknownShift => "unknown_shift",
            ConflictKind::UnknownStaff => "unknown_staff",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub staff: Option<StaffId>,
    pub shift_a: ShiftId,
    pub shift_b: Option<ShiftId>,
    pub kind: ConflictKind,
}

/// Problème d'entrée non bloquant : la donnée fautive est ignorée et le run continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    MalformedWindow {
        staff_id: StaffId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    },
    DuplicateStaff(StaffId),
    UnknownAvailabilityStaff(StaffId),
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::MalformedWindow {
                staff_id,
                date,
                start,
                end,
            } => write!(
                f,
                "dropped availability window for {staff_id} on {date}: {} >= {}",
                hhmm::display(start),
                hhmm::display(end)
            ),
            ValidationWarning::DuplicateStaff(id) => {
                write!(f, "staff {id} listed more than once in roster")
            }
            ValidationWarning::UnknownAvailabilityStaff(id) => {
                write!(f, "availability supplied for {id} who is not in the roster")
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid shift {shift_id}: end must be after start")]
    InvalidShift { shift_id: String },
    #[error("invalid shift {shift_id}: required count must be at least 1")]
    InvalidRequiredCount { shift_id: String },
    #[error("duplicate shift id: {0}")]
    DuplicateShift(String),
    #[error("shift id cannot be empty")]
    EmptyShiftId,
}
