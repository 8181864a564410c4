use crate::model::Shift;

/// Entrée de la file : un shift et ses places restantes.
#[derive(Debug, Clone)]
pub struct ShiftDemand<'a> {
    pub shift: &'a Shift,
    pub remaining_slots: u32,
}

impl<'a> ShiftDemand<'a> {
    pub fn new(shift: &'a Shift) -> Self {
        Self {
            shift,
            remaining_slots: shift.required_count,
        }
    }

    pub fn filled(&self) -> u32 {
        self.shift.required_count - self.remaining_slots
    }
}

/// File ordonnée (date, début, id) : l'ordre rend le glouton reproductible.
pub fn build(shifts: &[Shift]) -> Vec<ShiftDemand<'_>> {
    let mut queue: Vec<ShiftDemand<'_>> = shifts.iter().map(ShiftDemand::new).collect();
    queue.sort_by(|a, b| {
        (a.shift.date, a.shift.start_time, &a.shift.id).cmp(&(
            b.shift.date,
            b.shift.start_time,
            &b.shift.id,
        ))
    });
    queue
}
