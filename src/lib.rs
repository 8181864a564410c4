#![forbid(unsafe_code)]
//! Equiplan — génération de plannings équitables, sans base de données.
//!
//! - Moteur pur : créneaux + disponibilités + équipe → affectations.
//! - Glouton déterministe, le moins chargé d'abord, score d'équité dans [0, 1].
//! - Audit de conflits sur un planning existant.
//! - Entrées/sorties fichiers (JSON/CSV) et templates hebdomadaires en dehors du moteur.

pub mod io;
pub mod model;
pub mod render;
pub mod scheduler;
pub mod storage;
pub mod template;

pub use model::{
    Assignment, AvailabilityWindow, ScheduleRequest, ScheduleResult, ScheduleStats, Shift,
    ShiftId, StaffId, StaffLoad, UnfilledSlot, WindowSpec,
};
pub use render::{ScheduleRenderer, TextSummary};
pub use scheduler::{
    detect_conflicts, generate_schedule, Conflict, ConflictKind, SchedError, ScheduleOptions,
    ValidationWarning,
};
pub use storage::{JsonStorage, Storage};
pub use template::{
    generate_shifts, load_template_from_file, Slot, Template, TemplateInfo, TemplateStore,
};
