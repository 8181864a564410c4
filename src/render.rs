use crate::model::{hhmm, ScheduleRequest, ScheduleResult};
use std::fmt::Write;

/// Permet de customiser le rendu d'un planning (texte, mail, etc.).
pub trait ScheduleRenderer {
    fn render(&self, request: &ScheduleRequest, result: &ScheduleResult) -> String;
}

/// Résumé texte : une ligne de stats, puis une ligne par affectation, place vide et avertissement.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextSummary;

impl ScheduleRenderer for TextSummary {
    fn render(&self, request: &ScheduleRequest, result: &ScheduleResult) -> String {
        let stats = &result.stats;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "fairness={:.2} shifts={} staff={} filled={}/{} unfilled={}",
            stats.fairness_score,
            stats.total_shifts,
            stats.total_staff_considered,
            stats.filled_slots,
            stats.required_slots,
            stats.unfilled_count
        );

        for a in &result.assignments {
            let when = request
                .find_shift(&a.shift_id)
                .map(|s| {
                    format!(
                        "{} {}-{}",
                        s.date.format("%Y-%m-%d"),
                        hhmm::display(&s.start_time),
                        hhmm::display(&s.end_time)
                    )
                })
                .unwrap_or_else(|| "?".to_string());
            let _ = writeln!(
                out,
                "{} {} {} {:.2}h",
                a.shift_id, when, a.staff_id, a.hours
            );
        }
        for u in &result.unfilled {
            let _ = writeln!(out, "UNFILLED {} missing {}", u.shift_id, u.missing_count);
        }
        for w in &result.warnings {
            let _ = writeln!(out, "WARN {w}");
        }
        out
    }
}
