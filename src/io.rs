use crate::model::{hhmm, ScheduleResult, Shift, StaffId, WindowSpec};
use anyhow::{bail, Context};
use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::BTreeMap;
use std::path::Path;

/// Import de shifts: header `id,date,start,end,required` (date `YYYY-MM-DD`, heures `HH:MM`)
pub fn import_shifts_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Shift>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        if id.is_empty() {
            bail!("invalid shift row (empty id)");
        }
        let date = parse_date(rec.get(1).context("missing date")?)?;
        let start = parse_time(rec.get(2).context("missing start")?)?;
        let end = parse_time(rec.get(3).context("missing end")?)?;
        let required: u32 = match rec.get(4).map(str::trim) {
            Some(raw) if !raw.is_empty() => raw
                .parse()
                .with_context(|| format!("invalid required count for shift {id}"))?,
            _ => 1,
        };
        let shift = Shift::new(id, date, start, end, required)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("shift {id}"))?;
        out.push(shift);
    }
    Ok(out)
}

/// Import de disponibilités: header `staff,date,start,end`.
///
/// Les plages mal formées sont conservées : le moteur les écarte avec un avertissement.
/// Le second élément liste les personnes dans l'ordre de première apparition.
pub fn import_availability_csv<P: AsRef<Path>>(
    path: P,
) -> anyhow::Result<(BTreeMap<StaffId, Vec<WindowSpec>>, Vec<StaffId>)> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut map: BTreeMap<StaffId, Vec<WindowSpec>> = BTreeMap::new();
    let mut order = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let staff = rec.get(0).context("missing staff")?.trim();
        if staff.is_empty() {
            bail!("invalid availability row (empty staff)");
        }
        let date = parse_date(rec.get(1).context("missing date")?)?;
        let start = parse_time(rec.get(2).context("missing start")?)?;
        let end = parse_time(rec.get(3).context("missing end")?)?;

        let id = StaffId::new(staff);
        if !map.contains_key(&id) {
            order.push(id.clone());
        }
        map.entry(id)
            .or_default()
            .push(WindowSpec::new(date, start, end));
    }
    Ok((map, order))
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

fn parse_time(raw: &str) -> anyhow::Result<NaiveTime> {
    hhmm::parse(raw).map_err(anyhow::Error::msg)
}

/// Export CSV des shifts: header `id,date,start,end,required`
pub fn export_shifts_csv<P: AsRef<Path>>(path: P, shifts: &[Shift]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["id", "date", "start", "end", "required"])?;
    let mut buf = itoa::Buffer::new();
    for s in shifts {
        let date = s.date.format("%Y-%m-%d").to_string();
        let start = hhmm::display(&s.start_time).to_string();
        let end = hhmm::display(&s.end_time).to_string();
        w.write_record([
            s.id.as_str(),
            date.as_str(),
            start.as_str(),
            end.as_str(),
            buf.format(s.required_count),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des affectations: header `shift_id,staff_id,hours`, puis une ligne
/// `shift_id,,-missing` par place restée vide.
pub fn export_assignments_csv<P: AsRef<Path>>(
    path: P,
    result: &ScheduleResult,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["shift_id", "staff_id", "hours"])?;
    for a in &result.assignments {
        let hours = format!("{:.2}", a.hours);
        w.write_record([a.shift_id.as_str(), a.staff_id.as_str(), hours.as_str()])?;
    }
    let mut buf = itoa::Buffer::new();
    for u in &result.unfilled {
        let missing = format!("-{}", buf.format(u.missing_count));
        w.write_record([u.shift_id.as_str(), "", missing.as_str()])?;
    }
    w.flush()?;
    Ok(())
}
