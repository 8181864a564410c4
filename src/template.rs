use crate::model::{hhmm, Shift};
use crate::storage;
use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Semaine type : les créneaux à pourvoir, répétés sur une période.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slots: Vec<Slot>,
}

impl Template {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            bail!("template id cannot be empty");
        }
        if self.name.trim().is_empty() {
            bail!("template name cannot be empty");
        }
        if self.slots.is_empty() {
            bail!("template must contain at least one slot");
        }
        for slot in &self.slots {
            slot.validate()?;
        }
        validate_slot_names(&self.slots)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    /// Jours ISO : 1 = lundi … 7 = dimanche.
    pub days: Vec<u8>,
    #[serde(default = "default_required")]
    pub required_count: u32,
}

fn default_required() -> u32 {
    1
}

impl Slot {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("slot name cannot be empty");
        }
        if self.days.is_empty() {
            bail!("slot {} must define at least one day", self.name);
        }
        if let Some(day) = self.days.iter().find(|d| !(1..=7).contains(*d)) {
            bail!("slot {} has invalid day {day} (expected 1..=7)", self.name);
        }
        if self.end_time <= self.start_time {
            bail!("slot {} end_time must be after start_time", self.name);
        }
        if self.required_count == 0 {
            bail!("slot {} required_count must be >= 1", self.name);
        }
        Ok(())
    }
}

/// Template relu depuis le store, avec le fichier d'où il vient.
#[derive(Debug, Clone)]
pub struct TemplateInfo {
    pub template: Template,
    pub path: PathBuf,
}

/// Templates persistés dans un dossier, un fichier `{id}.json` par template.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    base_dir: PathBuf,
}

impl TemplateStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            base_dir: dir.as_ref().to_path_buf(),
        }
    }

    /// L'id sert de nom de fichier et de préfixe des shifts générés : pas de séparateur ni de `.` initial.
    fn file_for(&self, id: &str) -> Result<PathBuf> {
        let ok = !id.starts_with('.')
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !ok {
            bail!("template id {id:?} cannot be used as a file name");
        }
        Ok(self.base_dir.join(format!("{id}.json")))
    }

    /// Valide puis écrit atomiquement ; crée le dossier au besoin.
    pub fn save(&self, template: &Template) -> Result<PathBuf> {
        template.validate()?;
        let path = self.file_for(&template.id)?;
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("creating template directory {}", self.base_dir.display()))?;
        storage::write_json_atomic(&path, template)
            .with_context(|| format!("saving template {}", template.id))?;
        Ok(path)
    }

    pub fn load(&self, id: &str) -> Result<Template> {
        let template = load_template_from_file(self.file_for(id)?)?;
        if template.id != id {
            bail!("template file {id}.json declares id {}", template.id);
        }
        Ok(template)
    }

    /// Templates valides du dossier, triés par id. Un fichier illisible est ignoré avec un avertissement.
    pub fn list(&self) -> Result<Vec<TemplateInfo>> {
        let entries = match fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("listing templates in {}", self.base_dir.display()))
            }
        };

        let mut infos = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match load_template_from_file(&path) {
                Ok(template) => infos.push(TemplateInfo { template, path }),
                Err(err) => tracing::warn!(path = %path.display(), "skipping template: {err:#}"),
            }
        }
        infos.sort_by(|a, b| a.template.id.cmp(&b.template.id));
        Ok(infos)
    }
}

/// Déplie un template jour par jour sur `[from, to]` (bornes incluses).
///
/// Les identifiants sont stables (`{template}-{slot}-{date}`) et la liste sort
/// dans l'ordre de la file du moteur.
pub fn generate_shifts(template: &Template, from: NaiveDate, to: NaiveDate) -> Result<Vec<Shift>> {
    template.validate()?;
    if to < from {
        bail!("end date must be after start date");
    }

    let mut shifts = Vec::new();
    for current in from.iter_days().take_while(|d| *d <= to) {
        let weekday = current.weekday().number_from_monday() as u8;
        for slot in template.slots.iter().filter(|s| s.days.contains(&weekday)) {
            let id = format!("{}-{}-{}", template.id, slot.name, current.format("%Y-%m-%d"));
            let shift = Shift::new(
                id,
                current,
                slot.start_time,
                slot.end_time,
                slot.required_count,
            )
            .map_err(anyhow::Error::msg)?;
            shifts.push(shift);
        }
    }

    shifts.sort_by(|a, b| (a.date, a.start_time, &a.id).cmp(&(b.date, b.start_time, &b.id)));
    Ok(shifts)
}

pub fn load_template_from_file<P: AsRef<Path>>(path: P) -> Result<Template> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading template {}", path.display()))?;
    let template: Template = serde_json::from_slice(&data)
        .with_context(|| format!("parsing template {}", path.display()))?;
    template.validate()?;
    Ok(template)
}

/// Deux slots de même nom ne partagent aucun jour : l'identifiant généré reste unique.
fn validate_slot_names(slots: &[Slot]) -> Result<()> {
    for (i, slot_a) in slots.iter().enumerate() {
        for slot_b in slots.iter().skip(i + 1) {
            if slot_a.name != slot_b.name {
                continue;
            }
            if slot_a.days.iter().any(|da| slot_b.days.contains(da)) {
                bail!("template contains slots named {} on the same day", slot_a.name);
            }
        }
    }
    Ok(())
}
