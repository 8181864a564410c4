use crate::model::{ScheduleRequest, ScheduleResult};
use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge une requête de planification depuis un support.
    fn load_request(&self) -> anyhow::Result<ScheduleRequest>;
    /// Charge un résultat déjà produit.
    fn load_result(&self) -> anyhow::Result<ScheduleResult>;
    /// Sauvegarde de manière atomique.
    fn save_result(&self, result: &ScheduleResult) -> anyhow::Result<()>;
    /// Sauvegarde de manière atomique.
    fn save_request(&self, request: &ScheduleRequest) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    fn read(&self) -> anyhow::Result<Vec<u8>> {
        fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))
    }

}

/// Écrit `value` en JSON via un fichier temporaire du même dossier puis un renommage :
/// un lecteur voit l'ancien contenu ou le nouveau, jamais un fichier tronqué.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("atomic rename to {}", path.display()))?;
    Ok(())
}

impl Storage for JsonStorage {
    fn load_request(&self) -> anyhow::Result<ScheduleRequest> {
        let data = self.read()?;
        serde_json::from_slice(&data)
            .with_context(|| format!("parsing request {}", self.path.display()))
    }

    fn load_result(&self) -> anyhow::Result<ScheduleResult> {
        let data = self.read()?;
        serde_json::from_slice(&data)
            .with_context(|| format!("parsing result {}", self.path.display()))
    }

    fn save_result(&self, result: &ScheduleResult) -> anyhow::Result<()> {
        write_json_atomic(&self.path, result)
    }

    fn save_request(&self, request: &ScheduleRequest) -> anyhow::Result<()> {
        write_json_atomic(&self.path, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_schedule;
    use crate::model::{Shift, StaffId, WindowSpec};
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::tempdir;

    #[test]
    fn saves_and_reloads_request_and_result() {
        let d = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();
        let t8 = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let t12 = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let mut req = ScheduleRequest {
            shifts: vec![Shift::new("s1", d, t8, t12, 1).unwrap()],
            staff_list: vec![StaffId::new("alice")],
            ..Default::default()
        };
        req.availability
            .insert(StaffId::new("alice"), vec![WindowSpec::new(d, t8, t12)]);

        let dir = tempdir().unwrap();
        let req_store = JsonStorage::open(dir.path().join("req.json")).unwrap();
        req_store.save_request(&req).unwrap();
        let loaded = req_store.load_request().unwrap();
        assert_eq!(loaded.shifts, req.shifts);

        let result = generate_schedule(&loaded).unwrap();
        let res_store = JsonStorage::open(dir.path().join("result.json")).unwrap();
        res_store.save_result(&result).unwrap();
        assert_eq!(res_store.load_result().unwrap(), result);
    }

    #[test]
    fn atomic_write_replaces_whole_file_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("req.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonStorage::open(&path).unwrap();
        store.save_request(&ScheduleRequest::default()).unwrap();
        assert!(store.load_request().unwrap().shifts.is_empty());

        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
