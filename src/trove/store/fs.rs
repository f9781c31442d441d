use super::DocumentStore;
use crate::error::{Result, TroveError};
use crate::model::{Datum, HistoryEntry, Resource};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const RESOURCES_FILE: &str = "resources.json";
const DATUMS_FILE: &str = "datums.json";
const HISTORY_FILE: &str = "history.json";

/// File-backed document store: one JSON file per collection under `data_dir`.
///
/// Each operation is a read-modify-write of the affected collection file, so
/// a store value that is mutated through `&mut self` is always internally
/// consistent on disk between operations.
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).map_err(TroveError::Io)?;
        }
        Ok(())
    }

    fn load_resources(&self) -> Result<HashMap<Uuid, Resource>> {
        self.load_collection(RESOURCES_FILE)
    }

    fn load_datums(&self) -> Result<Vec<Datum>> {
        self.load_collection(DATUMS_FILE)
    }

    fn load_history(&self) -> Result<HashMap<Uuid, Vec<HistoryEntry>>> {
        self.load_collection(HISTORY_FILE)
    }

    fn load_collection<T: serde::de::DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let file = self.data_dir.join(name);
        if !file.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(file).map_err(TroveError::Io)?;
        serde_json::from_str(&content).map_err(TroveError::Serialization)
    }

    fn save_collection<T: serde::Serialize>(&self, name: &str, collection: &T) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(collection).map_err(TroveError::Serialization)?;
        fs::write(self.data_dir.join(name), content).map_err(TroveError::Io)?;
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn insert_resource(&mut self, resource: &Resource) -> Result<()> {
        let mut resources = self.load_resources()?;
        if resources.contains_key(&resource.uid) {
            return Err(TroveError::AlreadyExists(format!(
                "resource {}",
                resource.uid
            )));
        }
        resources.insert(resource.uid, resource.clone());
        self.save_collection(RESOURCES_FILE, &resources)
    }

    fn get_resource(&self, uid: &Uuid) -> Result<Resource> {
        self.load_resources()?
            .remove(uid)
            .ok_or(TroveError::UnknownResource(*uid))
    }

    fn replace_resource(&mut self, expected: &Resource, new: &Resource) -> Result<()> {
        let mut resources = self.load_resources()?;
        match resources.get(&expected.uid) {
            Some(current) if current == expected => {
                resources.insert(expected.uid, new.clone());
                self.save_collection(RESOURCES_FILE, &resources)
            }
            Some(_) => Err(TroveError::ConcurrentModification(expected.uid)),
            None => Err(TroveError::UnknownResource(expected.uid)),
        }
    }

    fn insert_datum(&mut self, datum: &Datum) -> Result<()> {
        let mut datums = self.load_datums()?;
        if datums.iter().any(|d| d.datum_id == datum.datum_id) {
            return Err(TroveError::AlreadyExists(format!(
                "datum {}",
                datum.datum_id
            )));
        }
        datums.push(datum.clone());
        self.save_collection(DATUMS_FILE, &datums)
    }

    fn get_datum(&self, datum_id: &Uuid) -> Result<Datum> {
        self.load_datums()?
            .into_iter()
            .find(|d| d.datum_id == *datum_id)
            .ok_or(TroveError::UnknownDatum(*datum_id))
    }

    fn datums_for_resource(&self, uid: &Uuid) -> Result<Vec<Datum>> {
        Ok(self
            .load_datums()?
            .into_iter()
            .filter(|d| d.resource_uid == *uid)
            .collect())
    }

    fn append_history(&mut self, entry: &HistoryEntry) -> Result<()> {
        let mut history = self.load_history()?;
        history
            .entry(entry.resource_uid)
            .or_default()
            .push(entry.clone());
        self.save_collection(HISTORY_FILE, &history)
    }

    fn get_history(&self, uid: &Uuid) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.load_history()?.remove(uid).unwrap_or_default();
        entries.sort_by_key(|e| e.time);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{kwargs, MutationCmd};

    fn sample_resource() -> Resource {
        Resource::new(
            "npy_series",
            "2016/04/28/aardvark",
            kwargs([("fmt", serde_json::json!("cub_{point_number:05}.npy"))]),
            "/tmp/data",
        )
    }

    #[test]
    fn resources_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());

        let res = sample_resource();
        store.insert_resource(&res).unwrap();

        // A fresh store over the same directory sees the record.
        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.data_dir(), dir.path());
        assert_eq!(reopened.get_resource(&res.uid).unwrap(), res);
    }

    #[test]
    fn duplicate_resource_uid_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());

        let res = sample_resource();
        store.insert_resource(&res).unwrap();
        assert!(matches!(
            store.insert_resource(&res),
            Err(TroveError::AlreadyExists(_))
        ));
    }

    #[test]
    fn replace_is_compare_and_swap() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());

        let res = sample_resource();
        store.insert_resource(&res).unwrap();

        let mut superseded = res.clone();
        superseded.root = PathBuf::from("/tmp/archive");
        store.replace_resource(&res, &superseded).unwrap();

        // The original snapshot is now stale.
        assert!(matches!(
            store.replace_resource(&res, &superseded),
            Err(TroveError::ConcurrentModification(_))
        ));
        assert_eq!(store.get_resource(&res.uid).unwrap(), superseded);
    }

    #[test]
    fn history_is_returned_in_time_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());

        let old = sample_resource();
        let mut new = old.clone();
        new.root = PathBuf::from("/tmp/archive");

        let t0 = chrono::Utc::now();
        let later = HistoryEntry::new(
            t0 + chrono::Duration::seconds(1),
            MutationCmd::ChangeRoot,
            kwargs([("new_root", serde_json::json!("/tmp/archive"))]),
            old.clone(),
            new.clone(),
        );
        let earlier = HistoryEntry::new(
            t0,
            MutationCmd::ShiftRoot,
            kwargs([("shift", serde_json::json!(1))]),
            old.clone(),
            new,
        );

        store.append_history(&later).unwrap();
        store.append_history(&earlier).unwrap();

        let entries = store.get_history(&old.uid).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].time < entries[1].time);
    }

    #[test]
    fn missing_lookups_fail_typed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let uid = Uuid::new_v4();
        assert!(matches!(
            store.get_resource(&uid),
            Err(TroveError::UnknownResource(u)) if u == uid
        ));
        assert!(matches!(
            store.get_datum(&uid),
            Err(TroveError::UnknownDatum(u)) if u == uid
        ));
    }
}
