use super::DocumentStore;
use crate::error::{Result, TroveError};
use crate::model::{Datum, HistoryEntry, Resource};
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    resources: HashMap<Uuid, Resource>,
    datums: Vec<Datum>,
    history: HashMap<Uuid, Vec<HistoryEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for InMemoryStore {
    fn insert_resource(&mut self, resource: &Resource) -> Result<()> {
        if self.resources.contains_key(&resource.uid) {
            return Err(TroveError::AlreadyExists(format!(
                "resource {}",
                resource.uid
            )));
        }
        self.resources.insert(resource.uid, resource.clone());
        Ok(())
    }

    fn get_resource(&self, uid: &Uuid) -> Result<Resource> {
        self.resources
            .get(uid)
            .cloned()
            .ok_or(TroveError::UnknownResource(*uid))
    }

    fn replace_resource(&mut self, expected: &Resource, new: &Resource) -> Result<()> {
        match self.resources.get(&expected.uid) {
            Some(current) if current == expected => {
                self.resources.insert(expected.uid, new.clone());
                Ok(())
            }
            Some(_) => Err(TroveError::ConcurrentModification(expected.uid)),
            None => Err(TroveError::UnknownResource(expected.uid)),
        }
    }

    fn insert_datum(&mut self, datum: &Datum) -> Result<()> {
        if self.datums.iter().any(|d| d.datum_id == datum.datum_id) {
            return Err(TroveError::AlreadyExists(format!(
                "datum {}",
                datum.datum_id
            )));
        }
        self.datums.push(datum.clone());
        Ok(())
    }

    fn get_datum(&self, datum_id: &Uuid) -> Result<Datum> {
        self.datums
            .iter()
            .find(|d| d.datum_id == *datum_id)
            .cloned()
            .ok_or(TroveError::UnknownDatum(*datum_id))
    }

    fn datums_for_resource(&self, uid: &Uuid) -> Result<Vec<Datum>> {
        Ok(self
            .datums
            .iter()
            .filter(|d| d.resource_uid == *uid)
            .cloned()
            .collect())
    }

    fn append_history(&mut self, entry: &HistoryEntry) -> Result<()> {
        self.history
            .entry(entry.resource_uid)
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    fn get_history(&self, uid: &Uuid) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.history.get(uid).cloned().unwrap_or_default();
        entries.sort_by_key(|e| e.time);
        Ok(entries)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{kwargs, Kwargs};

    pub struct StoreFixture {
        pub store: InMemoryStore,
        /// Resources created through the builder, in creation order.
        pub resources: Vec<Resource>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                resources: Vec::new(),
            }
        }

        pub fn with_resource(mut self, spec: &str, root: &str, resource_path: &str) -> Self {
            let res = Resource::new(spec, resource_path, Kwargs::new(), root);
            self.store.insert_resource(&res).unwrap();
            self.resources.push(res);
            self
        }

        /// Attach numbered datums to the most recently created resource.
        pub fn with_datums(mut self, count: usize) -> Self {
            let uid = self.resources.last().unwrap().uid;
            for j in 0..count {
                let datum = Datum::new(
                    uid,
                    None,
                    kwargs([("point_number", serde_json::json!(j))]),
                );
                self.store.insert_datum(&datum).unwrap();
            }
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;

    #[test]
    fn datums_keep_insertion_order_per_resource() {
        let fixture = StoreFixture::new()
            .with_resource("root-test", "/a", "b/c")
            .with_datums(3)
            .with_resource("root-test", "/x", "y")
            .with_datums(2);

        let first = &fixture.resources[0];
        let datums = fixture.store.datums_for_resource(&first.uid).unwrap();
        assert_eq!(datums.len(), 3);
        for (j, d) in datums.iter().enumerate() {
            assert_eq!(d.datum_kwargs["point_number"], serde_json::json!(j));
        }

        let second = &fixture.resources[1];
        assert_eq!(fixture.store.datums_for_resource(&second.uid).unwrap().len(), 2);
    }
}
