use std::path::Path;
use uuid::Uuid;

use crate::error::{Result, TroveError};
use crate::model::{Datum, Kwargs, Resource};
use crate::path;
use crate::store::DocumentStore;

/// Register a new resource. The initial insert writes no history entry;
/// history begins at the first mutation.
pub fn resource<S: DocumentStore>(
    store: &mut S,
    spec: &str,
    resource_path: &Path,
    resource_kwargs: Kwargs,
    root: &Path,
) -> Result<Resource> {
    let full = path::join(root, resource_path);
    if !full.is_absolute() {
        return Err(TroveError::Store(format!(
            "resource location {} is not absolute",
            full.display()
        )));
    }
    let res = Resource::new(spec, resource_path, resource_kwargs, root);
    store.insert_resource(&res)?;
    log::debug!("inserted resource {} ({}) at {}", res.uid, spec, full.display());
    Ok(res)
}

/// Register a datum against a resource, generating a `datum_id` when none is
/// supplied.
pub fn datum<S: DocumentStore>(
    store: &mut S,
    resource: &Resource,
    datum_id: Option<Uuid>,
    datum_kwargs: Kwargs,
) -> Result<Datum> {
    let datum = Datum::new(resource.uid, datum_id, datum_kwargs);
    store.insert_datum(&datum)?;
    Ok(datum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::kwargs;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn insert_writes_no_history() {
        let mut store = InMemoryStore::new();
        let res = resource(
            &mut store,
            "root-test",
            Path::new("a/b"),
            Kwargs::new(),
            Path::new("/c"),
        )
        .unwrap();
        assert!(store.get_history(&res.uid).unwrap().is_empty());
        assert_eq!(store.get_resource(&res.uid).unwrap(), res);
    }

    #[test]
    fn relative_location_is_rejected() {
        let mut store = InMemoryStore::new();
        assert!(resource(
            &mut store,
            "root-test",
            Path::new("a/b"),
            Kwargs::new(),
            Path::new("c"),
        )
        .is_err());
    }

    #[test]
    fn datum_id_is_generated_when_absent() {
        let mut store = InMemoryStore::new();
        let res = resource(
            &mut store,
            "root-test",
            Path::new("a/b"),
            Kwargs::new(),
            Path::new("/c"),
        )
        .unwrap();

        let supplied = Uuid::new_v4();
        let d1 = datum(&mut store, &res, Some(supplied), Kwargs::new()).unwrap();
        assert_eq!(d1.datum_id, supplied);

        let d2 = datum(
            &mut store,
            &res,
            None,
            kwargs([("point_number", serde_json::json!(7))]),
        )
        .unwrap();
        assert_ne!(d2.datum_id, supplied);
        assert_eq!(d2.resource_uid, res.uid);
    }
}
