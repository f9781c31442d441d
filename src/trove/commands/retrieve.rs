use uuid::Uuid;

use crate::error::{Result, TroveError};
use crate::handlers::HandlerRegistry;
use crate::store::DocumentStore;

/// Resolve a datum to decoded data.
///
/// Composes the owning resource's current location with the datum's kwargs
/// and invokes the handler capability for the resource's spec. Decoded data
/// is never cached here.
pub fn run<S: DocumentStore>(
    store: &S,
    registry: &HandlerRegistry,
    datum_id: &Uuid,
) -> Result<serde_json::Value> {
    let datum = store.get_datum(datum_id)?;
    let resource = store.get_resource(&datum.resource_uid)?;
    let handler = registry.make(
        &resource.spec,
        &resource.absolute_path(),
        &resource.resource_kwargs,
    )?;
    handler.decode(&datum.datum_kwargs).map_err(TroveError::Decode)
}
