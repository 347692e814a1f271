//! Entity managers
//!
//! Create path shared by every entity kind. Positional arguments are checked
//! with [`validate_fields`] while the invocation is parsed;
//! [`EntityManager::insert`] then applies the duplicate policy, persists the
//! entity under its id and registers its secondary index marker.

use crate::config::DuplicatePolicy;
use crate::core::keys::CompositeKey;
use crate::core::store::RecordStore;
use crate::domain::{CareTrailError, Entity, Result};

/// Checks argument count and that every argument is non-empty
///
/// The first blank argument is reported by its 1-based position.
///
/// # Examples
///
/// ```
/// use caretrail::core::entities::validate_fields;
///
/// let args = vec!["P1".to_string(), "".to_string()];
/// let err = validate_fields("query", 2, &args).unwrap_err();
/// assert_eq!(err.to_string(), "argument 2 must be declared");
/// ```
pub fn validate_fields(function: &str, expected: usize, fields: &[String]) -> Result<()> {
    if fields.len() != expected {
        return Err(CareTrailError::Arity {
            function: function.to_string(),
            expected,
            actual: fields.len(),
        });
    }

    match fields.iter().position(|f| f.is_empty()) {
        Some(index) => Err(CareTrailError::EmptyField {
            position: index + 1,
        }),
        None => Ok(()),
    }
}

/// Secondary index key of an entity
pub fn index_key<E: Entity>(entity: &E) -> Result<CompositeKey> {
    CompositeKey::new(E::INDEX_NAME, entity.index_fields())
}

/// Moves an entity's index marker from its previous field values to its new ones
///
/// With no previous version the new marker is simply added. Unchanged keys
/// are left alone.
pub fn reindex<E: Entity>(
    store: &mut RecordStore,
    collection: &str,
    previous: Option<&E>,
    current: &E,
) -> Result<()> {
    let new_key = index_key(current)?;
    if let Some(previous) = previous {
        let old_key = index_key(previous)?;
        if old_key != new_key {
            store.delete_marker(collection, &old_key);
        }
    }
    store.put_marker(collection, &new_key);
    Ok(())
}

/// Creates entities of any kind under a duplicate policy
#[derive(Debug, Clone, Copy)]
pub struct EntityManager {
    policy: DuplicatePolicy,
}

impl EntityManager {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self { policy }
    }

    /// Persists an already-built entity with its index marker
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` when the id is taken and the policy is `Reject`
    /// - `InvalidKey` when a field cannot be encoded in the index key
    pub async fn insert<E: Entity>(
        &self,
        store: &mut RecordStore,
        collection: &str,
        entity: &E,
    ) -> Result<()> {
        let new_key = index_key(entity)?;

        let previous = match store.get(collection, entity.id()).await? {
            Some(bytes) => {
                if self.policy == DuplicatePolicy::Reject {
                    return Err(CareTrailError::AlreadyExists {
                        id: entity.id().to_string(),
                        collection: collection.to_string(),
                    });
                }
                // A record of another kind under the same id has no marker of ours to move.
                serde_json::from_slice::<E>(&bytes)
                    .ok()
                    .filter(|old| old.kind_tag() == E::KIND.as_str())
            }
            None => None,
        };

        store.put_entity(collection, entity)?;
        reindex(store, collection, previous.as_ref(), entity)?;

        tracing::debug!(
            kind = %E::KIND,
            id = %entity.id(),
            collection = %collection,
            index = %new_key,
            replaced = previous.is_some(),
            "Entity stored"
        );

        Ok(())
    }
}
