//! Registry storage and operations.

// ============================================================================
// Imports
// ============================================================================

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::engine::{ChromeClient, NavigationPolicy, WebView};
use crate::error::{Error, Result};
use crate::identifiers::InstanceId;

use super::instance::{Instance, ObjectKey};

// ============================================================================
// Constants
// ============================================================================

/// First identifier handed out for host-created instances.
///
/// The remote side allocates its identifiers upward from zero; host ids
/// start here so the two ranges stay apart.
pub const MIN_HOST_CREATED_IDENTIFIER: i64 = 65_536;

// ============================================================================
// RegistryState
// ============================================================================

/// Both directions of the mapping, always mutated together.
#[derive(Default)]
struct RegistryState {
    by_id: FxHashMap<InstanceId, Instance>,
    by_key: FxHashMap<ObjectKey, InstanceId>,
    next_host_id: i64,
}

impl RegistryState {
    fn insert(&mut self, id: InstanceId, instance: Instance) -> Result<()> {
        if self.by_id.contains_key(&id) {
            return Err(Error::duplicate_id(id));
        }

        let key = instance.key();
        if let Some(&existing) = self.by_key.get(&key) {
            return Err(Error::duplicate_object(existing, id));
        }

        self.by_key.insert(key, id);
        self.by_id.insert(id, instance);
        Ok(())
    }

    fn insert_host_created(&mut self, instance: Instance) -> Result<InstanceId> {
        let mut candidate = self.next_host_id;
        let id = loop {
            let id = InstanceId::new(candidate)
                .ok_or_else(|| Error::protocol("host identifier space exhausted"))?;
            if !self.by_id.contains_key(&id) {
                break id;
            }
            candidate = candidate
                .checked_add(1)
                .ok_or_else(|| Error::protocol("host identifier space exhausted"))?;
        };

        self.insert(id, instance)?;
        self.next_host_id = candidate.saturating_add(1);
        Ok(id)
    }

    fn remove(&mut self, id: InstanceId) -> Option<Instance> {
        let instance = self.by_id.remove(&id)?;
        self.by_key.remove(&instance.key());
        Some(instance)
    }
}

// ============================================================================
// InstanceRegistry
// ============================================================================

/// Bidirectional map between live native objects and remote identifiers.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use webview_bridge::{Instance, InstanceId, InstanceRegistry};
///
/// # fn main() -> webview_bridge::Result<()> {
/// let registry = InstanceRegistry::new();
/// let id = InstanceId::new(0).expect("non-negative");
/// let object = Arc::new(7_u32);
///
/// registry.add(Instance::object(Arc::clone(&object)), id)?;
/// assert_eq!(registry.identifier_for(&object), Some(id));
///
/// registry.remove(id);
/// assert!(registry.get(id).is_err());
/// # Ok(())
/// # }
/// ```
pub struct InstanceRegistry {
    state: Mutex<RegistryState>,
    min_host_identifier: i64,
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InstanceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceRegistry")
            .field("len", &self.len())
            .field("min_host_identifier", &self.min_host_identifier)
            .finish()
    }
}

// ============================================================================
// InstanceRegistry - Constructors
// ============================================================================

impl InstanceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_min_host_identifier(MIN_HOST_CREATED_IDENTIFIER)
    }

    /// Creates an empty registry whose host-created ids start at `min`.
    ///
    /// Negative values are clamped to zero.
    #[must_use]
    pub fn with_min_host_identifier(min: i64) -> Self {
        let min = min.max(0);
        Self {
            state: Mutex::new(RegistryState {
                next_host_id: min,
                ..RegistryState::default()
            }),
            min_host_identifier: min,
        }
    }

    /// Returns the first host-created identifier.
    #[inline]
    #[must_use]
    pub fn min_host_identifier(&self) -> i64 {
        self.min_host_identifier
    }
}

// ============================================================================
// InstanceRegistry - Mutation
// ============================================================================

impl InstanceRegistry {
    /// Registers `instance` under an identifier chosen by the remote side.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateId`] if `id` already names a live instance
    /// - [`Error::DuplicateObject`] if the object is registered under another id
    ///
    /// Existing mappings are never modified on error.
    pub fn add(&self, instance: impl Into<Instance>, id: InstanceId) -> Result<()> {
        let instance = instance.into();
        let kind = instance.kind();

        self.state.lock().insert(id, instance)?;

        trace!(instance_id = %id, kind, "Instance added");
        Ok(())
    }

    /// Registers an object created on the native side and returns its new id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateObject`] if the object is already registered.
    pub fn add_host_created(&self, instance: impl Into<Instance>) -> Result<InstanceId> {
        let instance = instance.into();
        let kind = instance.kind();

        let id = self.state.lock().insert_host_created(instance)?;

        trace!(instance_id = %id, kind, "Host-created instance added");
        Ok(id)
    }

    /// Returns the identifier of an already registered object, or registers
    /// it as host-created.
    ///
    /// Lookup and insertion happen under one lock, so concurrent callers
    /// registering the same object all get the same id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the host identifier space is exhausted.
    pub fn get_or_add_host_created(&self, instance: impl Into<Instance>) -> Result<InstanceId> {
        let instance = instance.into();
        let kind = instance.kind();

        let mut state = self.state.lock();
        if let Some(&existing) = state.by_key.get(&instance.key()) {
            return Ok(existing);
        }

        let id = state.insert_host_created(instance)?;
        drop(state);

        trace!(instance_id = %id, kind, "Host-created instance added");
        Ok(id)
    }

    /// Releases the mapping for `id` and returns the instance it held.
    ///
    /// Idempotent: removing an unknown or already removed id returns `None`.
    pub fn remove(&self, id: InstanceId) -> Option<Instance> {
        let removed = self.state.lock().remove(id);

        match &removed {
            Some(instance) => trace!(instance_id = %id, kind = instance.kind(), "Instance removed"),
            None => trace!(instance_id = %id, "Remove of unknown instance ignored"),
        }

        removed
    }

    /// Removes every entry and returns them.
    ///
    /// Used at session teardown; the caller releases the returned instances.
    pub fn drain(&self) -> Vec<(InstanceId, Instance)> {
        let drained: Vec<_> = {
            let mut state = self.state.lock();
            state.by_key.clear();
            state.next_host_id = self.min_host_identifier;
            state.by_id.drain().collect()
        };

        debug!(count = drained.len(), "Registry drained");
        drained
    }
}

// ============================================================================
// InstanceRegistry - Lookup
// ============================================================================

impl InstanceRegistry {
    /// Returns the instance registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `id` is unknown or was removed.
    pub fn get(&self, id: InstanceId) -> Result<Instance> {
        self.state
            .lock()
            .by_id
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found(id))
    }

    /// Returns the web view registered under `id`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if `id` is unknown
    /// - [`Error::TypeMismatch`] if `id` names something else
    pub fn get_web_view(&self, id: InstanceId) -> Result<Arc<dyn WebView>> {
        match self.get(id)? {
            Instance::WebView(view) => Ok(view),
            other => Err(Error::type_mismatch(id, "web view", other.kind())),
        }
    }

    /// Returns the navigation policy registered under `id`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if `id` is unknown
    /// - [`Error::TypeMismatch`] if `id` names something else
    pub fn get_navigation_policy(&self, id: InstanceId) -> Result<Arc<dyn NavigationPolicy>> {
        match self.get(id)? {
            Instance::NavigationPolicy(policy) => Ok(policy),
            other => Err(Error::type_mismatch(id, "navigation policy", other.kind())),
        }
    }

    /// Returns the chrome client registered under `id`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if `id` is unknown
    /// - [`Error::TypeMismatch`] if `id` names something else
    pub fn get_chrome_client(&self, id: InstanceId) -> Result<Arc<dyn ChromeClient>> {
        match self.get(id)? {
            Instance::ChromeClient(client) => Ok(client),
            other => Err(Error::type_mismatch(id, "chrome client", other.kind())),
        }
    }

    /// Returns the host object of type `T` registered under `id`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if `id` is unknown
    /// - [`Error::TypeMismatch`] if `id` names something else
    pub fn get_object<T: Any + Send + Sync>(&self, id: InstanceId) -> Result<Arc<T>> {
        match self.get(id)? {
            Instance::Object(object) => object
                .downcast::<T>()
                .map_err(|_| Error::type_mismatch(id, std::any::type_name::<T>(), "object")),
            other => Err(Error::type_mismatch(
                id,
                std::any::type_name::<T>(),
                other.kind(),
            )),
        }
    }

    /// Returns the identifier of a registered object, by identity.
    #[must_use]
    pub fn identifier_for<T: ?Sized>(&self, object: &Arc<T>) -> Option<InstanceId> {
        self.identifier_for_key(ObjectKey::of(Arc::as_ptr(object)))
    }

    /// Same as [`identifier_for`](Self::identifier_for) for a plain reference
    /// to the shared value (e.g. `self` inside a registered object).
    #[must_use]
    pub fn identifier_for_ref<T: ?Sized>(&self, object: &T) -> Option<InstanceId> {
        self.identifier_for_key(ObjectKey::of(object as *const T))
    }

    fn identifier_for_key(&self, key: ObjectKey) -> Option<InstanceId> {
        self.state.lock().by_key.get(&key).copied()
    }

    /// Returns `true` if `id` names a live instance.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: InstanceId) -> bool {
        self.state.lock().by_id.contains_key(&id)
    }

    /// Returns the number of live instances.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().by_id.len()
    }

    /// Returns `true` if no instance is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Tests
// ============================================================================
