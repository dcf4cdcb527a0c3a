//! Index of registered components by name and by concrete type

use std::any::{type_name, Any, TypeId};
use std::collections::hash_map::{Entry, HashMap};

use crate::component::{FieldBinding, Hook};
use crate::helpers::Shared;
use crate::WiringError;

/// Runtime identity of a type, with a readable name for diagnostics
#[derive(Debug, Clone, Copy)]
pub(crate) struct TypeKey {
    pub(crate) id: TypeId,
    pub(crate) name: &'static str,
}

impl TypeKey {
    pub(crate) fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

/// A ```Shared<dyn C>``` view of a component, keyed by the capability type
pub(crate) struct CapabilityView {
    pub(crate) key: TypeKey,
    pub(crate) view: Box<dyn Any + Send + Sync>,
}

/// Type-erased handle on a live component instance
pub(crate) struct ComponentHandle {
    pub(crate) type_key: TypeKey,
    instance: Box<dyn Any + Send + Sync>,
    capabilities: Vec<CapabilityView>,
}

impl ComponentHandle {
    pub(crate) fn new<T: Send + Sync + 'static>(
        instance: Shared<T>,
        capabilities: Vec<CapabilityView>,
    ) -> Self {
        Self {
            type_key: TypeKey::of::<T>(),
            instance: Box::new(instance),
            capabilities,
        }
    }

    pub(crate) fn instance<T: 'static>(&self) -> Option<Shared<T>> {
        self.instance.downcast_ref::<Shared<T>>().cloned()
    }

    pub(crate) fn capability<C: ?Sized + 'static>(&self) -> Option<Shared<C>> {
        self.capabilities
            .iter()
            .find(|c| c.key.id == TypeId::of::<C>())
            .and_then(|c| c.view.downcast_ref::<Shared<C>>())
            .cloned()
    }

    pub(crate) fn advertises(&self, capability: TypeId) -> bool {
        self.capabilities.iter().any(|c| c.key.id == capability)
    }
}

/// A registered component and its wiring instructions
pub(crate) struct ComponentEntry {
    pub(crate) name: String,
    pub(crate) handle: ComponentHandle,
    pub(crate) bindings: Vec<FieldBinding>,
    pub(crate) on_wired: Option<Hook>,
    pub(crate) on_started: Option<Hook>,
}

impl ComponentEntry {
    pub(crate) fn instance<T: 'static>(&self) -> Option<Shared<T>> {
        self.handle.instance()
    }

    pub(crate) fn capability<C: ?Sized + 'static>(&self) -> Option<Shared<C>> {
        self.handle.capability()
    }
}

/// Build the default registration name of a type from its full path.
///
/// Named types declared inside a closure body keep their path. Only a type whose
/// own segment has no name (a closure itself) is rejected.
pub(crate) fn derive_name<T: ?Sized + 'static>() -> Result<String, WiringError> {
    let name = type_name::<T>();
    let path = name.split('<').next().unwrap_or(name);
    let last = path.rsplit("::").next().unwrap_or(path);
    if last.is_empty() || last == "{{closure}}" {
        return Err(WiringError::UnnamedType { type_name: name });
    }
    Ok(name.to_owned())
}

/// Registered components, indexed by unique name and by concrete type.
///
/// Entries keep their registration order, which is also the order of the bring-up pass.
#[derive(Default)]
pub(crate) struct ComponentRegistry {
    entries: Vec<ComponentEntry>,
    by_name: HashMap<String, usize>,
    by_type: HashMap<TypeId, Vec<usize>>,
}

impl ComponentRegistry {
    pub(crate) fn is_taken(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub(crate) fn register(&mut self, entry: ComponentEntry) -> Result<usize, WiringError> {
        let idx = self.entries.len();
        match self.by_name.entry(entry.name.clone()) {
            Entry::Occupied(o) => {
                return Err(WiringError::DuplicateComponent {
                    name: o.key().clone(),
                })
            }
            Entry::Vacant(v) => {
                v.insert(idx);
            }
        }
        self.by_type
            .entry(entry.handle.type_key.id)
            .or_default()
            .push(idx);
        self.entries.push(entry);
        Ok(idx)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entry(&self, idx: usize) -> &ComponentEntry {
        &self.entries[idx]
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &ComponentEntry> {
        self.entries.iter()
    }

    pub(crate) fn lookup_by_name(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Components whose concrete type is exactly the requested one
    pub(crate) fn lookup_by_type(&self, type_id: TypeId) -> &[usize] {
        self.by_type
            .get(&type_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Components advertising every requested capability.
    ///
    /// This scans the whole registry, it is only meant for the bring-up pass.
    pub(crate) fn lookup_by_capability(&self, capabilities: &[TypeId]) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| capabilities.iter().all(|c| e.handle.advertises(*c)))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub(crate) fn names(&self, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .map(|idx| self.entries[*idx].name.clone())
            .collect()
    }

    /// Drop the wiring instructions, keeping only the live instances
    pub(crate) fn into_handles(self) -> HashMap<String, ComponentHandle> {
        self.entries
            .into_iter()
            .map(|e| (e.name, e.handle))
            .collect()
    }
}
