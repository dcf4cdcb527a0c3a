//! Recursive resolution of field bindings
//!
//! The [Resolver] wires one component at a time. Before a dependency is assigned
//! into a field, it is fully wired itself (its own fields set and its early hook
//! called). Components currently being wired are tracked on a [WiringStack]:
//! requesting one of them again means that the dependency graph has a cycle.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::component::{BindingSource, FieldBinding, Target};
use crate::registry::{ComponentEntry, ComponentRegistry, TypeKey};
use crate::value::ValueStore;
use crate::WiringError;

pub(crate) const WIRING_TARGET: &str = "musubi::wiring";

/// Progress of a component through the bring-up pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComponentState {
    Registered,
    Wiring,
    Wired,
}

/// Names of the components being wired, outermost first
#[derive(Debug, Default)]
pub(crate) struct WiringStack {
    order: Vec<String>,
    members: HashSet<String>,
}

impl WiringStack {
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.members.contains(name)
    }

    pub(crate) fn push(&mut self, name: &str) {
        self.order.push(name.to_owned());
        self.members.insert(name.to_owned());
    }

    pub(crate) fn pop(&mut self) -> Option<String> {
        let name = self.order.pop()?;
        self.members.remove(&name);
        Some(name)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The current chain of components, closed by the re-entered one
    fn cycle_path(&self, reentered: &str) -> Vec<String> {
        let mut path = self.order.clone();
        path.push(reentered.to_owned());
        path
    }
}

/// Wiring engine for a single bring-up pass
pub(crate) struct Resolver<'a> {
    registry: &'a ComponentRegistry,
    values: &'a ValueStore,
    states: Vec<ComponentState>,
    stack: WiringStack,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(registry: &'a ComponentRegistry, values: &'a ValueStore) -> Self {
        Self {
            registry,
            values,
            states: vec![ComponentState::Registered; registry.len()],
            stack: WiringStack::default(),
        }
    }

    pub(crate) fn state(&self, idx: usize) -> ComponentState {
        self.states[idx]
    }

    /// Final state of every component, in registration order
    pub(crate) fn into_states(self) -> Vec<ComponentState> {
        debug_assert!(self.stack.is_empty());
        self.states
    }

    /// Wire a component and, first, every component it depends on.
    ///
    /// The early hook of the component is called once its fields are set.
    pub(crate) fn wire(&mut self, idx: usize) -> Result<(), WiringError> {
        let registry = self.registry;
        let entry = registry.entry(idx);
        if self.stack.contains(&entry.name) {
            return Err(WiringError::cycle(
                &entry.name,
                self.stack.cycle_path(&entry.name),
            ));
        }
        self.stack.push(&entry.name);
        self.states[idx] = ComponentState::Wiring;
        debug!(
            target: WIRING_TARGET,
            component = %entry.name,
            depth = self.stack.order.len(),
            "wiring component"
        );

        for binding in &entry.bindings {
            self.resolve_field(entry, binding)?;
        }

        self.stack.pop();
        self.states[idx] = ComponentState::Wired;
        if let Some(hook) = &entry.on_wired {
            trace!(target: WIRING_TARGET, component = %entry.name, "early completion hook");
            hook();
        }
        debug!(target: WIRING_TARGET, component = %entry.name, "component wired");
        Ok(())
    }

    fn resolve_field(
        &mut self,
        owner: &ComponentEntry,
        binding: &FieldBinding,
    ) -> Result<(), WiringError> {
        let field = binding.field;
        match &binding.source {
            BindingSource::Value {
                name,
                expected,
                assign,
            } => {
                let value = self
                    .values
                    .get(name)
                    .ok_or_else(|| WiringError::ValueNotFound {
                        component: owner.name.clone(),
                        field,
                        value_name: name.clone(),
                    })?;
                assign(value).map_err(|_| WiringError::NotConvertible {
                    component: owner.name.clone(),
                    field,
                    value_name: name.clone(),
                    value: value.to_string(),
                    expected: *expected,
                })?;
                trace!(
                    target: WIRING_TARGET,
                    component = %owner.name,
                    field,
                    value = name.as_str(),
                    "injected value"
                );
            }
            BindingSource::Component {
                target,
                expected,
                assign,
            } => {
                let registry = self.registry;
                let found = self.select(owner, field, target)?;
                if self.states[found] != ComponentState::Wired {
                    self.wire(found)?;
                }
                let dependency = registry.entry(found);
                assign(dependency).map_err(|_| WiringError::TypeMismatch {
                    component: owner.name.clone(),
                    field,
                    target: dependency.name.clone(),
                    expected: *expected,
                })?;
                trace!(
                    target: WIRING_TARGET,
                    component = %owner.name,
                    field,
                    dependency = %dependency.name,
                    "injected component"
                );
            }
        }
        Ok(())
    }

    /// Pick the single component matching a binding target
    fn select(
        &self,
        owner: &ComponentEntry,
        field: &'static str,
        target: &Target,
    ) -> Result<usize, WiringError> {
        match target {
            Target::Named(name) => {
                self.registry
                    .lookup_by_name(name)
                    .ok_or_else(|| WiringError::NotRegistered {
                        component: owner.name.clone(),
                        field,
                        target: name.clone(),
                    })
            }
            Target::Type(key) => {
                let found = self.registry.lookup_by_type(key.id);
                self.single(owner, field, key, found)
            }
            Target::Capability(key) => {
                let found = self.registry.lookup_by_capability(&[key.id]);
                self.single(owner, field, key, &found)
            }
        }
    }

    fn single(
        &self,
        owner: &ComponentEntry,
        field: &'static str,
        key: &TypeKey,
        found: &[usize],
    ) -> Result<usize, WiringError> {
        match found {
            [] => Err(WiringError::NothingRegistered {
                component: owner.name.clone(),
                field,
                type_name: key.name,
            }),
            [idx] => Ok(*idx),
            _ => Err(WiringError::Ambiguous {
                component: owner.name.clone(),
                field,
                type_name: key.name,
                candidates: self.registry.names(found),
            }),
        }
    }
}
