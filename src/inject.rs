use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use tracing::{debug, info};

use crate::component::{Component, Descriptor};
use crate::helpers::{read, Shared};
use crate::properties::parse_properties;
use crate::registry::{derive_name, ComponentEntry, ComponentHandle, ComponentRegistry};
use crate::resolve::{ComponentState, Resolver, WIRING_TARGET};
use crate::value::{Value, ValueStore};
use crate::WiringError;

/// Registration phase of the dependency injection.
///
/// Components and named values are registered first, then [BringUpContext::start]
/// wires everything in a single pass and hands over a read-only [Container].
/// Independent contexts do not share any state.
#[derive(Default)]
pub struct BringUpContext {
    pub(crate) registry: ComponentRegistry,
    values: ValueStore,
}

impl BringUpContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under the full path of its type
    pub fn register<T: Component>(&mut self, instance: Shared<T>) -> Result<(), WiringError> {
        let name = derive_name::<T>()?;
        self.register_named(instance, name)
    }

    /// Register a component under an explicit name.
    ///
    /// The component describes its bindings at this point.
    pub fn register_named<T: Component>(
        &mut self,
        instance: Shared<T>,
        name: impl Into<String>,
    ) -> Result<(), WiringError> {
        let name = name.into();
        if self.registry.is_taken(&name) {
            return Err(WiringError::DuplicateComponent { name });
        }

        let mut descriptor = Descriptor::new(instance.clone());
        read(&instance).describe(&mut descriptor);
        debug!(
            target: WIRING_TARGET,
            component = %name,
            type_name = type_name::<T>(),
            fields = descriptor.bindings.len(),
            capabilities = descriptor.capabilities.len(),
            "registered component"
        );

        self.registry.register(ComponentEntry {
            name,
            handle: ComponentHandle::new(instance, descriptor.capabilities),
            bindings: descriptor.bindings,
            on_wired: descriptor.on_wired,
            on_started: descriptor.on_started,
        })?;
        Ok(())
    }

    /// Register a named value, available to value bindings
    pub fn register_value(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), WiringError> {
        self.values.put(name.into(), value.into())
    }

    /// Register every value of a `key=value` text, one pair per line.
    ///
    /// Nothing is registered if a line is malformed. Returns the number of registered values.
    pub fn load_properties(&mut self, text: &str) -> Result<usize, WiringError> {
        let pairs = parse_properties(text)?;
        let count = pairs.len();
        for (key, value) in pairs {
            self.register_value(key, value)?;
        }
        Ok(count)
    }

    /// Register every value of a `key=value` file, see [BringUpContext::load_properties]
    pub fn load_properties_file(&mut self, path: impl AsRef<Path>) -> Result<usize, WiringError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|err| WiringError::io(path.display().to_string(), err))?;
        let count = self.load_properties(&text)?;
        debug!(target: WIRING_TARGET, path = %path.display(), count, "loaded properties");
        Ok(count)
    }

    /// Number of registered components
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Wire all components and run their lifecycle hooks.
    ///
    /// Every component is wired after its dependencies and its early hook runs as soon
    /// as its own fields are set. Late hooks run once every component is wired.
    /// The first error aborts the pass and the context is discarded.
    pub fn start(self) -> Result<Container, WiringError> {
        info!(
            target: WIRING_TARGET,
            components = self.registry.len(),
            values = self.values.len(),
            "starting bring-up"
        );
        self.wire_all()?;

        for entry in self.registry.entries() {
            if let Some(hook) = &entry.on_started {
                debug!(target: WIRING_TARGET, component = %entry.name, "late completion hook");
                hook();
            }
        }

        let container = Container {
            components: self.registry.into_handles(),
        };
        info!(target: WIRING_TARGET, components = container.len(), "bring-up complete");
        Ok(container)
    }

    /// First phase of the bring-up: wire every component not yet wired as a dependency
    pub(crate) fn wire_all(&self) -> Result<Vec<ComponentState>, WiringError> {
        let mut resolver = Resolver::new(&self.registry, &self.values);
        for idx in 0..self.registry.len() {
            if resolver.state(idx) != ComponentState::Wired {
                resolver.wire(idx)?;
            }
        }
        Ok(resolver.into_states())
    }
}

/// Read-only access to the wired components, by name
pub struct Container {
    components: HashMap<String, ComponentHandle>,
}

impl Container {
    /// Retrieve the handle registered under this name
    pub fn get<T: Component>(&self, name: &str) -> Result<Shared<T>, WiringError> {
        let handle = self
            .components
            .get(name)
            .ok_or_else(|| WiringError::not_found(name))?;
        handle.instance().ok_or_else(|| WiringError::WrongType {
            name: name.to_owned(),
            actual: handle.type_key.name,
            expected: type_name::<T>(),
        })
    }

    /// Retrieve a capability advertised by the component registered under this name
    pub fn get_capability<C>(&self, name: &str) -> Result<Shared<C>, WiringError>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let handle = self
            .components
            .get(name)
            .ok_or_else(|| WiringError::not_found(name))?;
        handle.capability().ok_or_else(|| WiringError::WrongType {
            name: name.to_owned(),
            actual: handle.type_key.name,
            expected: type_name::<C>(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Container")
            .field("components", &names)
            .finish()
    }
}
