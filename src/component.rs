//! Declarative description of injectable fields
//!
//! A [Component] describes itself once, at registration time, through a [Descriptor]:
//! which fields receive named values, which receive other components (by name,
//! by concrete type or by capability), which capabilities it advertises and which
//! lifecycle hooks it wants. The resolver only consumes these descriptions and
//! never inspects the component itself.

use std::any::{type_name, Any};

use crate::helpers::{read, write, Shared};
use crate::registry::{CapabilityView, ComponentEntry, TypeKey};
use crate::value::{downcast, ConversionFailure, FromValue, Value};

/// A type that can be registered and wired.
///
/// ```
/// # use musubi::*;
/// #[derive(Default)]
/// struct Database {
///     url: String,
/// }
///
/// impl Component for Database {
///     fn describe(&self, descriptor: &mut Descriptor<Self>) {
///         descriptor
///             .field("url")
///             .value("db.url", |db: &mut Database, url: String| db.url = url);
///     }
/// }
/// ```
pub trait Component: Send + Sync + Sized + 'static {
    /// Declare bindings, capabilities and hooks of this instance.
    ///
    /// The default declares nothing: the component can be injected elsewhere
    /// but none of its own fields is touched.
    fn describe(&self, _descriptor: &mut Descriptor<Self>) {}
}

pub(crate) type Hook = Box<dyn Fn()>;

type ValueSetter = Box<dyn Fn(&Value) -> Result<(), ConversionFailure>>;
type ComponentSetter = Box<dyn Fn(&ComponentEntry) -> Result<(), ConversionFailure>>;

/// How a single field obtains its content
pub(crate) struct FieldBinding {
    pub(crate) field: &'static str,
    pub(crate) source: BindingSource,
}

pub(crate) enum BindingSource {
    Value {
        name: String,
        expected: &'static str,
        assign: ValueSetter,
    },
    Component {
        target: Target,
        expected: &'static str,
        assign: ComponentSetter,
    },
}

/// Selection rule for a component binding
pub(crate) enum Target {
    Named(String),
    Type(TypeKey),
    Capability(TypeKey),
}

/// Collect the bindings, capabilities and hooks of a component.
pub struct Descriptor<T> {
    owner: Shared<T>,
    pub(crate) bindings: Vec<FieldBinding>,
    pub(crate) capabilities: Vec<CapabilityView>,
    pub(crate) on_wired: Option<Hook>,
    pub(crate) on_started: Option<Hook>,
}

impl<T: Component> Descriptor<T> {
    pub(crate) fn new(owner: Shared<T>) -> Self {
        Self {
            owner,
            bindings: Vec::new(),
            capabilities: Vec::new(),
            on_wired: None,
            on_started: None,
        }
    }

    /// Describe the binding of one field
    pub fn field(&mut self, field: &'static str) -> FieldSpec<'_, T> {
        FieldSpec {
            descriptor: self,
            field,
            name: None,
        }
    }

    /// Advertise that this component can be injected as the capability `C`.
    ///
    /// The upcast is usually an unsizing coercion, see the [capabilities](crate::capabilities) macro.
    pub fn provides<C, F>(&mut self, upcast: F) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: FnOnce(Shared<T>) -> Shared<C>,
    {
        let view: Shared<C> = upcast(self.owner.clone());
        self.capabilities.push(CapabilityView {
            key: TypeKey::of::<C>(),
            view: Box::new(view),
        });
        self
    }

    /// Early completion hook, called once all fields of this component are set
    pub fn on_wired<F: Fn(&mut T) + 'static>(&mut self, hook: F) -> &mut Self {
        self.on_wired = Some(self.hook(hook));
        self
    }

    /// Late completion hook, called once every registered component is wired
    pub fn on_started<F: Fn(&mut T) + 'static>(&mut self, hook: F) -> &mut Self {
        self.on_started = Some(self.hook(hook));
        self
    }

    fn hook<F: Fn(&mut T) + 'static>(&self, hook: F) -> Hook {
        let owner = self.owner.clone();
        Box::new(move || hook(&mut *write(&owner)))
    }

    fn push_value(
        &mut self,
        field: &'static str,
        name: String,
        expected: &'static str,
        assign: ValueSetter,
    ) {
        self.bindings.push(FieldBinding {
            field,
            source: BindingSource::Value {
                name,
                expected,
                assign,
            },
        });
    }

    fn push_component(
        &mut self,
        field: &'static str,
        target: Target,
        expected: &'static str,
        assign: ComponentSetter,
    ) {
        self.bindings.push(FieldBinding {
            field,
            source: BindingSource::Component {
                target,
                expected,
                assign,
            },
        });
    }
}

/// Builder for the binding of a single field, see [Descriptor::field]
pub struct FieldSpec<'a, T> {
    descriptor: &'a mut Descriptor<T>,
    field: &'static str,
    name: Option<String>,
}

impl<'a, T: Component> FieldSpec<'a, T> {
    /// Select the injected component by its registration name instead of its type.
    ///
    /// Value bindings ignore it: they are always selected by value name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Inject the named value, coerced to the field type
    pub fn value<V, F>(self, value_name: impl Into<String>, setter: F)
    where
        V: FromValue,
        F: Fn(&mut T, V) + 'static,
    {
        let owner = self.descriptor.owner.clone();
        let assign: ValueSetter = Box::new(move |value| {
            let v = V::from_value(value)?;
            setter(&mut *write(&owner), v);
            Ok(())
        });
        self.descriptor
            .push_value(self.field, value_name.into(), type_name::<V>(), assign);
    }

    /// Inject the named value holding arbitrary data of the exact field type
    pub fn opaque<V, F>(self, value_name: impl Into<String>, setter: F)
    where
        V: Any + Clone,
        F: Fn(&mut T, V) + 'static,
    {
        let owner = self.descriptor.owner.clone();
        let assign: ValueSetter = Box::new(move |value| {
            let v: V = downcast(value)?;
            setter(&mut *write(&owner), v);
            Ok(())
        });
        self.descriptor
            .push_value(self.field, value_name.into(), type_name::<V>(), assign);
    }

    /// Inject a shared reference to another component of type `U`
    pub fn inject<U, F>(self, setter: F)
    where
        U: Component,
        F: Fn(&mut T, Shared<U>) + 'static,
    {
        let Self { descriptor, field, name } = self;
        let owner = descriptor.owner.clone();
        let assign: ComponentSetter = Box::new(move |entry| {
            let dep = entry.instance::<U>().ok_or(ConversionFailure)?;
            setter(&mut *write(&owner), dep);
            Ok(())
        });
        let target = select(name, TypeKey::of::<U>(), false);
        descriptor.push_component(field, target, type_name::<U>(), assign);
    }

    /// Inject a copy of another component of type `U`, taken after it is wired
    pub fn copy<U, F>(self, setter: F)
    where
        U: Component + Clone,
        F: Fn(&mut T, U) + 'static,
    {
        let Self { descriptor, field, name } = self;
        let owner = descriptor.owner.clone();
        let assign: ComponentSetter = Box::new(move |entry| {
            let dep = entry.instance::<U>().ok_or(ConversionFailure)?;
            // release the dependency before locking the owner
            let copied = read(&dep).clone();
            setter(&mut *write(&owner), copied);
            Ok(())
        });
        let target = select(name, TypeKey::of::<U>(), false);
        descriptor.push_component(field, target, type_name::<U>(), assign);
    }

    /// Inject the single component advertising the capability `C`
    pub fn capability<C, F>(self, setter: F)
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&mut T, Shared<C>) + 'static,
    {
        let Self { descriptor, field, name } = self;
        let owner = descriptor.owner.clone();
        let assign: ComponentSetter = Box::new(move |entry| {
            let dep = entry.capability::<C>().ok_or(ConversionFailure)?;
            setter(&mut *write(&owner), dep);
            Ok(())
        });
        let target = select(name, TypeKey::of::<C>(), true);
        descriptor.push_component(field, target, type_name::<C>(), assign);
    }
}

fn select(name: Option<String>, key: TypeKey, capability: bool) -> Target {
    match name {
        Some(name) => Target::Named(name),
        None if capability => Target::Capability(key),
        None => Target::Type(key),
    }
}
