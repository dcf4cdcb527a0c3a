//! Errors raised while registering and wiring components

use std::sync::Arc;

use thiserror::Error;

/// Errors triggered during registration and the autowiring process.
///
/// Every variant is fatal: a bring-up pass stops at the first error and the
/// partially-wired registry is discarded.
#[derive(Error, Debug, Clone)]
pub enum WiringError {
    /// Two components were registered under the same name.
    #[error("Cannot register the same name twice: {name}")]
    DuplicateComponent { name: String },

    /// Two values were registered under the same name.
    #[error("Cannot register value {value} for name {name} because that name is already registered")]
    DuplicateValue { name: String, value: String },

    /// No name can be derived from the component type.
    #[error("Cannot register type with no name: {type_name}")]
    UnnamedType { type_name: &'static str },

    /// A value binding refers to a name missing from the value store.
    #[error("Unable to inject value named {value_name} into field {field} in {component} because there is no value with that name")]
    ValueNotFound {
        component: String,
        field: &'static str,
        value_name: String,
    },

    /// A stored value cannot be coerced into the field type.
    #[error("Unable to inject value named {value_name} into field {field} in {component} because the value {value} cannot be converted to a {expected}")]
    NotConvertible {
        component: String,
        field: &'static str,
        value_name: String,
        value: String,
        expected: &'static str,
    },

    /// A named binding refers to an unknown component.
    #[error("Cannot autowire field {field} in {component} with {target} because it has not been registered")]
    NotRegistered {
        component: String,
        field: &'static str,
        target: String,
    },

    /// No component matches a type or capability binding.
    #[error("Cannot autowire field {field} in {component} because there is nothing registered of type {type_name}")]
    NothingRegistered {
        component: String,
        field: &'static str,
        type_name: &'static str,
    },

    /// More than one component matches a type or capability binding.
    #[error("Cannot autowire field {field} in {component} because there is more than one registered type of {type_name}: {candidates:?}")]
    Ambiguous {
        component: String,
        field: &'static str,
        type_name: &'static str,
        candidates: Vec<String>,
    },

    /// A named component does not have the type (or capability) the field expects.
    #[error("Cannot autowire field {field} in {component} with {target} because it is not a {expected}")]
    TypeMismatch {
        component: String,
        field: &'static str,
        target: String,
        expected: &'static str,
    },

    /// A component transitively depends on itself.
    #[error("There's a cycle when wiring {component} {path:?}")]
    Cycle { component: String, path: Vec<String> },

    /// A key/value line does not split into exactly one key and one value.
    #[error("Invalid properties line {line}: {content}")]
    MalformedProperty { line: usize, content: String },

    /// The key/value source could not be read.
    #[error("Unable to read properties from {path}")]
    Io {
        path: String,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// No component is registered under the requested name.
    #[error("No component registered under {name}")]
    NotFound { name: String },

    /// The component registered under the requested name has another type.
    #[error("Component {name} is a {actual}, not a {expected}")]
    WrongType {
        name: String,
        actual: &'static str,
        expected: &'static str,
    },
}

impl WiringError {
    pub(crate) fn cycle(component: impl Into<String>, path: Vec<String>) -> Self {
        Self::Cycle {
            component: component.into(),
            path,
        }
    }

    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub(crate) fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}
