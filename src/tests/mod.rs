//! Unit tests for the registration, wiring and lifecycle of components.

mod properties;
mod registry;
mod support;
