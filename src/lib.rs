//! Runtime dependency injection with declarative bindings, cycle detection and two-phase initialization.
//!
//! # Simple use case
//!
//! ```
//! # use musubi::*;
//! // Define a capability and a component advertising it
//! trait Logger: Send + Sync {
//!     fn log(&self, line: &str);
//! }
//!
//! #[derive(Default)]
//! struct StdoutLogger;
//!
//! impl Logger for StdoutLogger {
//!     fn log(&self, line: &str) {
//!         println!("{line}");
//!     }
//! }
//!
//! impl Component for StdoutLogger {
//!     fn describe(&self, descriptor: &mut Descriptor<Self>) {
//!         capabilities!(descriptor, dyn Logger);
//!     }
//! }
//!
//! // A component with a configuration value and an injected capability
//! #[derive(Default)]
//! struct Server {
//!     port: u16,
//!     logger: Option<Shared<dyn Logger>>,
//! }
//!
//! impl Component for Server {
//!     fn describe(&self, descriptor: &mut Descriptor<Self>) {
//!         descriptor
//!             .field("port")
//!             .value("port", |s: &mut Server, port: u16| s.port = port);
//!         descriptor
//!             .field("logger")
//!             .capability(|s: &mut Server, logger: Shared<dyn Logger>| s.logger = Some(logger));
//!         descriptor.on_started(|s: &mut Server| {
//!             if let Some(logger) = &s.logger {
//!                 logger.read().unwrap().log(&format!("listening on {}", s.port));
//!             }
//!         });
//!     }
//! }
//!
//! # fn main() -> Result<(), WiringError> {
//! let server = shared(Server::default());
//!
//! let mut context = BringUpContext::new();
//! context.load_properties("port=8080")?;
//! context.register(shared(StdoutLogger))?;
//! context.register_named(server.clone(), "server")?;
//!
//! let container = context.start()?;
//! assert_eq!(server.read().unwrap().port, 8080);
//! assert!(container.contains("server"));
//! # Ok(())
//! # }
//! ```
//!
//! # Mechanism
//!
//! Registered instances are kept as [Shared] handles: the caller and the registry
//! hold the same reference and fields set during the bring-up are visible through both.
//!
//! * A [Component] lists its injectable fields through a [Descriptor] when it is registered.
//!   Each field receives either a named [Value] (parsed into the field type), or another
//!   component selected by name, by exact concrete type, or by capability (a trait object
//!   type advertised with the [capabilities] macro).
//!   Type and capability selection require exactly one candidate.
//! * [BringUpContext::start] wires every component after the components it depends on,
//!   rejecting dependency cycles. A component's `on_wired` hook runs as soon as its own
//!   fields are set, the `on_started` hooks run once everything is wired.
//! * Any error aborts the bring-up. On success, the [Container] gives access to the
//!   components by name.

mod component;
mod error;
mod helpers;
mod inject;
mod properties;
mod registry;
mod resolve;
mod value;

pub use component::{Component, Descriptor, FieldSpec};
pub use error::WiringError;
pub use helpers::{shared, Shared};
pub use inject::{BringUpContext, Container};
pub use value::{ConversionFailure, FromValue, Value};

#[cfg(test)]
mod tests;
