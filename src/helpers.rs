use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Stable shared reference to a registered component.
///
/// The same handle is kept by the caller and by the registry: fields assigned
/// during the bring-up pass are visible through every clone.
pub type Shared<T> = Arc<RwLock<T>>;

/// Wrap a component instance into a [Shared] handle
pub fn shared<T>(instance: T) -> Shared<T> {
    Arc::new(RwLock::new(instance))
}

/// Lock for reading, ignoring poisoning from a panicking hook
pub(crate) fn read<T: ?Sized>(lock: &Shared<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

/// Lock for writing, ignoring poisoning from a panicking hook
pub(crate) fn write<T: ?Sized>(lock: &Shared<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Declare that a component can be injected as the selected capability (trait object) types.
///
/// This macro expands to one [Descriptor::provides](crate::Descriptor::provides) call
/// per capability, coercing the ```Shared<Self>``` handle into ```Shared<dyn Trait>```.
/// The component type must implement every listed trait.
///
/// ```
/// # use musubi::*;
/// trait Logger: Send + Sync {
///     fn log(&self, line: &str);
/// }
///
/// #[derive(Default)]
/// struct StdoutLogger;
///
/// impl Logger for StdoutLogger {
///     fn log(&self, line: &str) {
///         println!("{line}");
///     }
/// }
///
/// impl Component for StdoutLogger {
///     fn describe(&self, descriptor: &mut Descriptor<Self>) {
///         capabilities!(descriptor, dyn Logger);
///     }
/// }
/// ```
#[macro_export]
macro_rules! capabilities {
    ($descriptor: expr $(, $capability: ty)+ $(,)?) => {
        $(
        $descriptor.provides(|component| -> $crate::Shared<$capability> { component });
        )+
    };
}
