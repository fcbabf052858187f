use crate::numeric::Numeric;
use hashbrown::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// A shared, zero-argument source for the current value of a variable
pub type Accessor<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Registry of the variables an expression may reference, by name.
///
/// Names are the full variable lexeme, sentinel included: an expression
/// reading `@x` resolves the accessor registered under `"@x"`. Accessors are
/// called on every evaluation, so the value they return may change between
/// two calls of a compiled evaluator.
///
/// ```
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use std::sync::Arc;
/// use yardstick::{compile, Variables};
///
/// let x = Arc::new(AtomicU64::new(2.0_f64.to_bits()));
/// let mut variables = Variables::new();
/// let source = Arc::clone(&x);
/// variables.insert("@x", move || f64::from_bits(source.load(Ordering::Relaxed)));
///
/// let evaluator = compile::<f64>("@x * 10", &variables).unwrap();
/// assert_eq!(evaluator(), 20.0);
///
/// x.store(4.5_f64.to_bits(), Ordering::Relaxed);
/// assert_eq!(evaluator(), 45.0);
/// ```
#[derive(Clone)]
pub struct Variables<T> {
    accessors: HashMap<String, Accessor<T>>,
}

impl<T: Numeric> Variables<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            accessors: HashMap::new(),
        }
    }

    /// Register `accessor` under `name`, returning the accessor it replaces
    pub fn insert<S, F>(&mut self, name: S, accessor: F) -> Option<Accessor<T>>
    where
        S: Into<String>,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.insert_accessor(name, Arc::new(accessor))
    }

    /// Register an already shared accessor under `name`
    pub fn insert_accessor<S: Into<String>>(
        &mut self,
        name: S,
        accessor: Accessor<T>,
    ) -> Option<Accessor<T>> {
        self.accessors.insert(name.into(), accessor)
    }

    /// Register a variable which always evaluates to `value`
    pub fn insert_constant<S: Into<String>>(&mut self, name: S, value: T) -> Option<Accessor<T>> {
        self.insert(name, move || value.clone())
    }

    /// Unregister `name`, returning its accessor. Expressions built earlier
    /// keep the accessor they captured.
    pub fn remove(&mut self, name: &str) -> Option<Accessor<T>> {
        self.accessors.remove(name)
    }

    /// The accessor registered under `name`
    pub fn get(&self, name: &str) -> Option<&Accessor<T>> {
        self.accessors.get(name)
    }

    /// Check if a variable is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.accessors.contains_key(name)
    }

    /// Number of registered variables
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    /// Check if no variable is registered
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    /// Names of the registered variables, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.accessors.keys().map(String::as_str)
    }
}

impl<T: Numeric> Default for Variables<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for Variables<T> {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.debug_set().entries(self.accessors.keys()).finish()
    }
}
