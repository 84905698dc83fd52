//! Lookup tables backing every [`Enumerated`] type.

use std::collections::HashMap;

use super::Enumerated;

/// Forward, reverse and display lookup for one enumeration type.
///
/// A registry is built exactly once per type from an explicit table of
/// `(code, name)` pairs, normally inside a `LazyLock` owned by the type's
/// [`Enumerated::registry`] implementation. Declared entries live in the
/// registry for the life of the process; undeclared codes are synthesized by
/// [`by_code`](Self::by_code) and never inserted.
///
/// # Example
///
/// ```rust
/// use bacnet_objects::{Enumerated, EscalatorOperationDirection};
///
/// let registry = EscalatorOperationDirection::registry();
/// assert_eq!(registry.count(), 6);
/// assert_eq!(registry.display_name(2), Some("upRatedSpeed"));
/// assert_eq!(registry.display_name(77), None);
/// ```
#[derive(Debug)]
pub struct Registry<E: 'static> {
    entries: Vec<E>,
    by_code: HashMap<u32, usize>,
    by_name: HashMap<&'static str, usize>,
    names: HashMap<u32, &'static str>,
}

impl<E: Enumerated> Registry<E> {
    /// Build a registry from a declaration table.
    ///
    /// Entries keep their declaration order for [`iter`](Self::iter). A code
    /// or name declared twice keeps its first declaration.
    pub fn new(table: &'static [(u32, &'static str)]) -> Self {
        let mut entries = Vec::with_capacity(table.len());
        let mut by_code = HashMap::with_capacity(table.len());
        let mut by_name = HashMap::with_capacity(table.len());
        let mut names = HashMap::with_capacity(table.len());

        for &(code, name) in table {
            debug_assert!(
                !by_code.contains_key(&code),
                "{}: duplicate code {code}",
                E::TYPE_NAME
            );
            if by_code.contains_key(&code) || by_name.contains_key(name) {
                continue;
            }
            let slot = entries.len();
            entries.push(E::from_code(code));
            by_code.insert(code, slot);
            by_name.insert(name, slot);
            names.insert(code, name);
        }

        Self {
            entries,
            by_code,
            by_name,
            names,
        }
    }

    /// Resolve a code to an instance. Never fails.
    ///
    /// Declared codes return a copy of the registered entry; any other code
    /// is wrapped as-is and carries no name.
    pub fn by_code(&self, code: u32) -> E {
        match self.declared(code) {
            Some(entry) => *entry,
            None => E::from_code(code),
        }
    }

    /// The registered entry for a declared code.
    ///
    /// Repeated calls return the same `&'static` entry, which is how callers
    /// can tell a declared singleton from a synthesized value.
    pub fn declared(&self, code: u32) -> Option<&E> {
        self.by_code.get(&code).map(|&slot| &self.entries[slot])
    }

    /// Reverse lookup by declared name. Unknown names yield `None`.
    pub fn by_name(&self, name: &str) -> Option<E> {
        self.by_name.get(name).map(|&slot| self.entries[slot])
    }

    /// The declared name for a code, if any.
    pub fn display_name(&self, code: u32) -> Option<&'static str> {
        self.names.get(&code).copied()
    }

    /// Number of declared entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Declared entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.entries.iter()
    }
}
