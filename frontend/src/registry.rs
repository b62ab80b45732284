use std::collections::HashMap;
use std::hash::Hash;

use crate::action::ActionKind;

/// Identity of a bound element. Keys can be copied along with markup, so the
/// registry compares the elements themselves.
pub trait BoundElement {
    fn same_element(&self, other: &Self) -> bool;

    /// Still attached to the document.
    fn is_live(&self) -> bool;
}

#[derive(Debug)]
struct Binding<E, L> {
    element: E,
    // held for its drop, which detaches the listener
    _listener: L,
}

/// Click listener bookkeeping. Holds at most one listener handle per
/// (element key, action kind), together with the element it is attached to.
#[derive(Debug)]
pub struct BindingRegistry<K, E, L> {
    bindings: HashMap<(K, ActionKind), Binding<E, L>>,
}

impl<K, E, L> Default for BindingRegistry<K, E, L> {
    fn default() -> Self {
        BindingRegistry {
            bindings: HashMap::new(),
        }
    }
}

impl<K, E, L> BindingRegistry<K, E, L>
where
    K: Hash + Eq + Clone,
    E: BoundElement,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `element` may bind under `key`. A key held by a different,
    /// still attached element belongs to that element; `element` is a copy
    /// and needs a key of its own.
    pub fn may_claim(&self, key: &K, action: ActionKind, element: &E) -> bool {
        match self.bindings.get(&(key.clone(), action)) {
            Some(binding) => binding.element.same_element(element) || !binding.element.is_live(),
            None => true,
        }
    }

    /// Attaches a listener unless this very element is already bound. A slot
    /// still holding a different element is moved over with [`rebind`].
    /// Returns whether a listener was attached.
    ///
    /// [`rebind`]: Self::rebind
    pub fn bind<F>(&mut self, key: K, action: ActionKind, element: E, attach: F) -> bool
    where
        F: FnOnce(&E) -> L,
    {
        if let Some(bound) = self.element(&key, action) {
            if bound.same_element(&element) {
                return false;
            }
        }

        self.rebind(key, action, element, attach);
        true
    }

    /// Swaps in a fresh listener. The new handle is stored before the old one
    /// is dropped, so the slot is never empty in between.
    pub fn rebind<F>(&mut self, key: K, action: ActionKind, element: E, attach: F)
    where
        F: FnOnce(&E) -> L,
    {
        let listener = attach(&element);
        let previous = self.bindings.insert(
            (key, action),
            Binding {
                element,
                _listener: listener,
            },
        );
        drop(previous);
    }

    /// Drops every binding whose slot fails `keep`. Returns how many went.
    pub fn prune<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, ActionKind) -> bool,
    {
        let before = self.bindings.len();
        self.bindings.retain(|(key, action), _| keep(key, *action));
        before - self.bindings.len()
    }

    pub fn element(&self, key: &K, action: ActionKind) -> Option<&E> {
        self.bindings
            .get(&(key.clone(), action))
            .map(|binding| &binding.element)
    }

    pub fn is_bound(&self, key: &K, action: ActionKind) -> bool {
        self.bindings.contains_key(&(key.clone(), action))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
