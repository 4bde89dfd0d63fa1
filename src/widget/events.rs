//! Click handlers keyed by element identity.
//!
//! Every interactive element a widget renders is registered here together with
//! the container it lives in. Before a container is re-rendered its handlers
//! are cleared, so ids from a previous render no longer resolve to anything.

use std::collections::HashMap;

use super::dom::ElementId;

/// Which of the widget's two containers a handler belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Display,
    Controls,
}

/// What activating an element does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Flip the description of the item in this slot of the current page.
    ToggleDescription(usize),
    PreviousPage,
    NextPage,
    GoToPage(usize),
}

#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<ElementId, (Scope, Action)>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, scope: Scope, element: ElementId, action: Action) {
        self.handlers.insert(element, (scope, action));
    }

    pub fn get(&self, element: ElementId) -> Option<Action> {
        self.handlers.get(&element).map(|(_, action)| *action)
    }

    /// Detach every handler registered for `scope`. Returns how many were removed.
    pub fn clear(&mut self, scope: Scope) -> usize {
        let before = self.handlers.len();
        self.handlers.retain(|_, (s, _)| *s != scope);
        let removed = before - self.handlers.len();
        tracing::debug!(?scope, removed, "Detached handlers");
        removed
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn count(&self, scope: Scope) -> usize {
        self.handlers.values().filter(|(s, _)| *s == scope).count()
    }
}
