//! DOM Events
//!
//! Per-node listener registry. Listeners are bound to a node id, fired only
//! on that node (no capture/bubble phases) and torn down per node with
//! [`EventListeners::off`].

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::NodeId;

/// Event handler callback
pub type EventHandler = Rc<dyn Fn(&DomEvent)>;

/// Handler identifier returned by [`EventListeners::on`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u64);

/// DOM event delivered to a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    pub event_type: String,
    pub target: NodeId,
}

impl DomEvent {
    pub fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
        }
    }
}

struct Listener {
    id: HandlerId,
    event_type: String,
    handler: EventHandler,
}

/// Listener registry keyed by node
#[derive(Default)]
pub struct EventListeners {
    listeners: HashMap<NodeId, Vec<Listener>>,
    next_id: u64,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `event_type` on `node`
    pub fn on(&mut self, node: NodeId, event_type: &str, handler: EventHandler) -> HandlerId {
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.listeners.entry(node).or_default().push(Listener {
            id,
            event_type: event_type.to_string(),
            handler,
        });
        id
    }

    /// Remove every listener bound to each of `nodes`.
    ///
    /// Returns how many listeners were removed; unbound nodes are skipped.
    pub fn off(&mut self, nodes: &[NodeId]) -> usize {
        let removed: usize = nodes
            .iter()
            .filter_map(|node| self.listeners.remove(node))
            .map(|list| list.len())
            .sum();
        if removed > 0 {
            tracing::debug!(nodes = nodes.len(), removed, "listeners torn down");
        }
        removed
    }

    /// Remove a single handler
    pub fn remove_handler(&mut self, node: NodeId, id: HandlerId) -> bool {
        let Some(list) = self.listeners.get_mut(&node) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| l.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.listeners.remove(&node);
        }
        removed
    }

    /// Fire `event_type` on `node`; returns how many handlers ran
    pub fn dispatch(&self, node: NodeId, event_type: &str) -> usize {
        let Some(list) = self.listeners.get(&node) else {
            return 0;
        };
        let event = DomEvent::new(event_type, node);
        // Snapshot so a handler cannot observe a half-updated list
        let handlers: Vec<EventHandler> = list
            .iter()
            .filter(|l| l.event_type == event_type)
            .map(|l| Rc::clone(&l.handler))
            .collect();
        for handler in &handlers {
            handler(&event);
        }
        handlers.len()
    }

    /// Number of listeners bound to `node`
    pub fn count(&self, node: NodeId) -> usize {
        self.listeners.get(&node).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("nodes", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, EventHandler) {
        let hits = Rc::new(Cell::new(0));
        let seen = Rc::clone(&hits);
        let handler: EventHandler = Rc::new(move |_: &DomEvent| seen.set(seen.get() + 1));
        (hits, handler)
    }

    #[test]
    fn test_dispatch_matches_type() {
        let mut listeners = EventListeners::new();
        let (hits, handler) = counter();
        listeners.on(NodeId(1), "click", handler);

        assert_eq!(listeners.dispatch(NodeId(1), "click"), 1);
        assert_eq!(listeners.dispatch(NodeId(1), "keyup"), 0);
        assert_eq!(listeners.dispatch(NodeId(2), "click"), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_off_is_idempotent() {
        let mut listeners = EventListeners::new();
        let (hits, handler) = counter();
        listeners.on(NodeId(1), "click", Rc::clone(&handler));
        listeners.on(NodeId(2), "click", handler);

        assert_eq!(listeners.off(&[NodeId(1), NodeId(2)]), 2);
        assert_eq!(listeners.off(&[NodeId(1), NodeId(2)]), 0);
        assert_eq!(listeners.dispatch(NodeId(1), "click"), 0);
        assert_eq!(hits.get(), 0);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_remove_single_handler() {
        let mut listeners = EventListeners::new();
        let (_, first) = counter();
        let (_, second) = counter();
        let id = listeners.on(NodeId(3), "input", first);
        listeners.on(NodeId(3), "input", second);

        assert!(listeners.remove_handler(NodeId(3), id));
        assert!(!listeners.remove_handler(NodeId(3), id));
        assert_eq!(listeners.count(NodeId(3)), 1);
    }
}
