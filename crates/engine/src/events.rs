//! Board change notifications for the view layer.
//!
//! The board publishes a layout event after every renumbering and after
//! each propagation pass settles, and a word-updated event for each word
//! whose letters changed. Views register callbacks per event kind.

use crate::word::Direction;

#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    /// Word list re-derived, or a propagation pass settled.
    Layout(LayoutEvent),
    /// A word's text changed.
    WordUpdated(WordUpdatedEvent),
    /// Board written to a store.
    Saved(SavedEvent),
}

impl BoardEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            BoardEvent::Layout(_) => EventKind::Layout,
            BoardEvent::WordUpdated(_) => EventKind::WordUpdated,
            BoardEvent::Saved(_) => EventKind::Saved,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Layout,
    WordUpdated,
    Saved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutReason {
    Renumbered,
    PassSettled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEvent {
    pub reason: LayoutReason,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordUpdatedEvent {
    pub number: u32,
    pub direction: Direction,
    /// Letters after the change, `_` for unresolved cells.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedEvent {
    pub name: String,
}

/// Callback type for receiving board events.
pub type EventCallback = Box<dyn FnMut(&BoardEvent) + Send>;

/// Publish list keyed by event kind.
#[derive(Default)]
pub struct Subscribers {
    callbacks: Vec<(EventKind, EventCallback)>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: EventKind, callback: EventCallback) {
        self.callbacks.push((kind, callback));
    }

    pub fn notify(&mut self, event: &BoardEvent) {
        let kind = event.kind();
        for (k, cb) in &mut self.callbacks {
            if *k == kind {
                cb(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

/// Simple event collector for testing.
#[derive(Default)]
pub struct EventCollector {
    events: Vec<BoardEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BoardEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn layouts(&self) -> Vec<&LayoutEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BoardEvent::Layout(l) => Some(l),
                _ => None,
            })
            .collect()
    }

    pub fn word_updates(&self) -> Vec<&WordUpdatedEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BoardEvent::WordUpdated(w) => Some(w),
                _ => None,
            })
            .collect()
    }
}
