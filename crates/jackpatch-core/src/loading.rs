//! Bookkeeping for in-flight asset loads.
//!
//! Every load is issued with a ticket carrying the session generation at
//! the time of issue. Operations that rewrite the overlay set (undo, redo,
//! clear) bump the generation, which cancels every outstanding load. A
//! completion whose ticket is unknown or stale is discarded.

use crate::history::PartDescriptor;
use kurbo::Point;
use std::collections::BTreeMap;

/// Identifies one issued load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub id: u64,
    pub generation: u64,
}

/// What to do with the image once it arrives.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadPurpose {
    /// Place a new part (drop). Snapshots on completion.
    Place {
        position: Point,
        default_size: Option<f64>,
    },
    /// Rebuild a part from a history snapshot. Never snapshots.
    Restore { descriptor: PartDescriptor },
}

/// A load the host should perform.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub source: String,
}

#[derive(Debug, Clone)]
struct PendingLoad {
    source: String,
    purpose: LoadPurpose,
}

/// Tracks outstanding loads and the current generation.
#[derive(Debug, Clone, Default)]
pub struct LoadTracker {
    next_id: u64,
    generation: u64,
    pending: BTreeMap<u64, PendingLoad>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Register a load and return the request to hand to the host.
    pub fn issue(&mut self, source: impl Into<String>, purpose: LoadPurpose) -> LoadRequest {
        let source = source.into();
        let ticket = LoadTicket {
            id: self.next_id,
            generation: self.generation,
        };
        self.next_id += 1;
        self.pending.insert(
            ticket.id,
            PendingLoad {
                source: source.clone(),
                purpose,
            },
        );
        LoadRequest { ticket, source }
    }

    /// Start a new generation, cancelling every outstanding load.
    /// Returns the number of loads cancelled.
    pub fn bump_generation(&mut self) -> usize {
        self.generation += 1;
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    /// Claim a completed load. Returns `None` for unknown or stale tickets.
    pub fn resolve(&mut self, ticket: LoadTicket) -> Option<(String, LoadPurpose)> {
        if ticket.generation != self.generation {
            return None;
        }
        self.pending
            .remove(&ticket.id)
            .map(|load| (load.source, load.purpose))
    }

    /// Outstanding requests in issue order.
    pub fn requests(&self) -> Vec<LoadRequest> {
        self.pending
            .iter()
            .map(|(&id, load)| LoadRequest {
                ticket: LoadTicket {
                    id,
                    generation: self.generation,
                },
                source: load.source.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place() -> LoadPurpose {
        LoadPurpose::Place {
            position: Point::new(1.0, 2.0),
            default_size: None,
        }
    }

    #[test]
    fn test_issue_and_resolve() {
        let mut tracker = LoadTracker::new();
        let request = tracker.issue("eye.png", place());
        assert_eq!(tracker.len(), 1);

        let (source, purpose) = tracker.resolve(request.ticket).unwrap();
        assert_eq!(source, "eye.png");
        assert_eq!(purpose, place());
        assert!(tracker.is_empty());

        // Resolving twice yields nothing
        assert!(tracker.resolve(request.ticket).is_none());
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut tracker = LoadTracker::new();
        let request = tracker.issue("eye.png", place());
        assert_eq!(tracker.bump_generation(), 1);
        assert!(tracker.resolve(request.ticket).is_none());
        assert_eq!(tracker.generation(), 1);
    }

    #[test]
    fn test_requests_in_issue_order() {
        let mut tracker = LoadTracker::new();
        tracker.issue("a.png", place());
        tracker.issue("b.png", place());
        tracker.issue("c.png", place());
        let sources: Vec<_> = tracker.requests().into_iter().map(|r| r.source).collect();
        assert_eq!(sources, vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_ids_are_unique_across_generations() {
        let mut tracker = LoadTracker::new();
        let first = tracker.issue("a.png", place());
        tracker.bump_generation();
        let second = tracker.issue("a.png", place());
        assert_ne!(first.ticket.id, second.ticket.id);
        assert!(tracker.resolve(second.ticket).is_some());
    }
}
