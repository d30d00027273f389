//! Batched change notifications.
//!
//! Every mutating store call emits at most one [`ChangeNotification`] carrying
//! the net set of coordinates it touched. Listeners are toolkit-agnostic: a
//! closure, or a tokio channel for hosts that pump updates on another task.

use std::collections::BTreeSet;

use tokio::sync::mpsc::UnboundedSender;

use super::cell::Coordinate;

/// What kind of mutation produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Records were merged by `apply_changes`.
    Updated,
    /// Records were removed by a reset.
    Reset,
    /// Records were replaced wholesale from a snapshot.
    Restored,
}

/// "These coordinates changed" event for one mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotification {
    pub kind: ChangeKind,
    pub coordinates: BTreeSet<Coordinate>,
}

impl ChangeNotification {
    /// Number of changed coordinates.
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Always false for emitted notifications; empty change sets are never sent.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Rows touched by this change, ascending.
    pub fn rows(&self) -> BTreeSet<usize> {
        self.coordinates.iter().map(|c| c.row).collect()
    }

    /// Check if a coordinate is part of this change.
    pub fn contains(&self, coord: Coordinate) -> bool {
        self.coordinates.contains(&coord)
    }
}

/// Receives change notifications from a store.
///
/// Listeners are `Send + Sync` so a store can sit behind an async lock.
pub trait ChangeListener: Send + Sync {
    /// Handle one notification. Returning `false` unsubscribes the listener.
    fn on_change(&mut self, notification: &ChangeNotification) -> bool;
}

impl<F> ChangeListener for F
where
    F: FnMut(&ChangeNotification) + Send + Sync,
{
    fn on_change(&mut self, notification: &ChangeNotification) -> bool {
        self(notification);
        true
    }
}

/// Forwards notifications into an unbounded tokio channel.
///
/// Drops itself once the receiving side is gone.
#[derive(Debug)]
pub struct ChannelListener(pub UnboundedSender<ChangeNotification>);

impl ChangeListener for ChannelListener {
    fn on_change(&mut self, notification: &ChangeNotification) -> bool {
        self.0.send(notification.clone()).is_ok()
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registered listeners, notified in subscription order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Box<dyn ChangeListener>)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Box<dyn ChangeListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Deliver a notification unless it is empty.
    pub(crate) fn emit(&mut self, kind: ChangeKind, coordinates: BTreeSet<Coordinate>) {
        if coordinates.is_empty() {
            return;
        }
        let notification = ChangeNotification { kind, coordinates };
        tracing::debug!(
            kind = ?notification.kind,
            cells = notification.len(),
            listeners = self.entries.len(),
            "emitting change notification"
        );
        self.entries
            .retain_mut(|(_, listener)| listener.on_change(&notification));
    }
}
