//! Change notifications for UI-facing state.
//!
//! The cache and the tracker expose plain query methods; after each mutating
//! operation they emit a `ChangeEvent` through a `ChangeHub`. Consumers
//! subscribe with an ordinary channel receiver and poll or block as they
//! like. No reactive operators, no background tasks.

use std::sync::mpsc::{channel, Receiver, Sender};

/// Emitted after a mutating operation commits.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// A bulk sentiment fetch replaced cached city records.
    SentimentRefreshed { cities: Vec<String> },
    /// A significant location fix was recorded.
    LocationRecorded { city: String },
}

/// Fan-out point for `ChangeEvent`s. Synchronous; `emit` runs on the
/// caller's thread.
#[derive(Default)]
pub struct ChangeHub {
    subscribers: Vec<Sender<ChangeEvent>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<ChangeEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Send the event to every live subscriber, dropping the ones whose
    /// receiver has gone away.
    pub fn emit(&mut self, event: ChangeEvent) {
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_receive_emitted_events() {
        let mut hub = ChangeHub::new();
        let rx = hub.subscribe();

        hub.emit(ChangeEvent::LocationRecorded {
            city: "Austin".to_string(),
        });

        assert_eq!(
            rx.try_recv().unwrap(),
            ChangeEvent::LocationRecorded {
                city: "Austin".to_string()
            }
        );
    }

    #[test]
    fn dead_receivers_are_pruned_on_emit() {
        let mut hub = ChangeHub::new();
        let rx = hub.subscribe();
        drop(rx);
        let live = hub.subscribe();

        hub.emit(ChangeEvent::SentimentRefreshed { cities: vec![] });

        assert_eq!(hub.subscriber_count(), 1);
        assert!(live.try_recv().is_ok());
    }
}
