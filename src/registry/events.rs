//! Registry event type and subscriber fan-out.

use crate::registry::id::GlobalLayerId;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Notifications the registry delivers to subscribers, in the order the
/// corresponding operations took effect.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    ProviderRegistered { provider_id: String },
    ProviderUnregistered { provider_id: String },
    LayerAdded { layer: GlobalLayerId },
    LayerRemoved { layer: GlobalLayerId },
    LayerChanged { layer: GlobalLayerId },
    LayerVisibilityChanged { layer: GlobalLayerId, visible: bool },
    DataUpdated { layer: GlobalLayerId },
    /// Any layer was added, removed, or modified
    LayersChanged,
}

/// Fan-out of registry events over unbounded channels. Disconnected
/// subscribers are dropped on the next emission.
#[derive(Default)]
pub struct EventBus {
    senders: Vec<Sender<RegistryEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { senders: Vec::new() }
    }

    pub fn subscribe(&mut self) -> Receiver<RegistryEvent> {
        let (tx, rx) = unbounded();
        self.senders.push(tx);
        rx
    }

    pub fn emit(&mut self, event: RegistryEvent) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribers_see_events_in_order() {
        let mut bus = EventBus::new();
        let rx = bus.subscribe();

        bus.emit(RegistryEvent::ProviderRegistered {
            provider_id: "p".to_string(),
        });
        bus.emit(RegistryEvent::LayersChanged);

        assert_eq!(
            rx.try_recv().unwrap(),
            RegistryEvent::ProviderRegistered {
                provider_id: "p".to_string()
            }
        );
        assert_eq!(rx.try_recv().unwrap(), RegistryEvent::LayersChanged);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut bus = EventBus::new();
        let rx = bus.subscribe();
        drop(rx);

        bus.emit(RegistryEvent::LayersChanged);
        assert!(bus.senders.is_empty());
    }
}
