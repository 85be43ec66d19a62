//! Collection lifecycle events
//!
//! Published to registered sinks after a lifecycle operation commits.
//! Downstream subsystems (e.g. a permission layer provisioning per-
//! collection actions) subscribe here instead of being compiled into the
//! schema engine.

use tessera_core::{CollectionId, TenantId};

/// A committed collection lifecycle change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A collection and its physical table were created
    CollectionCreated {
        /// Owning tenant
        tenant_id: TenantId,
        /// New collection
        collection_id: CollectionId,
        /// Sanitized collection name
        name: String,
    },
    /// A collection and its physical table were removed
    CollectionDeleted {
        /// Owning tenant
        tenant_id: TenantId,
        /// Removed collection
        collection_id: CollectionId,
        /// Sanitized collection name
        name: String,
    },
}

/// Receiver for lifecycle events
///
/// Sinks run synchronously after the operation committed; a sink must not
/// fail the operation (publishing has no return value) and should hand off
/// expensive work elsewhere.
pub trait EventSink: Send + Sync {
    /// Handle one event
    fn publish(&self, event: &LifecycleEvent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Recording(Mutex<Vec<LifecycleEvent>>);

    impl EventSink for Recording {
        fn publish(&self, event: &LifecycleEvent) {
            self.0.lock().push(event.clone());
        }
    }

    #[test]
    fn test_sink_receives_events() {
        let sink = Recording(Mutex::new(Vec::new()));
        let event = LifecycleEvent::CollectionCreated {
            tenant_id: TenantId::new(),
            collection_id: CollectionId::new(),
            name: "orders".to_string(),
        };
        sink.publish(&event);
        assert_eq!(sink.0.lock().as_slice(), &[event]);
    }

    #[test]
    fn test_sink_is_object_safe() {
        fn accepts(_: &dyn EventSink) {}
        let _ = accepts as fn(&dyn EventSink);
    }
}
