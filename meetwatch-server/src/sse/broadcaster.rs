//! SSE broadcaster for real-time meeting alerts
//!
//! Fan-out over a tokio broadcast channel. Each subscriber owns a receiver;
//! a slow or disconnected client can only lose its own stream. Delivery is
//! at-most-once with no replay for clients that connect after an event fired.

use std::convert::Infallible;

use axum::response::sse::Event;
use futures::stream::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};

use meetwatch_common::events::AlertEvent;

/// Manages client subscriptions and alert distribution
#[derive(Clone)]
pub struct AlertBroadcaster {
    tx: broadcast::Sender<AlertEvent>,
}

impl AlertBroadcaster {
    /// Create a new broadcaster
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer per lagging subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        info!("Alert broadcaster initialized with capacity {}", capacity);
        Self { tx }
    }

    /// Broadcast an alert to all connected clients, ignoring if none are
    /// connected
    pub fn broadcast_lossy(&self, event: AlertEvent) {
        match self.tx.send(event) {
            Ok(count) => debug!("Broadcast alert to {} clients", count),
            Err(_) => debug!("No clients connected, alert dropped"),
        }
    }

    /// Current number of connected clients
    pub fn client_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Raw subscription, used by tests and non-HTTP consumers
    pub fn subscribe(&self) -> broadcast::Receiver<AlertEvent> {
        self.tx.subscribe()
    }

    /// Create an SSE stream for a new client connection
    pub fn subscribe_stream(&self) -> impl Stream<Item = Result<Event, Infallible>> {
        let rx = self.tx.subscribe();
        let stream = BroadcastStream::new(rx);

        stream.filter_map(|result| async move {
            match result {
                Ok(alert) => {
                    let event = Event::default()
                        .event(alert.kind.as_str())
                        .json_data(&alert)
                        .ok();
                    event.map(Ok)
                }
                Err(e) => {
                    // Lagged receiver; drop the missed events and continue
                    warn!("SSE client error: {:?}", e);
                    None
                }
            }
        })
    }
}
