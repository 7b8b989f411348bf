//! Event handling for the TUI
//!
//! Terminal input, ticks and the results of background requests all arrive
//! on one channel so the UI loop has a single place to wait.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, MouseEvent};
use futures::StreamExt;
use signgo_core::{ApiResult, Booking, BookingStatus, MapDestinations, RequestToken};
use tokio::sync::mpsc;

/// Application events
#[derive(Debug)]
pub enum Event {
    /// Keyboard input
    Key(KeyEvent),
    /// Mouse input (signature pad)
    Mouse(MouseEvent),
    /// Terminal resized
    Resize,
    /// Periodic tick (splash deadline, toast expiry)
    Tick,
    /// A booking search finished
    SearchCompleted {
        token: RequestToken,
        result: ApiResult<Option<Booking>>,
    },
    /// A status update finished
    StatusUpdated {
        token: RequestToken,
        result: ApiResult<Booking>,
    },
    /// An incident report finished; the error is already rendered to text
    IncidentSubmitted { result: Result<(), String> },
    /// Map pins for a booking were resolved
    MapResolved {
        booking_id: String,
        status: BookingStatus,
        destinations: MapDestinations,
    },
}

/// Event channel shared by the UI loop and background tasks
pub struct EventHandler {
    sender: mpsc::UnboundedSender<Event>,
    receiver: mpsc::UnboundedReceiver<Event>,
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver,
            tick_rate,
        }
    }

    /// Get a clone of the sender for other tasks to send events
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    /// Receive the next event
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Spawn the terminal reader and tick generator
    pub fn start(&self) {
        let input_tx = self.sender.clone();
        tokio::spawn(async move {
            let mut stream = EventStream::new();
            while let Some(Ok(event)) = stream.next().await {
                let event = match event {
                    CrosstermEvent::Key(key) => Event::Key(key),
                    CrosstermEvent::Mouse(mouse) => Event::Mouse(mouse),
                    CrosstermEvent::Resize(_, _) => Event::Resize,
                    _ => continue,
                };
                if input_tx.send(event).is_err() {
                    break;
                }
            }
        });

        let tick_tx = self.sender.clone();
        let tick_rate = self.tick_rate;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if tick_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });
    }
}
