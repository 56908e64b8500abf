use crate::history::{ActionKind, ActionStatus};
use rust_decimal::Decimal;
use tokio::sync::mpsc::UnboundedSender;

/// Typed progress stream the engine emits while it works. A presentation
/// layer subscribes to the channel and renders these however it likes; the
/// engine never prints.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ScanStarted,
    ScanCompleted {
        accounts: usize,
    },
    EstimateUpdated {
        lamports: u64,
        sol: Decimal,
    },
    /// Emitted after each batch reaches confirmation.
    BatchProgress {
        done: usize,
        total: usize,
    },
    /// Terminal outcome of a burn or close action.
    ActionCompleted {
        kind: ActionKind,
        status: ActionStatus,
        signature: Option<String>,
        explorer_url: Option<String>,
    },
    Status(String),
}

/// Send half of the event stream. Operations take it by reference; a sink
/// without a subscriber degrades to the log.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<UnboundedSender<EngineEvent>>,
}

impl EventSink {
    pub fn new(tx: UnboundedSender<EngineEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sink that only logs. Useful in tests and headless callers.
    pub fn none() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: EngineEvent) {
        match &self.tx {
            Some(tx) => {
                // a dropped receiver is not the engine's problem
                let _ = tx.send(event);
            }
            None => log::info!("{event:?}"),
        }
    }
}
