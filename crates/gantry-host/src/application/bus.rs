//! The command event bus.
//!
//! Control modules (motion planner, heaters, fans, …) subscribe by
//! registering a [`CommandHandler`]. Publishing is synchronous and runs
//! handlers in registration order: every handler sees the command before
//! the dispatcher writes the response line, and a slow handler stalls the
//! channel. That is acceptable: handlers are trusted internal modules and
//! the sender is flow-controlled by the acknowledgment anyway.
//!
//! Handlers communicate back through the record itself: set
//! [`accepted`](CommandRecord::accepted) to claim the command, append to
//! [`txt_after_ok`](CommandRecord::txt_after_ok) to attach report text to
//! the acknowledgment, or write free-form lines straight to the record's
//! sink.

use std::sync::Arc;

use gantry_core::CommandRecord;
use uuid::Uuid;

/// Identifies one input channel in log output.
pub type ChannelId = Uuid;

/// A subscribed consumer of dispatched commands.
pub trait CommandHandler: Send + Sync {
    /// Called once per dispatched command, in registration order.
    fn on_command(&self, command: &mut CommandRecord);
}

/// The registry of subscribed handlers.
///
/// Built once at startup, shared read-only by every channel's dispatcher.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn CommandHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `handler`; it will run after all previously registered
    /// handlers.
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) {
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Publishes `command` to every handler, at most once per token.
    ///
    /// Returns only after every handler has run to completion.
    pub fn publish(&self, command: &mut CommandRecord) {
        for handler in &self.handlers {
            handler.on_command(command);
        }
    }
}
