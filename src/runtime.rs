use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;

use crate::application::Planner;
use crate::command::Command;
use crate::message::Message;
use crate::storage::KeyValueStore;
use crate::sync::TodoBackend;

/// Drives a [`Planner`] on the current task.
///
/// Commands are polled together; each resolved message is applied in the
/// order its request finished, not the order it was issued.
pub struct Runtime<B, S> {
    planner: Planner<B, S>,
    pending: FuturesUnordered<BoxFuture<'static, Message>>,
}

impl<B: TodoBackend, S: KeyValueStore> Runtime<B, S> {
    pub fn new(planner: Planner<B, S>, init: Command<Message>) -> Self {
        let mut runtime = Self {
            planner,
            pending: FuturesUnordered::new(),
        };
        runtime.schedule(init);
        runtime
    }

    pub fn planner(&self) -> &Planner<B, S> {
        &self.planner
    }

    pub fn planner_mut(&mut self) -> &mut Planner<B, S> {
        &mut self.planner
    }

    pub fn dispatch(&mut self, message: Message) {
        let command = self.planner.update(message);
        self.schedule(command);
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Wait for the next request to finish and apply its message.
    /// Returns `false` when nothing is in flight.
    pub async fn next(&mut self) -> bool {
        match self.pending.next().await {
            Some(message) => {
                self.dispatch(message);
                true
            }
            None => false,
        }
    }

    /// Run until no request is in flight.
    pub async fn settle(&mut self) {
        while self.next().await {}
    }

    fn schedule(&mut self, command: Command<Message>) {
        self.pending.extend(command.into_futures());
    }
}
