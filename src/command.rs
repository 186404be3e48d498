use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;

/// Deferred work returned from an update: futures that each resolve to one
/// follow-up message.
#[must_use = "commands do nothing unless handed to the runtime"]
pub struct Command<M> {
    futures: Vec<BoxFuture<'static, M>>,
}

impl<M: Send + 'static> Command<M> {
    pub fn none() -> Self {
        Self {
            futures: Vec::new(),
        }
    }

    pub fn perform<T, F>(future: F, map: impl FnOnce(T) -> M + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            futures: vec![future.map(map).boxed()],
        }
    }

    pub fn is_none(&self) -> bool {
        self.futures.is_empty()
    }

    pub fn into_futures(self) -> Vec<BoxFuture<'static, M>> {
        self.futures
    }
}

impl<M> std::fmt::Debug for Command<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("pending", &self.futures.len())
            .finish()
    }
}
