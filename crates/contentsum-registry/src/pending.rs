//! Content that is still being produced.
//!
//! The content parser runs asynchronously and hands its result back through a
//! [`Pending`] handle. The registry only ever polls the handle; it never
//! blocks a reader waiting for a parse to finish.

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::error::{RegistryError, Result};

/// Receiving half of a value that will arrive later.
#[derive(Debug)]
pub struct Pending<T> {
    receiver: oneshot::Receiver<Result<T>>,
}

/// Producing half of a [`Pending`] value.
#[derive(Debug)]
pub struct PendingSender<T> {
    sender: oneshot::Sender<Result<T>>,
}

impl<T> Pending<T> {
    /// Create a connected sender/pending pair.
    pub fn channel() -> (PendingSender<T>, Pending<T>) {
        let (sender, receiver) = oneshot::channel();
        (PendingSender { sender }, Pending { receiver })
    }

    /// A pending value that has already resolved.
    pub fn ready(result: Result<T>) -> Self {
        let (sender, pending) = Self::channel();
        sender.send(result);
        pending
    }

    /// Non-blocking check.
    ///
    /// Returns `None` while the producer is still working, otherwise the
    /// delivered result. A producer that went away without sending yields
    /// [`RegistryError::LoaderDropped`].
    pub fn try_take(&mut self) -> Option<Result<T>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(RegistryError::LoaderDropped)),
        }
    }

    /// Wait for the result.
    pub async fn wait(self) -> Result<T> {
        match self.receiver.await {
            Ok(result) => result,
            Err(_) => Err(RegistryError::LoaderDropped),
        }
    }
}

impl<T> PendingSender<T> {
    /// Deliver the result. Returns `false` if nobody is waiting any more.
    pub fn send(self, result: Result<T>) -> bool {
        self.sender.send(result).is_ok()
    }

    /// Whether the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_take_before_and_after_send() {
        let (sender, mut pending) = Pending::<u32>::channel();
        assert!(pending.try_take().is_none());

        assert!(sender.send(Ok(7)));
        assert_eq!(pending.try_take(), Some(Ok(7)));
    }

    #[test]
    fn test_dropped_sender() {
        let (sender, mut pending) = Pending::<u32>::channel();
        drop(sender);
        assert_eq!(pending.try_take(), Some(Err(RegistryError::LoaderDropped)));
    }

    #[test]
    fn test_ready() {
        let failed = RegistryError::LoadFailed("bad".into());
        let mut pending = Pending::ready(Err::<u32, _>(failed));
        assert_eq!(
            pending.try_take(),
            Some(Err(RegistryError::LoadFailed("bad".into())))
        );
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (sender, pending) = Pending::<u32>::channel();
        drop(pending);
        assert!(sender.is_closed());
        assert!(!sender.send(Ok(1)));
    }

    #[tokio::test]
    async fn test_wait() {
        let (sender, pending) = Pending::<u32>::channel();
        tokio::spawn(async move {
            sender.send(Ok(42));
        });
        assert_eq!(pending.wait().await, Ok(42));
    }
}
