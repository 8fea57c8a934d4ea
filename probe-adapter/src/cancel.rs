use tokio::sync::watch;

/// Creates a connected cancellation handle and token.
#[must_use]
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// The sending side of a cancellation. Cancelling is permanent.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancels every token created from this handle.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observes a cancellation requested through a [`CancelHandle`].
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// A token that can never be cancelled.
    #[must_use]
    pub fn never() -> Self {
        let (_handle, token) = cancel_pair();
        token
    }

    /// Check if cancellation has been requested (non-blocking)
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Waits until cancellation is requested.
    ///
    /// If every handle is dropped without cancelling, nobody can cancel any
    /// more and this never completes.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
