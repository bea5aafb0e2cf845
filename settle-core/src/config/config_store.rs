//! Versionless config cell with change notification.
//!
//! `ConfigStore<T>` keeps the current value inside a `watch` channel, so
//! readers get a cheap clone and subscribers are woken on every update.

use std::sync::Arc;
use tokio::sync::watch;

/// A shared configuration section.
pub struct ConfigStore<T> {
    tx: Arc<watch::Sender<T>>,
}

/// Receives the new value whenever its [`ConfigStore`] is updated.
pub struct ConfigWatcher<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> ConfigStore<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the value and wake all watchers.
    pub fn update(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Watch for updates made after this call.
    pub fn subscribe(&self) -> ConfigWatcher<T> {
        ConfigWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Clone> ConfigWatcher<T> {
    /// Wait for the next update and return the new value.
    ///
    /// Errors once every [`ConfigStore`] handle has been dropped.
    pub async fn changed(&mut self) -> Result<T, watch::error::RecvError> {
        self.rx.changed().await?;
        Ok(self.rx.borrow_and_update().clone())
    }
}
