//! Coarse user-cancel flag, checked between units of work.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{AppError, Result};

/// Shared cancel flag. Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// `Err(AppError::Interrupted)` once cancellation was requested.
    pub fn check(&self) -> Result<()> {
        if self.is_triggered() {
            Err(AppError::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Trigger this flag on Ctrl-C. Must be called inside a Tokio runtime.
    pub fn listen_for_ctrl_c(&self) {
        let interrupt = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Ctrl-C received, stopping after the current step...");
                interrupt.trigger();
            }
        });
    }
}
