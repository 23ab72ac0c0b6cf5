//! Shutdown and cancellation coordination
//!
//! A single coordinator owns the broadcast channel; every component that must
//! stop early (listing calls, analysis workers) holds a cloneable
//! [`ShutdownSignal`]. Signals are fed by OS signal handlers and by an optional
//! scan timeout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Coordinates graceful shutdown across the application
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
    shutdown_requested: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(8);
        Self {
            shutdown_tx,
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle that observes this coordinator
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            shutdown_tx: self.shutdown_tx.clone(),
            shutdown_requested: Arc::clone(&self.shutdown_requested),
        }
    }

    /// Trigger shutdown
    pub fn trigger_shutdown(&self) {
        // Release pairs with the Acquire load in is_shutdown_requested
        self.shutdown_requested.store(true, Ordering::Release);
        let _ = self.shutdown_tx.send(());
    }

    /// Check if shutdown has been requested
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::Acquire)
    }

    /// Install SIGINT/SIGTERM (and friends) handlers. Must run inside a tokio runtime.
    pub fn install_signal_handlers(&self) {
        setup_signal_handlers(
            self.shutdown_tx.clone(),
            Arc::clone(&self.shutdown_requested),
        );
    }

    /// Trigger shutdown once `after` has elapsed. Must run inside a tokio runtime.
    pub fn trigger_after(&self, after: Duration) {
        let tx = self.shutdown_tx.clone();
        let requested = Arc::clone(&self.shutdown_requested);
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            log::warn!("Scan timeout of {:?} reached; cancelling", after);
            requested.store(true, Ordering::Release);
            let _ = tx.send(());
        });
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable view of a [`ShutdownCoordinator`]
#[derive(Clone, Debug)]
pub struct ShutdownSignal {
    shutdown_tx: broadcast::Sender<()>,
    shutdown_requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// A signal that is never triggered
    pub fn never() -> Self {
        ShutdownCoordinator::new().signal()
    }

    /// Whether shutdown has already been requested
    pub fn is_triggered(&self) -> bool {
        self.shutdown_requested.load(Ordering::Acquire)
    }

    /// Resolve once shutdown is requested.
    ///
    /// Subscribes before checking the flag so a trigger between the two cannot be missed.
    pub async fn cancelled(&self) {
        let mut rx = self.shutdown_tx.subscribe();
        if self.is_triggered() {
            return;
        }
        // The signal holds a sender, so the channel never closes underneath us;
        // both Ok and Lagged mean a shutdown was broadcast.
        let _ = rx.recv().await;
    }
}

/// Set up signal handlers for graceful shutdown
fn setup_signal_handlers(shutdown_tx: broadcast::Sender<()>, shutdown_requested: Arc<AtomicBool>) {
    #[cfg(unix)]
    {
        // Report output goes to stdout; a closed pipe should end the process quietly
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }

        use std::sync::atomic::AtomicUsize;
        use tokio::signal::unix::{signal, SignalKind};
        let signal_count = Arc::new(AtomicUsize::new(0));
        let signals = [
            SignalKind::interrupt(),
            SignalKind::terminate(),
            SignalKind::hangup(),
            SignalKind::quit(),
        ];

        for kind in signals {
            let tx = shutdown_tx.clone();
            let requested = shutdown_requested.clone();
            let sig_ctr = signal_count.clone();

            tokio::spawn(async move {
                if let Ok(mut sig) = signal(kind) {
                    while sig.recv().await.is_some() {
                        let prev = sig_ctr.fetch_add(1, Ordering::AcqRel);
                        requested.store(true, Ordering::Release);
                        let _ = tx.send(());
                        if prev >= 1 {
                            // Second signal forces an immediate exit
                            std::process::exit(130);
                        }
                        log::warn!("Interrupt received; cancelling in-flight scans");
                    }
                }
            });
        }
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown_requested.store(true, Ordering::Release);
                let _ = shutdown_tx.send(());
            }
        });
    }
}
