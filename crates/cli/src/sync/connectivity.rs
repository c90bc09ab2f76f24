// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Online/offline signal.
//!
//! The monitor does no polling of its own. Whatever observes the network
//! (a probe, a platform callback, a test) reports transitions through
//! [`ConnectivityMonitor::set_online`], and the engine subscribes to them.

use tokio::sync::watch;

/// Read side of the connectivity signal.
pub trait ConnectivityPort: Send + Sync {
    /// Returns the last reported state.
    fn is_online(&self) -> bool;

    /// Subscribe to transitions. The receiver starts at the current state.
    fn subscribe(&self) -> watch::Receiver<bool>;
}

/// Connectivity state held in a watch channel.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    tx: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    pub fn new(online: bool) -> Self {
        let (tx, _) = watch::channel(online);
        ConnectivityMonitor { tx }
    }

    /// Report the current state. Returns true if it changed.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                return false;
            }
            *current = online;
            true
        });
        if changed {
            tracing::info!(online, "connectivity changed");
        }
        changed
    }
}

impl ConnectivityPort for ConnectivityMonitor {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
