//! Shared per-robot context handed to every capability.

use crate::attributes::{AttributeQuery, AttributeValue};
use crate::error::Result;
use crate::state::AttributeStore;
use crate::transport::{CommandOptions, Transport, send_with_timeout};
use log::warn;
use parking_lot::RwLock;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Transport plus attribute store of one robot.
///
/// Capabilities of one robot run one after another; the store lock is only
/// ever held for synchronous reads and upserts, never across an `.await`.
pub struct RobotContext {
    transport: Arc<dyn Transport>,
    state: RwLock<AttributeStore>,
    command_timeout: Duration,
}

impl RobotContext {
    pub fn new(transport: Arc<dyn Transport>, command_timeout: Duration) -> Self {
        Self {
            transport,
            state: RwLock::new(AttributeStore::new()),
            command_timeout,
        }
    }

    /// Send a command using the default command timeout.
    pub async fn send_command(&self, name: &str, args: Value) -> Result<Value> {
        self.send_command_with(name, args, CommandOptions::default())
            .await
    }

    pub async fn send_command_with(
        &self,
        name: &str,
        args: Value,
        options: CommandOptions,
    ) -> Result<Value> {
        send_with_timeout(
            self.transport.as_ref(),
            name,
            args,
            options,
            self.command_timeout,
        )
        .await
    }

    pub fn state(&self) -> &RwLock<AttributeStore> {
        &self.state
    }

    pub fn get_first_matching(&self, query: &AttributeQuery) -> Option<AttributeValue> {
        self.state.read().get_first_matching(query).cloned()
    }

    pub fn get_all_matching(&self, query: &AttributeQuery) -> Vec<AttributeValue> {
        self.state.read().get_all_matching(query)
    }

    /// Upsert a batch of attributes and notify observers once.
    pub fn upsert_and_notify(&self, values: impl IntoIterator<Item = AttributeValue>) {
        let mut state = self.state.write();
        for value in values {
            state.upsert_first_matching(value);
        }
        state.notify_changed();
    }
}

/// Run `primary`, then always run `cleanup`, on success and on failure.
///
/// The outcome of `primary` is what the caller sees. A cleanup failure is only
/// reported when `primary` succeeded; otherwise it is logged and the original
/// error is kept.
pub async fn with_cleanup<T, P, C>(primary: P, cleanup: C) -> Result<T>
where
    P: Future<Output = Result<T>>,
    C: Future<Output = Result<()>>,
{
    let outcome = primary.await;
    let cleaned = cleanup.await;

    match (outcome, cleaned) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(cleanup_err)) => Err(cleanup_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(cleanup_err)) => {
            warn!("Cleanup failed after error {}: {}", err, cleanup_err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RobotError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_cleanup_runs_on_success() {
        let runs = AtomicU32::new(0);
        let result = with_cleanup(async { Ok(7) }, async {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cleanup_runs_on_failure_and_keeps_original_error() {
        let runs = AtomicU32::new(0);
        let result: Result<()> = with_cleanup(
            async { Err(RobotError::Transport("merge failed".into())) },
            async {
                runs.fetch_add(1, Ordering::SeqCst);
                Err(RobotError::Transport("refresh failed".into()))
            },
        )
        .await;

        assert!(matches!(result, Err(RobotError::Transport(msg)) if msg == "merge failed"));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cleanup_error_surfaces_after_success() {
        let result = with_cleanup(async { Ok(()) }, async {
            Err(RobotError::Transport("refresh failed".into()))
        })
        .await;
        assert!(result.is_err());
    }
}
