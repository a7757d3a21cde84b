// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The external action gateway boundary.
//!
//! All platform-specific effects (locking a channel, sending a message,
//! granting currency) go through [`ActionGateway`]. The scheduler never
//! inspects the transport behind it; a call either completes or reports
//! [`ActionFailed`] and is retried on the next tick.

use crate::task::ChannelRef;
use async_trait::async_trait;
use thiserror::Error;

/// A gateway call that did not complete.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{action} failed: {detail}")]
pub struct ActionFailed {
    pub action: &'static str,
    pub detail: String,
}

impl ActionFailed {
    pub fn new(action: &'static str, detail: impl Into<String>) -> Self {
        Self { action, detail: detail.into() }
    }
}

/// Platform actions the scheduler can invoke.
#[async_trait]
pub trait ActionGateway: Send + Sync {
    async fn lock(&self, target: &ChannelRef, reason: &str) -> Result<(), ActionFailed>;
    async fn unlock(&self, target: &ChannelRef, reason: &str) -> Result<(), ActionFailed>;
    async fn send_message(&self, target: &ChannelRef, text: &str) -> Result<(), ActionFailed>;
    async fn distribute(&self, target: &ChannelRef, amount: u64) -> Result<(), ActionFailed>;
}

#[cfg(any(test, feature = "test-support"))]
pub use recording::{GatewayCall, RecordingGateway};

#[cfg(any(test, feature = "test-support"))]
mod recording {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::Arc;

    /// One observed gateway invocation.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum GatewayCall {
        Lock { channel: String },
        Unlock { channel: String },
        Message { channel: String, text: String },
        Distribute { channel: String, amount: u64 },
    }

    /// Gateway that records calls and can be told to fail actions by name.
    #[derive(Clone, Default)]
    pub struct RecordingGateway {
        calls: Arc<Mutex<Vec<GatewayCall>>>,
        failing: Arc<Mutex<HashSet<&'static str>>>,
    }

    impl RecordingGateway {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make the named action ("lock", "unlock", "send_message",
        /// "distribute") fail until cleared.
        pub fn fail(&self, action: &'static str) {
            self.failing.lock().insert(action);
        }

        pub fn succeed(&self, action: &'static str) {
            self.failing.lock().remove(action);
        }

        pub fn calls(&self) -> Vec<GatewayCall> {
            self.calls.lock().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().len()
        }

        fn check(&self, action: &'static str) -> Result<(), ActionFailed> {
            if self.failing.lock().contains(action) {
                Err(ActionFailed::new(action, "injected failure"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ActionGateway for RecordingGateway {
        async fn lock(&self, target: &ChannelRef, _reason: &str) -> Result<(), ActionFailed> {
            self.check("lock")?;
            self.calls.lock().push(GatewayCall::Lock { channel: target.channel_id.clone() });
            Ok(())
        }

        async fn unlock(&self, target: &ChannelRef, _reason: &str) -> Result<(), ActionFailed> {
            self.check("unlock")?;
            self.calls.lock().push(GatewayCall::Unlock { channel: target.channel_id.clone() });
            Ok(())
        }

        async fn send_message(
            &self,
            target: &ChannelRef,
            text: &str,
        ) -> Result<(), ActionFailed> {
            self.check("send_message")?;
            self.calls.lock().push(GatewayCall::Message {
                channel: target.channel_id.clone(),
                text: text.to_string(),
            });
            Ok(())
        }

        async fn distribute(
            &self,
            target: &ChannelRef,
            amount: u64,
        ) -> Result<(), ActionFailed> {
            self.check("distribute")?;
            self.calls.lock().push(GatewayCall::Distribute {
                channel: target.channel_id.clone(),
                amount,
            });
            Ok(())
        }
    }
}
