// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gateway adapter that shells out to an operator-configured hook.
//!
//! The hook executable receives the action name and its arguments and
//! talks to the chat platform however it likes; the daemon only cares
//! about the exit status. Non-zero exit or a spawn error is reported
//! as a failed action and retried by the scheduler.
//!
//! Invocations:
//! ```text
//! <hook> lock <channel_id> <guild_id> <reason>
//! <hook> unlock <channel_id> <guild_id> <reason>
//! <hook> send-message <channel_id> <guild_id> <text>
//! <hook> distribute <channel_id> <guild_id> <amount>
//! ```

use async_trait::async_trait;
use curfew_core::{ActionFailed, ActionGateway, ChannelRef};
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HookGateway {
    command: String,
}

impl HookGateway {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into() }
    }

    async fn invoke(&self, action: &'static str, args: &[&str]) -> Result<(), ActionFailed> {
        debug!(hook = %self.command, action, "invoking gateway hook");
        let output = Command::new(&self.command)
            .arg(action)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ActionFailed::new(action, format!("hook spawn failed: {e}")))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ActionFailed::new(
                action,
                format!("hook exited with {}: {}", output.status, stderr.trim()),
            ))
        }
    }
}

#[async_trait]
impl ActionGateway for HookGateway {
    async fn lock(&self, target: &ChannelRef, reason: &str) -> Result<(), ActionFailed> {
        self.invoke("lock", &[&target.channel_id, &target.guild_id, reason]).await
    }

    async fn unlock(&self, target: &ChannelRef, reason: &str) -> Result<(), ActionFailed> {
        self.invoke("unlock", &[&target.channel_id, &target.guild_id, reason]).await
    }

    async fn send_message(&self, target: &ChannelRef, text: &str) -> Result<(), ActionFailed> {
        self.invoke("send-message", &[&target.channel_id, &target.guild_id, text]).await
    }

    async fn distribute(&self, target: &ChannelRef, amount: u64) -> Result<(), ActionFailed> {
        let amount = amount.to_string();
        self.invoke("distribute", &[&target.channel_id, &target.guild_id, &amount]).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn script(dir: &tempfile::TempDir, body: &str) -> String {
        let path = dir.path().join("hook.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    fn target() -> ChannelRef {
        ChannelRef { channel_id: "general".into(), guild_id: "g1".into() }
    }

    #[tokio::test]
    async fn successful_hook_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = HookGateway::new(script(&dir, "exit 0"));
        assert!(gateway.lock(&target(), "curfew").await.is_ok());
    }

    #[tokio::test]
    async fn hook_receives_action_and_args() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("args.txt");
        let gateway = HookGateway::new(script(
            &dir,
            &format!("echo \"$@\" > {}", out.display()),
        ));
        gateway.distribute(&target(), 5_000).await.unwrap();
        let args = std::fs::read_to_string(&out).unwrap();
        assert_eq!(args.trim(), "distribute general g1 5000");
    }

    #[tokio::test]
    async fn nonzero_exit_is_action_failed() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = HookGateway::new(script(&dir, "echo nope >&2; exit 3"));
        let err = gateway.unlock(&target(), "curfew").await.unwrap_err();
        assert_eq!(err.action, "unlock");
        assert!(err.detail.contains("nope"));
    }

    #[tokio::test]
    async fn missing_hook_is_action_failed() {
        let gateway = HookGateway::new("/nonexistent/hook");
        let err = gateway.send_message(&target(), "hi").await.unwrap_err();
        assert!(err.detail.contains("spawn failed"));
    }
}
