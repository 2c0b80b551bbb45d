// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Subprocess execution helpers for backend CLIs.

use crate::error::InfraError;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Default timeout for docker CLI calls.
pub const DOCKER_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for cluster CLI calls (kubectl/oc round-trip the API server).
pub const CLUSTER_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for image builds.
pub const BUILD_TIMEOUT: Duration = Duration::from_secs(600);

/// Run a backend CLI command, optionally feeding `stdin`, with a timeout.
///
/// Returns trimmed stdout on success. Non-zero exit is classified by
/// stderr into transient vs fatal; a timeout is always transient (the
/// child is killed via the tokio `Child` drop implementation).
pub async fn run_backend(
    mut cmd: Command,
    stdin: Option<&str>,
    timeout: Duration,
    description: &str,
) -> Result<String, InfraError> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    if stdin.is_some() {
        cmd.stdin(Stdio::piped());
    } else {
        cmd.stdin(Stdio::null());
    }

    let run = async {
        let mut child = cmd
            .spawn()
            .map_err(|e| InfraError::Fatal(format!("{description} failed to spawn: {e}")))?;
        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(input.as_bytes())
                .await
                .map_err(|e| InfraError::Transient(format!("{description} stdin: {e}")))?;
            drop(pipe);
        }
        child
            .wait_with_output()
            .await
            .map_err(|e| InfraError::Transient(format!("{description} failed: {e}")))
    };

    let output = match tokio::time::timeout(timeout, run).await {
        Ok(result) => result?,
        Err(_elapsed) => {
            return Err(InfraError::Transient(format!(
                "{description} timed out after {}s",
                timeout.as_secs()
            )))
        }
    };

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(InfraError::from_backend_stderr(&stderr))
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
