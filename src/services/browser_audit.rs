// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Headless browser quality audit (performance, SEO, accessibility,
//! best-practices) via the Lighthouse CLI.
//!
//! Every run launches its own Lighthouse process, which in turn launches its
//! own Chrome. Whatever is still running when the run ends, however it ends,
//! is killed.

use crate::error::AuditError;
use crate::models::audit::CategoryScores;
use crate::models::settings::AuditSettings;
use crate::services::logging::redact_url;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::io;
use std::process::{Output, Stdio};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};

/// A multi-category web quality audit of a live URL.
#[async_trait]
pub trait QualityAuditor: Send + Sync {
    /// Run the audit. Categories the tool did not score are `None`.
    async fn run(&self, url: &str) -> Result<CategoryScores, AuditError>;
}

/// Runs the `lighthouse` executable once per audit.
pub struct LighthouseAuditor {
    binary: String,
    chrome_flags: String,
}

impl LighthouseAuditor {
    pub fn new(settings: &AuditSettings) -> Self {
        Self {
            binary: settings.lighthouse_path.clone(),
            chrome_flags: settings.chrome_flags.clone(),
        }
    }

    fn command(&self, url: &str) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg(url)
            .arg("--output=json")
            .arg("--output-path=stdout")
            .arg("--quiet")
            .arg(format!(
                "--only-categories={}",
                CategoryScores::CATEGORIES.join(",")
            ))
            .arg(format!("--chrome-flags={}", self.chrome_flags))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        command.process_group(0);

        command
    }
}

#[async_trait]
impl QualityAuditor for LighthouseAuditor {
    async fn run(&self, url: &str) -> Result<CategoryScores, AuditError> {
        // Dropped on every exit path below, including when this future is dropped
        let mut session = BrowserSession::spawn(self.command(url)).map_err(|e| {
            AuditError::BrowserAudit(format!("Failed to launch '{}': {e}", self.binary))
        })?;
        tracing::debug!(url = %redact_url(url), pid = ?session.pid, "browser audit started");

        let output = session
            .output()
            .await
            .map_err(|e| AuditError::BrowserAudit(format!("Failed to wait for audit: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr.lines().last().unwrap_or("no output").trim().to_string();
            return Err(AuditError::BrowserAudit(format!(
                "audit exited with {}: {reason}",
                output.status
            )));
        }

        parse_report(&output.stdout)
    }
}

/// One Lighthouse process and everything it started.
///
/// Chrome is launched detached, in a session of its own, so it is not in
/// the Lighthouse process group. If Lighthouse is still running on drop, its
/// descendants are collected while they are still its children, then the
/// group and every descendant are killed.
struct BrowserSession {
    child: Child,
    pid: Option<u32>,
}

impl BrowserSession {
    fn spawn(mut command: Command) -> io::Result<Self> {
        let child = command.spawn()?;
        let pid = child.id();
        Ok(Self { child, pid })
    }

    async fn output(&mut self) -> io::Result<Output> {
        let mut stdout = self.child.stdout.take();
        let mut stderr = self.child.stderr.take();

        let (status, stdout, stderr) = tokio::try_join!(
            self.child.wait(),
            read_pipe(stdout.as_mut()),
            read_pipe(stderr.as_mut()),
        )?;

        Ok(Output {
            status,
            stdout,
            stderr,
        })
    }
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<&mut R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let Some(pid) = self.pid else {
            return;
        };

        match self.child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) => {}
            Err(e) => tracing::warn!(pid, error = %e, "could not check browser audit process"),
        }

        #[cfg(unix)]
        teardown::kill_tree(pid);

        tracing::debug!(pid, "browser session torn down");
    }
}

#[cfg(unix)]
mod teardown {
    use nix::errno::Errno;
    use nix::sys::signal::{kill, killpg, Signal};
    use nix::unistd::Pid;

    /// SIGKILL the process group led by `pid` and every descendant of `pid`
    pub(super) fn kill_tree(pid: u32) {
        let descendants = descendants(pid);

        report(killpg(as_pid(pid), Signal::SIGKILL), "group", pid);
        for child in descendants {
            report(kill(as_pid(child), Signal::SIGKILL), "process", child);
        }
    }

    fn as_pid(pid: u32) -> Pid {
        Pid::from_raw(pid as i32)
    }

    fn report(result: nix::Result<()>, kind: &str, id: u32) {
        match result {
            // Already gone
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(e) => tracing::warn!(kind, id, error = %e, "failed to kill browser audit {kind}"),
        }
    }

    #[cfg(target_os = "linux")]
    fn descendants(root: u32) -> Vec<u32> {
        let Ok(entries) = std::fs::read_dir("/proc") else {
            return Vec::new();
        };

        let parents: Vec<(u32, u32)> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().to_str()?.parse::<u32>().ok())
            .filter_map(|pid| {
                let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
                Some((pid, parent_pid(&stat)?))
            })
            .collect();

        let mut found = Vec::new();
        let mut frontier = vec![root];
        while let Some(parent) = frontier.pop() {
            for &(pid, ppid) in &parents {
                if ppid == parent && !found.contains(&pid) {
                    found.push(pid);
                    frontier.push(pid);
                }
            }
        }
        found
    }

    #[cfg(not(target_os = "linux"))]
    fn descendants(_root: u32) -> Vec<u32> {
        Vec::new()
    }

    /// Parent pid from a `/proc/<pid>/stat` line. The command name is in
    /// parentheses and may itself contain spaces and parentheses.
    #[cfg(target_os = "linux")]
    pub(super) fn parent_pid(stat: &str) -> Option<u32> {
        let (_, rest) = stat.rsplit_once(')')?;
        rest.split_whitespace().nth(1)?.parse().ok()
    }
}

#[derive(Deserialize)]
struct LighthouseReport {
    #[serde(default)]
    categories: HashMap<String, ReportCategory>,
    #[serde(rename = "runtimeError")]
    runtime_error: Option<RuntimeError>,
}

#[derive(Deserialize)]
struct ReportCategory {
    score: Option<f64>,
}

#[derive(Deserialize)]
struct RuntimeError {
    code: String,
    #[serde(default)]
    message: String,
}

/// Extract category scores from a Lighthouse JSON report
fn parse_report(stdout: &[u8]) -> Result<CategoryScores, AuditError> {
    let report: LighthouseReport = serde_json::from_slice(stdout)
        .map_err(|e| AuditError::BrowserAudit(format!("Unreadable audit report: {e}")))?;

    if let Some(error) = report.runtime_error {
        return Err(AuditError::BrowserAudit(format!(
            "{}: {}",
            error.code, error.message
        )));
    }

    let mut scores = CategoryScores::default();
    for (name, category) in &report.categories {
        scores.set(name, category.score);
    }

    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_all_categories() {
        let report = br#"{
            "lighthouseVersion": "12.0.0",
            "categories": {
                "performance": {"id": "performance", "score": 0.42},
                "seo": {"id": "seo", "score": 1},
                "accessibility": {"id": "accessibility", "score": 0.88},
                "best-practices": {"id": "best-practices", "score": 0.75}
            }
        }"#;

        let scores = parse_report(report).unwrap();
        assert_eq!(scores.performance, Some(0.42));
        assert_eq!(scores.seo, Some(1.0));
        assert_eq!(scores.accessibility, Some(0.88));
        assert_eq!(scores.best_practices, Some(0.75));
    }

    #[test]
    fn test_parse_report_missing_and_null_categories_are_no_data() {
        let report = br#"{"categories": {"seo": {"score": null}, "performance": {"score": 0.5}}}"#;

        let scores = parse_report(report).unwrap();
        assert_eq!(scores.performance, Some(0.5));
        assert_eq!(scores.seo, None);
        assert_eq!(scores.accessibility, None);
        assert_eq!(scores.best_practices, None);
    }

    #[test]
    fn test_parse_report_runtime_error_fails() {
        let report = br#"{"categories": {}, "runtimeError": {"code": "NO_FCP", "message": "The page did not paint"}}"#;

        let result = parse_report(report);
        assert!(matches!(result, Err(AuditError::BrowserAudit(msg)) if msg.starts_with("NO_FCP")));
    }

    #[test]
    fn test_parse_report_garbage_fails() {
        assert!(matches!(
            parse_report(b"Lighthouse crashed"),
            Err(AuditError::BrowserAudit(_))
        ));
    }

    #[test]
    fn test_command_requests_four_categories() {
        let auditor = LighthouseAuditor::new(&AuditSettings::default());
        let command = auditor.command("https://example.com/");
        let args: Vec<String> = command
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(args[0], "https://example.com/");
        assert!(args.contains(
            &"--only-categories=performance,seo,accessibility,best-practices".to_string()
        ));
        assert!(args.contains(&"--output=json".to_string()));
    }

    #[tokio::test]
    async fn test_missing_binary_is_launch_failure() {
        let settings = AuditSettings {
            lighthouse_path: "/nonexistent/lighthouse-binary".to_string(),
            ..AuditSettings::default()
        };

        let result = LighthouseAuditor::new(&settings)
            .run("https://example.com/")
            .await;
        assert!(matches!(result, Err(AuditError::BrowserAudit(msg)) if msg.starts_with("Failed to launch")));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_parent_pid_from_stat_with_odd_command_name() {
        let stat = "4242 (chrome (renderer) x) S 4100 4242 4242 0 -1 4194560";
        assert_eq!(teardown::parent_pid(stat), Some(4100));
        assert_eq!(teardown::parent_pid("garbage"), None);
    }

    /// Alive and not a zombie waiting to be reaped
    #[cfg(target_os = "linux")]
    fn is_running(pid: u32) -> bool {
        match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
            Ok(stat) => !matches!(
                stat.rsplit_once(')')
                    .and_then(|(_, rest)| rest.split_whitespace().next()),
                Some("Z" | "X")
            ),
            Err(_) => false,
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_abandoned_run_kills_detached_browser() {
        use std::os::unix::fs::PermissionsExt;
        use std::time::{Duration, Instant};

        // Stands in for Lighthouse: starts a "browser" in its own session, then waits
        let dir = tempfile::tempdir().unwrap();
        let pidfile = dir.path().join("browser.pid");
        let script = dir.path().join("lighthouse");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\nsetsid sh -c 'echo $$ > {}; exec sleep 300' &\nsleep 300\n",
                pidfile.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let settings = AuditSettings {
            lighthouse_path: script.display().to_string(),
            ..AuditSettings::default()
        };
        let auditor = LighthouseAuditor::new(&settings);
        let mut run = auditor.run("https://example.com/");

        let browser_pid = loop {
            tokio::select! {
                result = &mut run => panic!("audit finished early: {result:?}"),
                _ = tokio::time::sleep(Duration::from_millis(20)) => {}
            }
            let written = std::fs::read_to_string(&pidfile).unwrap_or_default();
            if let Ok(pid) = written.trim().parse::<u32>() {
                break pid;
            }
        };
        assert!(is_running(browser_pid));

        drop(run);

        let deadline = Instant::now() + Duration::from_secs(5);
        while is_running(browser_pid) {
            assert!(
                Instant::now() < deadline,
                "browser process {browser_pid} outlived the audit"
            );
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_finished_run_reports_exit_failure() {
        let settings = AuditSettings {
            lighthouse_path: "false".to_string(),
            ..AuditSettings::default()
        };

        let result = LighthouseAuditor::new(&settings)
            .run("https://example.com/")
            .await;
        assert!(matches!(result, Err(AuditError::BrowserAudit(msg)) if msg.starts_with("audit exited with")));
    }
}
