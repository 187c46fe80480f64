//! Local `whois` command strategy.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join;
use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::error::{EngineError, EngineResult};
use crate::types::{WhoisRecord, WhoisSource};

use super::WhoisStrategy;
use super::parse::parse_whois_text;

/// Upper bound on captured stdout. Real WHOIS records are a few KiB.
pub(crate) const MAX_STDOUT_BYTES: u64 = 1024 * 1024;
const MAX_STDERR_BYTES: u64 = 16 * 1024;

/// Read at most `limit` bytes, then drop the pipe so a chatty child gets
/// `EPIPE` instead of blocking on a full buffer.
async fn read_capped<R: AsyncRead + Unpin>(reader: Option<R>, limit: u64) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(reader) = reader {
        reader.take(limit).read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Runs `<program> <domain>` and parses its standard output.
pub struct CommandStrategy {
    program: String,
    timeout: Duration,
}

impl CommandStrategy {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl WhoisStrategy for CommandStrategy {
    fn name(&self) -> &'static str {
        "command"
    }

    async fn attempt(&self, domain: &str) -> EngineResult<WhoisRecord> {
        // Never let the domain be read as an option.
        if domain.starts_with('-') {
            return Err(EngineError::ValidationError(format!(
                "Refusing to pass {domain} to {}",
                self.program
            )));
        }
        debug!("[WHOIS:command] {} {domain}", self.program);

        let mut child = Command::new(&self.program)
            .arg(domain)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                EngineError::CommandError(format!("Failed to run {}: {e}", self.program))
            })?;

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let run = async move {
            let (stdout, stderr) = join(
                read_capped(stdout_pipe, MAX_STDOUT_BYTES),
                read_capped(stderr_pipe, MAX_STDERR_BYTES),
            )
            .await;
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, stdout?, stderr?))
        };

        let (status, stdout, stderr) = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| {
                EngineError::Timeout(format!(
                    "{} did not finish within {}s",
                    self.program,
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| EngineError::CommandError(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&stdout);
        if stdout.trim().is_empty() {
            if status.success() {
                return Err(EngineError::NoData(format!("{} produced no output", self.program)));
            }
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(EngineError::CommandError(format!(
                "{} exited with {}: {}",
                self.program,
                status,
                stderr.trim()
            )));
        }

        // Some clients exit non-zero on partial referrals yet still print a
        // usable record, so the exit status only matters when stdout is empty.
        Ok(parse_whois_text(domain, &stdout, WhoisSource::Command))
    }
}
