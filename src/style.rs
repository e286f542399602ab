//! External styling collaborator
//!
//! The reordered document is piped through `taplo format` for whitespace
//! and style normalization. The call is guarded by a host-side wall-clock
//! deadline so a hung or wedged binary surfaces as an error instead of a
//! hang. No partial output ever escapes: the styled text is returned only
//! after the tool exits cleanly.

use std::io::{self, Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::MergedConfig;

/// Name of the styling binary looked up on PATH.
pub const STYLE_TOOL: &str = "taplo";

/// Wall-clock limit for one styling call.
pub const STYLE_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Errors from the styling collaborator
#[derive(Debug, thiserror::Error)]
pub enum ExternalToolError {
    #[error("{tool} binary not found; install it and ensure it is on PATH")]
    NotFound { tool: String },

    #[error("{tool} exited with status {status}: {stderr}")]
    Failed {
        tool: String,
        status: i32,
        stderr: String,
    },

    #[error("{tool} did not complete within {seconds}s")]
    Timeout { tool: String, seconds: u64 },

    #[error("failed to run {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: io::Error,
    },
}

/// The `-o key=value` list handed to the tool: options derived from the
/// formatting configuration first, then the configured style options.
pub fn style_args(config: &MergedConfig) -> Vec<String> {
    let mut args = vec![
        format!(
            "indent_string={}",
            " ".repeat(config.formatting.spaces_indent_inline_array)
        ),
        format!(
            "array_trailing_comma={}",
            config.formatting.trailing_comma_inline_array
        ),
    ];
    args.extend(config.style_options.iter().cloned());
    args
}

/// Style a TOML string through the external tool.
pub fn format(text: &str, options: &[String]) -> Result<String, ExternalToolError> {
    let mut command = Command::new(STYLE_TOOL);
    command.arg("format").arg("--no-auto-config");
    for option in options {
        command.arg("-o").arg(option);
    }
    command.arg("-");
    run_tool(STYLE_TOOL, command, text, STYLE_TIMEOUT)
}

/// Whether the styling binary is usable. Test helper for environments
/// without it.
pub fn style_tool_available() -> bool {
    Command::new(STYLE_TOOL)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn run_tool(
    tool: &str,
    mut command: Command,
    input: &str,
    timeout: Duration,
) -> Result<String, ExternalToolError> {
    let io_error = |source: io::Error| ExternalToolError::Io {
        tool: tool.to_string(),
        source,
    };

    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = command.spawn().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ExternalToolError::NotFound {
                tool: tool.to_string(),
            }
        } else {
            io_error(e)
        }
    })?;

    let stdout = spawn_reader(child.stdout.take());
    let stderr = spawn_reader(child.stderr.take());

    if let Some(mut stdin) = child.stdin.take() {
        // A broken pipe means the tool quit early; its exit status and
        // stderr carry the diagnosis.
        match stdin.write_all(input.as_bytes()) {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => {
                reap(&mut child);
                return Err(io_error(e));
            }
            _ => {}
        }
    }

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    reap(&mut child);
                    return Err(ExternalToolError::Timeout {
                        tool: tool.to_string(),
                        seconds: timeout.as_secs(),
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                reap(&mut child);
                return Err(io_error(e));
            }
        }
    };

    let stdout = join_reader(stdout);
    let stderr = join_reader(stderr);
    if !status.success() {
        return Err(ExternalToolError::Failed {
            tool: tool.to_string(),
            status: status.code().unwrap_or(-1),
            stderr: stderr.trim().to_string(),
        });
    }
    Ok(stdout)
}

fn spawn_reader<R: Read + Send + 'static>(source: Option<R>) -> Option<thread::JoinHandle<String>> {
    source.map(|mut reader| {
        thread::spawn(move || {
            let mut buffer = String::new();
            let _ = reader.read_to_string(&mut buffer);
            buffer
        })
    })
}

fn join_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_args_derive_format_config() {
        let config = MergedConfig::resolve(None).unwrap();
        let args = style_args(&config);
        assert_eq!(args[0], "indent_string=    ");
        assert_eq!(args[1], "array_trailing_comma=true");
        assert!(args.contains(&"reorder_keys=false".to_string()));
        assert!(args.contains(&"column_width=80".to_string()));
    }

    #[test]
    fn test_missing_tool_is_not_found() {
        let command = Command::new("pypfmt-no-such-tool");
        let result = run_tool(
            "pypfmt-no-such-tool",
            command,
            "",
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(ExternalToolError::NotFound { .. })));
    }

    #[test]
    #[cfg(unix)]
    fn test_roundtrip_through_cat() {
        let result = run_tool("cat", Command::new("cat"), "a = 1\n", Duration::from_secs(5));
        assert_eq!(result.unwrap(), "a = 1\n");
    }

    #[test]
    #[cfg(unix)]
    fn test_failure_captures_stderr() {
        let mut command = Command::new("sh");
        command.arg("-c").arg("echo boom >&2; exit 3");
        let result = run_tool("sh", command, "", Duration::from_secs(5));
        match result {
            Err(ExternalToolError::Failed { status, stderr, .. }) => {
                assert_eq!(status, 3);
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_hung_tool_times_out() {
        let mut command = Command::new("sleep");
        command.arg("5");
        let started = Instant::now();
        let result = run_tool("sleep", command, "", Duration::from_millis(200));
        assert!(matches!(result, Err(ExternalToolError::Timeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
