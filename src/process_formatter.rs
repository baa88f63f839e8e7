use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, ExitStatus};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context;

use crate::formatter::{FormatOutcome, Formatter};
use crate::process_command::ProcessCommand;

/// Instructs the formatter to emit its result on stdout instead of rewriting
/// the file in place.
const WRITE_STDOUT_FLAG: &str = "--write-stdout";

/// Stops the managed-runtime host from printing a startup banner into the
/// output stream.
const NO_LOGO_ENV: (&str, &str) = ("DOTNET_NOLOGO", "1");

/// Emitted by the formatter when the input does not compile and therefore was
/// not formatted, even though the process may exit 0.
const COMPILE_FAILURE_SENTINEL: &str = "Failed to compile so was not formatted.";

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Formats by spawning a fresh formatter process per call.
///
/// Each call is a full request/response cycle: spawn, write the source to the
/// child's stdin, drain its output, reap it, classify. Nothing survives
/// between calls, so concurrent calls are independent.
pub struct ProcessFormatter {
    process_command: ProcessCommand,
    timeout: Option<Duration>,
}

struct ProcessRun {
    status: ExitStatus,
    output: String,
}

impl ProcessFormatter {
    pub fn new(executable_path: impl Into<PathBuf>) -> Self {
        Self {
            process_command: ProcessCommand::new(executable_path, &[WRITE_STDOUT_FLAG])
                .env(NO_LOGO_ENV.0, NO_LOGO_ENV.1),
            timeout: None,
        }
    }

    /// Bound the wait on the formatter process; it is killed once the bound
    /// elapses. Without this the wait is unbounded.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    fn run(&self, content: &str) -> anyhow::Result<ProcessRun> {
        let mut child = self.process_command.spawn().into_result()?;

        let mut stdin = child
            .stdin
            .take()
            .with_context(|| format!("Failed to open stdin for {}", self.process_command))?;
        let stdout = child
            .stdout
            .take()
            .with_context(|| format!("Failed to open stdout for {}", self.process_command))?;
        let stderr = child
            .stderr
            .take()
            .with_context(|| format!("Failed to open stderr for {}", self.process_command))?;

        // The write and the two drains each progress on their own thread, so
        // a payload larger than the pipe buffer cannot deadlock against a
        // child that has already started producing output.
        let input = content.as_bytes().to_vec();
        let writer = std::thread::spawn(move || {
            let result = stdin.write_all(&input);
            // Dropping stdin closes the pipe, signalling end-of-input.
            drop(stdin);
            result
        });
        let stdout_reader = std::thread::spawn(move || read_to_end(stdout));
        let stderr_reader = std::thread::spawn(move || read_to_end(stderr));

        let wait_result = match self.timeout {
            None => child.wait().context("Failed to wait on child process"),
            Some(timeout) => wait_with_timeout(&mut child, timeout),
        };

        // Join the pipe threads whichever way the wait went; after a kill the
        // pipes are closed, so the drains finish promptly.
        let stdout = join_pipe_reader(stdout_reader, "stdout");
        let stderr = join_pipe_reader(stderr_reader, "stderr");
        let written = writer
            .join()
            .map_err(|_| anyhow::anyhow!("The stdin writer thread panicked"));

        let status = wait_result?;
        written?.context("Failed to write to stdin")?;

        // stderr is folded into the accumulated output, so diagnostics and
        // formatted text share one stream.
        let mut output = String::from_utf8(stdout?).context("Stdout is not valid UTF-8")?;
        output.push_str(&String::from_utf8_lossy(&stderr?));

        Ok(ProcessRun { status, output })
    }
}

impl Formatter for ProcessFormatter {
    fn format(&self, content: &str, file_identifier: &str) -> FormatOutcome {
        log::debug!(
            "ProcessFormatter::format: running {} ({})",
            self.process_command,
            file_identifier
        );
        match self.run(content) {
            Ok(run) if run.status.success() && !run.output.contains(COMPILE_FAILURE_SENTINEL) => {
                FormatOutcome::Formatted(run.output)
            }
            Ok(run) => {
                log::error!(
                    "ProcessFormatter::format: {} exited with {}:\n{}",
                    file_identifier,
                    run.status,
                    run.output
                );
                FormatOutcome::Failed
            }
            Err(error) => {
                log::error!("ProcessFormatter::format: {}: {:?}", file_identifier, error);
                FormatOutcome::Failed
            }
        }
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> anyhow::Result<ExitStatus> {
    let started = Instant::now();
    loop {
        if let Some(status) = child
            .try_wait()
            .context("Failed to wait on child process")?
        {
            return Ok(status);
        }
        if started.elapsed() > timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err(anyhow::anyhow!(
                "The formatter did not finish within {:?} and was killed",
                timeout
            ));
        }
        std::thread::sleep(WAIT_POLL_INTERVAL);
    }
}

fn read_to_end(mut pipe: impl Read) -> std::io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    pipe.read_to_end(&mut buffer)?;
    Ok(buffer)
}

fn join_pipe_reader(
    handle: JoinHandle<std::io::Result<Vec<u8>>>,
    stream: &str,
) -> anyhow::Result<Vec<u8>> {
    handle
        .join()
        .map_err(|_| anyhow::anyhow!("The {stream} reader thread panicked"))?
        .with_context(|| format!("Failed to read from {stream}"))
}
