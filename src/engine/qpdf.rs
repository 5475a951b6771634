//! `qpdf` adapter
//!
//! Each call writes the input into a private scratch directory, runs
//!
//! ```text
//! qpdf --encrypt --user-password=<pw> --owner-password=<pw> --bits=256 -- in.pdf out.pdf
//! ```
//!
//! and reads the result back. The scratch directory is removed when the call
//! returns. Passwords are passed as `--flag=value` so a password starting
//! with `-` is never read as an option.
//!
//! The executable is resolved and probed once per engine, on first use.
//!
//! On Unix, qpdf runs in its own process group. A terminal Ctrl-C then only
//! reaches pdfseal, which stops starting new documents while the running
//! qpdf processes complete.

use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::EncryptionEngine;
use crate::error::EngineError;

/// qpdf exit status for "succeeded with warnings".
const EXIT_WARNINGS: i32 = 3;

/// AES-256 encryption.
const KEY_BITS: u16 = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QpdfOptions {
    /// Executable name or path; bare names are looked up on `PATH`
    pub program: String,
}

impl Default for QpdfOptions {
    fn default() -> Self {
        Self {
            program: "qpdf".to_string(),
        }
    }
}

/// Lifecycle of the engine runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Ready,
    /// Initialization ran and failed; every call reports the failure
    Unavailable,
}

#[derive(Debug)]
struct QpdfRuntime {
    program: PathBuf,
    version: String,
}

pub struct QpdfEngine {
    options: QpdfOptions,
    runtime: OnceLock<Result<QpdfRuntime, String>>,
}

impl QpdfEngine {
    pub fn new(options: QpdfOptions) -> Self {
        Self {
            options,
            runtime: OnceLock::new(),
        }
    }

    pub fn state(&self) -> EngineState {
        match self.runtime.get() {
            None => EngineState::Uninitialized,
            Some(Ok(_)) => EngineState::Ready,
            Some(Err(_)) => EngineState::Unavailable,
        }
    }

    /// Resolve and probe the executable, returning its version line.
    ///
    /// Runs at most once; concurrent callers wait for the first probe and
    /// share its result.
    pub fn initialize(&self) -> Result<&str, EngineError> {
        self.runtime().map(|runtime| runtime.version.as_str())
    }

    fn runtime(&self) -> Result<&QpdfRuntime, EngineError> {
        self.runtime
            .get_or_init(|| probe(&self.options))
            .as_ref()
            .map_err(|detail| EngineError::new(detail.clone()))
    }
}

impl Default for QpdfEngine {
    fn default() -> Self {
        Self::new(QpdfOptions::default())
    }
}

fn probe(options: &QpdfOptions) -> Result<QpdfRuntime, String> {
    let program = which::which(&options.program)
        .map_err(|e| format!("qpdf executable '{}' not found: {}", options.program, e))?;

    let output = Command::new(&program)
        .arg("--version")
        .output()
        .map_err(|e| format!("Failed to run {}: {}", program.display(), e))?;

    if !output.status.success() {
        return Err(format!(
            "{} --version exited with {}",
            program.display(),
            output.status
        ));
    }

    let version = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    tracing::info!("Using {} ({})", program.display(), version);
    Ok(QpdfRuntime { program, version })
}

#[cfg(unix)]
fn detach_from_terminal_signals(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn detach_from_terminal_signals(_command: &mut Command) {}

impl EncryptionEngine for QpdfEngine {
    fn encrypt_document(&self, input: &[u8], password: &str) -> Result<Vec<u8>, EngineError> {
        let runtime = self.runtime()?;

        let scratch = tempfile::Builder::new().prefix("pdfseal-").tempdir()?;
        let in_path = scratch.path().join("in.pdf");
        let out_path = scratch.path().join("out.pdf");
        std::fs::write(&in_path, input)?;

        let mut command = Command::new(&runtime.program);
        command
            .arg("--encrypt")
            .arg(format!("--user-password={password}"))
            .arg(format!("--owner-password={password}"))
            .arg(format!("--bits={KEY_BITS}"))
            .arg("--")
            .arg(&in_path)
            .arg(&out_path);
        detach_from_terminal_signals(&mut command);
        let output = command.output()?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        match output.status.code() {
            Some(0) => {}
            Some(EXIT_WARNINGS) => tracing::warn!("qpdf reported warnings: {}", stderr),
            _ if stderr.is_empty() => {
                return Err(EngineError::new(format!("qpdf exited with {}", output.status)));
            }
            _ => return Err(EngineError::new(stderr)),
        }

        let produced = std::fs::read(&out_path)?;
        if produced.as_slice() == input {
            return Err(EngineError::new("qpdf output is identical to the input"));
        }

        Ok(produced)
    }
}
