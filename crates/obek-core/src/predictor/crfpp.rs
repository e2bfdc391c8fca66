//! CRF++ `crf_test` run as a child process.

use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::LabelPredictor;
use crate::error::{ObekError, Result};
use crate::pipeline::DEFAULT_FIELD_DELIMITER;

/// Executable looked up on `PATH` by default.
pub const DEFAULT_EXECUTABLE: &str = "crf_test";

/// Default bound on a single `crf_test` run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Labels sentences by writing a feature file and invoking
/// `crf_test -m <model> <file>`.
///
/// Every call uses its own scratch file, removed when the call returns.
#[derive(Debug, Clone)]
pub struct CrfPlusPlusPredictor {
    executable: PathBuf,
    leading_args: Vec<OsString>,
    model: PathBuf,
    timeout: Duration,
    scratch_dir: Option<PathBuf>,
    field_delimiter: String,
}

impl CrfPlusPlusPredictor {
    /// Creates a predictor for the given model file.
    pub fn new<P: AsRef<Path>>(model: P) -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            leading_args: Vec::new(),
            model: model.as_ref().to_path_buf(),
            timeout: DEFAULT_TIMEOUT,
            scratch_dir: None,
            field_delimiter: DEFAULT_FIELD_DELIMITER.to_string(),
        }
    }

    /// Uses another executable instead of `crf_test`.
    pub fn with_executable<P: AsRef<Path>>(mut self, executable: P) -> Self {
        self.executable = executable.as_ref().to_path_buf();
        self
    }

    /// Arguments placed before `-m`, e.g. a script path when the executable
    /// is an interpreter.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Bounds each run; a slower run is killed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Directory for the scratch feature files (system temp dir by default).
    pub fn with_scratch_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.scratch_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Column separator of the scratch feature file. `crf_test` splits
    /// columns on tabs and spaces.
    pub fn with_field_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.field_delimiter = delimiter.into();
        self
    }

    pub fn model(&self) -> &Path {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn field_delimiter(&self) -> &str {
        &self.field_delimiter
    }

    fn write_feature_file(&self, features: &[Vec<String>]) -> Result<tempfile::NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("obek").suffix(".txt");
        let mut file = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| io_failure("cannot create scratch feature file", e))?;
        for row in features {
            writeln!(file, "{}", row.join(&self.field_delimiter))
                .map_err(|e| io_failure("cannot write scratch feature file", e))?;
        }
        file.flush()
            .map_err(|e| io_failure("cannot write scratch feature file", e))?;
        Ok(file)
    }

    /// Waits for the child, killing it once the timeout expires.
    fn wait_bounded(&self, child: &mut std::process::Child) -> Result<ExitStatus> {
        let started = Instant::now();
        loop {
            let status = child
                .try_wait()
                .map_err(|e| io_failure("cannot poll crf_test", e))?;
            if let Some(status) = status {
                return Ok(status);
            }
            if started.elapsed() >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ObekError::PredictorTimeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Reads a child pipe to the end on a helper thread so the child never
/// blocks on a full pipe while we poll it.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<std::io::Result<String>> {
    thread::spawn(move || {
        let mut out = String::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_string(&mut out)?;
        }
        Ok(out)
    })
}

fn joined(handle: thread::JoinHandle<std::io::Result<String>>) -> Result<String> {
    handle
        .join()
        .map_err(|_| ObekError::PredictorFailure("output reader thread panicked".into()))?
        .map_err(|e| io_failure("cannot read crf_test output", e))
}

fn io_failure(what: &str, e: std::io::Error) -> ObekError {
    ObekError::PredictorFailure(format!("{what}: {e}"))
}

/// Extracts the label column from `crf_test` output: the last whitespace
/// separated field of every non-blank line.
pub fn parse_labels(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.split_whitespace().last())
        .map(str::to_string)
        .collect()
}

impl LabelPredictor for CrfPlusPlusPredictor {
    fn predict(&self, features: &[Vec<String>]) -> Result<Vec<String>> {
        if features.is_empty() {
            return Ok(Vec::new());
        }

        let file = self.write_feature_file(features)?;

        let mut child = Command::new(&self.executable)
            .args(&self.leading_args)
            .arg("-m")
            .arg(&self.model)
            .arg(file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ObekError::PredictorFailure(format!(
                    "cannot start {}: {e}",
                    self.executable.display()
                ))
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let status = self.wait_bounded(&mut child)?;
        let stdout = joined(stdout)?;
        let stderr = joined(stderr)?;

        if !status.success() {
            return Err(ObekError::PredictorFailure(format!(
                "{} exited with {status}: {}",
                self.executable.display(),
                stderr.trim()
            )));
        }

        let labels = parse_labels(&stdout);
        debug!(tokens = features.len(), labels = labels.len(), "crf_test finished");
        Ok(labels)
    }

    fn name(&self) -> &'static str {
        "crf++"
    }
}
