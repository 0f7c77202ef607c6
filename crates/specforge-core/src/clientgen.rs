//! External client-code generator invocation.
//!
//! The generator is an external CLI tool spawned as a subprocess. Its stdout
//! and stderr are captured in full and persisted to two log files under the
//! output directory. A non-zero exit code or any stderr output is reported as
//! an issue, not an error; only failing to spawn the tool is an error.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

use crate::config::ClientToolConfig;
use crate::entry::normalize_path;
use crate::report::{BuildIssue, IssueKind, IssueSink};

// External imports (alphabetized)
use tokio::fs;
use tokio::process::Command;

/// Log file receiving the tool's full stdout
pub const STDOUT_LOG_FILE: &str = "openapi-generator.stdout.log";
/// Log file receiving the tool's full stderr
pub const STDERR_LOG_FILE: &str = "openapi-generator.stderr.log";

const DEFAULT_PROGRAM: &str = "openapi-generator-cli";

/// Runs the external generator for one configured invocation
#[derive(Debug, Clone)]
pub struct ClientToolRunner {
    program: String,
    source_file: PathBuf,
    output_dir: PathBuf,
    generator: String,
    openapi_version: String,
    additional_options: Vec<(String, String)>,
}

impl ClientToolRunner {
    /// Validate the options object and resolve its paths against the build root.
    pub fn new(config: &ClientToolConfig, build_root: &Path) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self {
            program: DEFAULT_PROGRAM.to_string(),
            source_file: normalize_path(&build_root.join(&config.source_file)),
            output_dir: normalize_path(&build_root.join(&config.output_folder_path)),
            generator: config.generator.clone(),
            openapi_version: config.openapi_version.clone(),
            additional_options: config
                .additional_options
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }

    /// Override the tool binary (used by tests and unusual installs)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Argument list handed to the tool
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "generate".to_string(),
            "-i".to_string(),
            self.source_file.to_string_lossy().into_owned(),
            "-g".to_string(),
            self.generator.clone(),
            "-o".to_string(),
            self.output_dir.to_string_lossy().into_owned(),
        ];
        if !self.additional_options.is_empty() {
            let pairs: Vec<String> = self
                .additional_options
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            args.push(format!("--additional-properties={}", pairs.join(",")));
        }
        args
    }

    /// Invoke the tool and persist its output.
    ///
    /// Returns `Ok` even when the tool reports a problem; the batch is not
    /// aborted by a failing generator run.
    pub async fn run(&self, sink: &dyn IssueSink) -> crate::Result<()> {
        fs::create_dir_all(&self.output_dir).await?;

        log::info!(
            "invoking {} ({}, OpenAPI {}) for {}",
            self.program,
            self.generator,
            self.openapi_version,
            self.source_file.display()
        );
        let output = Command::new(&self.program)
            .args(self.build_args())
            .output()
            .await
            .map_err(|err| {
                crate::Error::tool(format!("failed to spawn '{}': {err}", self.program))
            })?;

        fs::write(self.output_dir.join(STDOUT_LOG_FILE), &output.stdout).await?;
        fs::write(self.output_dir.join(STDERR_LOG_FILE), &output.stderr).await?;

        if !output.status.success() || !output.stderr.is_empty() {
            sink.report(BuildIssue::new(
                IssueKind::ToolFailure,
                &self.source_file,
                Some(format!(
                    "{}, {} bytes of stderr (see {} in the output folder)",
                    output.status,
                    output.stderr.len(),
                    STDERR_LOG_FILE
                )),
            ));
        } else {
            log::debug!("client generator finished cleanly");
        }
        Ok(())
    }
}
