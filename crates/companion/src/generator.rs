//! Text generation by an external command.

use std::time::Duration;

use async_trait::async_trait;
use companion_core::error::{Error, Result};
use companion_core::TextGenerator;
use tokio::process::Command;
use tracing::debug;

use crate::config::GeneratorConfig;

/// Runs `command args... <question>` and returns its stdout.
pub struct ProcessGenerator {
    command: Option<String>,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessGenerator {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[async_trait]
impl TextGenerator for ProcessGenerator {
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let Some(command) = &self.command else {
            return Err(Error::external("no generator command configured"));
        };

        debug!(command = %command, "Running generator");
        let run = Command::new(command)
            .args(&self.args)
            .arg(prompt)
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| Error::external(format!("{} timed out", command)))?
            .map_err(|e| Error::external(format!("Failed to execute {}: {}", command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::external(format!("{} failed: {}", command, stderr.trim())));
        }

        let answer = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        Ok((!answer.is_empty()).then_some(answer))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use companion_core::ErrorKind;

    fn generator(command: Option<&str>, args: &[&str]) -> ProcessGenerator {
        ProcessGenerator::new(&GeneratorConfig {
            command: command.map(String::from),
            args: args.iter().map(|s| s.to_string()).collect(),
            timeout_secs: 10,
        })
    }

    #[tokio::test]
    async fn test_echo_answer() {
        let answer = generator(Some("echo"), &["answer:"])
            .generate("What is ISEN?")
            .await
            .unwrap();
        assert_eq!(answer.as_deref(), Some("answer: What is ISEN?"));
    }

    #[tokio::test]
    async fn test_empty_output_is_none() {
        let answer = generator(Some("true"), &[]).generate("anything").await.unwrap();
        assert!(answer.is_none());
    }

    #[tokio::test]
    async fn test_failure_is_external_error() {
        let err = generator(Some("false"), &[]).generate("anything").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExternalCallFailure);

        let err = generator(None, &[]).generate("anything").await.unwrap_err();
        assert!(err.to_string().contains("no generator command"));
    }
}
