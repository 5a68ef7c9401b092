//! Sentry integration: `sentry-cli` sourcemap upload and the loader script.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;
use tracing::{debug, info};

use super::{BootstrapInjector, SourcemapUploader, UploadTarget};
use crate::html::{Placement, ScriptTag};
use crate::substitute::{Rule, RuleSet};
use crate::{Error, Result};

static CDN_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://browser\.sentry-cdn\.com.*?\.js").expect("valid regex")
});

/// Runs `sentry-cli sourcemaps inject` then `sentry-cli sourcemaps upload`.
///
/// `inject` rewrites the files on disk to embed a debug id referencing the
/// map; `upload` sends them to the Sentry instance configured for the CLI.
#[derive(Debug, Clone)]
pub struct SentryCliUploader {
    program: PathBuf,
}

impl Default for SentryCliUploader {
    fn default() -> Self {
        Self {
            program: PathBuf::from("sentry-cli"),
        }
    }
}

impl SentryCliUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable instead of `sentry-cli` from `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments for one `sourcemaps` sub-command.
    pub fn command_args(operation: &str, target: &UploadTarget, files: &[PathBuf]) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "sourcemaps".into(),
            operation.into(),
            "-o".into(),
            target.org.as_str().into(),
            "-p".into(),
            target.project.as_str().into(),
            "-r".into(),
            target.release.as_str().into(),
        ];
        args.extend(files.iter().map(|f| f.as_os_str().to_os_string()));
        args
    }

    async fn run(&self, operation: &str, target: &UploadTarget, files: &[PathBuf]) -> Result<()> {
        let args = Self::command_args(operation, target, files);
        debug!(program = %self.program.display(), ?args, "running sentry-cli");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                Error::upload(
                    operation,
                    format!("could not start {}: {e}", self.program.display()),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output.status.code().unwrap_or(-1);
            return Err(Error::upload(
                operation,
                format!("exited with code {code}: {}", stderr.trim()),
            ));
        }

        debug!(stdout = %String::from_utf8_lossy(&output.stdout).trim(), "sentry-cli {operation} done");
        Ok(())
    }
}

#[async_trait]
impl SourcemapUploader for SentryCliUploader {
    fn name(&self) -> &str {
        "sentry-cli"
    }

    async fn upload(&self, target: &UploadTarget, files: &[PathBuf]) -> Result<()> {
        self.run("inject", target, files).await?;
        self.run("upload", target, files).await?;
        info!(release = %target.release, files = files.len(), "uploaded sourcemaps to Sentry");
        Ok(())
    }
}

/// Rewrites the Sentry JS loader for this release.
///
/// Switches to the session-replay bundle, disables replay masking, tags the
/// release and turns off performance tracing.
pub fn loader_rules(release: &str) -> RuleSet {
    RuleSet::new()
        .with(Rule::literal("index.min.js", "index.replay.min.js"))
        .with(Rule::literal(
            ".replayIntegration()",
            ".replayIntegration({maskAllInputs: false, maskAllText: false})",
        ))
        .with(Rule::literal(r#"{"dsn":"#, format!(r#"{{"release": "{release}","dsn":"#)).once())
        .with(
            Rule::regex(r#"("tracesSampleRate"):1"#, "$1:0")
                .expect("valid regex")
                .once(),
        )
}

/// First Sentry CDN script URL in `loader`.
pub fn sentry_cdn_url(loader: &str) -> Option<String> {
    CDN_URL.find(loader).map(|m| m.as_str().to_string())
}

/// Inline Sentry loader placed before the bundle.
#[derive(Debug, Clone)]
pub struct SentryLoader {
    loader_path: PathBuf,
    release: String,
}

impl SentryLoader {
    /// `loader_path` is a saved copy of the project's `js-sdk-loader` script.
    pub fn new(loader_path: impl Into<PathBuf>, release: impl Into<String>) -> Self {
        Self {
            loader_path: loader_path.into(),
            release: release.into(),
        }
    }

    pub fn loader_path(&self) -> &Path {
        &self.loader_path
    }

    /// Loader source after applying [`loader_rules`].
    pub fn render(&self) -> Result<String> {
        let source = std::fs::read_to_string(&self.loader_path)
            .map_err(|e| Error::missing_input(&self.loader_path, e))?;
        Ok(loader_rules(&self.release).apply(&source).trim().to_string())
    }
}

impl BootstrapInjector for SentryLoader {
    fn name(&self) -> &str {
        "sentry-loader"
    }

    fn placement(&self) -> Placement {
        Placement::BeforeBundle
    }

    fn script(&self) -> Result<ScriptTag> {
        Ok(ScriptTag::Classic(self.render()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LOADER: &str = concat!(
        r#"(function(){var u="https://browser.sentry-cdn.com/8.0.0/bundle.tracing.min.js";"#,
        r#"var s="index.min.js";init(Sentry.replayIntegration());"#,
        r#"config({"dsn":"https://key@sentry.example.com/1","tracesSampleRate":1});})();"#,
        "\n"
    );

    fn target() -> UploadTarget {
        UploadTarget {
            org: "sentry".into(),
            project: "glyph-studio".into(),
            release: "1.2.3".into(),
        }
    }

    #[test]
    fn test_command_args() {
        let args = SentryCliUploader::command_args(
            "inject",
            &target(),
            &[PathBuf::from("dist/assets/index-final.js")],
        );
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "sourcemaps",
                "inject",
                "-o",
                "sentry",
                "-p",
                "glyph-studio",
                "-r",
                "1.2.3",
                "dist/assets/index-final.js"
            ]
        );
    }

    #[test]
    fn test_loader_rules() {
        let out = loader_rules("1.2.3").apply(LOADER);
        assert!(out.contains("index.replay.min.js"));
        assert!(out.contains(".replayIntegration({maskAllInputs: false, maskAllText: false})"));
        assert!(out.contains(r#"{"release": "1.2.3","dsn":"#));
        assert!(out.contains(r#""tracesSampleRate":0"#));
    }

    #[test]
    fn test_loader_rules_noop_on_unrelated_text() {
        assert_eq!(loader_rules("1.0.0").apply("console.log(1)"), "console.log(1)");
    }

    #[test]
    fn test_sentry_cdn_url() {
        assert_eq!(
            sentry_cdn_url(LOADER).as_deref(),
            Some("https://browser.sentry-cdn.com/8.0.0/bundle.tracing.min.js")
        );
        assert_eq!(sentry_cdn_url("nothing"), None);
    }

    #[test]
    fn test_loader_script_is_trimmed_classic_tag() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("loader.js");
        std::fs::write(&path, LOADER).unwrap();

        let loader = SentryLoader::new(&path, "1.2.3");
        assert_eq!(loader.placement(), Placement::BeforeBundle);
        match loader.script().unwrap() {
            ScriptTag::Classic(body) => {
                assert!(!body.ends_with('\n'));
                assert!(body.contains("1.2.3"));
            }
            other => panic!("expected classic script, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_loader_file() {
        let loader = SentryLoader::new("/definitely/not/here/loader.js", "1.0.0");
        assert!(matches!(loader.script(), Err(Error::MissingInput { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_cli_reports_upload_error() {
        let uploader = SentryCliUploader::with_program("false");
        let err = uploader.upload(&target(), &[]).await.unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("inject"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_cli_reports_upload_error() {
        let uploader = SentryCliUploader::with_program("/nonexistent/sentry-cli");
        let err = uploader.upload(&target(), &[]).await.unwrap_err();
        assert!(matches!(err, Error::Upload { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_cli_runs_both_steps() {
        let uploader = SentryCliUploader::with_program("true");
        uploader.upload(&target(), &[]).await.unwrap();
    }
}
