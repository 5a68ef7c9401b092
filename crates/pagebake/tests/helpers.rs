//! Shared test utilities for pagebake integration tests
//!
//! Builds a throwaway project that looks like a finished Vite build.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use oxc_sourcemap::SourceMapBuilder;
use pagebake::{Error, PipelineConfig, Result, SourcemapUploader, UploadTarget};
use tempfile::TempDir;

pub const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>Glyph Studio</title>
    <script type="module" crossorigin src="/assets/index.js"></script>
  </head>
  <body>
    <div id="app"></div>
  </body>
</html>
"#;

pub const STYLESHEET: &str = "body{margin:0;font-family:sans-serif}";

/// Bundled entry as a bundler would emit it.
pub const BUNDLE: &str = r#"function greet(name) {
  return "Hello, " + name;
}
if (window.__DEBUG__) {
  console.log("debug build");
}
document.getElementById("app").textContent = greet("glyphs");
export { greet };
//# sourceMappingURL=index.js.map
"#;

/// Original source the bundle was produced from.
pub const ORIGINAL_SOURCE: &str = "// src/main.js\n";

/// Original line of `greet`'s declaration.
pub const ORIGINAL_OFFSET: u32 = 10;

/// Bundler sourcemap: bundle line `n` comes from `src/main.js` line `n + 10`.
pub fn bundler_map() -> String {
    let mut builder = SourceMapBuilder::default();
    builder.set_file("index.js");
    let id = builder.add_source_and_content("src/main.js", ORIGINAL_SOURCE);
    let lines = BUNDLE.lines().count() as u32;
    for line in 0..lines {
        builder.add_token(line, 0, line + ORIGINAL_OFFSET, 0, Some(id), None);
    }
    builder.into_sourcemap().to_json_string()
}

/// A project directory holding template, bundle, map and stylesheet.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let project = Self {
            dir: TempDir::new().unwrap(),
        };
        project.write("index.html", TEMPLATE);
        project.write("dist/assets/index.js", BUNDLE);
        project.write("dist/assets/index.js.map", &bundler_map());
        project.write("dist/assets/index.css", STYLESHEET);
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root().join(relative)).unwrap()
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.root().join(relative).exists()
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.root().join(relative)).unwrap();
    }

    /// Config with a fixed timestamp so runs are comparable.
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig::new(self.root()).timestamp_ms(1_700_000_000_000)
    }
}

pub fn upload_target() -> UploadTarget {
    UploadTarget {
        org: "sentry".into(),
        project: "glyph-studio".into(),
        release: "0.3.1".into(),
    }
}

/// Uploader that records its calls and optionally fails.
#[derive(Clone, Default)]
pub struct RecordingUploader {
    pub calls: Arc<Mutex<Vec<Vec<String>>>>,
    pub fail: bool,
}

impl RecordingUploader {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SourcemapUploader for RecordingUploader {
    fn name(&self) -> &str {
        "recording"
    }

    async fn upload(&self, _target: &UploadTarget, files: &[std::path::PathBuf]) -> Result<()> {
        let names = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        self.calls.lock().unwrap().push(names);
        if self.fail {
            return Err(Error::upload("upload", "connection refused"));
        }
        Ok(())
    }
}

/// Rewrites the bundle on disk the way `sentry-cli sourcemaps inject` does,
/// and records whether the page was already written.
#[derive(Debug, Clone, Default)]
pub struct InjectingUploader {
    pub saw_page: Arc<Mutex<Option<bool>>>,
}

#[async_trait]
impl SourcemapUploader for InjectingUploader {
    fn name(&self) -> &str {
        "injecting"
    }

    async fn upload(&self, _target: &UploadTarget, files: &[std::path::PathBuf]) -> Result<()> {
        let js = &files[0];
        let page = js.parent().unwrap().parent().unwrap().join("index.html");
        *self.saw_page.lock().unwrap() = Some(page.exists());

        let injected = format!("{RELEASE_SNIPPET}{}", fs::read_to_string(js).unwrap());
        fs::write(js, injected).unwrap();
        Ok(())
    }
}

pub const RELEASE_SNIPPET: &str = "!function(){window.SENTRY_RELEASE={id:\"glyphs@1.2.0\"}}();";
