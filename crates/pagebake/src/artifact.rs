//! Writing the final bundle and its sourcemap.
//!
//! The bundle gets a trailing `//# sourceMappingURL=` comment naming its
//! sibling map. Files are overwritten in full; a failed write aborts the run.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use path_clean::PathClean;
use regex::Regex;
use tracing::debug;

use crate::{Error, Result};

static SOURCEMAP_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\A|\n)//# sourceMappingURL=[^\n]*\s*\z").expect("valid regex"));

/// Output locations of the final bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// `<dir>/<stem>-final.js`
    pub js: PathBuf,
    /// `<dir>/<stem>-final.js.map`
    pub map: PathBuf,
}

impl ArtifactPaths {
    /// Derive the final paths from the bundler's entry file name.
    ///
    /// ```
    /// use pagebake::artifact::ArtifactPaths;
    /// use std::path::Path;
    ///
    /// let paths = ArtifactPaths::for_entry(Path::new("dist/assets"), "index.js");
    /// assert!(paths.js.ends_with("index-final.js"));
    /// assert!(paths.map.ends_with("index-final.js.map"));
    /// ```
    pub fn for_entry(dir: &Path, entry: &str) -> Self {
        let stem = Path::new(entry)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(entry);
        let js_name = format!("{stem}-final.js");
        let map_name = format!("{js_name}.map");
        let dir = dir.clean();
        Self {
            js: dir.join(js_name),
            map: dir.join(map_name),
        }
    }

    /// File name of the sourcemap, as referenced from the bundle.
    pub fn map_file_name(&self) -> String {
        file_name(&self.map)
    }

    /// File name of the bundle.
    pub fn js_file_name(&self) -> String {
        file_name(&self.js)
    }

    /// Both artifact paths, bundle first.
    pub fn files(&self) -> [&Path; 2] {
        [&self.js, &self.map]
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Trailing comment linking a bundle to its map.
pub fn sourcemap_comment(map_file_name: &str) -> String {
    format!("//# sourceMappingURL={map_file_name}")
}

/// Append the sourcemap comment to `code`.
pub fn with_sourcemap_comment(code: &str, map_file_name: &str) -> String {
    format!("{code}\n{}", sourcemap_comment(map_file_name))
}

/// Remove the trailing `//# sourceMappingURL=` line and trim the result.
///
/// Only a comment on the last line counts; the same text inside the code is
/// left alone.
pub fn strip_sourcemap_comment(js: &str) -> String {
    SOURCEMAP_COMMENT.replace(js, "").trim().to_string()
}

/// Write the bundle (with its sourcemap comment) and the map.
///
/// Returns the bundle text as written.
///
/// # Errors
///
/// Returns [`Error::Write`] if a directory cannot be created or a file cannot
/// be written.
pub fn write_artifacts(code: &str, map: &str, paths: &ArtifactPaths) -> Result<String> {
    let js = with_sourcemap_comment(code, &paths.map_file_name());
    write_file(&paths.js, &js)?;
    write_file(&paths.map, map)?;
    debug!(
        js = %paths.js.display(),
        map = %paths.map.display(),
        js_bytes = js.len(),
        map_bytes = map.len(),
        "wrote artifacts"
    );
    Ok(js)
}

/// Overwrite `path` with `contents`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| Error::write(path, e))
}
