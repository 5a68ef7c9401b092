//! Shared fixtures for pagebake-cli tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

pub const TEMPLATE: &str = "<!DOCTYPE html>\n<html>\n  <head>\n    <title>Glyph Studio</title>\n    <script type=\"module\" crossorigin src=\"/assets/index.js\"></script>\n  </head>\n  <body>\n    <div id=\"app\"></div>\n  </body>\n</html>\n";

pub const BUNDLE: &str = "function greet(name) {\n  return \"Hello, \" + name;\n}\nif (window.__DEBUG__) {\n  console.log(\"debug build\");\n}\ndocument.title = greet(\"glyphs\");\n";

/// Identity sourcemap for [`BUNDLE`], one mapping per line.
pub const BUNDLE_MAP: &str = r#"{"version":3,"file":"index.js","sources":["src/main.js"],"sourcesContent":["// src/main.js\n"],"names":[],"mappings":"AAAA;AACA;AACA;AACA;AACA;AACA;AACA"}"#;

pub const STYLESHEET: &str = "body{margin:0}";

pub fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "index.html", TEMPLATE);
    write(dir.path(), "dist/assets/index.js", BUNDLE);
    write(dir.path(), "dist/assets/index.js.map", BUNDLE_MAP);
    write(dir.path(), "dist/assets/index.css", STYLESHEET);
    write(
        dir.path(),
        "package.json",
        r#"{"name": "glyph-studio", "version": "0.3.1", "config": {"domain": "glyphs.example.com"}}"#,
    );
    dir
}

pub fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

pub fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}
