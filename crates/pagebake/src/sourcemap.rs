//! Sourcemap chaining across two transformation stages.
//!
//! The minifier only knows positions in the code it was handed. When that code
//! came from a bundler with its own sourcemap, each minified mapping is
//! resolved through the bundler's map so the final map points at the original
//! sources.

use oxc_sourcemap::{SourceMap, SourceMapBuilder};
use rustc_hash::FxHashMap;

use crate::{Error, Result};

/// Parse a sourcemap JSON document.
pub fn parse(module: &str, json: &str) -> Result<SourceMap> {
    SourceMap::from_json_string(json).map_err(|e| Error::InvalidSourceMap {
        module: module.to_string(),
        reason: e.to_string(),
    })
}

/// One module's line range inside the concatenated minifier input.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Segment<'a> {
    pub name: &'a str,
    pub content: &'a str,
    /// First line of the module in the concatenated input (0-based)
    pub start_line: u32,
    /// One past the last line
    pub end_line: u32,
    /// Sourcemap of the stage that produced `content`
    pub input: Option<&'a SourceMap>,
}

/// Rewrite `generated` so every token points at original positions.
///
/// Tokens that fall outside every segment, or that the input map has no
/// mapping for, are dropped.
pub(crate) fn compose(generated: &SourceMap, segments: &[Segment<'_>], file: Option<&str>) -> SourceMap {
    let mut builder = SourceMapBuilder::default();
    if let Some(file) = file {
        builder.set_file(file);
    }

    let tables: Vec<_> = segments
        .iter()
        .map(|s| s.input.map(SourceMap::generate_lookup_table))
        .collect();

    let mut sources: FxHashMap<String, u32> = FxHashMap::default();
    let mut names: FxHashMap<String, u32> = FxHashMap::default();

    for token in generated.get_tokens() {
        if token.get_source_id().is_none() {
            continue;
        }
        let line = token.get_src_line();
        let Some(index) = segments
            .iter()
            .position(|s| line >= s.start_line && line < s.end_line)
        else {
            continue;
        };
        let segment = &segments[index];
        let local_line = line - segment.start_line;
        let generated_name = token
            .get_name_id()
            .and_then(|id| generated.get_name(id))
            .map(|n| n.to_string());

        let (source, content, src_line, src_col, name) = match (segment.input, &tables[index]) {
            (Some(input), Some(table)) => {
                let Some(original) = input.lookup_token(table, local_line, token.get_src_col())
                else {
                    continue;
                };
                let Some(source_id) = original.get_source_id() else {
                    continue;
                };
                let source = input
                    .get_source(source_id)
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                let content = input
                    .get_source_content(source_id)
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                let name = original
                    .get_name_id()
                    .and_then(|id| input.get_name(id))
                    .map(|n| n.to_string())
                    .or(generated_name);
                (
                    source,
                    content,
                    original.get_src_line(),
                    original.get_src_col(),
                    name,
                )
            }
            _ => (
                segment.name.to_string(),
                segment.content.to_string(),
                local_line,
                token.get_src_col(),
                generated_name,
            ),
        };

        let src_id = match sources.get(&source) {
            Some(id) => *id,
            None => {
                let id = builder.add_source_and_content(&source, &content);
                sources.insert(source, id);
                id
            }
        };
        let name_id = name.map(|name| match names.get(&name) {
            Some(id) => *id,
            None => {
                let id = builder.add_name(&name);
                names.insert(name, id);
                id
            }
        });

        builder.add_token(
            token.get_dst_line(),
            token.get_dst_col(),
            src_line,
            src_col,
            Some(src_id),
            name_id,
        );
    }

    builder.into_sourcemap()
}
