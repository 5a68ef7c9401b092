//! JavaScript minification with sourcemap chaining.
//!
//! Wraps the oxc minifier with a configuration callers cannot loosen:
//!
//! - input is parsed as an ES module
//! - module-scope bindings are mangled, exports keep their names
//! - only the minifier's standard compression set runs
//! - comments are dropped from the output
//! - the debug define is folded to `false` before compression, so debug-only
//!   branches are removed
//!
//! Each module may carry the sourcemap of the stage that produced it. The
//! returned map then resolves minified positions straight back to those
//! original sources.

use std::path::PathBuf;

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_sourcemap::SourceMap;
use oxc_span::SourceType;
use oxc_transformer_plugins::{ReplaceGlobalDefines, ReplaceGlobalDefinesConfig};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::sourcemap::{self, Segment};
use crate::{Error, Result};

/// Global expression folded to `false` unless configured otherwise.
pub const DEFAULT_DEBUG_DEFINE: &str = "window.__DEBUG__";

/// Placeholder source name used while the modules are minified as one program.
const COMBINED_SOURCE: &str = "<modules>";

/// A named module handed to the minifier.
#[derive(Debug, Clone)]
pub struct SourceModule {
    /// Emitted filename, used as the module's `sources` entry
    pub name: String,
    /// Module source code
    pub code: String,
    /// Sourcemap JSON of the stage that produced `code`
    pub input_map: Option<String>,
}

impl SourceModule {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            input_map: None,
        }
    }

    /// Chain the output map through `map`.
    pub fn with_input_map(mut self, map: impl Into<String>) -> Self {
        self.input_map = Some(map.into());
        self
    }
}

/// Caller-adjustable minifier settings.
///
/// Only the define expression and the map's `file` field are configurable.
#[derive(Debug, Clone)]
pub struct MinifyOptions {
    /// Global expression replaced by `false`
    pub debug_define: String,
    /// Value of the output map's `file` field
    pub output_file: Option<String>,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            debug_define: DEFAULT_DEBUG_DEFINE.to_string(),
            output_file: None,
        }
    }
}

impl MinifyOptions {
    pub fn debug_define(mut self, expression: impl Into<String>) -> Self {
        self.debug_define = expression.into();
        self
    }

    pub fn output_file(mut self, file: impl Into<String>) -> Self {
        self.output_file = Some(file.into());
        self
    }
}

/// Minified code and its final sourcemap.
#[derive(Debug, Clone)]
pub struct MinifyOutput {
    pub code: String,
    pub map: SourceMap,
}

impl MinifyOutput {
    /// Sourcemap as JSON.
    pub fn map_json(&self) -> String {
        self.map.to_json_string()
    }
}

/// Minify `modules` as a single ES module program.
///
/// Modules are concatenated in order, one newline apart.
///
/// # Errors
///
/// - [`Error::InvalidModules`] for an empty set or duplicate names
/// - [`Error::InvalidSourceMap`] if an input map cannot be parsed
/// - [`Error::InvalidDefine`] if the debug define is not a valid expression
/// - [`Error::Parse`] if the code does not parse
pub fn minify(modules: &[SourceModule], options: &MinifyOptions) -> Result<MinifyOutput> {
    validate_modules(modules)?;

    let input_maps = modules
        .iter()
        .map(|m| {
            m.input_map
                .as_deref()
                .map(|json| sourcemap::parse(&m.name, json))
                .transpose()
        })
        .collect::<Result<Vec<_>>>()?;

    let mut combined = String::new();
    let mut ranges = Vec::with_capacity(modules.len());
    let mut line = 0u32;
    for (index, module) in modules.iter().enumerate() {
        if index > 0 {
            combined.push('\n');
        }
        combined.push_str(&module.code);
        let lines = module.code.matches('\n').count() as u32 + 1;
        ranges.push((line, line + lines));
        line += lines;
    }

    let label = if modules.len() == 1 {
        modules[0].name.as_str()
    } else {
        COMBINED_SOURCE
    };
    let generated = minify_program(label, &combined, &options.debug_define)?;

    let segments: Vec<Segment<'_>> = modules
        .iter()
        .zip(&ranges)
        .zip(&input_maps)
        .map(|((module, (start_line, end_line)), input)| Segment {
            name: &module.name,
            content: &module.code,
            start_line: *start_line,
            end_line: *end_line,
            input: input.as_ref(),
        })
        .collect();

    let map = match generated.map {
        Some(ref raw) => sourcemap::compose(raw, &segments, options.output_file.as_deref()),
        None => oxc_sourcemap::SourceMapBuilder::default().into_sourcemap(),
    };

    debug!(
        modules = modules.len(),
        input_bytes = combined.len(),
        output_bytes = generated.code.len(),
        "minified"
    );

    Ok(MinifyOutput {
        code: generated.code,
        map,
    })
}

/// Minify a standalone script, discarding the sourcemap.
pub fn minify_code(name: &str, code: &str, debug_define: &str) -> Result<String> {
    Ok(minify_program(name, code, debug_define)?.code)
}

struct Generated {
    code: String,
    map: Option<SourceMap>,
}

fn minify_program(label: &str, source: &str, debug_define: &str) -> Result<Generated> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if parsed.panicked || !parsed.errors.is_empty() {
        return Err(Error::Parse {
            module: label.to_string(),
            errors: parsed.errors.iter().map(|e| e.to_string()).collect(),
        });
    }
    let mut program = parsed.program;

    let defines = ReplaceGlobalDefinesConfig::new(&[(debug_define, "false")]).map_err(|errors| {
        Error::InvalidDefine {
            expression: debug_define.to_string(),
            reason: errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        }
    })?;
    let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
    // The minifier rebuilds scoping, so the returned one is not needed.
    let _ = ReplaceGlobalDefines::new(&allocator, defines).build(scoping, &mut program);

    let minified = Minifier::new(minifier_options()).minify(&allocator, &mut program);

    let codegen_options = CodegenOptions {
        source_map_path: Some(PathBuf::from(label)),
        ..CodegenOptions::minify()
    };
    let output = Codegen::new()
        .with_options(codegen_options)
        .with_scoping(minified.scoping)
        .build(&program);

    Ok(Generated {
        code: output.code,
        map: output.map,
    })
}

/// The fixed minifier configuration.
fn minifier_options() -> MinifierOptions {
    MinifierOptions {
        mangle: Some(MangleOptions {
            top_level: true,
            ..MangleOptions::default()
        }),
        compress: Some(CompressOptions::smallest()),
    }
}

fn validate_modules(modules: &[SourceModule]) -> Result<()> {
    if modules.is_empty() {
        return Err(Error::InvalidModules(
            "at least one module is required".to_string(),
        ));
    }
    let mut seen = FxHashSet::default();
    for module in modules {
        if module.name.is_empty() {
            return Err(Error::InvalidModules("module names cannot be empty".to_string()));
        }
        if !seen.insert(module.name.as_str()) {
            return Err(Error::InvalidModules(format!(
                "duplicate module name '{}'",
                module.name
            )));
        }
    }
    Ok(())
}
