//! Sourcemap chaining through the bundler's map.

mod helpers;

use helpers::{ORIGINAL_OFFSET, ORIGINAL_SOURCE, Project};
use pagebake::{MinifyOptions, Pipeline, SourceMap, SourceModule, minify};

fn sources(map: &SourceMap) -> Vec<String> {
    map.get_sources().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_final_map_points_at_original_sources() {
    let project = Project::new();

    Pipeline::new(project.config()).run().await.unwrap();

    let map = SourceMap::from_json_string(&project.read("dist/assets/index-final.js.map")).unwrap();
    assert_eq!(sources(&map), vec!["src/main.js".to_string()]);
    assert_eq!(
        map.get_source_content(0).map(|c| c.to_string()),
        Some(ORIGINAL_SOURCE.to_string())
    );
    assert_eq!(map.get_file().map(|f| f.to_string()), Some("index-final.js".to_string()));
}

#[test]
fn test_function_maps_to_original_line() {
    let project = Project::new();
    let bundle = project.read("dist/assets/index.js");
    let bundler_map = project.read("dist/assets/index.js.map");

    let output = minify(
        &[SourceModule::new("index-final.js", bundle).with_input_map(bundler_map)],
        &MinifyOptions::default(),
    )
    .unwrap();

    // `greet` is declared on bundle line 0, which maps to original line 10.
    let lines: Vec<u32> = output.map.get_tokens().map(|t| t.get_src_line()).collect();
    assert!(!lines.is_empty());
    assert!(lines.contains(&ORIGINAL_OFFSET));
    assert!(lines.iter().all(|line| *line >= ORIGINAL_OFFSET));
}

#[test]
fn test_module_without_input_map_maps_to_itself() {
    let output = minify(
        &[SourceModule::new("main.js", "export function add(a, b) {\n  return a + b;\n}\n")],
        &MinifyOptions::default(),
    )
    .unwrap();

    assert_eq!(sources(&output.map), vec!["main.js".to_string()]);
    assert!(output.map.get_tokens().all(|t| t.get_src_line() <= 2));
}

#[test]
fn test_two_modules_keep_separate_sources() {
    let output = minify(
        &[
            SourceModule::new("a.js", "export const a = 1;"),
            SourceModule::new("b.js", "export const b = 2;"),
        ],
        &MinifyOptions::default(),
    )
    .unwrap();

    let mut names = sources(&output.map);
    names.sort();
    assert_eq!(names, vec!["a.js".to_string(), "b.js".to_string()]);
}
