//! Composition of the final single-file HTML page.
//!
//! The composer runs three substitution rules over the template, in order:
//!
//! 1. remove every newline together with the indentation that follows it
//! 2. insert the stylesheet as `<style>` right after `</title>`
//! 3. replace the bundler's `<script src=…></script>` tag with the inline
//!    script fragments
//!
//! Step 1 produces a single-line document. External sourcemap tooling patches
//! the page by text offset and breaks on multi-line HTML.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::artifact::strip_sourcemap_comment;
use crate::substitute::{Rule, RuleSet, verbatim};

static LINE_BREAK_INDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r?\n[ \t]*)+").expect("valid regex"));

static BUNDLER_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<script\b[^>]*?\ssrc\s*=[^>]*>\s*</script>").expect("valid regex")
});

const STYLE_ANCHOR: &str = "</title>";

/// A `<script>` fragment for the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptTag {
    /// `<script type=module>…</script>`
    Module(String),
    /// `<script>…</script>`
    Classic(String),
    /// `<script attrs… src="…"></script>`
    External {
        src: String,
        /// Attributes rendered before `src`; `None` renders a bare attribute
        attrs: Vec<(String, Option<String>)>,
    },
}

impl ScriptTag {
    pub fn external(src: impl Into<String>) -> Self {
        Self::External {
            src: src.into(),
            attrs: Vec::new(),
        }
    }

    /// Add an attribute to an external tag. Inline tags are returned unchanged.
    pub fn attr(mut self, name: impl Into<String>, value: Option<String>) -> Self {
        if let Self::External { attrs, .. } = &mut self {
            attrs.push((name.into(), value));
        }
        self
    }
}

impl fmt::Display for ScriptTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(body) => write!(f, "<script type=module>{body}</script>"),
            Self::Classic(body) => write!(f, "<script>{body}</script>"),
            Self::External { src, attrs } => {
                f.write_str("<script")?;
                for (name, value) in attrs {
                    match value {
                        Some(value) => write!(f, " {name}=\"{value}\"")?,
                        None => write!(f, " {name}")?,
                    }
                }
                write!(f, " src=\"{src}\"></script>")
            }
        }
    }
}

/// Where an extra fragment goes relative to the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    BeforeBundle,
    AfterBundle,
}

/// Removes line breaks and the indentation after them.
pub fn collapse_whitespace_rule() -> Rule {
    Rule::from_regex(LINE_BREAK_INDENT.clone(), verbatim(""))
}

/// Inserts `css` as a `<style>` block right after the first `</title>`.
pub fn inline_style_rule(css: &str) -> Rule {
    let replacement = format!("{STYLE_ANCHOR}<style>{css}</style>");
    Rule::literal_with(STYLE_ANCHOR, move |_| replacement.clone()).once()
}

/// Replaces the first bundler-emitted `<script src>` tag with `scripts`.
pub fn inline_scripts_rule(scripts: &[ScriptTag]) -> Rule {
    let joined: String = scripts.iter().map(ToString::to_string).collect();
    Rule::from_regex(BUNDLER_SCRIPT.clone(), verbatim(joined)).once()
}

/// Builds the final page from the template, stylesheet and bundle.
#[derive(Debug, Clone)]
pub struct HtmlComposer {
    collapse_whitespace: bool,
    before: Vec<ScriptTag>,
    after: Vec<ScriptTag>,
}

impl Default for HtmlComposer {
    fn default() -> Self {
        Self {
            collapse_whitespace: true,
            before: Vec::new(),
            after: Vec::new(),
        }
    }
}

impl HtmlComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn whitespace collapsing on or off (on by default).
    pub fn collapse_whitespace(mut self, enabled: bool) -> Self {
        self.collapse_whitespace = enabled;
        self
    }

    /// Add an extra script fragment. Fragments keep insertion order.
    pub fn script(mut self, placement: Placement, tag: ScriptTag) -> Self {
        match placement {
            Placement::BeforeBundle => self.before.push(tag),
            Placement::AfterBundle => self.after.push(tag),
        }
        self
    }

    /// All script fragments for `final_js`, in page order.
    pub fn scripts(&self, final_js: &str) -> Vec<ScriptTag> {
        let mut scripts = self.before.clone();
        scripts.push(ScriptTag::Module(strip_sourcemap_comment(final_js)));
        scripts.extend(self.after.iter().cloned());
        scripts
    }

    /// The rules applied to the template.
    pub fn rules(&self, css: &str, final_js: &str) -> RuleSet {
        let mut rules = RuleSet::new();
        if self.collapse_whitespace {
            rules.push(collapse_whitespace_rule());
        }
        rules.push(inline_style_rule(css));
        rules.push(inline_scripts_rule(&self.scripts(final_js)));
        rules
    }

    /// Compose the page.
    pub fn compose(&self, template: &str, css: &str, final_js: &str) -> String {
        self.rules(css, final_js).apply(template)
    }
}

/// Compose a page with only the bundle inlined.
pub fn compose(template: &str, css: &str, final_js: &str) -> String {
    HtmlComposer::default().compose(template, css, final_js)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_collapse_whitespace_rule() {
        let rule = collapse_whitespace_rule();
        assert_eq!(
            rule.apply("<html>\n  <head>\n\n    <title>T</title>\n</head>"),
            "<html><head><title>T</title></head>"
        );
        assert_eq!(rule.apply("a\r\n\tb"), "ab");
    }

    #[test]
    fn test_collapse_keeps_inline_spaces() {
        let rule = collapse_whitespace_rule();
        assert_eq!(rule.apply("<p>two  words</p>"), "<p>two  words</p>");
    }

    #[test]
    fn test_inline_style_rule() {
        let rule = inline_style_rule("body{color:red}");
        assert_eq!(
            rule.apply("<title>T</title><body></body>"),
            "<title>T</title><style>body{color:red}</style><body></body>"
        );
    }

    #[test]
    fn test_inline_style_without_title_is_noop() {
        let rule = inline_style_rule("body{}");
        assert_eq!(rule.apply("<head></head>"), "<head></head>");
    }

    #[test]
    fn test_inline_style_keeps_dollar_signs() {
        let rule = inline_style_rule(".a::after{content:\"$1\"}");
        assert_eq!(
            rule.apply("<title></title>"),
            "<title></title><style>.a::after{content:\"$1\"}</style>"
        );
    }

    #[test]
    fn test_inline_scripts_rule() {
        let rule = inline_scripts_rule(&[ScriptTag::Module("a()".to_string())]);
        assert_eq!(
            rule.apply("<body><script src=x.js></script></body>"),
            "<body><script type=module>a()</script></body>"
        );
    }

    #[test]
    fn test_inline_scripts_rule_matches_vite_tag() {
        let rule = inline_scripts_rule(&[ScriptTag::Module("a()".to_string())]);
        assert_eq!(
            rule.apply(
                r#"<script type="module" crossorigin src="/assets/index.js"></script><script>keep()</script>"#
            ),
            "<script type=module>a()</script><script>keep()</script>"
        );
    }

    #[test]
    fn test_inline_scripts_rule_leaves_inline_scripts() {
        let rule = inline_scripts_rule(&[ScriptTag::Module("a()".to_string())]);
        assert_eq!(rule.apply("<script>x()</script>"), "<script>x()</script>");
    }

    #[test]
    fn test_inline_scripts_rule_skips_data_src() {
        let rule = inline_scripts_rule(&[ScriptTag::Module("a()".to_string())]);
        assert_eq!(
            rule.apply("<script data-src=x></script><script src=x.js></script>"),
            "<script data-src=x></script><script type=module>a()</script>"
        );
    }

    #[test]
    fn test_script_tag_rendering() {
        assert_eq!(
            ScriptTag::Module("a()".into()).to_string(),
            "<script type=module>a()</script>"
        );
        assert_eq!(
            ScriptTag::Classic("b()".into()).to_string(),
            "<script>b()</script>"
        );
        assert_eq!(
            ScriptTag::external("https://a9s.example.com/js/script.js")
                .attr("defer", None)
                .attr("data-domain", Some("example.com".into()))
                .to_string(),
            r#"<script defer data-domain="example.com" src="https://a9s.example.com/js/script.js"></script>"#
        );
    }

    #[test]
    fn test_end_to_end_scenario() {
        let html = compose(
            "<title>T</title><script src=x.js></script>",
            "body{color:red}",
            "console.log(1)\n//# sourceMappingURL=index-final.js.map",
        );
        assert_eq!(
            html,
            "<title>T</title><style>body{color:red}</style><script type=module>console.log(1)</script>"
        );
    }

    #[test]
    fn test_fragments_keep_order() {
        let composer = HtmlComposer::new()
            .script(Placement::AfterBundle, ScriptTag::external("after.js"))
            .script(Placement::BeforeBundle, ScriptTag::Classic("first()".into()))
            .script(Placement::BeforeBundle, ScriptTag::Classic("second()".into()));

        let html = composer.compose("<title></title><script src=x.js></script>", "", "main()");
        assert_eq!(
            html,
            concat!(
                "<title></title><style></style>",
                "<script>first()</script><script>second()</script>",
                "<script type=module>main()</script>",
                r#"<script src="after.js"></script>"#
            )
        );
    }

    #[test]
    fn test_collapse_can_be_disabled() {
        let html = HtmlComposer::new()
            .collapse_whitespace(false)
            .compose("<title></title>\n  <script src=x.js></script>", "", "a()");
        assert_eq!(html, "<title></title><style></style>\n  <script type=module>a()</script>");
    }

    #[test]
    fn test_whitespace_runs_before_injection() {
        let html = compose(
            "<head>\n  <title></title>\n</head>\n<script src=x.js></script>",
            "a{}\n  b{}",
            "x()",
        );
        assert!(html.contains("<style>a{}\n  b{}</style>"));
        assert!(html.starts_with("<head><title></title>"));
    }

    proptest! {
        #[test]
        fn prop_output_has_no_line_breaks(
            lines in prop::collection::vec("[ \t]{0,6}<[a-z]{1,6}>[a-z ]{0,12}", 0..12),
            css in "[a-z{}:;]{0,20}",
            js in "[a-z();]{0,20}",
        ) {
            let mut template = lines.join("\n");
            template.push_str("\n  <title>x</title>\n    <script src=app.js></script>\n");
            let html = compose(&template, &css, &js);
            prop_assert!(!html.contains('\n'));
        }

        #[test]
        fn prop_compose_is_idempotent_for_same_inputs(
            lines in prop::collection::vec("[ ]{0,4}<[a-z]{1,4}>", 0..8),
            css in "[a-z{}]{0,10}",
        ) {
            let template = format!("{}\n<title>t</title><script src=a.js></script>", lines.join("\n"));
            prop_assert_eq!(compose(&template, &css, "a()"), compose(&template, &css, "a()"));
        }
    }
}
