use crate::core::{interfaces::Minifier, models::MinifyOptions};
use crate::utils::{Result, TsumuError};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier as OxcCoreMinifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use regex::Regex;

/// JavaScript minification using oxc
pub struct OxcMinifier;

impl OxcMinifier {
    pub fn new() -> Self {
        Self
    }

    /// Minify JavaScript code with the supplied options
    pub fn minify_sync(
        &self,
        source_code: &str,
        filename: &str,
        options: &MinifyOptions,
    ) -> Result<String> {
        // Pure-function calls in statement position are dead code
        let source = drop_pure_calls(source_code, &options.pure_funcs);

        let allocator = Allocator::default();
        let source_type =
            SourceType::from_path(filename).unwrap_or_else(|_| SourceType::default());

        // Parse the source code
        let parser = Parser::new(&allocator, &source, source_type);
        let parse_result = parser.parse();

        if !parse_result.errors.is_empty() {
            let errors: Vec<String> = parse_result
                .errors
                .iter()
                .map(|e| format!("Parse error: {}", e))
                .collect();
            return Err(TsumuError::minify(errors.join("\n")));
        }

        // Minify the AST; toplevel selects whole-program symbol mangling
        let minifier_options = MinifierOptions {
            mangle: Some(MangleOptions {
                top_level: options.toplevel,
                ..Default::default()
            }),
            compress: Some(CompressOptions::default()),
        };
        let mut program = parse_result.program;
        let minifier = OxcCoreMinifier::new(minifier_options);
        let minifier_return = minifier.minify(&allocator, &mut program);

        // Generate minified code; the minifier's scoping carries the
        // mangled symbol table into codegen
        let codegen_options = CodegenOptions {
            minify: true,
            ..Default::default()
        };

        let minified = Codegen::new()
            .with_options(codegen_options)
            .with_scoping(minifier_return.scoping)
            .build(&program)
            .code;

        if options.ascii_only {
            Ok(escape_non_ascii(&minified))
        } else {
            Ok(minified)
        }
    }
}

#[async_trait::async_trait]
impl Minifier for OxcMinifier {
    async fn minify(
        &self,
        code: &str,
        filename: &str,
        options: &MinifyOptions,
    ) -> Result<String> {
        let code = code.to_string();
        let filename = filename.to_string();
        let options = options.clone();

        // oxc is CPU-intensive; keep it off the async executor
        tokio::task::spawn_blocking(move || {
            OxcMinifier::new().minify_sync(&code, &filename, &options)
        })
            .await
            .map_err(|e| TsumuError::minify(format!("Minification task failed: {}", e)))?
    }
}

impl Default for OxcMinifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove statement-position calls to functions declared side-effect-free
fn drop_pure_calls(source: &str, pure_funcs: &[String]) -> String {
    if pure_funcs.is_empty() {
        return source.to_string();
    }

    let names = pure_funcs
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    // Whole-line bare call with no use of the return value
    let pattern = Regex::new(&format!(r"^\s*(?:{})\([^)]*\);?\s*$", names))
        .expect("pure_funcs pattern is valid");

    source
        .lines()
        .filter(|line| !pattern.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape every non-ASCII character as a \uXXXX sequence
fn escape_non_ascii(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut buf = [0u16; 2];
    for ch in code.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            for unit in ch.encode_utf16(&mut buf) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_minification() {
        let minifier = OxcMinifier::new();
        let source = r#"
            function hello(name) {
                const message = "Hello, " + name;
                console.log(message);
                return message;
            }
            hello("tsumu");
        "#;

        let result = minifier.minify_sync(source, "test.js", &MinifyOptions::default());
        assert!(result.is_ok());

        let minified = result.unwrap();
        assert!(minified.len() < source.len());
    }

    #[test]
    fn test_toplevel_mangling_reaches_output() {
        let minifier = OxcMinifier::new();
        let source =
            "function veryLongTopLevelHelper(x) { return x + 1; }\nglobalThis.out = veryLongTopLevelHelper(2);";
        let options = MinifyOptions {
            toplevel: true,
            ascii_only: false,
            pure_funcs: Vec::new(),
        };

        let minified = minifier.minify_sync(source, "test.min.js", &options).unwrap();

        // Top-level symbols must come out renamed, not just re-printed
        assert!(!minified.contains("veryLongTopLevelHelper"));
        assert!(minified.contains("globalThis.out"));
    }

    #[test]
    fn test_minify_rejects_invalid_source() {
        let minifier = OxcMinifier::new();
        let result = minifier.minify_sync("function (((", "broken.js", &MinifyOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_drop_pure_calls_removes_bare_statements() {
        let source = "makeMap(\"a,b,c\");\nconst kept = makeMap(\"x\");\nconsole.log(kept);";
        let result = drop_pure_calls(source, &["makeMap".to_string()]);

        assert!(!result.contains("makeMap(\"a,b,c\")"));
        assert!(result.contains("const kept = makeMap(\"x\");"));
    }

    #[test]
    fn test_drop_pure_calls_noop_without_hints() {
        let source = "makeMap(\"a\");";
        assert_eq!(drop_pure_calls(source, &[]), source);
    }

    #[test]
    fn test_escape_non_ascii() {
        assert_eq!(escape_non_ascii("var a = 'é';"), "var a = '\\u00e9';");
        assert_eq!(escape_non_ascii("plain"), "plain");
        // Astral characters escape as a surrogate pair
        assert_eq!(escape_non_ascii("𝄞"), "\\ud834\\udd1e");
    }

    #[tokio::test]
    async fn test_production_options_ascii_output() {
        let minifier = OxcMinifier::new();
        let source = "const label = '\u{00e9}clair';\nconsole.log(label);";

        let minified = minifier
            .minify(source, "test.min.js", &MinifyOptions::production())
            .await
            .unwrap();

        assert!(minified.is_ascii());
        assert!(minified.contains("\\u00e9"));
    }
}
