use crate::core::{interfaces::Bundler, models::*};
use crate::utils::{Logger, Result, TsumuError};
use once_cell::sync::Lazy;
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use regex::Regex;
use sourcemap::SourceMapBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

static SIDE_EFFECT_IMPORT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\s+['"]([^'"]+)['"]"#).unwrap());

/// A resolved module, ready for concatenation
struct ResolvedModule {
    path: PathBuf,
    source: String,
    transformed: String,
}

/// Module bundler built on the oxc parser.
///
/// Resolves the entry's relative import graph, rewrites import/export
/// statements into plain declarations, concatenates modules in dependency
/// order, and wraps the result per the requested module format. Bare
/// specifiers and configured externals are left unresolved.
pub struct OxcBundler;

impl OxcBundler {
    pub fn new() -> Self {
        Self
    }

    /// Collect the module graph in dependency-first order
    async fn resolve_graph(&self, input: &InputSpec) -> Result<Vec<ResolvedModule>> {
        let entry = input.entry.clone();
        if !entry.exists() {
            return Err(TsumuError::bundle_for(
                format!("Entry module not found: {}", entry.display()),
                entry,
            ));
        }

        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut ordered: Vec<ResolvedModule> = Vec::new();
        let mut stack: Vec<(PathBuf, bool)> = vec![(entry, false)];

        // Iterative post-order DFS so dependencies land before importers
        while let Some((path, expanded)) = stack.pop() {
            let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());

            if expanded {
                let source = fs::read_to_string(&path).await.map_err(TsumuError::Io)?;
                self.validate_module(&path, &source);
                let transformed = self.transform_module(&source);
                ordered.push(ResolvedModule {
                    path,
                    source,
                    transformed,
                });
                continue;
            }

            if !visited.insert(canonical) {
                continue;
            }

            let source = fs::read_to_string(&path).await.map_err(TsumuError::Io)?;
            stack.push((path.clone(), true));

            let base = path.parent().unwrap_or(Path::new("."));
            // Push in reverse so siblings pop in source order and keep
            // ES side-effect execution order
            for dep in self
                .extract_dependencies(&source, &input.external)
                .into_iter()
                .rev()
            {
                if let Some(resolved) = self.resolve_relative(&dep, base) {
                    stack.push((resolved, false));
                } else {
                    Logger::warn(&format!(
                        "Unresolved import '{}' from {}",
                        dep,
                        path.display()
                    ));
                }
            }
        }

        Ok(ordered)
    }

    /// Relative import specifiers found in `content`, externals excluded
    fn extract_dependencies(&self, content: &str, external: &[String]) -> Vec<String> {
        let mut dependencies = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();
            if !trimmed.starts_with("import ") {
                continue;
            }

            let specifier = if let Some(from_index) = trimmed.rfind(" from ") {
                let import_path = &trimmed[from_index + 6..];
                import_path
                    .trim_matches(|c| c == '"' || c == '\'' || c == ';' || c == ' ')
                    .to_string()
            } else if let Some(captures) = SIDE_EFFECT_IMPORT_REGEX.captures(trimmed) {
                captures[1].to_string()
            } else {
                continue;
            };

            if specifier.is_empty() || external.iter().any(|e| e == &specifier) {
                continue;
            }

            // Bare specifiers stay external
            if specifier.starts_with("./") || specifier.starts_with("../") {
                dependencies.push(specifier);
            }
        }

        dependencies
    }

    /// Resolve `./x` / `../x` against the importer's directory, trying the
    /// bare path, a `.js` extension, and an `index.js` completion
    fn resolve_relative(&self, specifier: &str, base: &Path) -> Option<PathBuf> {
        let joined = base.join(specifier);
        // Append rather than with_extension: `./util.types` must try
        // `util.types.js`, not replace the dotted suffix
        let mut with_js = joined.as_os_str().to_os_string();
        with_js.push(".js");
        let candidates = [
            joined.clone(),
            PathBuf::from(with_js),
            joined.join("index.js"),
        ];
        candidates.into_iter().find(|c| c.is_file())
    }

    /// Parse with oxc for validation; syntax issues are warnings only
    fn validate_module(&self, path: &Path, source: &str) {
        let allocator = Allocator::default();
        let source_type = SourceType::from_path(path).unwrap_or_default();

        let parser = Parser::new(&allocator, source, source_type);
        let result = parser.parse();

        if !result.errors.is_empty() {
            Logger::warn(&format!(
                "Parser warnings in {}: {} issues",
                path.display(),
                result.errors.len()
            ));
        }
    }

    /// Rewrite import/export statements into plain declarations.
    /// Line count is preserved so the source map stays line-accurate.
    fn transform_module(&self, content: &str) -> String {
        let mut processed_lines = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.starts_with("import ") {
                // Imports are inlined by concatenation order
                processed_lines.push(format!("// {}", line));
            } else if trimmed.starts_with("export default ") {
                processed_lines.push(line.replacen("export default ", "const __default__ = ", 1));
            } else if trimmed.starts_with("export const ")
                || trimmed.starts_with("export let ")
                || trimmed.starts_with("export var ")
                || trimmed.starts_with("export function ")
                || trimmed.starts_with("export class ")
            {
                processed_lines.push(line.replacen("export ", "", 1));
            } else if trimmed.starts_with("export ") {
                processed_lines.push(format!("// {}", line));
            } else {
                processed_lines.push(line.to_string());
            }
        }

        processed_lines.join("\n")
    }

    /// Assemble the final code and its source map for one entry
    fn assemble(&self, modules: &[ResolvedModule], output: &OutputSpec) -> Result<BundleOutput> {
        let has_default = modules
            .last()
            .map(|m| m.transformed.contains("const __default__ ="))
            .unwrap_or(false);

        let (prelude, postlude) = self.format_wrapper(output, has_default);

        let mut code = String::new();
        code.push_str(&prelude);

        let file_name = output
            .file
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("bundle.js");
        let mut builder = SourceMapBuilder::new(Some(file_name));
        let mut dst_line = prelude.lines().count() as u32;

        for module in modules {
            let source_name = module.path.to_string_lossy();
            let src_id = builder.add_source(&source_name);
            builder.set_source_contents(src_id, Some(&module.source));

            for (i, _) in module.transformed.lines().enumerate() {
                builder.add(
                    dst_line + i as u32,
                    0,
                    i as u32,
                    0,
                    Some(&source_name),
                    None,
                    false,
                );
            }

            code.push_str(&module.transformed);
            code.push_str("\n\n");
            dst_line += module.transformed.lines().count() as u32 + 1;
        }

        code.push_str(&postlude);

        let mut map_bytes = Vec::new();
        builder.into_sourcemap().to_writer(&mut map_bytes)?;
        let map = String::from_utf8(map_bytes)
            .map_err(|e| TsumuError::bundle(format!("Source map is not UTF-8: {}", e)))?;

        Ok(BundleOutput { code, map })
    }

    fn format_wrapper(&self, output: &OutputSpec, has_default: bool) -> (String, String) {
        match output.format {
            ModuleFormat::Esm => {
                let postlude = if has_default {
                    "export default __default__;\n".to_string()
                } else {
                    String::new()
                };
                (String::new(), postlude)
            }
            ModuleFormat::Cjs => {
                let postlude = if has_default {
                    "module.exports = __default__;\n".to_string()
                } else {
                    String::new()
                };
                ("'use strict';\n\n".to_string(), postlude)
            }
            ModuleFormat::Umd => {
                let global = output.name.as_deref().unwrap_or("bundle");
                let prelude = "(function (global) {\n'use strict';\n\n".to_string();
                let postlude = if has_default {
                    format!(
                        "global.{} = __default__;\n}})(typeof self !== 'undefined' ? self : this);\n",
                        global
                    )
                } else {
                    "})(typeof self !== 'undefined' ? self : this);\n".to_string()
                };
                (prelude, postlude)
            }
        }
    }
}

#[async_trait::async_trait]
impl Bundler for OxcBundler {
    async fn generate(&self, input: &InputSpec, output: &OutputSpec) -> Result<BundleOutput> {
        let modules = self.resolve_graph(input).await?;
        Logger::debug(&format!(
            "Bundled {} modules for {}",
            modules.len(),
            output.file.display()
        ));
        self.assemble(&modules, output)
    }

    async fn write(&self, input: &InputSpec, output: &OutputSpec) -> Result<()> {
        let bundle = self.generate(input, output).await?;

        if let Some(parent) = output.file.parent() {
            fs::create_dir_all(parent).await.map_err(TsumuError::Io)?;
        }
        fs::write(&output.file, &bundle.code)
            .await
            .map_err(TsumuError::Io)?;

        let mut map_path = output.file.as_os_str().to_os_string();
        map_path.push(".map");
        fs::write(PathBuf::from(map_path), &bundle.map)
            .await
            .map_err(TsumuError::Io)?;

        Ok(())
    }
}

impl Default for OxcBundler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_transform_strips_imports_and_exports() {
        let bundler = OxcBundler::new();
        let transformed = bundler.transform_module(
            "import { helper } from './helper.js';\nexport const value = helper();\nconsole.log(value);",
        );

        assert!(transformed.starts_with("// import"));
        assert!(transformed.contains("const value = helper();"));
        assert!(transformed.contains("console.log(value);"));
        assert!(!transformed.contains("export const"));
    }

    #[test]
    fn test_transform_rewrites_default_export() {
        let bundler = OxcBundler::new();
        let transformed = bundler.transform_module("export default { version: '1.0' };");
        assert_eq!(transformed, "const __default__ = { version: '1.0' };");
    }

    #[test]
    fn test_extract_dependencies_skips_external_and_bare() {
        let bundler = OxcBundler::new();
        let content = "import vue from 'vue';\nimport util from './util.js';\nimport './side.js';\nimport skip from './skipped.js';";
        let deps = bundler.extract_dependencies(content, &["./skipped.js".to_string()]);

        assert_eq!(deps, vec!["./util.js".to_string(), "./side.js".to_string()]);
    }

    #[tokio::test]
    async fn test_generate_inlines_relative_imports() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path(), "helper.js", "export const helper = () => 41;");
        let entry = write_fixture(
            dir.path(),
            "main.js",
            "import { helper } from './helper.js';\nexport default helper() + 1;",
        );

        let bundler = OxcBundler::new();
        let input = InputSpec::new(entry);
        let output = OutputSpec::new(dir.path().join("dist/out.js"), ModuleFormat::Esm);

        let bundle = bundler.generate(&input, &output).await.unwrap();

        assert!(bundle.code.contains("const helper = () => 41;"));
        assert!(bundle.code.contains("const __default__ = helper() + 1;"));
        assert!(bundle.code.contains("export default __default__;"));

        // Map carries both sources with contents
        assert!(bundle.map.contains("\"version\":3") || bundle.map.contains("\"version\": 3"));
        assert!(bundle.map.contains("helper.js"));
        assert!(bundle.map.contains("main.js"));
    }

    #[test]
    fn test_resolve_relative_keeps_dotted_names() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path(), "util.types.js", "const t = 1;");

        let bundler = OxcBundler::new();
        let resolved = bundler.resolve_relative("./util.types", dir.path()).unwrap();

        assert!(resolved.ends_with("util.types.js"));
    }

    #[tokio::test]
    async fn test_sibling_imports_keep_source_order() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path(), "a.js", "console.log('first');");
        write_fixture(dir.path(), "b.js", "console.log('second');");
        let entry = write_fixture(dir.path(), "main.js", "import './a.js';\nimport './b.js';");

        let bundler = OxcBundler::new();
        let input = InputSpec::new(entry);
        let output = OutputSpec::new(dir.path().join("dist/out.js"), ModuleFormat::Esm);

        let bundle = bundler.generate(&input, &output).await.unwrap();

        let first = bundle.code.find("'first'").unwrap();
        let second = bundle.code.find("'second'").unwrap();
        assert!(
            first < second,
            "a.js must execute before b.js in the bundle"
        );
    }

    #[tokio::test]
    async fn test_generate_missing_entry_fails() {
        let dir = tempdir().unwrap();
        let bundler = OxcBundler::new();
        let input = InputSpec::new(dir.path().join("missing.js"));
        let output = OutputSpec::new(dir.path().join("dist/out.js"), ModuleFormat::Esm);

        assert!(bundler.generate(&input, &output).await.is_err());
    }

    #[tokio::test]
    async fn test_write_persists_code_and_map() {
        let dir = tempdir().unwrap();
        let entry = write_fixture(dir.path(), "main.js", "export default 1;");

        let bundler = OxcBundler::new();
        let input = InputSpec::new(entry);
        let dest = dir.path().join("dist/index.common.js");
        let output = OutputSpec::new(dest.clone(), ModuleFormat::Cjs);

        bundler.write(&input, &output).await.unwrap();

        assert!(dest.exists());
        assert!(dir.path().join("dist/index.common.js.map").exists());
        let code = std::fs::read_to_string(&dest).unwrap();
        assert!(code.contains("module.exports = __default__;"));
    }

    #[tokio::test]
    async fn test_umd_wrapper_uses_global_name() {
        let dir = tempdir().unwrap();
        let entry = write_fixture(dir.path(), "main.js", "export default { ok: true };");

        let bundler = OxcBundler::new();
        let input = InputSpec::new(entry);
        let output = OutputSpec::new(dir.path().join("dist/out.js"), ModuleFormat::Umd)
            .with_name("MyLib");

        let bundle = bundler.generate(&input, &output).await.unwrap();

        assert!(bundle.code.starts_with("(function (global) {"));
        assert!(bundle.code.contains("global.MyLib = __default__;"));
    }
}
