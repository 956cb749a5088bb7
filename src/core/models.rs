use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Module entry point plus external-module exclusions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSpec {
    pub entry: PathBuf,
    /// Bare specifiers the bundler must leave unresolved
    #[serde(default)]
    pub external: Vec<String>,
}

impl InputSpec {
    pub fn new(entry: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            external: Vec::new(),
        }
    }

    pub fn with_external(mut self, external: Vec<String>) -> Self {
        self.external = external;
        self
    }
}

/// Output module format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    Esm,
    Cjs,
    Umd,
}

impl std::fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleFormat::Esm => write!(f, "esm"),
            ModuleFormat::Cjs => write!(f, "cjs"),
            ModuleFormat::Umd => write!(f, "umd"),
        }
    }
}

/// Destination file, module format, optional UMD global name and banner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSpec {
    pub file: PathBuf,
    pub format: ModuleFormat,
    /// Global name for UMD output
    #[serde(default)]
    pub name: Option<String>,
    /// Banner text prepended to minified output
    #[serde(default)]
    pub banner: Option<String>,
}

impl OutputSpec {
    pub fn new(file: impl Into<PathBuf>, format: ModuleFormat) -> Self {
        Self {
            file: file.into(),
            format,
            name: None,
            banner: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = Some(banner.into());
        self
    }
}

/// One configured (input, output) pair describing an artifact to produce.
/// Entries are static configuration, immutable after process start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildEntry {
    pub input: InputSpec,
    pub output: OutputSpec,
}

impl BuildEntry {
    pub fn new(input: InputSpec, output: OutputSpec) -> Self {
        Self { input, output }
    }
}

/// Bundler output: generated code and the JSON-serialized source map
#[derive(Debug, Clone)]
pub struct BundleOutput {
    pub code: String,
    pub map: String,
}

/// Minifier configuration
#[derive(Debug, Clone)]
pub struct MinifyOptions {
    /// Whole-program top-level optimization (mangle top-level symbols)
    pub toplevel: bool,
    /// Escape non-ASCII characters in the output
    pub ascii_only: bool,
    /// Functions treated as side-effect-free for dead-code elimination
    pub pure_funcs: Vec<String>,
}

impl MinifyOptions {
    /// The production profile used for every `*.min.js` artifact
    pub fn production() -> Self {
        Self {
            toplevel: true,
            ascii_only: true,
            pure_funcs: vec!["makeMap".to_string()],
        }
    }
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            toplevel: false,
            ascii_only: false,
            pure_funcs: Vec::new(),
        }
    }
}

/// Per-file report record
#[derive(Debug, Clone)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub size: usize,
    /// Present only for production code files
    pub gzip_size: Option<usize>,
}

/// Outcome of a single entry's chain
#[derive(Debug)]
pub enum EntryOutcome {
    Succeeded {
        dest: PathBuf,
        files: Vec<WrittenFile>,
    },
    Failed {
        dest: PathBuf,
        error: String,
    },
}

impl EntryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, EntryOutcome::Succeeded { .. })
    }
}

/// Aggregate result of a driver run
#[derive(Debug, Default)]
pub struct BuildReport {
    pub outcomes: Vec<EntryOutcome>,
    pub build_time: std::time::Duration,
}

impl BuildReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}
