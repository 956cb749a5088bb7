use crate::core::models::*;
use crate::utils::Result;
use async_trait::async_trait;
use std::path::Path;

/// Module bundling interface
///
/// `generate` produces the code+map pair in memory; `write` persists the
/// bundle through the bundler's own write path (used for the library-format
/// side-channel artifact).
#[async_trait]
pub trait Bundler: Send + Sync {
    async fn generate(&self, input: &InputSpec, output: &OutputSpec) -> Result<BundleOutput>;
    async fn write(&self, input: &InputSpec, output: &OutputSpec) -> Result<()>;
}

/// Code minification interface
#[async_trait]
pub trait Minifier: Send + Sync {
    async fn minify(&self, code: &str, filename: &str, options: &MinifyOptions)
        -> Result<String>;
}

/// File system operations interface — only what the driver performs
#[async_trait]
pub trait FileSystemService: Send + Sync {
    async fn write_file(&self, path: &Path, content: &str) -> Result<()>;
    async fn create_directory(&self, path: &Path) -> Result<()>;
}

/// Operator-facing progress reporting interface
pub trait Reporter: Send + Sync {
    fn file_written(&self, file: &WrittenFile);
    fn entry_failed(&self, dest: &Path, error: &str);
}
