// Example: Custom Pipeline Wiring
//
// This example shows how to register custom collaborators with the build
// driver: a bundler that stamps its output, the stock oxc minifier, and
// a reporter that prefixes every line.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use tsumu::core::interfaces::{Bundler, Reporter};
use tsumu::core::models::*;
use tsumu::core::services::TsumuBuildService;
use tsumu::infrastructure::{OxcMinifier, TokioFileSystemService};
use tsumu::utils::Result;

/// Bundler that produces a fixed, stamped bundle
struct StampBundler;

#[async_trait]
impl Bundler for StampBundler {
    async fn generate(&self, input: &InputSpec, _output: &OutputSpec) -> Result<BundleOutput> {
        Ok(BundleOutput {
            code: format!("/* stamped from {} */\nvar answer = 42;", input.entry.display()),
            map: "{\"version\":3,\"sources\":[],\"mappings\":\"\"}".to_string(),
        })
    }

    async fn write(&self, input: &InputSpec, output: &OutputSpec) -> Result<()> {
        let bundle = self.generate(input, output).await?;
        std::fs::write(&output.file, bundle.code)?;
        Ok(())
    }
}

/// Reporter that tags every line with the pipeline name
struct TaggedReporter;

impl Reporter for TaggedReporter {
    fn file_written(&self, file: &WrittenFile) {
        println!(
            "🔌 [custom-pipeline] wrote {} ({} bytes)",
            file.path.display(),
            file.size
        );
    }

    fn entry_failed(&self, dest: &Path, error: &str) {
        println!("🔌 [custom-pipeline] {} failed: {}", dest.display(), error);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let service = TsumuBuildService::new(
        Arc::new(StampBundler),
        Arc::new(OxcMinifier::new()),
        Arc::new(TokioFileSystemService),
        Arc::new(TaggedReporter),
    );

    let entries = vec![
        BuildEntry::new(
            InputSpec::new("src/index.js"),
            OutputSpec::new("demo-dist/stamped.js", ModuleFormat::Esm),
        ),
        BuildEntry::new(
            InputSpec::new("src/index.js"),
            OutputSpec::new("demo-dist/stamped.min.js", ModuleFormat::Umd)
                .with_banner("/* demo build */"),
        ),
    ];

    let report = service.build_all(&entries).await?;
    println!(
        "🔌 [custom-pipeline] done: {} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );

    Ok(())
}
