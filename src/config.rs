use crate::core::models::{BuildEntry, InputSpec, ModuleFormat, OutputSpec};
use std::path::Path;

/// Version header embedded at the top of minified artifacts
pub const BANNER: &str = concat!(
    "/*!\n * tsumu build v",
    env!("CARGO_PKG_VERSION"),
    "\n * Released under the MIT License.\n */"
);

/// The static build table: read once at process start, immutable thereafter.
///
/// One artifact per distribution flavor, all bundled from `src/index.js`
/// under `root`. The minified UMD build carries the version banner and is
/// the only entry classified as production.
pub fn release_entries(root: &Path) -> Vec<BuildEntry> {
    let entry = root.join("src/index.js");
    let dist = root.join("dist");

    vec![
        // ES module build
        BuildEntry::new(
            InputSpec::new(entry.clone()),
            OutputSpec::new(dist.join("index.esm.js"), ModuleFormat::Esm),
        ),
        // CommonJS build, persisted through the bundler's own write path
        BuildEntry::new(
            InputSpec::new(entry.clone()),
            OutputSpec::new(dist.join("index.common.js"), ModuleFormat::Cjs),
        ),
        // UMD development build
        BuildEntry::new(
            InputSpec::new(entry.clone()),
            OutputSpec::new(dist.join("index.js"), ModuleFormat::Umd).with_name("Tsumu"),
        ),
        // UMD production build
        BuildEntry::new(
            InputSpec::new(entry),
            OutputSpec::new(dist.join("index.min.js"), ModuleFormat::Umd)
                .with_name("Tsumu")
                .with_banner(BANNER),
        ),
    ]
}
