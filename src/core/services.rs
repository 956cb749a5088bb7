use crate::core::{interfaces::*, models::*};
use crate::utils::{gzip_size, Logger, Result, Timer};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

// Pre-compiled destination classification patterns
static PROD_DEST_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"min\.js$").unwrap());
static LIBRARY_DEST_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"index\.common\.js$").unwrap());

/// Destination ends in the minified-file naming convention
pub fn is_production_dest(dest: &Path) -> bool {
    PROD_DEST_REGEX.is_match(&dest.to_string_lossy())
}

/// Destination matches the common/library format naming pattern
pub fn is_library_dest(dest: &Path) -> bool {
    LIBRARY_DEST_REGEX.is_match(&dest.to_string_lossy())
}

/// Sequential multi-entry build driver.
///
/// Processes entries one at a time, in order, never overlapping: entry N+1
/// starts only after entry N's full chain has settled. A failed entry is
/// logged and skipped; the remaining queue still runs. The aggregate report
/// carries the failure count so callers can decide the exit status.
pub struct TsumuBuildService {
    bundler: Arc<dyn Bundler>,
    minifier: Arc<dyn Minifier>,
    fs_service: Arc<dyn FileSystemService>,
    reporter: Arc<dyn Reporter>,
}

impl TsumuBuildService {
    pub fn new(
        bundler: Arc<dyn Bundler>,
        minifier: Arc<dyn Minifier>,
        fs_service: Arc<dyn FileSystemService>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            bundler,
            minifier,
            fs_service,
            reporter,
        }
    }

    /// Run the whole entry table, in order.
    pub async fn build_all(&self, entries: &[BuildEntry]) -> Result<BuildReport> {
        let start = Instant::now();
        Logger::build_start(entries.len());

        // The only defensive filesystem check: every output directory must
        // exist before the first entry runs
        self.ensure_output_dirs(entries).await?;

        let mut report = BuildReport::default();
        for entry in entries {
            let dest = entry.output.file.clone();
            match self.build_entry(entry).await {
                Ok(files) => {
                    report.outcomes.push(EntryOutcome::Succeeded { dest, files });
                }
                Err(e) => {
                    let message = e.to_string();
                    self.reporter.entry_failed(&dest, &message);
                    report.outcomes.push(EntryOutcome::Failed {
                        dest,
                        error: message,
                    });
                }
            }
        }

        report.build_time = start.elapsed();
        Logger::build_complete(report.succeeded(), report.failed(), report.build_time);
        Ok(report)
    }

    /// Process one entry: bundle, optionally minify, write code + map, report.
    async fn build_entry(&self, entry: &BuildEntry) -> Result<Vec<WrittenFile>> {
        let dest = &entry.output.file;
        let _timer = Timer::start(&format!("Entry {}", dest.display()));
        Logger::entry_start(&dest.to_string_lossy());

        // Library-format artifacts are first persisted through the bundler's
        // own write path, then re-generated in memory for this chain
        let bundle = if is_library_dest(dest) {
            self.bundler.write(&entry.input, &entry.output).await?;
            self.bundler.generate(&entry.input, &entry.output).await?
        } else {
            self.bundler.generate(&entry.input, &entry.output).await?
        };

        let is_prod = is_production_dest(dest);
        let code = if is_prod {
            Logger::entry_minifying(&dest.to_string_lossy());
            let filename = dest
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("bundle.min.js")
                .to_string();
            let minified = self
                .minifier
                .minify(&bundle.code, &filename, &MinifyOptions::production())
                .await?;
            match &entry.output.banner {
                Some(banner) => format!("{}\n{}", banner, minified),
                None => minified,
            }
        } else {
            // Banners apply only to minified output
            bundle.code
        };

        let mut written = Vec::new();

        self.fs_service.write_file(dest, &code).await?;
        let code_file = WrittenFile {
            path: dest.clone(),
            size: code.len(),
            gzip_size: if is_prod { Some(gzip_size(&code)?) } else { None },
        };
        self.reporter.file_written(&code_file);
        written.push(code_file);

        let map_path = map_dest(dest);
        self.fs_service.write_file(&map_path, &bundle.map).await?;
        let map_file = WrittenFile {
            path: map_path,
            size: bundle.map.len(),
            gzip_size: None,
        };
        self.reporter.file_written(&map_file);
        written.push(map_file);

        Ok(written)
    }

    async fn ensure_output_dirs(&self, entries: &[BuildEntry]) -> Result<()> {
        for entry in entries {
            if let Some(parent) = entry.output.file.parent() {
                if !parent.as_os_str().is_empty() {
                    self.fs_service.create_directory(parent).await?;
                }
            }
        }
        Ok(())
    }
}

/// Companion source map path: destination with `.map` appended
fn map_dest(dest: &Path) -> PathBuf {
    let mut s = dest.as_os_str().to_os_string();
    s.push(".map");
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_classification() {
        assert!(is_production_dest(Path::new("dist/lib.min.js")));
        assert!(is_production_dest(Path::new("dist/lib.common.min.js")));
        assert!(!is_production_dest(Path::new("dist/lib.js")));
        assert!(!is_production_dest(Path::new("dist/lib.min.js.map")));
    }

    #[test]
    fn test_library_classification() {
        assert!(is_library_dest(Path::new("dist/index.common.js")));
        assert!(!is_library_dest(Path::new("dist/index.esm.js")));
        assert!(!is_library_dest(Path::new("dist/index.common.min.js")));
    }

    #[test]
    fn test_map_dest_appends_suffix() {
        assert_eq!(
            map_dest(Path::new("dist/lib.min.js")),
            PathBuf::from("dist/lib.min.js.map")
        );
    }
}
