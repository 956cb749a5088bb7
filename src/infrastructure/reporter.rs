use crate::core::interfaces::Reporter;
use crate::core::models::WrittenFile;
use crate::utils::{format_kb, Logger};
use colored::*;
use std::path::Path;

/// Line-oriented, color-highlighted progress reporting to standard output.
///
/// One line per written file: bold blue relative path, size in kilobytes,
/// and the gzip-compressed size in parentheses for production code files.
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    fn relative_display(path: &Path) -> String {
        match std::env::current_dir() {
            Ok(cwd) => path
                .strip_prefix(&cwd)
                .unwrap_or(path)
                .display()
                .to_string(),
            Err(_) => path.display().to_string(),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn file_written(&self, file: &WrittenFile) {
        let name = Self::relative_display(&file.path);
        let extra = match file.gzip_size {
            Some(zipped) => format!(" (gzipped: {})", format_kb(zipped)),
            None => String::new(),
        };

        println!(
            "{} {}{}",
            name.blue().bold(),
            format_kb(file.size),
            extra
        );
    }

    fn entry_failed(&self, dest: &Path, error: &str) {
        Logger::error(&format!(
            "Entry {} failed: {}",
            Self::relative_display(dest),
            error
        ));
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
