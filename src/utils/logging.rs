use std::time::Instant;
use tracing::{debug, error, info, warn};

pub struct Logger;

impl Logger {
    pub fn init() {
        tracing_subscriber::fmt()
            .with_env_filter("tsumu=debug")
            .with_target(false)
            .init();
    }

    pub fn build_start(total: usize) {
        info!("📦 tsumu - Distribution Build");
        info!("═══════════════════════════════════════");
        info!("🎯 Entries queued: {}", total);
    }

    pub fn entry_start(dest: &str) {
        debug!("⚡ Building entry: {}", dest);
    }

    pub fn entry_minifying(dest: &str) {
        debug!("🗜️  Minifying: {}", dest);
    }

    pub fn build_complete(succeeded: usize, failed: usize, build_time: std::time::Duration) {
        info!("");
        info!("📊 Build Statistics:");
        info!("  • Entries succeeded: {}", succeeded);
        if failed > 0 {
            info!("  • Entries failed: {}", failed);
        }
        info!("  • Build time: {:.2?}", build_time);
    }

    pub fn info(msg: &str) {
        info!("{}", msg);
    }

    pub fn debug(msg: &str) {
        debug!("{}", msg);
    }

    pub fn error(msg: &str) {
        error!("❌ {}", msg);
    }

    pub fn warn(msg: &str) {
        warn!("⚠️  {}", msg);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱️  Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}
