use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug, Clone, Default)]
pub struct Config {
    #[command(flatten)]
    pub export: ExportSettings,
    #[command(flatten)]
    pub render: RenderParams,
}

/// What a batch does when one record fails to capture.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure, keep going, archive whatever succeeded.
    #[default]
    SkipFailed,
    /// Stop at the first failure. Selection and progress are still restored.
    AbortOnFirst,
}

#[derive(Args, Debug, Clone)]
pub struct ExportSettings {
    /// Wait before capturing the active report.
    #[arg(long, default_value_t = 500)]
    pub single_settle_ms: u64,

    /// Wait after switching records during a batch.
    #[arg(long, default_value_t = 1500)]
    pub batch_settle_ms: u64,

    #[arg(long, value_enum, default_value_t = FailurePolicy::SkipFailed)]
    pub failure_policy: FailurePolicy,
}

impl ExportSettings {
    /// No settle delays. Used where nothing renders asynchronously.
    pub fn immediate() -> Self {
        Self {
            single_settle_ms: 0,
            batch_settle_ms: 0,
            ..Self::default()
        }
    }

    pub fn single_settle(&self) -> Duration {
        Duration::from_millis(self.single_settle_ms)
    }

    pub fn batch_settle(&self) -> Duration {
        Duration::from_millis(self.batch_settle_ms)
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            single_settle_ms: 500,
            batch_settle_ms: 1500,
            failure_policy: FailurePolicy::SkipFailed,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RenderParams {
    /// Device pixel ratio for raster and document output.
    #[arg(long, default_value_t = 2.0)]
    pub pixel_ratio: f32,

    /// Extra directory of font files. System fonts are always loaded.
    #[arg(long)]
    pub font_dir: Option<PathBuf>,

    /// Family used when the page asks for a generic sans-serif.
    #[arg(long, default_value = "Noto Sans CJK SC")]
    pub sans_family: String,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            pixel_ratio: 2.0,
            font_dir: None,
            sans_family: "Noto Sans CJK SC".to_string(),
        }
    }
}
