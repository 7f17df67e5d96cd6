use clap::Args;

use crate::state::{AppConfig, AppState, StressConfig};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Default log level written to the config (default: warn)
    #[arg(long = "default-log-level", default_value = "warn")]
    pub default_log_level: String,

    /// Number of entries the stress workload inserts (default: 30000)
    #[arg(long, default_value_t = 30_000)]
    pub entries: usize,

    /// Deepest context nesting the stress workload produces (default: 6)
    #[arg(long, default_value_t = 6)]
    pub max_depth: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
}

impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            log_level: self.default_log_level.clone(),
            stress: StressConfig {
                entries: self.entries,
                max_depth: self.max_depth,
                ..StressConfig::default()
            },
        };

        let state = AppState::init(Some(ctx.state.ctxtree_dir.clone()), Some(config))?;

        let output = format!(
            "Initialized ctxtree directory at: {}\n\
             - Config: {}\n\
             - Log level: {}\n\
             - Stress entries: {}\n\
             - Stress max depth: {}",
            state.ctxtree_dir.display(),
            state.config_path.display(),
            state.config.log_level,
            state.config.stress.entries,
            state.config.stress.max_depth,
        );

        Ok(output)
    }
}
