use clap::Args;

use super::{open_context, SeedSource};
use crate::seed::SeedError;

#[derive(Args, Debug, Clone)]
pub struct Find {
    #[command(flatten)]
    pub source: SeedSource,

    /// Terminal name to match, e.g. `Time` or `Phase/Time`
    pub name: String,

    /// Only search below this context
    #[arg(long)]
    pub under: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum FindError {
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error("no such context: {0:?}")]
    NoSuchContext(String),
}

impl crate::op::Op for Find {
    type Error = FindError;
    type Output = String;

    fn execute(&self, _ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let namespace = self.source.load()?;
        let view = match &self.under {
            Some(under) => open_context(&namespace, under)
                .ok_or_else(|| FindError::NoSuchContext(under.clone()))?,
            None => namespace.root(),
        };

        let mut keys: Vec<String> = view.keys_ending_with(&self.name).collect();
        keys.sort();
        tracing::debug!(name = %self.name, matches = keys.len(), "suffix query");
        Ok(keys.join("\n"))
    }
}
