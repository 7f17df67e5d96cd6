use clap::Args;

use super::{open_context, SeedSource};
use crate::seed::SeedError;

#[derive(Args, Debug, Clone)]
pub struct Keys {
    #[command(flatten)]
    pub source: SeedSource,

    /// List keys relative to this context instead of the root
    #[arg(long)]
    pub under: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum KeysError {
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error("no such context: {0:?}")]
    NoSuchContext(String),
}

impl crate::op::Op for Keys {
    type Error = KeysError;
    type Output = String;

    fn execute(&self, _ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let namespace = self.source.load()?;
        let view = match &self.under {
            Some(under) => open_context(&namespace, under)
                .ok_or_else(|| KeysError::NoSuchContext(under.clone()))?,
            None => namespace.root(),
        };

        let mut keys: Vec<String> = view.all_keys().collect();
        keys.sort();
        Ok(keys.join("\n"))
    }
}
