use clap::Args;

use common::prelude::canonicalize;

use super::SeedSource;
use crate::seed::SeedError;

/// Show how a key canonicalizes and the deepest context that exists on
/// its way down
#[derive(Args, Debug, Clone)]
pub struct Resolve {
    #[command(flatten)]
    pub source: SeedSource,

    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Seed(#[from] SeedError),
}

impl crate::op::Op for Resolve {
    type Error = ResolveError;
    type Output = String;

    fn execute(&self, _ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let namespace = self.source.load()?;
        let deepest = namespace.deepest_existing_subtree(&self.path);

        Ok(format!(
            "canonical: {}\ndeepest:   {}",
            canonicalize(&self.path),
            deepest.path().unwrap_or_default()
        ))
    }
}
