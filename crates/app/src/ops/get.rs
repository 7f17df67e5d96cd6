use clap::Args;

use common::prelude::Entry;

use super::SeedSource;
use crate::seed::SeedError;

#[derive(Args, Debug, Clone)]
pub struct Get {
    #[command(flatten)]
    pub source: SeedSource,

    /// Key to look up; a trailing `/` asks for a context
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GetError {
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error("nothing stored at {0:?}")]
    NotFound(String),
}

impl crate::op::Op for Get {
    type Error = GetError;
    type Output = String;

    fn execute(&self, _ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let namespace = self.source.load()?;

        match namespace.get(&self.path) {
            Some(Entry::Value(value)) => Ok(value.to_string()),
            Some(Entry::Context(context)) => {
                let path = context.path().unwrap_or_default();
                let mut lines = vec![format!("{} ({} values)", path, context.len())];
                lines.extend(context.children().into_iter().map(|name| format!("  {}/", name)));
                lines.extend(context.contents().into_iter().map(|name| format!("  {}", name)));
                Ok(lines.join("\n"))
            }
            None => Err(GetError::NotFound(self.path.clone())),
        }
    }
}
