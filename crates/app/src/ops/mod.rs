pub mod find;
pub mod get;
pub mod init;
pub mod keys;
pub mod resolve;
pub mod stress;
pub mod version;

pub use find::Find;
pub use get::Get;
pub use init::Init;
pub use keys::Keys;
pub use resolve::Resolve;
pub use stress::Stress;
pub use version::Version;

use std::path::PathBuf;

use clap::Args;

use common::prelude::{Context, Namespace};

use crate::seed::{self, SeedError};

/// Seed file every query op loads its namespace from
#[derive(Args, Debug, Clone)]
pub struct SeedSource {
    /// TOML seed file of `"path" = value` entries
    #[arg(long = "seed", value_name = "FILE")]
    pub seed: PathBuf,
}

impl SeedSource {
    pub fn load(&self) -> Result<Namespace, SeedError> {
        seed::load(&self.seed)
    }
}

/// Open the context a `--under` argument names. The trailing separator is
/// optional on the command line.
pub fn open_context(namespace: &Namespace, raw: &str) -> Option<Context> {
    if raw.is_empty() || raw.ends_with('/') {
        namespace.get_context(raw)
    } else {
        namespace.get_context(&format!("{}/", raw))
    }
}
