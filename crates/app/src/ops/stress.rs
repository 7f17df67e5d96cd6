use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::{Duration, Instant};

use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::prelude::{Namespace, NamespaceError};

use crate::state::StressConfig;

/// Intermediate contexts are drawn from `d0..d{FANOUT}` at every level
const FANOUT: usize = 8;
/// One in this many keys gets a deepest-subtree probe
const PROBE_EVERY: usize = 97;

/// Fill a namespace with synthetic keys and time the query primitives
/// against it, checking every answer.
#[derive(Args, Debug, Clone)]
pub struct Stress {
    /// Number of entries to insert (defaults to the configured count)
    #[arg(long)]
    pub entries: Option<usize>,

    /// Deepest context nesting, leaf included
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Seed for the key generator
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum StressError {
    #[error("stress workload needs at least one leaf name")]
    NoLeafNames,
    #[error("max depth must be at least 1")]
    ZeroDepth,
    #[error("unusable leaf name {name:?}: {reason}")]
    BadLeafName { name: String, reason: &'static str },
    #[error("store rejected a synthetic key: {0}")]
    Store(#[from] NamespaceError),
    #[error("{query}: expected {expected} keys, found {found}")]
    Mismatch {
        query: String,
        expected: usize,
        found: usize,
    },
    #[error("deepest_existing_subtree({key:?}): expected {want}, found {found}")]
    WrongSubtree {
        key: String,
        want: String,
        found: String,
    },
}

#[derive(Debug)]
pub struct StressReport {
    pub entries: usize,
    pub distinct: usize,
    pub nodes: usize,
    pub insert: Duration,
    pub all_keys: Duration,
    pub suffix_names: usize,
    pub suffix_matches: usize,
    pub suffix: Duration,
    pub probes: usize,
    pub deepest: Duration,
}

impl fmt::Display for StressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "insert: {} entries ({} distinct keys, {} nodes) in {:?}",
            self.entries, self.distinct, self.nodes, self.insert
        )?;
        writeln!(f, "all_keys: {} keys in {:?}", self.distinct, self.all_keys)?;
        writeln!(
            f,
            "keys_ending_with: {} names, {} matches in {:?}",
            self.suffix_names, self.suffix_matches, self.suffix
        )?;
        write!(
            f,
            "deepest_existing_subtree: {} probes in {:?}",
            self.probes, self.deepest
        )
    }
}

impl crate::op::Op for Stress {
    type Error = StressError;
    type Output = StressReport;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let configured = &ctx.state.config.stress;
        let config = StressConfig {
            entries: self.entries.unwrap_or(configured.entries),
            max_depth: self.max_depth.unwrap_or(configured.max_depth),
            seed: self.seed.unwrap_or(configured.seed),
            leaf_names: configured.leaf_names.clone(),
        };
        run(&config)
    }
}

/// Generate `config.entries` keys and return them with the leaf name each
/// one ends in. Duplicates are possible and expected.
fn synthesize(config: &StressConfig) -> Vec<(String, usize)> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..config.entries)
        .map(|_| {
            let depth = rng.random_range(0..config.max_depth);
            let mut key = String::new();
            for _ in 0..depth {
                key.push_str(&format!("/d{}", rng.random_range(0..FANOUT)));
            }
            let leaf = rng.random_range(0..config.leaf_names.len());
            key.push('/');
            key.push_str(&config.leaf_names[leaf]);
            (key, leaf)
        })
        .collect()
}

fn validate_leaf_names(names: &[String]) -> Result<(), StressError> {
    let mut seen = HashSet::new();
    for name in names {
        let reason = if name.is_empty() {
            Some("empty")
        } else if name.contains('/') {
            Some("contains a separator")
        } else if name == ".." {
            Some("climbs to the parent context")
        } else if (0..FANOUT).any(|d| *name == format!("d{}", d)) {
            Some("collides with an intermediate context name")
        } else if !seen.insert(name.as_str()) {
            Some("listed twice")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(StressError::BadLeafName {
                name: name.clone(),
                reason,
            });
        }
    }
    Ok(())
}

fn check(query: impl Into<String>, expected: usize, found: usize) -> Result<(), StressError> {
    if expected == found {
        Ok(())
    } else {
        Err(StressError::Mismatch {
            query: query.into(),
            expected,
            found,
        })
    }
}

pub fn run(config: &StressConfig) -> Result<StressReport, StressError> {
    if config.leaf_names.is_empty() {
        return Err(StressError::NoLeafNames);
    }
    if config.max_depth == 0 {
        return Err(StressError::ZeroDepth);
    }
    validate_leaf_names(&config.leaf_names)?;

    let generated = synthesize(config);
    let namespace = Namespace::new();

    let started = Instant::now();
    for (i, (key, _)) in generated.iter().enumerate() {
        namespace.put(key, i as i64)?;
    }
    let insert = started.elapsed();

    let expected: HashSet<&str> = generated.iter().map(|(key, _)| key.as_str()).collect();
    let mut by_leaf: HashMap<usize, HashSet<&str>> = HashMap::new();
    for (key, leaf) in &generated {
        by_leaf.entry(*leaf).or_default().insert(key.as_str());
    }
    tracing::info!(
        entries = config.entries,
        distinct = expected.len(),
        nodes = namespace.node_count(),
        "synthetic namespace built"
    );

    let started = Instant::now();
    let listed: Vec<String> = namespace.all_keys().collect();
    let all_keys = started.elapsed();
    let unique: HashSet<&str> = listed.iter().map(String::as_str).collect();
    check("all_keys", expected.len(), listed.len())?;
    check("all_keys (distinct)", expected.len(), unique.len())?;
    check(
        "all_keys (known)",
        expected.len(),
        unique.intersection(&expected).count(),
    )?;

    let started = Instant::now();
    let mut suffix_matches = 0;
    for (leaf, name) in config.leaf_names.iter().enumerate() {
        let found: HashSet<String> = namespace.keys_ending_with(name).collect();
        let want = by_leaf.get(&leaf).map(HashSet::len).unwrap_or(0);
        check(format!("keys_ending_with({:?})", name), want, found.len())?;
        suffix_matches += found.len();
    }
    let suffix = started.elapsed();

    let started = Instant::now();
    let mut probes = 0;
    for (key, _) in generated.iter().step_by(PROBE_EVERY) {
        let (dir, _) = key.rsplit_once('/').unwrap_or(("", key));
        let deepest = namespace.deepest_existing_subtree(&format!("{}/no/such/tail", key));
        let want = format!("{}/", dir);
        let found = deepest.path().unwrap_or_default();
        if found != want {
            return Err(StressError::WrongSubtree {
                key: key.clone(),
                want,
                found,
            });
        }
        probes += 1;
    }
    let deepest = started.elapsed();

    Ok(StressReport {
        entries: config.entries,
        distinct: expected.len(),
        nodes: namespace.node_count(),
        insert,
        all_keys,
        suffix_names: config.leaf_names.len(),
        suffix_matches,
        suffix,
        probes,
        deepest,
    })
}
