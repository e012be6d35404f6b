//! Historical error frequencies
//!
//! The dataset is a JSON object mapping site (queue) names to objects that map
//! error codes, written as strings, to occurrence counts:
//!
//! ```json
//! {
//!   "site-a": { "-1": 9, "-2": 1 },
//!   "site-b": { "0": 40, "137": 3 }
//! }
//! ```
//!
//! Code `0` means success and never carries failure weight.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use jobsim_core::{Error, ErrorCode, ErrorSampler, Result, SUCCESS_CODE};
use rand::distributions::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Distribution;

/// Per-site error code counts
///
/// The failure counts of each site (every code but `0`) sum to at most
/// `u64::MAX`; loading rejects datasets that do not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorFrequencyTable {
    sites: BTreeMap<String, BTreeMap<ErrorCode, u64>>,
}

impl ErrorFrequencyTable {
    /// Load a table from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::data_format(path, e))?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Load a table from any reader; `source` names it in errors
    pub fn from_reader<R: Read>(reader: R, source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        let raw: BTreeMap<String, BTreeMap<String, u64>> =
            serde_json::from_reader(reader).map_err(|e| Error::data_format(&source, e))?;
        Self::from_raw(raw, &source)
    }

    /// Load a table from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_reader(json.as_bytes(), "<inline>")
    }

    fn from_raw(raw: BTreeMap<String, BTreeMap<String, u64>>, source: &Path) -> Result<Self> {
        let mut sites = BTreeMap::new();
        for (site, counts) in raw {
            let overflow =
                || Error::data_format(source, format!("site {site:?}: counts overflow"));

            let mut parsed: BTreeMap<ErrorCode, u64> = BTreeMap::new();
            let mut failure_weight: u64 = 0;
            for (key, count) in counts {
                let code: ErrorCode = key.trim().parse().map_err(|_| {
                    Error::data_format(
                        source,
                        format!("site {site:?}: error code {key:?} is not an integer"),
                    )
                })?;
                let entry = parsed.entry(code).or_insert(0);
                *entry = entry.checked_add(count).ok_or_else(overflow)?;
                if code != SUCCESS_CODE {
                    failure_weight = failure_weight.checked_add(count).ok_or_else(overflow)?;
                }
            }
            sites.insert(site, parsed);
        }
        Ok(Self { sites })
    }

    /// Site names in the table
    pub fn sites(&self) -> impl Iterator<Item = &str> {
        self.sites.keys().map(String::as_str)
    }

    /// Code counts for one site
    pub fn get(&self, site: &str) -> Option<&BTreeMap<ErrorCode, u64>> {
        self.sites.get(site)
    }

    /// Number of sites
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// True when the dataset holds no sites
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// Weighted sampler over one site's historical failure codes
///
/// Weights are the recorded counts, so a code seen 9 times is drawn nine times
/// as often as one seen once. A site that is absent from the table, or whose
/// only recorded code is success, yields a disabled sampler.
pub struct HistoricalErrorDistribution {
    queue: String,
    name: String,
    codes: Vec<ErrorCode>,
    weights: Vec<u64>,
    index: Option<WeightedIndex<u64>>,
    rng: Mutex<StdRng>,
}

impl HistoricalErrorDistribution {
    /// Build the distribution for `queue`
    pub fn for_queue(table: &ErrorFrequencyTable, queue: &str) -> Self {
        let (codes, weights): (Vec<ErrorCode>, Vec<u64>) = match table.get(queue) {
            Some(counts) => counts
                .iter()
                .filter(|(code, count)| **code != SUCCESS_CODE && **count > 0)
                .map(|(code, count)| (*code, *count))
                .unzip(),
            None => {
                tracing::warn!(
                    queue,
                    sites = table.len(),
                    "Queue not found in error dataset; error model disabled"
                );
                (Vec::new(), Vec::new())
            }
        };

        // Fails only for empty or all-zero weights, which is the disabled case.
        let index = WeightedIndex::new(&weights).ok();
        if index.is_none() && table.get(queue).is_some() {
            tracing::warn!(queue, "Queue has no failure weight; error model disabled");
        }

        Self {
            queue: queue.to_string(),
            name: format!("history:{queue}"),
            codes,
            weights,
            index,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Make draws reproducible
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Queue this distribution was built for
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Failure codes with non-zero weight, in ascending order
    pub fn codes(&self) -> &[ErrorCode] {
        &self.codes
    }

    /// Sum of all failure weights
    pub fn total_weight(&self) -> u64 {
        self.weights.iter().sum()
    }

    /// Probability of drawing `code`
    pub fn probability(&self, code: ErrorCode) -> f64 {
        let total = self.total_weight();
        if total == 0 {
            return 0.0;
        }
        self.codes
            .iter()
            .position(|c| *c == code)
            .map(|i| self.weights[i] as f64 / total as f64)
            .unwrap_or(0.0)
    }

    fn draw(&self, rng: &mut StdRng) -> Option<ErrorCode> {
        let index = self.index.as_ref()?;
        Some(self.codes[index.sample(rng)])
    }
}

impl ErrorSampler for HistoricalErrorDistribution {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self) -> bool {
        self.index.is_some()
    }

    fn sample_error_code(&self) -> Option<ErrorCode> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        self.draw(&mut rng)
    }

    fn sample_error_code_with_probability(&self, probability: f64) -> Option<ErrorCode> {
        if !self.is_enabled() || probability.is_nan() || probability <= 0.0 {
            return None;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        if rng.gen_bool(probability.min(1.0)) {
            self.draw(&mut rng)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for HistoricalErrorDistribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoricalErrorDistribution")
            .field("queue", &self.queue)
            .field("codes", &self.codes)
            .field("weights", &self.weights)
            .finish()
    }
}
