//! Molecular-weight ladder reference data
//!
//! A ladder definition is validated once, when it enters the ladder table,
//! so placement and rendering never see a ladder the solver cannot handle.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, SolverError};

/// A named reference ladder with its fragment sizes, largest first
#[derive(Clone, Debug, PartialEq)]
pub struct LadderDefinition {
    name: String,
    sizes: Vec<f64>,
}

impl LadderDefinition {
    /// Validate and sort a ladder definition
    ///
    /// Sizes must be finite and strictly positive, and at least two of them
    /// must differ. The stored list is sorted in descending order.
    pub fn new(name: impl Into<String>, sizes: &[f64]) -> Result<Self, SolverError> {
        if sizes.is_empty() {
            return Err(SolverError::Empty);
        }
        if let Some(&bad) = sizes.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
            return Err(SolverError::NonPositiveSize(bad));
        }

        let mut sorted = sizes.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));

        let mut distinct = sorted.clone();
        distinct.dedup();
        if distinct.len() < 2 {
            return Err(SolverError::TooFewDistinctSizes(distinct.len()));
        }

        Ok(Self {
            name: name.into(),
            sizes: sorted,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fragment sizes in descending order
    pub fn sizes_descending(&self) -> &[f64] {
        &self.sizes
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn largest(&self) -> f64 {
        self.sizes[0]
    }

    pub fn smallest(&self) -> f64 {
        self.sizes[self.sizes.len() - 1]
    }
}

/// Display unit for ladder tick labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "bp")]
    Bp,
    #[serde(rename = "kbp")]
    Kbp,
    #[serde(rename = "Da")]
    Da,
    #[serde(rename = "kDa")]
    KDa,
    #[serde(rename = "u")]
    U,
    #[serde(rename = "ku")]
    Ku,
}

impl Unit {
    pub const ALL: [Unit; 6] = [
        Unit::Bp,
        Unit::Kbp,
        Unit::Da,
        Unit::KDa,
        Unit::U,
        Unit::Ku,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Bp => "bp",
            Unit::Kbp => "kbp",
            Unit::Da => "Da",
            Unit::KDa => "kDa",
            Unit::U => "u",
            Unit::Ku => "ku",
        }
    }

    /// Kilo units show sizes divided by 1000
    pub fn is_kilo(self) -> bool {
        self.symbol().starts_with('k')
    }

    /// Tick label for a fragment size, e.g. `"5000 bp"` or `"5.00 kbp"`
    pub fn format_size(self, size: f64) -> String {
        if self.is_kilo() {
            format!("{:.2} {}", size / 1000.0, self.symbol())
        } else {
            format!("{} {}", size.round() as i64, self.symbol())
        }
    }
}

impl std::str::FromStr for Unit {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .into_iter()
            .find(|u| u.symbol() == s)
            .ok_or_else(|| ConfigurationError::UnknownUnit(s.to_string()))
    }
}

/// Ordered table of ladder definitions, looked up by name
#[derive(Clone, Debug, PartialEq)]
pub struct LadderTable {
    ladders: Vec<LadderDefinition>,
}

/// On-disk form of a ladder table entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LadderEntry {
    name: String,
    sizes: Vec<f64>,
}

const BUILTIN_LADDERS: &[(&str, &[f64])] = &[
    (
        "Eurogentec smartLadder",
        &[
            10000.0, 8000.0, 6000.0, 5000.0, 4000.0, 3000.0, 2500.0, 2000.0, 1500.0, 1000.0, 800.0,
            600.0,
        ],
    ),
    (
        "NEB 1 kb DNA Ladder",
        &[
            10000.0, 8000.0, 6000.0, 5000.0, 4000.0, 3000.0, 2000.0, 1500.0, 1000.0, 500.0,
        ],
    ),
    (
        "NEB Low Molecular Weight DNA Ladder",
        &[
            766.0, 500.0, 350.0, 300.0, 250.0, 200.0, 150.0, 100.0, 75.0, 50.0, 25.0,
        ],
    ),
    (
        "Thermo Scientific GeneRuler DNA Ladder Mix",
        &[
            10000.0, 8000.0, 6000.0, 5000.0, 4000.0, 3500.0, 3000.0, 2500.0, 2000.0, 1500.0,
            1200.0, 1000.0, 900.0, 800.0, 700.0, 600.0, 500.0, 400.0, 300.0, 200.0, 100.0,
        ],
    ),
    (
        "Thermo Scientific GeneRuler 100 bp DNA Ladder",
        &[
            1000.0, 900.0, 800.0, 700.0, 600.0, 500.0, 400.0, 300.0, 200.0, 100.0,
        ],
    ),
    (
        "Invitrogen 1 Kb Plus DNA Ladder",
        &[
            12000.0, 5000.0, 2000.0, 1650.0, 1000.0, 850.0, 650.0, 500.0, 400.0, 300.0, 200.0,
            100.0,
        ],
    ),
    (
        "NEB Purple 2-Log DNA Ladder",
        &[
            10000.0, 8000.0, 6000.0, 5000.0, 4000.0, 3000.0, 2000.0, 1500.0, 1200.0, 1000.0, 900.0,
            800.0, 700.0, 600.0, 500.0, 400.0, 300.0, 200.0, 100.0,
        ],
    ),
];

impl LadderTable {
    /// Build a table from already validated definitions
    pub fn new(ladders: Vec<LadderDefinition>) -> Self {
        Self { ladders }
    }

    /// The commercial ladders shipped with the tool
    pub fn builtin() -> Self {
        let ladders = BUILTIN_LADDERS
            .iter()
            .filter_map(|(name, sizes)| match LadderDefinition::new(*name, sizes) {
                Ok(def) => Some(def),
                Err(err) => {
                    log::error!("Built-in ladder '{}' rejected: {}", name, err);
                    None
                }
            })
            .collect();
        Self { ladders }
    }

    /// Parse a JSON list of `{"name": .., "sizes": [..]}` entries
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let entries: Vec<LadderEntry> = serde_json::from_str(json)
            .map_err(|e| ConfigurationError::InvalidLadderTable(e.to_string()))?;

        let mut ladders = Vec::with_capacity(entries.len());
        for entry in entries {
            let def = LadderDefinition::new(entry.name.trim(), &entry.sizes).map_err(|source| {
                ConfigurationError::InvalidLadder {
                    name: entry.name.clone(),
                    source,
                }
            })?;
            ladders.push(def);
        }
        if ladders.is_empty() {
            return Err(ConfigurationError::InvalidLadderTable(
                "table contains no ladders".to_string(),
            ));
        }
        Ok(Self { ladders })
    }

    /// Serialize the table in the format accepted by [`LadderTable::from_json`]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let entries: Vec<LadderEntry> = self
            .ladders
            .iter()
            .map(|d| LadderEntry {
                name: d.name.clone(),
                sizes: d.sizes.clone(),
            })
            .collect();
        serde_json::to_string_pretty(&entries)
    }

    pub fn get(&self, name: &str) -> Option<&LadderDefinition> {
        self.ladders.iter().find(|d| d.name == name)
    }

    /// Look up a ladder, failing with a configuration error when absent
    pub fn require(&self, name: &str) -> Result<&LadderDefinition, ConfigurationError> {
        self.get(name)
            .ok_or_else(|| ConfigurationError::UnknownLadder(name.to_string()))
    }

    pub fn first(&self) -> Option<&LadderDefinition> {
        self.ladders.first()
    }

    pub fn len(&self) -> usize {
        self.ladders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ladders.is_empty()
    }
}

impl Default for LadderTable {
    fn default() -> Self {
        Self::builtin()
    }
}
