//! Maturity classification of a total score.

use serde::Serialize;

/// A contiguous, inclusive score range carrying a fixed label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaturityBand {
    pub min: u32,
    pub max: u32,
    pub label: &'static str,
}

impl MaturityBand {
    pub fn contains(&self, score: u32) -> bool {
        self.min <= score && score <= self.max
    }
}

/// Bands in ascending order. Contiguous and exhaustive over 0..=45.
pub const MATURITY_BANDS: [MaturityBand; 3] = [
    MaturityBand {
        min: 0,
        max: 15,
        label: "Novice - Exploring Opportunities",
    },
    MaturityBand {
        min: 16,
        max: 30,
        label: "Emerging - Building Foundations",
    },
    MaturityBand {
        min: 31,
        max: 45,
        label: "Advanced - Strategically Optimized",
    },
];

/// Label used when a score falls outside every band.
pub const UNDEFINED_LABEL: &str = "Undefined";

/// Classified maturity of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityLevel {
    Novice,
    Emerging,
    Advanced,
    /// Score outside 0..=45. Only reachable when answers are double counted.
    Undefined,
}

impl MaturityLevel {
    /// Classify a total score. Total over all `u32`: out-of-range scores map
    /// to `Undefined` instead of failing.
    pub fn classify(score: u32) -> Self {
        const LEVELS: [MaturityLevel; 3] = [
            MaturityLevel::Novice,
            MaturityLevel::Emerging,
            MaturityLevel::Advanced,
        ];
        MATURITY_BANDS
            .iter()
            .zip(LEVELS)
            .find(|(band, _)| band.contains(score))
            .map(|(_, level)| level)
            .unwrap_or(Self::Undefined)
    }

    pub fn band(&self) -> Option<&'static MaturityBand> {
        match self {
            Self::Novice => Some(&MATURITY_BANDS[0]),
            Self::Emerging => Some(&MATURITY_BANDS[1]),
            Self::Advanced => Some(&MATURITY_BANDS[2]),
            Self::Undefined => None,
        }
    }

    pub fn label(&self) -> &'static str {
        self.band().map(|b| b.label).unwrap_or(UNDEFINED_LABEL)
    }
}

impl std::fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Hover legend describing every band, highest first.
pub fn score_distribution_legend() -> String {
    let mut lines = vec!["Score Distribution for Maturity Levels:".to_string()];
    for band in MATURITY_BANDS.iter().rev() {
        lines.push(format!("{}-{}: {}", band.min, band.max, band.label));
    }
    lines.join("\n")
}
