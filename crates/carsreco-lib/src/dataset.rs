//! Listing dataset hand-off and the model truncation policy
//!
//! The loader collaborator produces listings either in memory or as a JSON
//! array of `{model, manufacturer, price, posting_date}` objects.

use crate::error::PredictResult;
use crate::models::Listing;
use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Ordered collection of listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    listings: Vec<Listing>,
}

impl Dataset {
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    /// Parse a JSON array of listings
    pub fn from_json_str(json: &str) -> PredictResult<Self> {
        let listings: Vec<Listing> = serde_json::from_str(json)?;
        Ok(Self { listings })
    }

    /// Read a JSON array of listings from disk
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;
        let dataset = Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse dataset {}", path.display()))?;
        debug!(path = %path.display(), listings = dataset.len(), "Dataset loaded");
        Ok(dataset)
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Listing count per model, in order of first appearance
    pub fn model_counts(&self) -> Vec<(&str, usize)> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for listing in &self.listings {
            match index.get(listing.model.as_str()) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(listing.model.as_str(), counts.len());
                    counts.push((listing.model.as_str(), 1));
                }
            }
        }
        counts
    }

    /// Number of distinct models
    pub fn model_count(&self) -> usize {
        self.model_counts().len()
    }

    /// Keep only rows of the `max_models` most frequent models
    ///
    /// Models with equal counts keep their first-appearance order, so the
    /// cut is deterministic. Row order is preserved.
    pub fn retain_top_models(self, max_models: usize) -> Self {
        if self.model_count() <= max_models {
            return self;
        }
        let mut counts = self.model_counts();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        let keep: HashSet<String> = counts
            .into_iter()
            .take(max_models)
            .map(|(model, _)| model.to_string())
            .collect();

        let listings = self
            .listings
            .into_iter()
            .filter(|l| keep.contains(&l.model))
            .collect();
        Self { listings }
    }

    /// Distinct manufacturers, in order of first appearance
    pub fn manufacturer_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.listings
            .iter()
            .filter(|l| seen.insert(l.manufacturer.as_str()))
            .map(|l| l.manufacturer.clone())
            .collect()
    }
}

impl From<Vec<Listing>> for Dataset {
    fn from(listings: Vec<Listing>) -> Self {
        Self::from_listings(listings)
    }
}

impl FromIterator<Listing> for Dataset {
    fn from_iter<I: IntoIterator<Item = Listing>>(iter: I) -> Self {
        Self::from_listings(iter.into_iter().collect())
    }
}
