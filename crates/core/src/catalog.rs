//! Weighted node variants per category.

use serde::{Deserialize, Serialize};

use crate::error::MapGenError;
use crate::mapgen::rng::MapRng;
use crate::types::Category;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

impl Variant {
    pub fn new(name: impl Into<String>, weight: u32) -> Self {
        Self { name: name.into(), weight }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub category: Category,
    pub variants: Vec<Variant>,
}

impl CatalogEntry {
    pub fn new(category: Category, variants: Vec<Variant>) -> Self {
        Self { category, variants }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Variants registered for `category`; the first matching entry wins.
    pub fn variants(&self, category: &Category) -> &[Variant] {
        self.entries
            .iter()
            .find(|entry| &entry.category == category)
            .map_or(&[], |entry| entry.variants.as_slice())
    }

    /// Weighted pick among the variants of `category`.
    ///
    /// A roll of zero always lands on the first variant, so a category whose
    /// weights are all zero still resolves.
    pub(crate) fn pick(
        &self,
        category: &Category,
        rng: &mut MapRng,
    ) -> Result<&Variant, MapGenError> {
        let variants = self.variants(category);
        if variants.is_empty() {
            return Err(MapGenError::EmptyCategory { category: category.clone() });
        }

        let total_weight: u64 = variants.iter().map(|variant| u64::from(variant.weight)).sum();
        let mut roll = if total_weight == 0 { 0 } else { rng.below_u64(total_weight) };

        for variant in variants {
            let weight = u64::from(variant.weight);
            if roll < weight || roll == 0 {
                return Ok(variant);
            }
            roll -= weight;
        }

        Err(MapGenError::EmptyCategory { category: category.clone() })
    }
}

fn default_weight() -> u32 {
    1
}
