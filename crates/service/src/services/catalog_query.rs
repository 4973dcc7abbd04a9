//! Public catalog view: published products filtered, sorted and summarized.

use std::collections::BTreeMap;

use models::catalog::Product;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Stored order.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    TitleAsc,
}

impl SortKey {
    /// Unknown keys fall back to stored order.
    pub fn from_param(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "price_asc" => SortKey::PriceAsc,
            "price_desc" => SortKey::PriceDesc,
            "title_asc" => SortKey::TitleAsc,
            _ => SortKey::Relevance,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub category_ids: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: SortKey,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub products: Vec<Product>,
    pub total: usize,
    /// Published products per category id, before any filter.
    pub category_counts: BTreeMap<String, usize>,
    /// Highest published price, for the price slider.
    pub max_price: f64,
}

impl CatalogQuery {
    /// Parse a comma separated category list, dropping blanks.
    pub fn with_categories(mut self, raw: &str) -> Self {
        self.category_ids = raw
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    fn matches(&self, p: &Product, needle: Option<&str>) -> bool {
        if let Some(needle) = needle {
            if !p.title.to_lowercase().contains(needle) {
                return false;
            }
        }
        if !self.category_ids.is_empty() {
            match &p.category_id {
                Some(c) if self.category_ids.contains(c) => {}
                _ => return false,
            }
        }
        if self.min_price.is_some_and(|min| p.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| p.price > max) {
            return false;
        }
        true
    }

    pub fn apply(&self, all: Vec<Product>) -> CatalogPage {
        let published: Vec<Product> = all.into_iter().filter(Product::is_published).collect();

        let mut category_counts = BTreeMap::new();
        for p in &published {
            if let Some(c) = &p.category_id {
                *category_counts.entry(c.clone()).or_insert(0) += 1;
            }
        }
        let max_price = published.iter().map(|p| p.price).fold(0.0, f64::max);

        let needle = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let mut products: Vec<Product> = published
            .into_iter()
            .filter(|p| self.matches(p, needle.as_deref()))
            .collect();

        match self.sort {
            SortKey::Relevance => {}
            SortKey::PriceAsc => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortKey::PriceDesc => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortKey::TitleAsc => products.sort_by_cached_key(|p| p.title.to_lowercase()),
        }

        CatalogPage { total: products.len(), products, category_counts, max_price }
    }
}
