//! Search, filter and sort over an in-memory product list.
//!
//! Filters come in three categories. Selected filters are ORed within a
//! category and ANDed across categories; a category with nothing selected
//! lets every product through. A product without the attribute never
//! matches an active category.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{FrameMaterial, FrameShape, Gender, Product};

/// A selectable catalog filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterId {
    Men,
    Women,
    Kids,
    Round,
    Square,
    CatEye,
    Metal,
    Plastic,
}

/// Filter category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterGroup {
    Gender,
    Shape,
    Material,
}

impl FilterId {
    pub const ALL: [Self; 8] = [
        Self::Men,
        Self::Women,
        Self::Kids,
        Self::Round,
        Self::Square,
        Self::CatEye,
        Self::Metal,
        Self::Plastic,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Kids => "kids",
            Self::Round => "round",
            Self::Square => "square",
            Self::CatEye => "cat-eye",
            Self::Metal => "metal",
            Self::Plastic => "plastic",
        }
    }

    #[must_use]
    pub const fn group(&self) -> FilterGroup {
        match self {
            Self::Men | Self::Women | Self::Kids => FilterGroup::Gender,
            Self::Round | Self::Square | Self::CatEye => FilterGroup::Shape,
            Self::Metal | Self::Plastic => FilterGroup::Material,
        }
    }

    fn matches(self, product: &Product) -> bool {
        match self {
            Self::Men => product.gender == Some(Gender::Men),
            Self::Women => product.gender == Some(Gender::Women),
            Self::Kids => product.gender == Some(Gender::Kids),
            Self::Round => product.frame_shape == Some(FrameShape::Round),
            Self::Square => product.frame_shape == Some(FrameShape::Square),
            Self::CatEye => product.frame_shape == Some(FrameShape::CatEye),
            Self::Metal => product.frame_material == Some(FrameMaterial::Metal),
            Self::Plastic => product.frame_material == Some(FrameMaterial::Plastic),
        }
    }
}

impl FromStr for FilterId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown filter: {s}"))
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    PriceLow,
    PriceHigh,
    Popular,
    /// Backend order, untouched.
    #[default]
    Newest,
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "popular" => Ok(Self::Popular),
            "newest" => Ok(Self::Newest),
            _ => Err(format!("unknown sort option: {s}")),
        }
    }
}

/// What the visitor asked for on a listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search: String,
    pub filters: Vec<FilterId>,
    pub sort: SortOption,
}

impl CatalogQuery {
    /// Build from raw query-string values.
    ///
    /// `filters` is a comma-separated list of filter ids; unknown ids are
    /// ignored. An unknown sort falls back to [`SortOption::Newest`].
    #[must_use]
    pub fn parse(search: Option<&str>, filters: Option<&str>, sort: Option<&str>) -> Self {
        let mut query = Self {
            search: search.unwrap_or_default().to_string(),
            filters: Vec::new(),
            sort: sort.and_then(|s| s.parse().ok()).unwrap_or_default(),
        };
        for id in filters
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| s.trim().parse::<FilterId>().ok())
        {
            if !query.filters.contains(&id) {
                query.filters.push(id);
            }
        }
        query
    }

    /// Select `id` if unselected, otherwise deselect it.
    pub fn toggle_filter(&mut self, id: FilterId) {
        if let Some(pos) = self.filters.iter().position(|f| *f == id) {
            self.filters.remove(pos);
        } else {
            self.filters.push(id);
        }
    }

    fn matches_search(&self, product: &Product) -> bool {
        if self.search.trim().is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        product.name.to_lowercase().contains(&needle) || product.brand.to_lowercase().contains(&needle)
    }

    fn matches_filters(&self, product: &Product) -> bool {
        [FilterGroup::Gender, FilterGroup::Shape, FilterGroup::Material]
            .into_iter()
            .all(|group| {
                let mut selected = self.filters.iter().filter(|f| f.group() == group).peekable();
                selected.peek().is_none() || selected.any(|f| f.matches(product))
            })
    }
}

fn compare(sort: SortOption, a: &Product, b: &Product) -> Ordering {
    match sort {
        SortOption::PriceLow => a.price.cmp(&b.price),
        SortOption::PriceHigh => b.price.cmp(&a.price),
        SortOption::Popular => b
            .rating
            .unwrap_or(0.0)
            .total_cmp(&a.rating.unwrap_or(0.0)),
        SortOption::Newest => Ordering::Equal,
    }
}

/// Apply search, filters and sort. The sort is stable, so ties keep the
/// input order.
#[must_use]
pub fn apply(products: &[Product], query: &CatalogQuery) -> Vec<Product> {
    let mut result: Vec<Product> = products
        .iter()
        .filter(|p| query.matches_search(p) && query.matches_filters(p))
        .cloned()
        .collect();
    result.sort_by(|a, b| compare(query.sort, a, b));
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{ProductData, ProductType};
    use prime_optic_core::Price;

    fn product(id: &str, brand: &str, price: i64) -> ProductData {
        ProductData::new(
            format!("slug-{id}"),
            format!("Model {id}"),
            brand,
            ProductType::Glasses,
            Price::from_units(price),
        )
    }

    fn catalog() -> Vec<Product> {
        let mut a = product("a", "Ray-Ban", 150);
        a.gender = Some(Gender::Men);
        a.frame_shape = Some(FrameShape::Round);
        a.frame_material = Some(FrameMaterial::Metal);
        a.rating = Some(4.5);

        let mut b = product("b", "Prada", 300);
        b.gender = Some(Gender::Women);
        b.frame_shape = Some(FrameShape::CatEye);
        b.frame_material = Some(FrameMaterial::Acetate);
        b.rating = Some(4.8);

        let mut c = product("c", "Police", 90);
        c.gender = Some(Gender::Men);
        c.frame_shape = Some(FrameShape::Square);
        c.frame_material = Some(FrameMaterial::Plastic);

        let d = product("d", "Ray-Ban", 120);

        vec![a.with_id("a"), b.with_id("b"), c.with_id("c"), d.with_id("d")]
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_search_matches_name_or_brand() {
        let query = CatalogQuery::parse(Some("RAY"), None, None);
        assert_eq!(ids(&apply(&catalog(), &query)), ["a", "d"]);

        let query = CatalogQuery::parse(Some("model c"), None, None);
        assert_eq!(ids(&apply(&catalog(), &query)), ["c"]);

        let query = CatalogQuery::parse(Some("   "), None, None);
        assert_eq!(apply(&catalog(), &query).len(), 4);
    }

    #[test]
    fn test_filters_or_within_and_across() {
        let query = CatalogQuery::parse(None, Some("men,women"), None);
        assert_eq!(ids(&apply(&catalog(), &query)), ["a", "b", "c"]);

        let query = CatalogQuery::parse(None, Some("men,metal"), None);
        assert_eq!(ids(&apply(&catalog(), &query)), ["a"]);

        let query = CatalogQuery::parse(None, Some("round,square,plastic"), None);
        assert_eq!(ids(&apply(&catalog(), &query)), ["c"]);
    }

    #[test]
    fn test_products_missing_attribute_never_match() {
        let query = CatalogQuery::parse(None, Some("kids,men,women"), None);
        assert!(!ids(&apply(&catalog(), &query)).contains(&"d"));
    }

    #[test]
    fn test_unknown_filters_are_ignored() {
        let query = CatalogQuery::parse(None, Some("men,,sparkly"), None);
        assert_eq!(query.filters, [FilterId::Men]);
    }

    #[test]
    fn test_sorting() {
        let products = catalog();

        let query = CatalogQuery::parse(None, None, Some("price-low"));
        assert_eq!(ids(&apply(&products, &query)), ["c", "d", "a", "b"]);

        let query = CatalogQuery::parse(None, None, Some("price-high"));
        assert_eq!(ids(&apply(&products, &query)), ["b", "a", "d", "c"]);

        let query = CatalogQuery::parse(None, None, Some("popular"));
        assert_eq!(ids(&apply(&products, &query)), ["b", "a", "c", "d"]);

        let query = CatalogQuery::parse(None, None, Some("newest"));
        assert_eq!(ids(&apply(&products, &query)), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_toggle_filter() {
        let mut query = CatalogQuery::default();
        query.toggle_filter(FilterId::CatEye);
        assert_eq!(query.filters, [FilterId::CatEye]);
        query.toggle_filter(FilterId::CatEye);
        assert!(query.filters.is_empty());
    }
}
