//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::{self, Brand, CatalogQuery, FEATURED_BRANDS, FilterId, SortOption};
use crate::error::{AppError, Result};
use crate::locations::{STORE_LOCATIONS, StoreLocation};
use crate::models::product::format_dimensions;
use crate::models::{Product, ProductType};
use crate::state::AppState;
use crate::stores::Listing;

/// Listing query string: `?type=glasses&q=ray&filters=men,round&sort=price-low`.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub q: Option<String>,
    pub filters: Option<String>,
    pub sort: Option<String>,
}

impl ListingParams {
    fn query(&self) -> CatalogQuery {
        CatalogQuery::parse(
            self.q.as_deref(),
            self.filters.as_deref(),
            self.sort.as_deref(),
        )
    }
}

/// A filtered listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingView {
    pub products: Vec<Product>,
    pub count: usize,
    pub filters: Vec<FilterId>,
    pub sort: SortOption,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<&'static Brand>,
}

impl ListingView {
    fn new(listing: Listing, query: &CatalogQuery, brand: Option<&'static Brand>) -> Self {
        let products = catalog::apply(&listing.products, query);
        Self {
            count: products.len(),
            products,
            filters: query.filters.clone(),
            sort: query.sort,
            error: listing.error,
            brand,
        }
    }
}

/// Products of one type.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListingView>> {
    let product_type = params
        .product_type
        .as_deref()
        .unwrap_or_default()
        .parse::<ProductType>()
        .map_err(AppError::BadRequest)?;

    let listing = state.catalog().products_by_type(product_type).await;
    Ok(Json(ListingView::new(listing, &params.query(), None)))
}

/// Featured brands.
pub async fn brands() -> Json<&'static [Brand]> {
    Json(FEATURED_BRANDS)
}

/// Products of a featured brand. An unknown slug yields an empty listing.
#[instrument(skip(state))]
pub async fn brand_products(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ListingParams>,
) -> Json<ListingView> {
    let listing = state.catalog().products_by_brand(&slug).await;
    Json(ListingView::new(
        listing,
        &params.query(),
        catalog::brand_by_slug(&slug),
    ))
}

/// A product page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    /// `lens-bridge-temple` in millimetres, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    /// Shops to try the frame on in.
    pub store_locations: &'static [StoreLocation],
}

/// Shop directory.
pub async fn stores() -> Json<&'static [StoreLocation]> {
    Json(STORE_LOCATIONS)
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>> {
    let product = state
        .catalog()
        .product_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(ProductDetail {
        dimensions: format_dimensions(&product),
        store_locations: STORE_LOCATIONS,
        product,
    }))
}
