//! Seed the Firestore catalog from a product file.
//!
//! The file is a YAML (or JSON) list of products in the same shape the
//! admin API accepts:
//!
//! ```yaml
//! - slug: rb-aviator-classic
//!   name: Aviator Classic
//!   brand: Ray-Ban
//!   type: sunglasses
//!   price: 150
//!   gender: men
//!   frameShape: round
//!   frameMaterial: metal
//! ```

use std::path::Path;

use thiserror::Error;
use tracing::{error, info};

use prime_optic_core::Price;
use prime_optic_storefront::backend::BackendError;
use prime_optic_storefront::config::ConfigError;
use prime_optic_storefront::models::ProductData;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Firebase is not configured")]
    Unconfigured,

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse products: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0} invalid products")]
    Invalid(usize),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Problems that would stop a product from being listed.
fn validate(index: usize, product: &ProductData) -> Vec<String> {
    let mut errors = Vec::new();
    for (field, value) in [
        ("slug", &product.slug),
        ("name", &product.name),
        ("brand", &product.brand),
    ] {
        if value.trim().is_empty() {
            errors.push(format!("product #{}: missing {field}", index + 1));
        }
    }
    if product.price < Price::ZERO {
        errors.push(format!("product #{} ({}): negative price", index + 1, product.slug));
    }
    errors
}

/// Parse and validate a product file.
fn parse_products(content: &str) -> Result<Vec<ProductData>, SeedError> {
    let products: Vec<ProductData> = serde_yaml::from_str(content)?;

    let errors: Vec<String> = products
        .iter()
        .enumerate()
        .flat_map(|(index, product)| validate(index, product))
        .collect();
    if !errors.is_empty() {
        error!("Product validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }
    Ok(products)
}

/// Create every product in the file.
///
/// # Errors
///
/// Returns an error if the file is unreadable or invalid, Firebase is not
/// configured, or a write fails. Products written before a failure stay.
pub async fn products(file_path: &str, dry_run: bool) -> Result<(), SeedError> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(SeedError::NotFound(file_path.to_owned()));
    }

    info!(path = %file_path, "Loading products from file");
    let content = tokio::fs::read_to_string(path).await?;
    let products = parse_products(&content)?;
    info!(count = products.len(), "Products validated");

    if dry_run {
        info!("Dry run; nothing written");
        return Ok(());
    }

    let config = super::load_config()?;
    let backend = super::firebase_backend(&config).ok_or(SeedError::Unconfigured)?;

    for product in &products {
        let id = backend.products.create(product).await?;
        info!(id = %id, slug = %product.slug, "Created product");
    }

    info!(count = products.len(), "Seeding complete");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_products_yaml() {
        let content = r"
- slug: rb-aviator
  name: Aviator Classic
  brand: Ray-Ban
  type: sunglasses
  price: 150
- slug: tf-5401
  name: FT5401
  brand: Tom Ford
  type: glasses
  price: 210.5
";
        let products = parse_products(content).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].price, Price::from_cents(21050));
    }

    #[test]
    fn test_parse_products_rejects_missing_fields() {
        let content = r#"[{"slug": "", "name": "Nameless", "brand": "Gucci", "type": "glasses", "price": 90}]"#;
        assert!(matches!(parse_products(content), Err(SeedError::Invalid(1))));
    }
}
