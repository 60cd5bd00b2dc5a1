//! Catalog product types.
//!
//! Field names follow the camelCase keys of the `products` collection so a
//! decoded backend document deserializes directly into [`Product`].

use serde::{Deserialize, Serialize};

use prime_optic_core::{Price, ProductId};

/// Product line sold by the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Glasses,
    Sunglasses,
}

impl ProductType {
    /// Wire name used in backend queries.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Glasses => "glasses",
            Self::Sunglasses => "sunglasses",
        }
    }

    /// Both product lines.
    pub const ALL: [Self; 2] = [Self::Glasses, Self::Sunglasses];
}

impl std::str::FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "glasses" => Ok(Self::Glasses),
            "sunglasses" => Ok(Self::Sunglasses),
            _ => Err(format!("unknown product type: {s}")),
        }
    }
}

/// Target wearer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
    Unisex,
    Kids,
}

/// Frame material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameMaterial {
    #[serde(rename = "metal")]
    Metal,
    #[serde(rename = "plastic")]
    Plastic,
    #[serde(rename = "acetate")]
    Acetate,
    #[serde(rename = "titanium")]
    Titanium,
    #[serde(rename = "mixed")]
    Mixed,
    #[serde(rename = "nylon")]
    Nylon,
    #[serde(rename = "carbon fiber")]
    CarbonFiber,
    #[serde(rename = "TR90")]
    Tr90,
    #[serde(rename = "recycled acetate")]
    RecycledAcetate,
    #[serde(rename = "acetate/metal")]
    AcetateMetal,
}

/// Frame shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameShape {
    #[serde(rename = "round")]
    Round,
    #[serde(rename = "square")]
    Square,
    #[serde(rename = "cat-eye")]
    CatEye,
    #[serde(rename = "oval")]
    Oval,
    #[serde(rename = "aviator")]
    Aviator,
    #[serde(rename = "rectangular")]
    Rectangular,
    #[serde(rename = "oversized")]
    Oversized,
    #[serde(rename = "pilot")]
    Pilot,
    #[serde(rename = "rounded square")]
    RoundedSquare,
    #[serde(rename = "wrapped")]
    Wrapped,
    #[serde(rename = "sport")]
    Sport,
    #[serde(rename = "browline")]
    Browline,
}

/// A frame colour variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorOption {
    pub name: String,
    pub hex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A lens upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LensOption {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Additional cost of this lens type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_adjustment: Option<Price>,
}

/// Product fields without the document id.
///
/// This is what admins submit and what gets written to the backend; the id
/// is assigned by the backend on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductData {
    pub slug: String,
    pub name: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blue_light_filter: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blue_light_filter_price: Option<Price>,
    /// Average review score, 0-5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_best_seller: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub color_options: Vec<ColorOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lens_options: Vec<LensOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_material: Option<FrameMaterial>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_shape: Option<FrameShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lens_color: Option<String>,
    /// Millimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lens_width: Option<f64>,
    /// Millimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_width: Option<f64>,
    /// Millimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temple_length: Option<f64>,
    /// Millimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lens_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lense_technology: Option<String>,
    /// Grams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty: Option<String>,
}

impl ProductData {
    /// Minimal product data; every optional attribute left unset.
    #[must_use]
    pub fn new(
        slug: impl Into<String>,
        name: impl Into<String>,
        brand: impl Into<String>,
        product_type: ProductType,
        price: Price,
    ) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            brand: brand.into(),
            product_type,
            price,
            old_price: None,
            gender: None,
            image_url: None,
            blue_light_filter: None,
            blue_light_filter_price: None,
            rating: None,
            review_count: None,
            is_best_seller: None,
            is_new: None,
            color_options: Vec::new(),
            lens_options: Vec::new(),
            images: Vec::new(),
            frame_material: None,
            frame_color: None,
            frame_shape: None,
            lens_color: None,
            lens_width: None,
            bridge_width: None,
            temple_length: None,
            lens_height: None,
            sku: None,
            upc: None,
            description: None,
            features: Vec::new(),
            lense_technology: None,
            weight: None,
            origin: None,
            warranty: None,
        }
    }

    /// Attach a document id.
    #[must_use]
    pub fn with_id(self, id: impl Into<ProductId>) -> Product {
        Product {
            id: id.into(),
            data: self,
        }
    }
}

/// A catalog product with its document id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub data: ProductData,
}

impl std::ops::Deref for Product {
    type Target = ProductData;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Human-readable frame dimensions, e.g. `52-18-145`.
///
/// Returns `None` when none of lens width, bridge width and temple length is
/// known.
#[must_use]
pub fn format_dimensions(product: &ProductData) -> Option<String> {
    let parts: Vec<String> = [product.lens_width, product.bridge_width, product.temple_length]
        .into_iter()
        .flatten()
        .filter(|v| *v != 0.0)
        .map(|v| v.to_string())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("-"))
    }
}
