//! Featured brands.

use serde::Serialize;

/// A brand with its own landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Brand {
    pub slug: &'static str,
    pub name: &'static str,
}

/// Brands shown in navigation, in display order.
pub const FEATURED_BRANDS: &[Brand] = &[
    Brand { slug: "ray-ban", name: "Ray-Ban" },
    Brand { slug: "police", name: "Police" },
    Brand { slug: "tom-ford", name: "Tom Ford" },
    Brand { slug: "gucci", name: "Gucci" },
    Brand { slug: "chanel", name: "Chanel" },
    Brand { slug: "cartier", name: "Cartier" },
    Brand { slug: "prada", name: "Prada" },
    Brand { slug: "tommy-hilfiger", name: "Tommy Hilfiger" },
];

/// Look up a featured brand by slug, ignoring case.
#[must_use]
pub fn brand_by_slug(slug: &str) -> Option<&'static Brand> {
    let slug = slug.to_lowercase();
    FEATURED_BRANDS.iter().find(|brand| brand.slug == slug)
}

/// Display name stored on products for the brand with this slug.
#[must_use]
pub fn brand_name_for_slug(slug: &str) -> Option<&'static str> {
    brand_by_slug(slug).map(|brand| brand.name)
}
