//! Product catalog: the images a session may place, their connector
//! capability, and which other products they are associated with.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use canvas::item::{Capability, ImageRef, ImageSource};
use canvas::settings::{Settings, SettingsError};
use serde::Deserialize;

/// Product identifier as written in the catalog file.
pub type ProductId = u32;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid catalog settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("product {id} has invalid size {width}x{height}")]
    InvalidSize { id: ProductId, width: f64, height: f64 },
    #[error("product id {0} appears more than once")]
    DuplicateProduct(ProductId),
}

/// One placeable product.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub image: ImageRef,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub connection: Capability,
    /// Products this one is associated with.
    #[serde(default)]
    pub peers: Vec<ProductId>,
}

impl ImageSource for Product {
    fn image_ref(&self) -> ImageRef {
        self.image.clone()
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub settings: Settings,
    pub products: Vec<Product>,
}

impl Catalog {
    /// Read and validate a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Catalog::from_json`].
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&text)
    }

    /// Parse and validate a catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON, invalid settings, a product with a
    /// non-positive or non-finite size, or a repeated product id.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        self.settings.validate()?;
        let mut seen = HashSet::new();
        for p in &self.products {
            let valid = |v: f64| v.is_finite() && v > 0.0;
            if !valid(p.width) || !valid(p.height) {
                return Err(CatalogError::InvalidSize { id: p.id, width: p.width, height: p.height });
            }
            if !seen.insert(p.id) {
                return Err(CatalogError::DuplicateProduct(p.id));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}
