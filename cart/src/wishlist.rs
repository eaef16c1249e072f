//! Wishlist of product names.

use furnmart_core::environment::Storage;
use serde::{Deserialize, Serialize};

use crate::error::CartError;

/// Storage key for the persisted wishlist
pub const WISHLIST_STORAGE_KEY: &str = "furnmart_wishlist";

/// Ordered set of saved product names
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    products: Vec<String>,
}

impl Wishlist {
    /// Creates an empty wishlist
    #[must_use]
    pub const fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Adds `product` if absent, removes it if present
    ///
    /// Returns `true` if the product is on the wishlist afterwards.
    pub fn toggle(&mut self, product: &str) -> bool {
        if let Some(index) = self.products.iter().position(|p| p == product) {
            self.products.remove(index);
            false
        } else {
            self.products.push(product.to_string());
            true
        }
    }

    /// `true` if `product` is saved
    #[must_use]
    pub fn contains(&self, product: &str) -> bool {
        self.products.iter().any(|p| p == product)
    }

    /// Saved products, oldest first
    #[must_use]
    pub fn products(&self) -> &[String] {
        &self.products
    }

    /// Number of saved products
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// `true` when nothing is saved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Loads the wishlist saved under [`WISHLIST_STORAGE_KEY`]
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] or [`CartError::Serialization`] when the
    /// stored value cannot be read.
    pub fn load(storage: &dyn Storage) -> Result<Self, CartError> {
        match storage.load(WISHLIST_STORAGE_KEY)? {
            Some(payload) => Ok(serde_json::from_str(&payload)?),
            None => Ok(Self::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use furnmart_testing::InMemoryStorage;

    #[test]
    fn toggle_twice_restores() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.toggle("Velvet Armchair"));
        assert!(wishlist.contains("Velvet Armchair"));
        assert!(!wishlist.toggle("Velvet Armchair"));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn load_reads_json_array() {
        let storage = InMemoryStorage::with_entry(WISHLIST_STORAGE_KEY, r#"["Oak Bookshelf"]"#);
        let wishlist = Wishlist::load(&storage).unwrap();
        assert_eq!(wishlist.products(), ["Oak Bookshelf".to_string()]);

        let empty = Wishlist::load(&InMemoryStorage::new()).unwrap();
        assert_eq!(empty.len(), 0);
    }
}
