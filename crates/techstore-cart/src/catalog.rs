//! Products offered by the storefront.

use serde::{Deserialize, Serialize};

/// A product that can be added to the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Unit price in whole currency units.
    pub price: i64,
}

impl Product {
    /// Create a new product.
    pub fn new(id: i64, name: impl Into<String>, price: i64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }
}

/// The product list, in display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from a product list.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Look up a product by id.
    pub fn find(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// All products.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find() {
        let catalog = Catalog::new(vec![
            Product::new(1, "Laptop", 9000),
            Product::new(2, "Mouse", 150),
        ]);
        assert_eq!(catalog.find(2).map(|p| p.name.as_str()), Some("Mouse"));
        assert!(catalog.find(3).is_none());
    }
}
