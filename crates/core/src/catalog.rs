use std::collections::BTreeSet;

use thiserror::Error;

use crate::domain::product::{Category, Product, ProductId};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one product")]
    Empty,
    #[error("duplicate product id {0} in catalog")]
    DuplicateId(u32),
    #[error("could not parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only product catalog. Constructed once at bootstrap and shared by
/// reference; nothing mutates it afterwards.
#[derive(Clone, Debug)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen_ids = BTreeSet::new();
        for product in &products {
            if !seen_ids.insert(product.id.0) {
                return Err(CatalogError::DuplicateId(product.id.0));
            }
        }

        Ok(Self { products })
    }

    /// Parses a JSON array of products, for deployments that substitute the
    /// built-in table via `catalog.path`.
    pub fn from_json_slice(raw: &[u8]) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_slice(raw)?;
        Self::new(products)
    }

    /// The fixed consumer-electronics table the service ships with.
    pub fn builtin() -> Self {
        Self { products: builtin_products() }
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|product| product.id.0 == id)
    }

    pub fn exists(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    pub fn by_category(&self, category: Category) -> Vec<&Product> {
        self.products.iter().filter(|product| product.category == category).collect()
    }

    /// Resolves ids to products, preserving catalog order. Unknown ids are
    /// silently dropped and duplicate ids yield each product once.
    pub fn by_ids(&self, ids: &[u32]) -> Vec<&Product> {
        self.products.iter().filter(|product| ids.contains(&product.id.0)).collect()
    }
}

fn product(id: u32, name: &str, category: Category, price: u32, specs: &str) -> Product {
    Product {
        id: ProductId(id),
        name: name.to_string(),
        category,
        price,
        specs: specs.to_string(),
    }
}

fn builtin_products() -> Vec<Product> {
    use Category::{Headphones, Laptop, Phone, Smartwatch, Tablet};

    vec![
        product(1, "iPhone 14", Phone, 799, "6.1-inch display, A15 Bionic chip, 128GB"),
        product(2, "Samsung Galaxy S23", Phone, 699, "6.1-inch display, Snapdragon 8 Gen 2, 128GB"),
        product(3, "Google Pixel 7", Phone, 599, "6.3-inch display, Google Tensor G2, 128GB"),
        product(4, "OnePlus 11", Phone, 699, "6.7-inch display, Snapdragon 8 Gen 2, 128GB"),
        product(5, "Motorola Edge 40", Phone, 449, "6.55-inch display, Dimensity 8020, 256GB"),
        product(6, "iPhone SE", Phone, 429, "4.7-inch display, A15 Bionic chip, 64GB"),
        product(7, "Samsung Galaxy A54", Phone, 449, "6.4-inch display, Exynos 1380, 128GB"),
        product(8, "MacBook Air M2", Laptop, 1199, "13.6-inch display, M2 chip, 8GB RAM, 256GB SSD"),
        product(9, "Dell XPS 13", Laptop, 999, "13.4-inch display, Intel i7, 16GB RAM, 512GB SSD"),
        product(10, "HP Pavilion 15", Laptop, 649, "15.6-inch display, Intel i5, 8GB RAM, 256GB SSD"),
        product(
            11,
            "Lenovo ThinkPad E14",
            Laptop,
            749,
            "14-inch display, AMD Ryzen 5, 8GB RAM, 256GB SSD",
        ),
        product(
            12,
            "ASUS VivoBook 15",
            Laptop,
            549,
            "15.6-inch display, Intel i5, 8GB RAM, 512GB SSD",
        ),
        product(13, "iPad Air", Tablet, 599, "10.9-inch display, M1 chip, 64GB"),
        product(
            14,
            "Samsung Galaxy Tab S8",
            Tablet,
            699,
            "11-inch display, Snapdragon 8 Gen 1, 128GB",
        ),
        product(15, "Amazon Fire HD 10", Tablet, 149, "10.1-inch display, MediaTek MT8183, 32GB"),
        product(16, "Sony WH-1000XM5", Headphones, 399, "Noise cancelling, 30hr battery, Bluetooth 5.2"),
        product(
            17,
            "AirPods Pro",
            Headphones,
            249,
            "Active noise cancelling, 6hr battery, Spatial audio",
        ),
        product(18, "JBL Tune 760NC", Headphones, 129, "Noise cancelling, 35hr battery, Bluetooth 5.0"),
        product(
            19,
            "Apple Watch Series 9",
            Smartwatch,
            399,
            "Always-on display, Health sensors, GPS",
        ),
        product(
            20,
            "Samsung Galaxy Watch 6",
            Smartwatch,
            299,
            "AMOLED display, Health tracking, GPS",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogError};
    use crate::domain::product::Category;

    #[test]
    fn builtin_catalog_has_twenty_unique_products() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 20);

        let ids: Vec<u32> = catalog.all().iter().map(|product| product.id.0).collect();
        assert_eq!(ids, (1..=20).collect::<Vec<u32>>());
    }

    #[test]
    fn builtin_category_partitions_match_the_fixed_table() {
        let catalog = Catalog::builtin();

        let ids = |category| {
            catalog.by_category(category).iter().map(|product| product.id.0).collect::<Vec<u32>>()
        };

        assert_eq!(ids(Category::Phone), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(ids(Category::Laptop), vec![8, 9, 10, 11, 12]);
        assert_eq!(ids(Category::Tablet), vec![13, 14, 15]);
        assert_eq!(ids(Category::Headphones), vec![16, 17, 18]);
        assert_eq!(ids(Category::Smartwatch), vec![19, 20]);
    }

    #[test]
    fn by_ids_preserves_catalog_order_and_drops_unknown_ids() {
        let catalog = Catalog::builtin();

        let resolved = catalog.by_ids(&[18, 99, 16, 0, 17]);
        let ids: Vec<u32> = resolved.iter().map(|product| product.id.0).collect();
        assert_eq!(ids, vec![16, 17, 18]);
    }

    #[test]
    fn by_ids_yields_each_product_once_for_duplicate_ids() {
        let catalog = Catalog::builtin();

        let resolved = catalog.by_ids(&[13, 13, 13]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id.0, 13);
    }

    #[test]
    fn lookups_on_absent_ids_return_empty_never_fail() {
        let catalog = Catalog::builtin();
        assert!(!catalog.exists(42));
        assert!(catalog.get(42).is_none());
        assert!(catalog.by_ids(&[42, 43]).is_empty());
    }

    #[test]
    fn new_rejects_duplicate_ids() {
        let mut products = Catalog::builtin().all().to_vec();
        products.push(products[0].clone());

        let error = Catalog::new(products).expect_err("duplicate id should be rejected");
        assert!(matches!(error, CatalogError::DuplicateId(1)));
    }

    #[test]
    fn new_rejects_empty_catalog() {
        let error = Catalog::new(Vec::new()).expect_err("empty catalog should be rejected");
        assert!(matches!(error, CatalogError::Empty));
    }

    #[test]
    fn from_json_slice_round_trips_the_builtin_table() {
        let raw = serde_json::to_vec(Catalog::builtin().all()).expect("serialize");
        let catalog = Catalog::from_json_slice(&raw).expect("parse");
        assert_eq!(catalog.all(), Catalog::builtin().all());
    }
}
