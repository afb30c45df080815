use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub u32);

/// Closed category set. The serialized spelling is the variant name
/// (`"Phone"`, `"Headphones"`, ...) to match the wire contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Phone,
    Laptop,
    Tablet,
    Headphones,
    Smartwatch,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Phone,
        Category::Laptop,
        Category::Tablet,
        Category::Headphones,
        Category::Smartwatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phone => "Phone",
            Self::Laptop => "Laptop",
            Self::Tablet => "Tablet",
            Self::Headphones => "Headphones",
            Self::Smartwatch => "Smartwatch",
        }
    }

    /// Lowercase spelling used in response messages ("Found 3 headphones(s) ...").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Laptop => "laptop",
            Self::Tablet => "tablet",
            Self::Headphones => "headphones",
            Self::Smartwatch => "smartwatch",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    /// Whole currency units.
    pub price: u32,
    pub specs: String,
}

#[cfg(test)]
mod tests {
    use super::{Category, Product, ProductId};

    #[test]
    fn product_serializes_with_wire_field_names() {
        let product = Product {
            id: ProductId(16),
            name: "Sony WH-1000XM5".to_string(),
            category: Category::Headphones,
            price: 399,
            specs: "Noise cancelling, 30hr battery, Bluetooth 5.2".to_string(),
        };

        let value = serde_json::to_value(&product).expect("serialize");
        assert_eq!(value["id"], 16);
        assert_eq!(value["name"], "Sony WH-1000XM5");
        assert_eq!(value["category"], "Headphones");
        assert_eq!(value["price"], 399);
        assert_eq!(value["specs"], "Noise cancelling, 30hr battery, Bluetooth 5.2");
    }

    #[test]
    fn category_labels_are_lowercase_display_names() {
        for category in Category::ALL {
            assert_eq!(category.label(), category.as_str().to_ascii_lowercase());
        }
    }
}
