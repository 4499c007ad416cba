//! The product record and the draft a client submits to create or update one.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A stored product.
///
/// Optional fields a client never supplied stay `None` and are left out of
/// the JSON, so what comes back is exactly what was posted plus `id`. `price`
/// keeps the number as sent: `25` stays `25`, `25.0` stays `25.0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

/// Caller-supplied fields for a create or update, before an id exists.
///
/// There is no `id` field: one sent by the client is dropped on decode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Number,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub in_stock: Option<bool>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: impl Into<Number>) -> Self {
        Self { name: name.into(), description: None, price: price.into(), category: None, in_stock: None }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = Some(in_stock);
        self
    }

    pub(crate) fn into_product(self, id: String) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            in_stock: self.in_stock,
        }
    }
}

/// The demo catalogue a fresh server starts with.
pub fn fixtures() -> Vec<ProductDraft> {
    vec![
        ProductDraft::new("Laptop", 1200)
            .description("High-performance laptop with 16GB RAM")
            .category("electronics")
            .in_stock(true),
        ProductDraft::new("Smartphone", 800)
            .description("Latest model with 128GB storage")
            .category("electronics")
            .in_stock(true),
        ProductDraft::new("Coffee Maker", 50)
            .description("Programmable coffee maker with timer")
            .category("kitchen")
            .in_stock(false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_camel_case_and_absent_fields_are_omitted() {
        let p = ProductDraft::new("Kettle", 20).in_stock(true).into_product("k1".into());
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v, serde_json::json!({"id": "k1", "name": "Kettle", "price": 20, "inStock": true}));
    }

    #[test]
    fn price_keeps_its_number_form() {
        let whole: ProductDraft = serde_json::from_str(r#"{"name":"Mug","price":25}"#).unwrap();
        let fractional: ProductDraft = serde_json::from_str(r#"{"name":"Mug","price":25.5}"#).unwrap();
        assert_eq!(serde_json::to_string(&whole.price).unwrap(), "25");
        assert_eq!(serde_json::to_string(&fractional.price).unwrap(), "25.5");
    }

    #[test]
    fn fixture_prices_are_whole_numbers() {
        let prices: Vec<String> = fixtures().iter().map(|d| d.price.to_string()).collect();
        assert_eq!(prices, ["1200", "800", "50"]);
    }

    #[test]
    fn draft_ignores_client_id_and_unknown_fields() {
        let d: ProductDraft =
            serde_json::from_str(r#"{"id":"evil","name":"Mug","price":3,"colour":"red"}"#).unwrap();
        assert_eq!(d, ProductDraft::new("Mug", 3));
    }
}
