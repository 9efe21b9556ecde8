use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// Catalog product with its recommendation-relevant attributes.
///
/// `restrictions` holds contraindication tags; any overlap with a
/// profile's restrictions is a hard exclusion signal for the weighted
/// scorer. `benefits` is free text and only consulted by the
/// already-taking filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub restrictions: Vec<String>,
    pub target_complaints: Vec<String>,
    pub target_goals: Vec<String>,
    pub vitamin_type: Vec<String>,
    pub benefits: Vec<String>,
    pub dosage: Option<String>,
    pub active: bool,
}
