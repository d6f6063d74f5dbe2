//! Typed views over the JSON arrays requested by the location prompts.
//!
//! Model output is loosely shaped (numbers arrive as strings and the other
//! way round), so fields are read leniently and anything unparseable yields
//! an empty list.

use crate::gateway::service::strip_code_fences;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyProperty {
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub price: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bedrooms: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bathrooms: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sqft: String,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub property_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbySeller {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub inventory_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn parse_array<T: DeserializeOwned>(text: &str) -> Vec<T> {
    match serde_json::from_str::<Vec<T>>(strip_code_fences(text)) {
        Ok(items) => items,
        Err(e) => {
            tracing::debug!("Location answer is not a JSON array: {}", e);
            Vec::new()
        }
    }
}

pub fn parse_properties(text: &str) -> Vec<NearbyProperty> {
    parse_array(text)
}

pub fn parse_sellers(text: &str) -> Vec<NearbySeller> {
    parse_array(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_properties_fenced_and_mixed_types() {
        let text = r#"```json
[
  {"address": "12 MG Road, Bengaluru", "price": 12500000, "bedrooms": 3, "bathrooms": "2", "sqft": 1450, "type": "Apartment"},
  {"address": "Plot 7, Hinjewadi", "price": "₹85 L", "bedrooms": null, "type": "Plot"}
]
```"#;

        let properties = parse_properties(text);
        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].price, "12500000");
        assert_eq!(properties[0].bathrooms, "2");
        assert_eq!(properties[0].property_type, "Apartment");
        assert_eq!(properties[1].price, "₹85 L");
        assert_eq!(properties[1].bedrooms, "");
        assert_eq!(properties[1].sqft, "");
    }

    #[test]
    fn test_parse_sellers() {
        let text = r#"[{"name": "Prestige Realty", "location": "Koramangala", "inventoryType": "Villas", "contact": "+91 80 1234 5678"}]"#;

        let sellers = parse_sellers(text);
        assert_eq!(sellers.len(), 1);
        assert_eq!(sellers[0].inventory_type, "Villas");
    }

    #[test]
    fn test_prose_yields_empty_list() {
        assert!(parse_properties("I could not find any listings nearby.").is_empty());
        assert!(parse_sellers("").is_empty());
    }
}
