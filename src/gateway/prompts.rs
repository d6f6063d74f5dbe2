use serde_json::{json, Value};

/// Fixed schema description embedded in every analyst request
pub const DB_SCHEMA: &str = "
  TABLE Properties (
    id INT PRIMARY KEY,
    address VARCHAR(255),
    city VARCHAR(100),
    price DECIMAL(12,2),
    bedrooms INT,
    bathrooms DECIMAL(3,1),
    sqft INT,
    type VARCHAR(50), -- 'Single Family', 'Condo', 'Townhouse', 'Multi-Family', 'Plot', 'Villa'
    status VARCHAR(20), -- 'For Sale', 'Pending', 'Sold'
    agent_id INT,
    listed_date DATE,
    source VARCHAR(50),
    FOREIGN KEY (agent_id) REFERENCES Agents(id)
  );

  TABLE Agents (
    id INT PRIMARY KEY,
    name VARCHAR(100),
    email VARCHAR(100),
    phone VARCHAR(30),
    experience_years INT,
    rating DECIMAL(3,2),
    commission_rate DECIMAL(4,2), -- Percentage e.g. 2.50
    specialty VARCHAR(50),
    source VARCHAR(50)
  );

  TABLE Clients (
    id INT PRIMARY KEY,
    name VARCHAR(100),
    email VARCHAR(100),
    budget DECIMAL(12,2),
    interested_in VARCHAR(255), -- comma separated property types
    status VARCHAR(20), -- 'Active', 'Cold', 'Closed'
    preferred_city VARCHAR(100)
  );

  TABLE Transactions (
    id INT PRIMARY KEY,
    agent_id INT,
    client_id INT,
    property_id INT,
    sale_price DECIMAL(12,2),
    commission DECIMAL(12,2),
    feedback_rating DECIMAL(2,1),
    transaction_date DATE,
    FOREIGN KEY (agent_id) REFERENCES Agents(id),
    FOREIGN KEY (client_id) REFERENCES Clients(id),
    FOREIGN KEY (property_id) REFERENCES Properties(id)
  );
";

/// System instruction for natural language to SQL translation
pub fn analyst_system_instruction() -> String {
    format!(
        "You are a Senior Data Analyst for EstateMind AI.\n\
         Translate natural language to optimized PostgreSQL.\n\
         Schema: {}\n\
         Rules: Prefer EXISTS over IN. Return JSON with 'sql' and 'explanation'.",
        DB_SCHEMA
    )
}

/// Response schema constraining the analyst answer to `{sql, explanation}`
pub fn analyst_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "sql": { "type": "STRING" },
            "explanation": { "type": "STRING" }
        },
        "required": ["sql", "explanation"]
    })
}

/// Portals mentioned for each search category
const PORTALS: &[(&str, &[&str])] = &[
    ("residential", &["99acres", "MagicBricks", "Housing.com", "NoBroker"]),
    ("commercial", &["99acres Commercial", "MagicBricks Commercial", "CommonFloor"]),
    ("plots", &["99acres Plots", "MagicBricks Plots", "SquareYards"]),
    ("rental", &["NoBroker", "Housing.com Rent", "MagicBricks Rent"]),
    ("luxury", &["Sotheby's International Realty", "SquareYards Luxury", "Housing.com Luxury"]),
];

const GENERAL_PORTALS: &[&str] = &["99acres", "MagicBricks", "Housing.com"];

/// Known search categories, in table order
pub fn categories() -> Vec<&'static str> {
    PORTALS.iter().map(|(category, _)| *category).collect()
}

/// Portal names for a category; unknown categories get the general list
pub fn portals_for(category: &str) -> &'static [&'static str] {
    let key = category.trim().to_lowercase();
    PORTALS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, portals)| *portals)
        .unwrap_or(GENERAL_PORTALS)
}

pub fn grounded_search_prompt(topic: &str, category: &str) -> String {
    format!(
        "Search the web for current real estate information about: {}.\n\
         Focus on listings and market data from {}.\n\
         Summarize the most relevant findings with prices in INR where available.",
        topic.trim(),
        portals_for(category).join(", ")
    )
}

/// What a map-grounded search should look for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearbyKind {
    /// Individual properties for sale
    Listings,
    Plots,
    Villas,
    /// Agencies and agents regardless of inventory
    Agencies,
}

impl NearbyKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "listings" | "properties" => Some(Self::Listings),
            "plot" | "plots" => Some(Self::Plots),
            "villa" | "villas" => Some(Self::Villas),
            "any" | "agencies" | "agents" => Some(Self::Agencies),
            _ => None,
        }
    }

    fn seller_search(self) -> &'static str {
        match self {
            Self::Plots => "Land plots and sites for sale",
            Self::Villas => "Luxury Villas for sale",
            Self::Listings | Self::Agencies => "Real Estate Agents",
        }
    }
}

pub fn location_prompt(latitude: f64, longitude: f64, kind: NearbyKind) -> String {
    match kind {
        NearbyKind::Listings => format!(
            "Find 3 real estate properties for sale near lat: {}, lng: {}. Use Google Maps.\n\
             Return JSON array with: address, price (INR), bedrooms, bathrooms, sqft, type.",
            latitude, longitude
        ),
        other => format!(
            "Find 3 sellers/agencies selling '{}' near lat: {}, lng: {}. Use Google Maps.\n\
             Return JSON array with: name, location, inventoryType, contact.",
            other.seller_search(),
            latitude,
            longitude
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_instruction_embeds_schema_and_rule() {
        let instruction = analyst_system_instruction();
        assert!(instruction.contains("TABLE Transactions"));
        assert!(instruction.contains("Prefer EXISTS over IN"));
        assert!(instruction.contains("'sql' and 'explanation'"));
    }

    #[test]
    fn test_response_schema_requires_both_fields() {
        let schema = analyst_response_schema();
        assert_eq!(schema["required"], json!(["sql", "explanation"]));
        assert_eq!(schema["properties"]["sql"]["type"], "STRING");
    }

    #[test]
    fn test_portals_lookup() {
        assert_eq!(portals_for("plots")[2], "SquareYards");
        assert_eq!(portals_for(" Residential "), portals_for("residential"));
        assert_eq!(portals_for("spaceports"), GENERAL_PORTALS);
        assert_eq!(categories().len(), PORTALS.len());
    }

    #[test]
    fn test_grounded_prompt_mentions_portals() {
        let prompt = grounded_search_prompt("2BHK in Whitefield", "rental");
        assert!(prompt.contains("2BHK in Whitefield"));
        assert!(prompt.contains("NoBroker, Housing.com Rent, MagicBricks Rent"));
    }

    #[test]
    fn test_location_prompts() {
        let listings = location_prompt(18.52, 73.85, NearbyKind::Listings);
        assert!(listings.contains("lat: 18.52, lng: 73.85"));
        assert!(listings.contains("bedrooms"));

        let villas = location_prompt(18.52, 73.85, NearbyKind::Villas);
        assert!(villas.contains("'Luxury Villas for sale'"));
        assert!(villas.contains("inventoryType"));

        let agencies = location_prompt(0.0, 0.0, NearbyKind::Agencies);
        assert!(agencies.contains("'Real Estate Agents'"));
    }

    #[test]
    fn test_nearby_kind_parse() {
        assert_eq!(NearbyKind::parse("Plot"), Some(NearbyKind::Plots));
        assert_eq!(NearbyKind::parse("any"), Some(NearbyKind::Agencies));
        assert_eq!(NearbyKind::parse("properties"), Some(NearbyKind::Listings));
        assert_eq!(NearbyKind::parse("castle"), None);
    }
}
