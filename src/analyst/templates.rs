/// A canned analysis question offered next to the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTemplate {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub query: &'static str,
}

pub const TEMPLATES: &[AnalysisTemplate] = &[
    AnalysisTemplate {
        id: "a",
        label: "High-Value Agents",
        description: "Agents with transactions above average sale price",
        query: "Retrieve agents who have handled property transactions above the average sale price across the entire database.",
    },
    AnalysisTemplate {
        id: "b",
        label: "Premium City Clients",
        description: "Clients buying above city average price",
        query: "List all clients who have purchased properties more expensive than the average property price in their specific preferred city.",
    },
    AnalysisTemplate {
        id: "c",
        label: "Veteran Benchmarking",
        description: "Properties priced higher than veteran agents' sales",
        query: "Find all properties whose price is higher than any property ever sold by agents with more than 5 years of experience.",
    },
    AnalysisTemplate {
        id: "d",
        label: "Agent Personal Avg",
        description: "Sales greater than agent's own average",
        query: "Retrieve agents and their clients where a specific transaction sale price is greater than that specific agent's historical average sale price.",
    },
    AnalysisTemplate {
        id: "e",
        label: "Location Matching",
        description: "Properties matching client city preference",
        query: "Display properties and corresponding agents for which the property location matches the client's preferred city in a transaction.",
    },
    AnalysisTemplate {
        id: "f",
        label: "Commission Efficiency",
        description: "Above average commission earners",
        query: "Find agents, properties, and total commissions where the commission exceeds the average commission earned across all historical transactions.",
    },
    AnalysisTemplate {
        id: "g",
        label: "Superior Feedback",
        description: "Feedback higher than agent average",
        query: "List clients, properties, and feedback ratings where the specific client feedback is higher than the average feedback rating for that specific agent.",
    },
    AnalysisTemplate {
        id: "h",
        label: "Top Performance",
        description: "Sales exceeding company average",
        query: "Retrieve top-performing agents along with their property details where their total combined sales exceed the company's overall average transaction value.",
    },
    AnalysisTemplate {
        id: "i",
        label: "City Coverage (EXISTS)",
        description: "Agents with sales in every city",
        query: "Use EXISTS instead of IN to efficiently find agents who have sold at least one property in each city listed in the Property table, reducing nested lookups.",
    },
];

pub fn find_template(id: &str) -> Option<&'static AnalysisTemplate> {
    let id = id.trim();
    TEMPLATES.iter().find(|t| t.id.eq_ignore_ascii_case(id))
}
