use crate::cli::commands::KindArg;
use crate::cli::utils::spinner;
use crate::gateway::nearby::{parse_properties, parse_sellers};
use crate::gateway::{AiGateway, NearbyKind, SearchStatus};
use anyhow::Result;
use colored::Colorize;

pub async fn handle_nearby_command(
    gateway: &AiGateway,
    lat: f64,
    lng: f64,
    kind: KindArg,
    raw: bool,
) -> Result<()> {
    let kind = NearbyKind::from(kind);

    let progress = spinner("Searching the map...");
    let search = gateway.search_grounded_by_location(lat, lng, kind).await;
    progress.finish_and_clear();

    if raw || !search.status.is_answered() {
        match search.status {
            SearchStatus::Failed(_) => println!("{}", search.text.yellow()),
            _ => println!("{}", search.text),
        }
        return Ok(());
    }

    match kind {
        NearbyKind::Listings => {
            let properties = parse_properties(&search.text);
            if properties.is_empty() {
                println!("{}", search.text);
            }
            for property in properties {
                println!("{}", property.address.bold());
                println!(
                    "  {} | {} bd / {} ba | {} sqft | {}",
                    property.price.green(),
                    property.bedrooms,
                    property.bathrooms,
                    property.sqft,
                    property.property_type
                );
            }
        }
        _ => {
            let sellers = parse_sellers(&search.text);
            if sellers.is_empty() {
                println!("{}", search.text);
            }
            for seller in sellers {
                println!("{}", seller.name.bold());
                println!("  {} | {} | {}", seller.location, seller.inventory_type, seller.contact.cyan());
            }
        }
    }

    Ok(())
}
