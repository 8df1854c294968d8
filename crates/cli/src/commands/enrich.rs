use std::str::FromStr;

use crate::commands::CommandResult;
use mashti_core::domain::item::RawCatalogItem;
use mashti_core::enrichment::Enricher;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Default)]
pub struct EnrichRequest {
    pub name: String,
    pub category: String,
    pub price: Option<String>,
    pub popular: bool,
}

/// Enriches one ad-hoc item without touching the database.
pub fn run(request: EnrichRequest) -> CommandResult {
    let mut item = RawCatalogItem::new("cli", request.name.trim(), request.category.trim());
    if let Some(price) = request.price.as_deref() {
        match Decimal::from_str(price.trim()) {
            Ok(price) => item = item.with_price(price),
            Err(error) => {
                return CommandResult::failure(
                    "enrich",
                    "invalid_input",
                    format!("price `{price}` is not a decimal number: {error}"),
                    2,
                );
            }
        }
    }
    if request.popular {
        item = item.popular();
    }

    let enriched = Enricher.enrich(&item);
    let message = format!(
        "{} {} ({}, {} kcal)",
        enriched.icon,
        enriched.title(),
        enriched.temperature.as_str(),
        enriched.nutrition.calories
    );
    CommandResult::success_with("enrich", message, &enriched)
}
