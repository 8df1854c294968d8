//! Attribute enrichment pipeline.
//!
//! Derives every recommendation attribute of a menu item from its name and
//! category by walking the ordered tables in [`rules`]. The pipeline is total:
//! unknown names and categories fall back to defaults, never to errors.

pub mod rules;

use crate::domain::item::{
    push_unique, EnrichedItem, Nutrition, RawCatalogItem, TasteProfile, Temperature,
};

use self::rules::{
    nutrition_baseline, CategoryRule, NutritionFamily, TasteOp, CAFFEINATED_TEAS,
    CATEGORY_RULES, COFFEE_MARKERS, DEFAULT_ICON, DEFAULT_ORIGIN, DEFAULT_TIME_OF_DAY,
    NAME_ICON_RULES, NAME_TAG_RULES, NAME_TEMPERATURE_RULES, NUTRITION_RULES, ORIGIN_RULES,
    TASTE_BASELINE, TASTE_RULES,
};

pub const POPULAR_SCORE: u8 = 9;

/// Stateless enricher; a unit struct so callers can hold it next to other engines.
#[derive(Clone, Copy, Debug, Default)]
pub struct Enricher;

impl Enricher {
    pub fn enrich(&self, raw: &RawCatalogItem) -> EnrichedItem {
        enrich(raw)
    }

    pub fn enrich_all(&self, raw_items: &[RawCatalogItem]) -> Vec<EnrichedItem> {
        raw_items.iter().map(enrich).collect()
    }
}

pub fn enrich(raw: &RawCatalogItem) -> EnrichedItem {
    let name = raw.name.trim().to_lowercase();
    let category_rules = matching_category_rules(&raw.category);
    let family = category_rules.iter().find_map(|rule| rule.family);

    EnrichedItem {
        temperature: derive_temperature(&category_rules, &name),
        icon: derive_icon(&category_rules, &name),
        flavors: derive_flavors(&category_rules, &name),
        health_benefits: derive_benefits(&category_rules, &name),
        time_of_day: category_rules
            .iter()
            .find_map(|rule| rule.day_parts)
            .unwrap_or(DEFAULT_TIME_OF_DAY)
            .to_vec(),
        taste_profile: derive_taste_profile(&name),
        nutrition: derive_nutrition(family, &name),
        caffeine: derive_caffeine(&raw.category, &name),
        origin: ORIGIN_RULES
            .iter()
            .find(|(keyword, _)| name.contains(keyword))
            .map(|(_, origin)| *origin)
            .unwrap_or(DEFAULT_ORIGIN)
            .to_owned(),
        popularity: derive_popularity(raw.is_popular, family),
        item: raw.clone(),
    }
}

fn matching_category_rules(category: &str) -> Vec<&'static CategoryRule> {
    CATEGORY_RULES.iter().filter(|rule| category.contains(rule.keyword)).collect()
}

fn derive_temperature(category_rules: &[&CategoryRule], name: &str) -> Temperature {
    category_rules
        .iter()
        .find_map(|rule| rule.temperature)
        .or_else(|| {
            NAME_TEMPERATURE_RULES
                .iter()
                .find(|(keyword, _)| name.contains(keyword))
                .map(|(_, temperature)| *temperature)
        })
        .unwrap_or(Temperature::Both)
}

fn derive_icon(category_rules: &[&CategoryRule], name: &str) -> String {
    NAME_ICON_RULES
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, icon)| *icon)
        .or_else(|| category_rules.iter().find_map(|rule| rule.icon))
        .unwrap_or(DEFAULT_ICON)
        .to_owned()
}

fn derive_flavors(category_rules: &[&CategoryRule], name: &str) -> Vec<String> {
    let mut flavors = Vec::new();
    for flavor in category_rules.iter().flat_map(|rule| rule.flavors) {
        push_unique(&mut flavors, flavor);
    }
    for rule in NAME_TAG_RULES.iter().filter(|rule| name.contains(rule.keyword)) {
        for flavor in rule.flavors {
            push_unique(&mut flavors, flavor);
        }
    }
    flavors
}

fn derive_benefits(category_rules: &[&CategoryRule], name: &str) -> Vec<String> {
    let mut benefits = Vec::new();
    for benefit in category_rules.iter().flat_map(|rule| rule.benefits) {
        push_unique(&mut benefits, benefit);
    }
    for rule in NAME_TAG_RULES.iter().filter(|rule| name.contains(rule.keyword)) {
        for benefit in rule.benefits {
            push_unique(&mut benefits, benefit);
        }
    }
    benefits
}

fn derive_taste_profile(name: &str) -> TasteProfile {
    let mut profile = TasteProfile {
        sweetness: 1,
        acidity: 1,
        bitterness: 1,
        creaminess: 1,
        spiciness: 1,
        freshness: 1,
    };
    for (dimension, value) in TASTE_BASELINE {
        profile.set(dimension, value as i16);
    }

    for rule in TASTE_RULES.iter().filter(|rule| name.contains(rule.keyword)) {
        for (dimension, op) in rule.effects {
            match op {
                TasteOp::Adjust(delta) => profile.adjust(*dimension, *delta),
                TasteOp::Set(value) => profile.set(*dimension, *value),
            }
        }
    }

    profile
}

fn derive_nutrition(family: Option<NutritionFamily>, name: &str) -> Nutrition {
    let baseline = nutrition_baseline(family);
    let mut calories = baseline.calories;
    let mut sugar_g = baseline.sugar_g;
    let mut protein_g = baseline.protein_g;
    let mut fat_g = baseline.fat_g;
    let mut serving_size = baseline.serving_size;

    let mut nutrition = Nutrition {
        calories: 0,
        sugar_g: 0.0,
        protein_g: 0.0,
        fat_g: 0.0,
        vitamins: to_tags(baseline.vitamins),
        minerals: to_tags(baseline.minerals),
        ingredients: to_tags(baseline.ingredients),
        allergens: to_tags(baseline.allergens),
        dietary: to_tags(baseline.dietary),
        serving_size: String::new(),
    };

    for rule in NUTRITION_RULES.iter().filter(|rule| name.contains(rule.keyword)) {
        calories += rule.calories;
        sugar_g += rule.sugar_g;
        protein_g += rule.protein_g;
        fat_g += rule.fat_g;
        union_into(&mut nutrition.vitamins, rule.vitamins);
        union_into(&mut nutrition.minerals, rule.minerals);
        union_into(&mut nutrition.ingredients, rule.ingredients);
        union_into(&mut nutrition.allergens, rule.allergens);
        union_into(&mut nutrition.dietary, rule.dietary);
        if let Some(size) = rule.serving_size {
            serving_size = size;
        }
    }

    nutrition.calories = calories.max(0) as u32;
    nutrition.sugar_g = sugar_g.max(0.0);
    nutrition.protein_g = protein_g.max(0.0);
    nutrition.fat_g = fat_g.max(0.0);
    nutrition.serving_size = serving_size.to_owned();
    nutrition
}

/// Priority chain: coffee markers first, then exact caffeinated tea names.
/// Any other "tea" (herbal, fruit) is caffeine free.
fn derive_caffeine(category: &str, name: &str) -> bool {
    let category = category.to_lowercase();
    if COFFEE_MARKERS.iter().any(|marker| category.contains(marker) || name.contains(marker)) {
        return true;
    }
    if name.contains("tea") {
        return CAFFEINATED_TEAS.contains(&name);
    }
    false
}

fn derive_popularity(is_popular: bool, family: Option<NutritionFamily>) -> u8 {
    if is_popular {
        return POPULAR_SCORE;
    }
    match family {
        Some(NutritionFamily::Coffee) => 7,
        Some(NutritionFamily::Juice) | Some(NutritionFamily::Tea) => 6,
        _ => 5,
    }
}

fn to_tags(values: &[&str]) -> Vec<String> {
    let mut tags = Vec::new();
    union_into(&mut tags, values);
    tags
}

fn union_into(tags: &mut Vec<String>, values: &[&str]) {
    for value in values {
        push_unique(tags, value);
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::item::{DayPart, RawCatalogItem, Temperature};
    use crate::enrichment::{enrich, Enricher, POPULAR_SCORE};

    fn item(name: &str, category: &str) -> RawCatalogItem {
        RawCatalogItem::new(name.to_lowercase().replace(' ', "-"), name, category)
    }

    #[test]
    fn enrichment_is_deterministic() {
        let raw = item("Saffron Ice Cream", "Ice Cream").popular();

        let first = enrich(&raw);
        let second = enrich(&raw);

        assert_eq!(first, second);
    }

    #[test]
    fn enrichment_has_no_cross_item_ordering_dependency() {
        let orange = item("Orange Juice", "Fresh Juice");
        let latte = item("Cafe Latte", "Hot Coffee");

        let forward = Enricher.enrich_all(&[orange.clone(), latte.clone()]);
        let backward = Enricher.enrich_all(&[latte, orange]);

        assert_eq!(forward[0], backward[1]);
        assert_eq!(forward[1], backward[0]);
    }

    #[test]
    fn caffeine_chain_keeps_herbal_and_fruit_teas_caffeine_free() {
        for name in ["Chamomile Tea", "Mint Medley Tea", "Lemon & Ginger Tea", "Mix Fruit Tea"] {
            assert!(!enrich(&item(name, "Herbal Tea")).caffeine, "{name} must be caffeine free");
            assert!(!enrich(&item(name, "Tea")).caffeine, "{name} must be caffeine free");
        }

        assert!(enrich(&item("Black Tea", "Tea")).caffeine);
        assert!(enrich(&item("GREEN TEA", "Tea")).caffeine);
        assert!(enrich(&item("Espresso", "Hot Coffee")).caffeine);
        assert!(enrich(&item("Cold Brew Coffee", "Cold Drinks")).caffeine);
        assert!(enrich(&item("Nescafe Gold", "Hot Drinks")).caffeine);
        assert!(!enrich(&item("Green Tea Latte Special", "Tea")).caffeine);
    }

    #[test]
    fn category_rules_decide_temperature_before_name_fallback() {
        assert_eq!(enrich(&item("Iced Latte", "Iced Coffee")).temperature, Temperature::Cold);
        assert_eq!(enrich(&item("Cafe Latte", "Hot Coffee")).temperature, Temperature::Hot);
        assert_eq!(enrich(&item("Iced Mint Lemonade", "Specials")).temperature, Temperature::Cold);
        assert_eq!(enrich(&item("House Special", "Specials")).temperature, Temperature::Both);
    }

    #[test]
    fn flavors_union_category_and_name_tags_without_duplicates() {
        let juice = enrich(&item("Sour Cherry Juice", "Fresh Juice"));

        assert_eq!(juice.flavors, vec!["fruity", "fresh", "tart"]);
        assert!(juice.has_health_benefit("antioxidants"));
        assert!(juice.has_health_benefit("hydration"));
    }

    #[test]
    fn taste_rules_apply_in_order_with_overwrites() {
        let espresso = enrich(&item("Espresso", "Hot Coffee"));
        assert_eq!(espresso.taste_profile.bitterness, 9);
        assert_eq!(espresso.taste_profile.sweetness, 1);

        // "lemon" sets acidity outright and nudges freshness; "ginger" sets spiciness.
        let lemon_ginger = enrich(&item("Lemon & Ginger Tea", "Herbal Tea"));
        assert_eq!(lemon_ginger.taste_profile.acidity, 8);
        assert_eq!(lemon_ginger.taste_profile.spiciness, 7);
        assert_eq!(lemon_ginger.taste_profile.freshness, 7);
    }

    #[test]
    fn nutrition_starts_from_family_baseline_and_applies_deltas() {
        let carrot = enrich(&item("Carrot Juice", "Fresh Juice"));
        assert_eq!(carrot.nutrition.calories, 70);
        assert!((carrot.nutrition.sugar_g - 12.0).abs() < f64::EPSILON);
        assert!(carrot.nutrition.vitamins.contains(&"vitamin a".to_owned()));
        assert_eq!(carrot.nutrition.serving_size, "300 ml");

        let espresso = enrich(&item("Espresso", "Hot Coffee"));
        assert_eq!(espresso.nutrition.calories, 3);
        assert_eq!(espresso.nutrition.serving_size, "30 ml (single shot)");

        let latte = enrich(&item("Cafe Latte", "Hot Coffee"));
        assert!(latte.nutrition.has_allergen("milk"));
        assert!(!latte.satisfies_restriction("vegan"));
        assert!(espresso.satisfies_restriction("vegan"));
    }

    #[test]
    fn unknown_items_fall_back_to_defaults() {
        let mystery = enrich(&item("Chef's Surprise", "Seasonal"));

        assert_eq!(mystery.temperature, Temperature::Both);
        assert_eq!(mystery.icon, "🍽️");
        assert!(mystery.flavors.is_empty());
        assert_eq!(mystery.time_of_day, vec![DayPart::Morning, DayPart::Afternoon]);
        assert_eq!(mystery.nutrition.calories, 150);
        assert_eq!(mystery.origin, "International");
        assert!(!mystery.caffeine);
        assert_eq!(mystery.popularity, 5);
    }

    #[test]
    fn popularity_flag_and_origin_are_derived() {
        let espresso = enrich(&item("Espresso", "Hot Coffee").popular());
        assert_eq!(espresso.popularity, POPULAR_SCORE);
        assert_eq!(espresso.origin, "Italian");

        let barberry = enrich(&item("Barberry Juice", "Fresh Juice"));
        assert_eq!(barberry.popularity, 6);
        assert_eq!(barberry.origin, "Persian");
        assert_eq!(barberry.icon, "🧃");
    }
}
