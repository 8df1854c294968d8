use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

/// Menu entry as delivered by the catalog source. Never mutated after fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCatalogItem {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub is_popular: bool,
    pub display_order: i32,
}

impl RawCatalogItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: ItemId(id.into()),
            name: name.into(),
            category: category.into(),
            price: Decimal::ZERO,
            is_popular: false,
            display_order: 0,
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }

    pub fn popular(mut self) -> Self {
        self.is_popular = true;
        self
    }

    pub fn with_display_order(mut self, display_order: i32) -> Self {
        self.display_order = display_order;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperature {
    Hot,
    Cold,
    Both,
}

impl Temperature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Cold => "cold",
            Self::Both => "both",
        }
    }

    /// Lenient parse used for user-supplied criteria; anything unknown is `None`.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hot" | "warm" => Some(Self::Hot),
            "cold" | "iced" => Some(Self::Cold),
            "both" | "any" => Some(Self::Both),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }

    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "morning" | "breakfast" => Some(Self::Morning),
            "afternoon" | "lunch" => Some(Self::Afternoon),
            "evening" | "dinner" => Some(Self::Evening),
            "night" | "late" => Some(Self::Night),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TasteDimension {
    Sweetness,
    Acidity,
    Bitterness,
    Creaminess,
    Spiciness,
    Freshness,
}

impl TasteDimension {
    pub const ALL: [TasteDimension; 6] = [
        Self::Sweetness,
        Self::Acidity,
        Self::Bitterness,
        Self::Creaminess,
        Self::Spiciness,
        Self::Freshness,
    ];

    /// Word shown to guests when this dimension dominates a recommendation.
    pub fn descriptor(&self) -> &'static str {
        match self {
            Self::Sweetness => "sweet",
            Self::Acidity => "tangy",
            Self::Bitterness => "bold",
            Self::Creaminess => "creamy",
            Self::Spiciness => "spicy",
            Self::Freshness => "refreshing",
        }
    }
}

pub const TASTE_MIN: u8 = 1;
pub const TASTE_MAX: u8 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasteProfile {
    pub sweetness: u8,
    pub acidity: u8,
    pub bitterness: u8,
    pub creaminess: u8,
    pub spiciness: u8,
    pub freshness: u8,
}

impl TasteProfile {
    pub fn get(&self, dimension: TasteDimension) -> u8 {
        match dimension {
            TasteDimension::Sweetness => self.sweetness,
            TasteDimension::Acidity => self.acidity,
            TasteDimension::Bitterness => self.bitterness,
            TasteDimension::Creaminess => self.creaminess,
            TasteDimension::Spiciness => self.spiciness,
            TasteDimension::Freshness => self.freshness,
        }
    }

    pub fn set(&mut self, dimension: TasteDimension, value: i16) {
        let clamped = value.clamp(TASTE_MIN as i16, TASTE_MAX as i16) as u8;
        match dimension {
            TasteDimension::Sweetness => self.sweetness = clamped,
            TasteDimension::Acidity => self.acidity = clamped,
            TasteDimension::Bitterness => self.bitterness = clamped,
            TasteDimension::Creaminess => self.creaminess = clamped,
            TasteDimension::Spiciness => self.spiciness = clamped,
            TasteDimension::Freshness => self.freshness = clamped,
        }
    }

    pub fn adjust(&mut self, dimension: TasteDimension, delta: i16) {
        let current = self.get(dimension) as i16;
        self.set(dimension, current + delta);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: u32,
    pub sugar_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub vitamins: Vec<String>,
    pub minerals: Vec<String>,
    pub ingredients: Vec<String>,
    pub allergens: Vec<String>,
    pub dietary: Vec<String>,
    pub serving_size: String,
}

impl Nutrition {
    pub fn has_allergen(&self, allergen: &str) -> bool {
        self.allergens.iter().any(|tag| tag == allergen)
    }

    pub fn has_dietary_tag(&self, tag: &str) -> bool {
        self.dietary.iter().any(|existing| existing == tag)
    }
}

/// Catalog entry plus every attribute the recommendation engine reasons about.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichedItem {
    pub item: RawCatalogItem,
    pub temperature: Temperature,
    pub icon: String,
    pub flavors: Vec<String>,
    pub health_benefits: Vec<String>,
    pub time_of_day: Vec<DayPart>,
    pub taste_profile: TasteProfile,
    pub nutrition: Nutrition,
    pub caffeine: bool,
    pub origin: String,
    pub popularity: u8,
}

impl EnrichedItem {
    pub fn title(&self) -> &str {
        &self.item.name
    }

    pub fn has_flavor(&self, flavor: &str) -> bool {
        self.flavors.iter().any(|tag| tag == flavor)
    }

    pub fn has_health_benefit(&self, benefit: &str) -> bool {
        self.health_benefits.iter().any(|tag| tag == benefit)
    }

    pub fn suits(&self, day_part: DayPart) -> bool {
        self.time_of_day.contains(&day_part)
    }

    /// A requested dietary restriction holds when the item carries the tag, or
    /// for `vegan` when the item lists neither milk nor eggs as allergens.
    pub fn satisfies_restriction(&self, restriction: &str) -> bool {
        if self.nutrition.has_dietary_tag(restriction) {
            return true;
        }
        restriction == "vegan"
            && !self.nutrition.has_allergen("milk")
            && !self.nutrition.has_allergen("eggs")
    }

    pub fn satisfies_all(&self, restrictions: &[String]) -> bool {
        restrictions.iter().all(|restriction| self.satisfies_restriction(restriction))
    }
}

/// Appends `value` unless already present, keeping first-insertion order.
pub(crate) fn push_unique(tags: &mut Vec<String>, value: &str) {
    if !tags.iter().any(|existing| existing == value) {
        tags.push(value.to_owned());
    }
}
