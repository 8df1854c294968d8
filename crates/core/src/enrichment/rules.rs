//! Static rule tables for the enrichment pipeline.
//!
//! Every table is an ordered list of `(predicate, effect)` pairs. Category
//! keywords match case-sensitively against the raw category label; name
//! keywords are lower-case and match against the lower-cased item name.
//! Table order is part of the contract: taste rules may overwrite a dimension
//! set by an earlier rule, and first-match tables (temperature, icon, origin,
//! day parts, nutrition family) stop at the first hit.

use crate::domain::item::{DayPart, TasteDimension, Temperature};

/// Nutrition baseline family selected by the category rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NutritionFamily {
    Coffee,
    Tea,
    Juice,
    Smoothie,
    Shake,
    IceCream,
    Dessert,
    ColdDrink,
}

#[derive(Clone, Copy, Debug)]
pub struct CategoryRule {
    pub keyword: &'static str,
    pub temperature: Option<Temperature>,
    pub icon: Option<&'static str>,
    pub flavors: &'static [&'static str],
    pub benefits: &'static [&'static str],
    pub day_parts: Option<&'static [DayPart]>,
    pub family: Option<NutritionFamily>,
}

use DayPart::{Afternoon, Evening, Morning, Night};

pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        keyword: "Iced",
        temperature: Some(Temperature::Cold),
        icon: Some("🧊"),
        flavors: &["refreshing"],
        benefits: &[],
        day_parts: None,
        family: None,
    },
    CategoryRule {
        keyword: "Coffee",
        temperature: Some(Temperature::Hot),
        icon: Some("☕"),
        flavors: &["bold", "rich"],
        benefits: &["energy", "focus"],
        day_parts: Some(&[Morning, Afternoon]),
        family: Some(NutritionFamily::Coffee),
    },
    CategoryRule {
        keyword: "Herbal",
        temperature: Some(Temperature::Hot),
        icon: Some("🌿"),
        flavors: &["floral", "soothing"],
        benefits: &["relaxation", "digestion"],
        day_parts: Some(&[Evening, Night]),
        family: Some(NutritionFamily::Tea),
    },
    CategoryRule {
        keyword: "Tea",
        temperature: Some(Temperature::Hot),
        icon: Some("🍵"),
        flavors: &["earthy"],
        benefits: &["antioxidants"],
        day_parts: Some(&[Morning, Afternoon, Evening]),
        family: Some(NutritionFamily::Tea),
    },
    CategoryRule {
        keyword: "Juice",
        temperature: Some(Temperature::Cold),
        icon: Some("🧃"),
        flavors: &["fruity", "fresh"],
        benefits: &["hydration", "immunity"],
        day_parts: Some(&[Morning, Afternoon]),
        family: Some(NutritionFamily::Juice),
    },
    CategoryRule {
        keyword: "Smoothie",
        temperature: Some(Temperature::Cold),
        icon: Some("🥤"),
        flavors: &["fruity", "creamy"],
        benefits: &["energy"],
        day_parts: Some(&[Morning, Afternoon]),
        family: Some(NutritionFamily::Smoothie),
    },
    CategoryRule {
        keyword: "Shake",
        temperature: Some(Temperature::Cold),
        icon: Some("🥛"),
        flavors: &["creamy", "sweet"],
        benefits: &["energy"],
        day_parts: Some(&[Afternoon, Evening]),
        family: Some(NutritionFamily::Shake),
    },
    CategoryRule {
        keyword: "Ice Cream",
        temperature: Some(Temperature::Cold),
        icon: Some("🍨"),
        flavors: &["creamy", "sweet"],
        benefits: &["mood"],
        day_parts: Some(&[Afternoon, Evening]),
        family: Some(NutritionFamily::IceCream),
    },
    CategoryRule {
        keyword: "Frozen",
        temperature: Some(Temperature::Cold),
        icon: Some("🍧"),
        flavors: &["sweet", "refreshing"],
        benefits: &["mood"],
        day_parts: Some(&[Afternoon, Evening]),
        family: Some(NutritionFamily::Dessert),
    },
    CategoryRule {
        keyword: "Dessert",
        temperature: Some(Temperature::Both),
        icon: Some("🍰"),
        flavors: &["sweet"],
        benefits: &["mood"],
        day_parts: Some(&[Afternoon, Evening]),
        family: Some(NutritionFamily::Dessert),
    },
    CategoryRule {
        keyword: "Cold Drinks",
        temperature: Some(Temperature::Cold),
        icon: Some("🥤"),
        flavors: &["refreshing"],
        benefits: &["hydration"],
        day_parts: Some(&[Afternoon]),
        family: Some(NutritionFamily::ColdDrink),
    },
];

pub const DEFAULT_TIME_OF_DAY: &[DayPart] = &[Morning, Afternoon];
pub const DEFAULT_ICON: &str = "🍽️";
pub const DEFAULT_ORIGIN: &str = "International";

/// Consulted only when no category rule decided the temperature.
pub const NAME_TEMPERATURE_RULES: &[(&str, Temperature)] = &[
    ("iced", Temperature::Cold),
    ("cold", Temperature::Cold),
    ("frappe", Temperature::Cold),
    ("ice cream", Temperature::Cold),
    ("shake", Temperature::Cold),
    ("smoothie", Temperature::Cold),
    ("juice", Temperature::Cold),
    ("lemonade", Temperature::Cold),
    ("hot", Temperature::Hot),
    ("espresso", Temperature::Hot),
    ("latte", Temperature::Hot),
    ("tea", Temperature::Hot),
];

/// Name icons win over the category icon.
pub const NAME_ICON_RULES: &[(&str, &str)] = &[
    ("orange", "🍊"),
    ("lemon", "🍋"),
    ("strawberry", "🍓"),
    ("mango", "🥭"),
    ("banana", "🍌"),
    ("cherry", "🍒"),
    ("watermelon", "🍉"),
    ("chocolate", "🍫"),
    ("carrot", "🥕"),
];

#[derive(Clone, Copy, Debug)]
pub struct NameTagRule {
    pub keyword: &'static str,
    pub flavors: &'static [&'static str],
    pub benefits: &'static [&'static str],
}

pub const NAME_TAG_RULES: &[NameTagRule] = &[
    NameTagRule { keyword: "espresso", flavors: &["bold", "intense"], benefits: &["focus"] },
    NameTagRule { keyword: "latte", flavors: &["creamy"], benefits: &[] },
    NameTagRule { keyword: "cappuccino", flavors: &["creamy"], benefits: &[] },
    NameTagRule { keyword: "mocha", flavors: &["rich", "sweet"], benefits: &[] },
    NameTagRule { keyword: "caramel", flavors: &["sweet"], benefits: &[] },
    NameTagRule { keyword: "chocolate", flavors: &["rich", "sweet"], benefits: &["mood"] },
    NameTagRule { keyword: "vanilla", flavors: &["sweet"], benefits: &[] },
    NameTagRule { keyword: "orange", flavors: &["citrus", "sweet"], benefits: &["immunity"] },
    NameTagRule {
        keyword: "lemon",
        flavors: &["citrus", "tart"],
        benefits: &["immunity", "digestion"],
    },
    NameTagRule { keyword: "barberry", flavors: &["tart"], benefits: &["antioxidants", "immunity"] },
    NameTagRule {
        keyword: "sour cherry",
        flavors: &["tart", "fruity"],
        benefits: &["antioxidants", "sleep"],
    },
    NameTagRule {
        keyword: "pomegranate",
        flavors: &["tart", "fruity"],
        benefits: &["antioxidants", "heart-health"],
    },
    NameTagRule { keyword: "mango", flavors: &["tropical", "sweet"], benefits: &["immunity"] },
    NameTagRule { keyword: "banana", flavors: &["sweet"], benefits: &["energy"] },
    NameTagRule { keyword: "strawberry", flavors: &["fruity", "sweet"], benefits: &["antioxidants"] },
    NameTagRule { keyword: "watermelon", flavors: &["fresh", "sweet"], benefits: &["hydration"] },
    NameTagRule { keyword: "carrot", flavors: &["earthy", "sweet"], benefits: &["vision", "immunity"] },
    NameTagRule { keyword: "ginger", flavors: &["spicy", "zesty"], benefits: &["digestion", "immunity"] },
    NameTagRule { keyword: "mint", flavors: &["refreshing"], benefits: &["digestion"] },
    NameTagRule { keyword: "chamomile", flavors: &["floral"], benefits: &["relaxation", "sleep"] },
    NameTagRule {
        keyword: "green tea",
        flavors: &["grassy"],
        benefits: &["antioxidants", "metabolism"],
    },
    NameTagRule { keyword: "black tea", flavors: &["malty"], benefits: &["focus"] },
    NameTagRule { keyword: "mix fruit", flavors: &["fruity"], benefits: &["antioxidants"] },
    NameTagRule { keyword: "saffron", flavors: &["aromatic", "floral"], benefits: &["mood"] },
    NameTagRule { keyword: "rose", flavors: &["floral"], benefits: &["relaxation"] },
    NameTagRule { keyword: "cardamom", flavors: &["aromatic", "spicy"], benefits: &["digestion"] },
    NameTagRule { keyword: "cinnamon", flavors: &["spicy", "warm"], benefits: &[] },
    NameTagRule { keyword: "pistachio", flavors: &["nutty"], benefits: &["heart-health"] },
    NameTagRule { keyword: "honey", flavors: &["sweet"], benefits: &["soothing"] },
    NameTagRule { keyword: "cold brew", flavors: &["smooth"], benefits: &[] },
    NameTagRule { keyword: "protein", flavors: &[], benefits: &["muscle-recovery"] },
];

/// First match wins.
pub const ORIGIN_RULES: &[(&str, &str)] = &[
    ("turkish", "Turkish"),
    ("saffron", "Persian"),
    ("barberry", "Persian"),
    ("sour cherry", "Persian"),
    ("faloodeh", "Persian"),
    ("pomegranate", "Persian"),
    ("rose", "Persian"),
    ("sekanjabin", "Persian"),
    ("espresso", "Italian"),
    ("cappuccino", "Italian"),
    ("latte", "Italian"),
    ("macchiato", "Italian"),
    ("affogato", "Italian"),
];

/// Caffeinated teas are recognised by exact (case-insensitive) name only.
pub const CAFFEINATED_TEAS: &[&str] = &["black tea", "green tea"];
pub const COFFEE_MARKERS: &[&str] = &["coffee", "nescafe"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TasteOp {
    Adjust(i16),
    Set(i16),
}

#[derive(Clone, Copy, Debug)]
pub struct TasteRule {
    pub keyword: &'static str,
    pub effects: &'static [(TasteDimension, TasteOp)],
}

use TasteDimension::{Acidity, Bitterness, Creaminess, Freshness, Spiciness, Sweetness};
use TasteOp::{Adjust, Set};

pub const TASTE_BASELINE: [(TasteDimension, u8); 6] = [
    (Sweetness, 4),
    (Acidity, 3),
    (Bitterness, 2),
    (Creaminess, 2),
    (Spiciness, 1),
    (Freshness, 5),
];

pub const TASTE_RULES: &[TasteRule] = &[
    TasteRule {
        keyword: "espresso",
        effects: &[(Bitterness, Set(9)), (Sweetness, Set(1)), (Creaminess, Set(1))],
    },
    TasteRule { keyword: "americano", effects: &[(Bitterness, Set(7)), (Sweetness, Set(1))] },
    TasteRule { keyword: "turkish", effects: &[(Bitterness, Set(8)), (Spiciness, Adjust(1))] },
    TasteRule {
        keyword: "latte",
        effects: &[(Creaminess, Adjust(5)), (Bitterness, Adjust(-2)), (Sweetness, Adjust(1))],
    },
    TasteRule { keyword: "cappuccino", effects: &[(Creaminess, Adjust(4)), (Bitterness, Adjust(1))] },
    TasteRule { keyword: "mocha", effects: &[(Sweetness, Adjust(4)), (Creaminess, Adjust(4))] },
    TasteRule { keyword: "macchiato", effects: &[(Sweetness, Adjust(3)), (Creaminess, Adjust(3))] },
    TasteRule { keyword: "caramel", effects: &[(Sweetness, Adjust(3))] },
    TasteRule {
        keyword: "chocolate",
        effects: &[(Sweetness, Adjust(4)), (Creaminess, Adjust(3)), (Bitterness, Adjust(1))],
    },
    TasteRule { keyword: "vanilla", effects: &[(Sweetness, Adjust(3)), (Creaminess, Adjust(2))] },
    TasteRule {
        keyword: "shake",
        effects: &[(Creaminess, Set(9)), (Sweetness, Adjust(3)), (Freshness, Adjust(-2))],
    },
    TasteRule { keyword: "smoothie", effects: &[(Creaminess, Adjust(4)), (Freshness, Adjust(2))] },
    TasteRule { keyword: "ice cream", effects: &[(Creaminess, Set(8)), (Sweetness, Adjust(4))] },
    TasteRule { keyword: "juice", effects: &[(Freshness, Adjust(3)), (Acidity, Adjust(1))] },
    TasteRule { keyword: "orange", effects: &[(Acidity, Adjust(3)), (Sweetness, Adjust(2))] },
    TasteRule { keyword: "lemon", effects: &[(Acidity, Set(8)), (Freshness, Adjust(2))] },
    TasteRule { keyword: "barberry", effects: &[(Acidity, Set(9)), (Sweetness, Adjust(-2))] },
    TasteRule { keyword: "sour cherry", effects: &[(Acidity, Adjust(4)), (Sweetness, Adjust(1))] },
    TasteRule { keyword: "pomegranate", effects: &[(Acidity, Adjust(2)), (Sweetness, Adjust(2))] },
    TasteRule { keyword: "mango", effects: &[(Sweetness, Adjust(4))] },
    TasteRule { keyword: "banana", effects: &[(Sweetness, Adjust(3)), (Creaminess, Adjust(2))] },
    TasteRule { keyword: "strawberry", effects: &[(Sweetness, Adjust(2)), (Acidity, Adjust(1))] },
    TasteRule { keyword: "carrot", effects: &[(Sweetness, Adjust(1)), (Freshness, Adjust(1))] },
    TasteRule { keyword: "watermelon", effects: &[(Freshness, Adjust(4)), (Sweetness, Adjust(2))] },
    TasteRule { keyword: "ginger", effects: &[(Spiciness, Set(7))] },
    TasteRule { keyword: "cinnamon", effects: &[(Spiciness, Adjust(3))] },
    TasteRule { keyword: "cardamom", effects: &[(Spiciness, Adjust(2))] },
    TasteRule { keyword: "mint", effects: &[(Freshness, Set(9))] },
    TasteRule { keyword: "chamomile", effects: &[(Freshness, Adjust(1)), (Sweetness, Adjust(1))] },
    TasteRule { keyword: "green tea", effects: &[(Bitterness, Adjust(3)), (Freshness, Adjust(2))] },
    TasteRule { keyword: "black tea", effects: &[(Bitterness, Adjust(4))] },
    TasteRule { keyword: "saffron", effects: &[(Sweetness, Adjust(1)), (Spiciness, Adjust(1))] },
    TasteRule { keyword: "honey", effects: &[(Sweetness, Adjust(3))] },
    TasteRule { keyword: "frappe", effects: &[(Creaminess, Adjust(4)), (Sweetness, Adjust(3))] },
    TasteRule { keyword: "iced", effects: &[(Freshness, Adjust(2))] },
];

#[derive(Clone, Copy, Debug)]
pub struct NutritionBaseline {
    pub calories: i32,
    pub sugar_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub vitamins: &'static [&'static str],
    pub minerals: &'static [&'static str],
    pub ingredients: &'static [&'static str],
    pub allergens: &'static [&'static str],
    pub dietary: &'static [&'static str],
    pub serving_size: &'static str,
}

pub const DEFAULT_NUTRITION: NutritionBaseline = NutritionBaseline {
    calories: 150,
    sugar_g: 15.0,
    protein_g: 2.0,
    fat_g: 4.0,
    vitamins: &[],
    minerals: &[],
    ingredients: &[],
    allergens: &[],
    dietary: &[],
    serving_size: "1 serving",
};

pub fn nutrition_baseline(family: Option<NutritionFamily>) -> NutritionBaseline {
    let Some(family) = family else {
        return DEFAULT_NUTRITION;
    };

    match family {
        NutritionFamily::Coffee => NutritionBaseline {
            calories: 5,
            sugar_g: 0.0,
            protein_g: 0.3,
            fat_g: 0.0,
            vitamins: &[],
            minerals: &["potassium", "magnesium"],
            ingredients: &["coffee beans", "water"],
            allergens: &[],
            dietary: &["gluten-free", "vegetarian"],
            serving_size: "240 ml",
        },
        NutritionFamily::Tea => NutritionBaseline {
            calories: 2,
            sugar_g: 0.0,
            protein_g: 0.0,
            fat_g: 0.0,
            vitamins: &[],
            minerals: &["manganese"],
            ingredients: &["water"],
            allergens: &[],
            dietary: &["vegan", "gluten-free", "dairy-free", "vegetarian"],
            serving_size: "250 ml",
        },
        NutritionFamily::Juice => NutritionBaseline {
            calories: 110,
            sugar_g: 22.0,
            protein_g: 1.0,
            fat_g: 0.3,
            vitamins: &["vitamin c"],
            minerals: &["potassium"],
            ingredients: &["fresh fruit"],
            allergens: &[],
            dietary: &["vegan", "gluten-free", "dairy-free", "vegetarian"],
            serving_size: "300 ml",
        },
        NutritionFamily::Smoothie => NutritionBaseline {
            calories: 180,
            sugar_g: 28.0,
            protein_g: 4.0,
            fat_g: 2.0,
            vitamins: &["vitamin c", "vitamin b6"],
            minerals: &["potassium", "calcium"],
            ingredients: &["fruit", "yogurt", "ice"],
            allergens: &["milk"],
            dietary: &["vegetarian", "gluten-free"],
            serving_size: "350 ml",
        },
        NutritionFamily::Shake => NutritionBaseline {
            calories: 380,
            sugar_g: 45.0,
            protein_g: 9.0,
            fat_g: 14.0,
            vitamins: &["vitamin d"],
            minerals: &["calcium"],
            ingredients: &["milk", "ice cream"],
            allergens: &["milk"],
            dietary: &["vegetarian", "gluten-free"],
            serving_size: "400 ml",
        },
        NutritionFamily::IceCream => NutritionBaseline {
            calories: 250,
            sugar_g: 24.0,
            protein_g: 4.0,
            fat_g: 13.0,
            vitamins: &["vitamin a"],
            minerals: &["calcium"],
            ingredients: &["cream", "milk", "sugar", "eggs"],
            allergens: &["milk", "eggs"],
            dietary: &["vegetarian", "gluten-free"],
            serving_size: "2 scoops (150 g)",
        },
        NutritionFamily::Dessert => NutritionBaseline {
            calories: 300,
            sugar_g: 35.0,
            protein_g: 4.0,
            fat_g: 10.0,
            vitamins: &[],
            minerals: &[],
            ingredients: &["sugar"],
            allergens: &[],
            dietary: &["vegetarian"],
            serving_size: "1 bowl (200 g)",
        },
        NutritionFamily::ColdDrink => NutritionBaseline {
            calories: 90,
            sugar_g: 20.0,
            protein_g: 0.0,
            fat_g: 0.0,
            vitamins: &[],
            minerals: &[],
            ingredients: &["water", "sugar"],
            allergens: &[],
            dietary: &["vegan", "gluten-free", "dairy-free", "vegetarian"],
            serving_size: "330 ml",
        },
    }
}

#[derive(Clone, Copy, Debug)]
pub struct NutritionRule {
    pub keyword: &'static str,
    pub calories: i32,
    pub sugar_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub vitamins: &'static [&'static str],
    pub minerals: &'static [&'static str],
    pub ingredients: &'static [&'static str],
    pub allergens: &'static [&'static str],
    pub dietary: &'static [&'static str],
    pub serving_size: Option<&'static str>,
}

const NO_NUTRITION_CHANGE: NutritionRule = NutritionRule {
    keyword: "",
    calories: 0,
    sugar_g: 0.0,
    protein_g: 0.0,
    fat_g: 0.0,
    vitamins: &[],
    minerals: &[],
    ingredients: &[],
    allergens: &[],
    dietary: &[],
    serving_size: None,
};

pub const NUTRITION_RULES: &[NutritionRule] = &[
    NutritionRule {
        keyword: "espresso",
        calories: -2,
        serving_size: Some("30 ml (single shot)"),
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule { keyword: "americano", calories: 5, ..NO_NUTRITION_CHANGE },
    NutritionRule {
        keyword: "turkish",
        calories: 2,
        ingredients: &["cardamom"],
        serving_size: Some("60 ml"),
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "latte",
        calories: 120,
        sugar_g: 10.0,
        protein_g: 6.0,
        fat_g: 5.0,
        vitamins: &["vitamin d"],
        minerals: &["calcium"],
        ingredients: &["milk"],
        allergens: &["milk"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "cappuccino",
        calories: 90,
        sugar_g: 7.0,
        protein_g: 5.0,
        fat_g: 4.0,
        minerals: &["calcium"],
        ingredients: &["milk"],
        allergens: &["milk"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "mocha",
        calories: 180,
        sugar_g: 25.0,
        protein_g: 6.0,
        fat_g: 8.0,
        ingredients: &["milk", "chocolate"],
        allergens: &["milk"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "macchiato",
        calories: 140,
        sugar_g: 20.0,
        protein_g: 5.0,
        fat_g: 5.0,
        ingredients: &["milk"],
        allergens: &["milk"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "frappe",
        calories: 150,
        sugar_g: 30.0,
        fat_g: 6.0,
        ingredients: &["milk", "ice"],
        allergens: &["milk"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "caramel",
        calories: 60,
        sugar_g: 14.0,
        ingredients: &["caramel"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "chocolate",
        calories: 90,
        sugar_g: 15.0,
        fat_g: 5.0,
        minerals: &["iron", "magnesium"],
        ingredients: &["chocolate"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "vanilla",
        calories: 20,
        sugar_g: 4.0,
        ingredients: &["vanilla"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule { keyword: "chamomile", ingredients: &["chamomile flowers"], ..NO_NUTRITION_CHANGE },
    NutritionRule { keyword: "mint", ingredients: &["mint leaves"], ..NO_NUTRITION_CHANGE },
    NutritionRule { keyword: "ginger", ingredients: &["ginger"], ..NO_NUTRITION_CHANGE },
    NutritionRule {
        keyword: "lemon",
        calories: 5,
        vitamins: &["vitamin c"],
        ingredients: &["lemon"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "lemonade",
        calories: 60,
        sugar_g: 15.0,
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "honey",
        calories: 60,
        sugar_g: 16.0,
        ingredients: &["honey"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "black tea",
        ingredients: &["black tea leaves"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "green tea",
        ingredients: &["green tea leaves"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "orange",
        vitamins: &["vitamin c", "folate"],
        minerals: &["potassium"],
        ingredients: &["orange"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "carrot",
        calories: -40,
        sugar_g: -10.0,
        vitamins: &["vitamin a", "vitamin k"],
        ingredients: &["carrot"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "barberry",
        calories: -20,
        sugar_g: -6.0,
        vitamins: &["vitamin c"],
        ingredients: &["barberry"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "sour cherry",
        calories: 10,
        vitamins: &["vitamin a"],
        ingredients: &["sour cherry"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "pomegranate",
        calories: 20,
        sugar_g: 4.0,
        vitamins: &["vitamin c", "vitamin k"],
        minerals: &["potassium"],
        ingredients: &["pomegranate"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "watermelon",
        calories: -30,
        sugar_g: -4.0,
        vitamins: &["vitamin a"],
        ingredients: &["watermelon"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "mango",
        calories: 30,
        sugar_g: 8.0,
        vitamins: &["vitamin a", "vitamin c"],
        ingredients: &["mango"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "banana",
        calories: 40,
        sugar_g: 6.0,
        protein_g: 1.0,
        vitamins: &["vitamin b6"],
        minerals: &["potassium"],
        ingredients: &["banana"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "strawberry",
        calories: -10,
        vitamins: &["vitamin c"],
        ingredients: &["strawberry"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "pistachio",
        calories: 80,
        protein_g: 4.0,
        fat_g: 7.0,
        minerals: &["magnesium"],
        ingredients: &["pistachio"],
        allergens: &["tree nuts"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule { keyword: "saffron", calories: 10, ingredients: &["saffron"], ..NO_NUTRITION_CHANGE },
    NutritionRule {
        keyword: "faloodeh",
        calories: -60,
        ingredients: &["rice noodles", "rose water"],
        dietary: &["dairy-free"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule { keyword: "rose", ingredients: &["rose water"], ..NO_NUTRITION_CHANGE },
    NutritionRule { keyword: "cinnamon", ingredients: &["cinnamon"], ..NO_NUTRITION_CHANGE },
    NutritionRule { keyword: "cardamom", ingredients: &["cardamom"], ..NO_NUTRITION_CHANGE },
    NutritionRule {
        keyword: "coconut",
        calories: 60,
        fat_g: 6.0,
        ingredients: &["coconut"],
        ..NO_NUTRITION_CHANGE
    },
    NutritionRule {
        keyword: "protein",
        calories: 60,
        protein_g: 20.0,
        ingredients: &["whey protein"],
        allergens: &["milk"],
        ..NO_NUTRITION_CHANGE
    },
];
