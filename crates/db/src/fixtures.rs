use sqlx::Executor;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Listed demo-menu rows, in display order. Every result named by the default
/// decision tree appears here.
const SEED_LISTED_ITEMS: &[(&str, &str)] = &[
    ("menu-001", "Espresso"),
    ("menu-002", "Americano"),
    ("menu-003", "Turkish Coffee"),
    ("menu-004", "Cappuccino"),
    ("menu-005", "Cafe Latte"),
    ("menu-006", "Mocha"),
    ("menu-007", "Caramel Macchiato"),
    ("menu-008", "Hot Chocolate"),
    ("menu-009", "Black Tea"),
    ("menu-010", "Green Tea"),
    ("menu-011", "Chamomile Tea"),
    ("menu-012", "Mint Medley Tea"),
    ("menu-013", "Lemon & Ginger Tea"),
    ("menu-014", "Mix Fruit Tea"),
    ("menu-015", "Mint Lemonade"),
    ("menu-016", "Iced Green Tea"),
    ("menu-017", "Orange Juice"),
    ("menu-018", "Barberry Juice"),
    ("menu-019", "Sour Cherry Juice"),
    ("menu-020", "Pomegranate Juice"),
    ("menu-021", "Watermelon Juice"),
    ("menu-022", "Mango Juice"),
    ("menu-023", "Carrot Juice"),
    ("menu-024", "Chocolate Shake"),
    ("menu-025", "Vanilla Shake"),
    ("menu-026", "Pistachio Shake"),
    ("menu-027", "Banana Smoothie"),
    ("menu-028", "Strawberry Banana Smoothie"),
    ("menu-029", "Mango Smoothie"),
    ("menu-030", "Saffron Ice Cream"),
    ("menu-031", "Faloodeh"),
    ("menu-032", "Vanilla Ice Cream"),
    ("menu-033", "Iced Americano"),
    ("menu-034", "Cold Brew Coffee"),
    ("menu-035", "Iced Latte"),
    ("menu-036", "Iced Mocha"),
    ("menu-037", "Frappe"),
];

/// Rows seeded inactive (`menu-090`) or disabled (`menu-091`).
const SEED_UNLISTED_IDS: &[&str] = &["menu-090", "menu-091"];

/// Deterministic demo menu for local runs and end-to-end tests.
pub struct MenuSeedDataset;

impl MenuSeedDataset {
    pub const SQL: &str = include_str!("../../../config/fixtures/menu_seed.sql");

    /// Loads the demo menu. Re-loading replaces the seeded rows in place.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        tracing::info!(
            event_name = "seed.loaded",
            listed = SEED_LISTED_ITEMS.len(),
            unlisted = SEED_UNLISTED_IDS.len(),
            "demo menu seeded"
        );

        Ok(SeedResult {
            items_seeded: SEED_LISTED_ITEMS.len(),
            unlisted_seeded: SEED_UNLISTED_IDS.len(),
        })
    }

    /// Names of every listed seed item, in display order.
    pub fn listed_names() -> impl Iterator<Item = &'static str> {
        SEED_LISTED_ITEMS.iter().map(|(_, name)| *name)
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let listed_ids = sql_array_from_ids(SEED_LISTED_ITEMS.iter().map(|(id, _)| *id));
        let listed_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(1) FROM menu_item WHERE id IN {listed_ids} AND active = 1 AND enabled = 1"
        ))
        .fetch_one(pool)
        .await?;
        checks.push(("listed-items", listed_count == SEED_LISTED_ITEMS.len() as i64));

        for (id, name) in SEED_LISTED_ITEMS {
            let exists: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM menu_item WHERE id = ?1 AND name = ?2)",
            )
            .bind(*id)
            .bind(*name)
            .fetch_one(pool)
            .await?;
            checks.push((*name, exists == 1));
        }

        let unlisted_ids = sql_array_from_ids(SEED_UNLISTED_IDS.iter().copied());
        let unlisted_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(1) FROM menu_item WHERE id IN {unlisted_ids} AND (active = 0 OR enabled = 0)"
        ))
        .fetch_one(pool)
        .await?;
        checks.push(("unlisted-items", unlisted_count == SEED_UNLISTED_IDS.len() as i64));

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(VerificationResult { all_present, checks })
    }

    pub async fn clean(pool: &DbPool) -> Result<(), RepositoryError> {
        let ids = sql_array_from_ids(
            SEED_LISTED_ITEMS.iter().map(|(id, _)| *id).chain(SEED_UNLISTED_IDS.iter().copied()),
        );
        sqlx::query(&format!("DELETE FROM menu_item WHERE id IN {ids}")).execute(pool).await?;
        Ok(())
    }
}

fn sql_array_from_ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    let quoted = ids.map(|id| format!("'{id}'")).collect::<Vec<_>>().join(",");
    format!("({quoted})")
}

#[derive(Debug)]
pub struct SeedResult {
    pub items_seeded: usize,
    pub unlisted_seeded: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

impl VerificationResult {
    pub fn failed_checks(&self) -> Vec<&'static str> {
        self.checks.iter().filter(|(_, passed)| !passed).map(|(label, _)| *label).collect()
    }
}
