use crate::commands::{build_runtime, load_config, CommandResult};
use mashti_core::config::LoadOptions;
use mashti_db::{connect_with_settings, migrations, MenuSeedDataset};

pub fn run(options: LoadOptions) -> CommandResult {
    let config = match load_config("seed", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("seed") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let seed_result = MenuSeedDataset::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;
        let verification = MenuSeedDataset::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        pool.close().await;

        if verification.all_present {
            Ok(seed_result)
        } else {
            Err(("seed_verification", verification_message(&verification.failed_checks()), 6u8))
        }
    });

    match result {
        Ok(seeded) => CommandResult::success(
            "seed",
            format!(
                "demo menu loaded: {} listed items, {} unlisted items",
                seeded.items_seeded, seeded.unlisted_seeded
            ),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn verification_message(failed_checks: &[&str]) -> String {
    if failed_checks.is_empty() {
        "Some seed data failed to load".to_string()
    } else {
        format!("Seed verification failed for checks: {}", failed_checks.join(", "))
    }
}
