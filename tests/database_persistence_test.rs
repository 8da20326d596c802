// ABOUTME: Persistence tests for file-backed SQLite storage
// ABOUTME: Verifies schema creation on fresh paths and data survival across reopens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use anyhow::Result;
use bowlful_server::config::environment::{DatabaseConfig, DatabaseUrl};
use bowlful_server::database::Database;
use bowlful_server::models::NutritionFacts;

fn file_config(path: std::path::PathBuf) -> DatabaseConfig {
    DatabaseConfig {
        url: DatabaseUrl::SQLite { path },
        max_connections: 5,
        acquire_timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_database_file_is_created_with_parents() -> Result<()> {
    common::init_test_logging();
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("nested").join("deep").join("bowlful.db");

    let database = Database::new(&file_config(db_path.clone())).await?;
    database.users().create("ada", None, "hash").await?;

    assert!(db_path.exists());

    Ok(())
}

#[tokio::test]
async fn test_data_survives_reopen() -> Result<()> {
    common::init_test_logging();
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("bowlful.db");

    let (user_id, bowl_id, ingredient_id) = {
        let database = Database::new(&file_config(db_path.clone())).await?;
        let user = database.users().create("ada", Some("Ada"), "hash").await?;
        let ingredient_id =
            common::seed_test_ingredient(&database, "Banana", 1, (107.5, 1.3, 3.0, 14.5)).await?;

        let bowl = database
            .bowls()
            .get_or_create_unsaved(user.id, "Travel Bowl")
            .await?;
        database.bowls().add_ingredient(bowl.id, ingredient_id).await?;
        database
            .ingredients()
            .set_override(
                user.id,
                ingredient_id,
                &NutritionFacts {
                    calories: 90.0,
                    protein: 1.0,
                    fiber: 2.0,
                    sugar: 11.0,
                },
            )
            .await?;

        (user.id, bowl.id, ingredient_id)
    };

    // Fresh pool over the same file; migrations must be idempotent
    let reopened = Database::new(&file_config(db_path)).await?;

    let user = reopened
        .users()
        .get(user_id)
        .await?
        .expect("User should survive reopen");
    assert_eq!(user.username, "ada");

    let bowl = reopened
        .bowls()
        .get(bowl_id)
        .await?
        .expect("Bowl should survive reopen");
    assert_eq!(bowl.name, "Travel Bowl");
    assert_eq!(reopened.bowls().list_ingredients(bowl_id).await?.len(), 1);

    let effective = reopened
        .ingredients()
        .get_effective(ingredient_id, user_id)
        .await?
        .expect("Ingredient should survive reopen");
    assert!((effective.facts.calories - 90.0).abs() < f64::EPSILON);

    Ok(())
}
