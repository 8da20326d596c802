// ABOUTME: Ingredient catalog seeding utility for the Bowlful server
// ABOUTME: Creates the nine canonical ingredients in display order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

//! Ingredient catalog seeder for the Bowlful server.
//!
//! This binary creates the canonical ingredient catalog in the database,
//! creating the schema first when the database is new. Run it once before
//! launching the API server.
//!
//! Usage:
//! ```bash
//! # Seed the catalog (uses DATABASE_URL from environment)
//! cargo run --bin seed-catalog
//!
//! # Override database URL
//! cargo run --bin seed-catalog -- --database-url sqlite:./data/bowlful.db
//!
//! # Verbose output
//! cargo run --bin seed-catalog -- -v
//!
//! # Force re-seed (refresh values for existing names, ids preserved)
//! cargo run --bin seed-catalog -- --force
//!
//! # Also create a demo login for local testing
//! cargo run --bin seed-catalog -- --demo-user
//! ```

use anyhow::Result;
use bowlful_server::config::environment::{DatabaseConfig, DatabaseUrl};
use bowlful_server::constants::{defaults, limits};
use bowlful_server::database::Database;
use clap::Parser;
use sqlx::SqlitePool;
use std::env;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "seed-catalog",
    about = "Bowlful ingredient catalog seeder",
    long_about = "Create the canonical ingredient catalog for the Bowlful app"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Force re-seed even if ingredients already exist
    #[arg(long)]
    force: bool,

    /// Also create a demo user account for local testing
    #[arg(long)]
    demo_user: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Catalog ingredient definition
struct SeedIngredient {
    name: &'static str,
    calories: f64,
    protein: f64,
    fiber: f64,
    sugar: f64,
    icon_filename: Option<&'static str>,
    bowl_image_filename: Option<&'static str>,
    is_drizzle: bool,
}

/// Demo login created by `--demo-user`
const DEMO_USERNAME: &str = "demo";
const DEMO_DISPLAY_NAME: &str = "Demo";
const DEMO_PASSWORD: &str = "demo123!";

/// The canonical catalog, in display order
const SEED_INGREDIENTS: &[SeedIngredient] = &[
    SeedIngredient {
        name: "Greek Yogurt",
        calories: 140.0,
        protein: 22.0,
        fiber: 0.5,
        sugar: 7.5,
        icon_filename: None,
        bowl_image_filename: None,
        is_drizzle: false,
    },
    SeedIngredient {
        name: "Plain Yogurt",
        calories: 140.0,
        protein: 23.0,
        fiber: 0.0,
        sugar: 7.0,
        icon_filename: None,
        bowl_image_filename: None,
        is_drizzle: false,
    },
    SeedIngredient {
        name: "Strawberry Yogurt",
        calories: 160.0,
        protein: 7.0,
        fiber: 0.5,
        sugar: 23.0,
        icon_filename: None,
        bowl_image_filename: None,
        is_drizzle: false,
    },
    SeedIngredient {
        name: "Banana",
        calories: 107.5,
        protein: 1.3,
        fiber: 3.0,
        sugar: 14.5,
        icon_filename: Some("banana_icon.PNG"),
        bowl_image_filename: Some("banana_slices.PNG"),
        is_drizzle: false,
    },
    SeedIngredient {
        name: "Blueberries",
        calories: 87.5,
        protein: 1.0,
        fiber: 3.5,
        sugar: 15.0,
        icon_filename: Some("blueberry_icon.PNG"),
        bowl_image_filename: Some("blueberry_clump.PNG"),
        is_drizzle: false,
    },
    SeedIngredient {
        name: "Strawberry",
        calories: 5.0,
        protein: 0.1,
        fiber: 1.0,
        sugar: 0.7,
        icon_filename: Some("strawberry_icon.png"),
        bowl_image_filename: Some("strawberry_slices.PNG"),
        is_drizzle: false,
    },
    SeedIngredient {
        name: "Honey",
        calories: 64.0,
        protein: 0.0,
        fiber: 0.0,
        sugar: 17.0,
        icon_filename: Some("honey_bottle.PNG"),
        bowl_image_filename: Some("honey_drizzle.PNG"),
        is_drizzle: true,
    },
    SeedIngredient {
        name: "Nuts",
        calories: 575.0,
        protein: 17.5,
        fiber: 7.0,
        sugar: 5.0,
        icon_filename: Some("nuts_icon.png"),
        bowl_image_filename: Some("nuts_slices.png"),
        is_drizzle: false,
    },
    SeedIngredient {
        name: "Peanut Butter",
        calories: 95.0,
        protein: 3.5,
        fiber: 1.5,
        sugar: 1.5,
        icon_filename: Some("peanut_icon.png"),
        bowl_image_filename: Some("peanut_drizzle.png"),
        is_drizzle: true,
    },
];

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    info!("=== Bowlful Ingredient Catalog Seeder ===");

    // Load database URL
    let database_url = args
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| defaults::DEFAULT_DATABASE_URL.into());

    // Open the database through the library so migrations run first
    info!("Connecting to database: {}", database_url);
    let config = DatabaseConfig {
        url: DatabaseUrl::parse_url(&database_url)?,
        max_connections: 1,
        acquire_timeout_secs: limits::DB_ACQUIRE_TIMEOUT_SECS,
    };
    let database = Database::new(&config).await?;

    // Check if the catalog is already populated
    let existing_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ingredients")
        .fetch_one(database.pool())
        .await?;

    if existing_count.0 > 0 && !args.force {
        info!(
            "Catalog already seeded ({} ingredients found). Use --force to re-seed.",
            existing_count.0
        );
    } else {
        info!("Seeding {} catalog ingredients...", SEED_INGREDIENTS.len());
        let seeded_count = seed_ingredients(database.pool()).await?;

        info!("");
        info!("=== Seeding Complete ===");
        info!("Seeded {} ingredients", seeded_count);
    }

    if args.demo_user {
        seed_demo_user(&database).await?;
    }

    Ok(())
}

/// Upsert a single catalog ingredient by its unique name
///
/// `ON CONFLICT DO UPDATE` keeps the existing row id, so bowls referencing
/// the ingredient survive a re-seed.
async fn insert_ingredient(
    pool: &SqlitePool,
    ingredient: &SeedIngredient,
    position: i64,
) -> Result<bool> {
    let result = sqlx::query(
        r"
        INSERT INTO ingredients (
            name, calories, protein, fiber, sugar,
            icon_filename, bowl_image_filename, is_drizzle, position
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (name) DO UPDATE SET
            calories = excluded.calories,
            protein = excluded.protein,
            fiber = excluded.fiber,
            sugar = excluded.sugar,
            icon_filename = excluded.icon_filename,
            bowl_image_filename = excluded.bowl_image_filename,
            is_drizzle = excluded.is_drizzle,
            position = excluded.position
        ",
    )
    .bind(ingredient.name)
    .bind(ingredient.calories)
    .bind(ingredient.protein)
    .bind(ingredient.fiber)
    .bind(ingredient.sugar)
    .bind(ingredient.icon_filename)
    .bind(ingredient.bowl_image_filename)
    .bind(i64::from(ingredient.is_drizzle))
    .bind(position)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {
            info!("  ✓ {}", ingredient.name);
            Ok(true)
        }
        Err(e) => {
            info!("  ✗ {} - Error: {}", ingredient.name, e);
            Ok(false)
        }
    }
}

/// Seed the full catalog into the database
async fn seed_ingredients(pool: &SqlitePool) -> Result<u32> {
    let mut seeded_count = 0u32;

    for (index, ingredient) in SEED_INGREDIENTS.iter().enumerate() {
        // Positions are 1-based display order
        #[allow(clippy::cast_possible_wrap)]
        let position = (index + 1) as i64;
        if insert_ingredient(pool, ingredient, position).await? {
            seeded_count += 1;
        }
    }

    Ok(seeded_count)
}

/// Create the demo login unless it already exists
async fn seed_demo_user(database: &Database) -> Result<()> {
    let users = database.users();

    if users.get_by_username(DEMO_USERNAME).await?.is_some() {
        info!("Demo user already exists: {}", DEMO_USERNAME);
        return Ok(());
    }

    let password_hash = bcrypt::hash(DEMO_PASSWORD, bcrypt::DEFAULT_COST)?;
    let user = users
        .create(DEMO_USERNAME, Some(DEMO_DISPLAY_NAME), &password_hash)
        .await?;

    info!("  ✓ Demo user created: {} (id {})", user.username, user.id);
    info!(
        "Demo login ready: username '{}', password '{}'",
        DEMO_USERNAME, DEMO_PASSWORD
    );
    Ok(())
}
