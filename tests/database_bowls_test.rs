// ABOUTME: Unit tests for the bowl composition database module
// ABOUTME: Tests bowl lifecycle, the single-unsaved invariant, edges, and saved ordering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use anyhow::Result;
use bowlful_server::database::Database;
use bowlful_server::models::User;

/// Database with one user and one catalog ingredient
async fn setup() -> Result<(std::sync::Arc<Database>, User, i64)> {
    let database = common::create_test_database().await?;
    let user = common::create_test_user(&database).await?;
    let ingredient_id =
        common::seed_test_ingredient(&database, "Banana", 1, (107.5, 1.3, 3.0, 14.5)).await?;
    Ok((database, user, ingredient_id))
}

// ============================================================================
// Unsaved bowl lifecycle
// ============================================================================

#[tokio::test]
async fn test_get_or_create_is_stable() -> Result<()> {
    let (database, user, _) = setup().await?;

    let first = database
        .bowls()
        .get_or_create_unsaved(user.id, "My Bowl")
        .await?;
    assert!(!first.saved);
    assert_eq!(first.name, "My Bowl");
    assert_eq!(first.saved_at, None);

    // Second call returns the same bowl, ignoring the requested name
    let second = database
        .bowls()
        .get_or_create_unsaved(user.id, "Another Name")
        .await?;
    assert_eq!(second.id, first.id);
    assert_eq!(second.name, "My Bowl");

    Ok(())
}

#[tokio::test]
async fn test_partial_index_blocks_second_unsaved_bowl() -> Result<()> {
    let (database, user, _) = setup().await?;

    database
        .bowls()
        .get_or_create_unsaved(user.id, "My Bowl")
        .await?;

    // A direct insert bypassing the store must hit the partial unique index
    let result = sqlx::query(
        "INSERT INTO bowls (name, user_id, saved, created_at, saved_at) VALUES ('Dup', $1, 0, '2025-01-01T00:00:00Z', NULL)",
    )
    .bind(user.id)
    .execute(database.pool())
    .await;
    assert!(result.is_err());

    // Saved bowls are not constrained
    let saved_insert = sqlx::query(
        "INSERT INTO bowls (name, user_id, saved, created_at, saved_at) VALUES ('Kept', $1, 1, '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')",
    )
    .bind(user.id)
    .execute(database.pool())
    .await;
    assert!(saved_insert.is_ok());

    Ok(())
}

#[tokio::test]
async fn test_unsaved_bowls_are_per_user() -> Result<()> {
    let (database, user, _) = setup().await?;
    let other = common::create_test_user_named(&database, "other_user").await?;

    let mine = database
        .bowls()
        .get_or_create_unsaved(user.id, "Mine")
        .await?;
    let theirs = database
        .bowls()
        .get_or_create_unsaved(other.id, "Theirs")
        .await?;

    assert_ne!(mine.id, theirs.id);
    assert_eq!(
        database.bowls().get_unsaved(user.id).await?.map(|b| b.id),
        Some(mine.id)
    );

    Ok(())
}

#[tokio::test]
async fn test_create_replacing_unsaved_discards_previous() -> Result<()> {
    let (database, user, ingredient_id) = setup().await?;

    let old = database
        .bowls()
        .get_or_create_unsaved(user.id, "Old Bowl")
        .await?;
    database.bowls().add_ingredient(old.id, ingredient_id).await?;

    let fresh = database
        .bowls()
        .create_replacing_unsaved(user.id, "Fresh Bowl")
        .await?;

    assert_ne!(fresh.id, old.id);
    assert_eq!(fresh.name, "Fresh Bowl");
    assert!(database.bowls().get(old.id).await?.is_none());
    assert!(database.bowls().list_ingredients(fresh.id).await?.is_empty());

    // The replaced bowl's edges are gone too
    let orphaned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bowl_ingredients WHERE bowl_id = $1")
        .bind(old.id)
        .fetch_one(database.pool())
        .await?;
    assert_eq!(orphaned, 0);

    Ok(())
}

#[tokio::test]
async fn test_create_replacing_unsaved_keeps_saved_bowls() -> Result<()> {
    let (database, user, _) = setup().await?;

    let bowl = database
        .bowls()
        .get_or_create_unsaved(user.id, "Keeper")
        .await?;
    database.bowls().save(bowl.id).await?;

    database
        .bowls()
        .create_replacing_unsaved(user.id, "Fresh")
        .await?;

    let kept = database
        .bowls()
        .get(bowl.id)
        .await?
        .expect("Saved bowl should survive replacement");
    assert!(kept.saved);

    Ok(())
}

#[tokio::test]
async fn test_delete_unsaved_only_touches_unsaved() -> Result<()> {
    let (database, user, ingredient_id) = setup().await?;

    let saved = database
        .bowls()
        .get_or_create_unsaved(user.id, "Saved Bowl")
        .await?;
    database.bowls().save(saved.id).await?;

    let unsaved = database
        .bowls()
        .get_or_create_unsaved(user.id, "Work in Progress")
        .await?;
    database
        .bowls()
        .add_ingredient(unsaved.id, ingredient_id)
        .await?;

    assert!(database.bowls().delete_unsaved(user.id).await?);
    assert!(database.bowls().get(unsaved.id).await?.is_none());
    assert!(database.bowls().get(saved.id).await?.is_some());

    // Nothing left to reset
    assert!(!database.bowls().delete_unsaved(user.id).await?);

    Ok(())
}

// ============================================================================
// Ingredient edges
// ============================================================================

#[tokio::test]
async fn test_repetition_creates_distinct_edges() -> Result<()> {
    let (database, user, ingredient_id) = setup().await?;
    let bowl = database
        .bowls()
        .get_or_create_unsaved(user.id, "My Bowl")
        .await?;

    let first = database.bowls().add_ingredient(bowl.id, ingredient_id).await?;
    let second = database.bowls().add_ingredient(bowl.id, ingredient_id).await?;

    assert_ne!(first.id, second.id);

    let edges = database.bowls().list_ingredients(bowl.id).await?;
    assert_eq!(edges.len(), 2);
    assert!(edges.iter().all(|e| e.ingredient_id == ingredient_id));
    // Insertion order
    assert_eq!(edges[0].id, first.id);
    assert_eq!(edges[1].id, second.id);

    Ok(())
}

#[tokio::test]
async fn test_remove_ingredient_takes_one_occurrence() -> Result<()> {
    let (database, user, ingredient_id) = setup().await?;
    let bowl = database
        .bowls()
        .get_or_create_unsaved(user.id, "My Bowl")
        .await?;

    let first = database.bowls().add_ingredient(bowl.id, ingredient_id).await?;
    let second = database.bowls().add_ingredient(bowl.id, ingredient_id).await?;

    assert!(database.bowls().remove_ingredient(bowl.id, first.id).await?);

    let edges = database.bowls().list_ingredients(bowl.id).await?;
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].id, second.id);

    // Removing the same entry again is a miss
    assert!(!database.bowls().remove_ingredient(bowl.id, first.id).await?);

    Ok(())
}

#[tokio::test]
async fn test_remove_ingredient_checks_bowl_binding() -> Result<()> {
    let (database, user, ingredient_id) = setup().await?;
    let other = common::create_test_user_named(&database, "other_user").await?;

    let bowl = database
        .bowls()
        .get_or_create_unsaved(user.id, "Mine")
        .await?;
    let other_bowl = database
        .bowls()
        .get_or_create_unsaved(other.id, "Theirs")
        .await?;
    let edge = database.bowls().add_ingredient(bowl.id, ingredient_id).await?;

    // The entry id is valid but belongs to a different bowl
    assert!(!database
        .bowls()
        .remove_ingredient(other_bowl.id, edge.id)
        .await?);
    assert_eq!(database.bowls().list_ingredients(bowl.id).await?.len(), 1);

    Ok(())
}

// ============================================================================
// Saving
// ============================================================================

#[tokio::test]
async fn test_save_stamps_saved_at_once() -> Result<()> {
    let (database, user, _) = setup().await?;
    let bowl = database
        .bowls()
        .get_or_create_unsaved(user.id, "My Bowl")
        .await?;

    let saved = database
        .bowls()
        .save(bowl.id)
        .await?
        .expect("Bowl should exist");
    assert!(saved.saved);
    let stamp = saved.saved_at.expect("saved_at should be stamped");

    // Saving again is a no-op that preserves the original stamp
    let again = database
        .bowls()
        .save(bowl.id)
        .await?
        .expect("Bowl should exist");
    assert_eq!(again.saved_at, Some(stamp));

    Ok(())
}

#[tokio::test]
async fn test_save_missing_bowl_returns_none() -> Result<()> {
    let (database, _, _) = setup().await?;

    assert!(database.bowls().save(9999).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_saving_frees_the_unsaved_slot() -> Result<()> {
    let (database, user, _) = setup().await?;

    let first = database
        .bowls()
        .get_or_create_unsaved(user.id, "First")
        .await?;
    database.bowls().save(first.id).await?;

    // A new unsaved bowl may now be created
    let second = database
        .bowls()
        .get_or_create_unsaved(user.id, "Second")
        .await?;
    assert_ne!(second.id, first.id);
    assert!(!second.saved);

    Ok(())
}

// ============================================================================
// Rename and delete
// ============================================================================

#[tokio::test]
async fn test_rename_updates_name() -> Result<()> {
    let (database, user, _) = setup().await?;
    let bowl = database
        .bowls()
        .get_or_create_unsaved(user.id, "Old Name")
        .await?;

    let renamed = database
        .bowls()
        .rename(bowl.id, "New Name")
        .await?
        .expect("Bowl should exist");
    assert_eq!(renamed.name, "New Name");

    assert!(database.bowls().rename(9999, "Ghost").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_delete_removes_bowl_and_edges() -> Result<()> {
    let (database, user, ingredient_id) = setup().await?;
    let bowl = database
        .bowls()
        .get_or_create_unsaved(user.id, "Doomed")
        .await?;
    database.bowls().add_ingredient(bowl.id, ingredient_id).await?;

    assert!(database.bowls().delete(bowl.id).await?);
    assert!(database.bowls().get(bowl.id).await?.is_none());

    let edges: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bowl_ingredients WHERE bowl_id = $1")
        .bind(bowl.id)
        .fetch_one(database.pool())
        .await?;
    assert_eq!(edges, 0);

    // Deleting again reports a miss
    assert!(!database.bowls().delete(bowl.id).await?);

    Ok(())
}

#[tokio::test]
async fn test_deleting_user_cascades_to_bowls() -> Result<()> {
    let (database, user, ingredient_id) = setup().await?;
    let bowl = database
        .bowls()
        .get_or_create_unsaved(user.id, "My Bowl")
        .await?;
    database.bowls().add_ingredient(bowl.id, ingredient_id).await?;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(database.pool())
        .await?;

    assert!(database.bowls().get(bowl.id).await?.is_none());

    Ok(())
}

// ============================================================================
// Saved bowl listing
// ============================================================================

#[tokio::test]
async fn test_list_saved_orders_newest_first() -> Result<()> {
    let (database, user, _) = setup().await?;

    let mut saved_ids = Vec::new();
    for name in ["Breakfast", "Lunch", "Dinner"] {
        let bowl = database
            .bowls()
            .create_replacing_unsaved(user.id, name)
            .await?;
        database.bowls().save(bowl.id).await?;
        saved_ids.push(bowl.id);
    }

    // Pin identical saved_at stamps so ordering falls back to id
    sqlx::query("UPDATE bowls SET saved_at = '2025-06-01T12:00:00+00:00' WHERE user_id = $1")
        .bind(user.id)
        .execute(database.pool())
        .await?;

    let listed = database.bowls().list_saved(user.id).await?;
    let listed_ids: Vec<i64> = listed.iter().map(|b| b.id).collect();

    saved_ids.reverse();
    assert_eq!(listed_ids, saved_ids);

    Ok(())
}

#[tokio::test]
async fn test_list_saved_excludes_unsaved_and_other_users() -> Result<()> {
    let (database, user, _) = setup().await?;
    let other = common::create_test_user_named(&database, "other_user").await?;

    let mine = database
        .bowls()
        .get_or_create_unsaved(user.id, "Mine")
        .await?;
    database.bowls().save(mine.id).await?;

    // An unsaved bowl and another user's saved bowl must not appear
    database
        .bowls()
        .get_or_create_unsaved(user.id, "In Progress")
        .await?;
    let theirs = database
        .bowls()
        .get_or_create_unsaved(other.id, "Theirs")
        .await?;
    database.bowls().save(theirs.id).await?;

    let listed = database.bowls().list_saved(user.id).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine.id);

    Ok(())
}
