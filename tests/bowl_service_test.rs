// ABOUTME: Integration tests for the bowl composition service
// ABOUTME: Tests ownership enforcement, composition flows, and nutrition summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use anyhow::Result;
use bowlful_server::config::environment::NutritionThresholds;
use bowlful_server::database::Database;
use bowlful_server::errors::ErrorCode;
use bowlful_server::models::{NutritionFacts, User};
use bowlful_server::nutrition::NutritionLevel;
use bowlful_server::services::bowls::BowlService;

struct Setup {
    database: Arc<Database>,
    service: BowlService,
    user: User,
    banana: i64,
    honey: i64,
}

/// Service over a fresh database with one user and two catalog ingredients
async fn setup() -> Result<Setup> {
    let database = common::create_test_database().await?;
    let user = common::create_test_user(&database).await?;
    let banana =
        common::seed_test_ingredient(&database, "Banana", 1, (107.5, 1.3, 3.0, 14.5)).await?;
    let honey = common::seed_test_ingredient(&database, "Honey", 2, (64.0, 0.0, 0.0, 17.0)).await?;

    let service = BowlService::new((*database).clone(), NutritionThresholds::default());

    Ok(Setup {
        database,
        service,
        user,
        banana,
        honey,
    })
}

// ============================================================================
// Current bowl and creation
// ============================================================================

#[tokio::test]
async fn test_current_bowl_is_created_on_demand() -> Result<()> {
    let s = setup().await?;

    let view = s.service.current_bowl(s.user.id).await?;
    assert_eq!(view.name, "My Bowl");
    assert!(!view.saved);
    assert!(view.ingredients.is_empty());
    assert_eq!(view.nutrition.calories, 0.0);
    assert_eq!(view.nutrition.calories_level, NutritionLevel::Low);

    // Repeated access returns the same bowl
    let again = s.service.current_bowl(s.user.id).await?;
    assert_eq!(again.id, view.id);

    Ok(())
}

#[tokio::test]
async fn test_create_bowl_replaces_unsaved() -> Result<()> {
    let s = setup().await?;

    let old = s.service.current_bowl(s.user.id).await?;
    s.service.add_ingredient(s.user.id, old.id, s.banana).await?;

    let fresh = s.service.create_bowl(s.user.id, Some("Berry Blast")).await?;
    assert_ne!(fresh.id, old.id);
    assert_eq!(fresh.name, "Berry Blast");
    assert!(fresh.ingredients.is_empty());

    // The replaced bowl is gone entirely
    let error = s.service.bowl_view(s.user.id, old.id).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);

    Ok(())
}

#[tokio::test]
async fn test_create_bowl_defaults_and_trims_names() -> Result<()> {
    let s = setup().await?;

    let unnamed = s.service.create_bowl(s.user.id, None).await?;
    assert_eq!(unnamed.name, "My Bowl");

    let trimmed = s.service.create_bowl(s.user.id, Some("  Green Goddess  ")).await?;
    assert_eq!(trimmed.name, "Green Goddess");

    let error = s.service.create_bowl(s.user.id, Some("   ")).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    Ok(())
}

// ============================================================================
// Composition and summaries
// ============================================================================

#[tokio::test]
async fn test_each_occurrence_counts_in_the_summary() -> Result<()> {
    let s = setup().await?;
    let bowl = s.service.current_bowl(s.user.id).await?;

    s.service.add_ingredient(s.user.id, bowl.id, s.banana).await?;
    let view = s.service.add_ingredient(s.user.id, bowl.id, s.banana).await?;

    assert_eq!(view.ingredients.len(), 2);
    assert!((view.nutrition.calories - 215.0).abs() < 1e-9);
    assert!((view.nutrition.sugar - 29.0).abs() < 1e-9);

    // Two bananas cross the moderate calorie bound (200) and the high
    // sugar bound (20)
    assert_eq!(view.nutrition.calories_level, NutritionLevel::Moderate);
    assert_eq!(view.nutrition.sugar_level, NutritionLevel::High);
    assert_eq!(view.nutrition.protein_level, NutritionLevel::Low);

    Ok(())
}

#[tokio::test]
async fn test_add_unknown_ingredient_is_not_found() -> Result<()> {
    let s = setup().await?;
    let bowl = s.service.current_bowl(s.user.id).await?;

    let error = s
        .service
        .add_ingredient(s.user.id, bowl.id, 9999)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);

    let error = s
        .service
        .add_ingredient(s.user.id, bowl.id, -1)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    Ok(())
}

#[tokio::test]
async fn test_remove_takes_exactly_one_occurrence() -> Result<()> {
    let s = setup().await?;
    let bowl = s.service.current_bowl(s.user.id).await?;

    let with_two = {
        s.service.add_ingredient(s.user.id, bowl.id, s.banana).await?;
        s.service.add_ingredient(s.user.id, bowl.id, s.banana).await?
    };
    let entry_id = with_two.ingredients[0].id;

    let view = s
        .service
        .remove_ingredient(s.user.id, bowl.id, entry_id)
        .await?;
    assert_eq!(view.ingredients.len(), 1);
    assert!((view.nutrition.calories - 107.5).abs() < 1e-9);

    // The removed entry id is no longer valid
    let error = s
        .service
        .remove_ingredient(s.user.id, bowl.id, entry_id)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);

    Ok(())
}

#[tokio::test]
async fn test_summary_uses_effective_facts() -> Result<()> {
    let s = setup().await?;
    let bowl = s.service.current_bowl(s.user.id).await?;

    s.database
        .ingredients()
        .set_override(
            s.user.id,
            s.banana,
            &NutritionFacts {
                calories: 50.0,
                protein: 1.0,
                fiber: 2.0,
                sugar: 7.0,
            },
        )
        .await?;

    let view = s.service.add_ingredient(s.user.id, bowl.id, s.banana).await?;
    assert!((view.nutrition.calories - 50.0).abs() < 1e-9);
    assert!((view.ingredients[0].ingredient.facts.calories - 50.0).abs() < 1e-9);

    Ok(())
}

// ============================================================================
// Ownership guard
// ============================================================================

#[tokio::test]
async fn test_every_bowl_operation_rejects_non_owners() -> Result<()> {
    let s = setup().await?;
    let intruder = common::create_test_user_named(&s.database, "intruder").await?;
    let bowl = s.service.current_bowl(s.user.id).await?;

    let read = s.service.bowl_view(intruder.id, bowl.id).await.unwrap_err();
    assert_eq!(read.code, ErrorCode::PermissionDenied);
    assert_eq!(read.http_status(), 403);

    let add = s
        .service
        .add_ingredient(intruder.id, bowl.id, s.banana)
        .await
        .unwrap_err();
    assert_eq!(add.code, ErrorCode::PermissionDenied);

    let save = s.service.save_bowl(intruder.id, bowl.id).await.unwrap_err();
    assert_eq!(save.code, ErrorCode::PermissionDenied);

    let rename = s
        .service
        .rename_bowl(intruder.id, bowl.id, "Stolen")
        .await
        .unwrap_err();
    assert_eq!(rename.code, ErrorCode::PermissionDenied);

    let delete = s.service.delete_bowl(intruder.id, bowl.id).await.unwrap_err();
    assert_eq!(delete.code, ErrorCode::PermissionDenied);

    // The bowl is untouched after all of that
    let view = s.service.bowl_view(s.user.id, bowl.id).await?;
    assert_eq!(view.name, "My Bowl");
    assert!(view.ingredients.is_empty());
    assert!(!view.saved);

    Ok(())
}

// ============================================================================
// Saving, renaming, deleting, resetting
// ============================================================================

#[tokio::test]
async fn test_save_bowl_view_reflects_the_transition() -> Result<()> {
    let s = setup().await?;
    let bowl = s.service.current_bowl(s.user.id).await?;
    s.service.add_ingredient(s.user.id, bowl.id, s.honey).await?;

    let saved = s.service.save_bowl(s.user.id, bowl.id).await?;
    assert!(saved.saved);
    let stamp = saved.saved_at.expect("saved_at should be stamped");
    assert_eq!(saved.ingredients.len(), 1);

    // Idempotent: the stamp survives a second save
    let again = s.service.save_bowl(s.user.id, bowl.id).await?;
    assert_eq!(again.saved_at, Some(stamp));

    Ok(())
}

#[tokio::test]
async fn test_rename_bowl_validates_names() -> Result<()> {
    let s = setup().await?;
    let bowl = s.service.current_bowl(s.user.id).await?;

    let renamed = s
        .service
        .rename_bowl(s.user.id, bowl.id, "Morning Fuel")
        .await?;
    assert_eq!(renamed.name, "Morning Fuel");

    let error = s
        .service
        .rename_bowl(s.user.id, bowl.id, "  ")
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    let long_name = "x".repeat(101);
    let error = s
        .service
        .rename_bowl(s.user.id, bowl.id, &long_name)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    Ok(())
}

#[tokio::test]
async fn test_delete_bowl_then_view_is_not_found() -> Result<()> {
    let s = setup().await?;
    let bowl = s.service.current_bowl(s.user.id).await?;

    s.service.delete_bowl(s.user.id, bowl.id).await?;

    let error = s.service.bowl_view(s.user.id, bowl.id).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);

    Ok(())
}

#[tokio::test]
async fn test_reset_unsaved_reports_whether_anything_was_removed() -> Result<()> {
    let s = setup().await?;

    assert!(!s.service.reset_unsaved(s.user.id).await?);

    s.service.current_bowl(s.user.id).await?;
    assert!(s.service.reset_unsaved(s.user.id).await?);

    // The next access starts a fresh bowl
    let fresh = s.service.current_bowl(s.user.id).await?;
    assert!(fresh.ingredients.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_list_saved_returns_full_views() -> Result<()> {
    let s = setup().await?;

    assert!(s.service.list_saved(s.user.id).await?.is_empty());

    let first = s.service.create_bowl(s.user.id, Some("Protein Punch")).await?;
    s.service.add_ingredient(s.user.id, first.id, s.banana).await?;
    s.service.save_bowl(s.user.id, first.id).await?;

    let second = s.service.create_bowl(s.user.id, Some("Sweet Tooth")).await?;
    s.service.add_ingredient(s.user.id, second.id, s.honey).await?;
    s.service.add_ingredient(s.user.id, second.id, s.honey).await?;
    s.service.save_bowl(s.user.id, second.id).await?;

    let listed = s.service.list_saved(s.user.id).await?;
    assert_eq!(listed.len(), 2);

    // Most recently saved first
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[0].ingredients.len(), 2);
    assert!((listed[0].nutrition.sugar - 34.0).abs() < 1e-9);
    assert_eq!(listed[0].nutrition.sugar_level, NutritionLevel::High);
    assert_eq!(listed[1].id, first.id);
    assert_eq!(listed[1].ingredients.len(), 1);

    Ok(())
}
