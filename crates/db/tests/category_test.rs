//! Integration tests for the category repository.

use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use fintrack_db::CategoryRepository;
use fintrack_db::migration::Migrator;
use fintrack_db::repositories::CategoryError;
use fintrack_shared::types::CategoryId;

async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

#[tokio::test]
async fn test_path_name_walks_to_the_root() {
    let db = setup().await;
    let repo = CategoryRepository::new(db.clone());

    let home = repo
        .create_category("Home", None)
        .await
        .expect("Failed to create category");
    let utilities = repo
        .create_category("Utilities", Some(CategoryId::from_raw(home.id)))
        .await
        .expect("Failed to create category");
    let power = repo
        .create_category("Electricity", Some(CategoryId::from_raw(utilities.id)))
        .await
        .expect("Failed to create category");

    let root = CategoryRepository::path_name(&db, CategoryId::from_raw(home.id))
        .await
        .expect("Failed to resolve path");
    assert_eq!(root, "Home");

    let mid = CategoryRepository::path_name(&db, CategoryId::from_raw(utilities.id))
        .await
        .expect("Failed to resolve path");
    assert_eq!(mid, "Home/Utilities");

    let leaf = CategoryRepository::path_name(&db, CategoryId::from_raw(power.id))
        .await
        .expect("Failed to resolve path");
    assert_eq!(leaf, "Home/Utilities/Electricity");
}

#[tokio::test]
async fn test_path_name_for_missing_category_is_unknown() {
    let db = setup().await;

    let path = CategoryRepository::path_name(&db, CategoryId::from_raw(4242))
        .await
        .expect("Failed to resolve path");
    assert_eq!(path, "Unknown");
}

#[tokio::test]
async fn test_create_category_rejects_missing_parent() {
    let db = setup().await;
    let repo = CategoryRepository::new(db.clone());

    let result = repo
        .create_category("Orphan", Some(CategoryId::from_raw(4242)))
        .await;
    assert!(matches!(result, Err(CategoryError::ParentNotFound(_))));
}

#[tokio::test]
async fn test_list_categories_returns_all() {
    let db = setup().await;
    let repo = CategoryRepository::new(db.clone());

    let food = repo
        .create_category("Food", None)
        .await
        .expect("Failed to create category");
    repo.create_category("Groceries", Some(CategoryId::from_raw(food.id)))
        .await
        .expect("Failed to create category");

    let all = repo
        .list_categories()
        .await
        .expect("Failed to list categories");
    assert_eq!(all.len(), 2);

    let found = repo
        .get_category(CategoryId::from_raw(food.id))
        .await
        .expect("Failed to get category")
        .expect("Category should exist");
    assert_eq!(found.name, "Food");
    assert!(found.parent_id.is_none());
}
