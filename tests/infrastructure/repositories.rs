use crate::common;

use rolekit::domain::listing::{Entities, ListArgs, OrderBy};
use rolekit::domain::roles::RoleRepository;
use rolekit::infrastructure::config::RepositoryConfig;
use rolekit::infrastructure::repositories::roles::PostgresRoleRepository;
use rolekit::shared::translation::Translator;
use serial_test::serial;
use std::sync::Arc;

fn repository(pool: sqlx::PgPool) -> PostgresRoleRepository {
    PostgresRoleRepository::new(
        pool,
        Arc::new(RepositoryConfig::default()),
        Arc::new(Translator::english()),
    )
}

fn names(entities: &Entities<rolekit::domain::roles::Role>) -> Vec<&str> {
    entities.items().iter().map(|r| r.name.as_str()).collect()
}

#[tokio::test]
#[serial]
async fn test_get_role_list_prefix_search_ordered_by_name() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    common::seed_roles(&pool).await;

    let repo = repository(pool.clone());

    let roles = repo.get_role_list("Sales", 10, 0).await.unwrap();
    let found: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(found, vec!["Sales Admin", "Sales Team"]);

    let all = repo.get_role_list("", 0, 0).await.unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].name, "Administrator");

    let paged = repo.get_role_list("", 2, 1).await.unwrap();
    let found: Vec<&str> = paged.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(found, vec!["Sales Admin", "Sales Team"]);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_get_user_counts_returns_requested_ids() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let [admin, sales, sales_admin, support] = common::seed_roles(&pool).await;

    let repo = repository(pool.clone());

    let counts = repo
        .get_user_counts(&[admin, sales, sales_admin, support, 9999])
        .await
        .unwrap();

    let keys: Vec<i64> = counts.keys().copied().collect();
    let mut expected = vec![admin, sales, sales_admin, support, 9999];
    expected.sort();
    assert_eq!(keys, expected);
    assert_eq!(counts[&admin], 2);
    assert_eq!(counts[&sales], 3);
    assert_eq!(counts[&sales_admin], 0);
    assert_eq!(counts[&9999], 0);

    assert!(repo.get_user_counts(&[]).await.unwrap().is_empty());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_get_user_count_matches_batch() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let ids = common::seed_roles(&pool).await;

    let repo = repository(pool.clone());

    for id in ids {
        let single = repo.get_user_count(id).await.unwrap();
        let many = repo.get_user_counts(&[id]).await.unwrap();
        assert_eq!(single, many[&id]);
    }

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_is_admin_command_executes_without_parameters() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    common::seed_roles(&pool).await;

    let repo = repository(pool.clone());

    let roles = repo
        .get_entities(ListArgs::new().with_filter("is:admin"))
        .await
        .unwrap();
    assert_eq!(names(&roles), vec!["Administrator", "Sales Admin"]);
    assert!(roles.items().iter().all(|r| r.is_admin));

    let roles = repo
        .get_entities(ListArgs::new().with_filter("!is:admin"))
        .await
        .unwrap();
    assert_eq!(names(&roles), vec!["Sales Team", "Support"]);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_negated_name_command_is_complement() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    common::seed_roles(&pool).await;

    let repo = repository(pool.clone());

    let matching = repo
        .get_entities(ListArgs::new().with_filter("name:Sales"))
        .await
        .unwrap();
    let excluded = repo
        .get_entities(ListArgs::new().with_filter("!name:Sales"))
        .await
        .unwrap();
    let everything = repo.get_entities(ListArgs::new()).await.unwrap();

    assert_eq!(names(&matching), vec!["Sales Admin", "Sales Team"]);
    assert_eq!(names(&excluded), vec!["Administrator", "Support"]);
    assert_eq!(matching.total() + excluded.total(), everything.total());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_catch_all_matches_description() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    common::seed_roles(&pool).await;

    let repo = repository(pool.clone());

    let roles = repo
        .get_entities(ListArgs::new().with_filter("access"))
        .await
        .unwrap();
    assert_eq!(names(&roles), vec!["Administrator"]);

    let roles = repo
        .get_entities(ListArgs::new().with_filter("name:Sales is:admin"))
        .await
        .unwrap();
    assert_eq!(names(&roles), vec!["Sales Admin"]);

    let roles = repo
        .get_entities(ListArgs::new().with_filter("name:Support or is:admin"))
        .await
        .unwrap();
    assert_eq!(names(&roles), vec!["Administrator", "Sales Admin", "Support"]);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_negated_catch_all_keeps_roles_without_description() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    common::seed_roles(&pool).await;

    let repo = repository(pool.clone());

    let roles = repo
        .get_entities(ListArgs::new().with_filter("!staff"))
        .await
        .unwrap();
    assert_eq!(
        names(&roles),
        vec!["Administrator", "Sales Admin", "Support"]
    );

    let roles = repo
        .get_entities(ListArgs::new().with_filter("Support"))
        .await
        .unwrap();
    assert_eq!(names(&roles), vec!["Support"]);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_get_user_counts_with_many_ids() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let [admin, sales, ..] = common::seed_roles(&pool).await;

    let repo = repository(pool.clone());

    let ids: Vec<i64> = (1..=70_000).chain([admin, sales]).collect();
    let counts = repo.get_user_counts(&ids).await.unwrap();

    assert_eq!(counts.len(), 70_000);
    assert_eq!(counts[&admin], 2);
    assert_eq!(counts[&sales], 3);
    assert_eq!(counts[&70_000], 0);
    assert_eq!(counts.values().sum::<i64>(), 5);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_unknown_command_does_not_filter() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    common::seed_roles(&pool).await;

    let repo = repository(pool.clone());

    let roles = repo
        .get_entities(ListArgs::new().with_filter("color:blue"))
        .await
        .unwrap();
    assert_eq!(roles.total(), 4);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_default_order_without_paginator() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    common::seed_roles(&pool).await;

    let repo = repository(pool.clone());

    let roles = repo
        .get_entities(ListArgs::new().without_paginator())
        .await
        .unwrap();

    assert!(matches!(roles, Entities::List(_)));
    assert_eq!(
        names(&roles),
        vec!["Administrator", "Sales Admin", "Sales Team", "Support"]
    );

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_paginated_listing_counts_all_matches() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    common::seed_roles(&pool).await;

    let repo = repository(pool.clone());

    let roles = repo
        .get_entities(
            ListArgs::new()
                .with_page(1, 2)
                .with_order(OrderBy::desc("name")),
        )
        .await
        .unwrap();

    assert_eq!(roles.total(), 4);
    assert_eq!(names(&roles), vec!["Sales Team", "Sales Admin"]);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_invalid_order_column_is_rejected() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let repo = repository(pool.clone());

    let result = repo
        .get_entities(ListArgs::new().with_order(OrderBy::asc("password")))
        .await;

    assert!(result.is_err());
}
