use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use warden_application::{
    RoleAssignmentRepository, RoleConstraint, RoleQuery, RoleRepository, RoleService,
};
use warden_core::AppError;
use warden_domain::{AuthorityKeys, NewRole, RoleId, RoleName};

use super::PostgresRoleRepository;
use crate::config::RoleStoreConfig;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
static NAME_COUNTER: AtomicU32 = AtomicU32::new(0);

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres role tests: {error}");
    }

    Some(pool)
}

fn unique_name(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.subsec_nanos())
        .unwrap_or_default();
    let sequence = NAME_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{}-{nanos}-{sequence}", std::process::id())
}

fn new_role(name: &str) -> NewRole {
    NewRole::named(RoleName::new(name).unwrap_or_else(|_| unreachable!()))
}

#[tokio::test]
async fn create_and_find_role_round_trip() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleRepository::new(pool, RoleStoreConfig::default());
    let name = unique_name("site-admin");

    let created = repository.create_role(new_role(name.as_str())).await;
    assert!(created.is_ok());
    let created = created.unwrap_or_else(|_| unreachable!());
    assert!(
        created
            .title()
            .is_some_and(|title| title.starts_with("Site admin "))
    );

    let by_id = repository.find_roles_by_ids(&[created.id()]).await;
    let by_name = repository.find_roles_by_names(&[name.clone()]).await;
    assert_eq!(by_id.unwrap_or_default(), vec![created.clone()]);
    assert_eq!(by_name.unwrap_or_default(), vec![created]);
}

#[tokio::test]
async fn creating_a_taken_name_returns_the_stored_role() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleRepository::new(pool, RoleStoreConfig::default());
    let name = unique_name("racer");

    let first = repository.create_role(new_role(name.as_str())).await;
    let second = repository.create_role(new_role(name.as_str())).await;

    assert!(first.is_ok());
    assert_eq!(
        first.map(|role| role.id()).unwrap_or_else(|_| unreachable!()),
        second.map(|role| role.id()).unwrap_or_else(|_| unreachable!())
    );
}

#[tokio::test]
async fn bulk_assignment_is_idempotent_and_retractable() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = Arc::new(PostgresRoleRepository::new(pool, RoleStoreConfig::default()));
    let service = RoleService::new(repository.clone(), repository.clone());
    let role = repository
        .create_role(new_role(unique_name("editor").as_str()))
        .await
        .unwrap_or_else(|_| unreachable!());
    let keys = AuthorityKeys::new("users", vec![1, 2, 3]).unwrap_or_else(|_| unreachable!());

    assert!(service.assign_to(&role, &keys).await.is_ok());
    assert!(service.assign_to(&role, &keys).await.is_ok());
    let holders = repository.list_assigned_authority_ids(role.id(), "users").await;
    assert_eq!(holders.unwrap_or_default(), vec![1, 2, 3]);

    let partial = AuthorityKeys::new("users", vec![2, 9]).unwrap_or_else(|_| unreachable!());
    let deleted = repository.delete_assignments(role.id(), &partial).await;
    assert_eq!(deleted.unwrap_or_default(), 1);

    assert!(service.retract_from(&role, &keys).await.is_ok());
    let holders = repository.list_assigned_authority_ids(role.id(), "users").await;
    assert!(holders.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn assignment_to_missing_role_is_not_found() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleRepository::new(pool, RoleStoreConfig::default());
    let keys = AuthorityKeys::new("users", vec![1]).unwrap_or_else(|_| unreachable!());

    let inserted = repository
        .insert_assignments(keys.assignment_records(RoleId::new(i64::MAX)))
        .await;

    assert!(matches!(inserted, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn query_scopes_filter_by_assignment() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = Arc::new(PostgresRoleRepository::new(pool, RoleStoreConfig::default()));
    let service = RoleService::new(repository.clone(), repository.clone());
    let held_name = unique_name("held");
    let free_name = unique_name("free");
    let roles = service
        .find_or_create_roles([held_name.as_str(), free_name.as_str()])
        .await
        .unwrap_or_default();
    let [held, free] = roles.as_slice() else {
        unreachable!()
    };
    let authority_type = unique_name("members");
    let keys =
        AuthorityKeys::new(authority_type.as_str(), vec![5]).unwrap_or_else(|_| unreachable!());
    assert!(service.assign_to(held, &keys).await.is_ok());

    let assigned = service.roles_assigned_to(&keys).await;
    assert_eq!(assigned.unwrap_or_default(), vec![held.clone()]);

    let mut query = RoleQuery::new().with_names(vec![held_name.clone(), free_name.clone()]);
    service.where_not_assigned_to(&mut query, &keys);
    let unassigned = service.query_roles(&query).await;
    assert_eq!(unassigned.unwrap_or_default(), vec![free.clone()]);

    let mut by_id = RoleQuery::new();
    by_id.push_constraint(RoleConstraint::IdIn(vec![free.id()]));
    let found = repository.query_roles(&by_id).await;
    assert_eq!(found.unwrap_or_default(), vec![free.clone()]);
}
