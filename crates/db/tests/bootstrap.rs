use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    hiperflow_db::health_check(&pool).await.unwrap();

    // Roles are seeded by the tenancy migration.
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM roles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 2, "expected admin and member seed roles");

    for role in ["admin", "member"] {
        let found: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM roles WHERE name = $1")
            .bind(role)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(found.0, 1, "role {role} should be seeded exactly once");
    }
}

/// Verify pg_trgm extension is available (contact search index needs it).
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pg_trgm_available(pool: PgPool) {
    let result: (f32,) = sqlx::query_as("SELECT similarity('ana', 'ana')")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(result.0, 1.0);
}

/// Every table maintains updated_at through the shared trigger.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_trigger_fires(pool: PgPool) {
    let team: (i64,) = sqlx::query_as("INSERT INTO teams (name) VALUES ('t') RETURNING id")
        .fetch_one(&pool)
        .await
        .unwrap();

    sqlx::query("UPDATE teams SET name = 't2' WHERE id = $1")
        .bind(team.0)
        .execute(&pool)
        .await
        .unwrap();

    let (moved,): (bool,) =
        sqlx::query_as("SELECT updated_at > created_at FROM teams WHERE id = $1")
            .bind(team.0)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(moved, "updated_at should advance past created_at on UPDATE");
}
