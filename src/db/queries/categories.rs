use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
SELECT id, "type"
FROM categories
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Categories keyed by id, the shape the listings send to clients.
pub async fn get_category_map(pool: &SqlitePool) -> sqlx::Result<BTreeMap<i64, String>> {
    Ok(get_all_categories(pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c.kind))
        .collect())
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
SELECT id, "type"
FROM categories
WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
pub(crate) async fn create_category(pool: &SqlitePool, kind: &str) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
INSERT INTO categories ("type") VALUES (?1)
        "#,
    )
    .bind(kind)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Inserts categories with their ids preserved, all or nothing.
pub async fn import_categories(pool: &SqlitePool, categories: Vec<Category>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for category in categories {
        sqlx::query(
            r#"
INSERT INTO categories (id, "type") VALUES (?1, ?2)
            "#,
        )
        .bind(category.id)
        .bind(&category.kind)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn categories_are_listed_by_id() {
        let pool = test_pool().await;
        let science = create_category(&pool, "Science").await.unwrap();
        let art = create_category(&pool, "Art").await.unwrap();

        let categories = get_all_categories(&pool).await.unwrap();
        assert_eq!(
            categories,
            vec![
                Category { id: science, kind: "Science".to_owned() },
                Category { id: art, kind: "Art".to_owned() },
            ]
        );

        let map = get_category_map(&pool).await.unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&art], "Art");
    }

    #[tokio::test]
    async fn missing_category_is_none() {
        let pool = test_pool().await;
        assert!(get_category(&pool, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn import_keeps_ids_and_rolls_back_on_conflict() {
        let pool = test_pool().await;
        import_categories(
            &pool,
            vec![
                Category { id: 3, kind: "Geography".to_owned() },
                Category { id: 5, kind: "Entertainment".to_owned() },
            ],
        )
        .await
        .unwrap();
        assert_eq!(get_category(&pool, 5).await.unwrap().unwrap().kind, "Entertainment");

        let duplicate = import_categories(
            &pool,
            vec![
                Category { id: 6, kind: "Sports".to_owned() },
                Category { id: 3, kind: "Again".to_owned() },
            ],
        )
        .await;
        assert!(duplicate.is_err());
        assert!(get_category(&pool, 6).await.unwrap().is_none());
    }
}
