use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Serialize, Deserialize, sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

/// Category labels keyed by id, the shape the API hands to clients.
pub type CategoryMap = BTreeMap<i64, String>;

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
SELECT id, type
FROM categories
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_category_map(pool: &SqlitePool) -> sqlx::Result<CategoryMap> {
    Ok(get_all_categories(pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c.kind))
        .collect())
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
SELECT id, type
FROM categories
WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn import_categories(pool: &SqlitePool, categories: Vec<Category>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for category in categories {
        sqlx::query(
            r#"
INSERT INTO categories (id, type) VALUES (?1, ?2)
ON CONFLICT (id) DO UPDATE SET type = excluded.type
            "#,
        )
        .bind(category.id)
        .bind(category.kind)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory_pool;

    #[tokio::test]
    async fn category_map_is_keyed_by_id() {
        let pool = in_memory_pool().await.unwrap();
        let map = get_category_map(&pool).await.unwrap();
        assert_eq!(map.get(&1).map(String::as_str), Some("Science"));
        assert_eq!(map.get(&6).map(String::as_str), Some("Sports"));
        assert_eq!(map.len(), 6);
    }

    #[tokio::test]
    async fn missing_category_is_none() {
        let pool = in_memory_pool().await.unwrap();
        assert!(get_category(&pool, 441).await.unwrap().is_none());
        assert_eq!(
            get_category(&pool, 3).await.unwrap().map(|c| c.kind),
            Some("Geography".to_owned())
        );
    }

    #[tokio::test]
    async fn import_upserts_by_id() {
        let pool = in_memory_pool().await.unwrap();
        import_categories(
            &pool,
            vec![
                Category {
                    id: 2,
                    kind: "Fine Art".to_owned(),
                },
                Category {
                    id: 7,
                    kind: "Music".to_owned(),
                },
            ],
        )
        .await
        .unwrap();

        let map = get_category_map(&pool).await.unwrap();
        assert_eq!(map.len(), 7);
        assert_eq!(map[&2], "Fine Art");
        assert_eq!(map[&7], "Music");
    }

    #[test]
    fn serializes_label_as_type() {
        let category = Category {
            id: 1,
            kind: "Science".to_owned(),
        };
        let value = serde_json::to_value(&category).unwrap();
        assert_eq!(value, serde_json::json!({"id": 1, "type": "Science"}));
    }
}
