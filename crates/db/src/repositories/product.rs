use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row};

use vitarec_core::domain::product::{Product, ProductId};

use super::{decode_tags, encode_tags, ProductCatalogRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProductCatalog {
    pool: DbPool,
}

impl SqlProductCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProductCatalogRepository for SqlProductCatalog {
    async fn list_active(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, sku, name, description, price, restrictions, target_complaints, \
             target_goals, vitamin_type, benefits, dosage, is_active \
             FROM products WHERE is_active = 1 ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_product_row).collect()
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO products (
                id, sku, name, description, price, restrictions, target_complaints,
                target_goals, vitamin_type, benefits, dosage, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                sku = excluded.sku,
                name = excluded.name,
                description = excluded.description,
                price = excluded.price,
                restrictions = excluded.restrictions,
                target_complaints = excluded.target_complaints,
                target_goals = excluded.target_goals,
                vitamin_type = excluded.vitamin_type,
                benefits = excluded.benefits,
                dosage = excluded.dosage,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&product.id.0)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.to_string())
        .bind(encode_tags(&product.restrictions))
        .bind(encode_tags(&product.target_complaints))
        .bind(encode_tags(&product.target_goals))
        .bind(encode_tags(&product.vitamin_type))
        .bind(encode_tags(&product.benefits))
        .bind(&product.dosage)
        .bind(product.active)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn map_product_row(row: &SqliteRow) -> Result<Product, RepositoryError> {
    let price_raw: String = row.try_get("price")?;
    let price = Decimal::from_str(&price_raw)
        .map_err(|error| RepositoryError::Decode(format!("column `price`: {error}")))?;

    let restrictions: String = row.try_get("restrictions")?;
    let target_complaints: String = row.try_get("target_complaints")?;
    let target_goals: String = row.try_get("target_goals")?;
    let vitamin_type: String = row.try_get("vitamin_type")?;
    let benefits: String = row.try_get("benefits")?;

    Ok(Product {
        id: ProductId(row.try_get("id")?),
        sku: row.try_get("sku")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price,
        restrictions: decode_tags("restrictions", &restrictions)?,
        target_complaints: decode_tags("target_complaints", &target_complaints)?,
        target_goals: decode_tags("target_goals", &target_goals)?,
        vitamin_type: decode_tags("vitamin_type", &vitamin_type)?,
        benefits: decode_tags("benefits", &benefits)?,
        dosage: row.try_get("dosage")?,
        active: row.try_get("is_active")?,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use vitarec_core::domain::product::{Product, ProductId};

    use super::SqlProductCatalog;
    use crate::repositories::testing::migrated_pool;
    use crate::repositories::ProductCatalogRepository;

    fn product(id: &str, name: &str, active: bool) -> Product {
        Product {
            id: ProductId(id.to_owned()),
            sku: format!("SKU-{id}"),
            name: name.to_owned(),
            description: Some("Капсулы, 60 шт".to_owned()),
            price: Decimal::new(129_900, 2),
            restrictions: vec!["diabetic".to_owned()],
            target_complaints: vec!["fatigue".to_owned()],
            target_goals: vec!["energy".to_owned()],
            vitamin_type: vec!["magnesium".to_owned()],
            benefits: vec!["спокойный сон".to_owned()],
            dosage: Some("2 капсулы в день".to_owned()),
            active,
        }
    }

    #[tokio::test]
    async fn save_and_list_round_trips_json_columns() {
        let pool = migrated_pool("product_round_trip").await;

        let catalog = SqlProductCatalog::new(pool.clone());
        catalog.save(product("prod-mg", "Магний B6", true)).await.expect("save product");

        let listed = catalog.list_active().await.expect("list products");
        assert_eq!(listed, vec![product("prod-mg", "Магний B6", true)]);

        pool.close().await;
    }

    #[tokio::test]
    async fn inactive_products_are_not_listed() {
        let pool = migrated_pool("product_inactive").await;

        let catalog = SqlProductCatalog::new(pool.clone());
        catalog.save(product("prod-on", "Цинк", true)).await.expect("save active");
        catalog.save(product("prod-off", "Железо", false)).await.expect("save inactive");

        let listed = catalog.list_active().await.expect("list products");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, ProductId("prod-on".to_owned()));

        pool.close().await;
    }

    #[tokio::test]
    async fn listing_orders_by_name() {
        let pool = migrated_pool("product_ordering").await;

        let catalog = SqlProductCatalog::new(pool.clone());
        catalog.save(product("prod-b", "Омега-3", true)).await.expect("save");
        catalog.save(product("prod-a", "Витамин D3", true)).await.expect("save");

        let listed = catalog.list_active().await.expect("list products");
        let names: Vec<&str> = listed.iter().map(|product| product.name.as_str()).collect();
        assert_eq!(names, vec!["Витамин D3", "Омега-3"]);

        pool.close().await;
    }

    #[tokio::test]
    async fn save_is_an_upsert() {
        let pool = migrated_pool("product_upsert").await;

        let catalog = SqlProductCatalog::new(pool.clone());
        catalog.save(product("prod-mg", "Магний B6", true)).await.expect("insert");

        let mut updated = product("prod-mg", "Магний B6 Форте", true);
        updated.price = Decimal::new(149_900, 2);
        catalog.save(updated.clone()).await.expect("update");

        let listed = catalog.list_active().await.expect("list products");
        assert_eq!(listed, vec![updated]);

        pool.close().await;
    }
}
