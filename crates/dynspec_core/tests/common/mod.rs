#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use dynspec_core::{Entity, EntityType, Value, ValueKind};
use once_cell::sync::Lazy;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub brand_id: Uuid,
    pub released_at: DateTime<Utc>,
    pub discontinued: bool,
    pub notes: Option<String>,
    internal_code: String,
}

impl Entity for Brand {
    fn entity_type() -> &'static EntityType<Self> {
        static BRAND: Lazy<EntityType<Brand>> = Lazy::new(|| {
            EntityType::<Brand>::builder("Brand", "brands")
                .member("Id", ValueKind::Uuid, |brand| brand.id.into())
                .primary_key()
                .member("Name", ValueKind::Text, |brand| brand.name.as_str().into())
                .build()
        });
        &BRAND
    }
}

impl Entity for Product {
    fn entity_type() -> &'static EntityType<Self> {
        static PRODUCT: Lazy<EntityType<Product>> = Lazy::new(|| {
            EntityType::<Product>::builder("Product", "products")
                .member("Id", ValueKind::Uuid, |p| p.id.into())
                .primary_key()
                .member("Name", ValueKind::Text, |p| p.name.as_str().into())
                .member("Price", ValueKind::Float, |p| p.price.into())
                .member("Stock", ValueKind::Int, |p| p.stock.into())
                .member("BrandId", ValueKind::Uuid, |p| p.brand_id.into())
                .references("brands", "id")
                .member("ReleasedAt", ValueKind::Timestamp, |p| p.released_at.into())
                .member("Discontinued", ValueKind::Bool, |p| p.discontinued.into())
                .member("Notes", ValueKind::Text, |p| Value::from(p.notes.clone()))
                .nullable()
                .member("InternalCode", ValueKind::Text, |p| {
                    p.internal_code.as_str().into()
                })
                .private()
                .build()
        });
        &PRODUCT
    }
}

pub fn brand(name: &str) -> Brand {
    Brand {
        id: Uuid::new_v4(),
        name: name.to_string(),
    }
}

pub fn product(name: &str, price: f64) -> Product {
    Product {
        id: Uuid::new_v4(),
        name: name.to_string(),
        price,
        stock: 0,
        brand_id: Uuid::nil(),
        released_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        discontinued: false,
        notes: None,
        internal_code: format!("{}-code", name.to_lowercase()),
    }
}

/// Catalog with one brand and a spread of products.
pub fn catalog() -> (Brand, Vec<Product>) {
    let acme = brand("Acme");
    let rows = [
        ("Widget", 15.0, 4, (2024, 1, 10), false, Some("Blue widget")),
        ("Gadget", 5.0, 0, (2023, 6, 1), true, None),
        ("Gizmo", 10.0, 12, (2024, 3, 1), false, Some("gizmo")),
        ("Widget Pro", 49.5, 2, (2025, 2, 14), false, Some("")),
        ("gadget mini", 2.25, 30, (2022, 11, 30), true, Some("Mini Gadget")),
    ];
    let products = rows
        .into_iter()
        .map(|(name, price, stock, (y, m, d), discontinued, notes)| {
            let mut item = product(name, price);
            item.stock = stock;
            item.brand_id = acme.id;
            item.released_at = Utc.with_ymd_and_hms(y, m, d, 8, 30, 0).unwrap();
            item.discontinued = discontinued;
            item.notes = notes.map(str::to_string);
            item
        })
        .collect();
    (acme, products)
}

/// Inserts `items` into their mapped table through the registered getters.
pub fn insert_all<T: Entity>(conn: &rusqlite::Connection, items: &[T]) -> rusqlite::Result<()> {
    let entity = T::entity_type();
    let columns: Vec<String> = entity
        .members()
        .iter()
        .map(|member| dynspec_core::db::quote_identifier(member.column()))
        .collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        dynspec_core::db::quote_identifier(entity.table()),
        columns.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    for item in items {
        let values: Vec<Value> = entity
            .members()
            .iter()
            .map(|member| member.read(item))
            .collect();
        stmt.execute(rusqlite::params_from_iter(values.iter()))?;
    }
    Ok(())
}
