//! Product Repository

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate, ProductUpdate};

const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products, available first then by name
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY is_available DESC, name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find products in a category
    pub async fn find_by_category(&self, category: &str) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE category = $category ORDER BY name")
            .bind(("category", category.to_string()))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let product: Option<Product> = self.base.db().select(thing).await?;
        Ok(product)
    }

    /// Find product by exact name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Product>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Product '{}' already exists",
                data.name
            )));
        }

        let product = Product {
            id: None,
            name: data.name,
            price: data.price,
            category: data.category.unwrap_or_default(),
            food_type: data.food_type.unwrap_or_default(),
            quantity_type: data.quantity_type.unwrap_or_default(),
            image_url: data.image_url,
            is_available: true,
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        if let Some(new_name) = &data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Product '{}' already exists",
                new_name
            )));
        }

        let name = data.name.unwrap_or(existing.name);
        let price = data.price.unwrap_or(existing.price);
        let category = data.category.unwrap_or(existing.category);
        let food_type = data.food_type.unwrap_or(existing.food_type);
        let quantity_type = data.quantity_type.unwrap_or(existing.quantity_type);
        let image_url = data.image_url.or(existing.image_url);
        let is_available = data.is_available.unwrap_or(existing.is_available);

        self.base
            .db()
            .query("UPDATE $thing SET name = $name, price = $price, category = $category, food_type = $food_type, quantity_type = $quantity_type, image_url = $image_url, is_available = $is_available")
            .bind(("thing", thing))
            .bind(("name", name))
            .bind(("price", price))
            .bind(("category", category))
            .bind(("food_type", food_type))
            .bind(("quantity_type", quantity_type))
            .bind(("image_url", image_url))
            .bind(("is_available", is_available))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
