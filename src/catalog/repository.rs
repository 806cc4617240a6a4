//! Products repository.

use async_trait::async_trait;
use mockall::automock;
use tokio::sync::RwLock;

use crate::{
    catalog::{Catalog, CatalogError, ProductQuery},
    products::Product,
};

/// Read access to product reference data.
#[automock]
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Retrieves all products in catalog order.
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError>;

    /// Retrieve a single product.
    async fn get_product(&self, id: &str) -> Result<Product, CatalogError>;

    /// Retrieves the products matching a listing query.
    async fn search_products(&self, query: ProductQuery) -> Result<Vec<Product>, CatalogError>;
}

/// Products repository backed by an in-memory [`Catalog`].
#[derive(Debug, Default)]
pub struct InMemoryProductsRepository {
    catalog: RwLock<Catalog>,
}

impl InMemoryProductsRepository {
    /// Wrap a catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: RwLock::new(catalog),
        }
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AlreadyExists`] if the id is taken.
    pub async fn insert(&self, product: Product) -> Result<(), CatalogError> {
        self.catalog.write().await.insert(product)?;

        Ok(())
    }
}

#[async_trait]
impl ProductsRepository for InMemoryProductsRepository {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.catalog.read().await.iter().cloned().collect())
    }

    async fn get_product(&self, id: &str) -> Result<Product, CatalogError> {
        self.catalog.read().await.get(id).cloned()
    }

    async fn search_products(&self, query: ProductQuery) -> Result<Vec<Product>, CatalogError> {
        Ok(self
            .catalog
            .read()
            .await
            .search(&query)
            .into_iter()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{catalog::SortOrder, products::tests::product};

    use super::*;

    #[tokio::test]
    async fn get_product_returns_inserted_product() -> TestResult {
        let repository = InMemoryProductsRepository::default();

        repository.insert(product("7", 4_990)).await?;

        assert_eq!(repository.get_product("7").await?.price.to_minor_units(), 4_990);

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_returns_not_found() {
        let repository = InMemoryProductsRepository::default();

        let result = repository.get_product("nope").await;

        assert_eq!(result, Err(CatalogError::NotFound("nope".to_string())));
    }

    #[tokio::test]
    async fn search_products_applies_query() -> TestResult {
        let catalog = Catalog::with_products([product("1", 300), product("2", 100)])?;
        let repository = InMemoryProductsRepository::new(catalog);

        let results = repository
            .search_products(ProductQuery {
                sort: SortOrder::PriceAsc,
                ..ProductQuery::default()
            })
            .await?;

        let ids: Vec<&str> = results.iter().map(|product| product.id.as_str()).collect();

        assert_eq!(ids, ["2", "1"]);
        assert_eq!(repository.list_products().await?.len(), 2);

        Ok(())
    }
}
