//! PostgREST-style record store client.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::StoreConfig;
use crate::domain::{
    Price, PriceDraft, PriceId, PriceWithDetails, Product, ProductDraft, ProductId, Supplier,
    SupplierDraft, SupplierId, UserId,
};
use crate::error::{Result, StoreError};
use crate::port::store::{DateOrder, PriceFilter, RecordStore};

use super::dto::{
    PriceFields, PriceInsert, PriceRow, ProductFields, ProductInsert, ProductRow, SupplierFields,
    SupplierInsert, SupplierRow,
};

/// Embed clause attaching product and supplier details to price rows.
const PRICE_SELECT_JOINED: &str = "*,product:products(*),supplier:suppliers(*)";

/// REST implementation of [`RecordStore`].
///
/// Row-level security on the backend is the authority on ownership; the
/// explicit `user_id` filters keep queries honest and indexes warm.
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    /// Create a client from validated store settings.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn read_rows<T: DeserializeOwned>(response: Response) -> Result<Vec<T>> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Backend {
                status: status.as_u16(),
                message,
            }
            .into());
        }
        let rows = response.json().await.map_err(StoreError::Http)?;
        Ok(rows)
    }

    async fn list<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        debug!(table, "listing rows");
        let response = self
            .request(Method::GET, table)
            .query(query)
            .send()
            .await
            .map_err(StoreError::Http)?;
        Self::read_rows(response).await
    }

    async fn get_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let mut rows: Vec<T> = self.list(table, query).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    async fn insert_one<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &'static str,
        body: &B,
    ) -> Result<T> {
        debug!(table, "inserting row");
        let response = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(&[body])
            .send()
            .await
            .map_err(StoreError::Http)?;
        let mut rows: Vec<T> = Self::read_rows(response).await?;
        if rows.is_empty() {
            return Err(StoreError::EmptyResponse { entity: table }.into());
        }
        Ok(rows.swap_remove(0))
    }

    async fn update_one<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &'static str,
        user: &UserId,
        id: &str,
        body: &B,
    ) -> Result<T> {
        debug!(table, id, "updating row");
        let response = self
            .request(Method::PATCH, table)
            .query(&[
                ("id", format!("eq.{id}")),
                ("user_id", format!("eq.{}", user.as_str())),
            ])
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(StoreError::Http)?;
        let mut rows: Vec<T> = Self::read_rows(response).await?;
        if rows.is_empty() {
            return Err(StoreError::MissingRow {
                entity: table,
                id: id.to_string(),
            }
            .into());
        }
        Ok(rows.swap_remove(0))
    }

    async fn delete_one(&self, table: &'static str, user: &UserId, id: &str) -> Result<bool> {
        debug!(table, id, "deleting row");
        let response = self
            .request(Method::DELETE, table)
            .query(&[
                ("id", format!("eq.{id}")),
                ("user_id", format!("eq.{}", user.as_str())),
            ])
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(StoreError::Http)?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(true);
        }
        let rows: Vec<serde_json::Value> = Self::read_rows(response).await?;
        Ok(!rows.is_empty())
    }

    fn price_query(user: &UserId, filter: &PriceFilter) -> Vec<(&'static str, String)> {
        let direction = match filter.order {
            DateOrder::Ascending => "asc",
            DateOrder::Descending => "desc",
        };
        let mut query = vec![
            ("select", PRICE_SELECT_JOINED.to_string()),
            ("user_id", format!("eq.{}", user.as_str())),
            (
                "order",
                format!("date.{direction},created_at.{direction},id.{direction}"),
            ),
        ];
        if let Some(ref product_id) = filter.product_id {
            query.push(("product_id", format!("eq.{}", product_id.as_str())));
        }
        if let Some(ref supplier_id) = filter.supplier_id {
            query.push(("supplier_id", format!("eq.{}", supplier_id.as_str())));
        }
        query
    }
}

impl RecordStore for RestStore {
    async fn list_suppliers(&self, user: &UserId) -> Result<Vec<Supplier>> {
        let rows: Vec<SupplierRow> = self
            .list(
                "suppliers",
                &[
                    ("select", "*".to_string()),
                    ("user_id", format!("eq.{}", user.as_str())),
                    ("order", "name.asc".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(SupplierRow::into_domain).collect())
    }

    async fn get_supplier(&self, user: &UserId, id: &SupplierId) -> Result<Option<Supplier>> {
        let row: Option<SupplierRow> = self
            .get_one(
                "suppliers",
                &[
                    ("select", "*".to_string()),
                    ("id", format!("eq.{}", id.as_str())),
                    ("user_id", format!("eq.{}", user.as_str())),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(row.map(SupplierRow::into_domain))
    }

    async fn insert_supplier(&self, user: &UserId, draft: SupplierDraft) -> Result<Supplier> {
        let row: SupplierRow = self
            .insert_one("suppliers", &SupplierInsert::new(&draft, user))
            .await?;
        Ok(row.into_domain())
    }

    async fn update_supplier(
        &self,
        user: &UserId,
        id: &SupplierId,
        draft: SupplierDraft,
    ) -> Result<Supplier> {
        let row: SupplierRow = self
            .update_one(
                "suppliers",
                user,
                id.as_str(),
                &SupplierFields::from_draft(&draft),
            )
            .await?;
        Ok(row.into_domain())
    }

    async fn delete_supplier(&self, user: &UserId, id: &SupplierId) -> Result<bool> {
        self.delete_one("suppliers", user, id.as_str()).await
    }

    async fn list_products(&self, user: &UserId) -> Result<Vec<Product>> {
        let rows: Vec<ProductRow> = self
            .list(
                "products",
                &[
                    ("select", "*".to_string()),
                    ("user_id", format!("eq.{}", user.as_str())),
                    ("order", "name.asc".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(ProductRow::into_domain).collect())
    }

    async fn get_product(&self, user: &UserId, id: &ProductId) -> Result<Option<Product>> {
        let row: Option<ProductRow> = self
            .get_one(
                "products",
                &[
                    ("select", "*".to_string()),
                    ("id", format!("eq.{}", id.as_str())),
                    ("user_id", format!("eq.{}", user.as_str())),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(row.map(ProductRow::into_domain))
    }

    async fn insert_product(&self, user: &UserId, draft: ProductDraft) -> Result<Product> {
        let row: ProductRow = self
            .insert_one("products", &ProductInsert::new(&draft, user))
            .await?;
        Ok(row.into_domain())
    }

    async fn update_product(
        &self,
        user: &UserId,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Product> {
        let row: ProductRow = self
            .update_one(
                "products",
                user,
                id.as_str(),
                &ProductFields::from_draft(&draft),
            )
            .await?;
        Ok(row.into_domain())
    }

    async fn delete_product(&self, user: &UserId, id: &ProductId) -> Result<bool> {
        self.delete_one("products", user, id.as_str()).await
    }

    async fn list_prices(&self, user: &UserId, filter: PriceFilter) -> Result<Vec<PriceWithDetails>> {
        let rows: Vec<PriceRow> = self.list("prices", &Self::price_query(user, &filter)).await?;
        rows.into_iter()
            .map(|row| row.into_joined().map_err(Into::into))
            .collect()
    }

    async fn get_price(&self, user: &UserId, id: &PriceId) -> Result<Option<PriceWithDetails>> {
        let row: Option<PriceRow> = self
            .get_one(
                "prices",
                &[
                    ("select", PRICE_SELECT_JOINED.to_string()),
                    ("id", format!("eq.{}", id.as_str())),
                    ("user_id", format!("eq.{}", user.as_str())),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        row.map(|r| r.into_joined().map_err(Into::into)).transpose()
    }

    async fn insert_price(&self, user: &UserId, draft: PriceDraft) -> Result<Price> {
        let row: PriceRow = self
            .insert_one("prices", &PriceInsert::new(&draft, user))
            .await?;
        Ok(row.into_price())
    }

    async fn update_price(&self, user: &UserId, id: &PriceId, draft: PriceDraft) -> Result<Price> {
        let row: PriceRow = self
            .update_one("prices", user, id.as_str(), &PriceFields::from_draft(&draft))
            .await?;
        Ok(row.into_price())
    }

    async fn delete_price(&self, user: &UserId, id: &PriceId) -> Result<bool> {
        self.delete_one("prices", user, id.as_str()).await
    }
}
