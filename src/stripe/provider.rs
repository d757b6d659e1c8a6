use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Maximum number of products fetched in the single list call. Products past
/// this cap are silently omitted; there is no pagination.
pub const PRODUCT_LIST_LIMIT: u32 = 1000;

fn truncate_for_log(mut s: String, max_len: usize) -> String {
    if s.len() > max_len {
        // Back off to a char boundary; String::truncate panics mid-char.
        let mut cut = max_len;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
        s.push_str("…");
    }
    s
}

/// Stripe catalog provider.
/// Public API (base): https://api.stripe.com
///
/// Key endpoints:
/// - GET /v1/products?limit=1000 - List catalog products (single page, capped)
/// - GET /v1/prices?product=... - List prices attached to one product
///
/// Authentication is a Bearer token (the account's secret key), injected at
/// construction rather than held in process-global client state.
#[derive(Debug, Clone)]
pub struct StripeProvider {
    base_url: String,
    http: Client,
    secret_key: String,
}

/// Stripe's list envelope: `{"object": "list", "data": [...], "has_more": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeList<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeProduct {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unix epoch seconds.
    pub created: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripePrice {
    pub id: String,
    /// Minor currency units (cents).
    #[serde(default)]
    pub unit_amount: Option<i64>,
    pub currency: String,
}

impl StripeProvider {
    pub fn new(
        secret_key: impl Into<String>,
        base_url: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        let base_url = base_url
            .unwrap_or("https://api.stripe.com")
            .trim_end_matches('/')
            .to_string();
        let timeout_secs = timeout_secs.unwrap_or(15);
        let http = Client::builder()
            .user_agent("StripeCatalogExport/1.0")
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            http,
            secret_key: secret_key.into(),
        })
    }

    async fn get_list<T>(&self, path: &str, query: &[(&str, String)]) -> Result<StripeList<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "GET {url} returned {status}: {}",
                truncate_for_log(body, 300)
            ));
        }

        resp.json::<StripeList<T>>()
            .await
            .with_context(|| format!("decoding {url} response"))
    }

    /// List up to [`PRODUCT_LIST_LIMIT`] products in API order.
    pub async fn list_products(&self) -> Result<Vec<StripeProduct>> {
        let list = self
            .get_list::<StripeProduct>(
                "/v1/products",
                &[("limit", PRODUCT_LIST_LIMIT.to_string())],
            )
            .await?;
        if list.has_more {
            warn!(
                limit = PRODUCT_LIST_LIMIT,
                "catalog has more products than the list cap; the rest are not exported"
            );
        }
        Ok(list.data)
    }

    /// First price attached to a product, in API order, if any.
    pub async fn first_price(&self, product_id: &str) -> Result<Option<StripePrice>> {
        let list = self
            .get_list::<StripePrice>("/v1/prices", &[("product", product_id.to_string())])
            .await?;
        Ok(list.data.into_iter().next())
    }

    /// Full catalog pass: list products, then fetch each product's first
    /// price, sequentially. Any API error aborts the whole pass.
    pub async fn fetch_catalog(&self) -> Result<Vec<(StripeProduct, Option<StripePrice>)>> {
        let products = self.list_products().await?;
        info!(count = products.len(), "listed products");

        let mut out = Vec::with_capacity(products.len());
        for product in products {
            let price = self.first_price(&product.id).await?;
            debug!(product = %product.id, has_price = price.is_some(), "fetched prices");
            out.push((product, price));
        }
        Ok(out)
    }
}
