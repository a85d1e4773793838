//! HTTP client for the storefront API.
//!
//! The client keeps its bearer token in [`Storage`] under `token`, sends it with every
//! request, and forgets it as soon as the server answers 401.

use super::{
    cart::Cart,
    storage::{Storage, TOKEN_KEY},
};
use crate::{
    core::{
        auth::{LoginRequest, LoginResponse, RegisterInput},
        catalog::{CatalogParams, CatalogQuery},
        order::{OrderDetails, OrderInput},
        product::ProductListing,
    },
    entities::{order, user},
    errors::{Error, Result},
};
use reqwest::{
    Client, Method, RequestBuilder, StatusCode,
    header::{CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderValue, PRAGMA},
};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Storefront API client.
#[derive(Clone)]
pub struct StorefrontClient {
    base_url: String,
    http: Client,
    storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Creates a client for the API rooted at `base_url`, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: impl Into<String>, storage: Arc<dyn Storage>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        );
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            storage,
        })
    }

    /// The stored bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{path}", self.base_url));
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            debug!("Server rejected credentials, clearing stored token");
            self.storage.remove(TOKEN_KEY)?;
            return Err(Error::Unauthorized);
        }
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| "API request failed".to_string());
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    /// Logs in and stores the issued token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.post("/auth/login", &request).await?;
        self.storage.set(TOKEN_KEY, &response.token)?;
        Ok(response)
    }

    /// Creates an account. Does not log in.
    pub async fn register(&self, input: &RegisterInput) -> Result<user::Model> {
        self.post("/auth/register", input).await
    }

    /// Forgets the stored token.
    pub fn logout(&self) -> Result<()> {
        self.storage.remove(TOKEN_KEY)
    }

    /// The logged-in user, or `None` without a token or on any failure.
    pub async fn current_user(&self) -> Option<user::Model> {
        self.token()?;
        match self.get("/users/me").await {
            Ok(user) => Some(user),
            Err(e) => {
                debug!("Could not fetch current user: {e}");
                None
            }
        }
    }

    /// Lists products matching `params`.
    pub async fn products(&self, params: &CatalogParams) -> Result<Vec<ProductListing>> {
        self.send(self.request(Method::GET, "/products").query(params))
            .await
    }

    /// Lists products, falling back to filtering `fallback` locally when the request fails.
    pub async fn products_or_fallback(
        &self,
        params: &CatalogParams,
        fallback: &[ProductListing],
    ) -> Vec<ProductListing> {
        match self.products(params).await {
            Ok(products) => products,
            Err(e) => {
                warn!("Product request failed, using fallback catalog: {e}");
                CatalogQuery::from(params).apply(fallback)
            }
        }
    }

    /// Fetches one product with its brand.
    pub async fn product(&self, product_id: i64) -> Result<ProductListing> {
        self.get(&format!("/products/{product_id}")).await
    }

    /// Looks the product up and adds it to `cart`.
    pub async fn add_to_cart(&self, cart: &mut Cart, product_id: i64, quantity: u32) -> Result<()> {
        let listing = self.product(product_id).await?;
        cart.add_item(&listing.product, quantity)
    }

    /// Places one order per cart line, then clears the cart.
    ///
    /// Orders are attributed to the logged-in user. If a line fails, the cart is left intact
    /// and the orders already placed are not rolled back.
    pub async fn checkout(&self, cart: &mut Cart) -> Result<Vec<order::Model>> {
        if cart.is_empty() {
            return Err(Error::validation("Cart is empty"));
        }

        let mut placed = Vec::with_capacity(cart.items().len());
        for line in cart.items() {
            let input = OrderInput {
                quantity: i32::try_from(line.quantity)
                    .map_err(|_| Error::validation("Quantity is too large"))?,
                total_price: Some(line.subtotal()?),
                status: None,
                user_id: None,
                product_id: Some(line.id),
            };
            placed.push(self.post("/orders", &input).await?);
        }

        cart.clear()?;
        Ok(placed)
    }

    /// Orders placed by `user_id`.
    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<OrderDetails>> {
        self.get(&format!("/orders/user/{user_id}")).await
    }
}
