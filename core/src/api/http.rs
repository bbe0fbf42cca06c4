// storefront_cart/src/api/http.rs

use super::CartApi;
use crate::error::{ApiFailure, SetupError};
use crate::models::envelope::error_message_from_body;
use crate::models::{Cart, CartItemId, CartItemReceipt, Envelope, InventoryId, Quantity};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddItemBody {
  inventory_id: InventoryId,
  quantity: Quantity,
}

#[derive(Serialize)]
struct UpdateItemBody {
  quantity: Quantity,
}

/// `reqwest`-backed [`CartApi`].
#[derive(Debug, Clone)]
pub struct HttpCartApi {
  client: Client,
  base_url: String,
}

impl HttpCartApi {
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SetupError> {
    let base_url = base_url.trim().trim_end_matches('/').to_string();
    if base_url.is_empty() {
      return Err(SetupError::Config("API base URL must not be empty".to_string()));
    }
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, base_url })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  async fn send(request: RequestBuilder, token: &str) -> Result<Response, ApiFailure> {
    let response = request
      .bearer_auth(token)
      .send()
      .await
      .map_err(|e| ApiFailure::Transport(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message_from_body(&body);
    debug!(status = status.as_u16(), server_message = ?message, "Backend returned an error status.");
    Err(ApiFailure::Status {
      status: status.as_u16(),
      message,
    })
  }
}

#[async_trait]
impl CartApi for HttpCartApi {
  #[instrument(name = "http_api::list_carts", skip_all, err(Display))]
  async fn list_carts(&self, token: &str) -> Result<Vec<Cart>, ApiFailure> {
    let response = Self::send(self.client.get(self.endpoint("/cart")), token).await?;
    let bytes = response
      .bytes()
      .await
      .map_err(|e| ApiFailure::Transport(e.to_string()))?;
    let carts = serde_json::from_slice::<Envelope<Vec<Cart>>>(&bytes)
      .map_err(|e| ApiFailure::Transport(format!("invalid cart payload: {e}")))?
      .into_inner();
    Ok(carts)
  }

  #[instrument(name = "http_api::add_item", skip(self, token), err(Display))]
  async fn add_item(
    &self,
    token: &str,
    inventory_id: InventoryId,
    quantity: Quantity,
  ) -> Result<CartItemReceipt, ApiFailure> {
    let request = self
      .client
      .post(self.endpoint("/cart-items"))
      .json(&AddItemBody { inventory_id, quantity });
    let response = Self::send(request, token).await?;
    let body = response
      .text()
      .await
      .map_err(|e| ApiFailure::Transport(e.to_string()))?;
    if body.trim().is_empty() {
      return Ok(CartItemReceipt::default());
    }
    // The write already succeeded; an odd echo must not turn it into a failure.
    let receipt = serde_json::from_str::<Envelope<CartItemReceipt>>(&body)
      .map(Envelope::into_inner)
      .unwrap_or_else(|e| {
        warn!(error = %e, "Could not read add-to-cart response body, continuing without a receipt.");
        CartItemReceipt::default()
      });
    Ok(receipt)
  }

  #[instrument(name = "http_api::update_item", skip(self, token), err(Display))]
  async fn update_item(&self, token: &str, cart_item_id: CartItemId, quantity: Quantity) -> Result<(), ApiFailure> {
    let request = self
      .client
      .put(self.endpoint(&format!("/cart-items/{cart_item_id}")))
      .json(&UpdateItemBody { quantity });
    Self::send(request, token).await?;
    Ok(())
  }

  #[instrument(name = "http_api::remove_item", skip(self, token), err(Display))]
  async fn remove_item(&self, token: &str, cart_item_id: CartItemId) -> Result<(), ApiFailure> {
    let request = self.client.delete(self.endpoint(&format!("/cart-items/{cart_item_id}")));
    Self::send(request, token).await?;
    Ok(())
  }
}
