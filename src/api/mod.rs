pub mod wire;

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{error, info};
use web_sys::{AbortSignal, UrlSearchParams};

use crate::cancel::RequestScope;
use crate::config::config;
use crate::error::AppError;
use crate::listing::ListQuery;
use crate::models::{
    AdminStats, Checkout, Credentials, Order, PageOf, PaymentCategory, Receipt, Role,
};
use wire::{
    AdminStatsPayload, CategoryPayload, CategoryRequest, CheckoutPayload, ListPayload,
    LoginPayload, Normalize, OrderPayload, OrderRequest, ProfilePayload, ProfileRequest,
    ReceiptPayload, RegisterRequest, UserPayload,
};

/// Talks to the dues backend. Cheap to build; pages make one per effect.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    signal: Option<AbortSignal>,
}

impl ApiClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base(&config().api_base_url, token)
    }

    pub fn with_base(base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            signal: None,
        }
    }

    /// Requests made through the returned client are aborted with `scope`.
    pub fn scoped(mut self, scope: &RequestScope) -> Self {
        self.signal = scope.signal();
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.abort_signal(self.signal.as_ref());
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn read<T: DeserializeOwned>(resp: Response) -> Result<T, AppError> {
        if !resp.ok() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let err = AppError::from_status(status, &body);
            error!("{} {} failed: {}", status, resp.url(), err);
            return Err(err);
        }
        Ok(resp.json::<T>().await?)
    }

    async fn expect_ok(resp: Response) -> Result<(), AppError> {
        if resp.ok() {
            return Ok(());
        }
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let err = AppError::from_status(status, &body);
        error!("{} {} failed: {}", status, resp.url(), err);
        Err(err)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let resp = self.authorize(Request::get(&self.url(path))).send().await?;
        Self::read(resp).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Credentials, AppError> {
        // the token endpoint takes an OAuth2 password form, not JSON
        let form = UrlSearchParams::new().map_err(|_| AppError::Network("form".to_string()))?;
        form.append("username", email);
        form.append("password", password);
        let body = String::from(form.to_string());

        let resp = self
            .authorize(Request::post(&self.url("/auth/login")))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)?
            .send()
            .await?;
        let payload: LoginPayload = Self::read(resp).await?;
        info!("Signed in as {}", email);
        Ok(payload.normalize())
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), AppError> {
        let resp = self
            .authorize(Request::post(&self.url("/users/")))
            .json(request)?
            .send()
            .await?;
        Self::expect_ok(resp).await
    }

    pub async fn active_categories(&self) -> Result<Vec<PaymentCategory>, AppError> {
        let payload: ListPayload<CategoryPayload> = self.get("/payment-categories/").await?;
        Ok(payload.into_items())
    }

    pub async fn my_orders(&self) -> Result<Vec<Order>, AppError> {
        let payload: ListPayload<OrderPayload> = self.get("/orders/me").await?;
        Ok(payload.into_items())
    }

    pub async fn create_order(
        &self,
        category_id: &str,
        callback_url: &str,
    ) -> Result<Checkout, AppError> {
        let request = OrderRequest {
            payment_for_id: category_id.to_string(),
            callback_url: callback_url.to_string(),
        };
        let resp = self
            .authorize(Request::post(&self.url("/orders/")))
            .json(&request)?
            .send()
            .await?;
        let payload: CheckoutPayload = Self::read(resp).await?;
        let checkout = payload.normalize();
        info!("Order created, reference {}", checkout.reference);
        Ok(checkout)
    }

    pub async fn verify(&self, reference: &str) -> Result<Order, AppError> {
        let path = format!("/orders/verify/{}", segment(reference));
        let resp = self
            .authorize(Request::post(&self.url(&path)))
            .json(&serde_json::json!({}))?
            .send()
            .await?;
        let value: serde_json::Value = Self::read(resp).await?;
        let order = wire::normalize_verification(value)?;
        info!(
            "Verification of {} returned {}",
            reference,
            order.status.as_str()
        );
        Ok(order)
    }

    pub async fn receipt(&self, order_id: &str) -> Result<Receipt, AppError> {
        let payload: ReceiptPayload = self
            .get(&format!("/receipt/{}", segment(order_id)))
            .await
            .map_err(receipt_error)?;
        Ok(payload.normalize())
    }

    pub async fn receipt_by_reference(&self, reference: &str) -> Result<Receipt, AppError> {
        let payload: ReceiptPayload = self
            .get(&format!("/receipt/reference/{}", segment(reference)))
            .await
            .map_err(receipt_error)?;
        Ok(payload.normalize())
    }

    pub async fn admin_stats(&self) -> Result<AdminStats, AppError> {
        let payload: AdminStatsPayload = self.get("/admin/stats").await?;
        Ok(payload.normalize())
    }

    /// One page of a paginated admin listing.
    pub async fn list<P>(&self, path: &str, query: &ListQuery) -> Result<PageOf<P::Output>, AppError>
    where
        P: Normalize + DeserializeOwned,
    {
        let pairs = query.query_pairs();
        let builder = self
            .authorize(Request::get(&self.url(path)))
            .query(pairs.iter().map(|(k, v)| (*k, v.as_str())));
        let resp = builder.send().await?;
        let payload: ListPayload<P> = Self::read(resp).await?;
        Ok(payload.into_page(query.limit))
    }

    pub async fn save_category(
        &self,
        id: Option<&str>,
        request: &CategoryRequest,
    ) -> Result<PaymentCategory, AppError> {
        let builder = match id {
            Some(id) => Request::put(&self.url(&format!("/payment-categories/{}", segment(id)))),
            None => Request::post(&self.url("/payment-categories/")),
        };
        let resp = self.authorize(builder).json(request)?.send().await?;
        let payload: CategoryPayload = Self::read(resp).await?;
        Ok(payload.normalize())
    }

    pub async fn toggle_category(&self, id: &str) -> Result<(), AppError> {
        let path = format!("/payment-categories/{}/toggle", segment(id));
        let resp = self
            .authorize(Request::patch(&self.url(&path)))
            .send()
            .await?;
        Self::expect_ok(resp).await
    }

    pub async fn delete_category(&self, id: &str) -> Result<(), AppError> {
        let path = format!("/payment-categories/{}", segment(id));
        let resp = self
            .authorize(Request::delete(&self.url(&path)))
            .send()
            .await?;
        Self::expect_ok(resp).await
    }

    pub async fn update_profile(
        &self,
        role: Role,
        request: &ProfileRequest,
    ) -> Result<UserPayload, AppError> {
        let path = match role {
            Role::Admin => "/users/profile/admin",
            Role::Student => "/users/profile/student",
        };
        let resp = self
            .authorize(Request::put(&self.url(path)))
            .json(request)?
            .send()
            .await?;
        let payload: ProfilePayload = Self::read(resp).await?;
        Ok(payload.into_patch())
    }
}

fn segment(raw: &str) -> String {
    String::from(js_sys::encode_uri_component(raw))
}

fn receipt_error(err: AppError) -> AppError {
    match err {
        AppError::NotFound(_) => AppError::NotFound("Receipt not found".to_string()),
        AppError::Rejected(_) => {
            AppError::Rejected("Receipt is only available for completed payments".to_string())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_single_slash() {
        let api = ApiClient::with_base("http://localhost:8000/", None);
        assert_eq!(api.url("/orders/me"), "http://localhost:8000/orders/me");
        assert_eq!(api.url("admin/stats"), "http://localhost:8000/admin/stats");
    }

    #[test]
    fn test_empty_token_is_dropped() {
        let api = ApiClient::with_base("http://x", Some(String::new()));
        assert!(api.token.is_none());
    }

    #[test]
    fn test_receipt_error_messages() {
        assert_eq!(
            receipt_error(AppError::NotFound("Order not found".into())),
            AppError::NotFound("Receipt not found".into())
        );
        assert_eq!(
            receipt_error(AppError::Rejected("bad".into())),
            AppError::Rejected("Receipt is only available for completed payments".into())
        );
        assert_eq!(receipt_error(AppError::Unauthorized), AppError::Unauthorized);
    }
}
