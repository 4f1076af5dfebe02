// src/client/api.rs

use parking_lot::RwLock;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// A failed request, normalized for the sync layer: transport failures carry
/// no status, HTTP failures carry the status plus whatever the server said.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: Option<u16>,
    pub message: String,
    /// Field-level validation messages, one alert each.
    pub field_errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    msg: String,
}

/// Error bodies come in two shapes: `{"msg": ...}` for single errors and
/// `{"errors": [{"msg": ...}, ...]}` for validation failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    errors: Option<Vec<ErrorMessage>>,
}

/// HTTP wrapper that attaches the session token (when present) to every
/// request as the `x-auth-token` header.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: RwLock::new(None),
        }
    }

    /// Sets or clears the token sent with subsequent requests.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let request = match self.token.read().clone() {
            Some(token) => request.header("x-auth-token", token),
            None => request,
        };

        let response = request.send().await.map_err(|e| ApiError {
            status: None,
            message: e.to_string(),
            field_errors: Vec::new(),
        })?;

        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| ApiError {
                status: Some(status.as_u16()),
                message: e.to_string(),
                field_errors: Vec::new(),
            });
        }

        let body = response.json::<ErrorBody>().await.unwrap_or(ErrorBody {
            msg: None,
            errors: None,
        });

        let message = body.msg.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

        let field_errors = body
            .errors
            .map(|errors| errors.into_iter().map(|e| e.msg).collect())
            .unwrap_or_default();

        Err(ApiError {
            status: Some(status.as_u16()),
            message,
            field_errors,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.http.get(self.url(path))).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.http.post(self.url(path)).json(body)).await
    }

    pub async fn put<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.http.put(self.url(path))).await
    }

    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.http.put(self.url(path)).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.http.delete(self.url(path))).await
    }
}
