pub mod config;
pub mod factory;

use std::sync::Arc;

use anyhow::{bail, Result};
use log::{debug, info, warn};
use reqwest::{header, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::session::Session;
use crate::types::article::{
    Article, ArticleForm, ArticleList, ArticlePage, DeleteArticleResponse,
};
use crate::types::category::{
    AssignCategoriesRequest, Category, CategoryList, CategoryRequest, CreateCategoryResponse,
};
use crate::types::comment::{Comment, CommentList, CommentRequest, CreateCommentResponse};
use crate::types::response::{MessageResponse, TokenErrorResponse, TokenResponse, MIME_JSON};
use crate::types::user::{LoginRequest, Profile, RegisterRequest};

/// The only place that knows the backend origin. Every request goes through
/// [`Client::do_request`], whose authorization stage injects the bearer token
/// for protected calls and purges the session when the backend rejects it.
#[derive(Clone)]
pub struct Client {
    url: String,
    client: reqwest::Client,
    session: Arc<Session>,
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Please log in first")]
    MissingCredential,

    #[error("Unauthorized: code {code}, {}", .message.as_deref().unwrap_or("credentials rejected"))]
    Unauthorized { code: u16, message: Option<String> },

    #[error("Invalid request: {}", .0.as_deref().unwrap_or("rejected by server"))]
    Validation(Option<String>),

    #[error("Not found: {}", .0.as_deref().unwrap_or("resource does not exist"))]
    NotFound(Option<String>),

    #[error("Server error: code {code}, {}", .message.as_deref().unwrap_or("no message"))]
    Server { code: u16, message: Option<String> },

    #[error("Client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Server returned invalid json: {0:?}")]
    InvalidJson(String),

    #[error("Credential store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl RequestError {
    /// Message the backend attached to the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RequestError::Unauthorized { message, .. } | RequestError::Server { message, .. } => {
                message.as_deref()
            }
            RequestError::Validation(message) | RequestError::NotFound(message) => {
                message.as_deref()
            }
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RequestError::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RequestError::NotFound(_))
    }
}

/// Whether a request needs the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

enum Payload {
    None,
    Json(serde_json::Value),
}

impl Payload {
    fn json<T: Serialize>(body: &T) -> Result<Self, RequestError> {
        match serde_json::to_value(body) {
            Ok(value) => Ok(Payload::Json(value)),
            Err(e) => Err(RequestError::Client(format!("encode request body: {e}"))),
        }
    }
}

impl Client {
    pub fn new(url: &str, session: Arc<Session>) -> Result<Self> {
        let url = url.trim_end_matches('/');
        let parsed = match Url::parse(url) {
            Ok(url) => url,
            Err(_) => bail!("invalid server url '{url}'"),
        };
        match parsed.scheme() {
            "http" | "https" => {}
            _ => bail!(
                "invalid url scheme, expect 'http' or 'https', not '{}'",
                parsed.scheme()
            ),
        }
        if parsed.path() != "/" {
            bail!(
                "invalid server url, path should be '/', not '{}'",
                parsed.path()
            );
        }

        Ok(Self {
            url: url.to_string(),
            client: reqwest::Client::new(),
            session,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Exchange credentials for a token. The token is returned, storing it is up
    /// to the caller.
    pub async fn login(&self, req: &LoginRequest) -> Result<String, RequestError> {
        let resp: TokenResponse = self
            .do_request(Method::POST, "login", &[], Payload::json(req)?, Access::Public)
            .await?;
        if resp.token.is_empty() {
            return Err(RequestError::InvalidJson(String::from(
                "login response has no token",
            )));
        }
        Ok(resp.token)
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<MessageResponse, RequestError> {
        self.do_request(
            Method::POST,
            "register",
            &[],
            Payload::json(req)?,
            Access::Public,
        )
        .await
    }

    pub async fn profile(&self) -> Result<Profile, RequestError> {
        self.do_request(Method::GET, "profile", &[], Payload::None, Access::Protected)
            .await
    }

    pub async fn list_articles(&self, page: u64, per_page: u64) -> Result<ArticlePage, RequestError> {
        let query = [("page", page.to_string()), ("per_page", per_page.to_string())];
        self.do_request(Method::GET, "articles", &query, Payload::None, Access::Public)
            .await
    }

    pub async fn search_articles(
        &self,
        q: &str,
        page: u64,
        per_page: u64,
    ) -> Result<ArticlePage, RequestError> {
        let query = [
            ("q", q.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        self.do_request(
            Method::GET,
            "articles/search",
            &query,
            Payload::None,
            Access::Public,
        )
        .await
    }

    pub async fn get_article(&self, id: u64) -> Result<Article, RequestError> {
        let path = format!("articles/{id}");
        self.do_request(Method::GET, &path, &[], Payload::None, Access::Public)
            .await
    }

    pub async fn create_article(&self, form: &ArticleForm) -> Result<MessageResponse, RequestError> {
        self.do_request(
            Method::POST,
            "articles",
            &[],
            Payload::json(form)?,
            Access::Protected,
        )
        .await
    }

    pub async fn update_article(
        &self,
        id: u64,
        form: &ArticleForm,
    ) -> Result<MessageResponse, RequestError> {
        let path = format!("articles/{id}");
        self.do_request(Method::PUT, &path, &[], Payload::json(form)?, Access::Protected)
            .await
    }

    pub async fn delete_article(&self, id: u64) -> Result<DeleteArticleResponse, RequestError> {
        let path = format!("articles/{id}");
        self.do_request(Method::DELETE, &path, &[], Payload::None, Access::Protected)
            .await
    }

    pub async fn articles_by_category(&self, category_id: u64) -> Result<Vec<Article>, RequestError> {
        let path = format!("articles/category/{category_id}");
        let resp: ArticleList = self
            .do_request(Method::GET, &path, &[], Payload::None, Access::Public)
            .await?;
        Ok(resp.articles)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, RequestError> {
        let resp: CategoryList = self
            .do_request(Method::GET, "categories", &[], Payload::None, Access::Public)
            .await?;
        Ok(resp.categories)
    }

    pub async fn create_category(&self, name: &str) -> Result<CreateCategoryResponse, RequestError> {
        let req = CategoryRequest {
            name: name.to_string(),
        };
        self.do_request(
            Method::POST,
            "categories",
            &[],
            Payload::json(&req)?,
            Access::Protected,
        )
        .await
    }

    pub async fn delete_category(&self, id: u64) -> Result<MessageResponse, RequestError> {
        let path = format!("categories/{id}");
        self.do_request(Method::DELETE, &path, &[], Payload::None, Access::Protected)
            .await
    }

    pub async fn article_categories(&self, article_id: u64) -> Result<Vec<Category>, RequestError> {
        let path = format!("articles/{article_id}/categories");
        let resp: CategoryList = self
            .do_request(Method::GET, &path, &[], Payload::None, Access::Public)
            .await?;
        Ok(resp.categories)
    }

    pub async fn assign_categories(
        &self,
        article_id: u64,
        categories: Vec<u64>,
    ) -> Result<MessageResponse, RequestError> {
        let path = format!("articles/{article_id}/categories");
        let req = AssignCategoriesRequest { categories };
        self.do_request(Method::POST, &path, &[], Payload::json(&req)?, Access::Protected)
            .await
    }

    pub async fn list_comments(&self, article_id: u64) -> Result<Vec<Comment>, RequestError> {
        let path = format!("articles/{article_id}/comments");
        let resp: CommentList = self
            .do_request(Method::GET, &path, &[], Payload::None, Access::Public)
            .await?;
        Ok(resp.comments)
    }

    pub async fn add_comment(&self, article_id: u64, content: &str) -> Result<Comment, RequestError> {
        let path = format!("articles/{article_id}/comments");
        let req = CommentRequest {
            content: content.to_string(),
        };
        let resp: CreateCommentResponse = self
            .do_request(Method::POST, &path, &[], Payload::json(&req)?, Access::Protected)
            .await?;
        Ok(resp.comment)
    }

    pub async fn delete_comment(&self, id: u64) -> Result<MessageResponse, RequestError> {
        let path = format!("comments/{id}");
        self.do_request(Method::DELETE, &path, &[], Payload::None, Access::Protected)
            .await
    }

    /// Attach credentials for protected calls. Fails before any network I/O
    /// when no token is stored.
    fn authorize(
        &self,
        req: reqwest::RequestBuilder,
        access: Access,
    ) -> Result<reqwest::RequestBuilder, RequestError> {
        if access == Access::Public {
            return Ok(req);
        }
        match self.session.get()? {
            Some(token) => Ok(req.header(header::AUTHORIZATION, format!("Bearer {token}"))),
            None => Err(RequestError::MissingCredential),
        }
    }

    async fn do_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        payload: Payload,
        access: Access,
    ) -> Result<T, RequestError> {
        let url = format!("{}/{}", self.url, path);
        let mut req = self.client.request(method.clone(), &url);
        if !query.is_empty() {
            req = req.query(query);
        }
        req = match payload {
            Payload::Json(body) => req.json(&body),
            Payload::None => req,
        };
        req = req.header(header::ACCEPT, MIME_JSON);
        req = self.authorize(req, access)?;

        debug!("Request server: {method} {url}");
        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => return Err(RequestError::Network(e)),
        };

        let status = resp.status();
        let text = resp.text().await.map_err(RequestError::Network)?;
        debug!("Server responded {method} {url}: {status}");

        if !status.is_success() {
            return Err(self.classify_failure(status, access, &text));
        }

        match serde_json::from_str(&text) {
            Ok(data) => Ok(data),
            Err(_) => Err(RequestError::InvalidJson(text)),
        }
    }

    fn classify_failure(&self, status: StatusCode, access: Access, body: &str) -> RequestError {
        let message = serde_json::from_str::<MessageResponse>(body)
            .ok()
            .and_then(|resp| resp.message);
        let code = status.as_u16();
        match status {
            // A rejected login is a wrong password, not an expired session.
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN if access == Access::Protected => {
                self.purge(code, message.as_deref());
                RequestError::Unauthorized { code, message }
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                RequestError::Unauthorized { code, message }
            }
            // The JWT layer answers a malformed or badly signed token with 422.
            StatusCode::UNPROCESSABLE_ENTITY
                if access == Access::Protected && Self::is_token_error(body) =>
            {
                self.purge(code, message.as_deref());
                RequestError::Unauthorized { code, message }
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                RequestError::Validation(message)
            }
            StatusCode::NOT_FOUND => RequestError::NotFound(message),
            _ => RequestError::Server { code, message },
        }
    }

    fn is_token_error(body: &str) -> bool {
        serde_json::from_str::<TokenErrorResponse>(body).is_ok()
    }

    fn purge(&self, code: u16, message: Option<&str>) {
        info!(
            "Server rejected token with code {code} ({}), log out",
            message.unwrap_or("no message")
        );
        if let Err(e) = self.session.expire() {
            warn!("Purge rejected token failed: {e:#}");
        }
    }
}
