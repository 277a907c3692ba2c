//! In-process blog backend speaking the same JSON as the real server, plus
//! helpers to point views at it.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use actix_web::dev::Service;
use actix_web::http::header;
use actix_web::web::{self, Data, Json, Path, Query};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer};
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::{json, Value};

use quillctl::client::Client;
use quillctl::nav::{Navigator, Route};
use quillctl::session::confirm::AssumeConfirm;
use quillctl::session::store::{MemoryTokenStore, TokenStore};
use quillctl::session::Session;
use quillctl::types::article::Article;
use quillctl::types::category::Category;
use quillctl::types::comment::Comment;
use quillctl::views::ViewContext;

pub const EMAIL: &str = "alice@example.com";
pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "token-alice";

static SEED_ARTICLES: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("Rust ownership", "Moves, borrows and lifetimes."),
        ("Async in Rust", "Futures are lazy."),
        ("Flask basics", "Routes and blueprints."),
        ("SQLAlchemy sessions", "Unit of work explained."),
        ("React hooks", "useState and useEffect."),
        ("Docker layers", "Caching image builds."),
        ("Rust error handling", "thiserror and anyhow."),
        ("Postgres indexes", "B-tree or hash."),
    ]
});

/// How `POST /categories` answers, backend versions differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryReply {
    Inline,
    Nested,
    Bare,
}

pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl User {
    fn token(&self) -> String {
        format!("token-{}", self.username)
    }
}

pub struct Blog {
    pub users: Vec<User>,
    pub articles: Vec<Article>,
    pub categories: Vec<Category>,
    pub assignments: BTreeMap<u64, BTreeSet<u64>>,
    pub comments: Vec<Comment>,
    pub next_id: u64,
    pub category_reply: CategoryReply,
}

impl Blog {
    fn seeded() -> Self {
        let articles = SEED_ARTICLES
            .iter()
            .enumerate()
            .map(|(idx, (title, content))| Article {
                id: idx as u64 + 1,
                title: title.to_string(),
                content: content.to_string(),
                author: Some(String::from("alice")),
                categories: None,
            })
            .collect();

        let mut assignments = BTreeMap::new();
        assignments.insert(1, BTreeSet::from([1]));
        assignments.insert(7, BTreeSet::from([1]));

        Self {
            users: vec![User {
                id: 1,
                username: String::from("alice"),
                email: EMAIL.to_string(),
                password: PASSWORD.to_string(),
            }],
            articles,
            categories: vec![
                Category {
                    id: 1,
                    name: String::from("Rust"),
                },
                Category {
                    id: 2,
                    name: String::from("Databases"),
                },
            ],
            assignments,
            comments: vec![Comment {
                id: 1,
                content: String::from("Great post"),
                user: Some(String::from("alice")),
                user_id: Some(1),
                article_id: Some(1),
            }],
            next_id: 100,
            category_reply: CategoryReply::Inline,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn user_for(&self, req: &HttpRequest) -> Option<&User> {
        let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
        let token = value.strip_prefix("Bearer ")?;
        self.users.iter().find(|user| user.token() == token)
    }

    fn article(&self, id: u64) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    fn categories_of(&self, article_id: u64) -> Vec<Category> {
        let Some(ids) = self.assignments.get(&article_id) else {
            return Vec::new();
        };
        self.categories
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect()
    }
}

pub struct FakeBackend {
    pub url: String,
    blog: Arc<Mutex<Blog>>,
    requests: Arc<AtomicUsize>,
    paths: Arc<Mutex<Vec<String>>>,
}

impl FakeBackend {
    /// Start the backend on a random local port. Must run inside an actix
    /// system, i.e. from an `#[actix_web::test]`.
    pub async fn start() -> Self {
        let blog = Arc::new(Mutex::new(Blog::seeded()));
        let requests = Arc::new(AtomicUsize::new(0));
        let paths = Arc::new(Mutex::new(Vec::new()));

        let data = Data::from(blog.clone());
        let counter = requests.clone();
        let log = paths.clone();
        let server = HttpServer::new(move || {
            let counter = counter.clone();
            let log = log.clone();
            App::new()
                .app_data(data.clone())
                .wrap_fn(move |req, srv| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    log.lock().unwrap().push(req.path().to_string());
                    srv.call(req)
                })
                .route("/login", web::post().to(login))
                .route("/register", web::post().to(register))
                .route("/profile", web::get().to(profile))
                .route("/articles/search", web::get().to(search_articles))
                .route("/articles/category/{id}", web::get().to(articles_by_category))
                .route("/articles", web::get().to(list_articles))
                .route("/articles", web::post().to(create_article))
                .route("/articles/{id}", web::get().to(get_article))
                .route("/articles/{id}", web::put().to(update_article))
                .route("/articles/{id}", web::delete().to(delete_article))
                .route("/articles/{id}/categories", web::get().to(article_categories))
                .route("/articles/{id}/categories", web::post().to(assign_categories))
                .route("/articles/{id}/comments", web::get().to(list_comments))
                .route("/articles/{id}/comments", web::post().to(add_comment))
                .route("/categories", web::get().to(list_categories))
                .route("/categories", web::post().to(create_category))
                .route("/categories/{id}", web::delete().to(delete_category))
                .route("/comments/{id}", web::delete().to(delete_comment))
        })
        .workers(1)
        .shutdown_timeout(0)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr: SocketAddr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        Self {
            url: format!("http://{addr}"),
            blog,
            requests,
            paths,
        }
    }

    /// Paths of the requests received so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    /// Number of requests received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn blog(&self) -> MutexGuard<'_, Blog> {
        self.blog.lock().unwrap()
    }

    pub fn context(&self, token: Option<&str>) -> ViewContext {
        let store = match token {
            Some(token) => MemoryTokenStore::with_token(token),
            None => MemoryTokenStore::default(),
        };
        self.context_with(store)
    }

    pub fn context_with<S: TokenStore + 'static>(&self, store: S) -> ViewContext {
        let session = Arc::new(Session::new(store));
        ViewContext {
            client: Client::new(&self.url, session).unwrap(),
            nav: Navigator::new(Route::Home),
            confirm: Arc::new(AssumeConfirm(true)),
            notice_ttl: Duration::from_secs(3),
            per_page: 6,
        }
    }
}

type State = Data<Mutex<Blog>>;

fn message(text: &str) -> Value {
    json!({ "message": text })
}

/// Tokens this backend never issued are malformed, the JWT layer answers 422.
fn rejected(req: &HttpRequest) -> HttpResponse {
    let issued = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.starts_with("token-"))
        .unwrap_or(false);
    if issued {
        HttpResponse::Unauthorized().json(json!({ "msg": "Token has expired" }))
    } else {
        HttpResponse::UnprocessableEntity().json(json!({ "msg": "Not enough segments" }))
    }
}

fn text_field<'a>(body: &'a Value, name: &str) -> Option<&'a str> {
    body.get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

async fn login(state: State, body: Json<Value>) -> HttpResponse {
    let blog = state.lock().unwrap();
    let email = text_field(&body, "email").unwrap_or_default();
    let password = text_field(&body, "password").unwrap_or_default();
    match blog
        .users
        .iter()
        .find(|u| u.email == email && u.password == password)
    {
        Some(user) => HttpResponse::Ok().json(json!({ "token": user.token() })),
        None => HttpResponse::Unauthorized().json(message("Invalid email or password")),
    }
}

async fn register(state: State, body: Json<Value>) -> HttpResponse {
    let mut blog = state.lock().unwrap();
    let (Some(username), Some(email), Some(password)) = (
        text_field(&body, "username"),
        text_field(&body, "email"),
        text_field(&body, "password"),
    ) else {
        return HttpResponse::BadRequest().json(message("Missing fields"));
    };
    if blog.users.iter().any(|u| u.email == email) {
        return HttpResponse::BadRequest().json(message("User already exists"));
    }
    let id = blog.next_id();
    blog.users.push(User {
        id,
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    });
    HttpResponse::Created().json(message("User registered successfully"))
}

async fn profile(req: HttpRequest, state: State) -> HttpResponse {
    let blog = state.lock().unwrap();
    match blog.user_for(&req) {
        Some(user) => HttpResponse::Ok().json(json!({
            "id": user.id,
            "username": user.username,
            "email": user.email,
        })),
        None => rejected(&req),
    }
}

#[derive(Deserialize)]
struct PageQuery {
    q: Option<String>,
    page: Option<u64>,
    per_page: Option<u64>,
}

fn article_page(matched: Vec<&Article>, query: &PageQuery, default_per_page: u64) -> HttpResponse {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(default_per_page).max(1);

    let total = matched.len() as u64;
    let pages = total.div_ceil(per_page);
    let articles: Vec<&Article> = matched
        .into_iter()
        .skip(((page - 1) * per_page) as usize)
        .take(per_page as usize)
        .collect();

    HttpResponse::Ok().json(json!({
        "articles": articles,
        "total": total,
        "page": page,
        "pages": pages,
    }))
}

async fn list_articles(state: State, query: Query<PageQuery>) -> HttpResponse {
    let blog = state.lock().unwrap();
    let mut matched: Vec<&Article> = blog.articles.iter().collect();
    matched.sort_by(|a, b| b.id.cmp(&a.id));
    article_page(matched, &query, 6)
}

async fn search_articles(state: State, query: Query<PageQuery>) -> HttpResponse {
    let blog = state.lock().unwrap();
    let keyword = query.q.clone().unwrap_or_default().to_lowercase();
    let mut matched: Vec<&Article> = blog
        .articles
        .iter()
        .filter(|a| {
            a.title.to_lowercase().contains(&keyword)
                || a.content.to_lowercase().contains(&keyword)
        })
        .collect();
    matched.sort_by(|a, b| b.id.cmp(&a.id));
    article_page(matched, &query, 5)
}

async fn get_article(state: State, id: Path<u64>) -> HttpResponse {
    let blog = state.lock().unwrap();
    let id = id.into_inner();
    match blog.article(id) {
        Some(article) => {
            let mut article = article.clone();
            article.categories = Some(blog.categories_of(id));
            HttpResponse::Ok().json(article)
        }
        None => HttpResponse::NotFound().json(message("Article not found")),
    }
}

async fn create_article(req: HttpRequest, state: State, body: Json<Value>) -> HttpResponse {
    let mut blog = state.lock().unwrap();
    let Some(user) = blog.user_for(&req) else {
        return rejected(&req);
    };
    let author = user.username.clone();
    let (Some(title), Some(content)) = (text_field(&body, "title"), text_field(&body, "content"))
    else {
        return HttpResponse::BadRequest().json(message("Title and content are required"));
    };
    let id = blog.next_id();
    blog.articles.push(Article {
        id,
        title: title.to_string(),
        content: content.to_string(),
        author: Some(author),
        categories: None,
    });
    HttpResponse::Created().json(json!({ "message": "Article created", "id": id }))
}

async fn update_article(
    req: HttpRequest,
    state: State,
    id: Path<u64>,
    body: Json<Value>,
) -> HttpResponse {
    let mut blog = state.lock().unwrap();
    if blog.user_for(&req).is_none() {
        return rejected(&req);
    }
    let id = id.into_inner();
    let (Some(title), Some(content)) = (text_field(&body, "title"), text_field(&body, "content"))
    else {
        return HttpResponse::BadRequest().json(message("Title and content are required"));
    };
    let (title, content) = (title.to_string(), content.to_string());
    match blog.articles.iter_mut().find(|a| a.id == id) {
        Some(article) => {
            article.title = title;
            article.content = content;
            HttpResponse::Ok().json(message("Article updated"))
        }
        None => HttpResponse::NotFound().json(message("Article not found")),
    }
}

async fn delete_article(req: HttpRequest, state: State, id: Path<u64>) -> HttpResponse {
    let mut blog = state.lock().unwrap();
    if blog.user_for(&req).is_none() {
        return rejected(&req);
    }
    let id = id.into_inner();
    if blog.article(id).is_none() {
        return HttpResponse::NotFound().json(message("Article not found"));
    }
    blog.articles.retain(|a| a.id != id);
    blog.comments.retain(|c| c.article_id != Some(id));
    blog.assignments.remove(&id);
    HttpResponse::Ok().json(json!({
        "message": "Article deleted",
        "deleted_article_id": id,
    }))
}

async fn articles_by_category(state: State, id: Path<u64>) -> HttpResponse {
    let blog = state.lock().unwrap();
    let id = id.into_inner();
    let articles: Vec<&Article> = blog
        .articles
        .iter()
        .filter(|a| {
            blog.assignments
                .get(&a.id)
                .map(|ids| ids.contains(&id))
                .unwrap_or(false)
        })
        .collect();
    HttpResponse::Ok().json(json!({ "articles": articles }))
}

async fn list_categories(state: State) -> HttpResponse {
    let blog = state.lock().unwrap();
    HttpResponse::Ok().json(json!({ "categories": blog.categories }))
}

async fn create_category(req: HttpRequest, state: State, body: Json<Value>) -> HttpResponse {
    let mut blog = state.lock().unwrap();
    if blog.user_for(&req).is_none() {
        return rejected(&req);
    }
    let Some(name) = text_field(&body, "name") else {
        return HttpResponse::BadRequest().json(message("Category name is required"));
    };
    let name = name.to_string();
    if blog.categories.iter().any(|c| c.name == name) {
        return HttpResponse::BadRequest().json(message("Category already exists"));
    }
    let id = blog.next_id();
    blog.categories.push(Category {
        id,
        name: name.clone(),
    });
    let body = match blog.category_reply {
        CategoryReply::Inline => json!({ "id": id, "name": name }),
        CategoryReply::Nested => json!({
            "message": "Category created",
            "category": { "id": id, "name": name },
        }),
        CategoryReply::Bare => message("Category created"),
    };
    HttpResponse::Created().json(body)
}

async fn delete_category(req: HttpRequest, state: State, id: Path<u64>) -> HttpResponse {
    let mut blog = state.lock().unwrap();
    if blog.user_for(&req).is_none() {
        return rejected(&req);
    }
    let id = id.into_inner();
    if !blog.categories.iter().any(|c| c.id == id) {
        return HttpResponse::NotFound().json(message("Category not found"));
    }
    blog.categories.retain(|c| c.id != id);
    for ids in blog.assignments.values_mut() {
        ids.remove(&id);
    }
    HttpResponse::Ok().json(message("Category deleted"))
}

async fn article_categories(state: State, id: Path<u64>) -> HttpResponse {
    let blog = state.lock().unwrap();
    let id = id.into_inner();
    if blog.article(id).is_none() {
        return HttpResponse::NotFound().json(message("Article not found"));
    }
    HttpResponse::Ok().json(json!({ "categories": blog.categories_of(id) }))
}

async fn assign_categories(
    req: HttpRequest,
    state: State,
    id: Path<u64>,
    body: Json<Value>,
) -> HttpResponse {
    let mut blog = state.lock().unwrap();
    if blog.user_for(&req).is_none() {
        return rejected(&req);
    }
    let id = id.into_inner();
    if blog.article(id).is_none() {
        return HttpResponse::NotFound().json(message("Article not found"));
    }
    let ids: Vec<u64> = body
        .get("categories")
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_u64).collect())
        .unwrap_or_default();
    if ids.is_empty() {
        return HttpResponse::BadRequest().json(message("Category list is required"));
    }
    if ids
        .iter()
        .any(|cid| !blog.categories.iter().any(|c| c.id == *cid))
    {
        return HttpResponse::NotFound().json(message("Category not found"));
    }
    blog.assignments.entry(id).or_default().extend(ids);
    HttpResponse::Ok().json(message("Categories assigned"))
}

async fn list_comments(state: State, id: Path<u64>) -> HttpResponse {
    let blog = state.lock().unwrap();
    let id = id.into_inner();
    let comments: Vec<&Comment> = blog
        .comments
        .iter()
        .filter(|c| c.article_id == Some(id))
        .collect();
    HttpResponse::Ok().json(json!({ "comments": comments }))
}

async fn add_comment(
    req: HttpRequest,
    state: State,
    id: Path<u64>,
    body: Json<Value>,
) -> HttpResponse {
    let mut blog = state.lock().unwrap();
    let Some(user) = blog.user_for(&req) else {
        return rejected(&req);
    };
    let (user_id, username) = (user.id, user.username.clone());
    let id = id.into_inner();
    if blog.article(id).is_none() {
        return HttpResponse::NotFound().json(message("Article not found"));
    }
    let Some(content) = text_field(&body, "content") else {
        return HttpResponse::BadRequest().json(message("Comment content is required"));
    };
    let content = content.to_string();
    let comment = Comment {
        id: blog.next_id(),
        content,
        user: Some(username),
        user_id: Some(user_id),
        article_id: Some(id),
    };
    blog.comments.push(comment.clone());
    HttpResponse::Created().json(json!({ "message": "Comment added", "comment": comment }))
}

async fn delete_comment(req: HttpRequest, state: State, id: Path<u64>) -> HttpResponse {
    let mut blog = state.lock().unwrap();
    if blog.user_for(&req).is_none() {
        return rejected(&req);
    }
    let id = id.into_inner();
    if !blog.comments.iter().any(|c| c.id == id) {
        return HttpResponse::NotFound().json(message("Comment not found"));
    }
    blog.comments.retain(|c| c.id != id);
    HttpResponse::Ok().json(message("Comment deleted"))
}
