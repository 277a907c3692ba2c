use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

/// A screen of the application, displayed as its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Articles,
    ArticleDetail(u64),
    AddArticle,
    EditArticle(u64),
    Categories,
    ArticleCategories(u64),
    CategoryArticles(u64),
    Profile,
    Login,
    Register,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Articles => write!(f, "/articles"),
            Route::ArticleDetail(id) => write!(f, "/articles/{id}"),
            Route::AddArticle => write!(f, "/add-article"),
            Route::EditArticle(id) => write!(f, "/articles/edit/{id}"),
            Route::Categories => write!(f, "/add-category"),
            Route::ArticleCategories(id) => write!(f, "/articles/{id}/add-category"),
            Route::CategoryArticles(id) => write!(f, "/categories/{id}/articles"),
            Route::Profile => write!(f, "/profile"),
            Route::Login => write!(f, "/login"),
            Route::Register => write!(f, "/register"),
        }
    }
}

/// Shared handle on the current route. Clones point to the same route, so any
/// view can redirect.
#[derive(Clone)]
pub struct Navigator {
    current: Arc<Mutex<Route>>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    pub fn go(&self, route: Route) {
        let mut current = self.lock();
        if *current == route {
            return;
        }
        debug!("Navigate to {route}");
        *current = route;
    }

    pub fn current(&self) -> Route {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, Route> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}
