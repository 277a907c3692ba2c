use std::collections::BTreeSet;

use log::{debug, info};

use crate::client::RequestError;
use crate::types::article::Article;
use crate::types::category::Category;

use super::{Outcome, Phase, Ticket, ViewContext, ViewState};

/// Category management: list, add and delete.
pub struct CategoryAdminView {
    ctx: ViewContext,
    pub state: ViewState,
    pub categories: Vec<Category>,
}

impl CategoryAdminView {
    pub fn new(ctx: ViewContext) -> Self {
        let state = ViewState::new(&ctx);
        Self {
            ctx,
            state,
            categories: Vec::new(),
        }
    }

    pub async fn load(&mut self) -> Outcome<()> {
        let ticket = self.state.begin_fetch();
        let result = self.ctx.client.list_categories().await;
        self.apply_list(ticket, result)
    }

    pub fn apply_list(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Category>, RequestError>,
    ) -> Outcome<()> {
        if !self.state.accepts(ticket) {
            return self.state.discard();
        }
        match self
            .state
            .resolve(&self.ctx.nav, result, "Failed to load categories")
        {
            Outcome::Success(categories) => {
                self.categories = categories;
                Outcome::Success(())
            }
            other => other.map(|_| ()),
        }
    }

    /// Create a category. The created category is appended exactly once; when
    /// the response does not carry it the whole list is fetched again.
    pub async fn add(&mut self, name: &str) -> Outcome<()> {
        let name = name.trim();
        if name.is_empty() {
            return self.state.reject("Category name is required");
        }

        self.state.begin_mutation();
        let result = self.ctx.client.create_category(name).await;
        let resp = match self
            .state
            .resolve(&self.ctx.nav, result, "Failed to add category")
        {
            Outcome::Success(resp) => resp,
            other => return other.map(|_| ()),
        };

        match resp.into_category(name) {
            Some(category) => self.insert(category),
            None => {
                debug!("Create category response has no category, reload list");
                let ticket = self.state.begin_fetch();
                let result = self.ctx.client.list_categories().await;
                if !self.apply_list(ticket, result).is_success() {
                    // The category exists on the server, only the refresh failed.
                    self.state.phase = Phase::Success;
                }
            }
        }
        info!("Added category {name:?}");
        self.state.banner.success("Category added");
        Outcome::Success(())
    }

    pub async fn delete(&mut self, id: u64) -> Outcome<()> {
        self.state.begin_mutation();
        let result = self.ctx.client.delete_category(id).await;
        match self
            .state
            .resolve(&self.ctx.nav, result, "Failed to delete category")
        {
            Outcome::Success(_) => {
                info!("Deleted category {id}");
                self.categories.retain(|c| c.id != id);
                self.state.banner.success("Category deleted");
                Outcome::Success(())
            }
            other => other.map(|_| ()),
        }
    }

    pub fn close(&mut self) {
        self.state.close();
    }

    fn insert(&mut self, category: Category) {
        if self.categories.iter().any(|c| c.id == category.id) {
            return;
        }
        self.categories.push(category);
    }
}

/// Category assignment of one article.
pub struct ArticleCategoriesView {
    ctx: ViewContext,
    pub state: ViewState,
    pub article_id: Option<u64>,
    pub categories: Vec<Category>,
    pub selected: BTreeSet<u64>,
}

impl ArticleCategoriesView {
    pub fn new(ctx: ViewContext) -> Self {
        let state = ViewState::new(&ctx);
        Self {
            ctx,
            state,
            article_id: None,
            categories: Vec::new(),
            selected: BTreeSet::new(),
        }
    }

    /// Load every category and mark the ones already assigned to the article.
    pub async fn load(&mut self, article_id: u64) -> Outcome<()> {
        self.article_id = Some(article_id);
        self.state.phase = Phase::Pending;

        let result = self.ctx.client.list_categories().await;
        let categories = match self
            .state
            .resolve(&self.ctx.nav, result, "Failed to load categories")
        {
            Outcome::Success(categories) => categories,
            other => return other.map(|_| ()),
        };

        let result = self.ctx.client.article_categories(article_id).await;
        let assigned = match self.state.resolve(
            &self.ctx.nav,
            result,
            "Failed to load article categories",
        ) {
            Outcome::Success(assigned) => assigned,
            other => return other.map(|_| ()),
        };

        self.categories = categories;
        self.selected = assigned.into_iter().map(|c| c.id).collect();
        Outcome::Success(())
    }

    /// Flip the selection of a category, returns whether it is now selected.
    /// Unknown ids are ignored.
    pub fn toggle(&mut self, category_id: u64) -> bool {
        if !self.categories.iter().any(|c| c.id == category_id) {
            return false;
        }
        if self.selected.remove(&category_id) {
            return false;
        }
        self.selected.insert(category_id);
        true
    }

    pub async fn save(&mut self) -> Outcome<()> {
        let Some(article_id) = self.article_id else {
            return self.state.reject("No article selected");
        };
        if self.selected.is_empty() {
            return self.state.reject("Select at least one category");
        }

        self.state.phase = Phase::Pending;
        let ids: Vec<u64> = self.selected.iter().copied().collect();
        let result = self.ctx.client.assign_categories(article_id, ids).await;
        match self
            .state
            .resolve(&self.ctx.nav, result, "Failed to assign categories")
        {
            Outcome::Success(_) => {
                info!("Assigned {} categories to article {article_id}", self.selected.len());
                self.state.banner.success("Categories assigned");
                Outcome::Success(())
            }
            other => other.map(|_| ()),
        }
    }
}

/// Articles filed under one category.
pub struct CategoryArticlesView {
    ctx: ViewContext,
    pub state: ViewState,
    pub category_id: Option<u64>,
    pub articles: Vec<Article>,
}

impl CategoryArticlesView {
    pub fn new(ctx: ViewContext) -> Self {
        let state = ViewState::new(&ctx);
        Self {
            ctx,
            state,
            category_id: None,
            articles: Vec::new(),
        }
    }

    pub async fn load(&mut self, category_id: u64) -> Outcome<()> {
        self.category_id = Some(category_id);
        let ticket = self.state.begin_fetch();
        let result = self.ctx.client.articles_by_category(category_id).await;
        if !self.state.accepts(ticket) {
            return self.state.discard();
        }
        match self
            .state
            .resolve(&self.ctx.nav, result, "Failed to load articles")
        {
            Outcome::Success(articles) => {
                self.articles = articles;
                Outcome::Success(())
            }
            other => other.map(|_| ()),
        }
    }
}
