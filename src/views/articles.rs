use log::{debug, info};

use crate::client::RequestError;
use crate::types::article::{Article, ArticlePage};

use super::comments::CommentsView;
use super::{Outcome, Phase, Ticket, ViewContext, ViewState};

/// Paged, searchable article list.
///
/// Fetches are split into [`ArticleListView::begin_fetch`] and
/// [`ArticleListView::apply_page`] so a response that lost the race against a
/// newer fetch or a delete is dropped instead of overwriting the list.
pub struct ArticleListView {
    ctx: ViewContext,
    pub state: ViewState,
    pub articles: Vec<Article>,
    pub query: String,
    pub page: u64,
    pub pages: u64,
    pub total: u64,
    searching: bool,
}

impl ArticleListView {
    pub const DELETE_PROMPT: &'static str = "Are you sure you want to delete this article?";

    pub fn new(ctx: ViewContext) -> Self {
        let state = ViewState::new(&ctx);
        Self {
            ctx,
            state,
            articles: Vec::new(),
            query: String::new(),
            page: 1,
            pages: 0,
            total: 0,
            searching: false,
        }
    }

    /// First page of the default listing.
    pub async fn load(&mut self) -> Outcome<()> {
        self.set_search(None);
        self.fetch(1).await
    }

    /// First page of the articles matching `query`. An empty query matches
    /// everything, so the page has the same shape as [`ArticleListView::load`].
    /// Paging keeps using the search until the next `load`.
    pub async fn search(&mut self, query: &str) -> Outcome<()> {
        self.set_search(Some(query));
        self.fetch(1).await
    }

    /// Switch between the default listing (`None`) and a search without
    /// fetching. The next [`ArticleListView::goto`] uses it.
    pub fn set_search(&mut self, query: Option<&str>) {
        self.query = query.map(|q| q.trim().to_string()).unwrap_or_default();
        self.searching = query.is_some();
    }

    /// Move to `page`, clamped to the known page range once a page was loaded.
    pub async fn goto(&mut self, page: u64) -> Outcome<()> {
        let page = if self.pages == 0 {
            page.max(1)
        } else {
            page.clamp(1, self.pages)
        };
        self.fetch(page).await
    }

    /// `None` when already on the last page.
    pub async fn next_page(&mut self) -> Option<Outcome<()>> {
        if self.page >= self.pages {
            return None;
        }
        Some(self.fetch(self.page + 1).await)
    }

    /// `None` when already on the first page.
    pub async fn prev_page(&mut self) -> Option<Outcome<()>> {
        if self.page <= 1 {
            return None;
        }
        Some(self.fetch(self.page - 1).await)
    }

    pub fn begin_fetch(&mut self) -> Ticket {
        self.state.begin_fetch()
    }

    pub fn apply_page(
        &mut self,
        ticket: Ticket,
        result: Result<ArticlePage, RequestError>,
    ) -> Outcome<()> {
        if !self.state.accepts(ticket) {
            return self.state.discard();
        }
        let outcome = self
            .state
            .resolve(&self.ctx.nav, result, "Failed to load articles");
        match outcome {
            Outcome::Success(page) => {
                debug!(
                    "Loaded articles page {}/{}, total {}",
                    page.page, page.pages, page.total
                );
                self.articles = page.articles;
                self.page = page.page;
                self.pages = page.pages;
                self.total = page.total;
                Outcome::Success(())
            }
            other => other.map(|_| ()),
        }
    }

    /// Delete an article after confirmation. Only that id leaves the local list.
    pub async fn delete(&mut self, id: u64) -> Outcome<()> {
        if !self.ctx.confirm.confirm(Self::DELETE_PROMPT) {
            return self.state.cancel();
        }

        self.state.begin_mutation();
        let result = self.ctx.client.delete_article(id).await;
        let outcome = self
            .state
            .resolve(&self.ctx.nav, result, "Failed to delete article");
        match outcome {
            Outcome::Success(resp) => {
                let removed = resp.deleted_article_id.unwrap_or(id);
                let before = self.articles.len();
                self.articles.retain(|article| article.id != removed);
                if self.articles.len() < before {
                    self.total = self.total.saturating_sub(1);
                }
                info!("Deleted article {removed}");
                self.state.banner.success("Article deleted");
                Outcome::Success(())
            }
            other => other.map(|_| ()),
        }
    }

    pub fn close(&mut self) {
        self.state.close();
    }

    async fn fetch(&mut self, page: u64) -> Outcome<()> {
        let ticket = self.begin_fetch();
        let per_page = self.ctx.per_page;
        let result = if self.searching {
            self.ctx
                .client
                .search_articles(&self.query, page, per_page)
                .await
        } else {
            self.ctx.client.list_articles(page, per_page).await
        };
        self.apply_page(ticket, result)
    }
}

/// One article with its comments.
pub struct ArticleDetailView {
    ctx: ViewContext,
    pub state: ViewState,
    pub article: Option<Article>,
    pub comments: CommentsView,
}

impl ArticleDetailView {
    pub fn new(ctx: ViewContext) -> Self {
        let state = ViewState::new(&ctx);
        let comments = CommentsView::new(ctx.clone());
        Self {
            ctx,
            state,
            article: None,
            comments,
        }
    }

    pub async fn load(&mut self, id: u64) -> Outcome<()> {
        self.state.phase = Phase::Pending;
        let result = self.ctx.client.get_article(id).await;
        let text = match &result {
            Err(err) if err.is_not_found() => "Article not found",
            _ => "Failed to load article",
        };
        match self.state.resolve(&self.ctx.nav, result, text) {
            Outcome::Success(article) => self.article = Some(article),
            other => return other.map(|_| ()),
        }

        // A failed comment list still leaves the article readable.
        self.comments.load(id).await;
        Outcome::Success(())
    }
}
