use super::Phase;
use super::api::{ApiHook, ApiHookOptions};
use crate::error::ApiError;
use crate::services::PageQuery;
use crate::toast::Toasts;
use payloads::responses::{Paginated, total_pages};
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub current: u32,
    pub page_size: u32,
    pub total: u64,
}

pub struct PaginatedHookOptions<T> {
    pub initial_page: u32,
    pub initial_page_size: u32,
    pub api: ApiHookOptions<Paginated<T>>,
}

impl<T> Default for PaginatedHookOptions<T> {
    fn default() -> Self {
        Self {
            initial_page: 1,
            initial_page_size: 10,
            api: ApiHookOptions::default(),
        }
    }
}

/// Page/filter bookkeeping over a single-call hook. The inner hook is
/// never auto-executed; fetches happen through `execute`, `change_page`,
/// `change_filters`, and `refresh`.
///
/// Invariant: changing filters always lands on page 1; changing only the
/// page preserves the filters.
pub struct PaginatedHook<T> {
    inner: ApiHook<PageQuery, Paginated<T>>,
    pagination: Arc<Mutex<PaginationState>>,
    filters: Arc<Mutex<Map<String, Value>>>,
    initial_page: u32,
    initial_page_size: u32,
}

impl<T> Clone for PaginatedHook<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            pagination: self.pagination.clone(),
            filters: self.filters.clone(),
            initial_page: self.initial_page,
            initial_page_size: self.initial_page_size,
        }
    }
}

impl<T> PaginatedHook<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(
        func: F,
        toasts: Toasts,
        options: PaginatedHookOptions<T>,
    ) -> Self
    where
        F: Fn(PageQuery) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Paginated<T>, ApiError>> + Send + 'static,
    {
        let PaginatedHookOptions {
            initial_page,
            initial_page_size,
            api,
        } = options;
        Self {
            inner: ApiHook::new(func, toasts, api),
            pagination: Arc::new(Mutex::new(PaginationState {
                current: initial_page,
                page_size: initial_page_size,
                total: 0,
            })),
            filters: Arc::new(Mutex::new(Map::new())),
            initial_page,
            initial_page_size,
        }
    }

    /// Fetch the current page. `extra` params are merged on top of the
    /// page/filter state for this call only. When the server reports its
    /// own pagination, it takes precedence over local bookkeeping.
    pub async fn execute(
        &self,
        extra: Map<String, Value>,
    ) -> Result<Option<Paginated<T>>, ApiError> {
        let query = {
            let pagination = self.pagination.lock().unwrap();
            let mut filters = self.filters.lock().unwrap().clone();
            filters.extend(extra);
            PageQuery {
                page: pagination.current,
                page_size: pagination.page_size,
                filters,
            }
        };

        let result = self.inner.execute(query).await?;

        if let Some(page) = &result {
            let mut pagination = self.pagination.lock().unwrap();
            pagination.total = page.pagination.total;
            pagination.current = page.pagination.current;
            pagination.page_size = page.pagination.page_size;
        }
        Ok(result)
    }

    /// Move to another page (optionally with a new page size) and
    /// re-fetch. Filters are preserved.
    pub async fn change_page(
        &self,
        page: u32,
        page_size: Option<u32>,
    ) -> Result<Option<Paginated<T>>, ApiError> {
        {
            let mut pagination = self.pagination.lock().unwrap();
            pagination.current = page;
            if let Some(page_size) = page_size {
                pagination.page_size = page_size;
            }
        }
        self.execute(Map::new()).await
    }

    /// Replace the filter set, reset to page 1, and re-fetch.
    pub async fn change_filters(
        &self,
        filters: Map<String, Value>,
    ) -> Result<Option<Paginated<T>>, ApiError> {
        {
            *self.filters.lock().unwrap() = filters;
            self.pagination.lock().unwrap().current = 1;
        }
        self.execute(Map::new()).await
    }

    /// Re-fetch the current page with the current filters.
    pub async fn refresh(&self) -> Result<Option<Paginated<T>>, ApiError> {
        self.execute(Map::new()).await
    }

    /// Restore the initial page and page size, clear filters and the
    /// total, and reset the underlying call state.
    pub fn reset_pagination(&self) {
        {
            let mut pagination = self.pagination.lock().unwrap();
            pagination.current = self.initial_page;
            pagination.page_size = self.initial_page_size;
            pagination.total = 0;
        }
        self.filters.lock().unwrap().clear();
        self.inner.reset();
    }

    pub fn pagination(&self) -> PaginationState {
        *self.pagination.lock().unwrap()
    }

    pub fn filters(&self) -> Map<String, Value> {
        self.filters.lock().unwrap().clone()
    }

    pub fn total_pages(&self) -> u32 {
        let pagination = self.pagination();
        total_pages(pagination.total, pagination.page_size)
    }

    pub fn data(&self) -> Option<Paginated<T>> {
        self.inner.data()
    }

    pub fn error(&self) -> Option<ApiError> {
        self.inner.error()
    }

    pub fn phase(&self) -> Phase {
        self.inner.phase()
    }

    pub fn loading(&self) -> bool {
        self.inner.loading()
    }
}
