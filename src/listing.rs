//! Paginated admin listings: query state, debounced search and the fetch hook.

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use serde::de::DeserializeOwned;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::wire::Normalize;
use crate::cancel::RequestScope;
use crate::config::config;
use crate::models::PageOf;
use crate::session::use_session;

#[derive(Clone, Debug, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    /// Query parameter the filter is sent as (`status`, `level`, ...).
    pub filter_key: &'static str,
    pub filter: Option<String>,
    /// Bumped to fetch the same page again.
    pub generation: u32,
}

impl ListQuery {
    pub fn new(limit: u32, filter_key: &'static str) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            search: String::new(),
            filter_key,
            filter: None,
            generation: 0,
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("search", search.to_string()));
        }
        if let Some(filter) = self.filter.as_deref().filter(|f| !f.is_empty() && *f != "all") {
            pairs.push((self.filter_key, filter.to_string()));
        }
        pairs
    }
}

pub enum QueryAction {
    Search(String),
    Filter(Option<String>),
    Page(u32),
    Reload,
}

impl Reducible for ListQuery {
    type Action = QueryAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            QueryAction::Search(search) if search.trim() != self.search.trim() => Rc::new(Self {
                search,
                page: 1,
                ..(*self).clone()
            }),
            QueryAction::Filter(filter) if filter != self.filter => Rc::new(Self {
                filter,
                page: 1,
                ..(*self).clone()
            }),
            QueryAction::Page(page) if page.max(1) != self.page => Rc::new(Self {
                page: page.max(1),
                ..(*self).clone()
            }),
            QueryAction::Reload => Rc::new(Self {
                generation: self.generation.wrapping_add(1),
                ..(*self).clone()
            }),
            _ => self,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListState<T> {
    pub loading: bool,
    pub page: Option<PageOf<T>>,
    pub error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            loading: true,
            page: None,
            error: None,
        }
    }
}

/// Trails `value` by `delay_ms`; every change restarts the timer.
#[hook]
pub fn use_debounced(value: String, delay_ms: u32) -> String {
    let debounced = use_state(|| value.clone());
    {
        let debounced = debounced.clone();
        use_effect_with_deps(
            move |value: &String| {
                let value = value.clone();
                let timeout = Timeout::new(delay_ms, move || debounced.set(value));
                move || drop(timeout)
            },
            value,
        );
    }
    (*debounced).clone()
}

/// Query state for one admin table plus the raw search box text. The box
/// updates on every keystroke; the query only sees it once typing pauses.
#[hook]
pub fn use_list_query(
    filter_key: &'static str,
) -> (UseReducerHandle<ListQuery>, UseStateHandle<String>) {
    let settings = config();
    let query = use_reducer(|| ListQuery::new(settings.page_size, filter_key));
    let search = use_state(String::new);
    let debounced = use_debounced((*search).clone(), settings.search_debounce_ms);

    {
        let query = query.clone();
        use_effect_with_deps(
            move |search: &String| {
                query.dispatch(QueryAction::Search(search.clone()));
                || ()
            },
            debounced,
        );
    }

    (query, search)
}

/// Fetches one page of `path` whenever `query` changes. The
/// previous request is aborted first, so a slow earlier answer can't land
/// on top of a newer one.
#[hook]
pub fn use_paged_list<P>(
    path: &'static str,
    query: ListQuery,
) -> UseStateHandle<ListState<P::Output>>
where
    P: Normalize + DeserializeOwned + 'static,
    P::Output: Clone + PartialEq + 'static,
{
    let state = use_state(ListState::<P::Output>::default);
    let session = use_session();

    {
        let state = state.clone();
        use_effect_with_deps(
            move |query: &ListQuery| {
                let scope = RequestScope::new();
                let api = session.api().scoped(&scope);
                let query = query.clone();
                state.set(ListState {
                    loading: true,
                    page: state.page.clone(),
                    error: None,
                });

                let task_scope = scope.clone();
                spawn_local(async move {
                    let result = api.list::<P>(path, &query).await;
                    if task_scope.is_cancelled() {
                        return;
                    }
                    match result {
                        Ok(page) => state.set(ListState {
                            loading: false,
                            page: Some(page),
                            error: None,
                        }),
                        Err(err) => {
                            warn!("Listing {} failed: {}", path, err);
                            session.report(&err);
                            state.set(ListState {
                                loading: false,
                                page: None,
                                error: Some(err.to_string()),
                            });
                        }
                    }
                });

                move || scope.cancel()
            },
            query,
        );
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reduce(query: ListQuery, action: QueryAction) -> ListQuery {
        (*Rc::new(query).reduce(action)).clone()
    }

    #[test]
    fn test_search_resets_page() {
        let mut query = ListQuery::new(10, "status");
        query.page = 4;
        let query = reduce(query, QueryAction::Search("ada".into()));
        assert_eq!(query.page, 1);
        assert_eq!(query.search, "ada");
    }

    #[test]
    fn test_filter_resets_page() {
        let mut query = ListQuery::new(10, "status");
        query.page = 3;
        let query = reduce(query, QueryAction::Filter(Some("completed".into())));
        assert_eq!(query.page, 1);
        assert_eq!(query.filter.as_deref(), Some("completed"));
    }

    #[test]
    fn test_unchanged_search_keeps_page() {
        let mut query = ListQuery::new(10, "status");
        query.search = "ada".into();
        query.page = 2;
        let query = reduce(query, QueryAction::Search("ada ".into()));
        assert_eq!(query.page, 2);
    }

    #[test]
    fn test_page_never_below_one() {
        let query = reduce(ListQuery::new(10, "status"), QueryAction::Page(0));
        assert_eq!(query.page, 1);
        let query = reduce(query, QueryAction::Page(5));
        assert_eq!(query.page, 5);
    }

    #[test]
    fn test_reload_refetches_same_page() {
        let mut query = ListQuery::new(10, "status");
        query.page = 3;
        query.filter = Some("failed".into());
        let before = query.clone();
        let query = reduce(query, QueryAction::Reload);
        assert_ne!(query, before);
        assert_eq!(query.page, 3);
        assert_eq!(query.filter.as_deref(), Some("failed"));
        assert_eq!(query.query_pairs(), before.query_pairs());
    }

    #[test]
    fn test_query_pairs() {
        let mut query = ListQuery::new(20, "level");
        query.page = 2;
        query.search = "  obi ".into();
        query.filter = Some("300".into());
        assert_eq!(
            query.query_pairs(),
            vec![
                ("page", "2".to_string()),
                ("limit", "20".to_string()),
                ("search", "obi".to_string()),
                ("level", "300".to_string()),
            ]
        );
    }

    #[test]
    fn test_all_filter_is_omitted() {
        let mut query = ListQuery::new(10, "status");
        query.filter = Some("all".into());
        assert_eq!(query.query_pairs().len(), 2);
    }
}
