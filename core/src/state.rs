//! Display state for a screen backed by one remote resource.
//!
//! # Design
//! A `ResourceView` always has something to show. It starts with seeded
//! sample data and only replaces it with a successful result. A failed call
//! keeps the current data and records the error in `LoadState::Failed`, so a
//! screen can tell "backend unavailable, showing samples" apart from fresh
//! data.

use tracing::warn;

use crate::result::ApiResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Loaded,
    /// The last call failed; the data shown is whatever was there before.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceView<T> {
    data: T,
    state: LoadState,
    fresh: bool,
}

impl<T> ResourceView<T> {
    /// View showing `fallback` until a load succeeds.
    pub fn seeded(fallback: T) -> Self {
        Self {
            data: fallback,
            state: LoadState::Idle,
            fresh: false,
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// True while the data shown has never come from the service.
    pub fn is_fallback(&self) -> bool {
        !self.fresh
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn begin_load(&mut self) {
        self.state = LoadState::Loading;
    }

    /// Take the outcome of a load.
    pub fn apply(&mut self, result: ApiResult<T>) {
        match result {
            ApiResult::Data(data) => {
                self.data = data;
                self.fresh = true;
                self.state = LoadState::Loaded;
            }
            ApiResult::Error(error) => self.fail(error),
        }
    }

    /// `begin_load`, run `fetch`, `apply` its result.
    pub fn load(&mut self, fetch: impl FnOnce() -> ApiResult<T>) {
        self.begin_load();
        self.apply(fetch());
    }

    fn fail(&mut self, error: String) {
        warn!(error = %error, fallback = !self.fresh, "keeping previous data after failed call");
        self.state = LoadState::Failed { error };
    }
}

impl<R> ResourceView<Vec<R>> {
    /// Take the outcome of creating one record: on success it goes to the
    /// front of the list. Over fresh data a success clears an earlier
    /// failure; over fallback data a failed load stays reported.
    pub fn apply_created(&mut self, result: ApiResult<R>) {
        match result {
            ApiResult::Data(record) => {
                self.data.insert(0, record);
                if self.fresh {
                    self.state = LoadState::Loaded;
                }
            }
            ApiResult::Error(error) => self.fail(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<&'static str> {
        vec!["Event Staff for Wedding Reception", "Deep Cleaning Service"]
    }

    #[test]
    fn seeded_view_shows_fallback() {
        let view = ResourceView::seeded(samples());
        assert_eq!(view.data(), &samples());
        assert_eq!(view.state(), &LoadState::Idle);
        assert!(view.is_fallback());
        assert!(view.error().is_none());
    }

    #[test]
    fn success_replaces_data() {
        let mut view = ResourceView::seeded(samples());
        view.begin_load();
        assert!(view.is_loading());
        view.apply(ApiResult::Data(vec!["Housekeeping Staff"]));
        assert_eq!(view.data(), &vec!["Housekeeping Staff"]);
        assert_eq!(view.state(), &LoadState::Loaded);
        assert!(!view.is_fallback());
    }

    #[test]
    fn failure_keeps_fallback_and_is_observable() {
        let mut view = ResourceView::seeded(samples());
        view.load(|| ApiResult::Error("Network error: connection refused".to_string()));
        assert_eq!(view.data(), &samples());
        assert_eq!(view.error(), Some("Network error: connection refused"));
        assert!(view.is_fallback());
    }

    #[test]
    fn failure_after_success_keeps_fresh_data() {
        let mut view = ResourceView::seeded(samples());
        view.apply(ApiResult::Data(vec!["Transportation Service"]));
        view.apply(ApiResult::Error("API Error: 502 bad gateway".to_string()));
        assert_eq!(view.data(), &vec!["Transportation Service"]);
        assert!(!view.is_fallback());
        assert!(matches!(view.state(), LoadState::Failed { .. }));
    }

    #[test]
    fn created_record_is_prepended() {
        let mut view = ResourceView::seeded(samples());
        view.apply(ApiResult::Data(vec!["Transportation Service"]));
        view.apply_created(ApiResult::Data("Valet Parking"));
        assert_eq!(view.data(), &vec!["Valet Parking", "Transportation Service"]);
        assert_eq!(view.state(), &LoadState::Loaded);
    }

    #[test]
    fn create_after_failed_load_keeps_failure_visible() {
        let mut view = ResourceView::seeded(samples());
        view.load(|| ApiResult::Error("Network error: refused".to_string()));
        view.apply_created(ApiResult::Data("Valet Parking"));
        assert_eq!(view.data()[0], "Valet Parking");
        assert_eq!(view.data().len(), 3);
        assert_eq!(view.error(), Some("Network error: refused"));
        assert!(view.is_fallback());
    }

    #[test]
    fn create_after_late_failure_on_fresh_data_clears_it() {
        let mut view = ResourceView::seeded(samples());
        view.apply(ApiResult::Data(vec!["Transportation Service"]));
        view.apply_created(ApiResult::Error("API Error: 400 bad request".to_string()));
        view.apply_created(ApiResult::Data("Valet Parking"));
        assert_eq!(view.state(), &LoadState::Loaded);
        assert!(view.error().is_none());
    }

    #[test]
    fn failed_create_leaves_list_alone() {
        let mut view = ResourceView::seeded(samples());
        view.apply_created(ApiResult::Error("API Error: 400 bad request".to_string()));
        assert_eq!(view.data(), &samples());
        assert_eq!(view.error(), Some("API Error: 400 bad request"));
    }
}
