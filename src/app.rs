use crate::api::RecommendationSet;
use crate::catalog;
use crate::fetch::messages::CycleResult;
use crate::fetch::{CycleTracker, Generation};
use crate::route::Route;
use chrono::{DateTime, Local};

/// Input mode for the path prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// State owned by the recommender page. Dropped when the page is left.
#[derive(Debug, Clone, Default)]
pub struct RecommenderView {
    /// Committed selection; empty means "no selection".
    pub item_id: String,
    /// Highlighted row in the picker (0 is the placeholder).
    pub cursor: usize,
    pub results: RecommendationSet,
    /// Newest cycle started from this view that has not reported back.
    pub in_flight: Option<Generation>,
    pub last_error: Option<String>,
    pub updated_at: Option<DateTime<Local>>,
}

impl RecommenderView {
    pub fn new() -> Self {
        Self::default()
    }

    /// The action control is live only with a committed selection.
    pub fn can_recommend(&self) -> bool {
        !self.item_id.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn cursor_next(&mut self) {
        if self.cursor + 1 < catalog::OPTION_COUNT {
            self.cursor += 1;
        }
    }

    pub fn cursor_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Commit the highlighted picker row as the selection.
    pub fn commit_cursor(&mut self) {
        if let Some(value) = catalog::option_value(self.cursor) {
            self.item_id = value.to_string();
        }
    }

    /// Select `item_id` directly. Ids outside the catalog are refused.
    pub fn select(&mut self, item_id: &str) -> bool {
        if !catalog::is_valid(item_id) {
            return false;
        }
        self.item_id = item_id.to_string();
        self.cursor = catalog::option_index(item_id);
        true
    }

    /// Start a cycle for the current selection, if there is one.
    pub fn begin_cycle(&mut self, tracker: &mut CycleTracker) -> Option<(Generation, String)> {
        if !self.can_recommend() {
            return None;
        }
        let generation = tracker.begin();
        self.in_flight = Some(generation);
        Some((generation, self.item_id.clone()))
    }
}

/// What became of a finished cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Updated,
    Failed,
    /// A newer cycle was started, or the page was left, before this one finished.
    Stale,
}

/// Main application state.
pub struct App {
    pub should_quit: bool,
    pub route: Route,
    pub show_help: bool,

    // Path prompt (`:`)
    pub input_mode: InputMode,
    pub path_input: String,

    pub recommender: RecommenderView,
    pub tracker: CycleTracker,

    pub status_msg: String,
}

impl App {
    pub fn new(route: Route) -> Self {
        Self {
            should_quit: false,
            route,
            show_help: false,

            input_mode: InputMode::Normal,
            path_input: String::new(),

            recommender: RecommenderView::new(),
            tracker: CycleTracker::default(),

            status_msg: String::new(),
        }
    }

    /// Show the page at `path`. Leaving the recommender page discards its
    /// state and any cycle it still has outstanding.
    pub fn navigate(&mut self, path: &str) {
        self.go_to(Route::parse(path));
    }

    pub fn go_to(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        if self.route == Route::Recommender {
            self.recommender = RecommenderView::new();
            self.tracker.invalidate();
        }
        tracing::debug!(from = self.route.path(), to = route.path(), "navigate");
        self.route = route;
        self.status_msg.clear();
    }

    pub fn start_path_prompt(&mut self) {
        self.input_mode = InputMode::Editing;
        self.path_input = self.route.path().to_string();
    }

    pub fn submit_path_prompt(&mut self) {
        self.input_mode = InputMode::Normal;
        let path = std::mem::take(&mut self.path_input);
        self.navigate(path.trim());
    }

    pub fn cancel_path_prompt(&mut self) {
        self.input_mode = InputMode::Normal;
        self.path_input.clear();
    }

    /// Handle the action control. Returns the cycle to run, or `None` when
    /// the control is disabled.
    pub fn request_recommendations(&mut self) -> Option<(Generation, String)> {
        match self.recommender.begin_cycle(&mut self.tracker) {
            Some((generation, item_id)) => {
                tracing::info!(generation, item_id = %item_id, "fetch cycle started");
                self.status_msg = format!("Fetching recommendations for {item_id}...");
                Some((generation, item_id))
            }
            None => {
                self.status_msg = "Select an item first".to_string();
                None
            }
        }
    }

    /// Fold a finished cycle into the view.
    ///
    /// Only the newest cycle counts. On success all three lists are replaced
    /// at once; on failure they are left exactly as they were.
    pub fn apply_fetch(&mut self, result: CycleResult) -> Applied {
        let CycleResult {
            generation,
            item_id,
            outcome,
        } = result;

        if !self.tracker.is_current(generation) {
            tracing::debug!(
                generation,
                latest = self.tracker.latest(),
                item_id = %item_id,
                "discarding superseded fetch result"
            );
            return Applied::Stale;
        }

        let view = &mut self.recommender;
        view.in_flight = None;
        match outcome {
            Ok(results) => {
                tracing::info!(generation, item_id = %item_id, total = results.total(), "fetch cycle complete");
                view.results = results;
                view.last_error = None;
                view.updated_at = Some(Local::now());
                self.status_msg = format!("Recommendations for {item_id}");
                Applied::Updated
            }
            Err(err) => {
                tracing::error!(
                    generation,
                    item_id = %item_id,
                    recommender = %err.recommender(),
                    error = %err,
                    "error fetching recommendations"
                );
                let message = err.user_message();
                self.status_msg = if err.is_retryable() {
                    format!("Fetch failed: {message}; press r to retry")
                } else {
                    format!("Fetch failed: {message}")
                };
                view.last_error = Some(message);
                Applied::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Source;
    use crate::fetch::FetchError;

    fn ok_result(generation: Generation, collaborative: &[&str], content: &[&str]) -> CycleResult {
        CycleResult {
            generation,
            item_id: catalog::VALID_ITEM_IDS[0].to_string(),
            outcome: Ok(RecommendationSet {
                collaborative: collaborative.iter().map(ToString::to_string).collect(),
                content: content.iter().map(ToString::to_string).collect(),
                azure: Vec::new(),
            }),
        }
    }

    fn err_result(generation: Generation) -> CycleResult {
        CycleResult {
            generation,
            item_id: catalog::VALID_ITEM_IDS[0].to_string(),
            outcome: Err(FetchError::Network {
                recommender: Source::Content,
                reason: "connection refused".to_string(),
                timed_out: false,
            }),
        }
    }

    fn app_with_selection() -> App {
        let mut app = App::new(Route::Recommender);
        assert!(app.recommender.select(catalog::VALID_ITEM_IDS[0]));
        app
    }

    #[test]
    fn test_initial_view_state() {
        let app = App::new(Route::Recommender);
        assert_eq!(app.recommender.item_id, "");
        assert_eq!(app.recommender.results, RecommendationSet::default());
        assert!(!app.recommender.can_recommend());
    }

    #[test]
    fn test_action_disabled_without_selection() {
        let mut app = App::new(Route::Recommender);
        assert!(app.request_recommendations().is_none());
        assert_eq!(app.tracker.latest(), 0);
        assert!(!app.recommender.is_loading());
    }

    #[test]
    fn test_picker_commit() {
        let mut view = RecommenderView::new();
        view.cursor_next();
        view.cursor_next();
        view.commit_cursor();
        assert_eq!(view.item_id, catalog::VALID_ITEM_IDS[1]);
        assert!(view.can_recommend());

        view.cursor = 0;
        view.commit_cursor();
        assert_eq!(view.item_id, "");
        assert!(!view.can_recommend());
    }

    #[test]
    fn test_picker_cursor_bounds() {
        let mut view = RecommenderView::new();
        view.cursor_prev();
        assert_eq!(view.cursor, 0);
        for _ in 0..50 {
            view.cursor_next();
        }
        assert_eq!(view.cursor, catalog::OPTION_COUNT - 1);
    }

    #[test]
    fn test_select_rejects_unknown_id() {
        let mut view = RecommenderView::new();
        assert!(!view.select("123"));
        assert_eq!(view.item_id, "");
    }

    #[test]
    fn test_apply_success_replaces_lists() {
        let mut app = app_with_selection();
        let (generation, _) = app.request_recommendations().unwrap();
        assert!(app.recommender.is_loading());

        let applied = app.apply_fetch(ok_result(generation, &["a", "b"], &["1", "2"]));

        assert_eq!(applied, Applied::Updated);
        assert_eq!(app.recommender.results.collaborative, vec!["a", "b"]);
        assert_eq!(app.recommender.results.content, vec!["1", "2"]);
        assert!(app.recommender.results.azure.is_empty());
        assert!(!app.recommender.is_loading());
        assert!(app.recommender.updated_at.is_some());
    }

    #[test]
    fn test_apply_failure_keeps_previous_lists() {
        let mut app = app_with_selection();
        let (generation, _) = app.request_recommendations().unwrap();
        app.apply_fetch(ok_result(generation, &["a"], &["b"]));
        let before = app.recommender.results.clone();

        let (generation, _) = app.request_recommendations().unwrap();
        let applied = app.apply_fetch(err_result(generation));

        assert_eq!(applied, Applied::Failed);
        assert_eq!(app.recommender.results, before);
        assert!(app.recommender.last_error.is_some());
        assert!(app.status_msg.starts_with("Fetch failed"));
        assert!(!app.recommender.is_loading());
    }

    #[test]
    fn test_superseded_cycle_is_discarded() {
        let mut app = app_with_selection();
        let (first, _) = app.request_recommendations().unwrap();
        let (second, _) = app.request_recommendations().unwrap();

        // Newer cycle lands first, older one afterwards.
        assert_eq!(app.apply_fetch(ok_result(second, &["new"], &[])), Applied::Updated);
        assert_eq!(app.apply_fetch(ok_result(first, &["old"], &[])), Applied::Stale);

        assert_eq!(app.recommender.results.collaborative, vec!["new"]);
    }

    #[test]
    fn test_older_cycle_landing_first_is_discarded() {
        let mut app = app_with_selection();
        let (first, _) = app.request_recommendations().unwrap();
        let (second, _) = app.request_recommendations().unwrap();

        assert_eq!(app.apply_fetch(ok_result(first, &["old"], &[])), Applied::Stale);
        assert!(app.recommender.is_loading());
        assert!(app.recommender.results.collaborative.is_empty());

        app.apply_fetch(ok_result(second, &["new"], &[]));
        assert_eq!(app.recommender.results.collaborative, vec!["new"]);
    }

    #[test]
    fn test_leaving_page_resets_view_and_drops_pending_cycle() {
        let mut app = app_with_selection();
        let (generation, _) = app.request_recommendations().unwrap();

        app.navigate("/");
        app.navigate("/recommender");

        assert_eq!(app.apply_fetch(ok_result(generation, &["late"], &[])), Applied::Stale);
        assert_eq!(app.recommender.item_id, "");
        assert!(app.recommender.results.collaborative.is_empty());
    }

    #[test]
    fn test_navigate_same_route_keeps_state() {
        let mut app = app_with_selection();
        app.navigate("/recommender");
        assert_eq!(app.recommender.item_id, catalog::VALID_ITEM_IDS[0]);
    }

    #[test]
    fn test_navigate_unknown_path() {
        let mut app = App::new(Route::Home);
        app.navigate("/does-not-exist");
        assert_eq!(app.route, Route::NotFound("/does-not-exist".to_string()));
    }

    #[test]
    fn test_path_prompt() {
        let mut app = App::new(Route::Home);
        app.start_path_prompt();
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.path_input, "/");

        app.path_input.push_str("recommender");
        app.submit_path_prompt();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.route, Route::Recommender);

        app.start_path_prompt();
        app.path_input.push('x');
        app.cancel_path_prompt();
        assert_eq!(app.route, Route::Recommender);
        assert!(app.path_input.is_empty());
    }
}
