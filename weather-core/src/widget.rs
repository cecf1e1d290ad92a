//! Widget controller: owns the display state and drives searches.
//!
//! A search is split into [`WeatherWidget::begin_search`],
//! [`WeatherWidget::fetch`] and [`WeatherWidget::complete_search`] so a caller
//! can render the loading state while the request is in flight. Every search
//! gets a sequence number; only the latest one may touch the state, so a slow
//! response for an old city or unit system can never overwrite a newer one.

use serde::Serialize;

use crate::{
    error::{SearchRejected, WeatherError},
    model::{UnitSystem, WeatherReport, WeatherRequest},
    provider::WeatherProvider,
};

/// Everything the renderer needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub units: UnitSystem,
    pub loading: bool,
    pub error: Option<String>,
    pub report: Option<WeatherReport>,
}

impl ViewState {
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        if loading {
            self.error = None;
        }
    }

    /// Replaces snapshot and forecast together.
    pub fn apply_result(&mut self, report: WeatherReport) {
        self.report = Some(report);
        self.error = None;
    }

    /// Leaves the previous report in place; the error takes over the display.
    pub fn apply_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Highest-priority mode wins: loading, error, data, then the placeholder.
    pub fn render_mode(&self) -> RenderMode<'_> {
        if self.loading {
            RenderMode::Loading
        } else if let Some(error) = &self.error {
            RenderMode::Error(error)
        } else if let Some(report) = &self.report {
            RenderMode::Data(report)
        } else {
            RenderMode::NoData
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderMode<'a> {
    Loading,
    Error(&'a str),
    Data(&'a WeatherReport),
    NoData,
}

/// Handle for one in-flight search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    request: WeatherRequest,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn request(&self) -> &WeatherRequest {
        &self.request
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Pre-flight validation failed; nothing was fetched.
    Rejected(SearchRejected),
    /// The response (success or error) is now on display.
    Applied,
    /// A newer search started meanwhile; the response was dropped.
    Stale,
}

#[derive(Debug)]
pub struct WeatherWidget {
    provider: Box<dyn WeatherProvider>,
    state: ViewState,
    default_city: String,
    last_city: Option<String>,
    seq: u64,
}

impl WeatherWidget {
    pub fn new(provider: Box<dyn WeatherProvider>, default_city: impl Into<String>, units: UnitSystem) -> Self {
        Self {
            provider,
            state: ViewState { units, ..ViewState::default() },
            default_city: default_city.into(),
            last_city: None,
            seq: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn units(&self) -> UnitSystem {
        self.state.units
    }

    /// City used by [`Self::refresh`] and [`Self::toggle_unit`].
    pub fn current_city(&self) -> &str {
        self.last_city.as_deref().unwrap_or(&self.default_city)
    }

    /// Validates input and switches to the loading state. The city is trimmed;
    /// empty or whitespace-only input is rejected without touching the state.
    pub fn begin_search(&mut self, city: &str) -> Result<SearchTicket, SearchRejected> {
        let city = city.trim();
        if city.is_empty() {
            return Err(SearchRejected::EmptyCity);
        }

        self.seq += 1;
        self.last_city = Some(city.to_string());
        self.state.set_loading(true);

        Ok(SearchTicket {
            seq: self.seq,
            request: WeatherRequest::new(city, self.state.units),
        })
    }

    pub async fn fetch(&self, ticket: &SearchTicket) -> Result<WeatherReport, WeatherError> {
        self.provider.fetch_report(&ticket.request).await
    }

    /// Applies the outcome of `ticket` unless a newer search has started.
    /// Returns whether the state changed.
    pub fn complete_search(
        &mut self,
        ticket: &SearchTicket,
        result: Result<WeatherReport, WeatherError>,
    ) -> bool {
        if ticket.seq != self.seq {
            tracing::debug!(
                stale = ticket.seq,
                latest = self.seq,
                city = %ticket.request.city,
                "dropping stale weather response"
            );
            return false;
        }

        match result {
            Ok(report) => self.state.apply_result(report),
            Err(err) => {
                if let WeatherError::Transport(cause) = &err {
                    tracing::debug!("weather fetch failed: {cause}");
                }
                self.state.apply_error(err.user_message());
            }
        }
        self.state.set_loading(false);
        true
    }

    pub async fn search(&mut self, city: &str) -> SearchOutcome {
        let ticket = match self.begin_search(city) {
            Ok(ticket) => ticket,
            Err(rejected) => return SearchOutcome::Rejected(rejected),
        };

        let result = self.fetch(&ticket).await;
        if self.complete_search(&ticket, result) {
            SearchOutcome::Applied
        } else {
            SearchOutcome::Stale
        }
    }

    /// Re-fetches the last searched city, or the default one.
    pub async fn refresh(&mut self) -> SearchOutcome {
        let city = self.current_city().to_string();
        self.search(&city).await
    }

    /// Flips the unit system without fetching. The displayed report keeps its
    /// old units until the caller refreshes.
    pub fn flip_units(&mut self) -> UnitSystem {
        self.state.units = self.state.units.toggled();
        tracing::info!(units = %self.state.units, "unit system changed");
        self.state.units
    }

    /// Flips the unit system and re-fetches, since the provider converts at source.
    pub async fn toggle_unit(&mut self) -> SearchOutcome {
        self.flip_units();
        self.refresh().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{icon::WeatherIcon, model::WeatherSnapshot};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    fn report(location: &str, units: UnitSystem) -> WeatherReport {
        WeatherReport {
            units,
            snapshot: WeatherSnapshot {
                humidity: 50,
                wind_speed: 3.5,
                temperature: 20,
                location: location.to_string(),
                icon: WeatherIcon::Cloud,
                description: "broken clouds".into(),
                min_temp: 18,
                max_temp: 22,
                observed_at: None,
            },
            forecast: Vec::new(),
        }
    }

    #[derive(Debug, Clone, Copy)]
    enum Reply {
        Ok,
        NotFound,
        Offline,
    }

    /// Records every request and answers with a scripted reply.
    #[derive(Debug, Clone)]
    struct FakeProvider {
        calls: Arc<Mutex<Vec<WeatherRequest>>>,
        reply: Arc<Mutex<Reply>>,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                reply: Arc::new(Mutex::new(Reply::Ok)),
            }
        }

        fn calls(&self) -> Vec<WeatherRequest> {
            self.calls.lock().unwrap().clone()
        }

        fn set_reply(&self, reply: Reply) {
            *self.reply.lock().unwrap() = reply;
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch_report(&self, request: &WeatherRequest) -> Result<WeatherReport, WeatherError> {
            self.calls.lock().unwrap().push(request.clone());
            let reply = *self.reply.lock().unwrap();
            match reply {
                Reply::Ok => Ok(report(&request.city, request.units)),
                Reply::NotFound => Err(WeatherError::provider(Some("city not found".into()))),
                Reply::Offline => Err(WeatherError::transport("connection refused")),
            }
        }
    }

    fn widget(fake: &FakeProvider) -> WeatherWidget {
        WeatherWidget::new(Box::new(fake.clone()), "Delhi", UnitSystem::Metric)
    }

    #[test]
    fn render_mode_priority() {
        let mut state = ViewState::default();
        assert_eq!(state.render_mode(), RenderMode::NoData);

        state.apply_result(report("Paris", UnitSystem::Metric));
        assert!(matches!(state.render_mode(), RenderMode::Data(r) if r.snapshot.location == "Paris"));

        state.apply_error("boom");
        assert_eq!(state.render_mode(), RenderMode::Error("boom"));

        state.loading = true;
        assert_eq!(state.render_mode(), RenderMode::Loading);
    }

    #[tokio::test]
    async fn empty_city_is_rejected_without_fetch() {
        let fake = FakeProvider::new();
        let mut widget = widget(&fake);
        widget.search("London").await;
        let before = widget.state().clone();

        for input in ["", "   "] {
            let outcome = widget.search(input).await;
            assert_eq!(outcome, SearchOutcome::Rejected(SearchRejected::EmptyCity));
        }

        assert_eq!(fake.calls().len(), 1);
        assert_eq!(widget.state(), &before);
        assert_eq!(widget.current_city(), "London");
    }

    #[tokio::test]
    async fn successful_search_replaces_report() {
        let fake = FakeProvider::new();
        let mut widget = widget(&fake);

        assert_eq!(widget.search("London").await, SearchOutcome::Applied);

        let state = widget.state();
        assert!(!state.loading);
        assert!(state.error.is_none());
        let report = state.report.as_ref().expect("report");
        assert_eq!(report.snapshot.location, "London");
        assert_eq!(report.units, UnitSystem::Metric);

        widget.search("Paris").await;
        let report = widget.state().report.as_ref().expect("report");
        assert_eq!(report.snapshot.location, "Paris");
    }

    #[tokio::test]
    async fn provider_error_keeps_previous_report() {
        let fake = FakeProvider::new();
        let mut widget = widget(&fake);
        widget.search("London").await;

        fake.set_reply(Reply::NotFound);
        assert_eq!(widget.search("Atlantis").await, SearchOutcome::Applied);

        let state = widget.state();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("city not found"));
        assert_eq!(state.report.as_ref().map(|r| r.snapshot.location.as_str()), Some("London"));
        assert_eq!(state.render_mode(), RenderMode::Error("city not found"));
    }

    #[tokio::test]
    async fn transport_error_shows_generic_message() {
        let fake = FakeProvider::new();
        fake.set_reply(Reply::Offline);
        let mut widget = widget(&fake);

        widget.search("London").await;

        let state = widget.state();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Error in fetching weather data"));
        assert!(state.report.is_none());
    }

    #[tokio::test]
    async fn next_search_clears_error() {
        let fake = FakeProvider::new();
        fake.set_reply(Reply::NotFound);
        let mut widget = widget(&fake);
        widget.search("Atlantis").await;

        fake.set_reply(Reply::Ok);
        widget.search("London").await;

        assert!(widget.state().error.is_none());
        assert!(matches!(widget.state().render_mode(), RenderMode::Data(_)));
    }

    #[tokio::test]
    async fn toggle_refetches_last_city_once_under_new_units() {
        let fake = FakeProvider::new();
        let mut widget = widget(&fake);
        widget.search("London").await;

        widget.toggle_unit().await;

        let calls = fake.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], WeatherRequest::new("London", UnitSystem::Imperial));
        assert_eq!(widget.units(), UnitSystem::Imperial);
        assert_eq!(widget.state().report.as_ref().map(|r| r.units), Some(UnitSystem::Imperial));

        widget.toggle_unit().await;
        assert_eq!(fake.calls()[2], WeatherRequest::new("London", UnitSystem::Metric));
    }

    #[tokio::test]
    async fn toggle_before_any_search_uses_default_city() {
        let fake = FakeProvider::new();
        let mut widget = widget(&fake);

        widget.toggle_unit().await;

        assert_eq!(fake.calls(), vec![WeatherRequest::new("Delhi", UnitSystem::Imperial)]);
    }

    #[tokio::test]
    async fn toggle_after_failed_search_retries_that_city() {
        let fake = FakeProvider::new();
        fake.set_reply(Reply::NotFound);
        let mut widget = widget(&fake);
        widget.search("Atlantis").await;

        widget.toggle_unit().await;
        assert_eq!(fake.calls()[1].city, "Atlantis");
    }

    #[tokio::test]
    async fn stale_response_is_dropped() {
        let fake = FakeProvider::new();
        let mut widget = widget(&fake);

        let old = widget.begin_search("London").unwrap();
        let new = widget.begin_search("Paris").unwrap();
        assert!(new.seq() > old.seq());

        let new_result = widget.fetch(&new).await;
        assert!(widget.complete_search(&new, new_result));

        let old_result = widget.fetch(&old).await;
        assert!(!widget.complete_search(&old, old_result));

        let state = widget.state();
        assert!(!state.loading);
        assert_eq!(state.report.as_ref().map(|r| r.snapshot.location.as_str()), Some("Paris"));
    }

    #[tokio::test]
    async fn stale_error_does_not_clear_loading_of_newer_search() {
        let fake = FakeProvider::new();
        let mut widget = widget(&fake);

        let old = widget.begin_search("London").unwrap();
        let _new = widget.begin_search("Paris").unwrap();

        let applied = widget.complete_search(&old, Err(WeatherError::transport("timeout")));
        assert!(!applied);
        assert!(widget.state().loading);
        assert!(widget.state().error.is_none());
    }

    #[test]
    fn begin_search_trims_and_snapshots_units() {
        let fake = FakeProvider::new();
        let mut widget = WeatherWidget::new(Box::new(fake), "Delhi", UnitSystem::Imperial);

        let ticket = widget.begin_search("  Oslo ").unwrap();
        assert_eq!(ticket.request(), &WeatherRequest::new("Oslo", UnitSystem::Imperial));
        assert!(widget.state().loading);
    }
}
