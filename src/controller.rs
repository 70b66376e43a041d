//! Race orchestration: create, count down, start, then poll until the
//! server reports the race as finished.
//!
//! Everything here is generic over the server ([`RaceApi`]), the clock
//! ([`Ticker`]) and the screen ([`RaceObserver`]) so the flow can be
//! driven by the browser or by plain futures in tests.

use crate::api::RaceApi;
use crate::config::{COUNTDOWN_START, COUNTDOWN_TICK_MS, MAX_POLL_ATTEMPTS, POLL_INTERVAL_MS};
use crate::error::ApiError;
use crate::geometry::TrackGeometry;
use crate::model::{CreatedRace, RaceId, RaceSnapshot, RaceStatus};
use crate::standings::lead_segment;
use crate::state::SelectionState;
use gloo_timers::future::TimeoutFuture;
use log::{info, warn};
use std::cell::Cell;
use std::rc::Rc;

/// Something that can wait.
#[allow(async_fn_in_trait)]
pub trait Ticker {
    async fn sleep(&self, ms: u32);
}

/// Browser timer backed by `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTicker;

impl Ticker for GlooTicker {
    async fn sleep(&self, ms: u32) {
        TimeoutFuture::new(ms).await;
    }
}

/// Receives every visible step of a race session.
pub trait RaceObserver {
    fn race_created(&mut self, _race: &CreatedRace) {}
    fn countdown(&mut self, remaining: u32);
    fn progress(&mut self, snapshot: &RaceSnapshot, percent: u32);
    fn finished(&mut self, snapshot: &RaceSnapshot);
}

/// Shared flag that stops a running countdown or poll loop at its next tick.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.is_cancelled() {
            Err(ApiError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Timing knobs for a race session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval_ms: u32,
    /// `None` polls until the race finishes, however long that takes
    pub max_attempts: Option<u32>,
    pub countdown_from: u32,
    pub countdown_tick_ms: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval_ms: POLL_INTERVAL_MS,
            max_attempts: Some(MAX_POLL_ATTEMPTS),
            countdown_from: COUNTDOWN_START,
            countdown_tick_ms: COUNTDOWN_TICK_MS,
        }
    }
}

/// Show `from`, `from - 1`, ... `1`, one per tick.
pub async fn run_countdown(
    ticker: &impl Ticker,
    observer: &mut impl RaceObserver,
    token: &CancelToken,
    policy: &PollPolicy,
) -> Result<(), ApiError> {
    for remaining in (1..=policy.countdown_from).rev() {
        token.check()?;
        observer.countdown(remaining);
        ticker.sleep(policy.countdown_tick_ms).await;
    }
    token.check()
}

/// Poll the race every `interval_ms` until it finishes.
///
/// In-progress snapshots are passed to the observer together with the
/// leader's completion percentage. Any other status, a race that has not
/// been started included, ends the loop with [`ApiError::InvalidRaceStatus`]
/// and nothing rendered.
pub async fn run_race(
    api: &impl RaceApi,
    ticker: &impl Ticker,
    observer: &mut impl RaceObserver,
    geometry: &TrackGeometry,
    race_id: RaceId,
    token: &CancelToken,
    policy: &PollPolicy,
) -> Result<RaceSnapshot, ApiError> {
    let mut attempts = 0u32;
    loop {
        if let Some(max) = policy.max_attempts {
            if attempts >= max {
                warn!("Race {} still running after {} polls", race_id, attempts);
                return Err(ApiError::PollLimitReached { attempts });
            }
        }
        token.check()?;
        ticker.sleep(policy.interval_ms).await;
        token.check()?;

        attempts += 1;
        let snapshot = api.race(race_id).await?;
        match snapshot.status {
            RaceStatus::InProgress => {
                let percent = geometry.completion_percent(lead_segment(&snapshot.positions));
                observer.progress(&snapshot, percent);
            }
            RaceStatus::Finished => {
                info!("Race {} finished after {} polls", race_id, attempts);
                observer.finished(&snapshot);
                return Ok(snapshot);
            }
            RaceStatus::Pending | RaceStatus::Unknown(_) => {
                warn!("Race {} reported status '{}' while polling", race_id, snapshot.status);
                return Err(ApiError::InvalidRaceStatus(snapshot.status.to_string()));
            }
        }
    }
}

/// Full session for the current selection: create the race, remember it,
/// count down, start it and follow it to the finish.
pub async fn run_session(
    api: &impl RaceApi,
    ticker: &impl Ticker,
    observer: &mut impl RaceObserver,
    state: &mut SelectionState,
    token: &CancelToken,
    policy: &PollPolicy,
) -> Result<RaceSnapshot, ApiError> {
    let request = state.create_request()?;
    info!(
        "Creating race for racer {} on track {}",
        request.player_id, request.track_id
    );
    let race = api.create_race(request).await?;
    state.record_race(&race);
    observer.race_created(&race);

    run_countdown(ticker, observer, token, policy).await?;

    api.start_race(race.id).await?;
    run_race(api, ticker, observer, &state.geometry, race.id, token, policy).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CreateRace, Racer, RacerPosition, Track};
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Create(CreateRace),
        Created(RaceId),
        Countdown(u32),
        Start(RaceId),
        Poll(RaceId),
        Progress(u32),
        Finished,
        Sleep(u32),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct FakeApi {
        log: Log,
        snapshots: RefCell<VecDeque<Result<RaceSnapshot, ApiError>>>,
    }

    impl FakeApi {
        fn new(log: &Log, snapshots: Vec<Result<RaceSnapshot, ApiError>>) -> Self {
            Self {
                log: log.clone(),
                snapshots: RefCell::new(snapshots.into()),
            }
        }
    }

    impl RaceApi for FakeApi {
        async fn tracks(&self) -> Result<Vec<Track>, ApiError> {
            Ok(Vec::new())
        }

        async fn racers(&self) -> Result<Vec<Racer>, ApiError> {
            Ok(Vec::new())
        }

        async fn create_race(&self, request: CreateRace) -> Result<CreatedRace, ApiError> {
            self.log.borrow_mut().push(Event::Create(request));
            Ok(CreatedRace {
                id: 42,
                track: Track {
                    id: request.track_id,
                    name: "Track 2".into(),
                    segments: vec![25.0, 25.0, 25.0, 25.0],
                },
                player_id: Some(request.player_id),
            })
        }

        async fn race(&self, id: RaceId) -> Result<RaceSnapshot, ApiError> {
            self.log.borrow_mut().push(Event::Poll(id));
            self.snapshots
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(snapshot("in-progress", &[(1, 0, None)])))
        }

        async fn start_race(&self, id: RaceId) -> Result<(), ApiError> {
            self.log.borrow_mut().push(Event::Start(id));
            Ok(())
        }

        async fn accelerate(&self, _id: RaceId) -> Result<(), ApiError> {
            Ok(())
        }
    }

    struct FakeTicker(Log);

    impl Ticker for FakeTicker {
        async fn sleep(&self, ms: u32) {
            self.0.borrow_mut().push(Event::Sleep(ms));
        }
    }

    struct Recorder {
        log: Log,
        state_race_id: Option<RaceId>,
    }

    impl RaceObserver for Recorder {
        fn race_created(&mut self, race: &CreatedRace) {
            self.state_race_id = Some(race.id);
            self.log.borrow_mut().push(Event::Created(race.id));
        }

        fn countdown(&mut self, remaining: u32) {
            self.log.borrow_mut().push(Event::Countdown(remaining));
        }

        fn progress(&mut self, _snapshot: &RaceSnapshot, percent: u32) {
            self.log.borrow_mut().push(Event::Progress(percent));
        }

        fn finished(&mut self, _snapshot: &RaceSnapshot) {
            self.log.borrow_mut().push(Event::Finished);
        }
    }

    fn snapshot(status: &str, racers: &[(u32, usize, Option<u32>)]) -> RaceSnapshot {
        RaceSnapshot {
            status: RaceStatus::from(status.to_string()),
            positions: racers
                .iter()
                .map(|&(id, segment, final_position)| RacerPosition {
                    id,
                    driver_name: format!("Racer {}", id),
                    segment,
                    final_position,
                })
                .collect(),
        }
    }

    fn fixture(snapshots: Vec<Result<RaceSnapshot, ApiError>>) -> (Log, FakeApi, FakeTicker, Recorder) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let api = FakeApi::new(&log, snapshots);
        let ticker = FakeTicker(log.clone());
        let recorder = Recorder {
            log: log.clone(),
            state_race_id: None,
        };
        (log, api, ticker, recorder)
    }

    fn polls(log: &Log) -> usize {
        log.borrow().iter().filter(|e| matches!(e, Event::Poll(_))).count()
    }

    fn progress_events(log: &Log) -> Vec<u32> {
        log.borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Progress(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    fn geometry() -> TrackGeometry {
        TrackGeometry::from_segments(&[25.0, 25.0, 25.0, 25.0])
    }

    #[test]
    fn countdown_shows_three_two_one() {
        let (log, _api, ticker, mut recorder) = fixture(vec![]);
        block_on(run_countdown(&ticker, &mut recorder, &CancelToken::new(), &PollPolicy::default()))
            .unwrap();
        assert_eq!(
            *log.borrow(),
            vec![
                Event::Countdown(3),
                Event::Sleep(1000),
                Event::Countdown(2),
                Event::Sleep(1000),
                Event::Countdown(1),
                Event::Sleep(1000),
            ]
        );
    }

    #[test]
    fn finished_snapshot_ends_polling() {
        let (log, api, ticker, mut recorder) = fixture(vec![
            Ok(snapshot("in-progress", &[(1, 1, None), (2, 2, None)])),
            Ok(snapshot("in-progress", &[(1, 3, None), (2, 2, None)])),
            Ok(snapshot("finished", &[(1, 4, Some(1)), (2, 4, Some(2))])),
            Ok(snapshot("in-progress", &[(1, 0, None)])),
        ]);
        let result = block_on(run_race(
            &api,
            &ticker,
            &mut recorder,
            &geometry(),
            42,
            &CancelToken::new(),
            &PollPolicy::default(),
        ))
        .unwrap();

        assert_eq!(result.status, RaceStatus::Finished);
        assert_eq!(polls(&log), 3);
        assert_eq!(progress_events(&log), vec![50, 75]);
        assert_eq!(log.borrow().last(), Some(&Event::Finished));
    }

    #[test]
    fn polls_on_the_configured_cadence() {
        let (log, api, ticker, mut recorder) =
            fixture(vec![Ok(snapshot("finished", &[(1, 4, Some(1))]))]);
        block_on(run_race(
            &api,
            &ticker,
            &mut recorder,
            &geometry(),
            42,
            &CancelToken::new(),
            &PollPolicy::default(),
        ))
        .unwrap();
        assert_eq!(log.borrow()[0], Event::Sleep(500));
        assert_eq!(log.borrow()[1], Event::Poll(42));
    }

    #[test]
    fn unknown_status_halts_without_rendering() {
        let (log, api, ticker, mut recorder) = fixture(vec![
            Ok(snapshot("aborted", &[(1, 2, None)])),
            Ok(snapshot("finished", &[(1, 4, Some(1))])),
        ]);
        let err = block_on(run_race(
            &api,
            &ticker,
            &mut recorder,
            &geometry(),
            42,
            &CancelToken::new(),
            &PollPolicy::default(),
        ))
        .unwrap_err();

        assert_eq!(err, ApiError::InvalidRaceStatus("aborted".into()));
        assert_eq!(polls(&log), 1);
        assert!(progress_events(&log).is_empty());
        assert!(!log.borrow().contains(&Event::Finished));
    }

    #[test]
    fn unstarted_status_is_fatal() {
        let (log, api, ticker, mut recorder) = fixture(vec![
            Ok(snapshot("unstarted", &[(1, 0, None)])),
            Ok(snapshot("finished", &[(1, 4, Some(1))])),
        ]);
        let err = block_on(run_race(
            &api,
            &ticker,
            &mut recorder,
            &geometry(),
            42,
            &CancelToken::new(),
            &PollPolicy::default(),
        ))
        .unwrap_err();
        assert_eq!(err, ApiError::InvalidRaceStatus("pending".into()));
        assert_eq!(polls(&log), 1);
        assert!(progress_events(&log).is_empty());
        assert!(!log.borrow().contains(&Event::Finished));
    }

    #[test]
    fn request_failures_propagate() {
        let (log, api, ticker, mut recorder) = fixture(vec![Err(ApiError::Http {
            status: 500,
            url: "http://localhost:3001/api/races/42".into(),
        })]);
        let err = block_on(run_race(
            &api,
            &ticker,
            &mut recorder,
            &geometry(),
            42,
            &CancelToken::new(),
            &PollPolicy::default(),
        ))
        .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
        assert_eq!(polls(&log), 1);
    }

    #[test]
    fn poll_limit_stops_a_stuck_race() {
        let (log, api, ticker, mut recorder) = fixture(vec![]);
        let policy = PollPolicy {
            max_attempts: Some(5),
            ..PollPolicy::default()
        };
        let err = block_on(run_race(
            &api,
            &ticker,
            &mut recorder,
            &geometry(),
            42,
            &CancelToken::new(),
            &policy,
        ))
        .unwrap_err();
        assert_eq!(err, ApiError::PollLimitReached { attempts: 5 });
        assert_eq!(polls(&log), 5);
    }

    #[test]
    fn cancelled_token_issues_no_requests() {
        let (log, api, ticker, mut recorder) = fixture(vec![]);
        let token = CancelToken::new();
        token.cancel();
        let err = block_on(run_race(
            &api,
            &ticker,
            &mut recorder,
            &geometry(),
            42,
            &token,
            &PollPolicy::default(),
        ))
        .unwrap_err();
        assert_eq!(err, ApiError::Cancelled);
        assert_eq!(polls(&log), 0);
    }

    #[test]
    fn session_stores_race_id_before_countdown() {
        let (log, api, ticker, mut recorder) =
            fixture(vec![Ok(snapshot("finished", &[(1, 4, Some(1))]))]);
        let mut state = SelectionState {
            track_id: Some(2),
            racer_id: Some(1),
            ..SelectionState::default()
        };

        block_on(run_session(
            &api,
            &ticker,
            &mut recorder,
            &mut state,
            &CancelToken::new(),
            &PollPolicy::default(),
        ))
        .unwrap();

        assert_eq!(state.race_id, Some(42));
        assert_eq!(state.geometry.total_size, 100.0);
        assert_eq!(recorder.state_race_id, Some(42));

        let events = log.borrow();
        assert_eq!(
            events[0],
            Event::Create(CreateRace {
                player_id: 1,
                track_id: 2
            })
        );
        assert_eq!(events[1], Event::Created(42));
        assert_eq!(events[2], Event::Countdown(3));
        let start = events.iter().position(|e| *e == Event::Start(42)).unwrap();
        let first_poll = events.iter().position(|e| *e == Event::Poll(42)).unwrap();
        let last_countdown = events.iter().position(|e| *e == Event::Countdown(1)).unwrap();
        assert!(last_countdown < start);
        assert!(start < first_poll);
    }

    #[test]
    fn session_without_selection_makes_no_requests() {
        let (log, api, ticker, mut recorder) = fixture(vec![]);
        let mut state = SelectionState::default();
        let err = block_on(run_session(
            &api,
            &ticker,
            &mut recorder,
            &mut state,
            &CancelToken::new(),
            &PollPolicy::default(),
        ))
        .unwrap_err();
        assert_eq!(err, ApiError::MissingSelection("track"));
        assert!(log.borrow().is_empty());
    }
}
