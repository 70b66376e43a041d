//! Main module for the Race Day application using Yew.
//! Wires UI components, selection state, and the race session.

use log::{debug, info, warn};
use race_day::config::{ApiConfig, COUNTDOWN_START};
use race_day::controller::run_session;
use race_day::{
    ApiError, CancelToken, CreatedRace, GlooTicker, HttpClient, PollPolicy, RaceApi,
    RaceObserver, RaceSnapshot, Racer, RacerPosition, SelectionState, Track,
};
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

mod components;
mod hooks;

use components::{Countdown, Leaderboard, RaceError, RaceView, RacerCards, ResultsView, TrackCards};
use hooks::use_catalog;

/// What the race area is currently showing.
#[derive(Clone, PartialEq)]
enum RacePhase {
    Selecting,
    Countdown {
        track_name: String,
        remaining: u32,
    },
    Racing {
        track_name: String,
        positions: Rc<Vec<RacerPosition>>,
        percent: u32,
    },
    Finished {
        positions: Rc<Vec<RacerPosition>>,
    },
    Failed(String),
}

/// Pushes every step of a race session into component state.
struct PhaseObserver {
    phase: UseStateHandle<RacePhase>,
    selection: UseStateHandle<SelectionState>,
    picks: SelectionState,
    track_name: String,
}

impl RaceObserver for PhaseObserver {
    fn race_created(&mut self, race: &CreatedRace) {
        let mut picks = self.picks.clone();
        picks.record_race(race);
        self.selection.set(picks);
        self.track_name = race.track.name.clone();
        self.phase.set(RacePhase::Countdown {
            track_name: self.track_name.clone(),
            remaining: COUNTDOWN_START,
        });
    }

    fn countdown(&mut self, remaining: u32) {
        self.phase.set(RacePhase::Countdown {
            track_name: self.track_name.clone(),
            remaining,
        });
    }

    fn progress(&mut self, snapshot: &RaceSnapshot, percent: u32) {
        self.phase.set(RacePhase::Racing {
            track_name: self.track_name.clone(),
            positions: Rc::new(snapshot.positions.clone()),
            percent,
        });
    }

    fn finished(&mut self, snapshot: &RaceSnapshot) {
        self.phase.set(RacePhase::Finished {
            positions: Rc::new(snapshot.positions.clone()),
        });
    }
}

/// Primary application component wiring state, effects, and UI elements.
#[function_component(App)]
fn app() -> Html {
    let client = use_memo((), |_| HttpClient::new(ApiConfig::default()));
    let catalog = use_catalog(client.clone());
    let selection = use_state(SelectionState::default);
    let phase = use_state(|| RacePhase::Selecting);
    // Token of the session currently running, if any
    let cancel = use_mut_ref(CancelToken::new);

    // Stop any running session when the app goes away
    {
        let cancel = cancel.clone();
        use_effect_with((), move |_| move || cancel.borrow().cancel());
    }

    let on_select_track = {
        let selection = selection.clone();
        Callback::from(move |track: Track| {
            let mut next = (*selection).clone();
            next.select_track(&track);
            selection.set(next);
        })
    };

    let on_select_racer = {
        let selection = selection.clone();
        Callback::from(move |racer: Racer| {
            let mut next = (*selection).clone();
            next.select_racer(&racer);
            selection.set(next);
        })
    };

    let on_create_race = {
        let client = client.clone();
        let selection = selection.clone();
        let phase = phase.clone();
        let cancel = cancel.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            let mut picks = (*selection).clone();
            if let Err(err) = picks.create_request() {
                phase.set(RacePhase::Failed(err.to_string()));
                return;
            }

            let token = start_new_session(&cancel);
            let client = client.clone();
            let mut observer = PhaseObserver {
                phase: phase.clone(),
                selection: selection.clone(),
                picks: picks.clone(),
                track_name: picks.track_name.clone().unwrap_or_default(),
            };
            let phase = phase.clone();

            wasm_bindgen_futures::spawn_local(async move {
                let result = run_session(
                    &*client,
                    &GlooTicker,
                    &mut observer,
                    &mut picks,
                    &token,
                    &PollPolicy::default(),
                )
                .await;
                match result {
                    Ok(snapshot) => info!(
                        "Race {:?} done with {} racers",
                        picks.race_id,
                        snapshot.positions.len()
                    ),
                    Err(ApiError::Cancelled) => debug!("Race session cancelled"),
                    Err(err) => {
                        warn!("Race session failed :: {}", err);
                        phase.set(RacePhase::Failed(err.to_string()));
                    }
                }
            });
        })
    };

    let on_accelerate = {
        let client = client.clone();
        let race_id = selection.race_id;
        Callback::from(move |_: MouseEvent| {
            debug!("accelerate button clicked");
            let Some(id) = race_id else {
                return;
            };
            let client = client.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = client.accelerate(id).await {
                    debug!("accelerate for race {} dropped :: {}", id, err);
                }
            });
        })
    };

    let on_restart = {
        let selection = selection.clone();
        let phase = phase.clone();
        let cancel = cancel.clone();
        Callback::from(move |_: MouseEvent| {
            cancel.borrow().cancel();
            let mut next = (*selection).clone();
            next.clear_race();
            selection.set(next);
            phase.set(RacePhase::Selecting);
        })
    };

    let player = selection.racer_id;

    let race_area = match &*phase {
        RacePhase::Selecting => html! {
            <>
                <header>
                    <h1>{ "Race Day" }</h1>
                </header>
                <main>
                    <section>
                        <h2>{ "Select a Track" }</h2>
                        <TrackCards tracks={catalog.tracks.clone()}
                            selected={selection.track_id}
                            onselect={on_select_track} />
                    </section>
                    <section>
                        <h2>{ "Select a Racer" }</h2>
                        <RacerCards racers={catalog.racers.clone()}
                            selected={selection.racer_id}
                            onselect={on_select_racer} />
                    </section>
                    <button id="submit-create-race"
                        disabled={selection.create_request().is_err()}
                        onclick={on_create_race}>
                        { "Start Race" }
                    </button>
                </main>
            </>
        },
        RacePhase::Countdown {
            track_name,
            remaining,
        } => html! {
            <RaceView track_name={track_name.clone()} onaccelerate={on_accelerate}>
                <Countdown count={*remaining} />
            </RaceView>
        },
        RacePhase::Racing {
            track_name,
            positions,
            percent,
        } => html! {
            <RaceView track_name={track_name.clone()} onaccelerate={on_accelerate}>
                <Leaderboard positions={positions.clone()} percent={*percent} {player} />
            </RaceView>
        },
        RacePhase::Finished { positions } => html! {
            <ResultsView positions={positions.clone()} {player} onrestart={on_restart} />
        },
        RacePhase::Failed(message) => html! {
            <RaceError message={message.clone()} onrestart={on_restart} />
        },
    };

    html! {
        <div id="race" class="container">
            { race_area }
        </div>
    }
}

/// Cancel whatever session is running and hand out a fresh token.
fn start_new_session(current: &Rc<RefCell<CancelToken>>) -> CancelToken {
    let token = CancelToken::new();
    let previous = current.replace(token.clone());
    previous.cancel();
    token
}

/// Entry point: installs logging and renders the App component.
fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    console_error_panic_hook::set_once();
    info!("Race Day starting, server {}", ApiConfig::default().base_url);
    yew::Renderer::<App>::new().render();
}
