//! Pure Yew view components for the Race Day UI.
//!
//! This module contains stateless components that render based on props;
//! ordering and labelling come from `race_day::standings`.

use crate::hooks::Loadable;
use race_day::model::{RacerId, TrackId};
use race_day::standings::{final_standings, live_standings};
use race_day::{Racer, RacerPosition, Track};
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TrackCardsProps {
    pub tracks: Loadable<Vec<Track>>,
    pub selected: Option<TrackId>,
    pub onselect: Callback<Track>,
}

#[function_component(TrackCards)]
pub fn track_cards(props: &TrackCardsProps) -> Html {
    match &props.tracks {
        Loadable::Loading => html! { <h4>{ "Loading Tracks..." }</h4> },
        Loadable::Failed(err) => html! {
            <p class="input-error">{ format!("Could not load tracks: {}", err) }</p>
        },
        Loadable::Ready(tracks) if tracks.is_empty() => html! { <h4>{ "No tracks available" }</h4> },
        Loadable::Ready(tracks) => html! {
            <ul id="tracks">
                { for tracks.iter().map(|track| {
                    let onclick = {
                        let onselect = props.onselect.clone();
                        let track = track.clone();
                        Callback::from(move |_: MouseEvent| onselect.emit(track.clone()))
                    };
                    let selected = props.selected == Some(track.id);
                    html! {
                        <h4 id={track.id.to_string()}
                            class={classes!("card", "track", selected.then_some("selected"))}
                            {onclick}>
                            { &track.name }
                        </h4>
                    }
                }) }
            </ul>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct RacerCardsProps {
    pub racers: Loadable<Vec<Racer>>,
    pub selected: Option<RacerId>,
    pub onselect: Callback<Racer>,
}

#[function_component(RacerCards)]
pub fn racer_cards(props: &RacerCardsProps) -> Html {
    match &props.racers {
        Loadable::Loading => html! { <h4>{ "Loading Racers..." }</h4> },
        Loadable::Failed(err) => html! {
            <p class="input-error">{ format!("Could not load racers: {}", err) }</p>
        },
        Loadable::Ready(racers) if racers.is_empty() => html! { <h4>{ "No racers available" }</h4> },
        Loadable::Ready(racers) => html! {
            <ul id="racers">
                { for racers.iter().map(|racer| {
                    let onclick = {
                        let onselect = props.onselect.clone();
                        let racer = racer.clone();
                        Callback::from(move |_: MouseEvent| onselect.emit(racer.clone()))
                    };
                    let selected = props.selected == Some(racer.id);
                    html! {
                        <li id={racer.id.to_string()}
                            class={classes!("card", "racer", selected.then_some("selected"))}
                            {onclick}>
                            <h3>{ &racer.driver_name }</h3>
                            <p>{ format!("Top Speed: {}", racer.top_speed) }</p>
                            <p>{ format!("Acceleration: {}", racer.acceleration) }</p>
                            <p>{ format!("Handling: {}", racer.handling) }</p>
                        </li>
                    }
                }) }
            </ul>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct CountdownProps {
    pub count: u32,
}

#[function_component(Countdown)]
pub fn countdown(props: &CountdownProps) -> Html {
    html! {
        <>
            <h2>{ "Race Starts In..." }</h2>
            <p id="big-numbers">{ props.count }</p>
        </>
    }
}

/// Live leaderboard: progress of the leader followed by every racer,
/// leader first.
#[derive(Properties, PartialEq)]
pub struct LeaderboardProps {
    pub positions: Rc<Vec<RacerPosition>>,
    pub percent: u32,
    pub player: Option<RacerId>,
}

#[function_component(Leaderboard)]
pub fn leaderboard(props: &LeaderboardProps) -> Html {
    let standings = live_standings(&props.positions, props.player);

    html! {
        <table>
            <tr>
                <td>
                    <h2>{ format!("Progress: {}%", props.percent) }</h2>
                </td>
            </tr>
            { for standings.iter().map(|s| html! {
                <tr class={classes!(s.is_player.then_some("you"))}>
                    <td>
                        <h3>{ format!("{} - {} - @segment: {}", s.place, s.label, s.segment) }</h3>
                    </td>
                </tr>
            }) }
        </table>
    }
}

/// Race screen shown from the countdown until the finish.
#[derive(Properties, PartialEq)]
pub struct RaceViewProps {
    pub track_name: String,
    pub onaccelerate: Callback<MouseEvent>,
    pub children: Html,
}

#[function_component(RaceView)]
pub fn race_view(props: &RaceViewProps) -> Html {
    html! {
        <>
            <header>
                <h1>{ format!("Race: {}", props.track_name) }</h1>
            </header>
            <main id="two-columns">
                <section id="leaderBoard">
                    { props.children.clone() }
                </section>

                <section id="accelerate">
                    <h2>{ "Directions" }</h2>
                    <p>{ "Click the button as fast as you can to make your racer go faster!" }</p>
                    <button id="gas-peddle" onclick={props.onaccelerate.clone()}>
                        { "Click Me To Win!" }
                    </button>
                </section>
            </main>
            <footer></footer>
        </>
    }
}

#[derive(Properties, PartialEq)]
pub struct ResultsViewProps {
    pub positions: Rc<Vec<RacerPosition>>,
    pub player: Option<RacerId>,
    pub onrestart: Callback<MouseEvent>,
}

#[function_component(ResultsView)]
pub fn results_view(props: &ResultsViewProps) -> Html {
    let standings = final_standings(&props.positions, props.player);

    html! {
        <>
            <header>
                <h1>{ "Race Results" }</h1>
            </header>
            <main>
                <h3>{ "Race Results" }</h3>
                <p>{ "The race is done! Here are the final results:" }</p>
                <table>
                    { for standings.iter().map(|s| html! {
                        <tr class={classes!(s.is_player.then_some("you"))}>
                            <td>
                                <h3>{ format!("{} - {}", s.place, s.label) }</h3>
                            </td>
                        </tr>
                    }) }
                </table>
                <button class="button" onclick={props.onrestart.clone()}>
                    { "Start a new race" }
                </button>
            </main>
        </>
    }
}

#[derive(Properties, PartialEq)]
pub struct RaceErrorProps {
    pub message: String,
    pub onrestart: Callback<MouseEvent>,
}

/// Shown when a race session ends in an error.
#[function_component(RaceError)]
pub fn race_error(props: &RaceErrorProps) -> Html {
    html! {
        <main>
            <div class="current-error">{ &props.message }</div>
            <button class="button" onclick={props.onrestart.clone()}>
                { "Back to race setup" }
            </button>
        </main>
    }
}
