use log::info;
use race_day::{ApiError, HttpClient, RaceApi, Racer, Track};
use std::rc::Rc;
use yew::prelude::*;

/// Remote data as the UI sees it: still on its way, arrived, or failed.
#[derive(Clone, PartialEq)]
pub enum Loadable<T> {
    Loading,
    Ready(Rc<T>),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Loadable::Ready(Rc::new(value)),
            Err(err) => Loadable::Failed(err.to_string()),
        }
    }
}

/// Tracks and racers offered on the selection screen.
#[derive(Clone, PartialEq)]
pub struct Catalog {
    pub tracks: Loadable<Vec<Track>>,
    pub racers: Loadable<Vec<Racer>>,
}

/// Fetch the track and racer lists once, when the component mounts.
#[hook]
pub fn use_catalog(client: Rc<HttpClient>) -> Catalog {
    let tracks = use_state(|| Loadable::<Vec<Track>>::Loading);
    let racers = use_state(|| Loadable::<Vec<Racer>>::Loading);

    {
        let tracks = tracks.clone();
        let racers = racers.clone();
        use_effect_with((), move |_| {
            info!("Getting form info for dropdowns!");
            let tracks_client = client.clone();
            wasm_bindgen_futures::spawn_local(async move {
                tracks.set(Loadable::from_result(tracks_client.tracks().await));
            });
            wasm_bindgen_futures::spawn_local(async move {
                racers.set(Loadable::from_result(client.racers().await));
            });
            || ()
        });
    }

    Catalog {
        tracks: (*tracks).clone(),
        racers: (*racers).clone(),
    }
}
