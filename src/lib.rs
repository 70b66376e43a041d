//! Race Day: pick a track and a racer, start a race on the race server and
//! follow the leaderboard until the chequered flag.
//!
//! The library holds everything that does not touch the DOM: wire types,
//! the HTTP client, track geometry, standings and the race controller. The
//! Yew application in `main.rs` wires these to the page.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod model;
pub mod standings;
pub mod state;

pub use api::{HttpClient, RaceApi};
pub use controller::{run_race, run_session, CancelToken, GlooTicker, PollPolicy, RaceObserver};
pub use error::ApiError;
pub use geometry::TrackGeometry;
pub use model::{CreatedRace, RaceSnapshot, RaceStatus, Racer, RacerPosition, Track};
pub use state::SelectionState;
