//! The user's picks and the race they led to.

use crate::error::ApiError;
use crate::geometry::TrackGeometry;
use crate::model::{CreateRace, CreatedRace, Racer, RaceId, RacerId, Track, TrackId};
use log::{debug, warn};

/// Selection record owned by the top-level component and handed to the
/// race controller by reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub track_id: Option<TrackId>,
    pub track_name: Option<String>,
    pub racer_id: Option<RacerId>,
    pub racer_name: Option<String>,
    pub race_id: Option<RaceId>,
    pub geometry: TrackGeometry,
}

impl SelectionState {
    pub fn select_track(&mut self, track: &Track) {
        self.track_id = Some(track.id);
        self.track_name = Some(track.name.clone());
        debug!("Selected track {} ({})", track.id, track.name);
    }

    pub fn select_racer(&mut self, racer: &Racer) {
        self.racer_id = Some(racer.id);
        self.racer_name = Some(racer.driver_name.clone());
        debug!("Selected racer {} ({})", racer.id, racer.driver_name);
    }

    /// Request body for the current picks.
    pub fn create_request(&self) -> Result<CreateRace, ApiError> {
        let track_id = self.track_id.ok_or(ApiError::MissingSelection("track"))?;
        let player_id = self.racer_id.ok_or(ApiError::MissingSelection("racer"))?;
        Ok(CreateRace {
            player_id,
            track_id,
        })
    }

    /// Remember the race the server created and size up its track.
    ///
    /// The server's player id wins over the local pick so the leaderboard
    /// marks the racer the race was actually created for.
    pub fn record_race(&mut self, race: &CreatedRace) {
        if let Some(player_id) = race.player_id {
            if self.racer_id != Some(player_id) {
                warn!(
                    "Race {} was created for racer {} but racer {:?} was selected",
                    race.id, player_id, self.racer_id
                );
                self.racer_id = Some(player_id);
            }
        }
        self.race_id = Some(race.id);
        self.track_name = Some(race.track.name.clone());
        self.geometry = TrackGeometry::from_track(&race.track);
        debug!(
            "Race {} created on '{}' ({} segments, size {})",
            race.id,
            race.track.name,
            self.geometry.segment_count(),
            self.geometry.total_size
        );
    }

    /// Drop the finished race but keep the user's picks.
    pub fn clear_race(&mut self) {
        self.race_id = None;
        self.geometry = TrackGeometry::default();
    }
}
