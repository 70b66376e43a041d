//! Leaderboard ordering for the live race and the final results.

use crate::model::{RacerId, RacerPosition};

/// One leaderboard line ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub place: usize,
    pub racer_id: RacerId,
    pub label: String,
    pub segment: usize,
    pub is_player: bool,
}

fn label_for(position: &RacerPosition, player: Option<RacerId>) -> (String, bool) {
    let is_player = player == Some(position.id);
    let label = if is_player {
        format!("{} (you)", position.driver_name)
    } else {
        position.driver_name.clone()
    };
    (label, is_player)
}

fn number(sorted: Vec<&RacerPosition>, player: Option<RacerId>) -> Vec<Standing> {
    sorted
        .into_iter()
        .enumerate()
        .map(|(idx, p)| {
            let (label, is_player) = label_for(p, player);
            Standing {
                place: idx + 1,
                racer_id: p.id,
                label,
                segment: p.segment,
                is_player,
            }
        })
        .collect()
}

/// Leader first: descending by segment.
pub fn live_standings(positions: &[RacerPosition], player: Option<RacerId>) -> Vec<Standing> {
    let mut sorted: Vec<&RacerPosition> = positions.iter().collect();
    sorted.sort_by(|a, b| b.segment.cmp(&a.segment));
    number(sorted, player)
}

/// Ascending by final position; racers the server has not placed go last.
pub fn final_standings(positions: &[RacerPosition], player: Option<RacerId>) -> Vec<Standing> {
    let mut sorted: Vec<&RacerPosition> = positions.iter().collect();
    sorted.sort_by_key(|p| p.final_position.unwrap_or(u32::MAX));
    number(sorted, player)
}

/// Segment reached by whoever is in front, 0 if nobody has moved.
pub fn lead_segment(positions: &[RacerPosition]) -> usize {
    positions.iter().map(|p| p.segment).max().unwrap_or(0)
}
