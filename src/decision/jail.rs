//! Jail policy, spec.md §4.4 "Jail policy".

use crate::config::EngineConfig;
use crate::decision::{self, GamePhase};
use crate::markov::JailPolicy;
use crate::snapshot::GameSnapshot;

/// Target jail policy for `player` given the current snapshot: `Leave`
/// in the early game, otherwise `Stay` iff opponents collectively hold
/// at least `config.jail_stay_threshold` developed properties.
pub fn determine_jail_policy(snapshot: &GameSnapshot, player: usize, config: &EngineConfig) -> JailPolicy {
    if decision::game_phase(snapshot) == GamePhase::Early {
        return JailPolicy::Leave;
    }

    let opponents_developed: usize = (0..snapshot.players.len())
        .filter(|&p| p != player && !snapshot.players[p].bankrupt)
        .map(|p| snapshot.developed_property_count(p))
        .sum();

    if opponents_developed as u32 >= config.jail_stay_threshold {
        JailPolicy::Stay
    } else {
        JailPolicy::Leave
    }
}

/// Whether `player`, having served `turns_in_jail` turns already,
/// should post bail / play a card this turn. Under `Leave`, pay on the
/// first eligible turn; under `Stay`, only exit on the mandatory third
/// turn (`turns_in_jail == 2`, the last turn before release).
pub fn should_post_bail(
    snapshot: &GameSnapshot,
    player: usize,
    turns_in_jail: u8,
    config: &EngineConfig,
) -> bool {
    match determine_jail_policy(snapshot, player, config) {
        JailPolicy::Leave => true,
        JailPolicy::Stay => turns_in_jail >= 2,
    }
}
