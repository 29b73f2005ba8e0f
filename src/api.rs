//! WASM surface: one process-global game session driven from JavaScript.

use std::fmt::Display;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::debug;
use wasm_bindgen::prelude::*;

use crate::ai::{EvalWeights, SearchResult};
use crate::error::{GameError, Result};
use crate::game::{Game, Mode};
use crate::player::{Player, SearchPlayer};
use crate::types::{GameResult, GameState, Move};

static SESSION: Lazy<Mutex<Option<Session>>> = Lazy::new(|| Mutex::new(None));

/// A game plus the AI seat(s) serving it.
#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    game: Game,
    ai: SearchPlayer,
}

/// Reply of [`Session::ai_move`]: the new state and the search behind it.
#[derive(Debug, Clone, Serialize)]
pub struct AiMove {
    pub state: GameState,
    pub search: Option<SearchResult>,
}

impl Session {
    pub fn new(mode: Mode, weights: EvalWeights) -> Self {
        Self {
            mode,
            game: Game::new(),
            ai: SearchPlayer::with_weights(mode.depth(), weights),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Human move for the side played from outside.
    pub fn place(&mut self, row: u8, col: u8) -> Result<GameState> {
        let side = self.game.to_move();
        if self.mode.human_side() != Some(side) {
            return Err(GameError::NotThisSeat(side));
        }
        self.game.play(Move::new(row, col))?;
        Ok(self.game.state())
    }

    /// Lets the AI move for the side to move, when that side is an AI seat.
    pub fn ai_move(&mut self) -> Result<AiMove> {
        if self.game.is_over() {
            return Err(GameError::GameOver);
        }
        let side = self.game.to_move();
        if self.mode.human_side() == Some(side) {
            return Err(GameError::NotThisSeat(side));
        }

        match self.ai.choose_move(self.game.board(), side)? {
            Some(mv) => {
                self.game.play(mv)?;
            }
            None => self.game.pass()?,
        }
        Ok(AiMove {
            state: self.game.state(),
            search: self.ai.last_result().copied(),
        })
    }

    pub fn pass_turn(&mut self) -> Result<GameState> {
        self.game.pass()?;
        Ok(self.game.state())
    }
}

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// Starts a new session. `weights` may be `undefined` for the defaults.
#[wasm_bindgen]
pub fn new_game(
    depth: u8,
    ai_vs_ai: bool,
    weights: JsValue,
) -> std::result::Result<JsValue, JsValue> {
    let weights = if weights.is_undefined() || weights.is_null() {
        EvalWeights::default()
    } else {
        serde_wasm_bindgen::from_value::<EvalWeights>(weights)
            .map_err(|err| to_js(GameError::Config(err.to_string())))?
            .validate()
            .map_err(to_js)?
    };
    let mode = if ai_vs_ai {
        Mode::AiVsAi { depth }
    } else {
        Mode::HumanVsAi { depth }
    };
    debug!(?mode, ?weights, "new game");

    let session = Session::new(mode, weights);
    let state = session.game.state();
    *SESSION.lock().map_err(to_js)? = Some(session);
    to_value(&state)
}

#[wasm_bindgen]
pub fn get_state() -> std::result::Result<JsValue, JsValue> {
    with_session(|session| Ok(session.game.state()))
}

#[wasm_bindgen]
pub fn get_legal_moves() -> std::result::Result<JsValue, JsValue> {
    with_session(|session| Ok(session.game.legal_moves()))
}

#[wasm_bindgen]
pub fn place(row: u8, col: u8) -> std::result::Result<JsValue, JsValue> {
    with_session(|session| session.place(row, col))
}

#[wasm_bindgen]
pub fn ai_move() -> std::result::Result<JsValue, JsValue> {
    with_session(Session::ai_move)
}

#[wasm_bindgen]
pub fn pass_turn() -> std::result::Result<JsValue, JsValue> {
    with_session(Session::pass_turn)
}

/// Final result, or `undefined` while the game is running.
#[wasm_bindgen]
pub fn get_result() -> std::result::Result<JsValue, JsValue> {
    with_session(|session| Ok::<Option<GameResult>, GameError>(session.game.result()))
}

fn with_session<T, F>(f: F) -> std::result::Result<JsValue, JsValue>
where
    T: Serialize,
    F: FnOnce(&mut Session) -> Result<T>,
{
    let mut guard = SESSION.lock().map_err(to_js)?;
    let session = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("no game in progress; call new_game first"))?;
    let value = f(session).map_err(to_js)?;
    to_value(&value)
}

fn to_value<T: Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(to_js)
}

fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    #[test]
    fn human_and_ai_take_turns() {
        let mut session = Session::new(Mode::HumanVsAi { depth: 2 }, EvalWeights::default());

        let err = session.ai_move().unwrap_err();
        assert_eq!(err, GameError::NotThisSeat(Side::Black));
        assert_eq!(err.to_string(), "Black is to move and is not played by this seat");
        let state = session.place(2, 3).unwrap();
        assert_eq!(state.current_player, 2);

        let err = session.place(2, 2).unwrap_err();
        assert_eq!(err, GameError::NotThisSeat(Side::White));
        assert_eq!(err.to_string(), "White is to move and is not played by this seat");
        let reply = session.ai_move().unwrap();
        assert_eq!(reply.state.current_player, 1);
        assert!(reply.search.is_some());
    }

    #[test]
    fn illegal_human_move_keeps_session_intact() {
        let mut session = Session::new(Mode::HumanVsAi { depth: 1 }, EvalWeights::default());

        assert_eq!(
            session.place(0, 0),
            Err(GameError::NoFlips(Move::new(0, 0)))
        );
        assert_eq!(session.game().to_move(), Side::Black);
        assert_eq!(session.pass_turn(), Err(GameError::MustPlay));
    }

    #[test]
    fn ai_vs_ai_session_plays_to_the_end() {
        let mut session = Session::new(Mode::AiVsAi { depth: 1 }, EvalWeights::default());

        while !session.game().is_over() {
            session.ai_move().unwrap();
        }

        assert_eq!(session.ai_move().unwrap_err(), GameError::GameOver);
        assert!(session.game().result().is_some());
    }
}
