//! The game session state machine.

use std::iter;

use chess_core::{Color, Move};
use chess_engine::draw::{self, DrawFlags};
use chess_engine::{
    is_check, make_move, move_to_san, san_to_move, AutomaticDraw, MoveList, Position, RuleConfig,
    RuleSet, Termination, Variant,
};
use chess_render::{render_png, RenderError, RenderOptions};

use crate::state::{Annotation, DrawClaim, GameState, MoveOutcome, MoveSummary, PlayerId, Turn};
use crate::SessionError;

/// A move in the game history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The move as resolved against the position before it.
    pub mov: Move,
    /// SAN of the move, with check and mate suffixes.
    pub san: String,
    /// The position after the move.
    pub position: Position,
}

/// A variant with its rule switches, which a session may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rules {
    variant: Variant,
    config: RuleConfig,
}

impl RuleSet for Rules {
    fn initial_position(&self) -> Position {
        self.variant.initial_position()
    }

    fn config(&self) -> RuleConfig {
        self.config
    }
}

/// A two-player game.
///
/// White always moves first; which identifier plays which color is fixed
/// at construction. Every position reached is kept in the history, so
/// repetition claims can be evaluated at any point.
///
/// ```
/// use chess_session::{GameState, PlayerId, Session};
///
/// let white = PlayerId::new("alice");
/// let black = PlayerId::new("bob");
/// let mut session = Session::new(white.clone(), black.clone(), None).unwrap();
///
/// let outcome = session.move_piece(&white, "e4").unwrap();
/// assert!(!outcome.game_over);
/// assert_eq!(session.turn().player, black);
/// assert_eq!(session.state(), GameState::InProgress);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    white: PlayerId,
    black: PlayerId,
    rules: Rules,
    start: Position,
    position: Position,
    history: Vec<HistoryEntry>,
    draw_flags: DrawFlags,
    state: GameState,
}

impl Session {
    /// Creates a game between `white` and `black`.
    ///
    /// `variant_tag` selects the rules; `None` means standard chess.
    pub fn new(
        white: impl Into<PlayerId>,
        black: impl Into<PlayerId>,
        variant_tag: Option<&str>,
    ) -> Result<Self, SessionError> {
        let variant = Variant::from_tag(variant_tag)?;
        Self::with_start(white.into(), black.into(), variant, variant.initial_position())
    }

    /// Creates a standard game that starts from `fen`.
    ///
    /// The starting position may already be terminal, for example a
    /// stalemate.
    pub fn from_fen(
        white: impl Into<PlayerId>,
        black: impl Into<PlayerId>,
        fen: &str,
    ) -> Result<Self, SessionError> {
        let start = Position::from_fen(fen)?;
        Self::with_start(white.into(), black.into(), Variant::Standard, start)
    }

    pub(crate) fn with_start(
        white: PlayerId,
        black: PlayerId,
        variant: Variant,
        start: Position,
    ) -> Result<Self, SessionError> {
        if white == black {
            return Err(SessionError::SamePlayer(white));
        }
        let mut session = Session {
            white,
            black,
            rules: Rules {
                variant,
                config: variant.config(),
            },
            position: start.clone(),
            start,
            history: Vec::new(),
            draw_flags: DrawFlags::default(),
            state: GameState::InProgress,
        };
        session.evaluate();
        Ok(session)
    }

    /// Replaces the rule switches of the variant.
    ///
    /// Only a session without moves accepts new rules, so a game is judged
    /// by one configuration from start to end.
    pub fn with_rules(mut self, config: RuleConfig) -> Result<Self, SessionError> {
        if !self.history.is_empty() {
            return Err(SessionError::RulesLocked);
        }
        self.rules.config = config;
        self.evaluate();
        Ok(self)
    }

    /// Returns the player of the white pieces.
    pub fn white(&self) -> &PlayerId {
        &self.white
    }

    /// Returns the player of the black pieces.
    pub fn black(&self) -> &PlayerId {
        &self.black
    }

    /// Returns `(white, black)`.
    pub fn players(&self) -> (&PlayerId, &PlayerId) {
        (&self.white, &self.black)
    }

    /// Returns the player of `color`.
    pub fn player(&self, color: Color) -> &PlayerId {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// Returns the color `player` plays, if they are part of the game.
    pub fn color_of(&self, player: &PlayerId) -> Option<Color> {
        if *player == self.white {
            Some(Color::White)
        } else if *player == self.black {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// Returns the side to move and the players in turn order.
    pub fn turn(&self) -> Turn {
        let color = self.position.side_to_move;
        Turn {
            color,
            player: self.player(color).clone(),
            next_player: self.player(color.opposite()).clone(),
        }
    }

    /// Returns the number of plies played.
    pub fn total_moves(&self) -> usize {
        self.history.len()
    }

    /// Returns the variant the game is played under.
    pub fn variant(&self) -> Variant {
        self.rules.variant
    }

    /// Returns the canonical variant tag, e.g. `standard` or `chess960:518`.
    pub fn variant_tag(&self) -> String {
        self.rules.variant.tag()
    }

    /// Returns the rule switches in effect.
    pub fn rule_config(&self) -> RuleConfig {
        self.rules.config
    }

    /// Returns the current game state.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Returns true once the game has reached a terminal state.
    pub fn is_game_over(&self) -> bool {
        self.state.is_over()
    }

    /// Returns the winning player of a decisive game.
    pub fn winner(&self) -> Option<&PlayerId> {
        self.state.winner().map(|color| self.player(color))
    }

    /// Returns true if a fifty-move draw can be claimed now.
    pub fn can_claim_fifty_moves(&self) -> bool {
        self.draw_flags.fifty_moves
    }

    /// Returns true if a threefold-repetition draw can be claimed now.
    pub fn can_claim_threefold_repetition(&self) -> bool {
        self.draw_flags.threefold_repetition
    }

    /// Returns true if `claim` could be made right now.
    pub fn can_claim(&self, claim: DrawClaim) -> bool {
        match claim {
            DrawClaim::FiftyMoves => self.draw_flags.fifty_moves,
            DrawClaim::ThreefoldRepetition => self.draw_flags.threefold_repetition,
        }
    }

    /// Returns true if any draw could be claimed right now.
    pub fn can_claim_draw(&self) -> bool {
        self.draw_flags.any()
    }

    /// Returns both claim flags as computed after the last move.
    pub fn draw_flags(&self) -> DrawFlags {
        self.draw_flags
    }

    /// Returns the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the position the game started from.
    pub fn start_position(&self) -> &Position {
        &self.start
    }

    /// Returns the moves played, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Returns the SAN of every move played.
    pub fn san_moves(&self) -> Vec<&str> {
        self.history.iter().map(|entry| entry.san.as_str()).collect()
    }

    /// Returns the legal moves of the side to move, none once the game is
    /// over.
    pub fn legal_moves(&self) -> MoveList {
        if self.state.is_over() {
            MoveList::new()
        } else {
            self.rules.generate_moves(&self.position)
        }
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        is_check(&self.position)
    }

    /// Returns the FEN of the current position.
    pub fn fen(&self) -> String {
        self.position.to_fen()
    }

    /// Renders the current position as PNG with default options.
    pub fn render_image(&self) -> Result<Vec<u8>, RenderError> {
        self.render_image_with(&RenderOptions::default())
    }

    /// Renders the current position as PNG with `options`.
    pub fn render_image_with(&self, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
        render_png(&self.position, options)
    }

    /// Plays `text` (SAN) for `player`.
    ///
    /// On failure the session is unchanged.
    pub fn move_piece(
        &mut self,
        player: &PlayerId,
        text: &str,
    ) -> Result<MoveOutcome, SessionError> {
        self.ensure_in_progress()?;
        let color = self
            .color_of(player)
            .ok_or_else(|| SessionError::NotAPlayer(player.clone()))?;
        if color != self.position.side_to_move {
            return Err(SessionError::NotYourTurn(player.clone()));
        }

        let m = san_to_move(&self.position, text)?;
        let san = move_to_san(&self.position, m);
        let next = make_move(&self.position, m);

        self.history.push(HistoryEntry {
            mov: m,
            san: san.clone(),
            position: next.clone(),
        });
        self.position = next;
        self.evaluate();

        let annotation = match self.state {
            GameState::Checkmate { .. } => Some(Annotation::Checkmate),
            _ if self.is_check() => Some(Annotation::Check),
            _ => None,
        };
        let summary = MoveSummary {
            player: player.clone(),
            color,
            move_number: self.history.len(),
            san,
            annotation,
        };

        tracing::debug!("{} played {} ({})", player, summary.san, m.to_uci());
        if self.state.is_over() {
            tracing::info!("Game over after {} plies: {}", self.history.len(), self.state);
        }

        Ok(MoveOutcome {
            game_over: self.state.is_over(),
            summary,
        })
    }

    /// Resigns the game for `player`, whose opponent wins.
    ///
    /// Allowed on either player's turn.
    pub fn resign(&mut self, player: &PlayerId) -> Result<GameState, SessionError> {
        self.ensure_in_progress()?;
        let color = self
            .color_of(player)
            .ok_or_else(|| SessionError::NotAPlayer(player.clone()))?;
        self.finish(GameState::Resigned {
            winner: color.opposite(),
        });
        Ok(self.state)
    }

    /// Ends the game with `claim` if it is currently claimable.
    pub fn claim_draw(&mut self, claim: DrawClaim) -> Result<GameState, SessionError> {
        self.ensure_in_progress()?;
        if !self.can_claim(claim) {
            return Err(SessionError::DrawNotClaimable(claim));
        }
        self.finish(GameState::DrawClaimed(claim));
        Ok(self.state)
    }

    /// Ends the game as a draw by agreement.
    ///
    /// Both players agreeing is the caller's concern.
    pub fn agree_draw(&mut self) -> Result<GameState, SessionError> {
        self.ensure_in_progress()?;
        self.finish(GameState::DrawAgreed);
        Ok(self.state)
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        if self.state.is_over() {
            Err(SessionError::GameOver)
        } else {
            Ok(())
        }
    }

    fn finish(&mut self, state: GameState) {
        self.state = state;
        self.draw_flags = DrawFlags::default();
        tracing::info!("Game over after {} plies: {}", self.history.len(), state);
    }

    /// Positions before the current one, the starting position first.
    fn earlier_positions(&self) -> impl DoubleEndedIterator<Item = &Position> {
        let played = self.history.len();
        let before_last = &self.history[..played.saturating_sub(1)];
        iter::once(&self.start)
            .take(played.min(1))
            .chain(before_last.iter().map(|entry| &entry.position))
    }

    /// Recomputes the state and the claim flags for the current position.
    fn evaluate(&mut self) {
        let termination = self.rules.termination(&self.position).or_else(|| {
            (self.rules.config.automatic_draws
                && draw::is_fivefold_repetition(self.earlier_positions(), &self.position))
            .then_some(Termination::Automatic(AutomaticDraw::FivefoldRepetition))
        });

        self.state = match termination {
            None => GameState::InProgress,
            Some(Termination::Checkmate { winner }) => GameState::Checkmate { winner },
            Some(Termination::Stalemate) => GameState::Stalemate,
            Some(Termination::InsufficientMaterial) => GameState::DrawByInsufficientMaterial,
            Some(Termination::Automatic(reason)) => GameState::DrawAutomatic(reason),
        };

        self.draw_flags = if self.state.is_over() {
            DrawFlags::default()
        } else {
            DrawFlags::evaluate(self.earlier_positions(), &self.position)
        };
    }
}
