//! Command handlers. Each returns the text to print.

use std::fmt::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chess_session::{DrawClaim, PlayerId, Session};

use crate::config::ChessConfig;
use crate::store::{Store, DEFAULT_GAME_NAME};

/// A store bound to one scope.
pub struct App {
    pub store: Store,
    pub config: ChessConfig,
    pub scope: String,
}

impl App {
    /// Starts a game. The starting player takes Black and the opponent
    /// White, so the invited player moves first.
    pub fn start(
        &self,
        me: &str,
        opponent: &str,
        name: Option<&str>,
        variant: Option<&str>,
    ) -> Result<String> {
        let variant = variant.or(self.config.default_variant.as_deref());
        let session = Session::new(opponent, me, variant)?;
        let name = self
            .store
            .insert(&self.scope, name.unwrap_or(DEFAULT_GAME_NAME), &session)?;
        tracing::info!("Started {}/{} ({})", self.scope, name, session.variant_tag());

        Ok(format!(
            "Game: {}\nType: {}\n{} (White) moves first against {} (Black)",
            name,
            session.variant_tag(),
            session.white(),
            session.black()
        ))
    }

    pub fn play(&self, game: &str, player: &str, san: &str) -> Result<String> {
        let mut session = self.store.load(&self.scope, game)?;
        let outcome = session.move_piece(&PlayerId::new(player), san)?;

        let mut out = format!("Game: {}\n{}", game, outcome.summary);
        if outcome.game_over {
            self.finish(game, &session, &mut out)?;
            return Ok(out);
        }
        self.store.save(&self.scope, game, &session)?;

        let turn = session.turn();
        write!(out, "\nNext: {} ({})", turn.player, turn.color)?;
        let claims: Vec<String> = DrawClaim::ALL
            .into_iter()
            .filter(|claim| session.can_claim(*claim))
            .map(|claim| format!("\"{}\"", claim))
            .collect();
        if !claims.is_empty() {
            write!(
                out,
                "\nA draw can be claimed with `draw claim {} <player>` and {}",
                game,
                claims.join(" or ")
            )?;
        }
        Ok(out)
    }

    pub fn resign(&self, game: &str, player: &str) -> Result<String> {
        let mut session = self.store.load(&self.scope, game)?;
        session.resign(&PlayerId::new(player))?;
        let mut out = format!("Game: {}\n{} resigned", game, player);
        self.finish(game, &session, &mut out)?;
        Ok(out)
    }

    pub fn claim_draw(&self, game: &str, player: &str, reason: &str) -> Result<String> {
        let mut session = self.store.load(&self.scope, game)?;
        if session.color_of(&PlayerId::new(player)).is_none() {
            bail!("{} is not playing {}", player, game);
        }
        let claim: DrawClaim = reason.parse()?;
        session.claim_draw(claim)?;
        let mut out = format!("Game: {}\nDraw! {}", game, claim);
        self.finish(game, &session, &mut out)?;
        Ok(out)
    }

    /// Ends the game as a draw once both players have agreed.
    pub fn agree_draw(&self, game: &str, player: &str, opponent: &str) -> Result<String> {
        let mut session = self.store.load(&self.scope, game)?;
        let (player, opponent) = (PlayerId::new(player), PlayerId::new(opponent));
        match (session.color_of(&player), session.color_of(&opponent)) {
            (Some(a), Some(b)) if a != b => {}
            _ => bail!("both players of {} must agree to a draw", game),
        }
        session.agree_draw()?;
        let mut out = format!("Game: {}\nDraw accepted", game);
        self.finish(game, &session, &mut out)?;
        Ok(out)
    }

    pub fn list(&self, all: bool) -> Result<String> {
        let games = self
            .store
            .list((!all).then_some(self.scope.as_str()))?;
        if games.is_empty() {
            return Ok("No games available, start one with `start`".to_string());
        }

        let mut out = String::new();
        for (i, game) in games.iter().enumerate() {
            write!(out, "#{} {}/{}", i + 1, game.scope, game.name)?;
            match &game.session {
                Ok(session) => write!(
                    out,
                    "\n  Black: {}\n  White: {}\n  Total moves: {}\n  Type: {}\n",
                    session.black(),
                    session.white(),
                    session.total_moves(),
                    session.variant_tag()
                )?,
                Err(e) => writeln!(out, "\n  unreadable: {}", e)?,
            }
        }
        Ok(out.trim_end().to_string())
    }

    /// Writes the board of `game` as PNG to `out`.
    pub fn show(&self, game: &str, out: &Path) -> Result<String> {
        let session = self.store.load(&self.scope, game)?;
        let png = session.render_image_with(&self.config.render)?;
        std::fs::write(out, png).with_context(|| format!("writing {}", out.display()))?;

        let turn = session.turn();
        Ok(format!(
            "Game: {}\n{}\nTo move: {} ({})\nBoard written to {}",
            game,
            session.fen(),
            turn.player,
            turn.color,
            out.display()
        ))
    }

    /// Removes a finished game and reports the result.
    fn finish(&self, game: &str, session: &Session, out: &mut String) -> Result<()> {
        self.store.remove(&self.scope, game)?;
        write!(out, "\nGame over: {}", session.state())?;
        if let Some(winner) = session.winner() {
            write!(out, "\n{} has won!", winner)?;
        }
        Ok(())
    }
}
