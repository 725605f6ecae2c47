//! Line-based text front end for a game between two local players.
//!
//! [`Session::run`] is the main loop: it reads one command per line from the
//! input stream, applies it to the [`GameState`] and reports the result to the
//! output stream. All chess decisions are delegated to [`crate::chess`].
//!
//! Supported commands:
//!
//! - `<move>` in coordinate notation (`e2e4`, `e7e8q`): plays the move,
//! - `undo`: takes back the last move,
//! - `moves`: lists the legal moves,
//! - `d`: draws the board,
//! - `log`: prints the move log,
//! - `fen`: prints the current position,
//! - `position [startpos | fen <fen>]`: starts from the given position,
//! - `new`: starts a new game,
//! - `quit`: exits.

use std::io::{BufRead, Write};

use itertools::Itertools;

use crate::chess::game::GameState;
use crate::chess::moves::Move;
use crate::interface::command::Command;

mod command;

/// Connects the game to the input and output streams.
pub struct Session<'a, R: BufRead, W: Write> {
    game: GameState,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    /// Creates a session playing `game` over the provided I/O.
    #[must_use]
    pub fn new(game: GameState, input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            game,
            input,
            output,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn game(&self) -> &GameState {
        &self.game
    }

    /// Continuously reads the input stream and executes commands until `quit`
    /// is sent or the input ends.
    ///
    /// Rejected moves and malformed commands are reported to the output and
    /// the session continues.
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] if reading from the input or writing to the
    /// output fails.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            match Command::parse(&line) {
                Command::Play(candidate) => self.handle_play(&candidate)?,
                Command::Undo => self.handle_undo()?,
                Command::Moves => self.handle_moves()?,
                Command::Display => writeln!(self.output, "{}", self.game)?,
                Command::Log => self.handle_log()?,
                Command::Fen => writeln!(self.output, "{}", self.game.fen())?,
                Command::SetPosition { fen } => self.handle_position(fen.as_deref())?,
                Command::NewGame => {
                    self.game = GameState::new();
                    writeln!(self.output, "New game")?;
                },
                Command::Quit => break,
                Command::Empty => {},
                Command::Unknown(command) => {
                    log::debug!("unsupported command: {command}");
                    writeln!(self.output, "Unsupported command: {command}")?;
                },
            }
            self.output.flush()?;
        }
        Ok(())
    }

    /// Plays the move and echoes its notation, followed by the outcome if the
    /// game is over.
    fn handle_play(&mut self, candidate: &Move) -> anyhow::Result<()> {
        match self.game.make_move(candidate) {
            Ok(()) => {
                if let Some(played) = self.game.move_log().last() {
                    writeln!(self.output, "{}", played.notation())?;
                }
                if let Some(outcome) = self.game.outcome() {
                    writeln!(self.output, "{outcome}")?;
                }
            },
            Err(_) => writeln!(self.output, "Illegal move: {candidate}")?,
        }
        Ok(())
    }

    fn handle_undo(&mut self) -> anyhow::Result<()> {
        match self.game.undo_move() {
            Ok(last) => writeln!(self.output, "Took back {last}")?,
            Err(e) => writeln!(self.output, "Can not undo: {e}")?,
        }
        Ok(())
    }

    /// Lists the legal moves in coordinate notation, sorted.
    fn handle_moves(&mut self) -> anyhow::Result<()> {
        let moves = self
            .game
            .valid_moves()
            .iter()
            .map(Move::to_string)
            .sorted()
            .join(" ");
        writeln!(self.output, "{moves}")?;
        Ok(())
    }

    fn handle_log(&mut self) -> anyhow::Result<()> {
        for line in self.game.move_log_lines() {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    fn handle_position(&mut self, fen: Option<&str>) -> anyhow::Result<()> {
        match fen {
            None => self.game = GameState::new(),
            Some(fen) => match GameState::from_fen(fen) {
                Ok(game) => self.game = game,
                Err(e) => {
                    writeln!(self.output, "Invalid position: {e}")?;
                    return Ok(());
                },
            },
        }
        writeln!(self.output, "{}", self.game.fen())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn run(game: GameState, input: &str) -> (GameState, String) {
        let mut input = input.as_bytes();
        let mut output = Vec::new();
        let game = {
            let mut session = Session::new(game, &mut input, &mut output);
            session.run().unwrap();
            session.game().clone()
        };
        (game, String::from_utf8(output).unwrap())
    }

    #[test]
    fn plays_moves() {
        let (game, output) = run(GameState::new(), "e2e4\ne7e5\ng1f3\nlog\n");
        assert_eq!(output, "e4\ne5\nNf3\n1. e4 e5\n2. Nf3\n");
        assert_eq!(game.move_log().len(), 3);
    }

    #[test]
    fn reports_illegal_moves() {
        let (game, output) = run(GameState::new(), "e2e5\ne7e5\n");
        assert_eq!(output, "Illegal move: e2e5\nIllegal move: e7e5\n");
        assert!(game.move_log().is_empty());
    }

    #[test]
    fn announces_checkmate() {
        let (game, output) = run(GameState::new(), "f2f3\ne7e5\ng2g4\nd8h4\ne1f2\n");
        assert_eq!(
            output,
            "f3\ne5\ng4\nQh4#\nBlack wins by checkmate\nIllegal move: e1f2\n"
        );
        assert!(game.is_checkmate());
    }

    #[test]
    fn undo_and_new_game() {
        let (game, output) = run(GameState::new(), "undo\ne2e4\nundo\nfen\ne2e4\nnew\n");
        assert_eq!(
            output,
            "Can not undo: no move to undo\ne4\nTook back e2e4\n\
             rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1\ne4\nNew game\n"
        );
        assert!(game.move_log().is_empty());
    }

    #[test]
    fn set_position() {
        let (game, output) = run(
            GameState::new(),
            "position fen 4k3/8/8/8/8/8/8/4K2R w K - 0 1\nmoves\nposition fen 8/8/8/8/8/8/8/8 w - - 0 1\n",
        );
        assert_eq!(
            output,
            "4k3/8/8/8/8/8/8/4K2R w K - 0 1\n\
             e1d1 e1d2 e1e2 e1f1 e1f2 e1g1 h1f1 h1g1 h1h2 h1h3 h1h4 h1h5 h1h6 h1h7 h1h8\n\
             Invalid position: expected 1 white king, got 0\n"
        );
        assert_eq!(game.castling().to_string(), "K");
    }

    #[test]
    fn stops_on_quit() {
        let (game, output) = run(GameState::new(), "e2e4\nquit\ne7e5\n");
        assert_eq!(output, "e4\n");
        assert_eq!(game.move_log().len(), 1);
    }

    #[test]
    fn unsupported_command() {
        let (_, output) = run(GameState::new(), "\ngo depth 3\n");
        assert_eq!(output, "Unsupported command: go depth 3\n");
    }
}
