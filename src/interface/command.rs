//! Commands understood by the text front end.

use crate::chess::moves::Move;

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    /// Move in coordinate notation, e.g. `e2e4` or `e7e8q`.
    Play(Move),
    Undo,
    Moves,
    Display,
    Log,
    Fen,
    /// `position startpos` or `position fen <fen>`; `None` is the starting
    /// position.
    SetPosition {
        fen: Option<String>,
    },
    NewGame,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_setposition(parts: &[&str]) -> Command {
    match parts.get(1) {
        Some(&"startpos") if parts.len() == 2 => Command::SetPosition { fen: None },
        Some(&"fen") if parts.len() > 2 => Command::SetPosition {
            fen: Some(parts[2..].join(" ")),
        },
        _ => Command::Unknown(parts.join(" ")),
    }
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();

        let Some(&first) = parts.first() else {
            return Self::Empty;
        };

        match first {
            "undo" => Self::Undo,
            "moves" => Self::Moves,
            "d" => Self::Display,
            "log" => Self::Log,
            "fen" => Self::Fen,
            "position" => parse_setposition(&parts),
            "new" => Self::NewGame,
            "quit" => Self::Quit,
            _ => match Move::from_uci(first) {
                Ok(candidate) if parts.len() == 1 => Self::Play(candidate),
                _ => Self::Unknown(input.trim().to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_moves() {
        assert_eq!(
            Command::parse("e2e4"),
            Command::Play(Move::from_uci("e2e4").unwrap())
        );
        assert_eq!(
            Command::parse("  a7a8n \n"),
            Command::Play(Move::from_uci("a7a8n").unwrap())
        );
        assert_eq!(
            Command::parse("e2e4 e7e5"),
            Command::Unknown("e2e4 e7e5".to_string())
        );
    }

    #[test]
    fn parse_keywords() {
        assert_eq!(Command::parse("undo"), Command::Undo);
        assert_eq!(Command::parse("moves"), Command::Moves);
        assert_eq!(Command::parse("d"), Command::Display);
        assert_eq!(Command::parse("log"), Command::Log);
        assert_eq!(Command::parse("fen"), Command::Fen);
        assert_eq!(Command::parse("new"), Command::NewGame);
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("   "), Command::Empty);
    }

    #[test]
    fn parse_position() {
        assert_eq!(
            Command::parse("position startpos"),
            Command::SetPosition { fen: None }
        );
        assert_eq!(
            Command::parse("position fen 4k3/8/8/8/8/8/8/4K3 w - - 0 1"),
            Command::SetPosition {
                fen: Some("4k3/8/8/8/8/8/8/4K3 w - - 0 1".to_string())
            }
        );
        assert_eq!(
            Command::parse("position"),
            Command::Unknown("position".to_string())
        );
    }

    #[test]
    fn unknown() {
        assert_eq!(
            Command::parse("go depth 10"),
            Command::Unknown("go depth 10".to_string())
        );
        assert_eq!(
            Command::parse("e2e9"),
            Command::Unknown("e2e9".to_string())
        );
    }
}
