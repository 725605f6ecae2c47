//! Chess rules engine for two players sharing one board. For more
//! information, see [README].
//!
//! The rules live in [`chess`]: board representation, move generation with
//! full legality (castling, en passant, promotion), move application and
//! reversal, check, checkmate and stalemate detection and move notation.
//! [`interface`] is a thin line-based front end on top of
//! [`chess::game::GameState`].
//!
//! ```
//! use duel::chess::game::GameState;
//! use duel::chess::moves::Move;
//!
//! let mut game = GameState::new();
//! for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     game.make_move(&Move::from_uci(uci).unwrap()).unwrap();
//! }
//! assert!(game.is_checkmate());
//! assert_eq!(game.outcome().as_deref(), Some("Black wins by checkmate"));
//! ```
//!
//! [README]: https://github.com/duel-chess/duel/blob/main/README.md

pub mod chess;
pub mod interface;

use shadow_rs::shadow;

shadow!(build);

/// Build profile. Produced by `build.rs`.
const PROFILE: &str = include_str!(concat!(env!("OUT_DIR"), "/profile"));

/// Returns the full version that can be used to identify how the binary was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the version and the repository on startup.
pub fn print_engine_info() {
    println!("Duel chess {}", engine_version());
    println!("<{}>", env!("CARGO_PKG_REPOSITORY"));
}

/// Prints the build profile and whether the build is clean on startup.
pub fn print_binary_info() {
    println!("Build profile: {PROFILE}");
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
