#![no_main]
use duel::chess::position::Position;
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use shakmaty::{CastlingMode, Chess, Position as ShakmatyPosition};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(position) = Position::from_fen(input) else {
        return;
    };
    // Printing the position back has to produce the same position.
    assert_eq!(Position::from_fen(&position.to_string()).ok(), Some(position));

    let Ok(shakmaty_setup) = input.trim().parse::<shakmaty::fen::Fen>() else {
        return;
    };
    let Ok(shakmaty_position) = shakmaty_setup.into_position::<Chess>(CastlingMode::Standard)
    else {
        return;
    };
    let moves = position.generate_moves();
    assert_eq!(
        moves.iter().map(ToString::to_string).sorted().collect::<Vec<_>>(),
        shakmaty_position
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .sorted()
            .collect::<Vec<_>>()
    );
    // Every move can be taken back exactly.
    for next_move in &moves {
        let mut next = position;
        next.make_move(next_move);
        next.unmake_move(next_move);
        assert_eq!(next, position);
    }
});
