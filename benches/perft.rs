//! Criterion benchmarks measure time of move generation and perft calculation.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use duel::chess::position::Position;
use shakmaty::{CastlingMode, Chess, Position as ShakmatyPosition};

const POSITIONS: [&str; 6] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
];

fn generate_moves(positions: &[Position]) {
    for position in positions {
        let _ = std::hint::black_box(position.generate_moves());
    }
}

fn movegen_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("Move generation");
    let positions: Vec<Position> = POSITIONS
        .iter()
        .map(|fen| Position::from_fen(fen).unwrap())
        .collect();
    let _ = group.throughput(criterion::Throughput::Elements(positions.len() as u64));
    let _ = group.bench_with_input(
        BenchmarkId::new("movegen", format!("{} positions", positions.len())),
        &positions,
        |b, positions| {
            b.iter(|| generate_moves(positions));
        },
    );
    // shakmaty is a reasonable reference with stable performance. The mailbox
    // generator is not expected to match it, but the ratio is worth tracking.
    let shakmaty_positions: Vec<Chess> = POSITIONS
        .iter()
        .map(|fen| {
            let setup: shakmaty::fen::Fen = fen.parse().unwrap();
            setup.into_position(CastlingMode::Standard).unwrap()
        })
        .collect();
    let _ = group.bench_with_input(
        BenchmarkId::new(
            "movegen_reference_shakmaty",
            format!("{} positions", shakmaty_positions.len()),
        ),
        &shakmaty_positions,
        |b, positions| {
            b.iter(|| {
                for position in positions {
                    let _ = std::hint::black_box(position.legal_moves());
                }
            });
        },
    );
    group.finish();
}

criterion_group! {
    name = movegen;
    config = Criterion::default().sample_size(100);
    targets = movegen_bench
}

// This acts both as performance and correctness test.
fn perft_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    for (fen, depth, nodes) in [
        // Position 1.
        (POSITIONS[0], 4, 197_281),
        // Position 2.
        (POSITIONS[1], 3, 97_862),
        // Position 3.
        (POSITIONS[2], 5, 674_624),
        // Position 4.
        (POSITIONS[3], 3, 9_467),
        // Position 5.
        (POSITIONS[4], 3, 62_379),
        // Position 6.
        (POSITIONS[5], 3, 89_890),
    ] {
        let position = Position::from_fen(fen).unwrap();
        let _ = group.throughput(criterion::Throughput::Elements(nodes));
        let _ = group.bench_with_input(
            BenchmarkId::new(
                "perft",
                format!("position {position}, depth {depth}, nodes {nodes}"),
            ),
            &depth,
            |b, &depth| {
                b.iter(|| {
                    assert_eq!(duel::chess::position::perft(&position, depth), nodes);
                });
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = perft;
    config = Criterion::default().sample_size(10);
    targets = perft_bench
}

criterion_main!(movegen, perft);
