use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;

const BINARY_NAME: &str = "duel";

#[test]
fn startup_banner() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("quit\n")
            .assert()
            .success()
            .stdout(
                contains("Duel chess")
                    .and(contains("8 bR bN bB bQ bK bB bN bR"))
                    .and(contains("White to move")),
            ),
    );
}

#[test]
fn scholars_mate() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("e2e4\ne7e5\nf1c4\nb8c6\nd1h5\ng8f6\nh5f7\nlog\n")
            .assert()
            .success()
            .stdout(
                contains("Qxf7#")
                    .and(contains("White wins by checkmate"))
                    .and(contains("4. Qxf7#")),
            ),
    );
}

#[test]
fn illegal_moves_and_unknown_commands() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("e2e5\nhello\nundo\n")
            .assert()
            .success()
            .stdout(
                contains("Illegal move: e2e5")
                    .and(contains("Unsupported command: hello"))
                    .and(contains("Can not undo: no move to undo")),
            ),
    );
}

#[test]
fn start_from_fen() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    let _ = cmd.args(["--fen", "7k/5K2/8/6P1/8/8/8/8 w - - 0 1"]);

    drop(
        cmd.write_stdin("g5g6\nfen\n")
            .assert()
            .success()
            .stdout(
                contains("Draw by stalemate").and(contains("7k/5K2/6P1/8/8/8/8/8 b - - 0 1")),
            ),
    );
}

#[test]
fn invalid_fen_argument() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    let _ = cmd.args(["--fen", "8/8/8/8/8/8/8/8 w - - 0 1"]);

    drop(
        cmd.assert()
            .failure()
            .stderr(contains("expected 1 white king, got 0")),
    );
}
