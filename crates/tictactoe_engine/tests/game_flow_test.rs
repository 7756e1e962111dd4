//! End-to-end tests for the game state machine.

use tictactoe_engine::{
    Difficulty, Game, GamePhase, Outcome, Player, Rejection, RngSource, ScriptedSource, Seats,
    Transition,
};

/// Redeems the pending computer turn, if any.
fn computer_plays<R: tictactoe_engine::RandomSource>(game: &mut Game<R>) -> Option<Transition> {
    let turn = game.pending_computer_turn()?;
    Some(game.play_computer_turn(turn).expect("computer has a legal move"))
}

#[test]
fn test_choose_o_gives_x_to_computer() {
    let mut game = Game::new(Difficulty::Hard, ScriptedSource::default());
    assert!(game.choose_player(Player::O));

    assert_eq!(game.phase(), GamePhase::InProgress);
    assert_eq!(
        game.seats(),
        Some(Seats {
            human: Player::O,
            computer: Player::X
        })
    );
    assert_eq!(game.to_move(), Some(Player::X));
}

#[test]
fn test_hard_opening_is_random_then_optimal() {
    // Computer is X: opening comes straight from the random source.
    let mut game = Game::new(Difficulty::Hard, ScriptedSource::new([4], []));
    game.choose_player(Player::O);

    assert_eq!(computer_plays(&mut game), Some(Transition::Continued { next: Player::O }));
    assert_eq!(game.board().to_string(), "....X....");

    // An edge reply to the center loses against perfect play, no matter how
    // well the human defends afterwards.
    game.submit_human_move(1);
    while game.phase() == GamePhase::InProgress {
        if computer_plays(&mut game).is_none() {
            game.submit_human_move(best_block(&game));
        }
    }
    assert_eq!(game.outcome(), Some(Outcome::Winner(Player::X)));
}

/// The human (O) blocks an X threat if there is one, else takes the first
/// empty square.
fn best_block<R>(game: &Game<R>) -> usize {
    let board = game.board();
    for index in board.empty_squares() {
        let probe = board.apply_move(index, Player::X).expect("empty square");
        if tictactoe_engine::rules::check_winner(&probe) == Some(Player::X) {
            return index;
        }
    }
    board.empty_squares()[0]
}

#[test]
fn test_human_cannot_beat_hard_computer() {
    // Every human opening as X, then the human takes the first empty
    // square each turn; the computer must draw or win every time.
    for opening in 0..9 {
        let mut game = Game::new(Difficulty::Hard, RngSource::seeded(opening as u64));
        game.choose_player(Player::X);
        game.submit_human_move(opening);

        while game.phase() == GamePhase::InProgress {
            if computer_plays(&mut game).is_none() {
                let index = game.board().empty_squares()[0];
                game.submit_human_move(index);
            }
        }
        assert_ne!(
            game.outcome(),
            Some(Outcome::Winner(Player::X)),
            "opening at {opening}"
        );
    }
}

#[test]
fn test_easy_games_always_terminate() {
    for seed in 0..20 {
        let mut game = Game::new(Difficulty::Easy, RngSource::seeded(seed));
        game.choose_player(Player::O);
        let mut guard = 0;
        while game.phase() == GamePhase::InProgress {
            if computer_plays(&mut game).is_none() {
                let index = game.board().empty_squares()[0];
                assert!(game.submit_human_move(index).is_accepted());
            }
            guard += 1;
            assert!(guard <= 9, "game did not end within nine moves");
        }
        assert!(game.outcome().is_some());
        assert_eq!(game.history().len(), game.board().occupied_count());
    }
}

#[test]
fn test_restart_from_over_resets_everything() {
    let mut game = Game::new(Difficulty::Easy, ScriptedSource::new([3, 4], []));
    game.choose_player(Player::X);
    game.submit_human_move(0);
    computer_plays(&mut game);
    game.submit_human_move(1);
    computer_plays(&mut game);
    assert_eq!(game.submit_human_move(2), Transition::Finished(Outcome::Winner(Player::X)));
    assert_eq!(game.status(), "Player X wins!");

    game.restart();

    assert_eq!(game.phase(), GamePhase::NotStarted);
    assert!(game.board().is_empty());
    assert_eq!(game.outcome(), None);
    assert_eq!(
        game.submit_human_move(0),
        Transition::Rejected(Rejection::NotInProgress)
    );
}

#[test]
fn test_draw_reports_draw_message() {
    let mut game = Game::new(Difficulty::Easy, ScriptedSource::default());
    game.choose_player(Player::X);
    // X O X / X O O / O X X
    let script = [
        (0, Player::X),
        (1, Player::O),
        (2, Player::X),
        (4, Player::O),
        (3, Player::X),
        (5, Player::O),
        (7, Player::X),
        (6, Player::O),
    ];
    for (index, player) in script {
        assert!(game.make_move(index, player).is_accepted());
    }
    assert_eq!(game.make_move(8, Player::X), Transition::Finished(Outcome::Draw));
    assert_eq!(game.status(), "It's a draw");
}
