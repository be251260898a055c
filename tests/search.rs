use std::time::Duration;

use pretty_assertions::assert_eq;
use uct_agent::environment::Terminal;
use uct_agent::games::scripted::{Position, Scripted};
use uct_agent::games::toetactic::{Board, Cell};
use uct_agent::{run, GameState, Player, SearchConfig, SearchError, Searcher};

fn board(input: &str) -> Board {
    Board::try_from(input).expect("valid board")
}

fn cell(square: &str) -> Cell {
    Cell::try_from(square).expect("valid square")
}

#[test]
fn picks_the_winning_move() {
    // "a" ends the game with White to move, "b" leads to Black's forced win.
    let game = Scripted::new(vec![
        Position::new(Player::White, &[("a", 1), ("b", 2)]),
        Position::checkmate(Player::White),
        Position::new(Player::Black, &[("finish", 3)]),
        Position::checkmate(Player::Black),
    ]);
    for seed in 0..20 {
        let result = Searcher::seeded(SearchConfig::default().with_iterations(10), seed)
            .search(&game)
            .expect("root is not terminal");
        assert_eq!(result.best_move, "a", "seed {seed}");
    }
}

#[test]
fn unlucky_first_playout_is_recovered() {
    // After "sharp" White always wins by answering with "finish", yet a random
    // playout blunders half of the time. After "loose" Black always wins by
    // answering with "punish", yet a random playout gifts the win half of the
    // time.
    let game = Scripted::new(vec![
        Position::new(Player::White, &[("sharp", 1), ("loose", 5)]),
        Position::new(Player::Black, &[("forced", 2)]),
        Position::new(Player::White, &[("finish", 3), ("blunder", 4)]),
        Position::checkmate(Player::White),
        Position::checkmate(Player::Black),
        Position::new(Player::Black, &[("gift", 3), ("punish", 4)]),
    ]);
    for seed in 0..100 {
        let result = Searcher::seeded(SearchConfig::default().with_iterations(1000), seed)
            .search(&game)
            .expect("root is not terminal");
        assert_eq!(result.best_move, "sharp", "seed {seed}");
        for child in &result.children {
            assert!(child.visits > 1, "seed {seed}: {child:?}");
        }
    }
}

#[test]
fn avoids_completing_a_line() {
    // O loses by completing the top row with a3. After c1, X is forced to
    // complete the first column.
    let position = board(". O O\nX O X\nX X .\nO");
    for seed in 0..10 {
        let result = Searcher::seeded(SearchConfig::default().with_iterations(50), seed)
            .search(&position)
            .expect("root is not terminal");
        assert_eq!(result.best_move, cell("c1"), "seed {seed}");
        assert_eq!(result.iterations, 50);
    }
}

#[test]
fn search_does_not_modify_the_root() {
    let position = Board::starting();
    let copy = position;
    let result = Searcher::seeded(SearchConfig::default().with_iterations(200), 1)
        .search(&position)
        .expect("root is not terminal");
    assert_eq!(position, copy);
    assert!(position.legal_moves().contains(&result.best_move));
}

#[test]
fn only_move() {
    let position = board("X O X\nX O O\nO X .\nX");
    let result = Searcher::seeded(SearchConfig::default().with_iterations(5), 0)
        .search(&position)
        .expect("root is not terminal");
    assert_eq!(result.best_move, cell("c1"));
    assert_eq!(result.nodes, 2);
    assert_eq!(result.children.len(), 1);
    assert_eq!(result.children[0].visits, 5);
    // The last move fills the board without a line.
    assert_eq!(result.children[0].wins, 0);
}

#[test]
fn finished_games_are_rejected() {
    let mut searcher = Searcher::seeded(SearchConfig::default(), 0);
    assert!(matches!(
        searcher.search(&board("X X X\nO O .\n. . .\nO")),
        Err(SearchError::TerminalRoot(Terminal::Checkmate))
    ));
    assert!(matches!(
        searcher.search(&board("X O X\nX O O\nO X X\nO")),
        Err(SearchError::TerminalRoot(Terminal::Stalemate))
    ));
}

#[test]
fn respects_the_deadline() {
    let config = SearchConfig::default().with_time_limit(Duration::from_millis(50));
    let result = Searcher::seeded(config, 2)
        .search(&Board::starting())
        .expect("root is not terminal");
    assert!(result.iterations > 1);
    assert!(result.elapsed >= Duration::from_millis(50));
    assert!(result.elapsed < Duration::from_secs(10));
}

#[test]
fn run_with_zero_minutes() {
    let best = run(Board::starting(), 0).expect("root is not terminal");
    assert!(Board::starting().legal_moves().contains(&best));

    assert!(matches!(
        run(board("X X X\nO O .\n. . .\nO"), 0),
        Err(SearchError::TerminalRoot(Terminal::Checkmate))
    ));
}
