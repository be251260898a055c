#![no_main]
use libfuzzer_sys::fuzz_target;
use uct_agent::games::toetactic::Board;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(board) = Board::try_from(s) {
            let printed = board.to_string();
            assert_eq!(Board::try_from(printed.as_str()).ok(), Some(board));
        }
    }
});
