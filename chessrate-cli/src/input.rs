//! Choosing the handle lists for a run: flags first, remembered input second

use chessrate_common::{InputStore, LastInput};

/// Per list, a flag value (even an empty one) beats the remembered value
pub fn choose_input(
    lichess_flag: Option<String>,
    chesscom_flag: Option<String>,
    remembered: LastInput,
) -> LastInput {
    LastInput {
        lichess: lichess_flag.unwrap_or(remembered.lichess),
        chesscom: chesscom_flag.unwrap_or(remembered.chesscom),
    }
}

/// Forget the remembered lists. `false` means there was no store to clear.
pub fn clear_remembered(store: Option<&InputStore>) -> chessrate_common::Result<bool> {
    match store {
        Some(store) => {
            store.clear()?;
            Ok(true)
        }
        None => Ok(false),
    }
}
