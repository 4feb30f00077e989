/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{legal_moves, Position};

/// Perform a perft at the specified depth, counting the leaf positions reachable from `position`.
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
/// If you do *not* want to use bulk counting, use [`perft_generic`].
///
/// # Example
/// ```
/// # use gambit::{perft, Position};
/// let pos = Position::default();
/// assert_eq!(perft(&pos, 0), 1);
/// assert_eq!(perft(&pos, 2), 400);
/// ```
#[inline(always)]
pub fn perft(position: &Position, depth: usize) -> u64 {
    perft_generic::<true, false>(position, depth)
}

/// Perform a splitperft at the specified depth, printing `<move>\t<nodes>` for every root move.
///
/// Returns the total, like [`perft`].
#[inline(always)]
pub fn splitperft(position: &Position, depth: usize) -> u64 {
    perft_generic::<true, true>(position, depth)
}

/// Generic version of `perft` that allows you to specify whether to perform bulk counting and splitperft.
///
/// If `BULK` is set to `true`, this will perform bulk counting.
/// If `SPLIT` is set to `true`, this will perform a splitperft.
pub fn perft_generic<const BULK: bool, const SPLIT: bool>(
    position: &Position,
    depth: usize,
) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(position, position.side_to_move());

    // Bulk counting; no need to apply every move just to return 1 for each.
    if BULK && !SPLIT && depth == 1 {
        return moves.len() as u64;
    }

    moves.into_iter().fold(0, |nodes, mv| {
        let new_nodes = position
            .with_move_made(mv)
            .map_or(0, |next| perft_generic::<BULK, false>(&next, depth - 1));

        if SPLIT {
            println!("{mv}\t{new_nodes}");
        }

        nodes + new_nodes
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FEN_KIWIPETE;

    #[test]
    fn test_bulk_matches_full_count() {
        for fen in [FEN_KIWIPETE, "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"] {
            let pos: Position = fen.parse().unwrap();
            for depth in 0..=2 {
                assert_eq!(
                    perft_generic::<true, false>(&pos, depth),
                    perft_generic::<false, false>(&pos, depth),
                    "{fen} at depth {depth}"
                );
            }
        }
    }

    #[test]
    fn test_splitperft_total() {
        let pos = Position::default();
        assert_eq!(splitperft(&pos, 3), 8902);
    }
}
