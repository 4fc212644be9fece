use proptest::prelude::*;

use risk_territory_engine::board::Board;
use risk_territory_engine::continent::Continent;
use risk_territory_engine::country::Country;
use risk_territory_engine::name::normalize_name;

fn board_with(countries: u32) -> Board {
    let mut board = Board::new();
    board.add_continent(Continent::new(1, "Pangaea", 1)).unwrap();
    board
        .add_countries((1..=countries).map(|id| Country::new(id, &format!("Country {id}"), 1, "Pangaea")))
        .unwrap();
    board
}

proptest! {
    #[test]
    fn normalization_is_idempotent(name in "\\PC*") {
        let once = normalize_name(&name);
        prop_assert_eq!(normalize_name(&once), once.clone());
        prop_assert!(!once.chars().any(char::is_whitespace));
    }

    #[test]
    fn lookup_survives_spacing_and_case(pad in "[ \t]{0,3}", id in 1u32..=6) {
        let board = board_with(6);
        let query = format!("{pad}COUNTRY{pad}{id}{pad}");
        prop_assert_eq!(board.country_id_by_name(&query), Some(id));
    }

    #[test]
    fn borders_stay_symmetric(
        edits in prop::collection::vec((1u32..=8, 1u32..=8, any::<bool>()), 0..40)
    ) {
        let mut board = board_with(8);
        for (a, b, add) in edits {
            if a == b {
                continue;
            }
            if add {
                board.add_border(a, b).unwrap();
            } else {
                board
                    .remove_border_by_name(&format!("Country {a}"), &format!("Country {b}"))
                    .unwrap();
            }
            prop_assert_eq!(board.are_adjacent(a, b), add);
            prop_assert_eq!(board.are_adjacent(b, a), add);
        }
        prop_assert!(board.check_invariants().is_ok());
    }

    #[test]
    fn connected_ring_stays_valid_after_extra_chords(
        size in 3u32..12,
        chords in prop::collection::vec((1u32..12, 1u32..12), 0..10)
    ) {
        let mut board = board_with(size);
        for id in 1..=size {
            board.add_border(id, id % size + 1).unwrap();
        }
        for (a, b) in chords {
            if a != b && a <= size && b <= size {
                board.add_border(a, b).unwrap();
            }
        }
        prop_assert!(board.is_map_valid());
    }
}
