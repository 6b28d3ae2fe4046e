use anyhow::Result;
use weft_model::builders::*;
use weft_model::{Node, Selection, Transaction};
use weft_tables::{
    find_table, from_matrix, move_column, move_row, to_matrix, Axis, Direction, MoveOptions,
    TableError, TableMap, TableRoles,
};

fn roles() -> TableRoles {
    TableRoles::from_schema(schema()).unwrap()
}

fn tr_in(table: Node) -> Transaction {
    let doc = doc(vec![p("before"), table, p("after")]);
    let cursor = pos_of(&doc, "a");
    Transaction::new(doc).with_selection(Selection::cursor(cursor))
}

fn table_of(tr: &Transaction) -> Node {
    tr.doc().child(1).clone()
}

fn assert_valid(tr: &Transaction) {
    let table = table_of(tr);
    let map = TableMap::get(&table);
    assert!(map.problems.is_empty(), "problems: {:?}", map.problems);
    assert!(map.map.iter().all(Option::is_some));
    assert_eq!(&tr.replay().unwrap(), tr.doc());
}

/// Rows 1 and 2 are tied together by "c"
fn five_rows() -> Vec<Node> {
    vec![
        row(vec![td("a"), td("b")]),
        row(vec![td_span("c", 2, 1), td("d")]),
        row(vec![td("e")]),
        row(vec![td("f"), td("g")]),
        row(vec![td("h"), td("i")]),
    ]
}

fn reordered(rows: &[Node], order: &[usize]) -> Node {
    table(order.iter().map(|index| rows[*index].clone()).collect())
}

fn irregular() -> Node {
    table(vec![
        row(vec![td_span("a", 1, 2), td("b")]),
        row(vec![td_span("c", 2, 1), td("d"), td("e")]),
        row(vec![td("f"), td("g")]),
        row(vec![td("h"), td_span("i", 1, 2)]),
    ])
}

#[test]
fn test_round_trip_keeps_map() {
    let tables = [
        table(vec![
            row(vec![td("a"), td("b"), td("c")]),
            row(vec![td("d"), td("e"), td("f")]),
        ]),
        table(vec![
            row(vec![td_span("a", 2, 2), td_span("b", 2, 2)]),
            row(vec![]),
            row(vec![td_span("c", 2, 2), td_span("d", 2, 2)]),
            row(vec![]),
        ]),
        irregular(),
    ];

    for table in tables {
        let rebuilt = from_matrix(&table, &to_matrix(&table)).unwrap();
        assert_eq!(TableMap::get(&rebuilt), TableMap::get(&table));
        assert_eq!(rebuilt, table);
    }
}

#[test]
fn test_moving_within_a_merged_block_is_a_noop() {
    let tr = tr_in(table(vec![
        row(vec![td("a"), td("b")]),
        row(vec![td_span("c", 3, 1), td("d")]),
        row(vec![td("e")]),
        row(vec![td("f")]),
    ]));
    let roles = roles();

    for origin in 1..=3 {
        for target in 1..=3 {
            for options in [MoveOptions::default(), MoveOptions::try_to_fit()] {
                let next = move_row(&tr, &roles, origin, target, options).unwrap();
                assert_eq!(next, tr, "move {origin} -> {target}");
            }
        }
    }
}

#[test]
fn test_moving_back_restores_rows() {
    let tr = tr_in(table(vec![
        row(vec![td("a"), td("1")]),
        row(vec![td("b"), td("2")]),
        row(vec![td("c"), td("3")]),
        row(vec![td("d"), td("4")]),
    ]));
    let roles = roles();

    for origin in 0..4 {
        for target in (0..4).filter(|target| *target != origin) {
            let moved = move_row(&tr, &roles, origin, target, MoveOptions::default()).unwrap();
            assert_ne!(moved.doc(), tr.doc());

            let restored = move_row(&moved, &roles, target, origin, MoveOptions::default()).unwrap();
            assert_eq!(restored.doc(), tr.doc(), "move {origin} <-> {target}");
        }
    }
}

#[test]
fn test_every_successful_move_keeps_table_valid() {
    let tr = tr_in(irregular());
    let roles = roles();
    let directions = [Direction::Backward, Direction::Natural, Direction::Forward];

    for axis in [Axis::Row, Axis::Column] {
        for origin in 0..4 {
            for target in 0..4 {
                for direction in directions {
                    for try_to_fit in [false, true] {
                        let options = MoveOptions {
                            try_to_fit,
                            direction,
                        };
                        let result = match axis {
                            Axis::Row => move_row(&tr, &roles, origin, target, options),
                            Axis::Column => move_column(&tr, &roles, origin, target, options),
                        };
                        match result {
                            Ok(next) => {
                                assert_valid(&next);
                                assert!(find_table(&next, &roles).is_some());
                            }
                            Err(error) => {
                                assert!(!try_to_fit);
                                assert!(matches!(error, TableError::InvalidMovement { .. }));
                            }
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn test_strict_mode_and_try_to_fit() -> Result<()> {
    let tr = tr_in(table(vec![
        row(vec![td("a"), td("b")]),
        row(vec![td_span("c", 2, 1), td("d")]),
        row(vec![td("e")]),
    ]));
    let roles = roles();

    let error = move_row(&tr, &roles, 0, 1, MoveOptions::default()).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Target position is invalid, you can't move the row 0 to 1, the target can't be split. \
         You could use the try_to_fit option."
    );

    let next = move_row(&tr, &roles, 0, 1, MoveOptions::try_to_fit())?;
    assert_valid(&next);
    assert_eq!(
        table_of(&next),
        table(vec![
            row(vec![td_span("c", 2, 1), td("d")]),
            row(vec![td("e")]),
            row(vec![td("a"), td("b")]),
        ])
    );

    // the last index of the block is a valid forward target even in strict mode
    let strict = move_row(&tr, &roles, 0, 2, MoveOptions::default())?;
    assert_eq!(strict.doc(), next.doc());
    Ok(())
}

#[test]
fn test_strict_move_onto_fully_covered_row() -> Result<()> {
    let tr = tr_in(table(vec![
        row(vec![td_span("a", 2, 1), td_span("b", 2, 1)]),
        row(vec![]),
        row(vec![td("c"), td("d")]),
    ]));
    let roles = roles();

    let strict = move_row(&tr, &roles, 2, 1, MoveOptions::default())?;
    assert_valid(&strict);
    assert_eq!(
        table_of(&strict),
        table(vec![
            row(vec![td("c"), td("d")]),
            row(vec![td_span("a", 2, 1), td_span("b", 2, 1)]),
            row(vec![]),
        ])
    );

    let fitted = move_row(&tr, &roles, 2, 1, MoveOptions::try_to_fit())?;
    assert_eq!(fitted.doc(), strict.doc());
    Ok(())
}

#[test]
fn test_direction_overrides() -> Result<()> {
    let rows = five_rows();
    let tr = tr_in(table(rows.clone()));
    let roles = roles();
    let fit = MoveOptions::try_to_fit();

    let backward = move_row(&tr, &roles, 4, 1, fit.with_direction(Direction::Backward))?;
    assert_eq!(table_of(&backward), reordered(&rows, &[0, 4, 1, 2, 3]));

    let forward = move_row(&tr, &roles, 4, 1, fit.with_direction(Direction::Forward))?;
    assert_eq!(table_of(&forward), reordered(&rows, &[0, 1, 2, 4, 3]));

    let natural = move_row(&tr, &roles, 4, 1, fit)?;
    assert_eq!(natural.doc(), backward.doc());

    let natural_forward = move_row(&tr, &roles, 0, 2, fit)?;
    assert_eq!(table_of(&natural_forward), reordered(&rows, &[1, 2, 0, 3, 4]));

    let forced_after = move_row(&tr, &roles, 3, 1, fit.with_direction(Direction::Forward))?;
    assert_eq!(table_of(&forced_after), reordered(&rows, &[0, 1, 2, 3, 4]));

    for moved in [&backward, &forward, &natural_forward] {
        assert_valid(moved);
    }
    Ok(())
}

#[test]
fn test_column_moves_past_a_colspan() -> Result<()> {
    let tr = tr_in(table(vec![
        row(vec![td("a"), td("b"), td("c")]),
        row(vec![td_span("merged", 1, 2), td("plain")]),
        row(vec![td("d"), td("e"), td("f")]),
    ]));

    let next = move_column(&tr, &roles(), 2, 0, MoveOptions::default())?;

    assert_eq!(
        table_of(&next),
        table(vec![
            row(vec![td("c"), td("a"), td("b")]),
            row(vec![td("plain"), td_span("merged", 1, 2)]),
            row(vec![td("f"), td("d"), td("e")]),
        ])
    );
    assert_valid(&next);
    assert_eq!(next.steps().len(), 1);
    Ok(())
}

#[test]
fn test_selection_stays_in_table_after_move() -> Result<()> {
    let tr = tr_in(table(vec![
        row(vec![td("a"), td("b")]),
        row(vec![td("c"), td("d")]),
    ]));
    let roles = roles();

    let once = move_row(&tr, &roles, 0, 1, MoveOptions::default())?;
    let twice = move_column(&once, &roles, 1, 0, MoveOptions::default())?;

    assert!(find_table(&twice, &roles).is_some());
    assert_eq!(twice.time(), tr.time() + 2);
    assert_eq!(
        table_of(&twice),
        table(vec![
            row(vec![td("d"), td("c")]),
            row(vec![td("b"), td("a")]),
        ])
    );
    Ok(())
}
