use criterion::{black_box, criterion_group, criterion_main, Criterion};
use weft_model::builders::*;
use weft_model::{Node, Selection, Transaction};
use weft_tables::{
    add_row_at, from_matrix, move_column, move_row, to_matrix, MoveOptions, TableMap, TableRoles,
};

/// `size x size` table where every third row starts a two-row merge
fn grid(size: usize) -> Node {
    let rows = (0..size)
        .map(|r| {
            let cells = (0..size)
                .filter(|c| !(r % 3 == 1 && *c == 0))
                .map(|c| {
                    let text = format!("r{r}c{c}");
                    if r % 3 == 0 && c == 0 && r + 1 < size {
                        td_span(&text, 2, 1)
                    } else {
                        td(&text)
                    }
                })
                .collect();
            row(cells)
        })
        .collect();
    table(rows)
}

fn transaction(size: usize) -> Transaction {
    let doc = doc(vec![grid(size)]);
    let cursor = pos_of(&doc, "r0c0");
    Transaction::new(doc).with_selection(Selection::cursor(cursor))
}

fn table_map(c: &mut Criterion) {
    let table = grid(30);

    c.bench_function("table_map_30x30", |b| b.iter(|| TableMap::get(black_box(&table))));
}

fn matrix_round_trip(c: &mut Criterion) {
    let table = grid(30);

    c.bench_function("matrix_round_trip_30x30", |b| {
        b.iter(|| from_matrix(&table, &to_matrix(black_box(&table))))
    });
}

fn moves(c: &mut Criterion) {
    let tr = transaction(30);
    let roles = TableRoles::from_schema(schema()).unwrap();
    let options = MoveOptions::try_to_fit();

    c.bench_function("move_row_30x30", |b| {
        b.iter(|| move_row(black_box(&tr), &roles, 0, 28, options))
    });

    c.bench_function("move_column_30x30", |b| {
        b.iter(|| move_column(black_box(&tr), &roles, 29, 0, options))
    });
}

fn insertion(c: &mut Criterion) {
    let tr = transaction(30);
    let roles = TableRoles::from_schema(schema()).unwrap();

    c.bench_function("add_row_30x30", |b| {
        b.iter(|| add_row_at(black_box(&tr), &roles, 15, true))
    });
}

criterion_group!(benches, table_map, matrix_round_trip, moves, insertion);
criterion_main!(benches);
