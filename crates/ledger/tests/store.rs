use chrono::{NaiveDate, NaiveTime};
use ledger::{Amount, Ledger, Movement, MovementKind};

fn movement(kind: MovementKind, id: i64, cents: i64, date: &str, time: &str) -> Movement {
    Movement {
        id,
        kind,
        title: format!("movimiento {id}"),
        date: date.parse().unwrap(),
        time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
        total: Amount::new(cents),
        category: None,
        place: None,
        comment: None,
        created_at: None,
    }
}

fn expense(id: i64, cents: i64, date: &str) -> Movement {
    movement(MovementKind::Expense, id, cents, date, "12:00")
}

fn income(id: i64, cents: i64, date: &str) -> Movement {
    movement(MovementKind::Income, id, cents, date, "12:00")
}

fn assert_sorted(ledger: &Ledger) {
    let keys: Vec<_> = ledger.movements().iter().map(Movement::sort_key).collect();
    for pair in keys.windows(2) {
        assert!(pair[0] >= pair[1], "list out of order: {keys:?}");
    }
}

#[test]
fn initialize_sorts_and_sets_balance() {
    let mut ledger = Ledger::new();
    ledger.initialize(
        Amount::new(100_000),
        vec![
            expense(1, 5_000, "2025-01-10"),
            income(1, 20_000, "2025-01-11"),
            expense(2, 3_000, "2025-01-12"),
        ],
        3,
    );

    assert_eq!(ledger.balance(), Amount::new(100_000));
    assert_eq!(ledger.len(), 3);
    assert_sorted(&ledger);
    assert_eq!(ledger.movements()[0].date, "2025-01-12".parse::<NaiveDate>().unwrap());
}

#[test]
fn insert_updates_balance_and_keeps_order() {
    // The concrete scenario: S/ 1000, then a 50 expense and a 200 income.
    let mut ledger = Ledger::new();
    ledger.initialize(Amount::new(100_000), Vec::new(), 0);

    ledger.insert(expense(1, 5_000, "2025-01-10"));
    ledger.insert(income(1, 20_000, "2025-01-11"));

    assert_eq!(ledger.balance(), Amount::new(115_000));
    assert_eq!(ledger.movements()[0].kind, MovementKind::Income);
    assert_eq!(ledger.movements()[1].kind, MovementKind::Expense);
    assert_sorted(&ledger);
}

#[test]
fn insert_past_dated_movement_lands_in_position() {
    let mut ledger = Ledger::new();
    ledger.initialize(
        Amount::new(0),
        vec![
            income(1, 1_000, "2025-03-01"),
            income(2, 1_000, "2025-02-01"),
        ],
        2,
    );

    // Dated between the two existing rows: must not stay at index 0.
    ledger.insert(expense(9, 1_000, "2025-02-15"));

    let dates: Vec<_> = ledger
        .movements()
        .iter()
        .map(|m| m.date.to_string())
        .collect();
    assert_eq!(dates, ["2025-03-01", "2025-02-15", "2025-02-01"]);
}

#[test]
fn insert_then_remove_is_a_no_op() {
    let mut ledger = Ledger::new();
    ledger.initialize(
        Amount::new(50_000),
        vec![income(1, 10_000, "2025-01-05")],
        1,
    );
    let before_balance = ledger.balance();
    let before_list: Vec<_> = ledger.movements().to_vec();

    for kind in [MovementKind::Expense, MovementKind::Income] {
        ledger.insert(movement(kind, 77, 4_200, "2025-01-06", "08:00"));
        let removed = ledger.remove(kind, 77);
        assert!(removed.is_some());
        assert_eq!(ledger.balance(), before_balance);
        assert_eq!(ledger.movements(), before_list.as_slice());
    }
}

#[test]
fn remove_reverses_the_balance_effect() {
    let mut ledger = Ledger::new();
    ledger.initialize(
        Amount::new(100_000),
        vec![expense(1, 5_000, "2025-01-10"), income(1, 20_000, "2025-01-11")],
        2,
    );

    // Removing an expense gives its amount back...
    ledger.remove(MovementKind::Expense, 1);
    assert_eq!(ledger.balance(), Amount::new(105_000));

    // ...removing an income takes it away.
    ledger.remove(MovementKind::Income, 1);
    assert_eq!(ledger.balance(), Amount::new(85_000));
    assert!(ledger.is_empty());
}

#[test]
fn remove_without_match_is_silent() {
    let mut ledger = Ledger::new();
    ledger.initialize(
        Amount::new(10_000),
        vec![expense(1, 2_000, "2025-01-10")],
        1,
    );

    // Wrong id, and right id under the wrong kind (ids are only unique
    // within their kind partition).
    assert!(ledger.remove(MovementKind::Expense, 99).is_none());
    assert!(ledger.remove(MovementKind::Income, 1).is_none());
    assert_eq!(ledger.balance(), Amount::new(10_000));
    assert_eq!(ledger.len(), 1);
}

#[test]
fn balance_tracks_any_mutation_sequence() {
    let mut ledger = Ledger::new();
    let balance0 = Amount::new(123_456);
    ledger.initialize(balance0, Vec::new(), 0);

    let inserts = [
        income(1, 80_000, "2025-02-01"),
        expense(1, 12_050, "2025-02-02"),
        expense(2, 4_500, "2025-02-02"),
        income(2, 1_999, "2025-02-03"),
        expense(3, 30_000, "2025-01-15"),
    ];
    for m in inserts.clone() {
        ledger.insert(m);
        assert_sorted(&ledger);
    }
    ledger.remove(MovementKind::Expense, 2);
    ledger.remove(MovementKind::Income, 1);
    assert_sorted(&ledger);

    // balance0 + inserted incomes - inserted expenses
    //          - deleted incomes + deleted expenses
    let expected = balance0.cents() + 80_000 - 12_050 - 4_500 + 1_999 - 30_000
        - 80_000
        + 4_500;
    assert_eq!(ledger.balance(), Amount::new(expected));
    assert_eq!(ledger.len(), 3);
}

#[test]
fn merge_page_skips_known_keys_and_resorts() {
    let mut ledger = Ledger::new();
    ledger.initialize(
        Amount::new(0),
        vec![expense(1, 1_000, "2025-03-10"), income(1, 2_000, "2025-03-09")],
        5,
    );
    assert!(ledger.has_more());
    assert_eq!(ledger.next_page(), Some(2));

    ledger.merge_page(
        vec![
            expense(1, 1_000, "2025-03-10"), // already known, skipped
            expense(2, 3_000, "2025-03-08"),
            income(2, 4_000, "2025-03-11"),
        ],
        false,
        None,
    );

    assert_eq!(ledger.len(), 4);
    assert!(!ledger.has_more());
    assert_eq!(ledger.next_page(), None);
    assert_sorted(&ledger);
    // Balance is untouched by paging: the server's snapshot already
    // accounted for these movements.
    assert_eq!(ledger.balance(), Amount::new(0));
}

#[test]
fn initialize_discards_optimistic_adjustments() {
    // Server wins on reload: the optimistic balance is only latency
    // smoothing.
    let mut ledger = Ledger::new();
    ledger.initialize(Amount::new(100_000), Vec::new(), 0);
    ledger.insert(expense(1, 99_999, "2025-01-10"));
    assert_eq!(ledger.balance(), Amount::new(1));

    ledger.initialize(Amount::new(42_000), vec![income(5, 7_000, "2025-01-12")], 1);
    assert_eq!(ledger.balance(), Amount::new(42_000));
    assert_eq!(ledger.len(), 1);
    assert!(!ledger.contains(MovementKind::Expense, 1));
}

#[test]
fn equal_sort_keys_keep_insertion_order() {
    let mut ledger = Ledger::new();
    ledger.initialize(Amount::new(0), vec![expense(1, 1_000, "2025-04-01")], 1);

    // Same date and time as the existing row: the fresh insert goes first.
    ledger.insert(expense(2, 2_000, "2025-04-01"));

    assert_eq!(ledger.movements()[0].id, 2);
    assert_eq!(ledger.movements()[1].id, 1);
}
