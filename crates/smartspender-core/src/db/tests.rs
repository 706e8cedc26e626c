//! Database tests

use super::*;
use crate::models::*;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup_user(db: &Database, email: &str) -> User {
    db.create_user(email, "Test User", "hash").unwrap()
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert_eq!(db.count_users().unwrap(), 0);
}

#[test]
fn test_schema_exists() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();

    let result: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('expenses') WHERE name IN ('id', 'user_id', 'amount', 'category', 'description', 'date', 'created_at')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(result, 7, "expenses table should have 7 expected columns");
}

#[test]
fn test_create_and_get_user() {
    let db = Database::in_memory().unwrap();

    let user = db
        .create_user("  Alice@Example.com ", "Alice", "argon-hash")
        .unwrap();
    assert!(user.id > 0);
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.name, "Alice");

    let by_id = db.get_user(user.id).unwrap().unwrap();
    assert_eq!(by_id, user);

    let by_email = db.get_user_by_email("ALICE@example.com").unwrap().unwrap();
    assert_eq!(by_email.id, user.id);

    let (found, hash) = db.get_password_hash("alice@example.com").unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(hash, "argon-hash");

    assert!(db.get_user(9999).unwrap().is_none());
    assert!(db.get_password_hash("nobody@example.com").unwrap().is_none());
}

#[test]
fn test_duplicate_email_is_conflict() {
    let db = Database::in_memory().unwrap();
    setup_user(&db, "bob@example.com");

    let err = db
        .create_user("BOB@example.com", "Other Bob", "hash")
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(db.count_users().unwrap(), 1);
}

#[test]
fn test_insert_expense_defaults() {
    let db = Database::in_memory().unwrap();
    let user = setup_user(&db, "a@example.com");

    let new = NewExpense {
        amount: 4.5,
        category: Category::Food,
        description: None,
        date: None,
    };
    let expense = db.insert_expense(user.id, &new).unwrap();

    assert_eq!(expense.user_id, user.id);
    assert_eq!(expense.amount, 4.5);
    assert_eq!(expense.category, Category::Food);
    assert_eq!(expense.description, "");
    assert_eq!(expense.date, chrono::Utc::now().date_naive());
}

#[test]
fn test_insert_rejects_negative_amount() {
    let db = Database::in_memory().unwrap();
    let user = setup_user(&db, "a@example.com");

    let new = NewExpense::new(-5.0, Category::Food, date("2024-01-01"));
    let err = db.insert_expense(user.id, &new).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
    assert_eq!(db.count_expenses(user.id).unwrap(), 0);
}

#[test]
fn test_insert_and_update_reject_oversized_amount() {
    let db = Database::in_memory().unwrap();
    let user = setup_user(&db, "a@example.com");

    let new = NewExpense::new(1e308, Category::Food, date("2024-01-01"));
    let err = db.insert_expense(user.id, &new).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));

    let stored = db
        .insert_expense(user.id, &NewExpense::new(5.0, Category::Food, date("2024-01-01")))
        .unwrap();
    let update = ExpenseUpdate {
        amount: Some(1e308),
        ..Default::default()
    };
    assert!(db.update_expense(user.id, stored.id, &update).is_err());
    assert_eq!(db.get_expense(user.id, stored.id).unwrap().unwrap().amount, 5.0);
    assert_eq!(db.count_expenses(user.id).unwrap(), 1);
}

#[test]
fn test_list_expenses_order() {
    let db = Database::in_memory().unwrap();
    let user = setup_user(&db, "a@example.com");

    for (amount, d) in [(1.0, "2024-02-01"), (2.0, "2024-01-01"), (3.0, "2024-03-01")] {
        db.insert_expense(user.id, &NewExpense::new(amount, Category::Bills, date(d)))
            .unwrap();
    }

    let newest_first = db.list_expenses(user.id, SortOrder::Descending).unwrap();
    let amounts: Vec<f64> = newest_first.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![3.0, 1.0, 2.0]);

    let oldest_first = db.list_expenses(user.id, SortOrder::Ascending).unwrap();
    let amounts: Vec<f64> = oldest_first.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![2.0, 1.0, 3.0]);
}

#[test]
fn test_expenses_are_owner_scoped() {
    let db = Database::in_memory().unwrap();
    let alice = setup_user(&db, "alice@example.com");
    let bob = setup_user(&db, "bob@example.com");

    let expense = db
        .insert_expense(
            alice.id,
            &NewExpense::new(10.0, Category::Shopping, date("2024-05-05")),
        )
        .unwrap();

    assert!(db.list_expenses(bob.id, SortOrder::Descending).unwrap().is_empty());
    assert!(db.get_expense(bob.id, expense.id).unwrap().is_none());

    let update = ExpenseUpdate {
        amount: Some(99.0),
        ..Default::default()
    };
    assert!(db.update_expense(bob.id, expense.id, &update).unwrap().is_none());
    assert!(!db.delete_expense(bob.id, expense.id).unwrap());

    let still_there = db.get_expense(alice.id, expense.id).unwrap().unwrap();
    assert_eq!(still_there.amount, 10.0);
}

#[test]
fn test_update_expense_partial() {
    let db = Database::in_memory().unwrap();
    let user = setup_user(&db, "a@example.com");
    let expense = db
        .insert_expense(
            user.id,
            &NewExpense::new(10.0, Category::Food, date("2024-05-05")).with_description("Lunch"),
        )
        .unwrap();

    let update = ExpenseUpdate {
        category: Some(Category::Entertainment),
        date: Some(date("2024-06-01")),
        ..Default::default()
    };
    let updated = db.update_expense(user.id, expense.id, &update).unwrap().unwrap();

    assert_eq!(updated.amount, 10.0);
    assert_eq!(updated.description, "Lunch");
    assert_eq!(updated.category, Category::Entertainment);
    assert_eq!(updated.date, date("2024-06-01"));
    assert_eq!(updated.created_at, expense.created_at);
}

#[test]
fn test_update_rejects_negative_amount() {
    let db = Database::in_memory().unwrap();
    let user = setup_user(&db, "a@example.com");
    let expense = db
        .insert_expense(user.id, &NewExpense::new(10.0, Category::Food, date("2024-05-05")))
        .unwrap();

    let update = ExpenseUpdate {
        amount: Some(-1.0),
        ..Default::default()
    };
    assert!(db.update_expense(user.id, expense.id, &update).is_err());
}

#[test]
fn test_delete_expense() {
    let db = Database::in_memory().unwrap();
    let user = setup_user(&db, "a@example.com");
    let expense = db
        .insert_expense(user.id, &NewExpense::new(10.0, Category::Food, date("2024-05-05")))
        .unwrap();

    assert_eq!(db.count_expenses(user.id).unwrap(), 1);
    assert!(db.delete_expense(user.id, expense.id).unwrap());
    assert!(!db.delete_expense(user.id, expense.id).unwrap());
    assert_eq!(db.count_expenses(user.id).unwrap(), 0);
}

#[test]
fn test_reopen_persists_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smartspender.db");
    let path = path.to_str().unwrap();

    let user_id = {
        let db = Database::new(path).unwrap();
        let user = setup_user(&db, "a@example.com");
        db.insert_expense(user.id, &NewExpense::new(3.0, Category::Other, date("2024-01-01")))
            .unwrap();
        user.id
    };

    let db = Database::new(path).unwrap();
    assert_eq!(db.path(), path);
    assert_eq!(db.count_expenses(user_id).unwrap(), 1);
}
