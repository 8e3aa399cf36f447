mod common;

use common::*;
use ormlite::prelude::*;

const NAMES: &[&str] = &[
    "50% off",
    "50 off",
    "a_b",
    "axb",
    r"back\slash",
    "backslash",
    "O'Brien",
    r#"say "hi""#,
    "tick`tock",
];

fn seeded() -> rusqlite::Connection {
    let conn = setup_db();
    let people: Vec<(&str, &str, i32)> = NAMES.iter().map(|n| (*n, "-", 1)).collect();
    insert_people(&conn, &people);
    conn
}

fn matching(conn: &rusqlite::Connection, q: Query<Person>) -> Vec<i64> {
    ids(conn, &q.to_select_statement())
}

#[test]
fn contains_renders_upper_like_with_escape() {
    let q = db()
        .from::<Person>()
        .r#where(|p| contains(p.first_name, "50%"))
        .unwrap();
    let stmt = q.to_select_statement();
    assert!(
        stmt.sql
            .ends_with(r#"WHERE UPPER("first_name") LIKE UPPER(@0) ESCAPE '^'"#),
        "{}",
        stmt.sql
    );
    assert_eq!(stmt.params[0].value, Value::Text("%50^%%".into()));
}

#[test]
fn wildcards_in_the_needle_match_literally() {
    let conn = seeded();

    let percent = db()
        .from::<Person>()
        .r#where(|p| contains(p.first_name, "50%"))
        .unwrap();
    assert_eq!(matching(&conn, percent), [1]);

    let underscore = db()
        .from::<Person>()
        .r#where(|p| contains(p.first_name, "a_b"))
        .unwrap();
    assert_eq!(matching(&conn, underscore), [3]);

    let backslash = db()
        .from::<Person>()
        .r#where(|p| starts_with(p.first_name, r"back\"))
        .unwrap();
    assert_eq!(matching(&conn, backslash), [5]);
}

#[test]
fn quotes_and_backticks_are_plain_characters() {
    let conn = seeded();

    let apostrophe = db()
        .from::<Person>()
        .r#where(|p| contains(p.first_name, "'Bri"))
        .unwrap();
    assert!(!apostrophe.to_select_statement().sql.contains("Bri"));
    assert_eq!(matching(&conn, apostrophe), [7]);

    let double = db()
        .from::<Person>()
        .r#where(|p| ends_with(p.first_name, r#""hi""#))
        .unwrap();
    assert_eq!(matching(&conn, double), [8]);

    let backtick = db()
        .from::<Person>()
        .r#where(|p| contains(p.first_name, "`"))
        .unwrap();
    assert_eq!(matching(&conn, backtick), [9]);
}

#[test]
fn needle_matching_ignores_case() {
    let conn = seeded();
    let q = db()
        .from::<Person>()
        .r#where(|p| ends_with(p.first_name, "OFF"))
        .unwrap();
    assert_eq!(matching(&conn, q), [1, 2]);
}

#[test]
fn upper_can_be_left_out() {
    let plain = OrmLite::with_config(Dialect::sqlite(), Config::new().strip_upper_in_like(true));
    let q = plain
        .from::<Person>()
        .r#where(|p| starts_with(p.first_name, "a"))
        .unwrap();
    assert!(q
        .to_select_statement()
        .sql
        .ends_with(r#"WHERE "first_name" LIKE @0 ESCAPE '^'"#));

    let conn = seeded();
    assert_eq!(matching(&conn, q), [3, 4]);
}

#[test]
fn like_passes_the_pattern_through() {
    let conn = seeded();
    let q = db()
        .from::<Person>()
        .r#where(|p| like(p.first_name, "a_b"))
        .unwrap();
    let stmt = q.to_select_statement();
    assert!(stmt.sql.ends_with(r#"WHERE "first_name" LIKE @0"#));
    // `_` keeps its wildcard meaning here
    assert_eq!(ids(&conn, &stmt), [3, 4]);
}
