mod common;

use common::*;
use ormlite::prelude::*;

fn letters() -> rusqlite::Connection {
    let conn = setup_db();
    insert_letters(&conn, &["A", "B", "B", "A", "B", "A", "B"]);
    conn
}

#[test]
fn grouped_counts_distinguish_rows_from_groups() {
    let conn = letters();
    let q = db().from::<LetterFrequency>().group_by(|l| l.letter).unwrap();

    assert_eq!(scalar(&conn, &q.to_count_statement()), 7);
    assert_eq!(scalar(&conn, &q.to_row_count_statement()), 2);
    assert_eq!(row_count(&conn, &q.to_select_statement()), 2);
}

#[test]
fn ungrouped_counts_agree() {
    let conn = letters();
    let q = db()
        .from::<LetterFrequency>()
        .r#where(|l| eq(l.letter, "A"))
        .unwrap();

    let count = q.to_count_statement();
    assert_eq!(
        count.sql,
        r#"SELECT COUNT(*) FROM "LetterFrequency" WHERE "letter" = @0"#
    );
    assert_eq!(scalar(&conn, &count), 3);
    assert_eq!(scalar(&conn, &q.to_row_count_statement()), 3);
}

#[test]
fn count_over_empty_groups_is_zero() {
    let conn = setup_db();
    let q = db().from::<LetterFrequency>().group_by(|l| l.letter).unwrap();
    assert_eq!(scalar(&conn, &q.to_count_statement()), 0);
    assert_eq!(scalar(&conn, &q.to_row_count_statement()), 0);
}

#[test]
fn grouped_counts_respect_having() {
    let conn = letters();
    let q = db()
        .from::<LetterFrequency>()
        .group_by(|l| l.letter)
        .unwrap()
        .having(|_| gt(count_all(), 3_i64))
        .unwrap();

    let count = q.to_count_statement();
    assert!(count.sql.contains(r#"GROUP BY "letter" HAVING COUNT(*) > @0"#), "{}", count.sql);
    assert_eq!(scalar(&conn, &count), 4);
    assert_eq!(scalar(&conn, &q.to_row_count_statement()), 1);
    assert_eq!(row_count(&conn, &q.to_select_statement()), 1);
}

#[test]
fn aggregate_projection_with_having() {
    let conn = letters();
    let q = db()
        .from::<LetterFrequency>()
        .select(|l| (l.letter, alias(count_all(), "Total")))
        .unwrap()
        .group_by(|l| l.letter)
        .unwrap()
        .order_by(|l| l.letter)
        .unwrap();
    let stmt = q.to_select_statement();
    assert_eq!(
        stmt.sql,
        r#"SELECT "letter", COUNT(*) AS "Total" FROM "LetterFrequency" GROUP BY "letter" ORDER BY "letter""#
    );
    assert_eq!(texts(&conn, &stmt), ["A", "B"]);

    let q = q.having(|_| gt(count_all(), 3_i64)).unwrap();
    let stmt = q.to_select_statement();
    assert!(stmt.sql.contains(r#"GROUP BY "letter" HAVING COUNT(*) > @0"#), "{}", stmt.sql);
    assert_eq!(texts(&conn, &stmt), ["B"]);
}

#[test]
fn record_aliases_stay_out_of_group_by() {
    let conn = letters();
    let q = db()
        .from::<LetterFrequency>()
        .select(|l| record((alias(l.letter, "TheLetter"), alias(count_all(), "Total"))))
        .unwrap()
        .group_by(|l| record((alias(l.letter, "TheLetter"),)))
        .unwrap()
        .order_by_descending(|l| l.letter)
        .unwrap();
    let stmt = q.to_select_statement();
    assert_eq!(
        stmt.sql,
        r#"SELECT "letter" AS "TheLetter", COUNT(*) AS "Total" FROM "LetterFrequency" GROUP BY "letter" ORDER BY "letter" DESC"#
    );
    assert_eq!(texts(&conn, &stmt), ["B", "A"]);
}

#[test]
fn grouping_by_a_whole_row_lists_every_column() {
    let conn = letters();
    let q = db().from::<LetterFrequency>().group_by(|l| all(l)).unwrap();
    let stmt = q.to_select_statement();
    assert!(stmt.sql.ends_with(r#"GROUP BY "id", "letter""#), "{}", stmt.sql);
    assert_eq!(scalar(&conn, &q.to_row_count_statement()), 7);
}

#[test]
fn raw_group_and_having() {
    let conn = letters();
    let q = db()
        .from::<LetterFrequency>()
        .select(|l| l.letter)
        .unwrap()
        .group_by_raw(r#""letter""#)
        .having_raw("COUNT(*) < {0}", [RawArg::value(4)])
        .unwrap();
    let stmt = q.to_select_statement();
    assert_eq!(
        stmt.sql,
        r#"SELECT "letter" FROM "LetterFrequency" GROUP BY "letter" HAVING COUNT(*) < @0"#
    );
    assert_eq!(texts(&conn, &stmt), ["A"]);

    let cleared = q.clear_group_by();
    assert!(!cleared.to_select_statement().sql.contains("GROUP BY"));
}

#[test]
fn distinct_projection() {
    let conn = letters();
    let q = db()
        .from::<LetterFrequency>()
        .select_distinct(|l| l.letter)
        .unwrap()
        .order_by(|l| l.letter)
        .unwrap();
    let stmt = q.to_select_statement();
    assert!(stmt.sql.starts_with(r#"SELECT DISTINCT "letter" FROM"#));
    assert_eq!(texts(&conn, &stmt), ["A", "B"]);
}
