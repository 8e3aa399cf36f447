mod common;

use common::*;
use ormlite::prelude::*;

fn people(conn: &rusqlite::Connection) {
    insert_people(
        conn,
        &[
            ("Ann", "Archer", 23),
            ("Bob", "Baker", 41),
            ("Cid", "Carter", 57),
            ("Dee", "Dyer", 35),
        ],
    );
}

#[test]
fn where_then_and_parenthesizes_both_sides() {
    let q = db()
        .from::<Person>()
        .r#where(|p| gt(p.age, 30))
        .unwrap()
        .and(|p| lt(p.age, 50))
        .unwrap();
    let stmt = q.to_select_statement();
    assert!(
        stmt.sql.ends_with(r#"WHERE ("age" > @0) AND ("age" < @1)"#),
        "{}",
        stmt.sql
    );

    let conn = setup_db();
    people(&conn);
    assert_eq!(ids(&conn, &stmt), [2, 4]);
}

#[test]
fn where_then_or_parenthesizes_both_sides() {
    let q = db()
        .from::<Person>()
        .r#where(|p| lt(p.age, 25))
        .unwrap()
        .or(|p| gt(p.age, 50))
        .unwrap();
    let stmt = q.to_select_statement();
    assert!(stmt.sql.ends_with(r#"WHERE ("age" < @0) OR ("age" > @1)"#));

    let conn = setup_db();
    people(&conn);
    assert_eq!(ids(&conn, &stmt), [1, 3]);
}

#[test]
fn where_replaces_and_clear_where_removes_the_filter() {
    let q = db()
        .from::<Person>()
        .r#where(|p| gt(p.age, 30))
        .unwrap()
        .r#where(|p| eq(p.first_name, "Ann"))
        .unwrap();
    let stmt = q.to_select_statement();
    // names stay sequential across resets
    assert!(stmt.sql.ends_with(r#"WHERE "first_name" = @1"#));
    assert_eq!(stmt.params.len(), 1);

    let cleared = q.clear_where().and(|p| eq(p.id, 2)).unwrap();
    assert!(cleared.to_select_statement().sql.ends_with(r#"WHERE "id" = @2"#));
}

#[test]
fn negated_bool_column_compares_with_false() {
    let conn = setup_db();
    conn.execute_batch(r#"INSERT INTO "TableA" ("id", "flag") VALUES (1, 0), (2, 1);"#)
        .unwrap();

    let negated = db().from::<TableA>().r#where(|a| !a.flag).unwrap();
    let stmt = negated.to_select_statement();
    assert!(!stmt.sql.contains("NOT"), "{}", stmt.sql);
    assert!(stmt.sql.ends_with(r#"WHERE "flag" = 0"#));
    assert_eq!(ids(&conn, &stmt), [1]);

    let explicit = db().from::<TableA>().r#where(|a| eq(a.flag, false)).unwrap();
    assert_eq!(explicit.to_select_statement().sql, stmt.sql);

    let plain = db().from::<TableA>().r#where(|a| a.flag).unwrap();
    assert_eq!(ids(&conn, &plain.to_select_statement()), [2]);
}

#[test]
fn negated_bool_filter_holds_around_joins() {
    let conn = setup_db();
    conn.execute_batch(
        r#"
        INSERT INTO "TableA" ("id", "flag") VALUES (1, 0), (2, 1);
        INSERT INTO "TableB" ("id", "table_a_id", "name") VALUES (10, 1, 'x'), (20, 2, 'y');
        "#,
    )
    .unwrap();

    let before = db()
        .from::<TableA>()
        .r#where(|a| !a.flag)
        .unwrap()
        .join::<TableB>()
        .unwrap();
    let after = db()
        .from::<TableA>()
        .join::<TableB>()
        .unwrap()
        .r#where(|a| !a.flag)
        .unwrap();

    for q in [before, after] {
        let stmt = q.to_select_statement();
        assert!(!stmt.sql.contains("NOT"), "{}", stmt.sql);
        assert_eq!(ids(&conn, &stmt), [1]);
    }
}

#[test]
fn empty_membership_matches_nothing_without_failing() {
    let conn = setup_db();
    people(&conn);

    let none: Vec<i64> = Vec::new();
    let q = db().from::<Person>().r#where(|p| in_list(p.id, none.clone())).unwrap();
    let stmt = q.to_select_statement();
    assert!(stmt.sql.ends_with(r#"WHERE "id" IN (NULL)"#));
    assert!(ids(&conn, &stmt).is_empty());

    let q = db().from::<Person>().r#where(|p| not_in_list(p.id, none)).unwrap();
    assert_eq!(ids(&conn, &q.to_select_statement()).len(), 4);
}

#[test]
fn membership_binds_each_element() {
    let conn = setup_db();
    people(&conn);

    let q = db()
        .from::<Person>()
        .r#where(|p| in_list(p.first_name, ["Bob".to_owned(), "Dee".to_owned()]))
        .unwrap();
    let stmt = q.to_select_statement();
    assert!(stmt.sql.ends_with(r#"WHERE "first_name" IN (@0, @1)"#));
    assert_eq!(stmt.params.len(), 2);
    assert_eq!(ids(&conn, &stmt), [2, 4]);
}

#[test]
fn null_comparisons_become_is_null() {
    let q = db()
        .from::<Account>()
        .r#where(|a| eq(a.active, None::<bool>))
        .unwrap();
    assert!(q.to_select_statement().sql.ends_with(r#"WHERE "active" IS NULL"#));

    let q = db()
        .from::<Account>()
        .r#where(|a| ne(a.active, None::<bool>))
        .unwrap();
    assert!(q.to_select_statement().sql.ends_with(r#"WHERE "active" IS NOT NULL"#));
}

#[test]
fn coalesced_nullable_bool_keeps_only_true_rows() {
    let conn = setup_db();
    conn.execute_batch(
        r#"INSERT INTO "Account" ("id", "active", "status") VALUES (1, 1, 'Active'), (2, 0, 'Closed'), (3, NULL, 'Pending');"#,
    )
    .unwrap();

    let q = db()
        .from::<Account>()
        .r#where(|a| coalesce(a.active, Some(false)))
        .unwrap();
    assert_eq!(ids(&conn, &q.to_select_statement()), [1]);
}

#[test]
fn constant_operand_may_sit_on_either_side() {
    let conn = setup_db();
    people(&conn);

    let left = db().from::<Person>().r#where(|p| lte(40, p.age)).unwrap();
    let right = db().from::<Person>().r#where(|p| gte(p.age, 40)).unwrap();
    assert!(left.to_select_statement().sql.ends_with(r#"WHERE @0 <= "age""#));
    assert_eq!(
        ids(&conn, &left.to_select_statement()),
        ids(&conn, &right.to_select_statement())
    );
}

#[test]
fn enums_bind_by_name_or_ordinal() {
    let q = db()
        .from::<Account>()
        .r#where(|a| eq(a.status, Status::Closed))
        .unwrap();
    let stmt = q.to_select_statement();
    assert_eq!(stmt.params[0].value, Value::Text("Closed".into()));

    let by_ordinal = OrmLite::with_config(
        Dialect::sqlite(),
        Config::new().enum_encoding(EnumEncoding::Integer),
    );
    let q = by_ordinal
        .from::<Account>()
        .r#where(|a| eq(a.status, Status::Closed))
        .unwrap();
    assert_eq!(q.to_select_statement().params[0].value, Value::Integer(2));
}

#[test]
fn unknown_raw_argument_is_rejected() {
    let err = db()
        .from::<Person>()
        .where_raw(r#""age" > {1}"#, [RawArg::value(30)])
        .unwrap_err();
    assert_eq!(
        err,
        ormlite::error::OrmLiteError::InvalidRawSql {
            index: 1,
            supplied: 1
        }
    );
}

#[test]
fn raw_filters_bind_their_arguments() {
    let conn = setup_db();
    people(&conn);

    let q = db()
        .from::<Person>()
        .where_raw(
            r#""age" > {0} AND "first_name" IN ({1})"#,
            [RawArg::value(30), RawArg::list(["Bob", "Cid", "Ann"])],
        )
        .unwrap();
    let stmt = q.to_select_statement();
    assert!(
        stmt.sql
            .ends_with(r#"WHERE "age" > @0 AND "first_name" IN (@1, @2, @3)"#),
        "{}",
        stmt.sql
    );
    assert_eq!(ids(&conn, &stmt), [2, 3]);
}
