mod common;

use common::*;
use ormlite::error::OrmLiteError;
use ormlite::prelude::*;

fn linked(conn: &rusqlite::Connection) {
    conn.execute_batch(
        r#"
        INSERT INTO "TableA" ("id", "flag") VALUES (1, 0), (2, 1), (3, 0);
        INSERT INTO "TableB" ("id", "table_a_id", "name") VALUES (10, 1, 'x'), (20, 2, 'y'), (30, 1, 'z');
        "#,
    )
    .unwrap();
}

fn palette(conn: &rusqlite::Connection) {
    conn.execute_batch(
        r#"
        INSERT INTO "Color" ("id", "name") VALUES (1, 'red'), (2, 'green'), (3, 'blue');
        INSERT INTO "Size" ("id", "label") VALUES (1, 'S'), (2, 'M');
        "#,
    )
    .unwrap();
}

#[test]
fn join_infers_the_foreign_key_from_either_side() {
    let from_child = db().from::<TableB>().join::<TableA>().unwrap();
    let from_parent = db().from::<TableA>().join::<TableB>().unwrap();

    let on = r#"ON "TableB"."table_a_id" = "TableA"."id""#;
    assert!(from_child.to_select_statement().sql.contains(on));
    assert!(from_parent.to_select_statement().sql.contains(on));
}

#[test]
fn filter_on_joined_table_qualifies_columns() {
    let conn = setup_db();
    linked(&conn);

    let q = db()
        .from::<TableB>()
        .join::<TableA>()
        .unwrap()
        .where_on::<TableA, _>(|a| a.flag)
        .unwrap();
    let stmt = q.to_select_statement();
    assert!(
        stmt.sql.starts_with(r#"SELECT "TableB"."id", "TableB"."table_a_id", "TableB"."name", "TableA"."id" AS "TableAid", "TableA"."flag""#),
        "{}",
        stmt.sql
    );
    assert_eq!(ids(&conn, &stmt), [20]);
}

#[test]
fn join_without_linking_key_needs_a_predicate() {
    let err = db().from::<Color>().join::<Size>().unwrap_err();
    assert_eq!(
        err,
        OrmLiteError::MissingForeignKey {
            from: "Color".into(),
            to: "Size".into()
        }
    );
}

#[test]
fn columns_of_an_unjoined_table_are_rejected() {
    let err = db()
        .from::<TableA>()
        .where_on::<TableB, _>(|b| eq(b.name, "x"))
        .unwrap_err();
    assert_eq!(err, OrmLiteError::UnknownTable("TableB".into()));

    let err = db()
        .from::<TableA>()
        .order_by_on::<TableB, _>(|b| b.name)
        .unwrap_err();
    assert_eq!(err, OrmLiteError::UnknownTable("TableB".into()));

    let joined = db()
        .from::<TableA>()
        .join::<TableB>()
        .unwrap()
        .where_on::<TableB, _>(|b| eq(b.name, "x"));
    assert!(joined.is_ok());
}

#[test]
fn explicit_predicate_joins_unrelated_tables() {
    let conn = setup_db();
    insert_people(&conn, &[("Ann", "Archer", 23), ("Bob", "Baker", 41)]);
    insert_letters(&conn, &["Ann", "Ann", "Zed"]);

    let q = db()
        .from::<Person>()
        .join_on::<LetterFrequency, _>(|p, l| eq(p.first_name, l.letter))
        .unwrap();
    let stmt = q.to_select_statement();
    assert!(stmt.sql.contains(
        r#"INNER JOIN "LetterFrequency" ON "Person"."first_name" = "LetterFrequency"."letter""#
    ));
    assert_eq!(ids(&conn, &stmt), [1, 1]);
}

#[test]
fn cross_join_returns_the_full_product() {
    let conn = setup_db();
    palette(&conn);

    let q = db().from::<Color>().cross_join::<Size>().unwrap();
    let stmt = q.to_select_statement();
    assert!(stmt.sql.contains(r#"FROM "Color" CROSS JOIN "Size""#));
    assert!(!stmt.sql.contains(" ON "));
    assert_eq!(row_count(&conn, &stmt), 6);

    let q = q.r#where(|c| eq(c.name, "red")).unwrap();
    assert_eq!(row_count(&conn, &q.to_select_statement()), 2);
}

#[test]
fn cross_join_predicate_moves_into_where() {
    let conn = setup_db();
    palette(&conn);

    let q = db()
        .from::<Color>()
        .cross_join_on::<Size, _>(|c, s| eq(c.id, s.id))
        .unwrap()
        .r#where(|c| ne(c.name, "green"))
        .unwrap();
    let stmt = q.to_select_statement();
    assert!(!stmt.sql.contains(" ON "), "{}", stmt.sql);
    assert!(stmt.sql.contains(r#"WHERE ("Color"."id" = "Size"."id") AND ("Color"."name" <> @0)"#));
    assert_eq!(ids(&conn, &stmt), [1]);
}

#[test]
fn left_join_keeps_unmatched_rows() {
    let conn = setup_db();
    linked(&conn);

    let q = db().from::<TableA>().left_join::<TableB>().unwrap();
    let stmt = q.to_select_statement();
    assert!(stmt.sql.contains(r#"LEFT JOIN "TableB" ON"#));
    assert_eq!(row_count(&conn, &stmt), 4);

    let orphans = q.where_on::<TableB, _>(|b| is_null(b.id)).unwrap();
    assert_eq!(ids(&conn, &orphans.to_select_statement()), [3]);
}

#[test]
fn aliased_root_qualifies_every_column() {
    let conn = setup_db();
    insert_people(&conn, &[("Ann", "Archer", 23)]);

    let q = db().from_as::<Person>("p").r#where(|p| gt(p.age, 18)).unwrap();
    let stmt = q.to_select_statement();
    assert_eq!(
        stmt.sql,
        r#"SELECT "p"."id", "p"."first_name", "p"."last_name", "p"."age" FROM "Person" AS "p" WHERE "p"."age" > @0"#
    );
    assert_eq!(ids(&conn, &stmt), [1]);
}

#[test]
fn self_join_requires_an_alias() {
    let err = db()
        .from::<Person>()
        .join_on::<Person, _>(|a, b| eq(a.id, b.id))
        .unwrap_err();
    assert_eq!(err, OrmLiteError::AmbiguousTable("Person".into()));
}

#[test]
fn aliased_self_join_reaches_both_registrations() {
    let conn = setup_db();
    insert_people(
        &conn,
        &[("Ann", "Archer", 23), ("Bob", "Baker", 41), ("Cid", "Carter", 57)],
    );

    let q = db()
        .from::<Person>()
        .join_with_on::<Person, Person, _>(Join::new().alias("older"), |a, b| lt(a.age, b.age))
        .unwrap();
    let stmt = q.to_select_statement();
    assert!(
        stmt.sql
            .contains(r#"INNER JOIN "Person" AS "older" ON "Person"."age" < "older"."age""#),
        "{}",
        stmt.sql
    );
    assert!(stmt.sql.contains(r#""older"."id" AS "olderid""#));
    assert_eq!(row_count(&conn, &stmt), 3);

    let older = q.aliased::<Person>("older");
    let q = q.and(move |_| eq(older.first_name, "Cid")).unwrap();
    assert_eq!(ids(&conn, &q.to_select_statement()), [1, 2]);

    // the bare type no longer names a single registration
    let err = q.where_on::<Person, _>(|p| gt(p.age, 1)).unwrap_err();
    assert_eq!(err, OrmLiteError::AmbiguousTable("Person".into()));
}

#[test]
fn custom_join_text_is_built_from_helpers() {
    let conn = setup_db();
    linked(&conn);

    let q = db().from::<TableB>();
    let on = format!(
        "INNER JOIN {} ON {} = {}",
        q.table::<TableA>(),
        q.column::<TableA, _>(|a| a.id, true).unwrap(),
        q.column::<TableB, _>(|b| b.table_a_id, true).unwrap(),
    );
    assert_eq!(on, r#"INNER JOIN "TableA" ON "TableA"."id" = "TableB"."table_a_id""#);
    assert_eq!(q.column::<TableB, _>(|b| b.name, false).unwrap(), r#""name""#);

    let q = q
        .custom_join_table::<TableA>(None, on)
        .unwrap()
        .where_on::<TableA, _>(|a| a.flag)
        .unwrap();
    let stmt = q.to_select_statement();
    assert!(stmt.sql.contains(r#"FROM "TableB" INNER JOIN "TableA" ON "TableA"."id""#));
    assert_eq!(ids(&conn, &stmt), [20]);
}

#[test]
fn bare_custom_join_is_appended_verbatim() {
    let conn = setup_db();
    linked(&conn);

    let prefixed = OrmLite::with_config(
        Dialect::sqlite(),
        Config::new().include_table_prefixes(true),
    );
    let q = prefixed
        .from::<TableB>()
        .custom_join(r#"INNER JOIN "TableA" ON "TableA"."id" = "TableB"."table_a_id""#)
        .select(|b| b.id)
        .unwrap()
        .where_raw(r#""TableA"."flag" = {0}"#, [RawArg::value(false)])
        .unwrap();
    let stmt = q.to_select_statement();
    assert_eq!(
        stmt.sql,
        r#"SELECT "TableB"."id" FROM "TableB" INNER JOIN "TableA" ON "TableA"."id" = "TableB"."table_a_id" WHERE "TableA"."flag" = @0"#
    );
    assert_eq!(ids(&conn, &stmt), [10, 30]);
}
