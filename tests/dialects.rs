mod common;

use common::*;
use ormlite::error::OrmLiteError;
use ormlite::prelude::*;
use ormlite::BitOp;

fn adults(dialect: Dialect) -> Statement {
    OrmLite::new(dialect)
        .from::<Person>()
        .select(|p| (p.id, p.first_name))
        .unwrap()
        .r#where(|p| gt(p.age, 18))
        .unwrap()
        .and(|p| ne(p.last_name, "Smith"))
        .unwrap()
        .to_select_statement()
}

#[test]
fn placeholders_and_quoting_per_dialect() {
    let cases = [
        (
            Dialect::sqlite(),
            r#"SELECT "id", "first_name" FROM "Person" WHERE ("age" > @0) AND ("last_name" <> @1)"#,
        ),
        (
            Dialect::postgres(),
            r#"SELECT "id", "first_name" FROM "Person" WHERE ("age" > $1) AND ("last_name" <> $2)"#,
        ),
        (
            Dialect::mysql(),
            "SELECT `id`, `first_name` FROM `Person` WHERE (`age` > ?) AND (`last_name` <> ?)",
        ),
        (
            Dialect::sql_server(),
            "SELECT [id], [first_name] FROM [Person] WHERE ([age] > @0) AND ([last_name] <> @1)",
        ),
        (
            Dialect::oracle(),
            r#"SELECT "id", "first_name" FROM "Person" WHERE ("age" > :0) AND ("last_name" <> :1)"#,
        ),
    ];
    for (dialect, sql) in cases {
        let stmt = adults(dialect);
        assert_eq!(stmt.sql, sql, "{:?}", dialect.kind);
        assert_eq!(stmt.params.len(), 2);
    }
}

#[test]
fn boolean_literals_per_dialect() {
    let flagged = |dialect: Dialect| {
        OrmLite::new(dialect)
            .from::<TableA>()
            .r#where(|a| !a.flag)
            .unwrap()
            .to_select_statement()
            .sql
    };
    assert!(flagged(Dialect::sqlite()).ends_with(r#"WHERE "flag" = 0"#));
    assert!(flagged(Dialect::postgres()).ends_with(r#"WHERE "flag" = false"#));
}

#[test]
fn unsupported_bitwise_operator_fails_at_build_time() {
    let err = db()
        .from::<Person>()
        .r#where(|p| eq(p.id ^ 1_i64, 3_i64))
        .unwrap_err();
    assert_eq!(
        err,
        OrmLiteError::UnsupportedOperator {
            op: BitOp::Xor,
            dialect: DialectKind::SQLite,
        }
    );

    let pg = OrmLite::new(Dialect::postgres())
        .from::<Person>()
        .r#where(|p| eq(p.id ^ 1_i64, 3_i64))
        .unwrap();
    assert!(pg.to_select_statement().sql.ends_with(r#"WHERE ("id" # $1) = $2"#));
}

#[test]
fn bitwise_and_runs_on_sqlite() {
    let conn = setup_db();
    insert_people(
        &conn,
        &[("Ann", "A", 1), ("Bob", "B", 2), ("Cid", "C", 3), ("Dee", "D", 4)],
    );
    let q = db()
        .from::<Person>()
        .r#where(|p| eq(p.id & 1_i64, 1_i64))
        .unwrap();
    let stmt = q.to_select_statement();
    assert!(stmt.sql.ends_with(r#"WHERE ("id" & @0) = @1"#), "{}", stmt.sql);
    assert_eq!(ids(&conn, &stmt), [1, 3]);

    let oracle = OrmLite::new(Dialect::oracle())
        .from::<Person>()
        .r#where(|p| eq(p.id & 1_i64, 1_i64))
        .unwrap();
    assert!(oracle
        .to_select_statement()
        .sql
        .ends_with(r#"WHERE BITAND("id", :0) = :1"#));
}

#[test]
fn bitwise_or_and_shifts_run_on_sqlite() {
    let conn = setup_db();
    insert_people(
        &conn,
        &[("Ann", "A", 1), ("Bob", "B", 2), ("Cid", "C", 3), ("Dee", "D", 4)],
    );

    let or = db()
        .from::<Person>()
        .r#where(|p| eq(p.id | 1_i64, 3_i64))
        .unwrap()
        .to_select_statement();
    assert!(or.sql.ends_with(r#"WHERE ("id" | @0) = @1"#), "{}", or.sql);
    assert_eq!(ids(&conn, &or), [2, 3]);

    let shl = db()
        .from::<Person>()
        .r#where(|p| eq(p.id << 1_i64, 4_i64))
        .unwrap()
        .to_select_statement();
    assert!(shl.sql.ends_with(r#"WHERE ("id" << @0) = @1"#), "{}", shl.sql);
    assert_eq!(ids(&conn, &shl), [2]);

    let shr = db()
        .from::<Person>()
        .r#where(|p| eq(p.id >> 1_i64, 1_i64))
        .unwrap()
        .to_select_statement();
    assert!(shr.sql.ends_with(r#"WHERE ("id" >> @0) = @1"#), "{}", shr.sql);
    assert_eq!(ids(&conn, &shr), [2, 3]);
}

#[test]
fn sql_server_rejects_shifts() {
    let mssql = Dialect::sql_server();
    assert!(!mssql.supports(BitOp::Shl));
    assert!(!mssql.supports(BitOp::Shr));
    assert!(mssql.supports(BitOp::Or));

    let shifted = |f: fn(Col<i64>) -> Expr<i64>, op: BitOp| {
        let err = OrmLite::new(Dialect::sql_server())
            .from::<Person>()
            .r#where(move |p| eq(f(p.id), 2_i64))
            .unwrap_err();
        assert_eq!(
            err,
            OrmLiteError::UnsupportedOperator {
                op,
                dialect: DialectKind::SqlServer,
            }
        );
    };
    shifted(|id| id << 1_i64, BitOp::Shl);
    shifted(|id| id >> 1_i64, BitOp::Shr);

    let or = OrmLite::new(Dialect::sql_server())
        .from::<Person>()
        .r#where(|p| eq(p.id | 1_i64, 3_i64))
        .unwrap();
    assert!(or.to_select_statement().sql.ends_with("WHERE ([id] | @0) = @1"));
}

#[test]
fn substring_per_dialect() {
    let prefix = |dialect: Dialect| {
        OrmLite::new(dialect)
            .from::<Person>()
            .select(|p| substring(p.first_name, 0, Some(2)))
            .unwrap()
            .to_select_statement()
            .sql
    };
    assert_eq!(prefix(Dialect::sqlite()), r#"SELECT substr("first_name", 1, 2) FROM "Person""#);
    assert_eq!(
        prefix(Dialect::postgres()),
        r#"SELECT substring("first_name" FROM 1 FOR 2) FROM "Person""#
    );
    assert_eq!(prefix(Dialect::mysql()), "SELECT substring(`first_name`, 1, 2) FROM `Person`");

    let rest = OrmLite::new(Dialect::mysql())
        .from::<Person>()
        .select(|p| substring(p.first_name, 1, None))
        .unwrap();
    assert_eq!(
        rest.to_select_statement().sql,
        "SELECT substring(`first_name`, 2, CHAR_LENGTH(`first_name`)) FROM `Person`"
    );

    let conn = setup_db();
    insert_people(&conn, &[("Annabel", "A", 1)]);
    let tail = db()
        .from::<Person>()
        .select(|p| substring(p.first_name, 4, None))
        .unwrap();
    assert_eq!(texts(&conn, &tail.to_select_statement()), ["bel"]);
}

#[test]
fn schema_and_explicit_table_names() {
    let q = db().from::<Team>().r#where(|t| eq(t.name, "Reds")).unwrap();
    assert_eq!(
        q.to_select_statement().sql,
        r#"SELECT "id", "team_name" FROM "sports"."teams" WHERE "team_name" = @0"#
    );
}

table! {
    #[named("teams")]
    #[schema("sports")]
    pub struct Team {
        #[primary_key]
        pub id: i64,
        #[named("team_name")]
        pub name: String,
    }
}
