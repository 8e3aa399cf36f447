#![allow(dead_code)]

use ormlite::prelude::*;
use rusqlite::{Connection, params_from_iter};

// =============================================================================
// Schema
// =============================================================================

table! {
    pub struct Person {
        #[primary_key]
        pub id: i64,
        pub first_name: String,
        pub last_name: String,
        pub age: i32,
    }
}

table! {
    pub struct TableA {
        #[primary_key]
        pub id: i64,
        pub flag: bool,
    }
}

table! {
    pub struct TableB {
        #[primary_key]
        pub id: i64,
        #[references(TableA, id)]
        pub table_a_id: i64,
        pub name: String,
    }
}

table! {
    pub struct LetterFrequency {
        #[primary_key]
        pub id: i64,
        pub letter: String,
    }
}

table! {
    pub struct Color {
        #[primary_key]
        pub id: i64,
        pub name: String,
    }
}

table! {
    pub struct Size {
        #[primary_key]
        pub id: i64,
        pub label: String,
    }
}

table! {
    pub struct Account {
        #[primary_key]
        pub id: i64,
        pub active: Option<bool>,
        pub status: Status,
    }
}

sql_enum! {
    pub enum Status {
        Pending,
        Active,
        Closed,
    }
}

const DDL: &str = r#"
CREATE TABLE "Person" ("id" INTEGER PRIMARY KEY, "first_name" TEXT NOT NULL, "last_name" TEXT NOT NULL, "age" INTEGER NOT NULL);
CREATE TABLE "TableA" ("id" INTEGER PRIMARY KEY, "flag" INTEGER NOT NULL);
CREATE TABLE "TableB" ("id" INTEGER PRIMARY KEY, "table_a_id" INTEGER NOT NULL REFERENCES "TableA"("id"), "name" TEXT NOT NULL);
CREATE TABLE "LetterFrequency" ("id" INTEGER PRIMARY KEY, "letter" TEXT NOT NULL);
CREATE TABLE "Color" ("id" INTEGER PRIMARY KEY, "name" TEXT NOT NULL);
CREATE TABLE "Size" ("id" INTEGER PRIMARY KEY, "label" TEXT NOT NULL);
CREATE TABLE "Account" ("id" INTEGER PRIMARY KEY, "active" INTEGER, "status" TEXT NOT NULL);
"#;

// =============================================================================
// Database helpers
// =============================================================================

pub fn db() -> OrmLite {
    OrmLite::new(Dialect::sqlite())
}

pub fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    conn.execute_batch(DDL).expect("Failed to create tables");
    conn
}

pub fn insert_people(conn: &Connection, people: &[(&str, &str, i32)]) {
    for (first, last, age) in people {
        conn.execute(
            r#"INSERT INTO "Person" ("first_name", "last_name", "age") VALUES (?1, ?2, ?3)"#,
            (first, last, age),
        )
        .expect("Failed to insert person");
    }
}

pub fn insert_letters(conn: &Connection, letters: &[&str]) {
    for letter in letters {
        conn.execute(
            r#"INSERT INTO "LetterFrequency" ("letter") VALUES (?1)"#,
            [letter],
        )
        .expect("Failed to insert letter");
    }
}

/// First column of every row, as integers.
pub fn ids(conn: &Connection, stmt: &Statement) -> Vec<i64> {
    let mut prepared = conn
        .prepare(&stmt.sql)
        .unwrap_or_else(|e| panic!("Failed to prepare `{}`: {e}", stmt.sql));
    prepared
        .query_map(params_from_iter(stmt.params.iter().map(|p| &p.value)), |row| {
            row.get(0)
        })
        .expect("Failed to run query")
        .collect::<Result<_, _>>()
        .expect("Failed to read rows")
}

/// First column of every row, as text.
pub fn texts(conn: &Connection, stmt: &Statement) -> Vec<String> {
    let mut prepared = conn
        .prepare(&stmt.sql)
        .unwrap_or_else(|e| panic!("Failed to prepare `{}`: {e}", stmt.sql));
    prepared
        .query_map(params_from_iter(stmt.params.iter().map(|p| &p.value)), |row| {
            row.get(0)
        })
        .expect("Failed to run query")
        .collect::<Result<_, _>>()
        .expect("Failed to read rows")
}

/// Number of rows the statement returns.
pub fn row_count(conn: &Connection, stmt: &Statement) -> usize {
    let mut prepared = conn
        .prepare(&stmt.sql)
        .unwrap_or_else(|e| panic!("Failed to prepare `{}`: {e}", stmt.sql));
    let mut rows = prepared
        .query(params_from_iter(stmt.params.iter().map(|p| &p.value)))
        .expect("Failed to run query");
    let mut n = 0;
    while rows.next().expect("Failed to read row").is_some() {
        n += 1;
    }
    n
}

/// The single integer a COUNT statement returns.
pub fn scalar(conn: &Connection, stmt: &Statement) -> i64 {
    conn.query_row(
        &stmt.sql,
        params_from_iter(stmt.params.iter().map(|p| &p.value)),
        |row| row.get(0),
    )
    .unwrap_or_else(|e| panic!("Failed to run `{}`: {e}", stmt.sql))
}
