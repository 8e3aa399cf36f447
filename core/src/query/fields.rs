//! Field names given as strings, resolved against the join graph.

use crate::condition::Scalar;
use crate::error::{OrmLiteError, Result};
use crate::join::JoinGraph;
use crate::schema::ColumnDef;

use super::{OrderItem, SelectItem};

/// Slots whose table is named `name`, by alias or table name.
fn tables_named<'a>(graph: &'a JoinGraph, name: &'a str) -> impl Iterator<Item = usize> + 'a {
    graph
        .tables()
        .iter()
        .enumerate()
        .filter(move |(_, t)| match &t.alias {
            Some(alias) => alias.eq_ignore_ascii_case(name),
            None => t.def.matches(name),
        })
        .map(|(slot, _)| slot)
}

/// First column called `name`, searching the root first and then each
/// joined table in order.
fn find_anywhere(graph: &JoinGraph, name: &str) -> Option<(usize, &'static ColumnDef)> {
    graph
        .tables()
        .iter()
        .enumerate()
        .find_map(|(slot, t)| t.def.find_column(name).map(|c| (slot, c)))
}

/// Resolves `Field`, `Table.Field` or `"Table"."Field"`.
fn resolve(graph: &JoinGraph, name: &str) -> Option<(usize, &'static ColumnDef)> {
    let name = unquote(name);
    match name.split_once('.') {
        Some((table, field)) => {
            let (table, field) = (unquote(table), unquote(field));
            tables_named(graph, table).find_map(|slot| {
                graph
                    .table(slot)
                    .and_then(|t| t.def.find_column(field))
                    .map(|c| (slot, c))
            })
        }
        None => find_anywhere(graph, name),
    }
}

fn unquote(name: &str) -> &str {
    let name = name.trim();
    let bytes = name.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(b'"'), Some(b'"')) | (Some(b'`'), Some(b'`')) | (Some(b'['), Some(b']'))
            if name.len() >= 2 =>
        {
            &name[1..name.len() - 1]
        }
        _ => name,
    }
}

/// SELECT list from field names. Unknown names are dropped.
pub(crate) fn select_items<S: AsRef<str>>(graph: &JoinGraph, names: &[S]) -> Vec<SelectItem> {
    let mut items = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }

        if let Some(table) = name.strip_suffix(".*") {
            let table = unquote(table);
            if let Some(slot) = tables_named(graph, table).next()
                && let Some(t) = graph.table(slot)
            {
                items.extend(t.def.columns.iter().map(|c| SelectItem {
                    expr: Scalar::column(slot, c),
                    alias: None,
                }));
            }
            continue;
        }

        if let Some((slot, column)) = resolve(graph, name) {
            items.push(SelectItem {
                expr: Scalar::column(slot, column),
                alias: None,
            });
        }
    }
    items
}

/// ORDER BY keys from field names.
///
/// `-Field` and `Field DESC` sort descending, `Field ASC` ascending.
/// `Random` sorts randomly. Unknown names are an error.
pub(crate) fn order_items<S: AsRef<str>>(graph: &JoinGraph, names: &[S]) -> Result<Vec<OrderItem>> {
    let mut items = Vec::with_capacity(names.len());
    for name in names {
        let mut name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }

        let mut descending = false;
        if let Some(rest) = name.strip_prefix('-') {
            descending = true;
            name = rest.trim_start();
        }
        if let Some((field, direction)) = name.rsplit_once(char::is_whitespace) {
            if direction.eq_ignore_ascii_case("desc") {
                descending = true;
                name = field.trim_end();
            } else if direction.eq_ignore_ascii_case("asc") {
                name = field.trim_end();
            }
        }

        if name.eq_ignore_ascii_case("random") {
            items.push(OrderItem::new(Scalar::Random, descending));
            continue;
        }

        let Some((slot, column)) = resolve(graph, name) else {
            return Err(OrmLiteError::UnknownColumn {
                table: graph.root().def.declared.to_owned(),
                column: name.to_owned(),
            });
        };
        items.push(OrderItem::new(Scalar::column(slot, column), descending));
    }
    Ok(items)
}
