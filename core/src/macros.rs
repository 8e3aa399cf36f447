//! Declarative table and enum mappings.

/// Declares a mapped table: the row struct, its column handles and its
/// `'static` metadata.
///
/// ```
/// use ormlite_core::table;
///
/// table! {
///     #[schema("hr")]
///     pub struct Department {
///         #[primary_key]
///         pub id: i64,
///         pub name: String,
///     }
/// }
///
/// table! {
///     #[named("staff")]
///     pub struct Employee {
///         #[primary_key]
///         pub id: i64,
///         #[named("full_name")]
///         pub name: String,
///         #[references(Department, id)]
///         pub department_id: Option<i64>,
///         #[references(Employee, id)]
///         pub manager_id: Option<i64>,
///     }
/// }
///
/// use ormlite_core::schema::Table;
/// assert_eq!(Employee::def().alias, Some("staff"));
/// assert!(Employee::def().column("department_id").unwrap().references.is_some());
/// ```
///
/// Table attributes: `#[named("..")]`, `#[schema("..")]`.
/// Field attributes: `#[primary_key]`, `#[named("..")]`,
/// `#[references(Table, field)]`.
///
/// The generated `<Name>Columns` struct holds one [`Col`](crate::expr::Col)
/// per field; it is what query closures receive.
#[macro_export]
macro_rules! table {
    (
        $(#[$tattr:ident $( ( $($targs:tt)* ) )?])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fattr:ident $( ( $($fargs:tt)* ) )?])*
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $crate::paste::paste! {
            #[derive(Debug, Clone, PartialEq)]
            $vis struct $name {
                $($fvis $field: $ty,)*
            }

            #[doc = concat!("Column handles of [`", stringify!($name), "`].")]
            #[derive(Debug, Clone, Copy)]
            $vis struct [<$name Columns>] {
                $(pub $field: $crate::expr::Col<$ty>,)*
                #[doc(hidden)]
                pub __row: $crate::schema::RowRef,
            }

            impl $crate::schema::Columns for [<$name Columns>] {
                #[inline]
                fn row(&self) -> $crate::schema::RowRef {
                    self.__row
                }
            }

            impl $crate::schema::Table for $name {
                type Columns = [<$name Columns>];

                fn def() -> &'static $crate::schema::TableDef {
                    const COLUMNS: &[$crate::schema::ColumnDef] = &[$(
                        {
                            let column = $crate::schema::ColumnDef::new(
                                stringify!($field),
                                <$ty as $crate::types::SqlType>::DB_TYPE,
                                <$ty as $crate::types::SqlType>::NULLABLE,
                            );
                            $(
                                let column = $crate::__ormlite_column_attr!(
                                    column, $fattr $( ( $($fargs)* ) )?
                                );
                            )*
                            column
                        },
                    )*];

                    static DEF: $crate::schema::TableDef = {
                        let table = $crate::schema::TableDef::new(
                            concat!(module_path!(), "::", stringify!($name)),
                            stringify!($name),
                            COLUMNS,
                        );
                        $(
                            let table = $crate::__ormlite_table_attr!(
                                table, $tattr $( ( $($targs)* ) )?
                            );
                        )*
                        table
                    };
                    &DEF
                }

                fn columns(slot: $crate::schema::Slot) -> Self::Columns {
                    let table = <Self as $crate::schema::Table>::def();
                    [<$name Columns>] {
                        $($field: $crate::expr::Col::new(
                            $crate::schema::ColumnRef::new(slot, table, stringify!($field)),
                        ),)*
                        __row: $crate::schema::RowRef::new(slot, table),
                    }
                }
            }

            impl $crate::schema::Source for $name {
                type Columns = [<$name Columns>];

                fn resolve(
                    graph: &$crate::join::JoinGraph,
                ) -> $crate::Result<Self::Columns> {
                    $crate::schema::resolve_table::<Self>(graph)
                }
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ormlite_column_attr {
    ($column:ident, primary_key) => {
        $column.primary_key()
    };
    ($column:ident, named($name:literal)) => {
        $column.named($name)
    };
    ($column:ident, references($table:ty, $field:ident)) => {
        $column.references(
            <$table as $crate::schema::Table>::def,
            stringify!($field),
        )
    };
    ($column:ident, $other:ident $($rest:tt)*) => {
        compile_error!(concat!("unknown column attribute `", stringify!($other), "`"))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ormlite_table_attr {
    ($table:ident, named($name:literal)) => {
        $table.named($name)
    };
    ($table:ident, schema($schema:literal)) => {
        $table.schema($schema)
    };
    ($table:ident, $other:ident $($rest:tt)*) => {
        compile_error!(concat!("unknown table attribute `", stringify!($other), "`"))
    };
}

/// Declares a fieldless enum usable as a column type.
///
/// Each enum is its own comparison family, so it only compares with itself.
/// Values bind as the member name or the ordinal, depending on
/// [`Config::enum_encoding`](crate::Config::enum_encoding).
///
/// ```
/// use ormlite_core::sql_enum;
/// use ormlite_core::types::SqlEnum;
///
/// sql_enum! {
///     pub enum Status {
///         Active,
///         Suspended = 5,
///     }
/// }
///
/// assert_eq!(Status::Suspended.name(), "Suspended");
/// assert_eq!(Status::Suspended.ordinal(), 5);
/// ```
#[macro_export]
macro_rules! sql_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident $(= $ordinal:literal)?),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant $(= $ordinal)?,)*
        }

        impl $crate::types::SqlType for $name {
            type Family = $name;
            const DB_TYPE: $crate::ormlite_types::DbType = $crate::ormlite_types::DbType::Text;
        }

        impl $crate::types::SqlEnum for $name {
            fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)*
                }
            }

            fn ordinal(&self) -> i64 {
                *self as i64
            }
        }

        impl From<$name> for $crate::ormlite_types::Value {
            fn from(value: $name) -> Self {
                $crate::ormlite_types::Value::Enum {
                    name: $crate::types::SqlEnum::name(&value),
                    ordinal: $crate::types::SqlEnum::ordinal(&value),
                }
            }
        }

        impl $crate::expr::IntoExpr for $name {
            type Type = $name;

            #[inline]
            fn into_node(self) -> $crate::expr::Node {
                $crate::expr::Node::Constant(self.into())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::schema::{Slot, Table};
    use crate::types::SqlEnum;
    use ormlite_types::{DbType, Naming};

    table! {
        #[named("teams")]
        pub struct Team {
            #[primary_key]
            pub id: i64,
            pub title: String,
        }
    }

    table! {
        pub struct Player {
            #[primary_key]
            pub id: i64,
            #[named("PlayerName")]
            pub name: String,
            #[references(Team, id)]
            pub team_id: Option<i64>,
        }
    }

    sql_enum! {
        pub enum Position {
            Keeper,
            Striker = 9,
        }
    }

    #[test]
    fn table_metadata() {
        let def = Player::def();
        assert_eq!(def.declared, "Player");
        assert!(def.type_name.ends_with("::Player"));
        assert_eq!(def.columns.len(), 3);
        assert_eq!(def.primary_key().map(|c| c.field), Some("id"));

        let team_id = def.column("team_id").unwrap();
        assert!(team_id.nullable);
        assert_eq!(team_id.ty, DbType::Integer);
        let (column, fk) = def.foreign_key_to(Team::def()).unwrap();
        assert_eq!(column.field, "team_id");
        assert_eq!(fk.column, "id");

        assert_eq!(def.column("name").unwrap().name(Naming::AsIs), "PlayerName");
        assert_eq!(Team::def().name(Naming::AsIs), "teams");
    }

    #[test]
    fn column_handles_carry_their_slot() {
        let cols = Player::columns(Slot::Bound(2));
        assert_eq!(cols.name.column_ref().slot, Slot::Bound(2));
        assert_eq!(cols.team_id.column_ref().field, "team_id");
        assert!(cols.__row.table.same_as(Player::def()));
    }

    #[test]
    fn enum_names_and_ordinals() {
        assert_eq!(Position::Keeper.name(), "Keeper");
        assert_eq!(Position::Keeper.ordinal(), 0);
        assert_eq!(Position::Striker.ordinal(), 9);
    }
}
