use crate::{
    error::Result,
    resolver::{IndexRef, KeySchema},
    table::{Table, query::QueryBuilder},
};

use serde::Serialize;

/// A secondary index of a table, obtained with [`Table::index`].
pub struct Index<'t, T, S> {
    index: IndexRef,
    table: &'t Table<T, S>,
}

impl<'t, T, S> Index<'t, T, S> {
    pub(crate) fn new(table: &'t Table<T, S>, index: IndexRef) -> Self {
        Self { index, table }
    }

    /// The index name.
    pub fn name(&self) -> &str {
        self.table.resolved().index_name(self.index).unwrap_or_default()
    }

    /// The hash key and optional sort key of the index.
    pub fn key_schema(&self) -> &KeySchema {
        self.table.resolved().key_schema(self.index)
    }

    /// Start a query on the index for a hash key value.
    pub fn query<V: Serialize>(&self, hash_value: V) -> Result<QueryBuilder<'t, T, S>> {
        QueryBuilder::new(self.table, self.index, hash_value)
    }
}
