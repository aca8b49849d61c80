use rusqlite::{Params, Row, Statement};

/// Maps a row selected with named columns onto a model.
pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;

    /// Run `stmt` and map every row.
    fn query_all<P: Params>(stmt: &mut Statement<'_>, params: P) -> rusqlite::Result<Vec<Self>> {
        stmt.query_map(params, Self::from_row)?.collect()
    }
}
