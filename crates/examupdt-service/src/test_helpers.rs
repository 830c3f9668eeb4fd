use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::run_migrations;

pub fn establish_test_connection() -> SqliteConnection {
    let mut connection =
        SqliteConnection::establish(":memory:").expect("Failed to create in-memory database");

    run_migrations(&mut connection).expect("Failed to run migrations");

    connection
}

pub mod test_utils {
    use super::*;
    use crate::models::RecordRow;
    use crate::schema::{records, sessions};

    pub fn count_records(conn: &mut SqliteConnection, collection: &str) -> i64 {
        records::table
            .filter(records::collection.eq(collection))
            .count()
            .get_result(conn)
            .expect("Failed to count records")
    }

    pub fn get_record(
        conn: &mut SqliteConnection,
        collection: &str,
        id: &str,
    ) -> Option<RecordRow> {
        records::table
            .find((collection, id))
            .select(RecordRow::as_select())
            .first(conn)
            .optional()
            .expect("Failed to query record")
    }

    pub fn count_sessions(conn: &mut SqliteConnection) -> i64 {
        sessions::table
            .count()
            .get_result(conn)
            .expect("Failed to count sessions")
    }
}
