mod test_utils;

use dbconnect::{BackendKind, Connection, DbResult, DbValue};
use log::{debug, info};

const NASTY_STRINGS: [&str; 9] = [
    "plain",
    "O'Hara",
    "''",
    "\\",
    "\\'",
    "line\nbreak\r\n",
    "'; drop table words; --",
    "\"double\" and `back` quotes",
    "ünïcödé ✓ 😀",
];

// cargo test --test test_040_escape -- --nocapture
#[test]
fn test_040_escape() -> DbResult<()> {
    let _log_handle = test_utils::init_logger();
    let start = std::time::Instant::now();
    let mut connection = test_utils::get_sqlite_connection()?;

    escaped_strings_reconstruct(&mut connection)?;
    nul_characters(&mut connection)?;
    escaping_rules_per_backend();

    test_utils::closing_info(connection, start)
}

fn escaped_strings_reconstruct(connection: &mut Connection) -> DbResult<()> {
    info!("escaped strings are stored and read back unchanged");
    connection.exec("create table words (id integer primary key, word text)")?;

    for (i, raw) in NASTY_STRINGS.iter().enumerate() {
        let stmt = format!(
            "insert into words(id, word) values({i}, {})",
            connection.escape(raw).quoted()
        );
        debug!("{stmt}");
        connection.execute(stmt)?;
    }

    let resultset = connection.select("select word from words order by id")?;
    assert_eq!(NASTY_STRINGS.len(), resultset.row_count());
    for (row, raw) in resultset.rows().zip(NASTY_STRINGS.iter()) {
        assert_eq!(Some(*raw), row[0].as_str());
    }

    // the table still exists
    let count = connection
        .select("select count(*) from words")?
        .into_single_value()?;
    assert_eq!(DbValue::INT(9), count);
    Ok(())
}

fn nul_characters(connection: &mut Connection) -> DbResult<()> {
    info!("NUL characters cannot be part of sqlite literals");
    let escaped = connection.escape("nul\0byte");
    assert_eq!("nulbyte", escaped.as_str());
    connection.execute(format!(
        "insert into words(id, word) values(100, {})",
        escaped.quoted()
    ))?;
    let value = connection
        .select("select word from words where id = 100")?
        .into_single_value()?;
    assert_eq!(DbValue::from("nulbyte"), value);
    Ok(())
}

fn escaping_rules_per_backend() {
    info!("escaping needs no connection");
    assert_eq!("O\\'Hara", BackendKind::MariaDb.escape("O'Hara").as_str());
    assert_eq!("a\\\\b", BackendKind::MariaDb.escape("a\\b").as_str());
    assert_eq!("\\0\\n", BackendKind::MariaDb.escape("\0\n").as_str());
    assert_eq!("'O''Hara'", BackendKind::Postgres.escape("O'Hara").quoted());
    assert_eq!("a\\b", BackendKind::Postgres.escape("a\\b").as_str());
    assert_eq!("", BackendKind::Sqlite.escape("").as_str());
    assert_eq!("''", BackendKind::Sqlite.escape("").quoted());
}
