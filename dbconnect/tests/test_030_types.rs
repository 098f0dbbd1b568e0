mod test_utils;

use dbconnect::{
    codec, types::Timestamp, BackendKind, Connection, DbResult, DbValue, TypeId,
};
use log::{debug, info};

// cargo test --test test_030_types -- --nocapture
#[test]
fn test_030_types() -> DbResult<()> {
    let _log_handle = test_utils::init_logger();
    let start = std::time::Instant::now();
    let mut connection = test_utils::get_sqlite_connection()?;

    all_types_via_literals(&mut connection)?;
    storage_class_wins(&mut connection)?;
    timestamps(&mut connection)?;

    test_utils::closing_info(connection, start)
}

fn all_types_via_literals(connection: &mut Connection) -> DbResult<()> {
    info!("write values of all types as literals, and read them back");
    connection.exec(
        "create table types (i integer, d double, t text, b blob, ts timestamp, n text)",
    )?;

    let values = vec![
        DbValue::INT(-42),
        DbValue::DOUBLE(37.25),
        DbValue::from("O'Hara says \"hi\" \\ ✓"),
        DbValue::BLOB(vec![0, 1, 0, 255, b'\'', 0]),
        DbValue::TIMESTAMP(Timestamp::parse("2024-02-29 13:45:07")?),
        DbValue::NULL,
    ];
    let literals: Vec<String> = values
        .iter()
        .map(|v| codec::encode_literal(v, BackendKind::Sqlite))
        .collect();
    let stmt = format!("insert into types values({})", literals.join(", "));
    debug!("{stmt}");
    assert_eq!(1, connection.execute(stmt)?);

    let resultset = connection.select("select i, d, t, b, ts, n from types")?;
    let type_ids: Vec<TypeId> = resultset.metadata().iter().map(|f| f.type_id()).collect();
    assert_eq!(
        vec![
            TypeId::INT,
            TypeId::DOUBLE,
            TypeId::TEXT,
            TypeId::BLOB,
            TypeId::TIMESTAMP,
            TypeId::TEXT
        ],
        type_ids
    );

    let row = resultset.into_single_row()?;
    for (cell, expected) in row.iter().zip(values.iter()) {
        assert_eq!(expected, cell.value(), "column {}", cell.col_idx());
    }
    Ok(())
}

fn storage_class_wins(connection: &mut Connection) -> DbResult<()> {
    info!("sqlite returns values in their storage class");
    let resultset = connection.select(
        "select 1 + 1 as int_expr, 1.5 * 2 as real_expr, 'x' || 'y' as text_expr, \
         x'00ff' as blob_expr, null as null_expr",
    )?;
    let row = resultset.into_single_row()?;
    assert_eq!(DbValue::INT(2), row[0]);
    assert_eq!(DbValue::DOUBLE(3.0), row[1]);
    assert_eq!(DbValue::from("xy"), row[2]);
    assert_eq!(DbValue::BLOB(vec![0, 255]), row[3]);
    assert_eq!(DbValue::NULL, row[4]);
    Ok(())
}

fn timestamps(connection: &mut Connection) -> DbResult<()> {
    info!("timestamps in text and unix-time representation");
    connection.exec("create table events (id integer primary key, at timestamp)")?;
    connection.multiple_statements(vec![
        "insert into events(at) values('1412-03-08 12:00:22')",
        "insert into events(at) values('2024-01-31')",
        "insert into events(at) values('2024-01-31T08:15:30.123')",
        "insert into events(at) values(86400)",
    ])?;

    let values: Vec<String> = connection
        .select("select at from events order by id")?
        .into_iter()
        .map(|row| row.into_single_value().map(|v| v.to_string()))
        .collect::<DbResult<_>>()?;
    assert_eq!(
        vec![
            "1412-03-08 12:00:22",
            "2024-01-31 00:00:00",
            "2024-01-31 08:15:30",
            "1970-01-02 00:00:00",
        ],
        values
    );

    debug!("malformed timestamps are reported as decode errors");
    connection.execute("insert into events(at) values('yesterday')")?;
    let err = connection.select("select at from events").unwrap_err();
    debug!("expected error: {err}");
    assert_eq!(
        Some(TypeId::TIMESTAMP),
        err.decode_error().and_then(dbconnect::DecodeError::type_id)
    );
    Ok(())
}
