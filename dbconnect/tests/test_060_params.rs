mod test_utils;

use dbconnect::{types::Timestamp, Connection, DbResult, DbValue};
use log::{debug, info};

// cargo test --test test_060_params -- --nocapture
#[test]
fn test_060_params() -> DbResult<()> {
    let _log_handle = test_utils::init_logger();
    let start = std::time::Instant::now();
    let mut connection = test_utils::get_sqlite_connection()?;

    all_types_as_params(&mut connection)?;
    params_are_no_sql(&mut connection)?;
    select_with_params(&mut connection)?;

    test_utils::closing_info(connection, start)
}

fn all_types_as_params(connection: &mut Connection) -> DbResult<()> {
    info!("bind values of all types");
    connection.exec(
        "create table params (i integer, d double, t text, b blob, ts timestamp, n text)",
    )?;
    let ts = Timestamp::parse("2012-12-21 23:59:59")?;
    let values = vec![
        DbValue::INT(i64::MIN),
        DbValue::DOUBLE(-0.125),
        DbValue::from("with 'quotes' and \\backslashes\\"),
        DbValue::BLOB(vec![0, 0, 7, 255]),
        DbValue::TIMESTAMP(ts),
        DbValue::NULL,
    ];
    let count = connection
        .execute_with_params("insert into params values(?, ?, ?, ?, ?, ?)", &values)?;
    assert_eq!(1, count);

    let row = connection
        .select("select * from params")?
        .into_single_row()?;
    debug!("{row}");
    assert_eq!(values, row.into_values());
    Ok(())
}

fn params_are_no_sql(connection: &mut Connection) -> DbResult<()> {
    info!("parameters are never interpreted as SQL");
    let evil = "x'); drop table params; --";
    connection.execute_with_params(
        "insert into params(t) values(?)",
        &[DbValue::from(evil)],
    )?;
    let value = connection
        .select("select t from params where i is null")?
        .into_single_value()?;
    assert_eq!(DbValue::from(evil), value);
    assert_eq!(2, connection.select("select * from params")?.row_count());
    Ok(())
}

fn select_with_params(connection: &mut Connection) -> DbResult<()> {
    info!("select with parameters");
    connection.exec("create table nums (n integer)")?;
    for n in 1..=10_i64 {
        connection.execute_with_params("insert into nums(n) values(?)", &[DbValue::from(n)])?;
    }

    let resultset = connection.select_with_params(
        "select n from nums where n > ? and n <= ? order by n",
        &[DbValue::INT(3), DbValue::INT(6)],
    )?;
    let values: Vec<i64> = resultset.rows().filter_map(|row| row[0].as_i64()).collect();
    assert_eq!(vec![4, 5, 6], values);

    // a NULL parameter matches nothing in a comparison
    let resultset =
        connection.select_with_params("select n from nums where n = ?", &[DbValue::NULL])?;
    assert_eq!(0, resultset.row_count());
    assert_eq!(1, resultset.column_count());
    Ok(())
}
