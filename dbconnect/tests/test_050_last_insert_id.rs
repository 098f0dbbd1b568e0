mod test_utils;

use dbconnect::{Connection, DbError, DbResult, DbValue};
use log::info;

// cargo test --test test_050_last_insert_id -- --nocapture
#[test]
fn test_050_last_insert_id() -> DbResult<()> {
    let _log_handle = test_utils::init_logger();
    let start = std::time::Instant::now();
    let mut connection = test_utils::get_sqlite_connection()?;

    generated_keys(&mut connection)?;
    other_statements_keep_the_id(&mut connection)?;
    ids_are_per_connection(&mut connection)?;

    test_utils::closing_info(connection, start)
}

fn generated_keys(connection: &mut Connection) -> DbResult<()> {
    info!("the id of the last insert is reported");
    assert_eq!(DbValue::NULL, connection.last_insert_id()?);

    connection.exec("create table t (id integer primary key, name text unique)")?;
    assert_eq!(DbValue::NULL, connection.last_insert_id()?);

    connection.execute("insert into t(name) values('a')")?;
    assert_eq!(DbValue::INT(1), connection.last_insert_id()?);

    connection.execute("insert into t(name) values('b')")?;
    assert_eq!(DbValue::INT(2), connection.last_insert_id()?);

    connection.execute("insert into t(id, name) values(10, 'c')")?;
    assert_eq!(DbValue::INT(10), connection.last_insert_id()?);

    connection.execute_with_params("insert into t(name) values(?)", &[DbValue::from("d")])?;
    assert_eq!(DbValue::INT(11), connection.last_insert_id()?);
    Ok(())
}

fn other_statements_keep_the_id(connection: &mut Connection) -> DbResult<()> {
    info!("statements other than successful inserts do not change the id");
    connection.execute("update t set name = 'aa' where id = 1")?;
    assert_eq!(DbValue::INT(11), connection.last_insert_id()?);

    connection.select("select * from t")?;
    assert_eq!(DbValue::INT(11), connection.last_insert_id()?);

    assert!(connection
        .execute("insert into t(name) values('a')")
        .is_ok());
    assert_eq!(DbValue::INT(12), connection.last_insert_id()?);
    // violates the unique constraint
    assert!(connection
        .execute("insert into t(name) values('a')")
        .is_err());
    assert_eq!(DbValue::INT(12), connection.last_insert_id()?);

    // an insert that inserts nothing
    connection.execute("insert into t(name) select name from t where 1 = 0")?;
    assert_eq!(DbValue::INT(12), connection.last_insert_id()?);
    Ok(())
}

fn ids_are_per_connection(connection: &mut Connection) -> DbResult<()> {
    info!("each connection has its own last insert id");
    let mut other = test_utils::get_sqlite_connection()?;
    assert_eq!(DbValue::NULL, other.last_insert_id()?);
    other.close()?;
    assert!(matches!(other.last_insert_id(), Err(DbError::NotConnected)));

    assert_eq!(DbValue::INT(12), connection.last_insert_id()?);
    Ok(())
}
