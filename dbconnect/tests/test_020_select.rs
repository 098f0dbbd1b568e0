mod test_utils;

use dbconnect::{Connection, DbError, DbResult, DbValue, TypeId};
use log::{debug, info};

// cargo test --test test_020_select -- --nocapture
#[test]
fn test_020_select() -> DbResult<()> {
    let _log_handle = test_utils::init_logger();
    let start = std::time::Instant::now();
    let mut connection = test_utils::get_sqlite_connection()?;

    empty_table(&mut connection)?;
    insert_select_delete(&mut connection)?;
    several_rows(&mut connection)?;
    query_errors(&mut connection)?;

    test_utils::closing_info(connection, start)
}

fn empty_table(connection: &mut Connection) -> DbResult<()> {
    info!("select from an empty table");
    connection.multiple_statements_ignore_err(vec!["drop table t"]);
    connection.exec("create table t (id integer primary key, name varchar(64))")?;

    let resultset = connection.select("select id, name from t")?;
    assert_eq!(0, resultset.row_count());
    assert_eq!(2, resultset.column_count());
    assert!(resultset.is_empty());

    let metadata = resultset.metadata();
    assert_eq!("id", metadata[0].name());
    assert_eq!("name", metadata[1].name());
    assert_eq!(TypeId::INT, metadata[0].type_id());
    assert_eq!(TypeId::TEXT, metadata[1].type_id());
    assert_eq!(Some(1), metadata.index_of("name"));
    Ok(())
}

fn insert_select_delete(connection: &mut Connection) -> DbResult<()> {
    info!("insert a row, read it, delete it");
    assert_eq!(1, connection.execute("insert into t(name) values('a')")?);

    let resultset = connection.select("select id, name from t")?;
    debug!("{resultset}");
    assert_eq!(1, resultset.row_count());
    let row = resultset.into_single_row()?;
    assert_eq!(vec![DbValue::INT(1), DbValue::from("a")], row.into_values());

    assert_eq!(1, connection.execute("delete from t where id = 1")?);
    let resultset = connection.select("select id, name from t")?;
    assert_eq!(0, resultset.row_count());
    assert_eq!(2, resultset.column_count());
    Ok(())
}

fn several_rows(connection: &mut Connection) -> DbResult<()> {
    info!("read several rows in the delivered order");
    connection.multiple_statements(vec![
        "insert into t(name) values('first')",
        "insert into t(name) values('second')",
        "insert into t(name) values(null)",
    ])?;

    let resultset = connection.select("select id, name from t order by id")?;
    assert_eq!(3, resultset.row_count());
    let names: Vec<Option<String>> = resultset
        .rows()
        .map(|row| row.value_by_name("name").and_then(DbValue::as_str).map(ToString::to_string))
        .collect();
    assert_eq!(
        vec![Some("first".to_string()), Some("second".to_string()), None],
        names
    );
    assert!(resultset.value(2, 1).unwrap().is_null());

    let count = connection
        .select("select count(*) from t")?
        .into_single_value()?
        .try_into_i64()?;
    assert_eq!(3, count);

    let mut ids = Vec::new();
    for row in connection.select("select id from t order by id desc")? {
        ids.push(row.into_single_value()?.try_into_i64()?);
    }
    assert_eq!(3, ids.len());
    assert!(ids[0] > ids[1] && ids[1] > ids[2]);

    assert!(matches!(
        connection.select("select id from t")?.into_single_row(),
        Err(DbError::Usage(_))
    ));
    Ok(())
}

fn query_errors(connection: &mut Connection) -> DbResult<()> {
    info!("statements that the database rejects");
    let err = connection.select("select * from no_such_table").unwrap_err();
    debug!("expected error: {err}");
    let query_error = err.query_error().unwrap();
    assert!(!query_error.is_connection_lost());
    assert!(query_error.message().contains("no_such_table"));

    let err = connection.execute("insert into t(id, name) values(1, 'dup'), (1, 'dup')");
    assert!(err.is_err());
    assert!(connection.execute("this is no sql").is_err());

    debug!("select with several statements of different shape");
    let result = connection.select("select 1 as a; select 2 as a, 3 as b");
    assert!(matches!(result, Err(DbError::UsageDetailed(_))));

    // the connection stays usable
    assert!(connection.is_open());
    assert_eq!(3, connection.select("select id from t")?.row_count());
    Ok(())
}
