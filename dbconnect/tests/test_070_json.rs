mod test_utils;

use dbconnect::{Connection, DbResult};
use log::{debug, info};
use serde_json::json;

// cargo test --test test_070_json -- --nocapture
#[test]
fn test_070_json() -> DbResult<()> {
    let _log_handle = test_utils::init_logger();
    let start = std::time::Instant::now();
    let mut connection = test_utils::get_sqlite_connection()?;

    select_as_json(&mut connection)?;
    empty_result(&mut connection)?;

    test_utils::closing_info(connection, start)
}

fn select_as_json(connection: &mut Connection) -> DbResult<()> {
    info!("project a result set to json");
    connection.exec(
        "create table docs (id integer primary key, title text, score double, \
         payload blob, created timestamp)",
    )?;
    connection.multiple_statements(vec![
        "insert into docs values(1, 'first', 1.5, x'000102', '2020-02-02 20:20:20')",
        "insert into docs values(2, null, null, null, null)",
    ])?;

    let value = connection.select_json("select * from docs order by id")?;
    debug!("{value}");
    assert_eq!(
        json!([
            {
                "id": 1,
                "title": "first",
                "score": 1.5,
                "payload": "AAEC",
                "created": "2020-02-02 20:20:20"
            },
            {
                "id": 2,
                "title": null,
                "score": null,
                "payload": null,
                "created": null
            }
        ]),
        value
    );

    debug!("the projection of a result set is the same");
    let resultset = connection.select("select * from docs order by id")?;
    assert_eq!(value, resultset.to_json());

    debug!("column aliases become the keys");
    let value = connection.select_json("select count(*) as cnt, max(score) as top from docs")?;
    assert_eq!(json!([{"cnt": 2, "top": 1.5}]), value);
    Ok(())
}

fn empty_result(connection: &mut Connection) -> DbResult<()> {
    info!("an empty result is an empty array");
    let value = connection.select_json("select * from docs where id < 0")?;
    assert_eq!(json!([]), value);
    Ok(())
}
