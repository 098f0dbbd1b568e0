// JSON projection of result sets.
use crate::{DbValue, Row};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{Map, Number, Value};

pub(crate) fn value_to_json(value: &DbValue) -> Value {
    match value {
        DbValue::NULL => Value::Null,
        DbValue::INT(i) => Value::from(*i),
        // JSON has no representation for NaN and infinities
        DbValue::DOUBLE(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        DbValue::TEXT(s) => Value::String(s.clone()),
        DbValue::BLOB(b) => Value::String(STANDARD.encode(b)),
        DbValue::TIMESTAMP(ts) => Value::String(ts.to_string()),
    }
}

pub(crate) fn row_to_json(row: &Row) -> Value {
    let mut object = Map::with_capacity(row.len());
    for cell in row {
        let name = row
            .metadata()
            .get(cell.col_idx())
            .map_or_else(|| cell.col_idx().to_string(), |f| f.name().to_string());
        object.insert(name, value_to_json(cell.value()));
    }
    Value::Object(object)
}

pub(crate) fn rows_to_json<'a, I: IntoIterator<Item = &'a Row>>(rows: I) -> Value {
    Value::Array(rows.into_iter().map(row_to_json).collect())
}
