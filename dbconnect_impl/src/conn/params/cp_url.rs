use super::conn_opt::ConnOpt;
use crate::BackendKind;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::{collections::BTreeMap, fmt::Write};

const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');
const SEGMENT: &AsciiSet = &PATH.add(b'/');
const USERINFO: &AsciiSet = &SEGMENT
    .add(b':')
    .add(b'@')
    .add(b'[')
    .add(b']')
    .add(b'\\')
    .add(b'^')
    .add(b'|');
const QUERY_VALUE: &AsciiSet = &PATH.add(b'&').add(b'=').add(b'+');

// Renders connection parameters as URL; the password is never part of the output.
pub(crate) fn format_as_url(
    backend: Option<BackendKind>,
    host: Option<&str>,
    port: Option<u16>,
    dbuser: Option<&str>,
    dbname: Option<&str>,
    options: &BTreeMap<ConnOpt, String>,
) -> String {
    let mut buf = String::with_capacity(200);
    match backend {
        Some(BackendKind::Sqlite) => {
            write!(
                buf,
                "{}:{}",
                BackendKind::Sqlite.scheme(),
                utf8_percent_encode(dbname.unwrap_or(""), PATH)
            )
            .ok();
        }
        _ => {
            write!(
                buf,
                "{}://",
                backend.map_or("unknown", BackendKind::scheme)
            )
            .ok();
            if let Some(dbuser) = dbuser {
                write!(buf, "{}@", utf8_percent_encode(dbuser, USERINFO)).ok();
            }
            buf.push_str(host.unwrap_or(""));
            if let Some(port) = port.filter(|p| *p != 0) {
                write!(buf, ":{port}").ok();
            }
            if let Some(dbname) = dbname {
                write!(buf, "/{}", utf8_percent_encode(dbname, SEGMENT)).ok();
            }
        }
    }

    // write URL options
    let mut sep = std::iter::repeat(())
        .enumerate()
        .map(|(i, ())| if i == 0 { '?' } else { '&' });
    for (opt, value) in options {
        if let Some(sep) = sep.next() {
            write!(buf, "{sep}{opt}={}", utf8_percent_encode(value, QUERY_VALUE)).ok();
        }
    }
    buf
}
