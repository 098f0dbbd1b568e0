pub(crate) mod escaped_string;
pub(crate) mod timestamp;
