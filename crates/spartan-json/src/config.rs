/// How `Value::Timestamp` is written to JSON, which has no native date type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    /// RFC 3339 text with millisecond precision, e.g. `2024-01-02T03:04:05.000Z`
    #[default]
    Rfc3339,
    /// Milliseconds since the Unix epoch as a JSON number
    EpochMillis,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub timestamp_format: TimestampFormat,
}

impl Config {
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }
}
