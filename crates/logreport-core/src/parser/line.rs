use lazy_static::lazy_static;
use regex::Regex;

// log_format ui_short '$remote_addr  $remote_user $http_x_real_ip [$time_local] "$request" '
//                     '$status $body_bytes_sent "$http_referer" '
//                     '"$http_user_agent" "$http_x_forwarded_for" "$http_X_REQUEST_ID" "$http_X_RB_USER" '
//                     '$request_time';
lazy_static! {
    static ref LINE_PATTERN: Regex = Regex::new(concat!(
        r"^\S+\s+\S+\s+\S+\s+",
        r"\[[^\]]*\]\s+",
        r#""\S+\s+(?P<url>\S+)\s+[^"\s]+"\s+"#,
        r"\S+\s+\S+\s+",
        r#"(?:"[^"]*"\s+){5}"#,
        r"(?P<request_time>\S+)\s*$",
    ))
    .unwrap();
}

/// The two fields of an access log line the report needs
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub url: String,
    pub request_time: f64,
}

/// Outcome of parsing a single line
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Record(ParsedRecord),
    Unparsed,
}

impl ParsedLine {
    pub fn into_record(self) -> Option<ParsedRecord> {
        match self {
            ParsedLine::Record(record) => Some(record),
            ParsedLine::Unparsed => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, ParsedLine::Record(_))
    }
}

/// Extract the request path and request time from one log line.
///
/// Returns `None` when the line does not follow the `ui_short` layout or
/// its request time is not a finite, non-negative number.
pub fn parse_line(line: &str) -> Option<ParsedRecord> {
    let caps = LINE_PATTERN.captures(line)?;

    let url = caps.name("url")?.as_str();
    let raw_time = caps.name("request_time")?.as_str();

    let request_time: f64 = raw_time.parse().ok()?;
    if !request_time.is_finite() || request_time < 0.0 {
        return None;
    }

    Some(ParsedRecord {
        url: url.to_string(),
        request_time,
    })
}
