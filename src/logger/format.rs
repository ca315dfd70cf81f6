//! Access log format module
//!
//! Supports two log formats:
//! - `common` (Common Log Format - CLF)
//! - `json` (JSON structured logging)

use chrono::Local;

/// Access log entry covering one request/response pair
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, HEAD, etc.)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
}

impl AccessLogEntry {
    /// Format the entry; unknown format names fall back to `common`
    pub fn format(&self, format: &str) -> String {
        match format {
            "json" => self.format_json(),
            _ => self.format_common(),
        }
    }

    /// Common Log Format (CLF)
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {}{} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.query
                .as_ref()
                .map(|q| format!("?{q}"))
                .unwrap_or_default(),
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    /// JSON structured log format
    fn format_json(&self) -> String {
        serde_json::json!({
            "time": self.time.to_rfc3339(),
            "remote_addr": self.remote_addr,
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> AccessLogEntry {
        AccessLogEntry {
            remote_addr: "192.168.1.10".to_string(),
            time: Local::now(),
            method: "GET".to_string(),
            path: "/get_kaggle_outputs".to_string(),
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 1234,
        }
    }

    #[test]
    fn test_common_format() {
        let line = sample_entry().format("common");
        assert!(line.starts_with("192.168.1.10 - - ["));
        assert!(line.contains("\"GET /get_kaggle_outputs HTTP/1.1\""));
        assert!(line.ends_with("200 1234"));
    }

    #[test]
    fn test_common_format_with_query() {
        let mut entry = sample_entry();
        entry.query = Some("verbose=1".to_string());
        let line = entry.format("common");
        assert!(line.contains("\"GET /get_kaggle_outputs?verbose=1 HTTP/1.1\""));
    }

    #[test]
    fn test_json_format() {
        let line = sample_entry().format("json");
        let parsed: serde_json::Value = serde_json::from_str(&line).expect("valid JSON line");
        assert_eq!(parsed["remote_addr"], "192.168.1.10");
        assert_eq!(parsed["method"], "GET");
        assert_eq!(parsed["path"], "/get_kaggle_outputs");
        assert_eq!(parsed["query"], serde_json::Value::Null);
        assert_eq!(parsed["status"], 200);
        assert_eq!(parsed["body_bytes"], 1234);
    }

    #[test]
    fn test_unknown_format_falls_back_to_common() {
        let entry = sample_entry();
        assert_eq!(entry.format("combined"), entry.format("common"));
    }
}
