use yunite_api::ApiResponse;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Trait for formatting CLI output
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    /// A payload returned by the API
    fn print_json(&self, value: &serde_json::Value);
    /// A non-2xx answer from the API, with its body
    fn remote_error(&self, response: &ApiResponse);
}

/// Human-readable output formatter with checkmarks and indentation
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {}", message);
    }
    fn info(&self, message: &str) {
        println!("  {}", message);
    }
    fn print_json(&self, value: &serde_json::Value) {
        match value {
            serde_json::Value::Null => {}
            serde_json::Value::String(text) => self.info(text),
            other => {
                let pretty = serde_json::to_string_pretty(other).unwrap_or_default();
                for line in pretty.lines() {
                    self.info(line);
                }
            }
        }
    }
    fn remote_error(&self, response: &ApiResponse) {
        self.error(&format!("Yunite returned {}", response.status()));
        match response.value() {
            Ok(serde_json::Value::Null) => {}
            Ok(body) => self.print_json(&body),
            Err(_) => self.info(&response.text()),
        }
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!(
            "{}",
            serde_json::json!({"success": true, "message": message})
        );
    }
    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn warn(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"level": "warning", "message": message})
        );
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
    fn remote_error(&self, response: &ApiResponse) {
        let body = response
            .value()
            .unwrap_or_else(|_| serde_json::Value::from(response.text().into_owned()));
        eprintln!(
            "{}",
            serde_json::json!({
                "success": false,
                "status": response.status().as_u16(),
                "body": body,
            })
        );
    }
}

pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter)
    }
}
