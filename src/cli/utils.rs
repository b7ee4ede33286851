use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::filter::SqlResult;

/// Output a success message in the appropriate format. Object `data` is
/// merged into the JSON envelope.
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(envelope)) = (data, response.as_object_mut()) {
                envelope.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Statement followed by one `$n = value` line per parameter.
pub fn format_sql(sql: &SqlResult) -> String {
    let mut out = sql.query.clone();
    for (i, param) in sql.params.iter().enumerate() {
        out.push_str(&format!("\n  ${} = {}", i + 1, param));
    }
    out
}
