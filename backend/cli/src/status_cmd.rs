//! `textsnap status`: report a running gateway's health.

use anyhow::Result;
use serde_json::Value;

use crate::terminal_output::render_pairs;

/// Returns `false` when the gateway is unreachable or unhealthy.
pub async fn run(gateway_url: &str) -> Result<bool> {
    let url = format!("{}/api/health", gateway_url.trim_end_matches('/'));
    let resp = match reqwest::Client::new().get(&url).send().await {
        Ok(resp) => resp,
        Err(_) => {
            println!("TextSnap gateway is not reachable at {gateway_url}");
            return Ok(false);
        }
    };

    if !resp.status().is_success() {
        println!("TextSnap gateway at {gateway_url} answered {}", resp.status());
        return Ok(false);
    }

    let body: Value = resp.json().await?;
    println!("TextSnap gateway at {gateway_url}\n");
    print!("{}", render_pairs(&health_rows(&body)));
    Ok(body["status"] == "ok")
}

fn health_rows(body: &Value) -> Vec<(String, String)> {
    let Some(fields) = body.as_object() else {
        return vec![("response".to_string(), body.to_string())];
    };
    fields
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_are_unquoted() {
        let rows = health_rows(&json!({ "status": "ok", "uptime_seconds": 12 }));
        assert!(rows.contains(&("status".to_string(), "ok".to_string())));
        assert!(rows.contains(&("uptime_seconds".to_string(), "12".to_string())));
    }

    #[test]
    fn non_object_body_is_shown_raw() {
        let rows = health_rows(&json!("fine"));
        assert_eq!(rows, vec![("response".to_string(), "\"fine\"".to_string())]);
    }
}
