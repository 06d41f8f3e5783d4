//! Spreadsheet port and the Google Sheets implementation.
//!
//! The tabular recipient source is a header-skipped body of rows with columns
//! `[unused, email, name, modelId]`. Reads return the full body; the status
//! write is a background-color format over the row, never a value write.

use async_trait::async_trait;
use fotodrop_core::{Config, DeliveryError, DeliveryResult};
use serde::Deserialize;
use std::time::Duration;

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const GREEN_HEX: &str = "#8ed4a0";
const RED_HEX: &str = "#d48e8e";

/// Status color for a recipient row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowColor {
    Green,
    Red,
}

impl RowColor {
    pub fn hex(&self) -> &'static str {
        match self {
            RowColor::Green => GREEN_HEX,
            RowColor::Red => RED_HEX,
        }
    }
}

/// Convert `#rrggbb` to the 0.0..=1.0 channel triple the Sheets API expects.
fn hex_to_rgb(hex: &str) -> (f64, f64, f64) {
    let value = u32::from_str_radix(hex.trim_start_matches('#'), 16).unwrap_or(0);
    (
        ((value >> 16) & 255) as f64 / 255.0,
        ((value >> 8) & 255) as f64 / 255.0,
        (value & 255) as f64 / 255.0,
    )
}

/// Tabular recipient source.
///
/// `fetch_rows` re-reads the bounded range on every call; nothing is cached.
/// `color_row` takes the sheet row index (header included, so body row `i`
/// is sheet row `i + 1`) and colors columns 0..4 in one batch call.
#[async_trait]
pub trait Spreadsheet: Send + Sync {
    async fn fetch_rows(&self) -> DeliveryResult<Vec<Vec<String>>>;

    async fn color_row(&self, sheet_row_index: usize, color: RowColor) -> DeliveryResult<()>;
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Google Sheets REST client.
pub struct GoogleSheets {
    client: reqwest::Client,
    token: String,
    spreadsheet_id: String,
    range: String,
}

impl GoogleSheets {
    pub fn new(
        token: String,
        spreadsheet_id: String,
        range: String,
        timeout_secs: u64,
    ) -> DeliveryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| DeliveryError::Config(format!("Failed to build client: {}", e)))?;

        Ok(GoogleSheets {
            client,
            token,
            spreadsheet_id,
            range,
        })
    }

    pub fn from_config(config: &Config) -> DeliveryResult<Self> {
        let token = config
            .google_api_token()
            .ok_or_else(|| DeliveryError::Config("GOOGLE_API_TOKEN not configured".to_string()))?;
        let spreadsheet_id = config
            .spreadsheet_id()
            .ok_or_else(|| DeliveryError::Config("SPREADSHEET_ID not configured".to_string()))?;
        Self::new(
            token.to_string(),
            spreadsheet_id.to_string(),
            config.sheets_range().to_string(),
            config.external_call_timeout_secs(),
        )
    }
}

#[async_trait]
impl Spreadsheet for GoogleSheets {
    async fn fetch_rows(&self) -> DeliveryResult<Vec<Vec<String>>> {
        let url = format!(
            "{}/{}/values/{}",
            SHEETS_BASE_URL, self.spreadsheet_id, self.range
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| DeliveryError::SourceRead(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DeliveryError::SourceRead(format!("HTTP {}: {}", status, text)));
        }

        let values: ValuesResponse = response
            .json()
            .await
            .map_err(|e| DeliveryError::SourceRead(e.to_string()))?;
        Ok(values.values)
    }

    async fn color_row(&self, sheet_row_index: usize, color: RowColor) -> DeliveryResult<()> {
        let (red, green, blue) = hex_to_rgb(color.hex());
        let body = serde_json::json!({
            "requests": [{
                "repeatCell": {
                    "range": {
                        "sheetId": 0,
                        "startRowIndex": sheet_row_index,
                        "endRowIndex": sheet_row_index + 1,
                        "startColumnIndex": 0,
                        "endColumnIndex": 4,
                    },
                    "cell": {
                        "userEnteredFormat": {
                            "backgroundColor": { "red": red, "green": green, "blue": blue },
                        },
                    },
                    "fields": "userEnteredFormat.backgroundColor",
                },
            }],
        });

        let url = format!("{}/{}:batchUpdate", SHEETS_BASE_URL, self.spreadsheet_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryError::Record(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Record(format!("HTTP {}: {}", status, text)));
        }
        Ok(())
    }
}
