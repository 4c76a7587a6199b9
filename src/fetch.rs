//! Retrieval of the raw SDMX-JSON payload from the OECD data API.

use std::{
    io::{BufWriter, Write},
    path::Path,
};

use log::{debug, info};
use reqwest::{StatusCode, blocking::Client, header::ACCEPT};
use serde::Serialize;
use serde_json::{Value as JsonValue, ser::PrettyFormatter};
use crate::{
    error::{DivError, Result},
    output,
};

/// Corporate and personal income tax on distributed profit, annual, 2000-2024.
pub const ENDPOINT: &str = "https://sdmx.oecd.org/public/rest/data/OECD.CTP.TPS,DSD_TAX_CIT@DF_CIT_DIVD_INCOME,1.0/.A......?startPeriod=2000&endPeriod=2024";
pub const ACCEPT_SDMX_JSON: &str = "application/vnd.sdmx.data+json; charset=utf-8; version=1.0";
/// Characters of an error body echoed back to the operator.
pub const BODY_PREVIEW_CHARS: usize = 1000;

pub fn fetch_dataset(url: &str) -> Result<JsonValue> {
    info!("Requesting {url}");
    let client = Client::new();
    let response = client.get(url).header(ACCEPT, ACCEPT_SDMX_JSON).send()?;
    let status = response.status();
    debug!("Received HTTP response with status: {status}");
    let body = response.text()?;
    interpret_response(status, &body)
}

/// Accepts only 200; anything else becomes a `TransportFailure` with a bounded body excerpt.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<JsonValue> {
    if status != StatusCode::OK {
        return Err(DivError::TransportFailure {
            status: status.as_u16(),
            body: truncate_body(body, BODY_PREVIEW_CHARS).to_string(),
        });
    }
    serde_json::from_str(body)
        .map_err(|err| DivError::malformed(format!("response body is not JSON: {err}")))
}

pub fn truncate_body(body: &str, limit: usize) -> &str {
    match body.char_indices().nth(limit) {
        Some((cut, _)) => &body[..cut],
        None => body,
    }
}

/// Writes the payload with 4-space indentation. The file appears only once fully written.
pub fn save_payload(payload: &JsonValue, path: &Path) -> Result<()> {
    let staged = output::stage_beside(path)?;
    {
        let mut writer = BufWriter::new(staged.as_file());
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
        payload
            .serialize(&mut serializer)
            .map_err(std::io::Error::from)?;
        writer.flush()?;
    }
    output::persist_staged(staged, path)?;
    info!("Data successfully fetched and saved as {path:?}");
    Ok(())
}
