use crate::error::SheetsError;
use reqwest::Url;

/// Spreadsheet and sheet (tab) identity parsed from a browser URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLocation {
    pub spreadsheet_id: String,
    pub sheet_id: i64,
}

/// Parses `https://docs.google.com/spreadsheets/d/<id>/edit#gid=<sheet id>`.
/// The `gid` may sit in the fragment or the query string; without one the
/// first sheet (id 0) is assumed.
pub fn parse_sheet_url(raw: &str) -> Result<SheetLocation, SheetsError> {
    let url = Url::parse(raw.trim()).map_err(|e| SheetsError::InvalidUrl(format!("{raw}: {e}")))?;

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let spreadsheet_id = segments
        .windows(3)
        .find(|w| w[0] == "spreadsheets" && w[1] == "d")
        .map(|w| w[2].to_string())
        .ok_or_else(|| SheetsError::InvalidUrl(format!("{raw}: missing /spreadsheets/d/<id>")))?;

    let gid = url
        .fragment()
        .and_then(find_gid)
        .or_else(|| url.query().and_then(find_gid));

    let sheet_id = match gid {
        Some(value) => value
            .parse::<i64>()
            .map_err(|_| SheetsError::InvalidUrl(format!("{raw}: gid '{value}' is not a number")))?,
        None => 0,
    };

    Ok(SheetLocation {
        spreadsheet_id,
        sheet_id,
    })
}

fn find_gid(params: &str) -> Option<&str> {
    params
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == "gid")
        .map(|(_, v)| v)
}
