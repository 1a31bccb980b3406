use crate::error::PositionError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::warn;

/// Opaque resume token stored by the host and handed back on restart.
///
/// The bytes hold an encoded [`Cursor`]; callers should never look inside.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Position(Vec<u8>);

impl Position {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Position {
    fn from(bytes: Vec<u8>) -> Self {
        Position(bytes)
    }
}

impl From<&str> for Position {
    fn from(s: &str) -> Self {
        Position(s.as_bytes().to_vec())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(&self.0))
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Position(s.into_bytes()))
    }
}

/// Next unread (zero-based) row of a single sheet.
///
/// Tokens written before the sheet identity was tracked only carry
/// `row_offset`; the missing fields decode to their zero values.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Cursor {
    pub row_offset: i64,
    pub spreadsheet_id: String,
    pub sheet_id: i64,
}

impl Cursor {
    pub fn new(row_offset: i64, spreadsheet_id: impl Into<String>, sheet_id: i64) -> Self {
        Cursor {
            row_offset,
            spreadsheet_id: spreadsheet_id.into(),
            sheet_id,
        }
    }

    /// Decodes a host position. A missing or empty token is the start of the sheet.
    pub fn decode(token: Option<&Position>) -> Result<Cursor, PositionError> {
        let bytes = match token {
            Some(p) if !p.is_empty() => p.as_bytes(),
            _ => return Ok(Cursor::default()),
        };

        let cursor: Cursor = serde_json::from_slice(bytes).map_err(PositionError::Decode)?;
        if cursor.row_offset < 0 {
            return Err(PositionError::NegativeOffset(cursor.row_offset));
        }
        Ok(cursor)
    }

    /// Encodes the cursor as a position token.
    ///
    /// FIXME: a serialization failure yields an empty token, which the next
    /// `decode` reads as "start of sheet". Kept for token compatibility.
    pub fn encode(&self) -> Position {
        match serde_json::to_vec(self) {
            Ok(bytes) => Position(bytes),
            Err(e) => {
                warn!(error = %e, row_offset = self.row_offset, "Failed to encode cursor; returning empty position");
                Position::default()
            }
        }
    }

    pub fn advance_to(&self, row_offset: i64) -> Cursor {
        Cursor {
            row_offset,
            spreadsheet_id: self.spreadsheet_id.clone(),
            sheet_id: self.sheet_id,
        }
    }

    /// Whether this cursor may be resumed against the given sheet.
    /// Cursors without a spreadsheet id predate identity tracking and match anything.
    pub fn belongs_to(&self, spreadsheet_id: &str, sheet_id: i64) -> bool {
        self.spreadsheet_id.is_empty()
            || (self.spreadsheet_id == spreadsheet_id && self.sheet_id == sheet_id)
    }
}
