// Player pool loading from auction-value cheatsheets.
//
// The cheatsheet is a headerless-in-practice CSV: two preamble records, then
// one row per player with `Name (POS - TEAM)` in the first column and a
// dollar value like `$42` in the third.

use std::io::Read;
use std::path::Path;

use gridcast_core::{Player, PlayerId, Position};
use tracing::{debug, warn};

/// Records before the first player row (title line and column header line).
const PREAMBLE_RECORDS: usize = 2;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CheatsheetError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

/// Split `Name (POS - TEAM)` into the name and position. Team-less entries
/// such as `Jaguars (DST)` are accepted too.
pub fn parse_player_label(raw: &str) -> Option<(String, Position)> {
    let open = raw.find('(')?;
    let name = raw[..open].trim();
    if name.is_empty() {
        return None;
    }
    let inner = &raw[open + 1..];
    let end = inner.find(['-', ')']).unwrap_or(inner.len());
    let position = Position::from_str_pos(&inner[..end])?;
    Some((name.to_string(), position))
}

/// Parse `$42`, `42` or `$-3`. Negative values clamp to 0.
pub fn parse_dollar_value(raw: &str) -> Option<u32> {
    let digits = raw.trim().trim_start_matches('$').trim();
    let value: i64 = digits.parse().ok()?;
    Some(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
}

/// Id for the player on `row`, or `None` once rows outrun the id space.
fn row_player_id(row: usize) -> Option<PlayerId> {
    u32::try_from(row).ok().map(PlayerId)
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

/// Ids are the row's position among player rows, so a skipped row leaves a
/// gap rather than renumbering everything after it.
fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr);
    let mut players = Vec::new();

    for (row, result) in reader.records().skip(PREAMBLE_RECORDS).enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("skipping malformed cheatsheet row {}: {}", row, e);
                continue;
            }
        };

        let raw_name = record.get(0).unwrap_or_default();
        let Some((name, position)) = parse_player_label(raw_name) else {
            warn!("skipping cheatsheet row {}: unrecognized player '{}'", row, raw_name.trim());
            continue;
        };
        let Some(value) = record.get(2).and_then(parse_dollar_value) else {
            warn!("skipping '{}': missing or non-numeric value", name);
            continue;
        };

        let Some(id) = row_player_id(row) else {
            warn!("skipping '{}': row {} is past the last assignable id", name, row);
            continue;
        };

        players.push(Player::new(id, name, position, value));
    }
    Ok(players)
}

// ---------------------------------------------------------------------------
// Public loading API
// ---------------------------------------------------------------------------

/// Load the player pool from a cheatsheet CSV.
pub fn load_players(path: &Path) -> Result<Vec<Player>, CheatsheetError> {
    let file = std::fs::File::open(path).map_err(|e| CheatsheetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let players = load_players_from_reader(file).map_err(|e| CheatsheetError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;

    if players.is_empty() {
        return Err(CheatsheetError::Validation(format!(
            "no usable player rows in {}",
            path.display()
        )));
    }
    debug!("loaded {} players from {}", players.len(), path.display());
    Ok(players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
