//! The Cricsheet register, which maps each person's unique identifier to their name and to
//! their keys in other databases.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::csv::CsvReader;
use crate::file::LoadError;

pub const NAMES_CSV: &str = "names.csv";
pub const PEOPLE_CSV: &str = "people.csv";
pub const REGISTER_FILES: [&str; 2] = [NAMES_CSV, PEOPLE_CSV];

const IDENTIFIER: &str = "identifier";

/// Identifier to name, from `names.csv`. People known by several names appear once per name,
/// so the last listed name is kept.
pub fn read_names(path: impl AsRef<Path>) -> Result<BTreeMap<String, String>, LoadError> {
    read_column(path, "name")
}

/// Identifier to Cricinfo key, from `people.csv`.
pub fn read_people(path: impl AsRef<Path>) -> Result<BTreeMap<String, u64>, LoadError> {
    read_column(path, "key_cricinfo")
}

/// Reads the `identifier` column and one other `column` of a register file into a map, skipping
/// records where the value is empty.
pub fn read_column<T: FromStr>(
    path: impl AsRef<Path>,
    column: &str,
) -> Result<BTreeMap<String, T>, LoadError> {
    let mut reader = CsvReader::open(path)?;
    let header = match reader.read() {
        None => return Ok(BTreeMap::default()),
        Some(header) => header?,
    };
    let find = |label: &str| {
        header
            .iter()
            .position(|heading| heading == label)
            .ok_or_else(|| LoadError::MissingColumn(label.into()))
    };
    let (key_col, value_col) = (find(IDENTIFIER)?, find(column)?);

    let mut map = BTreeMap::default();
    for (index, record) in reader.enumerate() {
        let record = record?;
        let malformed = || LoadError::MalformedLine {
            line: index + 2,
            content: record.join(","),
        };
        let key = record.get(key_col).ok_or_else(malformed)?;
        let value = record.get(value_col).map(String::as_str).unwrap_or_default();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        map.insert(key.clone(), value.parse().map_err(|_| malformed())?);
    }
    Ok(map)
}
