//! Utilities for working with CSV files.
//!
//! Only the subset of CSV that Cricsheet publishes is handled: comma separated fields, optionally
//! enclosed in double quotes, with `""` escaping a quote inside a quoted field. A quoted field may
//! span several lines.

use std::borrow::Cow;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;

pub struct CsvWriter {
    writer: BufWriter<File>,
}
impl CsvWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer })
    }

    pub fn append<R>(&mut self, record: R) -> Result<(), io::Error>
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        let mut first = true;
        for datum in record.into_iter() {
            if first {
                first = false;
            } else {
                self.writer.write_all(b",")?;
            }
            self.writer.write_all(quote(datum.as_ref()).as_bytes())?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), io::Error> {
        self.writer.flush()
    }
}

pub struct CsvReader {
    lines: Lines<BufReader<File>>,
}
impl CsvReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::open(path)?;
        let lines = BufReader::new(file).lines();
        Ok(Self { lines })
    }

    pub fn read(&mut self) -> Option<Result<Vec<String>, io::Error>> {
        let mut record = match self.lines.next()? {
            Ok(line) => line,
            Err(err) => return Some(Err(err)),
        };
        loop {
            let (fields, open) = split_record(&record);
            if !open {
                return Some(Ok(fields));
            }
            match self.lines.next() {
                Some(Ok(line)) => {
                    record.push('\n');
                    record.push_str(&line);
                }
                Some(Err(err)) => return Some(Err(err)),
                None => return Some(Ok(fields)),
            }
        }
    }
}

impl Iterator for CsvReader {
    type Item = Result<Vec<String>, io::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read()
    }
}

/// Splits a single CSV line into its fields.
pub fn split(line: &str) -> Vec<String> {
    split_record(line).0
}

/// Splits a record into its fields, also returning whether it ends inside a quoted field.
fn split_record(line: &str) -> (Vec<String>, bool) {
    let mut fields = vec![];
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, quoted) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', true) => quoted = false,
            ('"', false) if field.is_empty() => quoted = true,
            (',', false) => fields.push(std::mem::take(&mut field)),
            (c, _) => field.push(c),
        }
    }
    fields.push(field);
    (fields, quoted)
}

fn quote(datum: &str) -> Cow<str> {
    if datum.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", datum.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(datum)
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use super::*;

    #[test]
    fn split_plain() {
        assert_eq!(vec!["a", "b", "", "d"], split("a,b,,d"));
        assert_eq!(vec![""], split(""));
    }

    #[test]
    fn split_quoted() {
        assert_eq!(
            vec!["4c5e", "Smith, J", "say \"hi\""],
            split("4c5e,\"Smith, J\",\"say \"\"hi\"\"\"")
        );
    }

    #[test]
    fn quote_when_needed() {
        assert_eq!("plain", quote("plain"));
        assert_eq!("\"a,b\"", quote("a,b"));
        assert_eq!("\"a \"\"b\"\"\"", quote("a \"b\""));
    }

    #[test]
    fn open_quote_spans_lines() {
        assert_eq!((vec![String::from("a"), String::from("b")], true), split_record("a,\"b"));
        assert_eq!((vec![String::from("a"), String::from("b\n\"c")], false), split_record("a,\"b\n\"\"c\""));
    }

    #[test]
    fn round_trip_multiline_fields() {
        let path = env::temp_dir().join(format!("googly_csv_{}.csv", std::process::id()));
        let records = [
            vec!["id", "venue", "event"],
            vec!["1", "Lord's,\nLondon", "The \"Ashes\"\n\nsecond line"],
            vec!["2", "Eden Gardens", ""],
        ];
        let mut writer = CsvWriter::create(&path).unwrap();
        for record in &records {
            writer.append(record).unwrap();
        }
        writer.flush().unwrap();
        drop(writer);

        let read = CsvReader::open(&path)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(records.len(), read.len());
        for (expected, actual) in records.iter().zip(&read) {
            assert_eq!(expected, actual);
        }
    }
}
