//! Whole-file label reading and writing.
//!
//! Files hold one record per line. Reading attempts a decode per non-blank
//! line and stops at the first line that fails; a missing trailing newline
//! never yields an extra record. Writing overwrites the file in place (no
//! temp file + rename), so a crash mid-write can leave it truncated.

use std::fs;
use std::path::Path;

use log::warn;

use super::{LabelCodec, LabelParseError, LabelRecord};
use crate::error::RegionlabError;

/// Records decoded from one label file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedLabels {
    pub records: Vec<LabelRecord>,
    /// 1-based line number and cause of the line that ended the read early.
    pub stopped_at: Option<(usize, LabelParseError)>,
}

/// Decodes label file content until the first line that fails.
pub fn decode_records(codec: &LabelCodec, content: &str, source: &Path) -> DecodedLabels {
    let mut decoded = DecodedLabels::default();

    for (line_idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match codec.decode(line) {
            Ok(record) => decoded.records.push(record),
            Err(err) => {
                let line_num = line_idx + 1;
                warn!(
                    "{}:{}: {}; ignoring this and any later lines",
                    source.display(),
                    line_num,
                    err
                );
                decoded.stopped_at = Some((line_num, err));
                break;
            }
        }
    }

    decoded
}

/// Reads and decodes a label file.
pub fn read_label_file(codec: &LabelCodec, path: &Path) -> Result<DecodedLabels, RegionlabError> {
    let content = fs::read_to_string(path).map_err(|source| RegionlabError::LabelRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_records(codec, &content, path))
}

/// Encodes records as label file content, one newline-terminated line each.
pub fn encode_records<'a>(
    codec: &LabelCodec,
    records: impl IntoIterator<Item = &'a LabelRecord>,
) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&codec.encode(record));
        out.push('\n');
    }
    out
}

/// Overwrites `path` with the encoded records.
pub fn write_label_file<'a>(
    codec: &LabelCodec,
    path: &Path,
    records: impl IntoIterator<Item = &'a LabelRecord>,
) -> Result<(), RegionlabError> {
    let content = encode_records(codec, records);
    fs::write(path, content).map_err(|source| RegionlabError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::LabelSchema;

    #[test]
    fn missing_trailing_newline_adds_no_record() {
        let codec = LabelCodec::new(LabelSchema::Normalized);
        let content = "0 0.5 0.5 0.1 0.1\n1 0.25 0.25 0.2 0.2";
        let decoded = decode_records(&codec, content, Path::new("a.txt"));
        assert_eq!(decoded.records.len(), 2);
        assert!(decoded.stopped_at.is_none());
    }

    #[test]
    fn trailing_blank_lines_are_not_records() {
        let codec = LabelCodec::new(LabelSchema::Normalized);
        let content = "0 0.5 0.5 0.1 0.1\n\n   \n";
        let decoded = decode_records(&codec, content, Path::new("a.txt"));
        assert_eq!(decoded.records.len(), 1);
    }

    #[test]
    fn read_stops_at_first_bad_line() {
        let codec = LabelCodec::new(LabelSchema::Normalized);
        let content = "0 0.5 0.5 0.1 0.1\n1 0.5\n2 0.5 0.5 0.1 0.1\n";
        let decoded = decode_records(&codec, content, Path::new("a.txt"));
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(
            decoded.stopped_at,
            Some((
                2,
                LabelParseError::TooFewFields {
                    expected: 5,
                    found: 2
                }
            ))
        );
    }

    #[test]
    fn write_then_read_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("labels.txt");
        let codec = LabelCodec::new(LabelSchema::Normalized);
        let decoded = decode_records(&codec, "3 0.1 0.2 0.3 0.4\n", &path);

        write_label_file(&codec, &path, &decoded.records).expect("write labels");
        assert_eq!(
            fs::read_to_string(&path).expect("read labels"),
            "3 0.1 0.2 0.3 0.4\n"
        );

        let reread = read_label_file(&codec, &path).expect("read labels");
        assert_eq!(reread.records, decoded.records);
    }

    #[test]
    fn read_missing_file_is_an_error() {
        let codec = LabelCodec::new(LabelSchema::Corner);
        let err = read_label_file(&codec, Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, RegionlabError::LabelRead { .. }));
    }
}
