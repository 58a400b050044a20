// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! `git log` record parsing
//!
//! This module turns delimiter-separated `git log --pretty` output into
//! [`Commit`] values. Parsing is lenient: a record without a field delimiter
//! is malformed and is dropped rather than reported, since history metadata
//! is treated as best-effort input.
//!
//! # Example
//!
//! ```
//! use chronicle_git::parser::{RecordParser, parse_log_output};
//!
//! let parser = RecordParser::default()
//!     .with_field_delimiter('|')
//!     .with_record_delimiter(b'\n');
//! let commits = parse_log_output("abc|Valid\nnot-a-record\ndef|Also Valid\n", &parser);
//! assert_eq!(commits.len(), 2);
//! assert_eq!(commits[1].message(), "Also Valid");
//! ```

use std::borrow::Cow;
use std::io::{self, BufRead};
use std::iter::FusedIterator;

use chrono::DateTime;
use tracing::debug;

use crate::commit::Commit;

/// ASCII unit separator, placed between fields of one record
pub const FIELD_SEPARATOR: char = '\x1f';

/// NUL, which terminates each record under `git log -z`
///
/// git refuses to store NUL in commit messages or identities, so unlike any
/// printable or control character it cannot show up inside a record.
pub const RECORD_SEPARATOR: u8 = 0x00;

/// Which fields `git log` is asked to print for each commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Abbreviated hash and subject line
    #[default]
    Subject,
    /// Hash, strict ISO author date and author name on one header line,
    /// followed by the raw message
    Detailed,
}

impl LogFormat {
    /// The `--pretty=tformat:` placeholder string for this format
    ///
    /// Records are terminated by `-z`. The hash and date never contain the
    /// field separator and an author name never contains a newline, so each
    /// free-text field is the remainder of its line or record.
    #[must_use]
    pub fn pretty_format(self) -> &'static str {
        match self {
            Self::Subject => "%h%x1f%s",
            Self::Detailed => "%h%x1f%aI%x1f%an%n%B",
        }
    }
}

/// Parses single records into commits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordParser {
    format: LogFormat,
    field_delimiter: char,
    record_delimiter: u8,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(LogFormat::default())
    }
}

impl RecordParser {
    /// Create a parser for the control-character delimiters `git log` is
    /// configured with
    #[must_use]
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            field_delimiter: FIELD_SEPARATOR,
            record_delimiter: RECORD_SEPARATOR,
        }
    }

    /// Use a different field delimiter
    ///
    /// Only the first occurrence is split on, so a human-readable delimiter
    /// such as `|` may still appear inside the subject line.
    #[must_use]
    pub fn with_field_delimiter(mut self, delimiter: char) -> Self {
        self.field_delimiter = delimiter;
        self
    }

    /// Use a different record delimiter
    ///
    /// Any byte works, since records are split before they are decoded.
    #[must_use]
    pub fn with_record_delimiter(mut self, delimiter: u8) -> Self {
        self.record_delimiter = delimiter;
        self
    }

    /// The format this parser expects
    #[must_use]
    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// The byte that terminates each record
    #[must_use]
    pub fn record_delimiter(&self) -> u8 {
        self.record_delimiter
    }

    /// Parse one record, without its record delimiter
    ///
    /// Returns `None` for blank records and for records lacking the fields
    /// the format requires.
    #[must_use]
    pub fn parse(&self, record: &str) -> Option<Commit> {
        // Blank lines between line-oriented records belong to neither
        let record = record.trim_start_matches(['\r', '\n']);
        if record.is_empty() {
            return None;
        }

        let Some((hash, rest)) = record.split_once(self.field_delimiter) else {
            debug!(len = record.len(), "Skipping record without field delimiter");
            return None;
        };

        match self.format {
            LogFormat::Subject => Some(Commit::new(hash, rest.trim_end_matches(['\r', '\n']))),
            LogFormat::Detailed => self.parse_detailed(hash, rest),
        }
    }

    fn parse_detailed(&self, hash: &str, rest: &str) -> Option<Commit> {
        let Some((header, raw_message)) = rest.split_once('\n') else {
            debug!(hash, "Skipping detailed record without message");
            return None;
        };
        let Some((date, author)) = header.split_once(self.field_delimiter) else {
            debug!(hash, "Skipping detailed record with missing fields");
            return None;
        };

        let (subject, body) = split_message(raw_message);
        let mut commit = Commit::new(hash, subject);
        if !author.is_empty() {
            commit = commit.with_author(author);
        }
        match DateTime::parse_from_rfc3339(date.trim()) {
            Ok(date) => commit = commit.with_date(date),
            Err(e) => debug!(hash, date, error = %e, "Ignoring unparseable author date"),
        }
        if !body.is_empty() {
            commit = commit.with_body(body);
        }
        Some(commit)
    }
}

/// Split a raw commit message into subject and body the way git does
///
/// The subject is the first paragraph with its lines joined by spaces; the
/// body is everything after the blank line that ends it.
fn split_message(raw: &str) -> (String, String) {
    let mut lines = raw.lines().skip_while(|line| line.trim().is_empty());
    let subject = lines
        .by_ref()
        .take_while(|line| !line.trim().is_empty())
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join(" ");
    let body = lines
        .skip_while(|line| line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    (subject, body.trim_end().to_string())
}

/// Parse a complete, already buffered log
///
/// Records are split on the delimiter byte exactly as [`RecordReader`] splits
/// them, so both always agree.
#[must_use]
pub fn parse_log_output(output: impl AsRef<[u8]>, parser: &RecordParser) -> Vec<Commit> {
    // Reading from a byte slice cannot fail
    RecordReader::new(output.as_ref(), *parser)
        .filter_map(Result::ok)
        .collect()
}

/// Incremental record reader over any buffered byte source
///
/// Records are yielded as soon as their delimiter has been read, so memory
/// use is bounded by the largest single record no matter how much history
/// the source produces. A final record that is not followed by a delimiter
/// is still parsed once the source is exhausted.
pub struct RecordReader<R> {
    reader: R,
    parser: RecordParser,
    buf: Vec<u8>,
    skipped: usize,
    done: bool,
}

impl<R: BufRead> RecordReader<R> {
    /// Create a record reader
    pub fn new(reader: R, parser: RecordParser) -> Self {
        Self {
            reader,
            parser,
            buf: Vec::new(),
            skipped: 0,
            done: false,
        }
    }

    /// Number of non-blank records dropped as malformed so far
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = io::Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        let delimiter = self.parser.record_delimiter();

        while !self.done {
            self.buf.clear();
            match self.reader.read_until(delimiter, &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    if self.buf.last() == Some(&delimiter) {
                        self.buf.pop();
                    }
                    let record: Cow<'_, str> = String::from_utf8_lossy(&self.buf);
                    if let Some(commit) = self.parser.parse(&record) {
                        return Some(Ok(commit));
                    }
                    if !record.trim().is_empty() {
                        self.skipped += 1;
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        None
    }
}

impl<R: BufRead> FusedIterator for RecordReader<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;
    use std::io::{BufReader, Cursor, Read};

    fn pipe_parser() -> RecordParser {
        RecordParser::default()
            .with_field_delimiter('|')
            .with_record_delimiter(b'\n')
    }

    fn read_all<R: BufRead>(reader: RecordReader<R>) -> Vec<Commit> {
        reader.collect::<io::Result<Vec<_>>>().expect("read records")
    }

    /// A reader that hands out at most `chunk` bytes per call, like a pipe
    /// flushed at arbitrary points
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            let n = self.chunk.min(out.len()).min(self.data.len() - self.pos);
            out[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_parse_subject_record() {
        let parser = RecordParser::default();
        let commit = parser.parse("abc1234\x1ffeat: add parser").expect("parse");
        assert_eq!(commit, Commit::new("abc1234", "feat: add parser"));
    }

    #[test]
    fn test_parse_strips_leading_newlines() {
        let parser = RecordParser::default();
        let commit = parser.parse("\nabc\x1fmsg").expect("parse");
        assert_eq!(commit.hash(), "abc");
    }

    #[test]
    fn test_malformed_records_are_dropped_in_order() {
        let commits = parse_log_output("abc|Valid\nnot-a-record\ndef|Also Valid\n", &pipe_parser());
        assert_eq!(
            commits,
            vec![Commit::new("abc", "Valid"), Commit::new("def", "Also Valid")]
        );
    }

    #[test]
    fn test_empty_message_is_kept() {
        let commit = pipe_parser().parse("abc|").expect("parse");
        assert_eq!(commit, Commit::new("abc", ""));
    }

    #[test]
    fn test_delimiter_only_record_has_empty_hash_and_message() {
        let commit = pipe_parser().parse("|").expect("parse");
        assert_eq!(commit, Commit::new("", ""));
    }

    #[test]
    fn test_split_on_first_delimiter_only() {
        let commit = pipe_parser()
            .parse("h1|feat: msg | with | pipes")
            .expect("parse");
        assert_eq!(commit.message(), "feat: msg | with | pipes");
    }

    #[test]
    fn test_message_may_contain_control_field_delimiter() {
        let commit = RecordParser::default()
            .parse("h1\x1fodd\x1fsubject")
            .expect("parse");
        assert_eq!(commit.message(), "odd\x1fsubject");
    }

    #[test]
    fn test_blank_input_yields_nothing() {
        assert!(parse_log_output("", &pipe_parser()).is_empty());
        assert!(parse_log_output("\n", &pipe_parser()).is_empty());
    }

    #[test]
    fn test_last_record_without_terminator() {
        let commits = parse_log_output("h1|message", &pipe_parser());
        assert_eq!(commits, vec![Commit::new("h1", "message")]);
    }

    #[test]
    fn test_parse_detailed_record() {
        let parser = RecordParser::new(LogFormat::Detailed);
        let record = "abc\x1f2026-01-17T02:33:06+00:00\x1fJane Doe\nfix: edge case\n\nLonger body\n\nSigned-off-by: Jane\n";
        let commit = parser.parse(record).expect("parse");
        assert_eq!(commit.hash(), "abc");
        assert_eq!(commit.message(), "fix: edge case");
        assert_eq!(commit.author(), Some("Jane Doe"));
        assert_eq!(
            commit.date().map(|d| d.to_rfc3339()),
            Some("2026-01-17T02:33:06+00:00".to_string())
        );
        assert_eq!(
            commit.body(),
            Some("Longer body\n\nSigned-off-by: Jane")
        );
    }

    #[test]
    fn test_parse_detailed_empty_body_and_bad_date() {
        let parser = RecordParser::new(LogFormat::Detailed);
        let commit = parser
            .parse("abc\x1fyesterday\x1fJane\nsubject\n")
            .expect("parse");
        assert_eq!(commit.message(), "subject");
        assert!(commit.date().is_none());
        assert!(commit.body().is_none());
    }

    #[test]
    fn test_parse_detailed_empty_message() {
        let parser = RecordParser::new(LogFormat::Detailed);
        let commit = parser
            .parse("abc\x1f2026-01-17T02:33:06+00:00\x1fJane\n")
            .expect("parse");
        assert_eq!(commit.message(), "");
        assert!(commit.body().is_none());
    }

    #[test]
    fn test_parse_detailed_missing_fields_is_malformed() {
        let parser = RecordParser::new(LogFormat::Detailed);
        assert!(parser.parse("abc\x1fJane\x1fsubject").is_none());
        assert!(parser.parse("abc\x1fJane\nsubject").is_none());
    }

    #[test]
    fn test_parse_detailed_separators_inside_free_text() {
        let parser = RecordParser::new(LogFormat::Detailed);
        let record = "abc\x1f2026-01-17T02:33:06+00:00\x1fOdd\x1fName\nodd\x1esub\x1fject\n\nbody\x1fwith\x1fseparators\n";
        let commit = parser.parse(record).expect("parse");
        assert_eq!(commit.author(), Some("Odd\x1fName"));
        assert_eq!(commit.message(), "odd\x1esub\x1fject");
        assert_eq!(commit.body(), Some("body\x1fwith\x1fseparators"));
    }

    #[test]
    fn test_parse_detailed_joins_first_paragraph() {
        let parser = RecordParser::new(LogFormat::Detailed);
        let record = "abc\x1f2026-01-17T02:33:06+00:00\x1fJane\n\nwrapped  \nsubject\n\n\nbody\n";
        let commit = parser.parse(record).expect("parse");
        assert_eq!(commit.message(), "wrapped subject");
        assert_eq!(commit.body(), Some("body"));
    }

    #[test]
    fn test_record_reader_streams_git_output() {
        let raw = "a1\x1ffirst\0b2\x1fsecond\0c3\x1f\0";
        let reader = RecordReader::new(Cursor::new(raw), RecordParser::default());
        assert_eq!(
            read_all(reader),
            vec![
                Commit::new("a1", "first"),
                Commit::new("b2", "second"),
                Commit::new("c3", ""),
            ]
        );
    }

    #[test]
    fn test_record_separator_inside_subject_is_payload() {
        let raw = "a2\x1fevil\x1ephantom\x1fcommit\0a1\x1ffirst\0";
        let commits = parse_log_output(raw, &RecordParser::default());
        assert_eq!(
            commits,
            vec![
                Commit::new("a2", "evil\x1ephantom\x1fcommit"),
                Commit::new("a1", "first"),
            ]
        );
    }

    #[test]
    fn test_record_reader_survives_one_byte_chunks() {
        let raw = "a1\x1ffirst\0junk\0b2\x1fs\u{e9}cond \u{2713}\0";
        let source = Trickle {
            data: raw.as_bytes().to_vec(),
            pos: 0,
            chunk: 1,
        };
        let mut reader = RecordReader::new(
            BufReader::with_capacity(1, source),
            RecordParser::default(),
        );
        let commits: Vec<Commit> = reader.by_ref().map(|c| c.expect("record")).collect();
        assert_eq!(
            commits,
            vec![
                Commit::new("a1", "first"),
                Commit::new("b2", "s\u{e9}cond \u{2713}")
            ]
        );
        assert_eq!(reader.skipped(), 1);
    }

    #[test]
    fn test_record_reader_yields_before_source_is_exhausted() {
        let raw = "a1\x1ffirst\0b2\x1fsecond";
        let mut reader = RecordReader::new(Cursor::new(raw), RecordParser::default());
        let first = reader.next().expect("first").expect("ok");
        assert_eq!(first.hash(), "a1");
        let second = reader.next().expect("second").expect("ok");
        assert_eq!(second.message(), "second");
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_record_reader_replaces_invalid_utf8() {
        let raw: &[u8] = b"a1\x1fbad \xff byte\0";
        let reader = RecordReader::new(Cursor::new(raw), RecordParser::default());
        let commits = read_all(reader);
        assert_eq!(commits[0].message(), "bad \u{fffd} byte");
    }

    #[test]
    fn test_record_reader_reports_io_errors() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("pipe closed"))
            }
        }

        let mut reader = RecordReader::new(BufReader::new(Broken), RecordParser::default());
        assert!(matches!(reader.next(), Some(Err(_))));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_non_ascii_record_delimiter_splits_bytes() {
        let parser = pipe_parser().with_record_delimiter(0xff);
        let raw: &[u8] = b"a|one\xffb|caf\xc3\xa9";
        assert_eq!(
            parse_log_output(raw, &parser),
            vec![Commit::new("a", "one"), Commit::new("b", "caf\u{e9}")]
        );

        // U+00FF is encoded as C3 BF and contains no 0xFF byte
        assert_eq!(
            parse_log_output("a|one\u{ff}b|two", &parser),
            vec![Commit::new("a", "one\u{ff}b|two")]
        );
    }

    #[test]
    fn test_pretty_formats() {
        assert_eq!(LogFormat::Subject.pretty_format(), "%h%x1f%s");
        assert_eq!(LogFormat::Detailed.pretty_format(), "%h%x1f%aI%x1f%an%n%B");
    }
}
