//! Incremental `name;value\n` tokenizer over arbitrarily split chunks.

use crate::error::{BrcError, Result};
use crate::parse::{is_well_formed, parse_value_fast};
use crate::table::AggregationTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Name,
    Value,
}

/// Splits successive chunks into records and folds them into a table.
///
/// A token cut by a chunk boundary is kept in `remainder` and completed by the
/// next chunk, so splitting the input anywhere yields the same records. Nothing
/// borrowed from a chunk outlives the `feed` call that received it.
#[derive(Debug)]
pub struct ChunkTokenizer {
    scan: Scan,
    remainder: Vec<u8>,
    last_name: Vec<u8>,
    max_token_len: usize,
}

impl ChunkTokenizer {
    pub fn new(max_token_len: usize) -> Self {
        Self {
            scan: Scan::Name,
            remainder: Vec::with_capacity(128),
            last_name: Vec::with_capacity(128),
            max_token_len,
        }
    }

    /// True when no partial record is buffered.
    pub fn is_idle(&self) -> bool {
        self.scan == Scan::Name && self.remainder.is_empty()
    }

    pub fn feed(&mut self, chunk: &[u8], table: &mut AggregationTable) -> Result<()> {
        let mut start = 0;
        while start < chunk.len() {
            let rest = &chunk[start..];
            match self.scan {
                Scan::Name => {
                    let Some(idx) = rest.iter().position(|&b| b == b';' || b == b'\n') else {
                        return self.carry(rest);
                    };
                    if rest[idx] == b'\n' {
                        if !self.is_blank_line(&rest[..idx]) {
                            return Err(self.missing_value(&rest[..idx]));
                        }
                        self.remainder.clear();
                        start += idx + 1;
                        continue;
                    }
                    self.take_name(&rest[..idx])?;
                    self.scan = Scan::Value;
                    start += idx + 1;
                }
                Scan::Value => {
                    let Some(idx) = rest.iter().position(|&b| b == b'\n') else {
                        return self.carry(rest);
                    };
                    self.take_value(&rest[..idx], table)?;
                    self.scan = Scan::Name;
                    start += idx + 1;
                }
            }
        }
        Ok(())
    }

    /// Ends the stream. A value cut off by end of input is flushed as if a
    /// newline followed it; a dangling name without `;` is an error.
    pub fn finish(&mut self, table: &mut AggregationTable) -> Result<()> {
        match self.scan {
            Scan::Name if self.is_blank_line(&[]) => {
                self.remainder.clear();
                Ok(())
            }
            Scan::Name => Err(self.missing_value(&[])),
            Scan::Value => {
                self.take_value(&[], table)?;
                self.scan = Scan::Name;
                Ok(())
            }
        }
    }

    /// Empty lines (or a lone `\r`) between records are skipped.
    fn is_blank_line(&self, part: &[u8]) -> bool {
        matches!(
            (self.remainder.as_slice(), part),
            ([], []) | ([], [b'\r']) | ([b'\r'], [])
        )
    }

    fn take_name(&mut self, part: &[u8]) -> Result<()> {
        self.check_len(self.remainder.len() + part.len())?;
        self.last_name.clear();
        self.last_name.extend_from_slice(&self.remainder);
        self.last_name.extend_from_slice(part);
        self.remainder.clear();
        Ok(())
    }

    fn take_value(&mut self, part: &[u8], table: &mut AggregationTable) -> Result<()> {
        self.check_len(self.remainder.len() + part.len())?;
        let token = if self.remainder.is_empty() {
            part
        } else {
            self.remainder.extend_from_slice(part);
            &self.remainder[..]
        };
        let token = token.strip_suffix(b"\r").unwrap_or(token);
        if !is_well_formed(token) {
            return Err(BrcError::malformed(&self.last_name, token));
        }
        table.update(&self.last_name, parse_value_fast(token));
        self.remainder.clear();
        Ok(())
    }

    fn carry(&mut self, tail: &[u8]) -> Result<()> {
        self.check_len(self.remainder.len() + tail.len())?;
        self.remainder.extend_from_slice(tail);
        Ok(())
    }

    fn missing_value(&mut self, part: &[u8]) -> BrcError {
        if let Err(err) = self.check_len(self.remainder.len() + part.len()) {
            return err;
        }
        self.remainder.extend_from_slice(part);
        let err = BrcError::malformed(&self.remainder, b"");
        self.remainder.clear();
        err
    }

    #[inline]
    fn check_len(&self, len: usize) -> Result<()> {
        if len > self.max_token_len {
            Err(BrcError::TokenTooLarge { len, limit: self.max_token_len })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(chunks: &[&[u8]]) -> Result<AggregationTable> {
        let mut table = AggregationTable::new();
        let mut tokenizer = ChunkTokenizer::new(64);
        for chunk in chunks {
            tokenizer.feed(chunk, &mut table)?;
        }
        tokenizer.finish(&mut table)?;
        Ok(table)
    }

    #[test]
    fn whole_chunk() {
        let table = run(&[b"Paris;12.3\nParis;9.8\nLondon;5.0\n"]).unwrap();
        assert_eq!(table.len(), 2);
        let paris = table.get(b"Paris").unwrap();
        assert_eq!((paris.min, paris.max, paris.count), (9.8, 12.3, 2));
        assert_eq!(table.get(b"London").unwrap().sum, 5.0);
    }

    #[test]
    fn boundary_inside_name() {
        let table = run(&[b"Par", b"is;1.0\n"]).unwrap();
        assert_eq!(table.get(b"Paris").unwrap().count, 1);
    }

    #[test]
    fn boundary_inside_value() {
        let table = run(&[b"Paris;-1", b"2.", b"3\n"]).unwrap();
        assert_eq!(table.get(b"Paris").unwrap().min, -12.3);
    }

    #[test]
    fn boundary_on_delimiters() {
        let table = run(&[b"Paris", b";", b"1.5", b"\n", b"Oslo;2.5\n"]).unwrap();
        assert_eq!(table.get(b"Paris").unwrap().sum, 1.5);
        assert_eq!(table.get(b"Oslo").unwrap().sum, 2.5);
    }

    #[test]
    fn token_spanning_many_chunks_is_appended() {
        let input = b"Ouagadougou;-10.4\n";
        let chunks: Vec<&[u8]> = input.chunks(1).collect();
        let table = run(&chunks).unwrap();
        assert_eq!(table.get(b"Ouagadougou").unwrap().max, -10.4);
    }

    #[test]
    fn missing_trailing_newline_is_flushed() {
        let table = run(&[b"A;1.0\nA;3.0"]).unwrap();
        assert_eq!(table.get(b"A").unwrap().count, 2);
        assert_eq!(table.get(b"A").unwrap().max, 3.0);
    }

    #[test]
    fn crlf_line_endings() {
        let table = run(&[b"A;1.0\r\nB;2.0\r", b"\n"]).unwrap();
        assert_eq!(table.get(b"A").unwrap().sum, 1.0);
        assert_eq!(table.get(b"B").unwrap().sum, 2.0);
    }

    #[test]
    fn empty_input() {
        let table = run(&[]).unwrap();
        assert!(table.is_empty());
        let table = run(&[b""]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn malformed_value_is_reported_with_name() {
        match run(&[b"A;1.0\nB;", b"1.25\n"]) {
            Err(BrcError::MalformedValue { name, value }) => {
                assert_eq!(name, "B");
                assert_eq!(value, "1.25");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn line_without_separator() {
        assert!(matches!(
            run(&[b"A;1.0\nnoseparator\nB;1.0\n"]),
            Err(BrcError::MalformedValue { .. })
        ));
        assert!(matches!(run(&[b"A;1.0\nB"]), Err(BrcError::MalformedValue { .. })));
        assert!(matches!(run(&[b"A;"]), Err(BrcError::MalformedValue { .. })));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let table = run(&[b"A;1.0\n\nB;2.0\n\n"]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records(), 2);

        let table = run(&[b"A;1.0\r\n\r", b"\nB;2.0\r\n\r"]).unwrap();
        assert_eq!(table.get(b"B").unwrap().sum, 2.0);

        let input = b"\nA;1.0\n\n\nA;3.0\n\n";
        let chunks: Vec<&[u8]> = input.chunks(1).collect();
        assert_eq!(run(&chunks).unwrap().get(b"A").unwrap().count, 2);
    }

    #[test]
    fn name_with_newline_still_fails() {
        match run(&[b"A;1.0\nxy", b"z\nB;1.0\n"]) {
            Err(BrcError::MalformedValue { name, value }) => {
                assert_eq!(name, "xyz");
                assert_eq!(value, "");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn oversized_values() {
        let mut input = b"A;".to_vec();
        input.extend(std::iter::repeat(b'1').take(70));
        input.extend_from_slice(b".0\n");
        for trailing_newline in [true, false] {
            let input = if trailing_newline { &input[..] } else { &input[..input.len() - 1] };
            for size in [1, 7, 64, input.len()] {
                let chunks: Vec<&[u8]> = input.chunks(size).collect();
                assert!(
                    matches!(run(&chunks), Err(BrcError::TokenTooLarge { limit: 64, .. })),
                    "chunk size {size}, newline {trailing_newline}"
                );
            }
        }
    }

    #[test]
    fn oversized_name_without_separator() {
        let mut input = vec![b'x'; 70];
        input.push(b'\n');
        for size in [1, 7, input.len()] {
            let chunks: Vec<&[u8]> = input.chunks(size).collect();
            assert!(matches!(run(&chunks), Err(BrcError::TokenTooLarge { limit: 64, .. })));
        }
    }

    #[test]
    fn oversized_tokens() {
        let long = vec![b'x'; 65];
        let mut input = long.clone();
        input.extend_from_slice(b";1.0\n");
        assert!(matches!(run(&[&input]), Err(BrcError::TokenTooLarge { limit: 64, .. })));

        let chunks: Vec<&[u8]> = input.chunks(10).collect();
        assert!(matches!(run(&chunks), Err(BrcError::TokenTooLarge { limit: 64, .. })));
    }

    #[test]
    fn idle_only_between_records() {
        let mut table = AggregationTable::new();
        let mut tokenizer = ChunkTokenizer::new(64);
        assert!(tokenizer.is_idle());
        tokenizer.feed(b"A;1", &mut table).unwrap();
        assert!(!tokenizer.is_idle());
        tokenizer.feed(b".0\n", &mut table).unwrap();
        assert!(tokenizer.is_idle());
    }
}
