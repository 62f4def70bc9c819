//! Plain-text file formats around the simulation: static and dynamic input files,
//! trajectory/interval/summary output and the Ovito export.

pub mod input;
pub mod ovito;
pub mod output;

pub use input::{read_dynamic, read_static, write_dynamic, write_static};
pub use ovito::export_ovito;
pub use output::WriterSink;

use crate::error::{Error, Result};
use std::io::{BufRead, Lines};
use std::str::FromStr;

pub const STATIC_FILE: &str = "static.dat";
pub const DYNAMIC_FILE: &str = "dynamic.dat";
pub const OUTPUT_FILE: &str = "output.dat";
pub const INTERVALS_FILE: &str = "i_t_fp_pre_temp.csv";
pub const SUMMARY_FILE: &str = "time_to_eq.csv";
pub const OVITO_FILE: &str = "graphics.xyz";

/// Line-oriented reader that remembers where it is, for error messages.
pub(crate) struct LineReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    /// Current (1-based) line number.
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn try_next_line(&mut self) -> Result<Option<String>> {
        match self.lines.next() {
            Some(l) => {
                self.line += 1;
                Ok(Some(l?))
            }
            None => Ok(None),
        }
    }

    pub(crate) fn next_line(&mut self, what: &str) -> Result<String> {
        match self.try_next_line()? {
            Some(l) => Ok(l),
            None => Err(Error::Format {
                line: self.line + 1,
                msg: format!("unexpected end of file, expected {what}"),
            }),
        }
    }

    /// First whitespace-separated token of the next line.
    pub(crate) fn next_value<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let line = self.next_line(what)?;
        parse_token(line.split_whitespace().next(), what, self.line)
    }
}

pub(crate) fn parse_token<T: FromStr>(token: Option<&str>, what: &str, line: usize) -> Result<T> {
    let token = token.ok_or_else(|| Error::Format {
        line,
        msg: format!("missing {what}"),
    })?;
    token.parse().map_err(|_| Error::Format {
        line,
        msg: format!("{what} must be a number, got '{token}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_reader_tracks_lines() -> Result<()> {
        let mut r = LineReader::new("3\n  2.5 extra\n".as_bytes());
        assert_eq!(r.next_value::<usize>("N")?, 3);
        assert_eq!(r.next_value::<f64>("mass")?, 2.5);
        assert_eq!(r.line(), 2);
        match r.next_value::<f64>("speed") {
            Err(Error::Format { line, msg }) => {
                assert_eq!(line, 3);
                assert!(msg.contains("speed"));
            }
            other => panic!("expected a format error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn bad_numbers_are_format_errors() {
        let mut r = LineReader::new("abc\n\n".as_bytes());
        let err = r.next_value::<f64>("mass").unwrap_err();
        assert!(err.to_string().contains("line 1"));
        let err = r.next_value::<f64>("speed").unwrap_err();
        assert!(err.to_string().contains("missing speed"));
    }
}
