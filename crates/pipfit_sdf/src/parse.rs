//! Recursive-descent reader over the SDF token stream.

use crate::error::SdfError;
use crate::lexer::{Lexer, Token};
use crate::{SdfCell, SdfFile};
use pipfit_common::{DelayTriple, EdgeDelays};

pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
        }
    }

    fn syntax(&self, pos: usize, message: impl Into<String>) -> SdfError {
        SdfError::Syntax {
            pos,
            message: message.into(),
        }
    }

    fn next(&mut self) -> Result<(usize, Token), SdfError> {
        self.lexer.next_token()?.ok_or(SdfError::UnexpectedEof)
    }

    fn peek(&mut self) -> Result<Token, SdfError> {
        self.lexer.peek_token()?.ok_or(SdfError::UnexpectedEof)
    }

    fn expect_lparen(&mut self) -> Result<(), SdfError> {
        match self.next()? {
            (_, Token::LParen) => Ok(()),
            (pos, t) => Err(self.syntax(pos, format!("expected '(', got {t:?}"))),
        }
    }

    fn expect_rparen(&mut self) -> Result<(), SdfError> {
        match self.next()? {
            (_, Token::RParen) => Ok(()),
            (pos, t) => Err(self.syntax(pos, format!("expected ')', got {t:?}"))),
        }
    }

    fn read_atom(&mut self) -> Result<(usize, String), SdfError> {
        match self.next()? {
            (pos, Token::Atom(s)) => Ok((pos, s)),
            (pos, t) => Err(self.syntax(pos, format!("expected a name, got {t:?}"))),
        }
    }

    /// Reads a `(` followed by a keyword, returning the keyword upper-cased.
    fn open_form(&mut self) -> Result<String, SdfError> {
        self.expect_lparen()?;
        let (_, keyword) = self.read_atom()?;
        Ok(keyword.to_ascii_uppercase())
    }

    /// Consumes tokens up to and including the `)` closing the current form.
    fn skip_form(&mut self) -> Result<(), SdfError> {
        let mut depth = 1u32;
        while depth > 0 {
            match self.next()?.1 {
                Token::LParen => depth += 1,
                Token::RParen => depth -= 1,
                Token::Atom(_) => {}
            }
        }
        Ok(())
    }

    /// Collects atoms up to the closing `)` of the current form.
    fn rest_atoms(&mut self) -> Result<Vec<String>, SdfError> {
        let mut atoms = Vec::new();
        loop {
            match self.next()? {
                (_, Token::RParen) => return Ok(atoms),
                (_, Token::Atom(s)) => atoms.push(s),
                (pos, Token::LParen) => {
                    return Err(self.syntax(pos, "unexpected '(' in header value"));
                }
            }
        }
    }

    pub(crate) fn parse(mut self) -> Result<SdfFile, SdfError> {
        let keyword = self.open_form()?;
        if keyword != "DELAYFILE" {
            return Err(self.syntax(0, format!("expected DELAYFILE, got {keyword}")));
        }

        let mut file = SdfFile {
            timescale_ps: 1000.0,
            ..SdfFile::default()
        };

        while self.peek()? != Token::RParen {
            match self.open_form()?.as_str() {
                "DESIGN" => {
                    let atoms = self.rest_atoms()?;
                    file.design = Some(unquote(&atoms.join(" ")).to_string());
                }
                "TIMESCALE" => {
                    let atoms = self.rest_atoms()?;
                    file.timescale_ps = parse_timescale(&atoms.concat())?;
                }
                "CELL" => {
                    let cell = self.parse_cell(file.timescale_ps)?;
                    file.cells.push(cell);
                }
                _ => self.skip_form()?,
            }
        }
        self.expect_rparen()?;

        match self.lexer.next_token()? {
            None => Ok(file),
            Some((pos, t)) => Err(self.syntax(pos, format!("trailing {t:?} after DELAYFILE"))),
        }
    }

    fn parse_cell(&mut self, scale: f64) -> Result<SdfCell, SdfError> {
        let mut cell = SdfCell::default();
        while self.peek()? != Token::RParen {
            match self.open_form()?.as_str() {
                "CELLTYPE" => {
                    let atoms = self.rest_atoms()?;
                    cell.celltype = unquote(&atoms.join(" ")).to_string();
                }
                "INSTANCE" => {
                    let atoms = self.rest_atoms()?;
                    let path = atoms.join(" ");
                    cell.instance = match path.as_str() {
                        "" | "*" => None,
                        p => Some(unquote(p).to_string()),
                    };
                }
                "DELAY" => self.parse_delay(&mut cell, scale)?,
                _ => self.skip_form()?,
            }
        }
        self.expect_rparen()?;
        Ok(cell)
    }

    fn parse_delay(&mut self, cell: &mut SdfCell, scale: f64) -> Result<(), SdfError> {
        while self.peek()? != Token::RParen {
            match self.open_form()?.as_str() {
                "ABSOLUTE" | "INCREMENT" => {
                    while self.peek()? != Token::RParen {
                        match self.open_form()?.as_str() {
                            "INTERCONNECT" => self.parse_interconnect(cell, scale)?,
                            _ => self.skip_form()?,
                        }
                    }
                    self.expect_rparen()?;
                }
                _ => self.skip_form()?,
            }
        }
        self.expect_rparen()
    }

    fn parse_interconnect(&mut self, cell: &mut SdfCell, scale: f64) -> Result<(), SdfError> {
        let (_, from) = self.read_atom()?;
        let (_, to) = self.read_atom()?;
        let mut values = Vec::new();
        loop {
            match self.next()? {
                (_, Token::RParen) => break,
                (_, Token::LParen) => values.push(self.parse_value()?),
                (pos, t) => {
                    return Err(self.syntax(pos, format!("expected a delay value, got {t:?}")));
                }
            }
        }
        let edges = match values.as_slice() {
            [] => {
                return Err(self.syntax(
                    self.lexer.pos(),
                    format!("INTERCONNECT {from} {to} has no delay value"),
                ));
            }
            [both] => EdgeDelays::new(*both, *both),
            [rise, fall, ..] => EdgeDelays::new(*rise, *fall),
        };
        let edges = EdgeDelays::new(edges.rising.scaled(scale), edges.falling.scaled(scale));
        cell.interconnects.insert((from, to), edges);
        Ok(())
    }

    /// Parses the inside of a delay value after its `(`.
    fn parse_value(&mut self) -> Result<DelayTriple, SdfError> {
        let (pos, text) = match self.next()? {
            (_, Token::RParen) => return Ok(DelayTriple::default()),
            (pos, Token::Atom(s)) => (pos, s),
            (pos, t) => return Err(self.syntax(pos, format!("expected a number, got {t:?}"))),
        };
        self.expect_rparen()?;
        parse_triple(&text).ok_or(SdfError::BadNumber { pos, text })
    }
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

/// Parses `v`, `min:typ:max` or a partial triple such as `:5:`.
///
/// Missing corners borrow the nearest given one (typ, then max, then min).
fn parse_triple(text: &str) -> Option<DelayTriple> {
    let parts: Vec<&str> = text.split(':').collect();
    let field = |s: &str| -> Option<Option<f64>> {
        if s.is_empty() {
            Some(None)
        } else {
            s.parse::<f64>().ok().map(Some)
        }
    };
    match parts.as_slice() {
        [v] => field(v)?.map(DelayTriple::uniform),
        [min, typ, max] => {
            let (min, typ, max) = (field(min)?, field(typ)?, field(max)?);
            let fallback = typ.or(max).or(min)?;
            Some(DelayTriple::new(
                min.unwrap_or(fallback),
                typ.unwrap_or(fallback),
                max.unwrap_or(fallback),
            ))
        }
        _ => None,
    }
}

/// Converts a `TIMESCALE` value such as `1ps`, `100 ps` or `1.0ns` into
/// picoseconds per unit.
fn parse_timescale(text: &str) -> Result<f64, SdfError> {
    let bad = || SdfError::BadTimescale(text.to_string());
    let split = text
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(bad)?;
    let (number, unit) = text.split_at(split);
    let number: f64 = number.trim().parse().map_err(|_| bad())?;
    let unit_ps = match unit.to_ascii_lowercase().as_str() {
        "s" => 1e12,
        "ms" => 1e9,
        "us" => 1e6,
        "ns" => 1e3,
        "ps" => 1.0,
        "fs" => 1e-3,
        _ => return Err(bad()),
    };
    Ok(number * unit_ps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<SdfFile, SdfError> {
        Parser::new(input).parse()
    }

    fn wrap(body: &str) -> String {
        format!(
            "(DELAYFILE (TIMESCALE 1ps) (CELL (CELLTYPE \"top\") (INSTANCE) (DELAY (ABSOLUTE {body}))))"
        )
    }

    fn only_entry(sdf: &SdfFile) -> ((String, String), EdgeDelays) {
        let (k, v) = sdf.cells[0].interconnects.iter().next().unwrap();
        (k.clone(), *v)
    }

    #[test]
    fn triple_forms() {
        assert_eq!(parse_triple("5"), Some(DelayTriple::uniform(5.0)));
        assert_eq!(
            parse_triple("1:2:3"),
            Some(DelayTriple::new(1.0, 2.0, 3.0))
        );
        assert_eq!(parse_triple(":4:"), Some(DelayTriple::uniform(4.0)));
        assert_eq!(
            parse_triple("1::3"),
            Some(DelayTriple::new(1.0, 3.0, 3.0))
        );
        assert_eq!(parse_triple("::"), None);
        assert_eq!(parse_triple("1:2"), None);
        assert_eq!(parse_triple("x"), None);
    }

    #[test]
    fn timescales() {
        assert_eq!(parse_timescale("1ps").unwrap(), 1.0);
        assert_eq!(parse_timescale("1ns").unwrap(), 1000.0);
        assert_eq!(parse_timescale("100ps").unwrap(), 100.0);
        assert_eq!(parse_timescale("1.0NS").unwrap(), 1000.0);
        assert!(parse_timescale("10").is_err());
        assert!(parse_timescale("1yr").is_err());
    }

    #[test]
    fn interconnect_rise_fall() {
        let sdf = parse(&wrap("(INTERCONNECT u0/Q u1/A (5:5:5) (7:7:7))")).unwrap();
        let ((from, to), d) = only_entry(&sdf);
        assert_eq!(from, "u0/Q");
        assert_eq!(to, "u1/A");
        assert_eq!(d.rising, DelayTriple::uniform(5.0));
        assert_eq!(d.falling, DelayTriple::uniform(7.0));
    }

    #[test]
    fn single_value_applies_to_both_edges() {
        let sdf = parse(&wrap("(INTERCONNECT a/Q b/A (1:2:3))")).unwrap();
        let (_, d) = only_entry(&sdf);
        assert_eq!(d.rising, d.falling);
    }

    #[test]
    fn empty_value_is_zero() {
        let sdf = parse(&wrap("(INTERCONNECT a/Q b/A () (4))")).unwrap();
        let (_, d) = only_entry(&sdf);
        assert_eq!(d.rising, DelayTriple::default());
        assert_eq!(d.falling, DelayTriple::uniform(4.0));
    }

    #[test]
    fn ports_kept_raw() {
        let sdf = parse(&wrap(r#"(INTERCONNECT "u\.x"/Q u\[1\]/A (1))"#)).unwrap();
        let ((from, to), _) = only_entry(&sdf);
        assert_eq!(from, r#""u\.x"/Q"#);
        assert_eq!(to, r"u\[1\]/A");
    }

    #[test]
    fn timescale_applied() {
        let sdf = parse(
            "(DELAYFILE (TIMESCALE 1 ns) (CELL (CELLTYPE top) (INSTANCE) \
             (DELAY (ABSOLUTE (INTERCONNECT a/Q b/A (0.1:0.2:0.3))))))",
        )
        .unwrap();
        assert_eq!(sdf.timescale_ps, 1000.0);
        let (_, d) = only_entry(&sdf);
        assert!((d.rising.max - 300.0).abs() < 1e-9);
    }

    #[test]
    fn default_timescale_is_nanoseconds() {
        let sdf = parse(
            "(DELAYFILE (CELL (CELLTYPE top) (INSTANCE) \
             (DELAY (ABSOLUTE (INTERCONNECT a/Q b/A (2))))))",
        )
        .unwrap();
        let (_, d) = only_entry(&sdf);
        assert_eq!(d.rising.max, 2000.0);
    }

    #[test]
    fn other_constructs_skipped() {
        let sdf = parse(&wrap(
            "(IOPATH A Z (1) (2)) (INTERCONNECT a/Q b/A (3)) (COND x (IOPATH B Z (1)))",
        ))
        .unwrap();
        assert_eq!(sdf.cells[0].interconnects.len(), 1);
    }

    #[test]
    fn timingcheck_and_header_skipped() {
        let sdf = parse(
            "(DELAYFILE (SDFVERSION \"3.0\") (VENDOR \"x\") (DIVIDER /) (TIMESCALE 1ps) \
             (CELL (CELLTYPE \"SLICE\") (INSTANCE a.b) (TIMINGCHECK (SETUP D (posedge CLK) (1)))))",
        )
        .unwrap();
        assert_eq!(sdf.cells[0].celltype, "SLICE");
        assert_eq!(sdf.cells[0].instance.as_deref(), Some("a.b"));
        assert!(sdf.cells[0].interconnects.is_empty());
    }

    #[test]
    fn wildcard_instance_is_none() {
        let sdf = parse("(DELAYFILE (CELL (CELLTYPE top) (INSTANCE *)))").unwrap();
        assert!(sdf.cells[0].instance.is_none());
    }

    #[test]
    fn duplicate_interconnect_last_wins() {
        let sdf = parse(&wrap(
            "(INTERCONNECT a/Q b/A (1)) (INTERCONNECT a/Q b/A (9))",
        ))
        .unwrap();
        let (_, d) = only_entry(&sdf);
        assert_eq!(d.rising.max, 9.0);
    }

    #[test]
    fn missing_delay_value_is_error() {
        let err = parse(&wrap("(INTERCONNECT a/Q b/A)")).unwrap_err();
        assert!(matches!(err, SdfError::Syntax { .. }));
    }

    #[test]
    fn bad_number_is_error() {
        let err = parse(&wrap("(INTERCONNECT a/Q b/A (1.2.3))")).unwrap_err();
        assert!(matches!(err, SdfError::BadNumber { ref text, .. } if text == "1.2.3"));
    }

    #[test]
    fn not_a_delayfile() {
        let err = parse("(FOO)").unwrap_err();
        assert!(matches!(err, SdfError::Syntax { .. }));
    }

    #[test]
    fn truncated_input() {
        let err = parse("(DELAYFILE (CELL (CELLTYPE top)").unwrap_err();
        assert!(matches!(err, SdfError::UnexpectedEof));
    }

    #[test]
    fn trailing_garbage() {
        let err = parse("(DELAYFILE) x").unwrap_err();
        assert!(matches!(err, SdfError::Syntax { .. }));
    }
}
