//! EPD (Extended Position Description) parsing and serialization: the
//! first four FEN fields plus `opcode value;` operations.
//!
//! The operand scanner recognizes four shapes: a double-quoted string with
//! `\n \r \t \" \\` escapes, an integer, a finite float, or one-or-more
//! whitespace-separated SAN-shaped tokens (a single token is a SAN move, a
//! run of tokens is a SAN-move list, as used by the `pv`/`am`/`bm`
//! opcodes). This module does not itself validate a SAN token against
//! board legality — callers needing that should route the token through
//! `Board::parse_san`.

use crate::board::error::EpdError;
use crate::board::fen::EpSquarePolicy;
use crate::board::state::Board;
use crate::board::types::Color;

/// A parsed EPD operand value.
#[derive(Clone, Debug, PartialEq)]
pub enum EpdOperand {
    Int(i64),
    Float(f64),
    Str(String),
    San(String),
    SanList(Vec<String>),
}

impl Board {
    /// Replace the position with the one described by the leading FEN-like
    /// fields of `epd`, returning the parsed operations.
    pub fn set_epd(&mut self, epd: &str) -> Result<Vec<(String, EpdOperand)>, EpdError> {
        let mut cursor = epd.trim_start();
        let mut fields: Vec<&str> = Vec::with_capacity(4);
        for _ in 0..4 {
            cursor = cursor.trim_start();
            let end = cursor.find(' ').unwrap_or(cursor.len());
            if end == 0 {
                return Err(EpdError::MalformedOperand {
                    opcode: String::new(),
                });
            }
            fields.push(&cursor[..end]);
            cursor = &cursor[end..];
        }

        let fen = format!("{} {} {} {} 0 1", fields[0], fields[1], fields[2], fields[3]);
        self.set_fen(&fen)?;

        let operations = scan_operations(cursor.trim_start())?;
        for (opcode, operand) in &operations {
            match (opcode.as_str(), operand) {
                ("hmvc", EpdOperand::Int(v)) => self.halfmove_clock = (*v).max(0) as u32,
                ("fmvn", EpdOperand::Int(v)) => self.fullmove_number = (*v).max(1) as u32,
                _ => {}
            }
        }
        Ok(operations)
    }

    /// Parse an EPD string into a fresh `Board` plus its operations.
    pub fn from_epd(epd: &str) -> Result<(Self, Vec<(String, EpdOperand)>), EpdError> {
        let mut board = Board::empty();
        let operations = board.set_epd(epd)?;
        Ok((board, operations))
    }

    /// Serialize the current position plus `operations` as an EPD string.
    /// The en-passant field is disclosed only when a legal capture exists,
    /// per the `legal` policy.
    #[must_use]
    pub fn epd(&self, operations: &[(String, EpdOperand)]) -> String {
        let mut out = format!(
            "{} {} {} {}",
            self.board.board_fen(true),
            if self.turn == Color::White { "w" } else { "b" },
            self.castling_fen(),
            self.ep_field(EpSquarePolicy::Legal),
        );
        for (opcode, operand) in operations {
            out.push(' ');
            out.push_str(opcode);
            out.push(' ');
            out.push_str(&format_operand(operand));
            out.push(';');
        }
        out
    }
}

fn format_operand(operand: &EpdOperand) -> String {
    match operand {
        EpdOperand::Int(v) => v.to_string(),
        EpdOperand::Float(v) => v.to_string(),
        EpdOperand::Str(s) => format!("\"{}\"", escape_string(s)),
        EpdOperand::San(s) => s.clone(),
        EpdOperand::SanList(list) => list.join(" "),
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}

/// Scan a sequence of `opcode value;` operations per the state machine
/// described in §4.7: {opcode, after-opcode, numeric, string,
/// string-escape, san}.
fn scan_operations(input: &str) -> Result<Vec<(String, EpdOperand)>, EpdError> {
    let chars: Vec<char> = input.chars().collect();
    let n = chars.len();
    let mut i = 0;
    let mut ops = Vec::new();

    loop {
        while i < n && chars[i] == ' ' {
            i += 1;
        }
        if i >= n {
            break;
        }

        let opcode_start = i;
        while i < n && chars[i] != ' ' {
            i += 1;
        }
        let opcode: String = chars[opcode_start..i].iter().collect();

        while i < n && chars[i] == ' ' {
            i += 1;
        }

        if i < n && chars[i] == '"' {
            i += 1;
            let mut s = String::new();
            loop {
                if i >= n {
                    return Err(EpdError::MalformedOperand { opcode });
                }
                match chars[i] {
                    '\\' => {
                        i += 1;
                        let escaped = *chars.get(i).ok_or_else(|| EpdError::MalformedOperand {
                            opcode: opcode.clone(),
                        })?;
                        let ch = match escaped {
                            'n' => '\n',
                            'r' => '\r',
                            't' => '\t',
                            '"' => '"',
                            '\\' => '\\',
                            _ => {
                                return Err(EpdError::MalformedOperand { opcode });
                            }
                        };
                        s.push(ch);
                        i += 1;
                    }
                    '"' => {
                        i += 1;
                        break;
                    }
                    c => {
                        s.push(c);
                        i += 1;
                    }
                }
            }
            ops.push((opcode, EpdOperand::Str(s)));
        } else {
            let mut tokens: Vec<String> = Vec::new();
            loop {
                while i < n && chars[i] == ' ' {
                    i += 1;
                }
                if i >= n || chars[i] == ';' {
                    break;
                }
                let tok_start = i;
                while i < n && chars[i] != ' ' && chars[i] != ';' {
                    i += 1;
                }
                tokens.push(chars[tok_start..i].iter().collect());
            }
            if tokens.is_empty() {
                return Err(EpdError::MalformedOperand { opcode });
            }
            let operand = if tokens.len() == 1 {
                let tok = &tokens[0];
                if let Ok(v) = tok.parse::<i64>() {
                    EpdOperand::Int(v)
                } else if let Ok(v) = tok.parse::<f64>() {
                    if v.is_finite() {
                        EpdOperand::Float(v)
                    } else {
                        return Err(EpdError::InvalidOperand {
                            opcode,
                            value: tok.clone(),
                        });
                    }
                } else {
                    EpdOperand::San(tok.clone())
                }
            } else {
                EpdOperand::SanList(tokens)
            };
            ops.push((opcode, operand));
        }

        while i < n && chars[i] == ' ' {
            i += 1;
        }
        if i < n && chars[i] == ';' {
            i += 1;
        } else {
            let (opcode, _) = ops.pop().expect("an operation was just pushed");
            return Err(EpdError::MalformedOperand { opcode });
        }
    }

    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_epd_parses_leading_fen_fields() {
        let (board, ops) =
            Board::from_epd("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - bm e4;").unwrap();
        assert_eq!(board.turn(), Color::White);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0], ("bm".to_string(), EpdOperand::San("e4".to_string())));
    }

    #[test]
    fn numeric_operand_is_parsed_as_int() {
        let (_, ops) = Board::from_epd("8/8/8/8/8/8/8/4K2k w - - hmvc 12;").unwrap();
        assert_eq!(ops[0].1, EpdOperand::Int(12));
    }

    #[test]
    fn hmvc_and_fmvn_opcodes_set_clocks() {
        let (board, _) = Board::from_epd("8/8/8/8/8/8/8/4K2k w - - hmvc 7; fmvn 20;").unwrap();
        assert_eq!(board.halfmove_clock(), 7);
        assert_eq!(board.fullmove_number(), 20);
    }

    #[test]
    fn quoted_string_operand_supports_escapes() {
        let (_, ops) = Board::from_epd("8/8/8/8/8/8/8/4K2k w - - c0 \"line\\nbreak\";").unwrap();
        assert_eq!(ops[0].1, EpdOperand::Str("line\nbreak".to_string()));
    }

    #[test]
    fn san_list_operand_collects_multiple_tokens() {
        let (_, ops) = Board::from_epd("8/8/8/8/8/8/8/4K2k w - - pv e4 e5 Nf3;").unwrap();
        assert_eq!(
            ops[0].1,
            EpdOperand::SanList(vec!["e4".to_string(), "e5".to_string(), "Nf3".to_string()])
        );
    }

    #[test]
    fn missing_semicolon_is_malformed() {
        assert!(Board::from_epd("8/8/8/8/8/8/8/4K2k w - - bm e4").is_err());
    }

    #[test]
    fn epd_round_trips_through_set_epd() {
        let board = Board::new();
        let text = board.epd(&[("id".to_string(), EpdOperand::Str("start".to_string()))]);
        let (parsed, ops) = Board::from_epd(&text).unwrap();
        assert_eq!(parsed, board);
        assert_eq!(ops[0].1, EpdOperand::Str("start".to_string()));
    }
}
