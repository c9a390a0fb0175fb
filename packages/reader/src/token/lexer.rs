//! Byte-level JSON lexer
//!
//! Splits the front of a byte window into one lexeme at a time. A lexeme cut
//! off by the end of the window reports [`Lexed::Incomplete`] so the caller
//! can refill and retry; once the input is exhausted the same situation is a
//! syntax error.

use memchr::memchr2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Lexeme {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    Colon,
    Comma,
    String(String),
    Number(String),
    True,
    False,
    Null,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Lexed {
    Token { lexeme: Lexeme, consumed: usize },
    /// Only whitespace remains and the input is exhausted
    End { consumed: usize },
    Incomplete,
}

/// Lexing failure; `offset` is relative to the start of the lexed slice.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct LexError {
    pub(crate) offset: usize,
    pub(crate) message: String,
}

fn lex_error(offset: usize, message: impl Into<String>) -> LexError {
    LexError {
        offset,
        message: message.into(),
    }
}

type Partial<T> = Result<Option<T>, LexError>;

pub(crate) fn lex(input: &[u8], at_eof: bool) -> Result<Lexed, LexError> {
    let Some(start) = input
        .iter()
        .position(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
    else {
        return Ok(if at_eof {
            Lexed::End {
                consumed: input.len(),
            }
        } else {
            Lexed::Incomplete
        });
    };

    let rest = &input[start..];
    let single = |lexeme: Lexeme| -> Result<Lexed, LexError> {
        Ok(Lexed::Token {
            lexeme,
            consumed: start + 1,
        })
    };

    let lexed = match rest[0] {
        b'{' => return single(Lexeme::BeginObject),
        b'}' => return single(Lexeme::EndObject),
        b'[' => return single(Lexeme::BeginArray),
        b']' => return single(Lexeme::EndArray),
        b':' => return single(Lexeme::Colon),
        b',' => return single(Lexeme::Comma),
        b'"' => lex_string(rest, at_eof).map(|r| r.map(|(s, n)| (Lexeme::String(s), n))),
        b'-' | b'0'..=b'9' => lex_number(rest, at_eof).map(|r| r.map(|(s, n)| (Lexeme::Number(s), n))),
        b't' => lex_literal(rest, b"true", Lexeme::True, at_eof),
        b'f' => lex_literal(rest, b"false", Lexeme::False, at_eof),
        b'n' => lex_literal(rest, b"null", Lexeme::Null, at_eof),
        other => Err(lex_error(
            0,
            format!("unexpected character {:?}", char::from(other)),
        )),
    };

    match lexed {
        Ok(Some((lexeme, consumed))) => Ok(Lexed::Token {
            lexeme,
            consumed: start + consumed,
        }),
        Ok(None) => Ok(Lexed::Incomplete),
        Err(err) => Err(lex_error(start + err.offset, err.message)),
    }
}

fn incomplete<T>(at_eof: bool, offset: usize, message: &str) -> Partial<T> {
    if at_eof {
        Err(lex_error(offset, message))
    } else {
        Ok(None)
    }
}

fn lex_literal(rest: &[u8], word: &[u8], lexeme: Lexeme, at_eof: bool) -> Partial<(Lexeme, usize)> {
    if rest.len() >= word.len() {
        if &rest[..word.len()] == word {
            Ok(Some((lexeme, word.len())))
        } else {
            Err(lex_error(0, "invalid literal"))
        }
    } else if word.starts_with(rest) {
        incomplete(at_eof, rest.len(), "truncated literal")
    } else {
        Err(lex_error(0, "invalid literal"))
    }
}

fn lex_number(rest: &[u8], at_eof: bool) -> Partial<(String, usize)> {
    let end = rest
        .iter()
        .position(|b| !matches!(b, b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E'))
        .unwrap_or(rest.len());
    if end == rest.len() && !at_eof {
        return Ok(None);
    }

    let text = &rest[..end];
    if !is_valid_number(text) {
        return Err(lex_error(0, "invalid number"));
    }
    Ok(Some((text.iter().map(|&b| char::from(b)).collect(), end)))
}

fn is_valid_number(s: &[u8]) -> bool {
    let digits_from = |mut i: usize| {
        while s.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut i = usize::from(s.first() == Some(&b'-'));
    match s.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => i = digits_from(i + 1),
        _ => return false,
    }
    if s.get(i) == Some(&b'.') {
        let start = i + 1;
        i = digits_from(start);
        if i == start {
            return false;
        }
    }
    if matches!(s.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(s.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let start = i;
        i = digits_from(start);
        if i == start {
            return false;
        }
    }
    i == s.len()
}

fn hex4(rest: &[u8], pos: usize, at_eof: bool) -> Partial<u32> {
    let Some(digits) = rest.get(pos..pos + 4) else {
        return incomplete(at_eof, rest.len(), "truncated unicode escape");
    };
    let mut value = 0u32;
    for (i, &b) in digits.iter().enumerate() {
        let digit = char::from(b)
            .to_digit(16)
            .ok_or_else(|| lex_error(pos + i, "invalid hex digit in unicode escape"))?;
        value = value * 16 + digit;
    }
    Ok(Some(value))
}

fn lex_string(rest: &[u8], at_eof: bool) -> Partial<(String, usize)> {
    let mut out = String::new();
    let mut i = 1;

    loop {
        let Some(rel) = memchr2(b'"', b'\\', &rest[i..]) else {
            return incomplete(at_eof, rest.len(), "unterminated string");
        };

        let chunk = &rest[i..i + rel];
        if let Some(bad) = chunk.iter().position(|&b| b < 0x20) {
            return Err(lex_error(i + bad, "control character in string"));
        }
        let text = simdutf8::basic::from_utf8(chunk)
            .map_err(|_| lex_error(i, "invalid UTF-8 in string"))?;
        out.push_str(text);
        i += rel;

        if rest[i] == b'"' {
            return Ok(Some((out, i + 1)));
        }

        let Some(&escape) = rest.get(i + 1) else {
            return incomplete(at_eof, rest.len(), "unterminated escape");
        };
        match escape {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{08}'),
            b'f' => out.push('\u{0c}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let Some(unit) = hex4(rest, i + 2, at_eof)? else {
                    return Ok(None);
                };
                let (code_point, consumed) = match unit {
                    0xD800..=0xDBFF => {
                        let Some(tail) = rest.get(i + 6..i + 8) else {
                            return incomplete(at_eof, rest.len(), "unpaired surrogate");
                        };
                        if tail != b"\\u" {
                            return Err(lex_error(i, "unpaired surrogate"));
                        }
                        let Some(low) = hex4(rest, i + 8, at_eof)? else {
                            return Ok(None);
                        };
                        if !(0xDC00..=0xDFFF).contains(&low) {
                            return Err(lex_error(i, "unpaired surrogate"));
                        }
                        (0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00), 12)
                    }
                    0xDC00..=0xDFFF => return Err(lex_error(i, "unpaired surrogate")),
                    _ => (unit, 6),
                };
                let c = char::from_u32(code_point)
                    .ok_or_else(|| lex_error(i, "invalid unicode escape"))?;
                out.push(c);
                i += consumed;
                continue;
            }
            _ => return Err(lex_error(i + 1, "invalid escape sequence")),
        }
        i += 2;
    }
}
