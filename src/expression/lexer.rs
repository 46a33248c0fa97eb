use crate::expression::error::ExprError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Integer(i64),
    Number(f64),
    Str(String),
    Attr(String),
    True,
    False,
    Null,

    LParen,
    RParen,
    Comma,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    Bang,

    EqEq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    AndAnd,
    OrOr,

    Eof,
}

pub(crate) fn lex(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut cur = Cursor { input, pos: 0 };
    let mut out = Vec::new();

    loop {
        cur.skip_whitespace();
        let start = cur.pos;
        let Some(c) = cur.peek() else {
            out.push(Token {
                kind: TokenKind::Eof,
                span: Span { start, end: start },
            });
            return Ok(out);
        };

        let leads_number =
            c.is_ascii_digit() || (c == b'.' && cur.peek_at(1).is_some_and(|d| d.is_ascii_digit()));
        let kind = if leads_number {
            cur.number()?
        } else if c == b'\'' || c == b'"' {
            let (text, end) = lex_quoted(input, start, char::from(c))?;
            cur.pos = end;
            TokenKind::Str(text)
        } else if c == b'[' {
            cur.attribute()?
        } else if c.is_ascii_alphabetic() || c == b'_' || c == b'@' {
            cur.word()
        } else {
            cur.operator()?
        };
        out.push(Token {
            kind,
            span: Span {
                start,
                end: cur.pos,
            },
        });
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + ahead).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let from = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        self.pos - from
    }

    /// `123`, `1.5`, `.5`, `2e-3`. Integers that overflow `i64` become doubles.
    fn number(&mut self) -> Result<TokenKind, ExprError> {
        let start = self.pos;
        let mut is_float = false;

        self.eat_while(|c| c.is_ascii_digit());
        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) {
            is_float = true;
            self.pos += 1;
            self.eat_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let e_pos = self.pos;
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.eat_while(|c| c.is_ascii_digit()) == 0 {
                return Err(ExprError::new(e_pos, "exponent needs digits"));
            }
        }

        let text = &self.input[start..self.pos];
        if !is_float {
            if let Ok(v) = text.parse::<i64>() {
                return Ok(TokenKind::Integer(v));
            }
        }
        text.parse()
            .map(TokenKind::Number)
            .map_err(|_| ExprError::new(start, format!("invalid number '{text}'")))
    }

    /// `[name]`, trimmed.
    fn attribute(&mut self) -> Result<TokenKind, ExprError> {
        let start = self.pos;
        let rest = &self.input[start + 1..];
        let Some(close) = rest.find(']') else {
            return Err(ExprError::new(start, "unterminated attribute reference"));
        };
        let name = rest[..close].trim();
        if name.is_empty() {
            return Err(ExprError::new(start, "empty attribute reference"));
        }
        self.pos = start + close + 2;
        Ok(TokenKind::Attr(name.to_owned()))
    }

    /// Keywords and identifiers. A leading `@` marks a variable and is dropped.
    fn word(&mut self) -> TokenKind {
        let start = self.pos;
        self.pos += 1;
        self.eat_while(|c| c.is_ascii_alphanumeric() || c == b'_');
        match &self.input[start..self.pos] {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "and" => TokenKind::AndAnd,
            "or" => TokenKind::OrOr,
            "not" => TokenKind::Bang,
            word => TokenKind::Ident(word.trim_start_matches('@').to_owned()),
        }
    }

    fn operator(&mut self) -> Result<TokenKind, ExprError> {
        let start = self.pos;
        let two = match self.input.get(start..start + 2) {
            Some("&&") => Some(TokenKind::AndAnd),
            Some("||") => Some(TokenKind::OrOr),
            Some("==") => Some(TokenKind::EqEq),
            Some("!=" | "<>") => Some(TokenKind::Ne),
            Some("<=") => Some(TokenKind::Le),
            Some(">=") => Some(TokenKind::Ge),
            _ => None,
        };
        if let Some(kind) = two {
            self.pos += 2;
            return Ok(kind);
        }

        let Some(c) = self.input[start..].chars().next() else {
            return Err(ExprError::new(start, "unexpected end of input"));
        };
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '!' => TokenKind::Bang,
            '=' => TokenKind::EqEq,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            other => {
                return Err(ExprError::new(start, format!("unexpected character '{other}'")));
            }
        };
        self.pos += 1;
        Ok(kind)
    }
}

/// Lex a quoted string starting at `start`; returns the unescaped text and the end offset.
fn lex_quoted(input: &str, start: usize, quote: char) -> Result<(String, usize), ExprError> {
    let mut text = String::new();
    let mut chars = input[start + 1..].char_indices();
    while let Some((off, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, other)) => text.push(other),
                None => break,
            },
            ch if ch == quote => return Ok((text, start + 1 + off + ch.len_utf8())),
            ch => text.push(ch),
        }
    }
    Err(ExprError::new(start, "unterminated string literal"))
}
