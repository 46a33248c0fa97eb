use crate::expression::ast::{BinaryOp, Expr, UnaryOp};
use crate::expression::error::ExprError;
use crate::expression::lexer::{Span, Token, TokenKind, lex};
use crate::expression::value::Value;

pub(crate) fn parse_expr(src: &str) -> Result<Expr, ExprError> {
    let tokens = lex(src)?;
    let mut p = Parser { tokens, pos: 0 };
    let expr = p.parse_or()?;
    p.expect(TokenKind::Eof)?;
    Ok(expr)
}

/// Parse literal text with embedded `[attribute]` references.
///
/// A backslash escapes the next character, so `\[` yields a literal bracket.
pub(crate) fn parse_string_template(src: &str) -> Result<Expr, ExprError> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut chars = src.char_indices().peekable();

    while let Some((off, ch)) = chars.next() {
        match ch {
            '\\' => {
                if let Some((_, next)) = chars.next() {
                    text.push(next);
                }
            }
            '[' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(ExprError::new(off, "unterminated attribute reference"));
                }
                let name = name.trim();
                if name.is_empty() {
                    return Err(ExprError::new(off, "empty attribute reference"));
                }
                if !text.is_empty() {
                    parts.push(Expr::Lit(Value::String(std::mem::take(&mut text))));
                }
                parts.push(Expr::Attr(name.to_owned()));
            }
            other => text.push(other),
        }
    }

    if parts.is_empty() {
        return Ok(Expr::Lit(Value::String(text)));
    }
    if !text.is_empty() {
        parts.push(Expr::Lit(Value::String(text)));
    }
    Ok(Expr::Concat(parts))
}

/// Number of binary precedence levels handled by [`Parser::parse_level`].
const LEVELS: usize = 6;

/// Binary operator for `kind` at precedence `level`, lowest precedence first.
fn level_op(level: usize, kind: &TokenKind) -> Option<BinaryOp> {
    let op = match (level, kind) {
        (0, TokenKind::OrOr) => BinaryOp::Or,
        (1, TokenKind::AndAnd) => BinaryOp::And,
        (2, TokenKind::EqEq) => BinaryOp::Eq,
        (2, TokenKind::Ne) => BinaryOp::Ne,
        (3, TokenKind::Lt) => BinaryOp::Lt,
        (3, TokenKind::Le) => BinaryOp::Le,
        (3, TokenKind::Gt) => BinaryOp::Gt,
        (3, TokenKind::Ge) => BinaryOp::Ge,
        (4, TokenKind::Plus) => BinaryOp::Add,
        (4, TokenKind::Minus) => BinaryOp::Sub,
        (5, TokenKind::Star) => BinaryOp::Mul,
        (5, TokenKind::Slash) => BinaryOp::Div,
        (5, TokenKind::Percent) => BinaryOp::Mod,
        _ => return None,
    };
    Some(op)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn bump(&mut self) -> &Token {
        let t = &self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExprError> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            Err(ExprError::new(
                self.span().start,
                format!("expected {kind:?}, found {:?}", self.peek().kind),
            ))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ExprError> {
        self.parse_level(0)
    }

    /// Left-associative binary operators, one precedence level at a time.
    fn parse_level(&mut self, level: usize) -> Result<Expr, ExprError> {
        if level == LEVELS {
            return self.parse_unary();
        }
        let mut lhs = self.parse_level(level + 1)?;
        while let Some(op) = level_op(level, &self.peek().kind) {
            self.bump();
            let rhs = self.parse_level(level + 1)?;
            lhs = Expr::Binary {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        if self.consume(TokenKind::Minus) {
            let e = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                expr: Box::new(e),
            });
        }
        if self.consume(TokenKind::Bang) {
            let e = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                expr: Box::new(e),
            });
        }
        self.parse_primary()
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ExprError> {
        let mut args = Vec::new();
        if self.consume(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_or()?);
            if self.consume(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen)?;
            return Ok(args);
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let t = self.bump().clone();
        match t.kind {
            TokenKind::Integer(v) => Ok(Expr::Lit(Value::Long(v))),
            TokenKind::Number(v) => Ok(Expr::Lit(Value::Double(v))),
            TokenKind::Str(s) => Ok(Expr::Lit(Value::String(s))),
            TokenKind::True => Ok(Expr::Lit(Value::Bool(true))),
            TokenKind::False => Ok(Expr::Lit(Value::Bool(false))),
            TokenKind::Null => Ok(Expr::Lit(Value::Null)),
            TokenKind::Attr(name) => Ok(Expr::Attr(name)),
            TokenKind::Ident(name) => {
                if self.consume(TokenKind::LParen) {
                    let args = self.parse_args()?;
                    Ok(Expr::Call { func: name, args })
                } else {
                    Ok(Expr::Var(name))
                }
            }
            TokenKind::LParen => {
                let e = self.parse_or()?;
                self.expect(TokenKind::RParen)?;
                Ok(e)
            }
            other => Err(ExprError::new(
                t.span.start,
                format!("unexpected token {other:?}"),
            )),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/parser.rs"]
mod tests;
