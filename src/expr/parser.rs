//! Recursive-descent parser producing [`Expr`] trees.
//!
//! Precedence, lowest first:
//!
//! | level       | operators                |
//! |-------------|--------------------------|
//! | conditional | `c ? a : b`              |
//! | or          | `\|\|`, `or`             |
//! | and         | `&&`, `and`              |
//! | equality    | `==`, `!=`               |
//! | comparison  | `<`, `<=`, `>`, `>=`     |
//! | additive    | `+`, `-`                 |
//! | term        | `*`, `/`, `%`            |
//! | unary       | `!`, `not`, `-`          |

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::error::{ExprError, Result};
use super::lexer::{tokenize, Token, TokenKind};

/// Deepest nesting a source may reach: each parenthesis, unary operator,
/// conditional branch and chained binary operator adds a level.
pub const MAX_DEPTH: usize = 256;

/// Parse a complete expression.
pub fn parse(source: &str) -> Result<Expr> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.conditional()?;

    if let Some(token) = parser.peek() {
        return Err(ExprError::UnexpectedToken {
            found: token.kind.describe(),
            expected: "end of expression",
            offset: token.offset,
        });
    }

    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        match self.peek_kind() {
            Some(TokenKind::Ident(name)) if name.eq_ignore_ascii_case(keyword) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Run `f` one nesting level deeper.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.check_depth(1)?;
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn check_depth(&self, extra: usize) -> Result<()> {
        if self.depth + extra > MAX_DEPTH {
            return Err(ExprError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<()> {
        match self.advance() {
            Some(token) if token.kind == kind => Ok(()),
            Some(token) => Err(ExprError::UnexpectedToken {
                found: token.kind.describe(),
                expected,
                offset: token.offset,
            }),
            None => Err(ExprError::UnexpectedEnd { expected }),
        }
    }

    fn conditional(&mut self) -> Result<Expr> {
        self.nested(Self::conditional_inner)
    }

    fn conditional_inner(&mut self) -> Result<Expr> {
        let condition = self.or()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(condition);
        }
        let then = self.conditional()?;
        self.expect(TokenKind::Colon, "':'")?;
        let otherwise = self.conditional()?;
        Ok(Expr::Conditional {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn or(&mut self) -> Result<Expr> {
        let mut lhs = self.and()?;
        let mut links = 0;
        while self.eat(&TokenKind::OrOr) || self.eat_keyword("or") {
            links += 1;
            self.check_depth(links)?;
            let rhs = self.and()?;
            lhs = Expr::binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr> {
        let mut lhs = self.equality()?;
        let mut links = 0;
        while self.eat(&TokenKind::AndAnd) || self.eat_keyword("and") {
            links += 1;
            self.check_depth(links)?;
            let rhs = self.equality()?;
            lhs = Expr::binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn equality(&mut self) -> Result<Expr> {
        let mut lhs = self.comparison()?;
        let mut links = 0;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::EqEq) => BinaryOp::Eq,
                Some(TokenKind::NotEq) => BinaryOp::Ne,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            links += 1;
            self.check_depth(links)?;
            let rhs = self.comparison()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn comparison(&mut self) -> Result<Expr> {
        let mut lhs = self.additive()?;
        let mut links = 0;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Lt) => BinaryOp::Lt,
                Some(TokenKind::Le) => BinaryOp::Le,
                Some(TokenKind::Gt) => BinaryOp::Gt,
                Some(TokenKind::Ge) => BinaryOp::Ge,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            links += 1;
            self.check_depth(links)?;
            let rhs = self.additive()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn additive(&mut self) -> Result<Expr> {
        let mut lhs = self.term()?;
        let mut links = 0;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            links += 1;
            self.check_depth(links)?;
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn term(&mut self) -> Result<Expr> {
        let mut lhs = self.unary()?;
        let mut links = 0;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                Some(TokenKind::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            links += 1;
            self.check_depth(links)?;
            let rhs = self.unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn unary(&mut self) -> Result<Expr> {
        self.nested(Self::unary_inner)
    }

    fn unary_inner(&mut self) -> Result<Expr> {
        if self.eat(&TokenKind::Bang) || self.eat_keyword("not") {
            let operand = self.unary()?;
            return Ok(Expr::unary(UnaryOp::Not, operand));
        }
        if self.eat(&TokenKind::Minus) {
            let operand = self.unary()?;
            return Ok(Expr::unary(UnaryOp::Neg, operand));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        self.nested(Self::primary_inner)
    }

    fn primary_inner(&mut self) -> Result<Expr> {
        let Some(token) = self.advance() else {
            return Err(ExprError::UnexpectedEnd { expected: "a value" });
        };

        match token.kind {
            TokenKind::Int(value) => Ok(Expr::Int(value)),

            TokenKind::LParen => {
                let inner = self.conditional()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }

            TokenKind::Ident(name) => {
                if name.eq_ignore_ascii_case("true") {
                    return Ok(Expr::Bool(true));
                }
                if name.eq_ignore_ascii_case("false") {
                    return Ok(Expr::Bool(false));
                }

                if self.eat(&TokenKind::LParen) {
                    let args = self.arguments()?;
                    return Ok(Expr::Call { name, args });
                }

                if self.eat(&TokenKind::LBracket) {
                    let index = self.conditional()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    return Ok(Expr::Index {
                        target: name,
                        index: Box::new(index),
                    });
                }

                Ok(Expr::Ident(name))
            }

            other => Err(ExprError::UnexpectedToken {
                found: other.describe(),
                expected: "a value",
                offset: token.offset,
            }),
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.conditional()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen, "',' or ')'")?;
            return Ok(args);
        }
    }
}
