//! Dimension formula evaluator
//!
//! Part dimensions are stored as short arithmetic formulas over the cabinet's
//! overall size, e.g. `"height"`, `"width - 36"` or `"depth/2"`. This module
//! parses them with a closed grammar and evaluates the result in millimetres:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | SYMBOL | '(' expr ')'
//! SYMBOL  := width | height | depth | w | h | d   (case-insensitive)
//! ```
//!
//! `×` and `÷` are accepted as aliases for `*` and `/`. Nothing else is
//! recognised: there are no function calls, assignments or loops, so no
//! formula string can do anything but arithmetic on the three dimensions.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

/// Maximum nesting of parentheses and unary signs
const MAX_DEPTH: usize = 64;

/// Maximum tokens in one formula. Each binary operator adds a level to the
/// expression tree, so this also bounds evaluation depth for flat chains.
const MAX_TOKENS: usize = 512;

/// Errors raised while parsing or evaluating a formula
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,

    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("invalid number '{text}' at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("unknown symbol '{name}' at offset {offset}")]
    UnknownSymbol { name: String, offset: usize },

    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("unexpected end of formula")]
    UnexpectedEnd,

    #[error("formula nested deeper than {MAX_DEPTH} levels")]
    TooDeep,

    #[error("formula longer than {MAX_TOKENS} tokens")]
    TooLong,

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NonFinite,
}

/// A dimension symbol a formula may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Symbol {
    Width,
    Height,
    Depth,
}

impl Symbol {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "width" | "w" => Some(Symbol::Width),
            "height" | "h" => Some(Symbol::Height),
            "depth" | "d" => Some(Symbol::Depth),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Width => write!(f, "width"),
            Symbol::Height => write!(f, "height"),
            Symbol::Depth => write!(f, "depth"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parsed formula tree
#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    Symbol(Symbol),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    Symbol(Symbol),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::Symbol(s) => write!(f, "symbol '{}'", s),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

/// Splits formula text into tokens
struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, FormulaError> {
        let mut tokens = Vec::new();

        while let Some(&(offset, ch)) = self.chars.peek() {
            if tokens.len() >= MAX_TOKENS && !ch.is_whitespace() {
                return Err(FormulaError::TooLong);
            }
            let kind = match ch {
                c if c.is_whitespace() => {
                    self.chars.next();
                    continue;
                }
                '+' => TokenKind::Plus,
                '-' | '−' => TokenKind::Minus,
                '*' | '×' => TokenKind::Star,
                '/' | '÷' => TokenKind::Slash,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                c if c.is_ascii_digit() || c == '.' => {
                    tokens.push(self.number(offset)?);
                    continue;
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    tokens.push(self.symbol(offset)?);
                    continue;
                }
                other => return Err(FormulaError::UnexpectedChar { ch: other, offset }),
            };
            self.chars.next();
            tokens.push(Token { kind, offset });
        }

        log::trace!("Tokenized formula '{}' into {} tokens", self.input, tokens.len());
        Ok(tokens)
    }

    fn number(&mut self, start: usize) -> Result<Token, FormulaError> {
        let end = self.take_while(|c| c.is_ascii_digit() || c == '.');
        let text = &self.input[start..end];

        // `str::parse` also accepts forms like "inf" or "1e3"; only plain
        // decimals reach here, but a lone "." or "1.2.3" still has to fail.
        let value = text
            .parse::<f64>()
            .map_err(|_| FormulaError::InvalidNumber {
                text: text.to_string(),
                offset: start,
            })?;

        Ok(Token {
            kind: TokenKind::Number(value),
            offset: start,
        })
    }

    fn symbol(&mut self, start: usize) -> Result<Token, FormulaError> {
        let end = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let name = &self.input[start..end];

        let symbol = Symbol::from_name(name).ok_or_else(|| FormulaError::UnknownSymbol {
            name: name.to_string(),
            offset: start,
        })?;

        Ok(Token {
            kind: TokenKind::Symbol(symbol),
            offset: start,
        })
    }

    /// Consume characters matching `pred`, returning the end offset
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut end = self.input.len();
        while let Some(&(offset, ch)) = self.chars.peek() {
            if !pred(ch) {
                end = offset;
                break;
            }
            self.chars.next();
        }
        end
    }
}

/// Recursive-descent parser over a token list
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn parse(mut self) -> Result<Expr, FormulaError> {
        if self.tokens.is_empty() {
            return Err(FormulaError::Empty);
        }

        let expr = self.expr()?;

        match self.tokens.get(self.pos) {
            None => Ok(expr),
            Some(token) => Err(FormulaError::UnexpectedToken {
                found: token.kind.to_string(),
                offset: token.offset,
            }),
        }
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;

        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary()?;

        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        match self.peek() {
            Some(TokenKind::Minus) => {
                self.pos += 1;
                let inner = self.nested(Self::unary)?;
                Ok(Expr::Neg(Box::new(inner)))
            }
            Some(TokenKind::Plus) => {
                self.pos += 1;
                self.nested(Self::unary)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        let token = self.tokens.get(self.pos).cloned().ok_or(FormulaError::UnexpectedEnd)?;
        self.pos += 1;

        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::Symbol(s) => Ok(Expr::Symbol(s)),
            TokenKind::LParen => {
                let inner = self.nested(Self::expr)?;
                match self.tokens.get(self.pos) {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    Some(other) => Err(FormulaError::UnexpectedToken {
                        found: other.kind.to_string(),
                        offset: other.offset,
                    }),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            other => Err(FormulaError::UnexpectedToken {
                found: other.to_string(),
                offset: token.offset,
            }),
        }
    }

    fn nested(
        &mut self,
        rule: fn(&mut Self) -> Result<Expr, FormulaError>,
    ) -> Result<Expr, FormulaError> {
        if self.depth >= MAX_DEPTH {
            return Err(FormulaError::TooDeep);
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }
}

/// Values bound to the formula symbols, in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolValues {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl SymbolValues {
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    fn get(&self, symbol: Symbol) -> f64 {
        match symbol {
            Symbol::Width => self.width,
            Symbol::Height => self.height,
            Symbol::Depth => self.depth,
        }
    }
}

/// A parsed dimension formula
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    expr: Expr,
}

impl Formula {
    /// Parse formula text into an expression tree
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        let tokens = Lexer::new(source).tokenize()?;
        let expr = Parser::new(tokens).parse()?;
        Ok(Self { expr })
    }

    /// Evaluate against concrete dimensions
    pub fn eval(&self, values: &SymbolValues) -> Result<f64, FormulaError> {
        let result = eval_expr(&self.expr, values)?;
        if result.is_finite() {
            Ok(result)
        } else {
            Err(FormulaError::NonFinite)
        }
    }
}

fn eval_expr(expr: &Expr, values: &SymbolValues) -> Result<f64, FormulaError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Symbol(s) => Ok(values.get(*s)),
        Expr::Neg(inner) => Ok(-eval_expr(inner, values)?),
        Expr::Binary { op, lhs, rhs } => {
            let a = eval_expr(lhs, values)?;
            let b = eval_expr(rhs, values)?;
            match op {
                BinaryOp::Add => Ok(a + b),
                BinaryOp::Sub => Ok(a - b),
                BinaryOp::Mul => Ok(a * b),
                BinaryOp::Div => {
                    if b == 0.0 {
                        Err(FormulaError::DivisionByZero)
                    } else {
                        Ok(a / b)
                    }
                }
            }
        }
    }
}

/// Evaluate a part dimension formula to millimetres.
///
/// Returns `0.0` for a missing or blank formula and for any formula that
/// fails to parse or evaluate; callers treat zero as "part does not apply".
pub fn evaluate_formula(formula: Option<&str>, width: f64, height: f64, depth: f64) -> f64 {
    let Some(source) = formula.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0.0;
    };

    let values = SymbolValues::new(width, height, depth);
    match Formula::parse(source).and_then(|f| f.eval(&values)) {
        Ok(value) => value,
        Err(e) => {
            log::trace!("Formula '{}' evaluated to 0.0: {}", source, e);
            0.0
        }
    }
}
