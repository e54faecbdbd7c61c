//! Lexer and recursive descent parser for normalized expressions.
//!
//! Grammar:
//!   additive  --> term ( ("+" | "-") term )*
//!   term      --> unary ( ("*" | "/") unary | power )*      // bare `power` is implicit multiplication
//!   unary     --> ("-" | "+") unary | power
//!   power     --> primary ( "**" unary )?
//!   primary   --> NUMBER | CONSTANT | call | "(" additive ")"
//!   call      --> FUNCTION ( "**" unary )? ( "(" additive ")" | unary )
//!
//! Runs of `additive` and `term` operators become one flat [`Expr::Chain`],
//! so only nesting through `unary` deepens the tree.

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::calculator::symbols::{self, Constant, Function, Symbol};
use crate::error::EvaluationError;

/// Deepest nesting accepted before the parser gives up.
const MAX_DEPTH: usize = 128;

/// Largest decimal exponent accepted in a number literal.
const MAX_LITERAL_EXPONENT: i64 = 10_000;

/// A parsed expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Exact value of a decimal literal.
    Number(BigRational),
    Constant(Constant),
    Negate(Box<Expr>),
    /// `first op1 operand1 op2 operand2 ...`, applied left to right.
    Chain {
        first: Box<Expr>,
        rest: Vec<(BinaryOp, Expr)>,
    },
    Power {
        base: Box<Expr>,
        exponent: Box<Expr>,
    },
    Call {
        function: Function,
        argument: Box<Expr>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Expr {
    fn chain(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Self {
        if rest.is_empty() {
            first
        } else {
            Self::Chain {
                first: Box::new(first),
                rest,
            }
        }
    }

    fn power(base: Expr, exponent: Expr) -> Self {
        Self::Power {
            base: Box::new(base),
            exponent: Box::new(exponent),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number { value: BigRational, text: String },
    Symbol(Symbol),
    Plus,
    Minus,
    Star,
    Power,
    Slash,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Number { text, .. } => format!("number {}", text),
            Self::Symbol(Symbol::Function(f)) => format!("'{}'", f.name()),
            Self::Symbol(Symbol::Constant(_)) => "constant".to_string(),
            Self::Plus => "'+'".to_string(),
            Self::Minus => "'-'".to_string(),
            Self::Star => "'*'".to_string(),
            Self::Power => "'**'".to_string(),
            Self::Slash => "'/'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
        }
    }

    /// Whether this token can begin an operand, which makes it eligible
    /// for implicit multiplication.
    fn starts_operand(&self) -> bool {
        matches!(self, Self::Number { .. } | Self::Symbol(_) | Self::LParen)
    }
}

fn syntax(message: impl Into<String>) -> EvaluationError {
    EvaluationError::Syntax(message.into())
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn tokenize(mut self) -> Result<Vec<Token>, EvaluationError> {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek_at(0) {
            match c {
                c if c.is_whitespace() => self.pos += 1,
                '+' => self.single(&mut tokens, Token::Plus),
                '-' => self.single(&mut tokens, Token::Minus),
                '/' => self.single(&mut tokens, Token::Slash),
                '(' => self.single(&mut tokens, Token::LParen),
                ')' => self.single(&mut tokens, Token::RParen),
                '*' => {
                    if self.peek_at(1) == Some('*') {
                        self.pos += 2;
                        tokens.push(Token::Power);
                    } else {
                        self.single(&mut tokens, Token::Star);
                    }
                }
                c if c.is_ascii_digit() || c == '.' => self.read_number(&mut tokens)?,
                c if c.is_ascii_alphabetic() => self.read_word(&mut tokens)?,
                other => return Err(syntax(format!("unexpected character '{}'", other))),
            }
        }

        Ok(tokens)
    }

    fn single(&mut self, tokens: &mut Vec<Token>, token: Token) {
        self.pos += 1;
        tokens.push(token);
    }

    fn skip_digits(&mut self) {
        while self.peek_at(0).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn read_number(&mut self, tokens: &mut Vec<Token>) -> Result<(), EvaluationError> {
        let start = self.pos;
        self.skip_digits();
        if self.peek_at(0) == Some('.') {
            self.pos += 1;
            self.skip_digits();
        }

        // Exponent only when digits follow, so `2e` stays `2 * e`.
        if matches!(self.peek_at(0), Some('e' | 'E')) {
            let digit_at = if matches!(self.peek_at(1), Some('+' | '-')) {
                2
            } else {
                1
            };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += digit_at;
                self.skip_digits();
            }
        }

        let literal: String = self.chars[start..self.pos].iter().collect();
        if self.peek_at(0) == Some('.') {
            return Err(syntax(format!("malformed number '{}.'", literal)));
        }
        let value = parse_decimal(&literal)?;
        tokens.push(Token::Number {
            value,
            text: literal,
        });

        // Imaginary literal suffix: `4i`.
        if self.peek_at(0) == Some('i') && !self.peek_at(1).is_some_and(is_identifier_char) {
            self.pos += 1;
            tokens.push(Token::Symbol(Symbol::Constant(Constant::ImaginaryUnit)));
        }

        Ok(())
    }

    fn read_word(&mut self, tokens: &mut Vec<Token>) -> Result<(), EvaluationError> {
        let start = self.pos;
        while self.peek_at(0).is_some_and(|c| c.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();

        if let Some(symbol) = symbols::lookup(&word) {
            tokens.push(Token::Symbol(symbol));
            return Ok(());
        }

        let parts = symbols::split_names(&word).ok_or(EvaluationError::UnknownSymbol(word))?;
        tokens.extend(parts.into_iter().map(Token::Symbol));
        Ok(())
    }
}

/// Exact value of a decimal literal such as `12`, `.5`, `3.` or `2.5E-1`.
fn parse_decimal(literal: &str) -> Result<BigRational, EvaluationError> {
    let malformed = || syntax(format!("malformed number '{}'", literal));

    let (mantissa, exponent) = match literal.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (
            mantissa,
            exponent.parse::<i64>().map_err(|_| malformed())?,
        ),
        None => (literal, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(malformed());
    }

    let digits: BigInt = format!("{}{}", whole, fraction)
        .parse()
        .map_err(|_| malformed())?;
    let scale = exponent
        .checked_sub(fraction.len() as i64)
        .filter(|scale| scale.abs() <= MAX_LITERAL_EXPONENT)
        .ok_or_else(|| syntax(format!("number '{}' is out of range", literal)))?;

    let ten = num_traits::pow(BigInt::from(10u32), scale.unsigned_abs() as usize);
    Ok(if scale < 0 {
        BigRational::new(digits, ten)
    } else {
        BigRational::from_integer(digits * ten)
    })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

/// Parse a normalized expression into a tree.
pub fn parse(input: &str) -> Result<Expr, EvaluationError> {
    let tokens = Lexer::new(input).tokenize()?;
    if tokens.is_empty() {
        return Err(syntax("empty expression"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_additive()?;

    match parser.peek() {
        None => Ok(expr),
        Some(Token::RParen) => Err(syntax("unbalanced parenthesis ')'")),
        Some(token) => Err(syntax(format!("unexpected {}", token.describe()))),
    }
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_additive(&mut self) -> Result<Expr, EvaluationError> {
        let first = self.parse_term()?;
        let mut rest = Vec::new();

        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Subtract,
                _ => break,
            };
            self.pos += 1;
            rest.push((op, self.parse_term()?));
        }

        Ok(Expr::chain(first, rest))
    }

    fn parse_term(&mut self) -> Result<Expr, EvaluationError> {
        let first = self.parse_unary()?;
        let mut rest = Vec::new();

        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    rest.push((BinaryOp::Multiply, self.parse_unary()?));
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    rest.push((BinaryOp::Divide, self.parse_unary()?));
                }
                Some(token) if token.starts_operand() => {
                    if let (Some(Token::Number { .. }), Token::Number { text, .. }) =
                        (self.tokens.get(self.pos - 1), token)
                    {
                        return Err(syntax(format!("missing operator before number {}", text)));
                    }
                    rest.push((BinaryOp::Multiply, self.parse_power()?));
                }
                _ => break,
            }
        }

        Ok(Expr::chain(first, rest))
    }

    fn parse_unary(&mut self) -> Result<Expr, EvaluationError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(syntax("expression is nested too deeply"));
        }

        let result = match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                self.parse_unary().map(|inner| Expr::Negate(Box::new(inner)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.parse_unary()
            }
            _ => self.parse_power(),
        };

        self.depth -= 1;
        result
    }

    fn parse_power(&mut self) -> Result<Expr, EvaluationError> {
        let base = self.parse_primary()?;

        if self.peek() == Some(&Token::Power) {
            self.pos += 1;
            let exponent = self.parse_unary()?;
            return Ok(Expr::power(base, exponent));
        }

        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, EvaluationError> {
        match self.advance() {
            Some(Token::Number { value, .. }) => Ok(Expr::Number(value)),
            Some(Token::Symbol(Symbol::Constant(c))) => Ok(Expr::Constant(c)),
            Some(Token::Symbol(Symbol::Function(f))) => self.parse_call(f),
            Some(Token::LParen) => self.parse_parenthesized(),
            Some(token) => Err(syntax(format!("unexpected {}", token.describe()))),
            None => Err(syntax("unexpected end of expression")),
        }
    }

    /// Parses the rest of a parenthesized group; the `(` is already consumed.
    fn parse_parenthesized(&mut self) -> Result<Expr, EvaluationError> {
        let inner = self.parse_additive()?;
        match self.advance() {
            Some(Token::RParen) => Ok(inner),
            Some(token) => Err(syntax(format!(
                "expected ')', found {}",
                token.describe()
            ))),
            None => Err(syntax("missing closing parenthesis")),
        }
    }

    fn parse_call(&mut self, function: Function) -> Result<Expr, EvaluationError> {
        // `sin**2(x)` means `sin(x)**2`.
        let exponent = if self.peek() == Some(&Token::Power) {
            self.pos += 1;
            Some(self.parse_unary()?)
        } else {
            None
        };

        let argument = match self.peek() {
            Some(Token::LParen) => {
                self.pos += 1;
                self.parse_parenthesized()?
            }
            Some(token) if token.starts_operand() || matches!(token, Token::Minus | Token::Plus) => {
                self.parse_unary()?
            }
            _ => return Err(EvaluationError::MissingArgument(function.name())),
        };

        let call = Expr::Call {
            function,
            argument: Box::new(argument),
        };

        Ok(match exponent {
            Some(exponent) => Expr::power(call, exponent),
            None => call,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: i64) -> Expr {
        Expr::Number(BigRational::from_integer(n.into()))
    }

    fn ratio(numer: i64, denom: i64) -> Expr {
        Expr::Number(BigRational::new(numer.into(), denom.into()))
    }

    fn chain(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
        Expr::Chain {
            first: Box::new(first),
            rest,
        }
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse("1+2*3").unwrap(),
            chain(
                num(1),
                vec![(
                    BinaryOp::Add,
                    chain(num(2), vec![(BinaryOp::Multiply, num(3))])
                )]
            )
        );
    }

    #[test]
    fn test_operator_runs_are_flat() {
        assert_eq!(
            parse("1-2+3").unwrap(),
            chain(
                num(1),
                vec![(BinaryOp::Subtract, num(2)), (BinaryOp::Add, num(3))]
            )
        );
        assert_eq!(
            parse("8/2/2").unwrap(),
            chain(
                num(8),
                vec![(BinaryOp::Divide, num(2)), (BinaryOp::Divide, num(2))]
            )
        );
    }

    #[test]
    fn test_long_flat_input_parses() {
        let input = format!("{}1", "1+".repeat(100_000));
        match parse(&input).unwrap() {
            Expr::Chain { rest, .. } => assert_eq!(rest.len(), 100_000),
            other => panic!("expected a chain, got {:?}", other),
        }
    }

    #[test]
    fn test_power_is_right_associative_and_binds_tighter_than_minus() {
        assert_eq!(
            parse("2**3**2").unwrap(),
            Expr::power(num(2), Expr::power(num(3), num(2)))
        );
        assert_eq!(
            parse("-2**2").unwrap(),
            Expr::Negate(Box::new(Expr::power(num(2), num(2))))
        );
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(
            parse("2pi").unwrap(),
            chain(
                num(2),
                vec![(BinaryOp::Multiply, Expr::Constant(Constant::Pi))]
            )
        );
        assert_eq!(
            parse("3(4+5)").unwrap(),
            chain(
                num(3),
                vec![(
                    BinaryOp::Multiply,
                    chain(num(4), vec![(BinaryOp::Add, num(5))])
                )]
            )
        );
        assert_eq!(
            parse("4i").unwrap(),
            chain(
                num(4),
                vec![(
                    BinaryOp::Multiply,
                    Expr::Constant(Constant::ImaginaryUnit)
                )]
            )
        );
    }

    #[test]
    fn test_implicit_application() {
        let expected = Expr::Call {
            function: Function::Sqrt,
            argument: Box::new(num(4)),
        };
        assert_eq!(parse("sqrt 4").unwrap(), expected);
        assert_eq!(parse("sqrt(4)").unwrap(), expected);
    }

    #[test]
    fn test_function_exponentiation() {
        assert_eq!(
            parse("sin**2(1)").unwrap(),
            Expr::power(
                Expr::Call {
                    function: Function::Sin,
                    argument: Box::new(num(1)),
                },
                num(2)
            )
        );
    }

    #[test]
    fn test_numbers_are_exact() {
        assert_eq!(parse(".5").unwrap(), ratio(1, 2));
        assert_eq!(parse("3.").unwrap(), num(3));
        assert_eq!(parse("0.1").unwrap(), ratio(1, 10));
        assert_eq!(parse("1e3").unwrap(), num(1000));
        assert_eq!(parse("2.5E-1").unwrap(), ratio(1, 4));
        assert_eq!(
            parse("123456789012345678901234567890").unwrap(),
            Expr::Number(BigRational::from_integer(
                "123456789012345678901234567890".parse().unwrap()
            ))
        );
        assert_eq!(
            parse("2e").unwrap(),
            chain(
                num(2),
                vec![(BinaryOp::Multiply, Expr::Constant(Constant::E))]
            )
        );
    }

    #[test]
    fn test_literal_exponent_out_of_range() {
        assert!(matches!(parse("1e400"), Ok(Expr::Number(_))));
        assert!(matches!(parse("1e100000"), Err(EvaluationError::Syntax(_))));
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(parse("(2"), Err(EvaluationError::Syntax(_))));
        assert!(matches!(parse("2)"), Err(EvaluationError::Syntax(_))));
        assert!(matches!(parse("2+"), Err(EvaluationError::Syntax(_))));
        assert!(matches!(parse("*2"), Err(EvaluationError::Syntax(_))));
        assert!(matches!(parse("1.2.3"), Err(EvaluationError::Syntax(_))));
        assert!(matches!(parse("."), Err(EvaluationError::Syntax(_))));
        assert!(matches!(parse("2 $ 3"), Err(EvaluationError::Syntax(_))));
        assert!(matches!(parse(""), Err(EvaluationError::Syntax(_))));
        assert_eq!(
            parse("2 3.5"),
            Err(EvaluationError::Syntax(
                "missing operator before number 3.5".to_string()
            ))
        );
    }

    #[test]
    fn test_unknown_symbols() {
        assert_eq!(
            parse("sin(x)"),
            Err(EvaluationError::UnknownSymbol("x".to_string()))
        );
        assert_eq!(
            parse("foo"),
            Err(EvaluationError::UnknownSymbol("foo".to_string()))
        );
    }

    #[test]
    fn test_missing_function_argument() {
        assert_eq!(parse("sin"), Err(EvaluationError::MissingArgument("sin")));
        assert_eq!(parse("2*log"), Err(EvaluationError::MissingArgument("log")));
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let input = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
        assert!(matches!(parse(&input), Err(EvaluationError::Syntax(_))));

        let negations = format!("{}1", "-".repeat(100_000));
        assert!(matches!(parse(&negations), Err(EvaluationError::Syntax(_))));
    }
}
