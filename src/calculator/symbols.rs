//! The fixed symbol table: every name an expression may use.

/// A built-in function of one argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    /// Natural logarithm.
    Log,
    Sqrt,
    Exp,
}

impl Function {
    /// Canonical name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Log => "log",
            Self::Sqrt => "sqrt",
            Self::Exp => "exp",
        }
    }
}

/// A named constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
    ImaginaryUnit,
}

/// What a name in an expression resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    Function(Function),
    Constant(Constant),
}

/// Name-to-symbol table. `ln` is an alias of `log`.
pub const SYMBOLS: &[(&str, Symbol)] = &[
    ("sin", Symbol::Function(Function::Sin)),
    ("cos", Symbol::Function(Function::Cos)),
    ("tan", Symbol::Function(Function::Tan)),
    ("asin", Symbol::Function(Function::Asin)),
    ("acos", Symbol::Function(Function::Acos)),
    ("atan", Symbol::Function(Function::Atan)),
    ("log", Symbol::Function(Function::Log)),
    ("ln", Symbol::Function(Function::Log)),
    ("sqrt", Symbol::Function(Function::Sqrt)),
    ("exp", Symbol::Function(Function::Exp)),
    ("pi", Symbol::Constant(Constant::Pi)),
    ("e", Symbol::Constant(Constant::E)),
    ("I", Symbol::Constant(Constant::ImaginaryUnit)),
];

/// Resolve an exact name.
pub fn lookup(name: &str) -> Option<Symbol> {
    SYMBOLS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|&(_, symbol)| symbol)
}

/// Split a run of letters into known names, longest name first.
///
/// `pie` splits into `pi`, `e`; returns `None` if any piece is unknown.
pub fn split_names(word: &str) -> Option<Vec<Symbol>> {
    let mut symbols = Vec::new();
    let mut rest = word;

    while !rest.is_empty() {
        let (name, symbol) = SYMBOLS
            .iter()
            .filter(|(name, _)| rest.starts_with(*name))
            .max_by_key(|(name, _)| name.len())?;
        symbols.push(*symbol);
        rest = &rest[name.len()..];
    }

    Some(symbols)
}
