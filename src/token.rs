use std::fmt::{self, Display, Formatter};

/// Character starting a variable name with the default tokenizers
pub const VARIABLE_SENTINEL: char = '@';

/// Category of a lexeme, as decided by the tokenizers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// A numeric literal, resolved to a constant when building the tree
    Number,
    /// A variable, resolved against the registered accessors
    Variable,
    /// A function name, followed by a parenthesized argument list
    Function,
    /// A binary operator from the active operator table
    Operator,
    /// Returned by a tokenizer that does not recognize the input
    Invalid,
}

/// A single lexeme with its category
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    text: String,
    category: Category,
}

impl Token {
    /// Create a new token
    pub fn new<S: Into<String>>(text: S, category: Category) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }

    /// The token tokenizers return when the input is not theirs
    pub fn invalid() -> Self {
        Self::new("", Category::Invalid)
    }

    /// Shorthand for a `Number` token
    pub fn number<S: Into<String>>(text: S) -> Self {
        Self::new(text, Category::Number)
    }

    /// Shorthand for a `Variable` token
    pub fn variable<S: Into<String>>(text: S) -> Self {
        Self::new(text, Category::Variable)
    }

    /// Shorthand for a `Function` token
    pub fn function<S: Into<String>>(text: S) -> Self {
        Self::new(text, Category::Function)
    }

    /// Shorthand for an `Operator` token
    pub fn operator(symbol: char) -> Self {
        Self::new(symbol.to_string(), Category::Operator)
    }

    /// The lexeme, as found in the expression
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The category the tokenizer assigned to the lexeme
    pub fn category(&self) -> Category {
        self.category
    }

    /// Check if the token is the one returned for unrecognized input
    pub fn is_invalid(&self) -> bool {
        self.category == Category::Invalid
    }

    /// The operator symbol, if this token is a single character operator
    pub fn symbol(&self) -> Option<char> {
        if self.category != Category::Operator {
            return None;
        }
        let mut chars = self.text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl Display for Token {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        write!(fmt, "{}", self.text)
    }
}

/// Render a postfix sequence as space separated lexemes, e.g. `@a @b +`
pub fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Operator precedence. Operators with higher precedence should be
/// evaluated first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// Lowest precedence, for custom operators binding loosest
    Basic,
    /// Precedence of `+` and `-`
    Addition,
    /// Precedence of `*` and `/`
    Multiplication,
    /// Precedence of `^` and of a leading `-`
    Exponentiation,
}

/// Tie-break rule between operators of equal precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    /// `a - b - c` is `(a - b) - c`
    Left,
    /// `a ^ b ^ c` is `a ^ (b ^ c)`
    Right,
}

/// An entry of the operator table used by the shunter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperatorSpec {
    /// The character of the operator in expressions
    pub symbol: char,
    /// How tightly the operator binds its operands
    pub precedence: Precedence,
    /// How chains of operators of the same precedence group
    pub associativity: Associativity,
}

impl OperatorSpec {
    /// Create a new operator table entry
    pub const fn new(symbol: char, precedence: Precedence, associativity: Associativity) -> Self {
        Self {
            symbol,
            precedence,
            associativity,
        }
    }

    /// Check if the operator is left associative
    pub fn is_left_associative(self) -> bool {
        self.associativity == Associativity::Left
    }

    /// Check if the operator is right associative
    pub fn is_right_associative(self) -> bool {
        !self.is_left_associative()
    }
}

/// The operator table installed by `Shunter::new`
pub const DEFAULT_OPERATORS: [OperatorSpec; 5] = [
    OperatorSpec::new('+', Precedence::Addition, Associativity::Left),
    OperatorSpec::new('-', Precedence::Addition, Associativity::Left),
    OperatorSpec::new('*', Precedence::Multiplication, Associativity::Left),
    OperatorSpec::new('/', Precedence::Multiplication, Associativity::Left),
    OperatorSpec::new('^', Precedence::Exponentiation, Associativity::Right),
];
