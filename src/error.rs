use thiserror::Error;

/// Broad classification of an [`Error`](enum.Error.html)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unrecognized character or lexeme in the input
    Lexical,
    /// Well formed lexemes in an invalid arrangement
    Syntactic,
    /// A variable without a registered accessor
    UnresolvedVariable,
    /// An invalid shunter configuration
    Configuration,
}

/// Error type for the yardstick crate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No tokenizer recognized the input at `position`
    #[error("ParseError: unexpected character in input at position {position}: {lexeme}")]
    Lexical {
        /// Byte offset in the expression, or index in a postfix sequence
        position: usize,
        /// The unrecognized input
        lexeme: String,
    },
    /// The input (or a parenthesized group) holds nothing to evaluate
    #[error("ParseError: empty expression")]
    EmptyExpression,
    /// A `)` without its `(`, or the reverse
    #[error("ParseError: mismatched parenthesis")]
    MismatchedParenthesis,
    /// A lexeme in a place where the grammar does not allow it
    #[error("ParseError: unexpected {found} at position {position}")]
    Unexpected {
        /// Byte offset in the expression
        position: usize,
        /// Description of what was found there
        found: String,
    },
    /// An operator symbol missing from the operator table, or without an
    /// operation behind it
    #[error("ParseError: unknown operator {0}")]
    UnknownOperator(String),
    /// A function name without an operation behind it
    #[error("ParseError: unknown function {0}")]
    UnknownFunction(String),
    /// An operator or function applied to the wrong number of operands
    #[error("ParseError: {name} expects {expected} operand(s), found {found}")]
    Arity {
        /// Name of the operator or function
        name: String,
        /// Its arity
        expected: usize,
        /// Number of operands available to it
        found: usize,
    },
    /// Replaying the postfix sequence did not leave exactly one value
    #[error("ParseError: malformed expression, {0} values left after evaluation")]
    Malformed(usize),
    /// The expression tree would nest deeper than the given limit
    #[error("ParseError: expression nested deeper than {0} levels")]
    TooDeep(usize),
    /// A number token the value type can not represent
    #[error("ParseError: invalid number literal {0}")]
    InvalidLiteral(String),
    /// A variable without a registered accessor
    #[error("NameError: name '{0}' is not defined")]
    UnresolvedVariable(String),
    /// An operator table rejected by the shunter
    #[error("ConfigError: {0}")]
    InvalidOperators(String),
}

impl Error {
    /// The broad class of this error
    pub fn kind(&self) -> ErrorKind {
        match *self {
            Self::Lexical { .. } => ErrorKind::Lexical,
            Self::EmptyExpression
            | Self::MismatchedParenthesis
            | Self::Unexpected { .. }
            | Self::UnknownOperator(_)
            | Self::UnknownFunction(_)
            | Self::Arity { .. }
            | Self::Malformed(_)
            | Self::TooDeep(_)
            | Self::InvalidLiteral(_) => ErrorKind::Syntactic,
            Self::UnresolvedVariable(_) => ErrorKind::UnresolvedVariable,
            Self::InvalidOperators(_) => ErrorKind::Configuration,
        }
    }
}
