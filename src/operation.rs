use crate::numeric::Numeric;
use hashbrown::HashMap;
use std::fmt::{self, Display, Formatter};

/// Functions of one operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unary {
    /// Sine
    Sin,
    /// Cosine
    Cos,
    /// Tangent
    Tan,
    /// Hyperbolic sine
    Sinh,
    /// Hyperbolic cosine
    Cosh,
    /// Hyperbolic tangent
    Tanh,
    /// Arcsine
    Asin,
    /// Arccosine
    Acos,
    /// Arctangent
    Atan,
    /// Inverse hyperbolic sine
    Asinh,
    /// Inverse hyperbolic cosine
    Acosh,
    /// Inverse hyperbolic tangent
    Atanh,
    /// Exponential
    Exp,
    /// Natural logarithm
    Log,
    /// Base 10 logarithm
    Log10,
    /// Negation, from a leading `-`
    Neg,
}

/// Operators and functions of two operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binary {
    /// Addition, `+`
    Add,
    /// Subtraction, `-`
    Sub,
    /// Multiplication, `*`
    Mul,
    /// Division, `/`
    Div,
    /// Four quadrant arctangent of the first operand over the second
    Atan2,
    /// Exponentiation, `^`
    Pow,
}

/// Every operation a tree node can apply. The arity of an operation follows
/// from its variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// An operation of one operand
    Unary(Unary),
    /// An operation of two operands
    Binary(Binary),
}

lazy_static! {
    /// Function names recognized in expressions
    pub static ref FUNCTIONS: HashMap<&'static str, Operation> = {
        let mut map = HashMap::new();
        map.insert("sin", Operation::Unary(Unary::Sin));
        map.insert("cos", Operation::Unary(Unary::Cos));
        map.insert("tan", Operation::Unary(Unary::Tan));
        map.insert("sinh", Operation::Unary(Unary::Sinh));
        map.insert("cosh", Operation::Unary(Unary::Cosh));
        map.insert("tanh", Operation::Unary(Unary::Tanh));
        map.insert("asin", Operation::Unary(Unary::Asin));
        map.insert("acos", Operation::Unary(Unary::Acos));
        map.insert("atan", Operation::Unary(Unary::Atan));
        map.insert("asinh", Operation::Unary(Unary::Asinh));
        map.insert("acosh", Operation::Unary(Unary::Acosh));
        map.insert("atanh", Operation::Unary(Unary::Atanh));
        map.insert("exp", Operation::Unary(Unary::Exp));
        map.insert("log", Operation::Unary(Unary::Log));
        map.insert("log10", Operation::Unary(Unary::Log10));
        map.insert("neg", Operation::Unary(Unary::Neg));
        map.insert("atan2", Operation::Binary(Binary::Atan2));
        map.insert("pow", Operation::Binary(Binary::Pow));
        map.shrink_to_fit();
        map
    };

    /// Operator symbols with a tree node behind them
    pub static ref OPERATORS: HashMap<char, Operation> = {
        let mut map = HashMap::new();
        map.insert('+', Operation::Binary(Binary::Add));
        map.insert('-', Operation::Binary(Binary::Sub));
        map.insert('*', Operation::Binary(Binary::Mul));
        map.insert('/', Operation::Binary(Binary::Div));
        map.insert('^', Operation::Binary(Binary::Pow));
        map.shrink_to_fit();
        map
    };
}

impl Operation {
    /// Look up a function by name
    pub fn function(name: &str) -> Option<Self> {
        FUNCTIONS.get(name).copied()
    }

    /// Look up an operator by symbol
    pub fn operator(symbol: char) -> Option<Self> {
        OPERATORS.get(&symbol).copied()
    }

    /// Number of operands consumed by this operation
    pub fn arity(self) -> usize {
        match self {
            Self::Unary(_) => 1,
            Self::Binary(_) => 2,
        }
    }

    /// Name of this operation, as used in function calls and when
    /// displaying trees
    pub fn name(self) -> &'static str {
        match self {
            Self::Unary(unary) => unary.name(),
            Self::Binary(binary) => binary.name(),
        }
    }
}

impl Unary {
    /// Name of this function
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Asinh => "asinh",
            Self::Acosh => "acosh",
            Self::Atanh => "atanh",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Log10 => "log10",
            Self::Neg => "neg",
        }
    }

    /// The implementation of this function for the value type `T`
    pub fn function<T: Numeric>(self) -> fn(T) -> T {
        match self {
            Self::Sin => T::sin,
            Self::Cos => T::cos,
            Self::Tan => T::tan,
            Self::Sinh => T::sinh,
            Self::Cosh => T::cosh,
            Self::Tanh => T::tanh,
            Self::Asin => T::asin,
            Self::Acos => T::acos,
            Self::Atan => T::atan,
            Self::Asinh => T::asinh,
            Self::Acosh => T::acosh,
            Self::Atanh => T::atanh,
            Self::Exp => T::exp,
            Self::Log => T::log,
            Self::Log10 => T::log10,
            Self::Neg => <T as std::ops::Neg>::neg,
        }
    }
}

impl Binary {
    /// Name of this operation
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Atan2 => "atan2",
            Self::Pow => "pow",
        }
    }

    /// The implementation of this operation for the value type `T`
    pub fn function<T: Numeric>(self) -> fn(T, T) -> T {
        match self {
            Self::Add => <T as std::ops::Add>::add,
            Self::Sub => <T as std::ops::Sub>::sub,
            Self::Mul => <T as std::ops::Mul>::mul,
            Self::Div => <T as std::ops::Div>::div,
            Self::Atan2 => T::atan2,
            Self::Pow => T::pow,
        }
    }
}

impl Display for Operation {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        write!(fmt, "{}", self.name())
    }
}
