#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::non_ascii_literal
)]

//! Yardstick, a crate compiling mathematical expressions into reusable
//! evaluators.
//!
//! Expressions are parsed once, their variables bound to live value
//! sources, and the result compiled into a closure which recomputes the
//! expression on every call. The easiest way to use this crate is with the
//! [`compile`](fn.compile.html) function:
//!
//! ```
//! use yardstick::{compile, Variables};
//!
//! let evaluator = compile::<f64>("3 + 5 * 2", &Variables::new()).unwrap();
//! assert_eq!(evaluator(), 13.0);
//! ```
//!
//! Variables are registered with an accessor, called each time the evaluator
//! runs. Changing what the accessor returns changes the next result, without
//! parsing the expression again:
//!
//! ```
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//! use yardstick::{compile, Variables};
//!
//! let a = Arc::new(AtomicU64::new(3.5_f64.to_bits()));
//! let source = Arc::clone(&a);
//!
//! let mut variables = Variables::new();
//! variables.insert("@a", move || f64::from_bits(source.load(Ordering::Relaxed)));
//!
//! let evaluator = compile("2 * @a", &variables).unwrap();
//! assert_eq!(evaluator(), 7.0);
//!
//! a.store(10.0_f64.to_bits(), Ordering::Relaxed);
//! assert_eq!(evaluator(), 20.0);
//! ```
//!
//! The pipeline is also available one stage at a time: a
//! [`Shunter`](struct.Shunter.html) turns the input into a postfix sequence
//! of [`Token`](struct.Token.html)s, a [`Builder`](struct.Builder.html) turns
//! that sequence into a tree of [`Node`](enum.Node.html)s, and
//! [`Node::compile`](enum.Node.html#method.compile) produces the evaluator.
//! [`Expression`](struct.Expression.html) bundles the three.
//!
//! # Language definition
//!
//! With the default configuration, an expression can contain:
//!
//! - integer literal values: `0`, `42`, ... Floating point literals are
//!   recognized by installing [`tokenizer::float`](tokenizer/fn.float.html);
//! - variables: a name after the `@` sentinel, `@x`, `@rate_2`, ...;
//! - left and right parenthesis;
//! - mathematical operators: `+` for addition, `-` for subtraction,
//!   `*` for multiplication, `/` for division and `^` for exponentiation;
//! - negation: a `-` at the start of the expression, after `(` or after
//!   `,` negates what follows it, `-@a ^ 2` being `-(@a ^ 2)`;
//! - function calls: `sin(@a)`, `atan2(@y, @x)`. The available functions are
//!   `sin`, `cos`, `tan`, `sinh`, `cosh`, `tanh`, `asin`, `acos`, `atan`,
//!   `asinh`, `acosh`, `atanh`, `exp`, `log` (natural logarithm), `log10`,
//!   `atan2` and `pow`.
//!
//! `^` is right associative, the other operators are left associative. The
//! operator table and the recognizers of each kind of lexeme can be replaced
//! on the [`Shunter`](struct.Shunter.html).
//!
//! # Value types
//!
//! Expressions are generic over their value type, any implementation of
//! [`Numeric`](trait.Numeric.html): `f64` and `f32` evaluate with `libm`,
//! [`Batch`](struct.Batch.html) evaluates elementwise over a vector of
//! values. Numeric domain errors are not reported, they produce whatever the
//! value type produces (`NaN`, infinities, ...).

#[macro_use]
extern crate lazy_static;

mod builder;
mod error;
mod expr;
mod node;
mod numeric;
mod operation;
mod shunter;
mod token;
pub mod tokenizer;
mod variables;

pub use builder::{Builder, DEFAULT_MAX_DEPTH};
pub use error::{Error, ErrorKind};
pub use expr::{compile, eval, Expression};
pub use node::{Evaluator, Node};
pub use numeric::{Batch, Numeric};
pub use operation::{Binary, Operation, Unary, FUNCTIONS, OPERATORS};
pub use shunter::Shunter;
pub use token::{
    render, Associativity, Category, OperatorSpec, Precedence, Token, DEFAULT_OPERATORS,
    VARIABLE_SENTINEL,
};
pub use tokenizer::Tokenizer;
pub use variables::{Accessor, Variables};
