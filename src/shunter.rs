use crate::error::Error;
use crate::operation::{Operation, Unary};
use crate::token::{
    self, Associativity, Category, OperatorSpec, Precedence, Token, DEFAULT_OPERATORS,
};
use crate::tokenizer::{self, Tokenizer};
use log::{debug, trace};
use std::fmt::{self, Debug, Formatter};

/// A `-` starting an operand negates it. It binds like `^` and groups to the
/// right, so `-2^2` is `-(2^2)`.
const NEGATION: OperatorSpec =
    OperatorSpec::new('-', Precedence::Exponentiation, Associativity::Right);

/// Entries of the operator stack
#[derive(Debug)]
enum Pending {
    Operator(OperatorSpec),
    Negation,
    Function(Token),
    /// An open parenthesis, counting the arguments already closed by a comma
    /// when it starts the argument list of a function.
    Paren { call: bool, args: usize },
}

impl Pending {
    /// Precedence rules of operator entries, `None` for functions and
    /// parenthesis
    fn spec(&self) -> Option<OperatorSpec> {
        match *self {
            Self::Operator(operator) => Some(operator),
            Self::Negation => Some(NEGATION),
            Self::Function(_) | Self::Paren { .. } => None,
        }
    }

    /// The postfix token of this entry, `None` for parenthesis
    fn into_token(self) -> Option<Token> {
        match self {
            Self::Operator(operator) => Some(Token::operator(operator.symbol)),
            Self::Negation => Some(Token::function(Unary::Neg.name())),
            Self::Function(token) => Some(token),
            Self::Paren { .. } => None,
        }
    }
}

/// Converts an infix expression to a postfix token sequence, using the
/// shunting-yard algorithm.
///
/// ```
/// use yardstick::{render, Shunter};
///
/// let postfix = Shunter::new("@a + @b * @c").shunt().unwrap();
/// assert_eq!(render(&postfix), "@a @b @c * +");
///
/// let postfix = Shunter::new("pow(@a, 2) ^ 3 ^ 2").shunt().unwrap();
/// assert_eq!(render(&postfix), "@a 2 pow 3 2 ^ ^");
/// ```
pub struct Shunter {
    expression: String,
    operators: Vec<OperatorSpec>,
    number_tokenizer: Tokenizer,
    variable_tokenizer: Tokenizer,
    function_tokenizer: Tokenizer,
    operator_tokenizer: Tokenizer,
}

impl Shunter {
    /// Create a shunter for `expression`, with the default operator table
    /// and tokenizers.
    pub fn new<S: Into<String>>(expression: S) -> Self {
        Self {
            expression: expression.into(),
            operators: DEFAULT_OPERATORS.to_vec(),
            number_tokenizer: Box::new(tokenizer::integer),
            variable_tokenizer: Box::new(tokenizer::variable),
            function_tokenizer: Box::new(tokenizer::function),
            operator_tokenizer: Box::new(tokenizer::operator),
        }
    }

    /// The expression this shunter converts
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The active operator table
    pub fn operators(&self) -> &[OperatorSpec] {
        &self.operators
    }

    /// Replace the operator table. The table must not be empty, and its
    /// symbols must be unique and distinct from `(`, `)` and `,`.
    pub fn set_operators(&mut self, operators: Vec<OperatorSpec>) -> Result<(), Error> {
        if operators.is_empty() {
            return Err(Error::InvalidOperators("empty operator table".into()));
        }
        for (i, operator) in operators.iter().enumerate() {
            if matches!(operator.symbol, '(' | ')' | ',') || operator.symbol.is_whitespace() {
                return Err(Error::InvalidOperators(format!(
                    "'{}' can not be used as an operator",
                    operator.symbol
                )));
            }
            if operators[..i].iter().any(|o| o.symbol == operator.symbol) {
                return Err(Error::InvalidOperators(format!(
                    "duplicated operator '{}'",
                    operator.symbol
                )));
            }
        }
        self.operators = operators;
        Ok(())
    }

    /// Replace the recognizer of number literals, for example with
    /// [`tokenizer::float`](tokenizer/fn.float.html)
    pub fn set_number_tokenizer<F>(&mut self, tokenizer: F)
    where
        F: Fn(&str) -> (&str, Token) + 'static,
    {
        self.number_tokenizer = Box::new(tokenizer);
    }

    /// Replace the recognizer of variables
    pub fn set_variable_tokenizer<F>(&mut self, tokenizer: F)
    where
        F: Fn(&str) -> (&str, Token) + 'static,
    {
        self.variable_tokenizer = Box::new(tokenizer);
    }

    /// Recognize variables starting with `sentinel` instead of `@`
    pub fn set_variable_sentinel(&mut self, sentinel: char) {
        self.variable_tokenizer = Box::new(tokenizer::variable_with_sentinel(sentinel));
    }

    /// Replace the recognizer of function names
    pub fn set_function_tokenizer<F>(&mut self, tokenizer: F)
    where
        F: Fn(&str) -> (&str, Token) + 'static,
    {
        self.function_tokenizer = Box::new(tokenizer);
    }

    /// Replace the recognizer of operator symbols
    pub fn set_operator_tokenizer<F>(&mut self, tokenizer: F)
    where
        F: Fn(&str) -> (&str, Token) + 'static,
    {
        self.operator_tokenizer = Box::new(tokenizer);
    }

    /// Run the shunting-yard algorithm over the expression, and return the
    /// tokens in postfix order.
    ///
    /// A `-` at the start of the expression, after `(` or after `,` negates
    /// the operand it precedes, and is emitted as the `neg` function.
    pub fn shunt(&self) -> Result<Vec<Token>, Error> {
        debug!("shunting {:?}", self.expression);
        let mut output = Vec::new();
        let mut operators = Vec::new();
        // true when the next lexeme must start an operand
        let mut expect_operand = true;
        let mut just_opened = false;
        // true at the start of the expression and after `(` or `,`
        let mut operand_starts = true;
        let mut awaiting_call: Option<String> = None;

        let mut rest = self.expression.as_str();
        loop {
            rest = rest.trim_start();
            if rest.is_empty() {
                break;
            }
            let position = self.expression.len() - rest.len();

            if let Some(ref name) = awaiting_call {
                if !rest.starts_with('(') {
                    return Err(Error::Unexpected {
                        position,
                        found: format!("function {} without arguments", name),
                    });
                }
            }

            match rest.as_bytes()[0] {
                b'(' => {
                    if !expect_operand {
                        return Err(unexpected(position, "'('"));
                    }
                    trace!("'(' at {}", position);
                    operators.push(Pending::Paren {
                        call: awaiting_call.take().is_some(),
                        args: 0,
                    });
                    just_opened = true;
                    operand_starts = true;
                    rest = &rest[1..];
                    continue;
                }
                b')' => {
                    if expect_operand {
                        if just_opened {
                            return Err(Error::EmptyExpression);
                        }
                        return Err(unexpected(position, "')'"));
                    }
                    trace!("')' at {}", position);
                    match unwind(&mut operators, &mut output) {
                        Some((true, args)) => close_call(&mut operators, &mut output, args + 1)?,
                        Some((false, _)) => {}
                        None => return Err(Error::MismatchedParenthesis),
                    }
                    just_opened = false;
                    rest = &rest[1..];
                    continue;
                }
                b',' => {
                    if expect_operand {
                        return Err(unexpected(position, "','"));
                    }
                    trace!("',' at {}", position);
                    match unwind(&mut operators, &mut output) {
                        Some((true, args)) => operators.push(Pending::Paren {
                            call: true,
                            args: args + 1,
                        }),
                        _ => return Err(unexpected(position, "',' outside of a function call")),
                    }
                    expect_operand = true;
                    just_opened = false;
                    operand_starts = true;
                    rest = &rest[1..];
                    continue;
                }
                _ => {}
            }

            let (next, token) = self.next_token(rest, position)?;
            trace!("{:?} at {}", token, position);
            rest = next;
            just_opened = false;
            let negation_allowed = operand_starts;
            operand_starts = false;

            match token.category() {
                Category::Number | Category::Variable => {
                    if !expect_operand {
                        return Err(unexpected(position, &format!("operand {}", token)));
                    }
                    output.push(token);
                    expect_operand = false;
                }
                Category::Function => {
                    if !expect_operand {
                        return Err(unexpected(position, &format!("function {}", token)));
                    }
                    awaiting_call = Some(token.text().to_string());
                    operators.push(Pending::Function(token));
                }
                Category::Operator => {
                    if expect_operand {
                        if negation_allowed && token.symbol() == Some(NEGATION.symbol) {
                            operators.push(Pending::Negation);
                            continue;
                        }
                        return Err(unexpected(position, &format!("operator {}", token)));
                    }
                    let o1 = self.operator(&token)?;
                    'operators: while let Some(o2) = operators.last().and_then(Pending::spec) {
                        let pop_me = o2.precedence > o1.precedence
                            || (o2.precedence == o1.precedence && o1.is_left_associative());
                        if !pop_me {
                            break 'operators;
                        }
                        if let Some(popped) = operators.pop().and_then(Pending::into_token) {
                            output.push(popped);
                        }
                    }
                    operators.push(Pending::Operator(o1));
                    expect_operand = true;
                }
                Category::Invalid => {
                    return Err(Error::Lexical {
                        position,
                        lexeme: token.text().into(),
                    });
                }
            }
        }

        if let Some(name) = awaiting_call {
            return Err(unexpected(
                self.expression.len(),
                &format!("function {} without arguments", name),
            ));
        }
        if expect_operand {
            if output.is_empty() && operators.is_empty() {
                return Err(Error::EmptyExpression);
            }
            if just_opened {
                return Err(Error::MismatchedParenthesis);
            }
            return Err(unexpected(self.expression.len(), "end of input"));
        }

        while let Some(pending) = operators.pop() {
            match pending.into_token() {
                Some(token) => output.push(token),
                None => return Err(Error::MismatchedParenthesis),
            }
        }

        debug!("postfix: {}", token::render(&output));
        Ok(output)
    }

    /// Find the next lexeme in `input`, trying the number, variable,
    /// function and operator tokenizers in that order.
    fn next_token<'a>(&self, input: &'a str, position: usize) -> Result<(&'a str, Token), Error> {
        let tokenizers = [
            &self.number_tokenizer,
            &self.variable_tokenizer,
            &self.function_tokenizer,
            &self.operator_tokenizer,
        ];
        for tokenizer in &tokenizers {
            let (rest, token) = tokenizer(input);
            if !token.is_invalid() && rest.len() < input.len() {
                return Ok((rest, token));
            }
        }
        let lexeme = input.chars().next().map(String::from).unwrap_or_default();
        Err(Error::Lexical { position, lexeme })
    }

    fn operator(&self, token: &Token) -> Result<OperatorSpec, Error> {
        token
            .symbol()
            .and_then(|symbol| self.operators.iter().find(|o| o.symbol == symbol))
            .copied()
            .ok_or_else(|| Error::UnknownOperator(token.text().into()))
    }
}

impl Debug for Shunter {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.debug_struct("Shunter")
            .field("expression", &self.expression)
            .field("operators", &self.operators)
            .finish()
    }
}

fn unexpected(position: usize, found: &str) -> Error {
    Error::Unexpected {
        position,
        found: found.into(),
    }
}

/// Pop operators to the output up to the closest open parenthesis, which is
/// removed. Returns whether that parenthesis opened a call, and the number of
/// arguments separated so far, or `None` if there is no open parenthesis.
fn unwind(operators: &mut Vec<Pending>, output: &mut Vec<Token>) -> Option<(bool, usize)> {
    while let Some(pending) = operators.pop() {
        if let Pending::Paren { call, args } = pending {
            return Some((call, args));
        }
        output.extend(pending.into_token());
    }
    None
}

/// Move the function owning a just closed argument list to the output,
/// checking its argument count when the function is known.
fn close_call(operators: &mut Vec<Pending>, output: &mut Vec<Token>, args: usize) -> Result<(), Error> {
    match operators.pop() {
        Some(Pending::Function(token)) => {
            if let Some(operation) = Operation::function(token.text()) {
                if operation.arity() != args {
                    return Err(Error::Arity {
                        name: token.text().into(),
                        expected: operation.arity(),
                        found: args,
                    });
                }
            }
            output.push(token);
            Ok(())
        }
        Some(other) => {
            operators.push(other);
            Err(Error::MismatchedParenthesis)
        }
        None => Err(Error::MismatchedParenthesis),
    }
}
