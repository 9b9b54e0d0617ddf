//! Recursive descent parser for JSONPath expressions

use super::ast::*;
use super::error::JsonPathError;

type ParseResult<T> = std::result::Result<T, JsonPathError>;

/// Deepest filter expression tree the parser will build
pub const MAX_FILTER_DEPTH: usize = 256;

/// JSONPath expression parser
///
/// Works on byte offsets into the input so errors can point at the exact
/// failing character.
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> ParseResult<Self> {
        if input.trim().is_empty() {
            return Err(JsonPathError::parse("Empty JSONPath expression", 0, input));
        }
        Ok(Self {
            input,
            position: 0,
            depth: 0,
        })
    }

    /// Parse the whole input into a [`Path`]
    pub fn parse(mut self) -> ParseResult<Path> {
        self.skip_whitespace();
        if self.peek() != Some('$') {
            return Err(self.syntax_error("JSONPath must start with $", &["$"]));
        }
        self.bump();

        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('.') if self.peek_nth(1) == Some('.') => {
                    self.bump();
                    self.bump();
                    selectors.push(Selector::Descendants);
                    match self.peek() {
                        Some('*') => {
                            self.bump();
                            selectors.push(Selector::Wildcard);
                        }
                        // Bracket selectors after `..` are handled on the next turn
                        Some('[') => {}
                        Some(c) if is_member_char(c) => {
                            selectors.push(Selector::Child(self.parse_member_name()?));
                        }
                        _ => {
                            return Err(self.syntax_error(
                                "Expected member name, '*' or '[' after '..'",
                                &["identifier", "*", "["],
                            ))
                        }
                    }
                }
                Some('.') => {
                    self.bump();
                    if self.peek() == Some('*') {
                        self.bump();
                        selectors.push(Selector::Wildcard);
                    } else {
                        selectors.push(Selector::Child(self.parse_member_name()?));
                    }
                }
                Some('[') => selectors.push(self.parse_bracket()?),
                Some(_) => {
                    return Err(self.syntax_error("Unexpected character", &[".", "..", "["]))
                }
            }
        }

        Ok(Path::new(selectors))
    }

    fn parse_member_name(&mut self) -> ParseResult<String> {
        let start = self.position;
        while let Some(c) = self.peek() {
            if is_member_char(c) {
                self.bump();
            } else {
                break;
            }
        }
        if start == self.position {
            return Err(self.syntax_error("Expected member name", &["identifier", "*"]));
        }
        Ok(self.input[start..self.position].to_string())
    }

    fn parse_bracket(&mut self) -> ParseResult<Selector> {
        let open = self.position;
        self.bump();
        self.skip_whitespace();

        match self.peek() {
            Some('?') => {
                self.bump();
                let filter = self.parse_or()?;
                self.skip_whitespace();
                self.expect(']')?;
                return Ok(Selector::Filter(filter));
            }
            Some('(') => {
                return Err(JsonPathError::unsupported(
                    "script expressions such as [(@.length-1)]",
                    Some("a negative index such as [-1]"),
                ))
            }
            None => return Err(JsonPathError::parse("Unterminated bracket selector", open, self.input)),
            _ => {}
        }

        let mut members = vec![self.parse_bracket_member()?];
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    self.skip_whitespace();
                    members.push(self.parse_bracket_member()?);
                }
                Some(']') => {
                    self.bump();
                    break;
                }
                None => {
                    return Err(JsonPathError::parse(
                        "Unterminated bracket selector",
                        open,
                        self.input,
                    ))
                }
                Some(_) => return Err(self.syntax_error("Expected ',' or ']'", &[",", "]"])),
            }
        }

        if members.len() == 1 {
            Ok(members.remove(0))
        } else {
            Ok(Selector::Union(members))
        }
    }

    fn parse_bracket_member(&mut self) -> ParseResult<Selector> {
        match self.peek() {
            Some('*') => {
                self.bump();
                Ok(Selector::Wildcard)
            }
            Some('\'') | Some('"') => Ok(Selector::Child(self.parse_quoted()?)),
            Some(c) if c == '-' || c == ':' || c.is_ascii_digit() => self.parse_index_or_slice(),
            _ => Err(self.syntax_error(
                "Invalid bracket selector",
                &["index", "slice", "quoted name", "*", "?"],
            )),
        }
    }

    fn parse_index_or_slice(&mut self) -> ParseResult<Selector> {
        let start = self.parse_optional_integer()?;
        self.skip_whitespace();
        if self.peek() != Some(':') {
            return match start {
                Some(index) => Ok(Selector::Index(index)),
                None => Err(self.syntax_error("Expected array index", &["integer"])),
            };
        }

        self.bump();
        self.skip_whitespace();
        let end = self.parse_optional_integer()?;
        self.skip_whitespace();
        let mut step = 1;
        if self.peek() == Some(':') {
            self.bump();
            self.skip_whitespace();
            step = self.parse_optional_integer()?.unwrap_or(1);
        }
        Ok(Selector::Slice(SliceBounds { start, end, step }))
    }

    fn parse_optional_integer(&mut self) -> ParseResult<Option<i64>> {
        let start = self.position;
        if self.peek() == Some('-') {
            self.bump();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        let text = &self.input[start..self.position];
        if text.is_empty() {
            return Ok(None);
        }
        text.parse()
            .map(Some)
            .map_err(|_| JsonPathError::parse(format!("Invalid integer: {}", text), start, self.input))
    }

    fn parse_quoted(&mut self) -> ParseResult<String> {
        let start = self.position;
        let quote = match self.bump() {
            Some(q) => q,
            None => return Err(JsonPathError::parse("Expected quote", start, self.input)),
        };

        let mut value = String::new();
        while let Some(c) = self.bump() {
            match c {
                '\\' => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some(other) => value.push(other),
                    None => break,
                },
                c if c == quote => return Ok(value),
                c => value.push(c),
            }
        }
        Err(JsonPathError::parse("Unterminated string literal", start, self.input))
    }

    fn parse_or(&mut self) -> ParseResult<FilterExpression> {
        let entry = self.depth;
        let mut left = self.parse_and()?;
        while self.eat("||") {
            self.descend()?;
            let right = self.parse_and()?;
            left = binary(left, BinaryOperator::Or, right);
        }
        self.depth = entry;
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<FilterExpression> {
        let entry = self.depth;
        let mut left = self.parse_equality()?;
        while self.eat("&&") {
            self.descend()?;
            let right = self.parse_equality()?;
            left = binary(left, BinaryOperator::And, right);
        }
        self.depth = entry;
        Ok(left)
    }

    fn parse_equality(&mut self) -> ParseResult<FilterExpression> {
        let entry = self.depth;
        let mut left = self.parse_comparison()?;
        loop {
            let operator = if self.eat("==") {
                BinaryOperator::Equal
            } else if self.eat("!=") {
                BinaryOperator::NotEqual
            } else if self.eat("=~") {
                BinaryOperator::RegexMatch
            } else {
                break;
            };
            self.descend()?;
            let right = self.parse_comparison()?;
            left = binary(left, operator, right);
        }
        self.depth = entry;
        Ok(left)
    }

    fn parse_comparison(&mut self) -> ParseResult<FilterExpression> {
        let entry = self.depth;
        let mut left = self.parse_unary()?;
        loop {
            let operator = if self.eat("<=") {
                BinaryOperator::LessThanOrEqual
            } else if self.eat(">=") {
                BinaryOperator::GreaterThanOrEqual
            } else if self.eat("<") {
                BinaryOperator::LessThan
            } else if self.eat(">") {
                BinaryOperator::GreaterThan
            } else if self.eat_keyword("in") {
                BinaryOperator::In
            } else {
                break;
            };
            self.descend()?;
            let right = self.parse_unary()?;
            left = binary(left, operator, right);
        }
        self.depth = entry;
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<FilterExpression> {
        self.skip_whitespace();
        match self.peek() {
            Some('!') if self.peek_nth(1) != Some('=') => {
                self.bump();
                let operand = self.nested(Self::parse_unary)?;
                Ok(FilterExpression::Not(Box::new(operand)))
            }
            Some('-') if !self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.bump();
                let operand = self.nested(Self::parse_unary)?;
                Ok(FilterExpression::Negate(Box::new(operand)))
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> ParseResult<FilterExpression> {
        self.skip_whitespace();
        match self.peek() {
            Some('(') => {
                self.bump();
                let inner = self.nested(Self::parse_or)?;
                self.skip_whitespace();
                self.expect(')')?;
                Ok(inner)
            }
            Some('@') => {
                self.bump();
                self.parse_filter_path(FilterExpression::Current)
            }
            Some('$') => {
                self.bump();
                self.parse_filter_path(FilterExpression::Root)
            }
            Some('\'') | Some('"') => Ok(FilterExpression::Literal(Literal::String(
                self.parse_quoted()?,
            ))),
            Some(c) if c == '-' || c.is_ascii_digit() => {
                Ok(FilterExpression::Literal(Literal::Number(self.parse_number()?)))
            }
            Some(c) if c.is_alphabetic() => {
                let start = self.position;
                let word = self.parse_member_name()?;
                match word.as_str() {
                    "true" => Ok(FilterExpression::Literal(Literal::Boolean(true))),
                    "false" => Ok(FilterExpression::Literal(Literal::Boolean(false))),
                    "null" => Ok(FilterExpression::Literal(Literal::Null)),
                    _ => {
                        let function = FilterFunction::from_name(&word).ok_or_else(|| {
                            JsonPathError::function(word.clone(), "unknown function")
                        })?;
                        self.skip_whitespace();
                        if self.peek() != Some('(') {
                            return Err(JsonPathError::parse(
                                format!("Unexpected identifier: {}", word),
                                start,
                                self.input,
                            ));
                        }
                        self.bump();
                        let args = self.nested(Self::parse_arguments)?;
                        if args.len() > 1 {
                            return Err(JsonPathError::function(
                                word,
                                format!("expected at most 1 argument, got {}", args.len()),
                            ));
                        }
                        Ok(FilterExpression::Function { function, args })
                    }
                }
            }
            Some(_) => Err(self.syntax_error(
                "Unexpected character in filter expression",
                &["@", "$", "literal", "function", "("],
            )),
            None => Err(JsonPathError::parse(
                "Unexpected end of filter expression",
                self.position,
                self.input,
            )),
        }
    }

    fn parse_filter_path(&mut self, base: FilterExpression) -> ParseResult<FilterExpression> {
        let entry = self.depth;
        let mut expr = base;
        loop {
            if matches!(self.peek(), Some('.' | '[')) {
                self.descend()?;
            }
            match self.peek() {
                Some('.') if self.peek_nth(1) != Some('.') => {
                    self.bump();
                    let name = self.parse_member_name()?;
                    expr = FilterExpression::Property {
                        base: Box::new(expr),
                        name,
                    };
                }
                Some('[') => {
                    self.bump();
                    self.skip_whitespace();
                    expr = match self.peek() {
                        Some('\'') | Some('"') => FilterExpression::Property {
                            base: Box::new(expr),
                            name: self.parse_quoted()?,
                        },
                        _ => {
                            let index = self
                                .parse_optional_integer()?
                                .ok_or_else(|| self.syntax_error("Expected index", &["integer"]))?;
                            FilterExpression::Index {
                                base: Box::new(expr),
                                index,
                            }
                        }
                    };
                    self.skip_whitespace();
                    self.expect(']')?;
                }
                _ => break,
            }
        }
        self.depth = entry;
        Ok(expr)
    }

    /// Run `parse` one level deeper in the expression tree
    fn nested<T>(&mut self, parse: fn(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.descend()?;
        let result = parse(self)?;
        self.depth -= 1;
        Ok(result)
    }

    fn descend(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_FILTER_DEPTH {
            return Err(JsonPathError::parse(
                format!("Filter nesting too deep (limit {})", MAX_FILTER_DEPTH),
                self.position,
                self.input,
            ));
        }
        Ok(())
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<FilterExpression>> {
        let mut args = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(args);
        }
        loop {
            args.push(self.parse_or()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                _ => break,
            }
        }
        self.expect(')')?;
        Ok(args)
    }

    fn parse_number(&mut self) -> ParseResult<f64> {
        let start = self.position;
        if self.peek() == Some('-') {
            self.bump();
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E')
        {
            let c = self.bump();
            if matches!(c, Some('e') | Some('E')) && matches!(self.peek(), Some('+') | Some('-')) {
                self.bump();
            }
        }
        let text = &self.input[start..self.position];
        text.parse()
            .map_err(|_| JsonPathError::parse(format!("Invalid number: {}", text), start, self.input))
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.input[self.position..].starts_with(token) {
            self.position += token.len();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_whitespace();
        let Some(after) = self.input[self.position..].strip_prefix(keyword) else {
            return false;
        };
        if after.chars().next().map_or(true, |c| !is_member_char(c)) {
            self.position += keyword.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> ParseResult<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            _ => Err(self.syntax_error(format!("Expected '{}'", expected), &[&expected.to_string()])),
        }
    }

    fn syntax_error(&self, message: impl Into<String>, expected: &[&str]) -> JsonPathError {
        let found = self
            .peek()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "EOF".to_string());
        JsonPathError::syntax(message, self.position, self.input, expected, found)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.position..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }
}

fn is_member_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '$'
}

fn binary(left: FilterExpression, operator: BinaryOperator, right: FilterExpression) -> FilterExpression {
    FilterExpression::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }
}
