//! Abstract syntax tree for JSONPath expressions
//!
//! `Path` is what the parser produces; `CompiledPath` is the step pipeline
//! the executor runs after [`super::compiler::compile`] has fused and
//! de-duplicated selectors.

use std::fmt;

/// A parsed JSONPath expression. The leading `$` is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Selectors applied in order, starting from the root node
    pub selectors: Vec<Selector>,
}

/// One selector in a parsed path
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Member access by name (`.name`, `['name']`)
    Child(String),
    /// Array element access (`[n]`, `[-n]`)
    Index(i64),
    /// Array slice (`[start:end:step]`)
    Slice(SliceBounds),
    /// Every child of an object or array (`*`, `[*]`)
    Wildcard,
    /// The node itself and all of its descendants (`..`)
    Descendants,
    /// Several selectors applied to the same node (`[0,1]`, `['a','b']`)
    Union(Vec<Selector>),
    /// Children that satisfy a predicate (`[?(...)]`)
    Filter(FilterExpression),
}

/// Slice bounds; missing bounds default by direction of the step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceBounds {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub step: i64,
}

/// A compiled path ready for execution
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPath {
    pub steps: Vec<Step>,
}

/// Executable step produced by the compiler
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Child(String),
    Index(i64),
    Slice(SliceBounds),
    Wildcard,
    /// Descendants-or-self
    Descendants,
    /// `..name` fused into a single pass
    DescendantMember(String),
    Union(Vec<Step>),
    Filter(FilterExpression),
}

/// Filter predicate AST
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpression {
    /// `@`
    Current,
    /// `$`
    Root,
    Property {
        base: Box<FilterExpression>,
        name: String,
    },
    Index {
        base: Box<FilterExpression>,
        index: i64,
    },
    Literal(Literal),
    Binary {
        left: Box<FilterExpression>,
        operator: BinaryOperator,
        right: Box<FilterExpression>,
    },
    Not(Box<FilterExpression>),
    Negate(Box<FilterExpression>),
    Function {
        function: FilterFunction,
        args: Vec<FilterExpression>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
    /// `=~`, right operand is a regular expression
    RegexMatch,
    /// `in`, membership in an array, substring, or object key
    In,
}

/// Built-in functions usable inside filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterFunction {
    Length,
    Size,
    Type,
    Keys,
    Values,
}

impl FilterFunction {
    /// Resolve a function by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "length" => Some(Self::Length),
            "size" => Some(Self::Size),
            "type" => Some(Self::Type),
            "keys" => Some(Self::Keys),
            "values" => Some(Self::Values),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Size => "size",
            Self::Type => "type",
            Self::Keys => "keys",
            Self::Values => "values",
        }
    }
}

impl Path {
    pub fn new(selectors: Vec<Selector>) -> Self {
        Self { selectors }
    }

    /// True for the bare root path `$`
    pub fn is_root(&self) -> bool {
        self.selectors.is_empty()
    }

    /// True when no selector can produce more than one node
    pub fn is_singular(&self) -> bool {
        self.selectors
            .iter()
            .all(|s| matches!(s, Selector::Child(_) | Selector::Index(_)))
    }
}

impl CompiledPath {
    /// Property name if this path is exactly `$.name`
    pub fn simple_property(&self) -> Option<&str> {
        match self.steps.as_slice() {
            [Step::Child(name)] => Some(name),
            _ => None,
        }
    }
}

fn write_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let plain = !name.is_empty()
        && name
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
    if plain {
        write!(f, ".{}", name)
    } else {
        write!(f, "['{}']", name.replace('\'', "\\'"))
    }
}

impl fmt::Display for SliceBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{}", start)?;
        }
        write!(f, ":")?;
        if let Some(end) = self.end {
            write!(f, "{}", end)?;
        }
        if self.step != 1 {
            write!(f, ":{}", self.step)?;
        }
        Ok(())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        let mut after_descendants = false;
        for selector in &self.selectors {
            match selector {
                // `..` already supplies the separator
                Selector::Child(name) if after_descendants => {
                    let rendered = Selector::Child(name.clone()).to_string();
                    write!(f, "{}", rendered.strip_prefix('.').unwrap_or(&rendered))?;
                }
                other => write!(f, "{}", other)?,
            }
            after_descendants = matches!(selector, Selector::Descendants);
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Child(name) => write_name(f, name),
            Selector::Index(index) => write!(f, "[{}]", index),
            Selector::Slice(bounds) => write!(f, "[{}]", bounds),
            Selector::Wildcard => write!(f, "[*]"),
            Selector::Descendants => write!(f, ".."),
            Selector::Union(members) => {
                write!(f, "[")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    match member {
                        Selector::Child(name) => write!(f, "'{}'", name)?,
                        Selector::Index(index) => write!(f, "{}", index)?,
                        Selector::Slice(bounds) => write!(f, "{}", bounds)?,
                        other => write!(f, "{}", other)?,
                    }
                }
                write!(f, "]")
            }
            Selector::Filter(filter) => write!(f, "[?({})]", filter),
        }
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpression::Current => write!(f, "@"),
            FilterExpression::Root => write!(f, "$"),
            FilterExpression::Property { base, name } => write!(f, "{}.{}", base, name),
            FilterExpression::Index { base, index } => write!(f, "{}[{}]", base, index),
            FilterExpression::Literal(literal) => write!(f, "{}", literal),
            FilterExpression::Binary {
                left,
                operator,
                right,
            } => write!(f, "{} {} {}", left, operator, right),
            FilterExpression::Not(operand) => write!(f, "!{}", operand),
            FilterExpression::Negate(operand) => write!(f, "-{}", operand),
            FilterExpression::Function { function, args } => {
                write!(f, "{}(", function.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "'{}'", s),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "null"),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::RegexMatch => "=~",
            BinaryOperator::In => "in",
        };
        write!(f, "{}", symbol)
    }
}
