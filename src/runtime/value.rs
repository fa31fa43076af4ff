use std::{cmp::Ordering, fmt::Display};

use serde::Serialize;

use crate::{
    ast::expressions::{BinaryOp, Literal, UnaryOp},
    errors::errors::{Error, ErrorImpl},
};

/// A runtime value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Str(String),
    Bool(bool),
    Array(Vec<Value>),
    Null,
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Integer(value) => Value::Integer(*value),
            Literal::Real(value) => Value::Real(*value),
            Literal::String(value) => Value::Str(value.clone()),
            Literal::Boolean(value) => Value::Bool(*value),
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
            Value::Str(_) => "STRING",
            Value::Bool(_) => "BOOLEAN",
            Value::Array(_) => "ARRAY",
            Value::Null => "NULL",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(value) => *value != 0,
            Value::Real(value) => *value != 0.0,
            Value::Str(value) => !value.is_empty(),
            Value::Bool(value) => *value,
            Value::Array(_) => true,
            Value::Null => false,
        }
    }

    fn as_real(&self) -> Option<f64> {
        match self {
            Value::Integer(value) => Some(*value as f64),
            Value::Real(value) => Some(*value),
            _ => None,
        }
    }

    /// Equality without coercion across kinds, except that integers and
    /// reals compare by numeric value.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(_), Value::Real(_)) | (Value::Real(_), Value::Integer(_)) => {
                self.as_real() == other.as_real()
            }
            _ => self == other,
        }
    }

    /// Element or character at `index`, `Null` when out of range or not indexable.
    pub fn index(&self, index: &Value) -> Value {
        let Value::Integer(index) = index else {
            return Value::Null;
        };
        let Ok(index) = usize::try_from(*index) else {
            return Value::Null;
        };

        match self {
            Value::Array(elements) => elements.get(index).cloned().unwrap_or(Value::Null),
            Value::Str(value) => value
                .chars()
                .nth(index)
                .map(|c| Value::Str(c.to_string()))
                .unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }

    pub fn apply_unary(&self, operator: UnaryOp) -> Result<Value, Error> {
        match (operator, self) {
            (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
            (UnaryOp::Plus, Value::Integer(_) | Value::Real(_)) => Ok(self.clone()),
            (UnaryOp::Minus, Value::Integer(value)) => value
                .checked_neg()
                .map(Value::Integer)
                .ok_or_else(|| Error::unpositioned(ErrorImpl::IntegerOverflow)),
            (UnaryOp::Minus, Value::Real(value)) => Ok(Value::Real(-value)),
            _ => Err(Error::unpositioned(ErrorImpl::InvalidOperand {
                operator: operator.to_string(),
                operand: String::from(self.type_name()),
            })),
        }
    }

    pub fn apply_binary(&self, operator: BinaryOp, right: &Value) -> Result<Value, Error> {
        if operator == BinaryOp::Equals {
            return Ok(Value::Bool(self.strict_equals(right)));
        }
        if operator.is_comparison() {
            return self.compare(operator, right);
        }

        match (self, right) {
            (Value::Integer(left), Value::Integer(right)) => {
                integer_arithmetic(operator, *left, *right).map(Value::Integer)
            }
            (Value::Str(left), Value::Str(right)) if operator == BinaryOp::Add => {
                Ok(Value::Str(format!("{}{}", left, right)))
            }
            _ => match (self.as_real(), right.as_real()) {
                (Some(left), Some(right)) => Ok(Value::Real(real_arithmetic(operator, left, right))),
                _ => Err(self.invalid_operands(operator, right)),
            },
        }
    }

    fn compare(&self, operator: BinaryOp, right: &Value) -> Result<Value, Error> {
        let ordering = match (self, right) {
            (Value::Str(left), Value::Str(right)) => Some(left.cmp(right)),
            _ => match (self.as_real(), right.as_real()) {
                (Some(left), Some(right)) => left.partial_cmp(&right),
                _ => return Err(self.invalid_operands(operator, right)),
            },
        };

        // NaN compares false both ways
        let Some(ordering) = ordering else {
            return Ok(Value::Bool(false));
        };

        Ok(Value::Bool(match operator {
            BinaryOp::Less => ordering == Ordering::Less,
            BinaryOp::LessEquals => ordering != Ordering::Greater,
            BinaryOp::Greater => ordering == Ordering::Greater,
            _ => ordering != Ordering::Less,
        }))
    }

    fn invalid_operands(&self, operator: BinaryOp, right: &Value) -> Error {
        Error::unpositioned(ErrorImpl::InvalidOperands {
            operator: operator.to_string(),
            left: String::from(self.type_name()),
            right: String::from(right.type_name()),
        })
    }
}

fn integer_arithmetic(operator: BinaryOp, left: i64, right: i64) -> Result<i64, Error> {
    if right == 0 && matches!(operator, BinaryOp::Divide | BinaryOp::Modulo) {
        return Err(Error::unpositioned(ErrorImpl::DivisionByZero));
    }

    let result = match operator {
        BinaryOp::Add => left.checked_add(right),
        BinaryOp::Subtract => left.checked_sub(right),
        BinaryOp::Multiply => left.checked_mul(right),
        BinaryOp::Divide => left.checked_div(right),
        _ => left.checked_rem(right),
    };

    result.ok_or_else(|| Error::unpositioned(ErrorImpl::IntegerOverflow))
}

fn real_arithmetic(operator: BinaryOp, left: f64, right: f64) -> f64 {
    match operator {
        BinaryOp::Add => left + right,
        BinaryOp::Subtract => left - right,
        BinaryOp::Multiply => left * right,
        BinaryOp::Divide => left / right,
        _ => left % right,
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Real(value) => write!(f, "{}", value),
            Value::Str(value) => write!(f, "{}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Array(elements) => {
                let elements = elements
                    .iter()
                    .map(|element| element.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "[{}]", elements)
            }
            Value::Null => write!(f, "null"),
        }
    }
}
