//! Threshold conditions over derived character metrics
//!
//! A condition has the shape `stat operator value`, e.g. `hunger >= 1` or
//! `weight_percent > 150`. Conditions arrive either as the three fields of an
//! authored system check or as a single expression string.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::multispace0;
use nom::combinator::all_consuming;
use nom::number::complete::double;
use nom::sequence::delimited;
use nom::{IResult, Parser};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::character::CharacterState;

/// Error type for condition parsing
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Parse error: {message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Neq => "!=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
        }
    }

    /// Exact-match conditions outrank range conditions during status resolution
    pub fn is_exact(&self) -> bool {
        matches!(self, Operator::Eq)
    }

    pub fn compare(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Operator::Eq => lhs == rhs,
            Operator::Neq => lhs != rhs,
            Operator::Lt => lhs < rhs,
            Operator::Lte => lhs <= rhs,
            Operator::Gt => lhs > rhs,
            Operator::Gte => lhs >= rhs,
        }
    }
}

impl FromStr for Operator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "==" | "=" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Neq),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Lte),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Gte),
            other => Err(ParseError::new(format!("unknown operator '{}'", other))),
        }
    }
}

/// Metrics a condition can test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Hunger,
    Fatigue,
    HpPercent,
    ManaPercent,
    WeightPercent,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Hunger => "hunger",
            Metric::Fatigue => "fatigue",
            Metric::HpPercent => "hp_percent",
            Metric::ManaPercent => "mana_percent",
            Metric::WeightPercent => "weight_percent",
        }
    }
}

impl FromStr for Metric {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hunger" => Ok(Metric::Hunger),
            "fatigue" => Ok(Metric::Fatigue),
            "hp_percent" => Ok(Metric::HpPercent),
            "mana_percent" => Ok(Metric::ManaPercent),
            "weight_percent" => Ok(Metric::WeightPercent),
            other => Err(ParseError::new(format!("unknown stat '{}'", other))),
        }
    }
}

/// Derived metrics captured from a character at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DerivedMetrics {
    pub hunger: i32,
    pub fatigue: i32,
    pub hp_percent: i32,
    pub mana_percent: i32,
    pub weight_percent: i32,
}

impl DerivedMetrics {
    /// Capture metrics; `capacity_bonus` is the weight_capacity modifier total
    pub fn capture(character: &CharacterState, capacity_bonus: i32) -> Self {
        Self {
            hunger: character.hunger,
            fatigue: character.fatigue,
            hp_percent: floor_percent(character.hp, character.max_hp),
            mana_percent: floor_percent(character.mana, character.max_mana),
            weight_percent: weight_percent(
                character.inventory.total_weight(),
                character.inventory.capacity(capacity_bonus),
            ),
        }
    }

    pub fn get(&self, metric: Metric) -> i32 {
        match metric {
            Metric::Hunger => self.hunger,
            Metric::Fatigue => self.fatigue,
            Metric::HpPercent => self.hp_percent,
            Metric::ManaPercent => self.mana_percent,
            Metric::WeightPercent => self.weight_percent,
        }
    }
}

fn floor_percent(value: i32, max: i32) -> i32 {
    if max <= 0 {
        return 0;
    }
    (value as i64 * 100).div_euclid(max as i64) as i32
}

/// Carried weight as a percent of capacity, rounded up.
///
/// Any fractional overage lands in the next percent band.
pub fn weight_percent(total_weight: f64, capacity: f64) -> i32 {
    if capacity <= 0.0 {
        return 0;
    }
    // absorb float noise from fractional item weights
    (total_weight * 100.0 / capacity - 1e-9).ceil().max(0.0) as i32
}

/// A parsed `stat operator value` condition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Condition {
    pub metric: Metric,
    pub operator: Operator,
    pub threshold: f64,
}

impl Condition {
    /// Build a condition from the three fields of an authored system check
    pub fn new(stat: &str, operator: &str, threshold: f64) -> Result<Self, ParseError> {
        if !threshold.is_finite() {
            return Err(ParseError::new(format!("threshold {} is not finite", threshold)));
        }
        Ok(Self {
            metric: stat.parse()?,
            operator: operator.parse()?,
            threshold,
        })
    }

    /// Parse a textual condition such as `hunger >= 1`
    pub fn parse(expr: &str) -> Result<Self, ParseError> {
        let (_, (stat, operator, threshold)) = all_consuming(condition_expr)
            .parse(expr)
            .map_err(|e| ParseError::new(format!("invalid condition '{}': {}", expr, e)))?;
        Self::new(stat, operator, threshold)
    }

    pub fn is_satisfied(&self, metrics: &DerivedMetrics) -> bool {
        self.operator
            .compare(metrics.get(self.metric) as f64, self.threshold)
    }
}

impl FromStr for Condition {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::parse(s)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.metric.name(),
            self.operator.symbol(),
            self.threshold
        )
    }
}

fn condition_expr(input: &str) -> IResult<&str, (&str, &str, f64)> {
    (
        delimited(
            multispace0,
            take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
            multispace0,
        ),
        alt((
            tag("=="),
            tag("!="),
            tag("<="),
            tag(">="),
            tag("<"),
            tag(">"),
        )),
        delimited(multispace0, double, multispace0),
    )
        .parse(input)
}

/// Evaluate an authored check against captured metrics.
///
/// A malformed check is never satisfied; the failure is logged, not returned,
/// so one bad definition cannot break resolution for its whole category.
pub fn evaluate(stat: &str, operator: &str, threshold: f64, metrics: &DerivedMetrics) -> bool {
    match Condition::new(stat, operator, threshold) {
        Ok(condition) => condition.is_satisfied(metrics),
        Err(e) => {
            tracing::debug!(
                "Treating condition '{} {} {}' as unmet: {}",
                stat,
                operator,
                threshold,
                e
            );
            false
        }
    }
}
