// Aggregation Reducers
//
// Statistical reducers over data-point streams. Each reducer is a
// four-part fold (new accumulator, accumulate, combine, finish) whose
// combine step is associative, so grouped reductions can later be split
// across workers without changing results.
//
// Reducers are type-directed: the concrete fold is selected from the
// input expression's type tag when the aggregation is built, never by
// inspecting values mid-stream.

use crate::engine::error::{EngineError, EngineResult};
use crate::expr::{Context, Expression};
use crate::model::data_point::DataPoint;
use crate::model::types::ScalarType;
use crate::model::value::ScalarValue;

/// The reducer selected for an aggregation, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReducerKind {
    Count,
    SumInteger,
    SumNumber,
    Avg,
    Median,
    Min,
    Max,
    /// Variance and standard deviation share one accumulator; `sample`
    /// selects the N−1 divisor and `sqrt` the standard-deviation finish.
    Deviation { sample: bool, sqrt: bool },
}

/// Intermediate state of a reducer fold.
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    Count(i64),
    SumInteger(i64),
    SumNumber(f64),
    Avg { sum: f64, count: u64 },
    /// Collected inputs for median and deviation reducers, which need the
    /// whole group before finishing. A seen null poisons the result.
    Samples { values: Vec<f64>, saw_null: bool },
    /// Running winner for min/max under nulls-first ordering. `None`
    /// means no data point was seen at all.
    Extreme { best: Option<ScalarValue> },
}

/// A statistical aggregation over a stream of data points.
///
/// Couples an optional input expression (resolved per point) with a
/// type-directed reducer and a declared result type.
#[derive(Debug, Clone)]
pub struct Aggregation {
    kind: ReducerKind,
    expr: Option<Expression>,
    result_type: ScalarType,
}

impl Aggregation {
    /// `count()`: counts data points, nulls included. Integer result.
    pub fn count() -> Aggregation {
        Aggregation {
            kind: ReducerKind::Count,
            expr: None,
            result_type: ScalarType::Integer,
        }
    }

    /// `sum(e)`: Integer input sums to Integer, Number to Number. Nulls
    /// are skipped; an empty stream sums to the typed zero.
    pub fn sum(expr: Expression) -> EngineResult<Aggregation> {
        let (kind, result_type) = match expr.result_type() {
            ScalarType::Integer => (ReducerKind::SumInteger, ScalarType::Integer),
            ScalarType::Number => (ReducerKind::SumNumber, ScalarType::Number),
            other => return Err(not_aggregable("sum", other)),
        };
        Ok(Aggregation {
            kind,
            expr: Some(expr),
            result_type,
        })
    }

    /// `avg(e)`: always Number. Nulls are skipped; a stream with no
    /// non-null input averages to null.
    pub fn avg(expr: Expression) -> EngineResult<Aggregation> {
        Aggregation::numeric(ReducerKind::Avg, "avg", expr)
    }

    /// `median(e)`: Number. Any null input makes the result null; an even
    /// count averages the two middle values.
    pub fn median(expr: Expression) -> EngineResult<Aggregation> {
        Aggregation::numeric(ReducerKind::Median, "median", expr)
    }

    /// `min(e)`: result type follows the input. Nulls order before
    /// non-nulls, so any null input wins the minimum.
    pub fn min(expr: Expression) -> EngineResult<Aggregation> {
        let result_type = expr.result_type();
        if !result_type.is_numeric() {
            return Err(not_aggregable("min", result_type));
        }
        Ok(Aggregation {
            kind: ReducerKind::Min,
            expr: Some(expr),
            result_type,
        })
    }

    /// `max(e)`: result type follows the input. Nulls order before
    /// non-nulls, so they never win the maximum of a non-empty stream.
    pub fn max(expr: Expression) -> EngineResult<Aggregation> {
        let result_type = expr.result_type();
        if !result_type.is_numeric() {
            return Err(not_aggregable("max", result_type));
        }
        Ok(Aggregation {
            kind: ReducerKind::Max,
            expr: Some(expr),
            result_type,
        })
    }

    /// `stddev_pop(e)`: population standard deviation (N divisor).
    pub fn stddev_pop(expr: Expression) -> EngineResult<Aggregation> {
        Aggregation::numeric(
            ReducerKind::Deviation {
                sample: false,
                sqrt: true,
            },
            "stddev_pop",
            expr,
        )
    }

    /// `stddev_samp(e)`: sample standard deviation (N−1 divisor).
    pub fn stddev_samp(expr: Expression) -> EngineResult<Aggregation> {
        Aggregation::numeric(
            ReducerKind::Deviation {
                sample: true,
                sqrt: true,
            },
            "stddev_samp",
            expr,
        )
    }

    /// `var_pop(e)`: population variance (N divisor).
    pub fn var_pop(expr: Expression) -> EngineResult<Aggregation> {
        Aggregation::numeric(
            ReducerKind::Deviation {
                sample: false,
                sqrt: false,
            },
            "var_pop",
            expr,
        )
    }

    /// `var_samp(e)`: sample variance (N−1 divisor).
    pub fn var_samp(expr: Expression) -> EngineResult<Aggregation> {
        Aggregation::numeric(
            ReducerKind::Deviation {
                sample: true,
                sqrt: false,
            },
            "var_samp",
            expr,
        )
    }

    fn numeric(kind: ReducerKind, name: &str, expr: Expression) -> EngineResult<Aggregation> {
        if !expr.result_type().is_numeric() {
            return Err(not_aggregable(name, expr.result_type()));
        }
        Ok(Aggregation {
            kind,
            expr: Some(expr),
            result_type: ScalarType::Number,
        })
    }

    /// The declared type of the finished value.
    pub fn result_type(&self) -> ScalarType {
        self.result_type
    }

    /// Supply a fresh, empty accumulator.
    pub fn new_accumulator(&self) -> Accumulator {
        match self.kind {
            ReducerKind::Count => Accumulator::Count(0),
            ReducerKind::SumInteger => Accumulator::SumInteger(0),
            ReducerKind::SumNumber => Accumulator::SumNumber(0.0),
            ReducerKind::Avg => Accumulator::Avg { sum: 0.0, count: 0 },
            ReducerKind::Median | ReducerKind::Deviation { .. } => Accumulator::Samples {
                values: Vec::new(),
                saw_null: false,
            },
            ReducerKind::Min | ReducerKind::Max => Accumulator::Extreme { best: None },
        }
    }

    /// Fold one data point into the accumulator.
    pub fn accumulate(&self, acc: &mut Accumulator, point: &DataPoint) -> EngineResult<()> {
        let value = match &self.expr {
            Some(expr) => expr.resolve(&Context::with_point(point))?,
            None => ScalarValue::Null,
        };
        match (acc, self.kind) {
            (Accumulator::Count(n), ReducerKind::Count) => {
                *n += 1;
                Ok(())
            }
            (Accumulator::SumInteger(sum), ReducerKind::SumInteger) => {
                if let Some(v) = value.as_integer() {
                    *sum = sum.checked_add(v).ok_or_else(|| {
                        EngineError::invalid_argument(format!("integer overflow in sum at {}", v))
                    })?;
                }
                Ok(())
            }
            (Accumulator::SumNumber(sum), ReducerKind::SumNumber) => {
                if let Some(v) = value.as_number() {
                    *sum += v;
                }
                Ok(())
            }
            (Accumulator::Avg { sum, count }, ReducerKind::Avg) => {
                if let Some(v) = value.as_number() {
                    *sum += v;
                    *count += 1;
                }
                Ok(())
            }
            (
                Accumulator::Samples { values, saw_null },
                ReducerKind::Median | ReducerKind::Deviation { .. },
            ) => {
                match value.as_number() {
                    Some(v) => values.push(v),
                    None => *saw_null = true,
                }
                Ok(())
            }
            (Accumulator::Extreme { best }, ReducerKind::Min) => {
                replace_if(best, value, std::cmp::Ordering::Less);
                Ok(())
            }
            (Accumulator::Extreme { best }, ReducerKind::Max) => {
                replace_if(best, value, std::cmp::Ordering::Greater);
                Ok(())
            }
            _ => Err(EngineError::invalid_argument(
                "accumulator does not belong to this aggregation",
            )),
        }
    }

    /// Merge two partial accumulators. Associative together with
    /// `accumulate`: folding a partition and combining equals folding the
    /// whole stream.
    pub fn combine(&self, left: Accumulator, right: Accumulator) -> EngineResult<Accumulator> {
        match (left, right) {
            (Accumulator::Count(a), Accumulator::Count(b)) => Ok(Accumulator::Count(a + b)),
            (Accumulator::SumInteger(a), Accumulator::SumInteger(b)) => a
                .checked_add(b)
                .map(Accumulator::SumInteger)
                .ok_or_else(|| EngineError::invalid_argument("integer overflow in sum combine")),
            (Accumulator::SumNumber(a), Accumulator::SumNumber(b)) => {
                Ok(Accumulator::SumNumber(a + b))
            }
            (
                Accumulator::Avg { sum: s1, count: c1 },
                Accumulator::Avg { sum: s2, count: c2 },
            ) => Ok(Accumulator::Avg {
                sum: s1 + s2,
                count: c1 + c2,
            }),
            (
                Accumulator::Samples {
                    mut values,
                    saw_null,
                },
                Accumulator::Samples {
                    values: more,
                    saw_null: other_null,
                },
            ) => {
                values.extend(more);
                Ok(Accumulator::Samples {
                    values,
                    saw_null: saw_null || other_null,
                })
            }
            (Accumulator::Extreme { best: a }, Accumulator::Extreme { best: b }) => {
                let wanted = if self.kind == ReducerKind::Min {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Greater
                };
                let mut best = a;
                if let Some(candidate) = b {
                    replace_if(&mut best, candidate, wanted);
                }
                Ok(Accumulator::Extreme { best })
            }
            _ => Err(EngineError::invalid_argument(
                "cannot combine accumulators of different reducers",
            )),
        }
    }

    /// Finish the fold, producing the aggregate value.
    pub fn finish(&self, acc: Accumulator) -> ScalarValue {
        match (acc, self.kind) {
            (Accumulator::Count(n), _) => ScalarValue::Integer(n),
            (Accumulator::SumInteger(sum), _) => ScalarValue::Integer(sum),
            (Accumulator::SumNumber(sum), _) => ScalarValue::Number(sum),
            (Accumulator::Avg { count: 0, .. }, _) => ScalarValue::Null,
            (Accumulator::Avg { sum, count }, _) => ScalarValue::Number(sum / count as f64),
            (Accumulator::Samples { saw_null: true, .. }, _) => ScalarValue::Null,
            (Accumulator::Samples { values, .. }, ReducerKind::Median) => median(values),
            (Accumulator::Samples { values, .. }, ReducerKind::Deviation { sample, sqrt }) => {
                deviation(&values, sample, sqrt)
            }
            (Accumulator::Extreme { best }, _) => best.unwrap_or(ScalarValue::Null),
            // accumulate() already rejected foreign accumulators
            (acc, kind) => unreachable!("accumulator {:?} finished by {:?}", acc, kind),
        }
    }
}

fn not_aggregable(name: &str, ty: ScalarType) -> EngineError {
    EngineError::unsupported_type(format!("cannot aggregate {} over {} input", name, ty))
}

/// Replace `best` when `candidate` compares to it with the wanted
/// ordering, nulls first.
fn replace_if(best: &mut Option<ScalarValue>, candidate: ScalarValue, wanted: std::cmp::Ordering) {
    match best {
        None => *best = Some(candidate),
        Some(current) => {
            if candidate.cmp_nulls_first(current) == wanted {
                *best = Some(candidate);
            }
        }
    }
}

fn median(mut values: Vec<f64>) -> ScalarValue {
    if values.is_empty() {
        return ScalarValue::Null;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        ScalarValue::Number((values[mid - 1] + values[mid]) / 2.0)
    } else {
        ScalarValue::Number(values[mid])
    }
}

fn deviation(values: &[f64], sample: bool, sqrt: bool) -> ScalarValue {
    if values.len() <= 1 {
        return ScalarValue::Number(0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let squared: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    let divisor = if sample { n - 1.0 } else { n };
    let variance = squared / divisor;
    ScalarValue::Number(if sqrt { variance.sqrt() } else { variance })
}
