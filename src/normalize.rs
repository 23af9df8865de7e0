//! Shared helpers for turning loosely shaped arguments into wire values.
//!
//! Optional fields are carried as `Option<T>` up to the moment a body or
//! query is assembled; only `Some` values are materialized, so `0`, `false`
//! and `""` survive when a caller supplies them.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Current POSIX time in seconds
pub fn now() -> i64 {
    (Utc::now().timestamp_millis() as f64 / 1000.0).round() as i64
}

/// A sample value, kept integral when the caller gave an integer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PointValue {
    Int(i64),
    Float(f64),
}

impl PointValue {
    fn from_json(value: &Value) -> Option<Self> {
        value
            .as_i64()
            .map(PointValue::Int)
            .or_else(|| value.as_f64().map(PointValue::Float))
    }
}

impl From<i32> for PointValue {
    fn from(value: i32) -> Self {
        PointValue::Int(i64::from(value))
    }
}

impl From<i64> for PointValue {
    fn from(value: i64) -> Self {
        PointValue::Int(value)
    }
}

impl From<f64> for PointValue {
    fn from(value: f64) -> Self {
        PointValue::Float(value)
    }
}

impl From<PointValue> for Value {
    fn from(value: PointValue) -> Self {
        match value {
            PointValue::Int(value) => Value::from(value),
            PointValue::Float(value) => Value::from(value),
        }
    }
}

/// One `[timestamp, value]` sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point(pub i64, pub PointValue);

impl Point {
    pub fn new(timestamp: i64, value: impl Into<PointValue>) -> Self {
        Point(timestamp, value.into())
    }
}

impl From<Point> for Value {
    fn from(point: Point) -> Self {
        Value::Array(vec![Value::from(point.0), Value::from(point.1)])
    }
}

impl From<(i64, f64)> for Point {
    fn from((timestamp, value): (i64, f64)) -> Self {
        Point::new(timestamp, value)
    }
}

impl From<(i64, i64)> for Point {
    fn from((timestamp, value): (i64, i64)) -> Self {
        Point::new(timestamp, value)
    }
}

/// Points as a caller may hand them over
///
/// Bare values get stamped with the time of normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum PointsInput {
    /// A single scalar
    Value(PointValue),
    /// Several scalars, each stamped with the same time
    Values(Vec<PointValue>),
    /// A flat `[timestamp, value]` pair
    Point(Point),
    /// A list of `[timestamp, value]` pairs
    Points(Vec<Point>),
}

impl PointsInput {
    /// Interpret a JSON value: a number, a `[ts, value]` pair, a list of
    /// pairs, or a list of numbers
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(_) => PointValue::from_json(value).map(PointsInput::Value),
            Value::Array(items) if items.iter().all(Value::is_array) => items
                .iter()
                .map(json_point)
                .collect::<Option<Vec<_>>>()
                .map(PointsInput::Points),
            Value::Array(items) if items.len() == 2 => json_point(value).map(PointsInput::Point),
            Value::Array(items) => items
                .iter()
                .map(PointValue::from_json)
                .collect::<Option<Vec<_>>>()
                .map(PointsInput::Values),
            _ => None,
        }
    }
}

fn json_point(value: &Value) -> Option<Point> {
    match value.as_array()?.as_slice() {
        [timestamp, value] => {
            let timestamp = timestamp
                .as_i64()
                .or_else(|| timestamp.as_f64().map(|t| t as i64))?;
            Some(Point(timestamp, PointValue::from_json(value)?))
        }
        _ => None,
    }
}

impl From<PointValue> for PointsInput {
    fn from(value: PointValue) -> Self {
        PointsInput::Value(value)
    }
}

impl From<f64> for PointsInput {
    fn from(value: f64) -> Self {
        PointsInput::Value(value.into())
    }
}

impl From<i32> for PointsInput {
    fn from(value: i32) -> Self {
        PointsInput::Value(value.into())
    }
}

impl From<i64> for PointsInput {
    fn from(value: i64) -> Self {
        PointsInput::Value(value.into())
    }
}

impl From<Vec<f64>> for PointsInput {
    fn from(values: Vec<f64>) -> Self {
        PointsInput::Values(values.into_iter().map(PointValue::from).collect())
    }
}

impl From<Vec<i64>> for PointsInput {
    fn from(values: Vec<i64>) -> Self {
        PointsInput::Values(values.into_iter().map(PointValue::from).collect())
    }
}

impl From<Point> for PointsInput {
    fn from(point: Point) -> Self {
        PointsInput::Point(point)
    }
}

impl From<(i64, f64)> for PointsInput {
    fn from(pair: (i64, f64)) -> Self {
        PointsInput::Point(pair.into())
    }
}

impl From<(i64, i64)> for PointsInput {
    fn from(pair: (i64, i64)) -> Self {
        PointsInput::Point(pair.into())
    }
}

impl From<Vec<Point>> for PointsInput {
    fn from(points: Vec<Point>) -> Self {
        PointsInput::Points(points)
    }
}

impl From<Vec<(i64, f64)>> for PointsInput {
    fn from(pairs: Vec<(i64, f64)>) -> Self {
        PointsInput::Points(pairs.into_iter().map(Point::from).collect())
    }
}

impl From<Vec<(i64, i64)>> for PointsInput {
    fn from(pairs: Vec<(i64, i64)>) -> Self {
        PointsInput::Points(pairs.into_iter().map(Point::from).collect())
    }
}

/// Coerce any accepted shape into a list of `[timestamp, value]` pairs
pub fn normalize_points(points: PointsInput, now: i64) -> Vec<Point> {
    match points {
        PointsInput::Value(value) => vec![Point(now, value)],
        PointsInput::Values(values) => values.into_iter().map(|v| Point(now, v)).collect(),
        PointsInput::Point(point) => vec![point],
        PointsInput::Points(points) => points,
    }
}

/// JSON object builder that only records fields the caller supplied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonBody(Map<String, Value>);

impl JsonBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn present(self, key: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<JsonBody> for Value {
    fn from(body: JsonBody) -> Self {
        body.into_value()
    }
}

/// Query-string builder with the same presence rule as [`JsonBody`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }

    pub fn present(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Add a list as a comma separated value
    pub fn csv(self, key: &str, values: Option<&[String]>) -> Self {
        self.present(key, values.map(join_csv))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

pub fn join_csv(values: &[String]) -> String {
    values.join(",")
}

/// Read an integer the lenient way timestamps tend to arrive from the
/// command line: `"1500000000"`, `" 1500000000 "` and `"1500000000.7"` all
/// give `1500000000`.
pub fn parse_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.trunc() as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_is_stamped_with_now() {
        assert_eq!(
            normalize_points(PointsInput::from(1000), 1_500_000_000),
            vec![Point::new(1_500_000_000, 1000)]
        );
    }

    #[test]
    fn test_pair_is_not_rewrapped() {
        assert_eq!(
            normalize_points((1_400_000_000, 3.5).into(), 1_500_000_000),
            vec![Point::new(1_400_000_000, 3.5)]
        );
    }

    #[test]
    fn test_pair_list_is_unchanged() {
        let points = vec![Point::new(1, 1.0), Point::new(2, 2), Point::new(3, 0.0)];
        assert_eq!(
            normalize_points(points.clone().into(), 1_500_000_000),
            points
        );
    }

    #[test]
    fn test_value_list_shares_timestamp() {
        assert_eq!(
            normalize_points(vec![500.0, 1000.0].into(), 7),
            vec![Point::new(7, 500.0), Point::new(7, 1000.0)]
        );
    }

    #[test]
    fn test_points_from_json_shapes() {
        assert_eq!(
            PointsInput::from_json(&json!(12)),
            Some(PointsInput::Value(PointValue::Int(12)))
        );
        assert_eq!(
            PointsInput::from_json(&json!(1.5)),
            Some(PointsInput::Value(PointValue::Float(1.5)))
        );
        assert_eq!(
            PointsInput::from_json(&json!([1400000000, 5])),
            Some(PointsInput::Point(Point::new(1_400_000_000, 5)))
        );
        assert_eq!(
            PointsInput::from_json(&json!([[1, 2], [3, 4.5]])),
            Some(PointsInput::Points(vec![Point::new(1, 2), Point::new(3, 4.5)]))
        );
        assert_eq!(
            PointsInput::from_json(&json!([1, 2, 3])),
            Some(PointsInput::from(vec![1_i64, 2, 3]))
        );
        assert_eq!(PointsInput::from_json(&json!("nope")), None);
        assert_eq!(PointsInput::from_json(&json!([[1, 2, 3]])), None);
    }

    #[test]
    fn test_point_serializes_as_pair() {
        assert_eq!(serde_json::to_value(Point::new(10, 2.5)).unwrap(), json!([10, 2.5]));
        assert_eq!(Value::from(Point::new(10, 2.5)), json!([10, 2.5]));
    }

    #[test]
    fn test_integer_values_stay_integers() {
        let point = Point::new(10, 1000);
        assert_eq!(serde_json::to_string(&point).unwrap(), "[10,1000]");
        assert_eq!(Value::from(point), json!([10, 1000]));
        assert!(Value::from(point)[1].is_i64());
    }

    #[test]
    fn test_json_body_keeps_falsy_values() {
        let body = JsonBody::new()
            .field("scope", "role:db")
            .present("end", None::<i64>)
            .present("zero", Some(0))
            .present("empty", Some(""))
            .present("off", Some(false))
            .into_value();

        assert_eq!(
            body,
            json!({"scope": "role:db", "zero": 0, "empty": "", "off": false})
        );
        assert!(body.get("end").is_none());
    }

    #[test]
    fn test_query_params_csv() {
        let states = vec!["alert".to_string(), "no data".to_string()];
        let query = QueryParams::new()
            .csv("group_states", Some(states.as_slice()))
            .csv("tags", None)
            .present("source", Some("chef"));

        assert_eq!(query.get("group_states"), Some("alert,no data"));
        assert_eq!(query.get("tags"), None);
        assert_eq!(query.get("source"), Some("chef"));
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("1500000000"), Some(1_500_000_000));
        assert_eq!(parse_int(" 42 "), Some(42));
        assert_eq!(parse_int("42.9"), Some(42));
        assert_eq!(parse_int("0"), Some(0));
        assert_eq!(parse_int("soon"), None);
    }

    #[test]
    fn test_now_is_posix_seconds() {
        let before = Utc::now().timestamp();
        let now = now();
        assert!(now >= before && now <= before + 1);
    }
}
