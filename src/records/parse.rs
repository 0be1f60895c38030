use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::source::SourceError;
use super::{RelationKind, RelationRecord};

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    results: Vec<RawResult>,
    #[serde(default)]
    errors: Vec<RawError>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<RawDatum>,
}

#[derive(Debug, Deserialize)]
struct RawDatum {
    #[serde(default)]
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Parses either a flat array of `{source, target, relation, weight}` rows or
/// a transactional HTTP response with `results[].columns` / `data[].row`.
pub fn parse_records(raw: &str) -> Result<Vec<RelationRecord>, SourceError> {
    let parsed: Value = serde_json::from_str(raw)?;

    match &parsed {
        Value::Array(rows) => Ok(rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| {
                let record = row.as_object().and_then(record_from_object);
                if record.is_none() {
                    debug!("skipping row {index}: identifiers are not strings");
                }
                record
            })
            .collect()),
        Value::Object(object) if object.contains_key("results") => {
            let response = RawResponse::deserialize(&parsed)?;
            records_from_response(response)
        }
        _ => Err(SourceError::Format(
            "expected an array of rows or an object with a results field".to_owned(),
        )),
    }
}

fn records_from_response(response: RawResponse) -> Result<Vec<RelationRecord>, SourceError> {
    if let Some(error) = response.errors.first() {
        return Err(SourceError::Upstream(format!(
            "{}: {}",
            error.code, error.message
        )));
    }

    let mut records = Vec::new();
    for result in response.results {
        let column = |name: &str| result.columns.iter().position(|column| column == name);
        let (Some(source_at), Some(target_at), Some(relation_at)) =
            (column("source"), column("target"), column("relation"))
        else {
            return Err(SourceError::Format(format!(
                "result columns {:?} lack source/target/relation",
                result.columns
            )));
        };
        let weight_at = column("weight");

        for (index, datum) in result.data.iter().enumerate() {
            let cell = |position: usize| datum.row.get(position).and_then(Value::as_str);
            let (Some(source), Some(target), Some(relation)) =
                (cell(source_at), cell(target_at), cell(relation_at))
            else {
                debug!("skipping row {index}: identifiers are not strings");
                continue;
            };

            records.push(RelationRecord {
                source: source.to_owned(),
                target: target.to_owned(),
                relation: RelationKind::parse(relation),
                weight: weight_at
                    .and_then(|position| datum.row.get(position))
                    .and_then(weight_from),
            });
        }
    }

    Ok(records)
}

fn record_from_object(object: &Map<String, Value>) -> Option<RelationRecord> {
    let source = object.get("source")?.as_str()?;
    let target = object.get("target")?.as_str()?;
    let relation = object.get("relation")?.as_str()?;

    Some(RelationRecord {
        source: source.to_owned(),
        target: target.to_owned(),
        relation: RelationKind::parse(relation),
        weight: object.get("weight").and_then(weight_from),
    })
}

fn weight_from(value: &Value) -> Option<f64> {
    let weight = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    weight.is_finite().then_some(weight)
}
