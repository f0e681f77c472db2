//! Field deserializers that never reject a value.
//!
//! Persisted plans may come from older clients or be half-written; every
//! helper here maps malformed input onto the field's default instead of
//! failing the whole document.

use std::collections::BTreeMap;

use serde::{de::Deserializer, Deserialize};
use serde_json::Value;

use crate::{
    common::{to_non_negative_number, PlanId},
    frequency::SalaryFrequency,
    plan::{BudgetAllocation, LineItem, DEFAULT_BUDGET_TIMEFRAME_WEEKS},
};

fn value<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null))
}

pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(to_non_negative_number(&value(deserializer)?))
}

/// Positive numbers only; zero and garbage collapse to `None`.
pub fn optional_positive<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = to_non_negative_number(&value(deserializer)?);
    Ok((number > 0.0).then_some(number))
}

pub fn whole_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(to_whole_number(&value(deserializer)?))
}

pub fn timeframe<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match to_whole_number(&value(deserializer)?) {
        0 => Ok(DEFAULT_BUDGET_TIMEFRAME_WEEKS),
        weeks => Ok(weeks),
    }
}

pub fn plan_id<'de, D>(deserializer: D) -> Result<PlanId, D::Error>
where
    D: Deserializer<'de>,
{
    let number = to_non_negative_number(&value(deserializer)?);
    if number >= 1.0 && number < u64::MAX as f64 {
        Ok(PlanId(number.trunc() as u64))
    } else {
        Ok(PlanId::UNASSIGNED)
    }
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(to_text(&value(deserializer)?))
}

pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match value(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(text),
            _ => None,
        })
        .collect())
}

pub fn salary_frequency<'de, D>(deserializer: D) -> Result<Option<SalaryFrequency>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match value(deserializer)? {
        Value::String(label) => SalaryFrequency::parse(&label),
        _ => None,
    })
}

/// Forces every object element into `{type, amount}` shape; other elements are dropped.
pub fn line_items<'de, D>(deserializer: D) -> Result<Vec<LineItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match value(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .iter()
        .filter_map(|item| {
            let fields = item.as_object()?;
            Some(LineItem {
                kind: fields.get("type").map(to_text).unwrap_or_default(),
                amount: fields
                    .get("amount")
                    .map(to_non_negative_number)
                    .unwrap_or(0.0),
            })
        })
        .collect())
}

/// Keeps one allocation per category; a repeated category overwrites the earlier amount.
pub fn budgets<'de, D>(deserializer: D) -> Result<Vec<BudgetAllocation>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match value(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    let mut allocations: Vec<BudgetAllocation> = Vec::new();
    for item in &items {
        let Some(fields) = item.as_object() else {
            continue;
        };
        let category = fields.get("category").map(to_text).unwrap_or_default();
        if category.trim().is_empty() {
            continue;
        }
        let amount = fields
            .get("amount")
            .map(to_non_negative_number)
            .unwrap_or(0.0);
        match allocations
            .iter_mut()
            .find(|existing| existing.category == category)
        {
            Some(existing) => existing.amount = amount,
            None => allocations.push(BudgetAllocation { category, amount }),
        }
    }
    Ok(allocations)
}

pub fn savings<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match value(deserializer)? {
        Value::Object(entries) => entries
            .iter()
            .map(|(category, saved)| (category.clone(), to_non_negative_number(saved)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

fn to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}

fn to_whole_number(value: &Value) -> u32 {
    let number = to_non_negative_number(value);
    if number >= u32::MAX as f64 {
        u32::MAX
    } else {
        number.trunc() as u32
    }
}
