//! The `quizstate completion` commands.

use anyhow::{Context, Result};

use quizstate_core::{CompletionRecord, Payload, PayloadValue};

use super::StoreOptions;

/// Parse a `key=value` completion field.
pub fn parse_field(s: &str) -> Result<(String, PayloadValue), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("field name is empty in '{s}'"));
    }
    let value = match value.parse::<PayloadValue>() {
        Ok(v) => v,
        Err(never) => match never {},
    };
    Ok((key.to_string(), value))
}

pub fn save(opts: &StoreOptions, quiz_id: &str, fields: Vec<(String, PayloadValue)>) -> Result<()> {
    let store = opts.open()?;
    let payload: Payload = fields.into_iter().collect();
    let ignored: Vec<&str> = payload
        .keys()
        .map(String::as_str)
        .filter(|k| CompletionRecord::RESERVED_FIELDS.contains(k))
        .collect();
    if !ignored.is_empty() {
        tracing::warn!("ignoring store-controlled fields: {}", ignored.join(", "));
    }

    store
        .save_completion(quiz_id, payload)
        .with_context(|| format!("completion for quiz '{quiz_id}' was not saved"))?;
    println!("Marked quiz '{quiz_id}' completed");
    Ok(())
}

pub fn load(opts: &StoreOptions, quiz_id: &str) -> Result<()> {
    let store = opts.open()?;
    match store.load_completion(quiz_id)? {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => println!("No completion recorded for quiz '{quiz_id}'"),
    }
    Ok(())
}

pub fn clear(opts: &StoreOptions, quiz_id: &str) -> Result<()> {
    let store = opts.open()?;
    store
        .clear_completion(quiz_id)
        .with_context(|| format!("completion for quiz '{quiz_id}' was not cleared"))?;
    println!("Cleared completion for quiz '{quiz_id}'");
    Ok(())
}
