//! The `quizstate answer` commands.

use anyhow::{Context, Result};

use super::StoreOptions;

pub fn save(opts: &StoreOptions, quiz_id: &str, answer: &str, correct: bool) -> Result<()> {
    let store = opts.open()?;
    store
        .save_answer(quiz_id, answer, correct)
        .with_context(|| format!("answer for quiz '{quiz_id}' was not saved"))?;

    let verdict = if correct { "correct" } else { "incorrect" };
    println!("Saved {verdict} answer for quiz '{quiz_id}'");
    Ok(())
}

pub fn load(opts: &StoreOptions, quiz_id: &str) -> Result<()> {
    let store = opts.open()?;
    match store.load_answer(quiz_id)? {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => println!("No answer recorded for quiz '{quiz_id}'"),
    }
    Ok(())
}

pub fn clear(opts: &StoreOptions, quiz_id: &str) -> Result<()> {
    let store = opts.open()?;
    store
        .clear_answer(quiz_id)
        .with_context(|| format!("answer for quiz '{quiz_id}' was not cleared"))?;
    println!("Cleared answer for quiz '{quiz_id}'");
    Ok(())
}
