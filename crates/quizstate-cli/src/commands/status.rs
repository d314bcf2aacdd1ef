//! The `quizstate status` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizstate_core::model::iso8601;
use quizstate_core::{QuizStateStore, QuizStatus};

use super::StoreOptions;

pub fn execute(opts: &StoreOptions, quiz_id: Option<String>) -> Result<()> {
    let store = opts.open()?;

    if let Some(quiz_id) = quiz_id {
        println!("{quiz_id}: {}", store.status(&quiz_id)?);
        return Ok(());
    }

    let ids = store.quiz_ids()?;
    if ids.is_empty() {
        println!("No quiz state recorded.");
        return Ok(());
    }

    print_table(&store, ids)
}

fn print_table(store: &QuizStateStore, ids: impl IntoIterator<Item = String>) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Quiz", "Answer", "Correct", "Status", "Updated"]);

    let mut completed = 0;
    let mut total = 0;
    for id in ids {
        let answer = store.load_answer(&id)?;
        let completion = store.load_completion(&id)?;
        let status = QuizStatus::from_completion(completion.as_ref());

        let updated = [
            answer.as_ref().map(|a| a.timestamp),
            completion.as_ref().map(|c| c.timestamp()),
        ]
        .into_iter()
        .flatten()
        .max();

        table.add_row(vec![
            Cell::new(&id),
            Cell::new(answer.as_ref().map(|a| a.answer.as_str()).unwrap_or("-")),
            Cell::new(match &answer {
                Some(a) if a.is_correct => "yes",
                Some(_) => "no",
                None => "-",
            }),
            Cell::new(status),
            Cell::new(updated.map(|ts| iso8601::format(&ts)).unwrap_or_else(|| "-".into())),
        ]);

        total += 1;
        if status == QuizStatus::Completed {
            completed += 1;
        }
    }

    println!("{table}");
    println!("{completed}/{total} completed");
    Ok(())
}
