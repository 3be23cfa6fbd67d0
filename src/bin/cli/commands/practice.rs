use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::app::App;

/// Drill every card of a set front-to-back, recording each answer.
///
/// The review tallies written here are what the planner's readiness
/// assessment reads later.
pub fn run(app: &App, set_name: &str) -> Result<()> {
    let set = app.find_set(set_name)?;
    let cards = app.study_sets.list_cards(set.id)?;

    if cards.is_empty() {
        println!("'{}' has no cards yet. Add some with `sets add-card`.", set.title);
        return Ok(());
    }

    println!(
        "Practicing '{}' ({} cards). Press Enter to reveal, then y/n for correct.\n",
        set.title,
        cards.len()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut correct = 0usize;
    let mut seen = 0usize;

    for (idx, card) in cards.iter().enumerate() {
        println!("[{}/{}] {}", idx + 1, cards.len(), card.front);
        print!("  ... ");
        io::stdout().flush()?;
        if lines.next().transpose()?.is_none() {
            break;
        }

        println!("  -> {}", card.back);
        print!("  Did you get it right? [y/n] ");
        io::stdout().flush()?;
        let Some(answer) = lines.next().transpose()? else {
            break;
        };

        let got_it = answer.trim().to_lowercase().starts_with('y');
        app.study_sets.record_review(card.id, got_it)?;
        seen += 1;
        if got_it {
            correct += 1;
        }
        println!();
    }

    if seen > 0 {
        println!("Done: {}/{} correct.", correct, seen);
    }

    Ok(())
}
