use anyhow::Result;

use subjectfocus::planner::calculate_readiness;

use crate::app::App;
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let sets = app.study_sets.list_sets()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&sets)?);
        }
        OutputFormat::Plain => {
            if sets.is_empty() {
                println!("No study sets yet. Create one with `sets new <title>`.");
                return Ok(());
            }

            for set in &sets {
                let description = set
                    .description
                    .as_deref()
                    .map(|d| format!(" - {}", d))
                    .unwrap_or_default();
                println!("{} ({} cards){}", set.title, set.total_cards, description);
            }
        }
    }

    Ok(())
}

pub fn run_show(app: &App, set_name: &str, format: &OutputFormat) -> Result<()> {
    let set = app.find_set(set_name)?;
    let cards = app.study_sets.list_cards(set.id)?;
    let progress = app.study_sets.set_progress(set.id)?;
    let readiness = calculate_readiness(Some(&set), &progress);

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "set": set,
                "cards": cards,
                "readiness": readiness,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", set.title);
            if let Some(description) = &set.description {
                println!("{}", description);
            }
            println!(
                "{} cards, {} reviewed, {}% mastery ({}% avg correct)",
                readiness.total_cards,
                readiness.cards_reviewed,
                readiness.mastery_percent,
                readiness.avg_correct_rate
            );

            if !cards.is_empty() {
                println!();
                for card in &cards {
                    let tally = app.study_sets.get_progress(card.id)?;
                    println!(
                        "  {:>3}. {} -> {}  [{}/{}]",
                        card.position + 1,
                        card.front,
                        card.back,
                        tally.times_correct,
                        tally.times_seen
                    );
                }
            }
        }
    }

    Ok(())
}

pub fn run_new(app: &App, title: &str, description: Option<&str>) -> Result<()> {
    let set = app
        .study_sets
        .create_set(title.to_string(), description.map(String::from))?;
    println!("Created study set '{}' ({})", set.title, set.id);
    Ok(())
}

pub fn run_add_card(app: &App, set_name: &str, front: &str, back: &str) -> Result<()> {
    let set = app.find_set(set_name)?;
    let card = app
        .study_sets
        .add_card(set.id, front.to_string(), back.to_string())?;
    println!("Added card {} to '{}'", card.position + 1, set.title);
    Ok(())
}

pub fn run_delete(app: &App, set_name: &str) -> Result<()> {
    let set = app.find_set(set_name)?;
    app.study_sets.delete_set(set.id)?;
    println!("Deleted study set '{}'", set.title);
    Ok(())
}
