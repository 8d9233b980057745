//! Terminal rendering of transcripts and game results

use crate::flow::{Attachment, Author, DatePreset, FilterAccumulator, TranscriptMessage};
use crate::gateway::GameResult;

use colored::Colorize;

/// Format a game as a numbered card
///
/// Shows the name and rating, then the description, genres, details line,
/// release date, platforms and links when present.
pub fn format_game(index: usize, game: &GameResult) -> String {
    let mut lines = Vec::new();

    let mut title = format!("{:>2}. {}", index + 1, game.name.bold());
    if let Some(rating) = game.rating.filter(|r| *r > 0.0) {
        title.push_str(&format!("  {}", format!("★ {:.1}", rating).yellow()));
    }
    lines.push(title);

    if let Some(description) = game.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("    {}", description));
    }
    if !game.genres.is_empty() {
        lines.push(format!("    {}", game.genres.join(" · ").magenta()));
    }
    match (&game.details, &game.release_date) {
        (Some(details), _) => lines.push(format!("    {}", details.dimmed())),
        (None, Some(released)) => {
            lines.push(format!("    {}", format!("Released: {}", released).dimmed()))
        }
        (None, None) => {}
    }
    if !game.platforms.is_empty() {
        lines.push(format!("    Platforms: {}", game.platforms.join(", ")));
    }
    for link in &game.store_links {
        lines.push(format!("    {}: {}", link.name, link.url.cyan()));
    }
    if let Some(url) = game.catalog_url() {
        lines.push(format!("    Find it on RAWG: {}", url.cyan()));
    }

    lines.join("\n")
}

/// Print a list of games as cards
pub fn print_games(games: &[GameResult]) {
    for (index, game) in games.iter().enumerate() {
        println!("{}\n", format_game(index, game));
    }
}

/// Format the numbered choices of a selection prompt
pub fn format_candidates(names: &[String]) -> String {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("  {:>2}) {}", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the numbered release window presets
pub fn format_presets(presets: &[DatePreset]) -> String {
    presets
        .iter()
        .enumerate()
        .map(|(i, preset)| format!("  {:>2}) {} ({})", i + 1, preset.label, preset.range))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print one transcript message
///
/// Options attached to earlier prompts are not repeated; only the active
/// prompt lists its choices (see `print_prompt` in the scout command).
pub fn print_message(message: &TranscriptMessage) {
    match message.author {
        Author::User => println!("{} {}", "you>".green().bold(), message.text),
        Author::System if message.is_pending => println!("{}", message.text.dimmed()),
        Author::System => match &message.attachment {
            Some(Attachment::Error { restartable }) => {
                println!("{} {}", "Error:".red().bold(), message.text.red());
                if *restartable {
                    println!("{}", "Type /restart to try again.".dimmed());
                }
            }
            Some(Attachment::Results { games, restartable }) => {
                println!("{}\n", message.text.purple().bold());
                print_games(games);
                if *restartable {
                    println!("{}", "Type /restart for another search.".dimmed());
                }
            }
            _ => println!("{} {}", "scout>".purple().bold(), message.text),
        },
    }
}

/// Print a whole transcript
pub fn print_transcript(messages: &[TranscriptMessage]) {
    println!();
    for message in messages {
        print_message(message);
    }
    println!();
}

/// Print the filters confirmed so far
pub fn print_filters(accumulator: &FilterAccumulator) {
    let names = |options: &[crate::catalog::SelectionOption], empty: &str| {
        if options.is_empty() {
            empty.to_string()
        } else {
            options
                .iter()
                .map(|o| o.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    };

    println!("\nFilters confirmed: {}/4", accumulator.confirmed_steps());
    println!("  Include:   {}", names(accumulator.included(), "Anything"));
    println!("  Exclude:   {}", names(accumulator.excluded(), "Nothing"));
    println!("  Platforms: {}", names(accumulator.platforms(), "Anything"));
    println!(
        "  Released:  {}\n",
        accumulator
            .date_range()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "Any time".to_string())
    );
}
