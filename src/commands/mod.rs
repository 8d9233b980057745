/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes these top-level command modules:

- `scout`  : Interactive conversation (guided filters or free text)
- `ask`    : Single free-text search
- `vibe`   : Keyword-driven search against the games catalog
- `catalog`: List the selectable options

Handlers build the collaborators from configuration and drive the
conversation controller; rendering lives in `render`.
*/

use crate::catalog::{HttpCatalogLoader, SelectionOption};
use crate::commands::render::{
    format_candidates, format_presets, print_filters, print_games, print_message,
    print_transcript,
};
use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::error::{GameScoutError, Result};
use crate::flow::{ConversationController, DatePreset, DateRange, FlowMode, Step};
use crate::gateway::create_gateway;
use std::sync::Arc;
use std::time::Duration;

// Catalog listing
pub mod catalog;

// Terminal rendering of transcripts and results
pub mod render;

// Special commands parser for the interactive session
pub mod special_commands;

/// Resolve a comma-separated answer against the offered options
///
/// Each item is either a 1-based index into `candidates` or an option
/// name/slug (case-insensitive). An empty answer selects nothing.
///
/// # Errors
///
/// Returns `GameScoutError::InvalidSelection` if an item matches no option
///
/// # Examples
///
/// ```
/// use gamescout::catalog::platform_options;
/// use gamescout::commands::parse_selection;
///
/// let platforms = platform_options();
/// let chosen = parse_selection("1, xbox", &platforms).unwrap();
/// let names: Vec<&str> = chosen.iter().map(|o| o.name.as_str()).collect();
/// assert_eq!(names, vec!["PC", "Xbox"]);
/// assert!(parse_selection("", &platforms).unwrap().is_empty());
/// ```
pub fn parse_selection(input: &str, candidates: &[SelectionOption]) -> Result<Vec<SelectionOption>> {
    let mut chosen = Vec::new();
    for item in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let by_index = item
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=candidates.len()).contains(n))
            .map(|n| &candidates[n - 1]);
        let option = by_index
            .or_else(|| candidates.iter().find(|c| c.matches_label(item)))
            .ok_or_else(|| GameScoutError::InvalidSelection(format!("No option matches '{}'", item)))?;
        chosen.push(option.clone());
    }
    Ok(chosen)
}

/// Resolve an answer to the release window prompt
///
/// Accepts an empty line or "any" for any time, a 1-based preset index, a
/// preset label, a single year, or a `YYYY-YYYY` / `YYYY to YYYY` range.
///
/// # Errors
///
/// Returns `GameScoutError::InvalidSelection` for anything else, including
/// a reversed range
///
/// # Examples
///
/// ```
/// use gamescout::commands::parse_date_answer;
/// use gamescout::flow::DateRange;
///
/// let presets = DateRange::presets(2026);
/// assert_eq!(parse_date_answer("", &presets).unwrap(), None);
/// assert_eq!(
///     parse_date_answer("2010-2015", &presets).unwrap(),
///     Some(DateRange::new(2010, 2015).unwrap())
/// );
/// assert_eq!(
///     parse_date_answer("4", &presets).unwrap(),
///     Some(DateRange::new(1970, 1999).unwrap())
/// );
/// ```
pub fn parse_date_answer(input: &str, presets: &[DatePreset]) -> Result<Option<DateRange>> {
    let answer = input.trim().to_lowercase();
    if answer.is_empty() || answer == "any" || answer == "any time" {
        return Ok(None);
    }

    if let Ok(n) = answer.parse::<usize>() {
        if (1..=presets.len()).contains(&n) {
            return Ok(Some(presets[n - 1].range));
        }
    }

    if let Some(preset) = presets.iter().find(|p| p.label.to_lowercase() == answer) {
        return Ok(Some(preset.range));
    }

    let years: Vec<&str> = answer
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|s| !s.is_empty() && *s != "to")
        .collect();
    let not_a_window =
        || GameScoutError::InvalidSelection(format!("Not a release window: '{}'", input.trim()));
    let parse_year = |s: &str| {
        s.parse::<i32>()
            .ok()
            .filter(|_| s.len() == 4)
            .ok_or_else(not_a_window)
    };

    match years.as_slice() {
        [year] => {
            let year = parse_year(*year)?;
            Ok(Some(DateRange::new(year, year)?))
        }
        [from, to] => Ok(Some(DateRange::new(parse_year(*from)?, parse_year(*to)?)?)),
        _ => Err(not_a_window().into()),
    }
}

fn timeout_of(config: &Config) -> Duration {
    Duration::from_secs(config.gateway.timeout_seconds)
}

/// Interactive scout session
pub mod scout {
    //! Interactive scouting conversation.
    //!
    //! Builds the catalog loader and gateway from configuration, then runs a
    //! readline loop that answers the controller's active prompt until the
    //! user quits.

    use super::*;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start an interactive conversation
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `mode` - Optional override for the conversation mode ("guided" or "free_text")
    ///
    /// # Errors
    ///
    /// Returns error if the mode is unknown, a collaborator cannot be built,
    /// or the terminal cannot be opened
    pub async fn run_scout(config: Config, mode: Option<String>) -> Result<()> {
        let mode_name = mode.unwrap_or_else(|| config.flow.default_mode.clone());
        let mode = FlowMode::parse_str(&mode_name).map_err(GameScoutError::Config)?;

        let catalog = Arc::new(HttpCatalogLoader::new(
            config.catalog_settings(),
            timeout_of(&config),
        )?);
        let gateway = create_gateway(&config.gateway)?;
        let mut controller = ConversationController::new(catalog, gateway);

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(mode);
        begin(&mut controller, mode).await;

        let mut last_shown = 0;
        loop {
            last_shown = print_new_messages(&controller, last_shown);

            let prompt = format!("{} ", "›".purple().bold());
            match rl.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                    }

                    match parse_special_command(&line) {
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::Restart) => {
                            if let Err(e) = controller.restart().await {
                                tracing::debug!("Restart failed: {:#}", e);
                                print_banner(&controller);
                            }
                            continue;
                        }
                        Ok(SpecialCommand::ShowTranscript) => {
                            print_transcript(controller.transcript());
                            continue;
                        }
                        Ok(SpecialCommand::ShowFilters) => {
                            print_filters(controller.accumulator());
                            continue;
                        }
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::None) => {}
                        Err(e) => {
                            eprintln!("{}", e.to_string().red());
                            continue;
                        }
                    }

                    if let Err(e) = answer(&mut controller, &line).await {
                        match e.downcast_ref::<GameScoutError>() {
                            // Already in the transcript
                            Some(GameScoutError::Search(_)) => {}
                            Some(GameScoutError::StaleStep { .. }) => {
                                println!("{}", "Type /restart to start a new search.".dimmed());
                            }
                            _ => eprintln!("{}", e.to_string().red()),
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Happy gaming!");
        Ok(())
    }

    async fn begin(controller: &mut ConversationController, mode: FlowMode) {
        match mode {
            FlowMode::Guided => {
                if let Err(e) = controller.start().await {
                    tracing::debug!("Start failed: {:#}", e);
                    print_banner(controller);
                }
            }
            FlowMode::FreeText => controller.start_free_text(),
        }
    }

    /// Apply one line of input to the active prompt
    ///
    /// # Errors
    ///
    /// Propagates selection, step and search errors from the controller
    pub async fn answer(controller: &mut ConversationController, line: &str) -> Result<()> {
        let Some(prompt) = controller.active_prompt() else {
            return Err(GameScoutError::StaleStep {
                expected: Step::CollectIncluded,
                current: controller.step(),
            }
            .into());
        };

        match prompt.step {
            Step::CollectIncluded => {
                let chosen = parse_selection(line, &prompt.candidates)?;
                controller.confirm_included(&chosen)
            }
            Step::CollectExcluded => {
                let chosen = parse_selection(line, &prompt.candidates)?;
                controller.confirm_excluded(&chosen)
            }
            Step::CollectPlatforms => {
                let chosen = parse_selection(line, &prompt.candidates)?;
                controller.confirm_platforms(&chosen)
            }
            Step::CollectDateRange => {
                let range = parse_date_answer(line, &prompt.presets)?;
                println!("{}", "Searching...".dimmed());
                controller.confirm_date_range(range).await.map(|_| ())
            }
            Step::CollectQuery => {
                if !line.trim().is_empty() {
                    println!("{}", "Searching...".dimmed());
                }
                controller.submit_query(line).await.map(|_| ())
            }
            other => Err(GameScoutError::StaleStep {
                expected: other,
                current: controller.step(),
            }
            .into()),
        }
    }

    /// Print system messages newer than `last_shown` and the active choices
    ///
    /// User messages are skipped since the user just typed them. Returns
    /// the id of the newest message.
    fn print_new_messages(controller: &ConversationController, last_shown: u64) -> u64 {
        let mut newest = last_shown;
        for message in controller.transcript().iter().filter(|m| m.id > last_shown) {
            if message.author == crate::flow::Author::System {
                print_message(message);
            }
            newest = newest.max(message.id);
        }

        if newest != last_shown {
            if let Some(prompt) = controller.active_prompt() {
                if !prompt.candidates.is_empty() {
                    let names: Vec<String> =
                        prompt.candidates.iter().map(|o| o.name.clone()).collect();
                    println!("{}", format_candidates(&names));
                    println!("{}", "Enter numbers or names separated by commas, or press Enter for none.".dimmed());
                }
                if !prompt.presets.is_empty() {
                    println!("{}", format_presets(&prompt.presets));
                    println!("{}", "Pick a number, type a year or range like 2015-2024, or press Enter for any time.".dimmed());
                }
            }
        }
        newest
    }

    fn print_banner(controller: &ConversationController) {
        if let Some(banner) = controller.banner() {
            eprintln!("{} {}", "Error:".red().bold(), banner.red());
            println!("{}", "Type /restart to try again or /quit to exit.".dimmed());
        }
    }

    fn print_welcome_banner(mode: FlowMode) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                 Game Scout - Let's find a game!              ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Mode: {}", mode.to_string().purple());
        println!("Type '/help' for available commands, '/quit' to exit\n");
    }
}

/// Single free-text search
pub mod ask {
    use super::*;

    /// Run one free-text search and print the results
    ///
    /// # Errors
    ///
    /// Returns `GameScoutError::InvalidSelection` for a blank query or
    /// `GameScoutError::Search` if the gateway fails
    pub async fn run_ask(config: Config, query: String) -> Result<()> {
        let gateway = create_gateway(&config.gateway)?;
        let catalog = Arc::new(HttpCatalogLoader::new(
            config.catalog_settings(),
            timeout_of(&config),
        )?);

        let mut controller = ConversationController::new(catalog, gateway);
        controller.start_free_text();

        let outcome = controller.submit_query(&query).await;
        if let Some(message) = controller.transcript().last() {
            if message.author == crate::flow::Author::System {
                print_message(message);
            }
        }
        outcome.map(|_| ())
    }
}

/// Vibe search against the games catalog
pub mod vibe {
    use super::*;
    use crate::gateway::{SearchType, VibeOutcome, VibeQuery, VibeSearch};
    use colored::Colorize;

    /// Run a vibe search, falling back to a looser search once
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `vibe` - Mood or style description
    /// * `likes` - Games or themes liked; defaults to the vibe text
    /// * `dislikes` - Terms to steer away from
    ///
    /// # Errors
    ///
    /// Returns `GameScoutError::Search` if the catalog cannot be queried
    pub async fn run_vibe(
        config: Config,
        vibe: String,
        likes: Option<String>,
        dislikes: String,
    ) -> Result<()> {
        let likes = likes.unwrap_or_else(|| vibe.clone());
        let search = VibeSearch::new(config.catalog.clone(), timeout_of(&config))?;
        let query = VibeQuery::new(vibe, likes, dislikes);

        let outcome = recommend_with_fallback(&search, &query).await?;

        if outcome.games.is_empty() {
            println!("{}", crate::flow::NO_RESULTS);
            return Ok(());
        }

        let lead = match outcome.search_type {
            SearchType::Primary => "Games that match your vibe",
            SearchType::Fallback => "Nothing matched exactly, but you might enjoy",
        };
        println!("\n{} ({}):\n", lead.purple().bold(), outcome.total_found);
        print_games(&outcome.games);
        Ok(())
    }

    /// Primary search, then one fallback search if it found nothing
    ///
    /// # Errors
    ///
    /// Returns the first search error encountered
    pub async fn recommend_with_fallback(search: &VibeSearch, query: &VibeQuery) -> Result<VibeOutcome> {
        let outcome = search.recommend(query).await?;
        if !outcome.games.is_empty() || query.search_type == SearchType::Fallback {
            return Ok(outcome);
        }

        tracing::info!("Primary vibe search found nothing, retrying with fallback");
        search.recommend(&query.as_fallback()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{platform_options, OptionKind};

    fn options() -> Vec<SelectionOption> {
        vec![
            SelectionOption::new("5", "RPG", "role-playing-games-rpg", OptionKind::Genre),
            SelectionOption::new("36", "Open World", "open-world", OptionKind::Tag),
        ]
    }

    #[test]
    fn test_parse_selection_by_index_and_name() {
        let chosen = parse_selection("2, rpg", &options()).unwrap();
        assert_eq!(chosen[0].name, "Open World");
        assert_eq!(chosen[1].name, "RPG");
    }

    #[test]
    fn test_parse_selection_by_slug() {
        let chosen = parse_selection("open-world", &options()).unwrap();
        assert_eq!(chosen.len(), 1);
    }

    #[test]
    fn test_parse_selection_ignores_empty_items() {
        assert!(parse_selection(" , ,", &options()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_selection_out_of_range_index() {
        let err = parse_selection("3", &options()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GameScoutError>(),
            Some(GameScoutError::InvalidSelection(msg)) if msg.contains("'3'")
        ));
    }

    #[test]
    fn test_parse_selection_unknown_name() {
        assert!(parse_selection("PC, Amiga", &platform_options()).is_err());
    }

    #[test]
    fn test_parse_date_answer_variants() {
        let presets = DateRange::presets(2026);
        assert_eq!(parse_date_answer("Any time", &presets).unwrap(), None);
        assert_eq!(
            parse_date_answer("last 5 years", &presets).unwrap(),
            Some(DateRange::new(2022, 2026).unwrap())
        );
        assert_eq!(
            parse_date_answer("1998", &presets).unwrap(),
            Some(DateRange::new(1998, 1998).unwrap())
        );
        assert_eq!(
            parse_date_answer("2001 to 2004", &presets).unwrap(),
            Some(DateRange::new(2001, 2004).unwrap())
        );
    }

    #[test]
    fn test_parse_date_answer_rejects_garbage() {
        let presets = DateRange::presets(2026);
        assert!(parse_date_answer("soon", &presets).is_err());
        assert!(parse_date_answer("9", &presets).is_err());
        assert!(parse_date_answer("2020-2010", &presets).is_err());
        assert!(parse_date_answer("1-2-3", &presets).is_err());
    }

    #[test]
    fn test_parse_date_answer_keeps_four_digit_dates() {
        let presets = DateRange::presets(2026);
        let range = parse_date_answer("0999", &presets).unwrap().unwrap();
        assert_eq!(range.as_query(), "0999-01-01,0999-12-31");
    }

    #[tokio::test]
    async fn test_scout_answer_walks_guided_flow() {
        use crate::flow::fake::{FakeCatalog, FakeGateway};
        use crate::gateway::GameResult;

        let catalog = Arc::new(FakeCatalog::with_options(options()));
        let gateway = Arc::new(FakeGateway::with_games(vec![GameResult::named("Elden Ring")]));
        let mut controller = ConversationController::new(catalog, gateway.clone());
        controller.start().await.unwrap();

        scout::answer(&mut controller, "rpg").await.unwrap();
        scout::answer(&mut controller, "").await.unwrap();
        scout::answer(&mut controller, "pc, nintendo").await.unwrap();
        scout::answer(&mut controller, "").await.unwrap();

        assert_eq!(controller.step(), Step::Done);
        let payload = &gateway.payloads()[0];
        assert_eq!(payload.genres, "role-playing-games-rpg");
        assert_eq!(payload.platforms, "1,7");

        let err = scout::answer(&mut controller, "rpg").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GameScoutError>(),
            Some(GameScoutError::StaleStep { current: Step::Done, .. })
        ));
    }

    #[tokio::test]
    async fn test_scout_answer_bad_input_keeps_step() {
        use crate::flow::fake::{FakeCatalog, FakeGateway};

        let catalog = Arc::new(FakeCatalog::with_options(options()));
        let mut controller = ConversationController::new(catalog, Arc::new(FakeGateway::default()));
        controller.start().await.unwrap();

        assert!(scout::answer(&mut controller, "zzz").await.is_err());
        assert_eq!(controller.step(), Step::CollectIncluded);
    }

    #[tokio::test]
    async fn test_scout_quit_word_is_a_free_text_query() {
        use crate::commands::special_commands::{parse_special_command, SpecialCommand};
        use crate::flow::fake::{FakeCatalog, FakeGateway, GatewayCall};

        let gateway = Arc::new(FakeGateway::default());
        let mut controller =
            ConversationController::new(Arc::new(FakeCatalog::default()), gateway.clone());
        controller.start_free_text();

        assert_eq!(parse_special_command("quit").unwrap(), SpecialCommand::None);
        scout::answer(&mut controller, "quit").await.unwrap();

        assert_eq!(gateway.calls(), vec![GatewayCall::Ask("quit".to_string())]);
        assert_eq!(controller.step(), Step::Done);
    }
}
