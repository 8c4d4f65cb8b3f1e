use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use anime_analytics::config::{AppConfig, CliConfig, FileConfig};
use anime_analytics::dataset::load_dataset;
use anime_analytics::filter::{FilterCriteria, GenreMatch};
use anime_analytics::metrics::derive;
use anime_analytics::pipeline::{Dashboard, Page, RenderedPage};
use anime_analytics::views::{GenreTrendsView, HiddenGemsView, OverviewView, SearchView};
use cli_style::{colors, get_styles, TableBuilder};

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

fn parse_genre_match(s: &str) -> Result<GenreMatch, String> {
    match s.to_lowercase().as_str() {
        "any" => Ok(GenreMatch::Any),
        "all" => Ok(GenreMatch::All),
        _ => Err(format!("expected 'any' or 'all', got '{}'", s)),
    }
}

#[derive(Parser, Debug)]
#[command(styles=get_styles())]
struct CliArgs {
    /// Path to the anime dataset CSV file.
    #[clap(value_parser = parse_path)]
    pub dataset: Option<PathBuf>,

    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
#[command(styles=get_styles(),name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Headline numbers and distributions of the selected titles.
    Overview,

    /// Highly rated titles with a small audience.
    Gems { count: Option<usize> },

    /// Genre popularity per decade and media type breakdowns.
    Trends,

    /// Lists the selected titles, optionally setting the title text first.
    Search { text: Vec<String> },

    /// Restricts the release years to the given inclusive range.
    Years { min: i32, max: i32 },

    /// Only keeps titles rated at least this much.
    Score { min: f64 },

    /// Toggles a genre in the selection.
    Genre { name: String },

    /// Toggles a media type (TV, Movie, ...) in the selection.
    Kind { name: String },

    /// Whether titles need any or all of the selected genres.
    Match {
        #[arg(value_parser = parse_genre_match)]
        mode: GenreMatch,
    },

    /// Resets every filter.
    Clear,

    /// Shows the current filters and the available choices.
    Filters,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

fn toggle(set: &mut std::collections::BTreeSet<String>, name: String) -> bool {
    if set.remove(&name) {
        false
    } else {
        set.insert(name);
        true
    }
}

/// A dashboard together with the filter state of the session.
struct Explorer {
    dashboard: Dashboard,
    criteria: FilterCriteria,
}

impl Explorer {
    fn new(dashboard: Dashboard) -> Explorer {
        Explorer {
            dashboard,
            criteria: FilterCriteria::default(),
        }
    }

    fn known_genre(&self, name: &str) -> Option<String> {
        self.dashboard
            .filter_options()
            .genres
            .iter()
            .find(|g| g.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn known_kind(&self, name: &str) -> Option<String> {
        self.dashboard
            .filter_options()
            .kinds
            .iter()
            .find(|k| k.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn set_years(&mut self, min: i32, max: i32) -> Result<(), String> {
        let criteria = FilterCriteria {
            year_min: Some(min),
            year_max: Some(max),
            ..self.criteria.clone()
        };
        criteria.validate()?;
        self.criteria = criteria;
        Ok(())
    }

    fn set_score(&mut self, min: f64) -> Result<(), String> {
        let criteria = FilterCriteria {
            score_min: Some(min),
            ..self.criteria.clone()
        };
        criteria.validate()?;
        self.criteria = criteria;
        Ok(())
    }

    fn toggle_genre(&mut self, name: &str) -> Result<bool, String> {
        let genre = self
            .known_genre(name)
            .ok_or_else(|| format!("Unknown genre '{}', see 'filters'.", name))?;
        Ok(toggle(&mut self.criteria.genres, genre))
    }

    fn toggle_kind(&mut self, name: &str) -> Result<bool, String> {
        let kind = self
            .known_kind(name)
            .ok_or_else(|| format!("Unknown type '{}', see 'filters'.", name))?;
        Ok(toggle(&mut self.criteria.kinds, kind))
    }

    fn set_query(&mut self, words: Vec<String>) {
        if !words.is_empty() {
            self.criteria.query = Some(words.join(" "));
        }
    }

    fn render(&self, page: Page) -> RenderedPage {
        self.dashboard.render(page, &self.criteria)
    }
}

fn fmt_score(score: Option<f64>) -> String {
    score.map_or_else(|| "-".to_string(), |s| format!("{:.2}", s))
}

fn fmt_count<T: ToString>(count: Option<T>) -> String {
    count.map_or_else(|| "-".to_string(), |c| c.to_string())
}

fn print_rendered(page: RenderedPage) {
    match page {
        RenderedPage::Overview(view) => print_overview(&view),
        RenderedPage::HiddenGems(view) => print_hidden_gems(&view),
        RenderedPage::GenreTrends(view) => print_trends(&view),
        RenderedPage::Search(view) => print_search(&view),
    }
}

fn print_overview(view: &OverviewView) {
    cli_style::print_section_header("Overview");
    cli_style::print_key_value_highlight("Titles", &view.total_count.to_string());
    cli_style::print_key_value("Mean score", &fmt_score(view.mean_score));
    cli_style::print_key_value("Median score", &fmt_score(view.median_score));
    let years = view
        .year_range
        .map_or_else(|| "-".to_string(), |r| format!("{} - {}", r.min, r.max));
    cli_style::print_key_value("Years", &years);
    cli_style::print_key_value("Total members", &view.total_members.to_string());
    cli_style::print_key_value("Top genre", view.top_genre.as_deref().unwrap_or("-"));

    cli_style::print_section_header("Titles per decade");
    let decades: Vec<(String, usize)> = view
        .decade_histogram
        .iter()
        .map(|d| (d.decade.to_string(), d.count))
        .collect();
    if decades.is_empty() {
        cli_style::print_empty_list("No titles.");
    }
    cli_style::print_bar_chart(&decades, 40);

    if !view.top_studios.is_empty() {
        cli_style::print_section_header("Top studios");
        let mut table = TableBuilder::new(&["Studio", "Titles"]);
        for studio in &view.top_studios {
            table.add_row(vec![studio.label.clone(), studio.count.to_string()]);
        }
        table.print();
    }
}

fn print_hidden_gems(view: &HiddenGemsView) {
    cli_style::print_section_header("Hidden gems");
    if view.ranked.is_empty() {
        cli_style::print_empty_list("No title qualifies.");
    } else {
        let mut table = TableBuilder::new(&["#", "Title", "Year", "Score", "Members", "Gem"]);
        for (rank, gem) in view.ranked.iter().enumerate() {
            table.add_row(vec![
                (rank + 1).to_string(),
                gem.title.clone(),
                fmt_count(gem.year),
                format!("{:.2}", gem.score),
                gem.members.to_string(),
                format!("{:.3}", gem.hidden_gem_score),
            ]);
        }
        table.print();
    }

    if let Some(efficiency) = &view.efficiency {
        cli_style::print_section_header("Recommendation efficiency");
        cli_style::print_key_value("Sample", &efficiency.sample_size.to_string());
        cli_style::print_key_value(
            "Median members",
            &format!("{:.0}", efficiency.median_members),
        );
        cli_style::print_key_value(
            "Median recs per member",
            &format!("{:.4}", efficiency.median_ratio),
        );
        for gem in &efficiency.gems {
            cli_style::print_list_item(
                &format!(
                    "{} ({} recs / {} members)",
                    gem.title, gem.recommendation_count, gem.members
                ),
                colors::GOLD,
            );
        }
    }
}

fn print_trends(view: &GenreTrendsView) {
    cli_style::print_section_header("Top genres per decade");
    if view.series.is_empty() {
        cli_style::print_empty_list("No dated titles.");
    } else {
        let mut headers = vec!["Decade"];
        headers.extend(view.top_genres.iter().map(String::as_str));
        let mut table = TableBuilder::new(&headers);
        for decade_cells in view.series.chunks(view.top_genres.len().max(1)) {
            let mut row = vec![decade_cells[0].decade.to_string()];
            row.extend(decade_cells.iter().map(|c| c.count.to_string()));
            table.add_row(row);
        }
        table.print();
    }

    cli_style::print_section_header("Types");
    let kinds: Vec<(String, usize)> = view
        .kind_distribution
        .iter()
        .map(|k| (k.label.clone(), k.count))
        .collect();
    cli_style::print_bar_chart(&kinds, 40);

    if !view.mean_score_by_kind.is_empty() {
        let mut table = TableBuilder::new(&["Type", "Mean score", "Rated"]);
        for kind in &view.mean_score_by_kind {
            table.add_row(vec![
                kind.label.clone(),
                format!("{:.2}", kind.mean),
                kind.count.to_string(),
            ]);
        }
        table.print();
    }
}

fn print_search(view: &SearchView) {
    cli_style::print_section_header("Search");
    cli_style::print_key_value_highlight("Matches", &view.total_matches.to_string());
    if view.rows.is_empty() {
        cli_style::print_empty_list("Nothing matches the current filters.");
        return;
    }
    let mut table = TableBuilder::new(&["Title", "Score", "Year", "Type", "Eps", "Members"]);
    for row in &view.rows {
        table.add_row(vec![
            row.title.clone(),
            fmt_score(row.score),
            fmt_count(row.year),
            row.kind.clone().unwrap_or_else(|| "-".to_string()),
            fmt_count(row.episodes),
            fmt_count(row.members),
        ]);
    }
    table.print();
    if view.rows.len() < view.total_matches {
        cli_style::print_empty_list(&format!(
            "{} more not shown.",
            view.total_matches - view.rows.len()
        ));
    }
}

fn join_or_dash<'a>(values: impl Iterator<Item = &'a String>) -> String {
    let joined = values.cloned().collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

fn print_filters(explorer: &Explorer) {
    let criteria = &explorer.criteria;
    cli_style::print_section_header("Active filters");
    if criteria.is_empty() {
        cli_style::print_empty_list("None, every title is selected.");
    }
    cli_style::print_key_value("Text", criteria.query.as_deref().unwrap_or("-"));
    cli_style::print_key_value(
        "Years",
        &format!(
            "{} - {}",
            fmt_count(criteria.year_min),
            fmt_count(criteria.year_max)
        ),
    );
    cli_style::print_key_value("Min score", &fmt_score(criteria.score_min));
    cli_style::print_key_value(
        "Genres",
        &format!(
            "{} ({:?})",
            join_or_dash(criteria.genres.iter()),
            criteria.genre_match
        ),
    );
    cli_style::print_key_value("Types", &join_or_dash(criteria.kinds.iter()));

    let options = explorer.dashboard.filter_options();
    cli_style::print_section_header("Available");
    cli_style::print_key_value(
        "Years",
        &format!("{} - {}", options.year_min, options.year_max),
    );
    cli_style::print_key_value("Genres", &join_or_dash(options.genres.iter()));
    cli_style::print_key_value("Types", &join_or_dash(options.kinds.iter()));
}

fn execute_command(line: String, explorer: &mut Explorer) -> CommandExecutionResult {
    if line.is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    match cli {
        Ok(cli) => {
            cli_style::print_command_echo(&line);
            match cli.command {
                InnerCommand::Overview => print_rendered(explorer.render(Page::Overview)),
                InnerCommand::Gems { count } => {
                    print_rendered(explorer.render(Page::HiddenGems { limit: count }))
                }
                InnerCommand::Trends => print_rendered(explorer.render(Page::GenreTrends)),
                InnerCommand::Search { text } => {
                    explorer.set_query(text);
                    print_rendered(explorer.render(Page::Search { limit: None }))
                }
                InnerCommand::Years { min, max } => {
                    if let Err(err) = explorer.set_years(min, max) {
                        return CommandExecutionResult::Error(err);
                    }
                    cli_style::print_success(&format!("Years set to {} - {}", min, max));
                }
                InnerCommand::Score { min } => {
                    if let Err(err) = explorer.set_score(min) {
                        return CommandExecutionResult::Error(err);
                    }
                    cli_style::print_success(&format!("Minimum score set to {}", min));
                }
                InnerCommand::Genre { name } => match explorer.toggle_genre(&name) {
                    Ok(true) => cli_style::print_success(&format!("Genre '{}' selected", name)),
                    Ok(false) => cli_style::print_success(&format!("Genre '{}' removed", name)),
                    Err(err) => return CommandExecutionResult::Error(err),
                },
                InnerCommand::Kind { name } => match explorer.toggle_kind(&name) {
                    Ok(true) => cli_style::print_success(&format!("Type '{}' selected", name)),
                    Ok(false) => cli_style::print_success(&format!("Type '{}' removed", name)),
                    Err(err) => return CommandExecutionResult::Error(err),
                },
                InnerCommand::Match { mode } => {
                    explorer.criteria.genre_match = mode;
                    cli_style::print_success(&format!("Genre match set to {:?}", mode));
                }
                InnerCommand::Clear => {
                    explorer.criteria = FilterCriteria::default();
                    cli_style::print_success("Filters cleared");
                }
                InnerCommand::Filters => print_filters(explorer),
                InnerCommand::Exit => return CommandExecutionResult::Exit,
            }
        }

        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
        }
    }
    CommandExecutionResult::Ok
}

#[derive(rustyline_derive::Hinter)]
struct ExploreHelper {
    commands_names: Vec<String>,
}

impl ExploreHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        ExploreHelper { commands_names }
    }
}

impl Completer for ExploreHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .map(|c| c.to_string())
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for ExploreHelper {}
impl Validator for ExploreHelper {}
impl Helper for ExploreHelper {}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let cli_config = CliConfig {
        dataset_path: cli_args.dataset.clone(),
        ..Default::default()
    };
    let app_config = AppConfig::resolve(&cli_config, file_config)?;

    let dataset = load_dataset(&app_config.dataset_path, &app_config.columns)?;
    let table = derive(&dataset);
    let mut explorer = Explorer::new(Dashboard::new(table, app_config.views));

    cli_style::print_banner(
        &app_config.dataset_path.display().to_string(),
        explorer.dashboard.table().len(),
    );
    InnerCli::command().print_long_help()?;

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<ExploreHelper, FileHistory>::with_config(config)?;
    rl.set_helper(Some(ExploreHelper::new()));

    let prompt = cli_style::get_prompt();
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, &mut explorer) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => {
                        break;
                    }
                    CommandExecutionResult::Error(err) => {
                        cli_style::print_error(&err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                cli_style::print_error(&format!("{:?}", e));
                break;
            }
        }
    }
    cli_style::print_goodbye();
    Ok(())
}
