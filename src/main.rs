use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use feedlens::core::action::{Action, Effect, update};
use feedlens::core::category::{self, Category};
use feedlens::core::config::{self, ResolvedConfig};
use feedlens::core::filter::{CategorySet, TimeWindow};
use feedlens::core::format::{format_count, format_relative_time};
use feedlens::core::library;
use feedlens::core::locale::{DetectOptions, EnvLocaleSource, detect_device_locale_with};
use feedlens::core::settings;
use feedlens::core::state::{App, HapticFeedback, Theme};
use feedlens::feed::{FeedKind, FeedProvider, FeedQuery, HttpFeedProvider, NewsItem};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "feedlens", about = "News feed reader with category and recency filters")]
struct Args {
    /// Config file to use instead of ~/.feedlens/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect the device country and language
    Locale {
        /// Fall back to the system timezone when the region is unknown
        #[arg(long)]
        timezone_fallback: bool,
    },
    /// Fetch a feed page and print the filtered headlines
    Feed {
        #[arg(short, long, value_enum)]
        kind: Option<FeedKind>,
        /// Category to keep (repeatable); none means all
        #[arg(short, long = "category")]
        categories: Vec<Category>,
        /// Time window: all, today, 48h, 96h, 7d, 14d
        #[arg(short, long)]
        window: Option<TimeWindow>,
        /// Cursor printed at the end of the previous page
        #[arg(long)]
        page_key: Option<String>,
        /// Bookmark the item with this hash from the fetched page
        #[arg(long)]
        bookmark: Vec<String>,
        /// Like the item with this hash
        #[arg(long)]
        like: Vec<String>,
        /// Remove a like by item hash
        #[arg(long)]
        unlike: Vec<String>,
        /// Print the share link for the item with this hash
        #[arg(long)]
        share: Vec<String>,
    },
    /// Manage saved articles
    Bookmarks {
        #[command(subcommand)]
        command: BookmarkCommand,
    },
    /// Show display settings, or change them with --theme / --haptics
    Settings {
        #[arg(long, value_enum)]
        theme: Option<Theme>,
        #[arg(long, value_enum)]
        haptics: Option<HapticFeedback>,
    },
}

#[derive(Subcommand)]
enum BookmarkCommand {
    /// List bookmarked articles
    List {
        #[arg(short, long = "category")]
        categories: Vec<Category>,
        #[arg(short, long)]
        window: Option<TimeWindow>,
    },
    /// Remove a bookmark by item hash
    Remove { item_hash: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to feedlens.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("feedlens.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match &args.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };

    match args.command {
        Command::Locale { timezone_fallback } => {
            let resolved = config::resolve(&file_config, None);
            run_locale(&resolved, timezone_fallback);
        }
        Command::Feed {
            kind,
            categories,
            window,
            page_key,
            bookmark,
            like,
            unlike,
            share,
        } => {
            let resolved = config::resolve(&file_config, window);
            let kind = kind.unwrap_or(resolved.default_kind);
            log::info!("feedlens starting feed: {:?}", kind);
            let mut app = build_app(&resolved, categories);
            let marks = Marks {
                bookmark,
                like,
                unlike,
                share,
            };
            run_feed(&resolved, &mut app, kind, page_key.as_deref(), marks).await?;
        }
        Command::Bookmarks { command } => match command {
            BookmarkCommand::List { categories, window } => {
                let resolved = config::resolve(&file_config, window.or(Some(TimeWindow::All)));
                let app = build_app(&resolved, categories);
                let items = app.filters.apply(&app.library.bookmarked_items(), chrono::Utc::now());
                if items.is_empty() {
                    println!("No bookmarks yet.");
                }
                print_items(&app, &items);
            }
            BookmarkCommand::Remove { item_hash } => {
                let resolved = config::resolve(&file_config, None);
                let mut app = build_app(&resolved, Vec::new());
                match update(&mut app, Action::RemoveBookmark(item_hash.clone())) {
                    Effect::SaveLibrary => {
                        library::save_library(&app.library)?;
                        println!("Removed {item_hash}");
                    }
                    _ => println!("No bookmark with hash {item_hash}"),
                }
            }
        },
        Command::Settings { theme, haptics } => {
            let resolved = config::resolve(&file_config, None);
            let mut app = build_app(&resolved, Vec::new());
            run_settings(&mut app, theme, haptics)?;
        }
    }

    Ok(())
}

fn build_app(resolved: &ResolvedConfig, categories: Vec<Category>) -> App {
    let library = library::load_library().unwrap_or_else(|e| {
        log::warn!("Failed to load library, starting empty: {}", e);
        Default::default()
    });
    let locale = detect_device_locale_with(
        &EnvLocaleSource,
        DetectOptions {
            timezone_fallback: resolved.timezone_fallback,
        },
    );
    let settings = settings::effective_settings(resolved.settings);
    let mut app = App::new(library, settings, locale, resolved.default_window);
    if !categories.is_empty() {
        update(&mut app, Action::ClearAllCategories);
        let selection: CategorySet = categories.into_iter().collect();
        for category in selection.iter() {
            update(&mut app, Action::ToggleCategory(category));
        }
    }
    app
}

fn run_locale(resolved: &ResolvedConfig, timezone_fallback: bool) {
    let options = DetectOptions {
        timezone_fallback: timezone_fallback || resolved.timezone_fallback,
    };
    let detected = detect_device_locale_with(&EnvLocaleSource, options);
    println!(
        "Country:  {} {} ({})",
        detected.country.flag, detected.country.name, detected.country.code
    );
    println!(
        "Language: {} ({})",
        detected.language.name, detected.language.code
    );
    println!("{}", detected.summary());
}

/// Item hashes to act on after a feed page is shown.
struct Marks {
    bookmark: Vec<String>,
    like: Vec<String>,
    unlike: Vec<String>,
    share: Vec<String>,
}

async fn run_feed(
    resolved: &ResolvedConfig,
    app: &mut App,
    kind: FeedKind,
    page_key: Option<&str>,
    marks: Marks,
) -> Result<(), Box<dyn Error>> {
    let provider = HttpFeedProvider::new(resolved.api_endpoint.clone())?;
    let page = provider
        .fetch(FeedQuery {
            kind,
            country: &resolved.feed_country,
            language: &resolved.feed_language,
            page_key,
        })
        .await?;

    let visible = app.filters.apply(&page.news, chrono::Utc::now());
    if app.filters.has_active_filters() || app.filters.has_active_sort() {
        println!(
            "Showing {} of {} items ({})",
            visible.len(),
            page.news.len(),
            app.filters.window.title()
        );
    }
    print_items(app, &visible);

    let find = |hash: &str| page.news.iter().find(|item| item.item_hash == hash);
    let mut dirty = false;
    for hash in marks.bookmark {
        match find(&hash) {
            Some(item) => dirty |= update(app, Action::AddBookmark(item.clone())) == Effect::SaveLibrary,
            None => eprintln!("No item {hash} on this page"),
        }
    }
    for hash in marks.like {
        dirty |= update(app, Action::Like(hash)) == Effect::SaveLibrary;
    }
    for hash in marks.unlike {
        dirty |= update(app, Action::Unlike(hash)) == Effect::SaveLibrary;
    }
    if dirty {
        library::persist(&app.library);
    }

    for hash in marks.share {
        let Some(item) = find(&hash) else {
            eprintln!("No item {hash} on this page");
            continue;
        };
        let action = Action::Share {
            pk: item.pk.clone(),
            sk: item.sk.clone(),
        };
        if let Effect::Share(event) = update(app, action) {
            log::info!("Shared {} / {}", event.pk, event.sk);
            println!("Share {}: {}", item.headline, item.news_url);
        }
    }

    if let Some(next) = page.page_key {
        println!("\nNext page: --page-key {next}");
    }
    Ok(())
}

fn run_settings(
    app: &mut App,
    theme: Option<Theme>,
    haptics: Option<HapticFeedback>,
) -> Result<(), Box<dyn Error>> {
    let mut actions = Vec::new();
    actions.extend(theme.map(Action::SetTheme));
    actions.extend(haptics.map(Action::SetHapticFeedback));

    let mut dirty = false;
    for action in actions {
        dirty |= update(app, action) == Effect::SaveSettings;
    }
    if dirty {
        settings::save_settings(&app.settings)?;
        println!("Settings saved.");
    }

    println!("Theme:    {}", value_name(app.settings.theme));
    println!("Haptics:  {}", value_name(app.settings.haptic_feedback));
    Ok(())
}

fn value_name<T: ValueEnum>(value: T) -> String {
    value
        .to_possible_value()
        .map(|v| v.get_name().to_string())
        .unwrap_or_default()
}

fn print_items(app: &App, items: &[NewsItem]) {
    let now = chrono::Utc::now();
    for item in items {
        let age = format_relative_time(&item.published, now).unwrap_or_else(|| item.published.clone());
        let categories: Vec<String> = item
            .categories
            .iter()
            .map(|c| category::display_name_for(c))
            .collect();
        let marker = if app.library.is_bookmarked(&item.item_hash) { "*" } else { " " };
        let heart = if app.library.is_liked(&item.item_hash) { "♥" } else { "♡" };
        println!("{marker} {}", item.headline);
        println!(
            "    {} | {} | [{}] | {} {} | {} views | {}",
            item.source_name,
            age,
            categories.join(", "),
            heart,
            format_count(item.metrics.likes),
            format_count(item.metrics.views),
            item.item_hash
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_accepts_unlike_and_share() {
        let args = Args::try_parse_from([
            "feedlens", "feed", "--like", "a", "--unlike", "b", "--unlike", "c", "--share", "d",
        ])
        .unwrap();
        match args.command {
            Command::Feed { like, unlike, share, .. } => {
                assert_eq!(like, vec!["a"]);
                assert_eq!(unlike, vec!["b", "c"]);
                assert_eq!(share, vec!["d"]);
            }
            _ => panic!("expected feed command"),
        }
    }

    #[test]
    fn test_settings_flags_parse() {
        let args =
            Args::try_parse_from(["feedlens", "settings", "--theme", "dark", "--haptics", "disabled"]).unwrap();
        match args.command {
            Command::Settings { theme, haptics } => {
                assert_eq!(theme, Some(Theme::Dark));
                assert_eq!(haptics, Some(HapticFeedback::Disabled));
            }
            _ => panic!("expected settings command"),
        }
        assert!(Args::try_parse_from(["feedlens", "settings", "--theme", "sepia"]).is_err());
    }

    #[test]
    fn test_run_settings_applies_changes() {
        let mut app = App::default();
        // Unchanged values do not write, so this stays off disk.
        run_settings(&mut app, Some(Theme::System), Some(HapticFeedback::Enabled)).unwrap();
        assert_eq!(app.settings, Default::default());
        assert_eq!(value_name(Theme::Dark), "dark");
        assert_eq!(value_name(HapticFeedback::Disabled), "disabled");
    }
}
