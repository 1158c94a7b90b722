use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{load_settings, LifecyclePhase, SearchController, SearchSnapshot};
use shared::{
    domain::{PlaceId, PlaceSummary},
    protocol::{Review, SearchRequest, VibeSummary},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "vibe", about = "Search places through the Vibe Navigator API")]
struct Cli {
    /// Overrides the configured search service URL.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Search {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "")]
        city: String,
        /// Print the raw result records as JSON.
        #[arg(long)]
        json: bool,
    },
    Vibe {
        place_id: i64,
    },
    /// List the scraped reviews behind a place's vibe.
    Reviews {
        place_id: i64,
    },
    Ping,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(url) = cli.server_url {
        settings.search_base_url = url;
    }
    let controller = SearchController::from_settings(&settings)?;

    match cli.command {
        Command::Search { query, city, json } => {
            let snapshot = controller
                .search_and_wait(SearchRequest::new(query, city))
                .await;
            print_search(&snapshot, json)
        }
        Command::Vibe { place_id } => {
            match controller.fetch_vibe_summary(PlaceId(place_id)).await {
                Ok(vibe) => {
                    print!("{}", render_vibe(&vibe));
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) if err.is_not_found() => {
                    println!("No vibe summary yet for place {place_id}.");
                    Ok(ExitCode::FAILURE)
                }
                Err(err) => {
                    eprintln!("{}", err.user_message());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Reviews { place_id } => {
            match controller.fetch_reviews(PlaceId(place_id)).await {
                Ok(reviews) => {
                    print!("{}", render_reviews(&reviews));
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    eprintln!("{}", err.user_message());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Ping => match controller.check_health().await {
            Ok(message) => {
                println!("{message}");
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                eprintln!("search service unreachable: {err}");
                Ok(ExitCode::FAILURE)
            }
        },
    }
}

fn print_search(snapshot: &SearchSnapshot, json: bool) -> Result<ExitCode> {
    if snapshot.phase() == LifecyclePhase::Failure {
        eprintln!("{}", snapshot.error());
        return Ok(ExitCode::FAILURE);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(snapshot.results())?);
    } else {
        print!("{}", render_results(snapshot));
    }
    Ok(ExitCode::SUCCESS)
}

fn render_results(snapshot: &SearchSnapshot) -> String {
    let results = snapshot.results();
    if results.is_empty() {
        return "No places found.\n".to_string();
    }

    let mut out = String::new();
    for (i, record) in results.iter().enumerate() {
        let place = PlaceSummary::from_record(record);
        out.push_str(&format!("{}. {}", i + 1, place.display_name()));
        if let Some(id) = place.id {
            out.push_str(&format!(" [id {id}]"));
        }
        out.push('\n');
        if let Some(subtitle) = place.subtitle() {
            out.push_str(&format!("   {subtitle}\n"));
        }
        if let Some(address) = &place.address {
            out.push_str(&format!("   {address}\n"));
        }
    }
    out
}

fn render_vibe(vibe: &VibeSummary) -> String {
    let mut out = format!("{}\n", vibe.summary);
    if !vibe.mood_tags.is_empty() {
        out.push_str(&format!("Mood: {}\n", vibe.mood_tags.join(", ")));
    }
    if !vibe.key_themes.is_empty() {
        out.push_str(&format!("Themes: {}\n", vibe.key_themes.join(", ")));
    }
    out
}

fn render_reviews(reviews: &[Review]) -> String {
    if reviews.is_empty() {
        return "No reviews yet.\n".to_string();
    }

    let mut out = String::new();
    for review in reviews {
        out.push_str(&format!("[{}]", review.source));
        if let Some(rating) = review.rating {
            out.push_str(&format!(" {rating:.1}/5"));
        }
        if let Some(date) = &review.date {
            out.push_str(&format!(" {date}"));
        }
        out.push_str(&format!("\n   {}\n", review.content));
    }
    out
}
