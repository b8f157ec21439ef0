mod caption;
mod config;
mod leaderboard;
mod logging;
mod render;
mod util;

use tokio::sync::mpsc;
use tracing::info;

use crate::caption::driver::{self, CaptionCommand};
use crate::leaderboard::entry::{Difficulty, NewEntry, Role};
use crate::leaderboard::ranker::{Category, LeaderboardManager};
use crate::leaderboard::store::FileStore;

pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    if std::env::var("RUST_BACKTRACE").is_err() {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    let cfg = config::load_config().expect("Could not load config");

    logging::init(&cfg)?;
    info!("Logging initialised. Starting EduVerse core");

    let store = FileStore::new(cfg.storage_dir.clone());
    let mut manager = LeaderboardManager::new(Box::new(store));

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("caption") => run_caption(&cfg, &args[1..]).await,
        Some("record") => run_record(&mut manager, &args[1..]),
        Some("show") => {
            print!("{}", render::render_board(manager.board()));
            Ok(())
        }
        Some("rank") => run_rank(&mut manager, &args[1..]),
        Some("reset") => {
            manager.reset();
            println!("Leaderboard cleared.");
            Ok(())
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

async fn run_caption(cfg: &config::AppConfig, args: &[String]) -> Result<(), Error> {
    let Some(text) = args.first() else {
        return Err("usage: eduverse caption <text> [duration-ms]".into());
    };
    let duration_ms = match args.get(1) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| format!("invalid duration: {raw}"))?,
        None => cfg.caption.default_duration_ms,
    };

    let (done_tx, mut done_rx) = mpsc::channel::<()>(1);
    let cmd_tx = driver::spawn_caption_driver(
        |frame| {
            if frame.revealed_count > 0 {
                println!("{}", frame.words[..frame.revealed_count].join(" "));
            }
        },
        move || {
            let _ = done_tx.try_send(());
        },
    );

    cmd_tx
        .send(CaptionCommand::SetText {
            text: text.clone(),
            duration_ms,
        })
        .await
        .map_err(|_| "caption driver unavailable")?;

    done_rx
        .recv()
        .await
        .ok_or("caption driver stopped unexpectedly")?;
    println!("(caption complete)");

    let _ = cmd_tx.send(CaptionCommand::Shutdown).await;
    Ok(())
}

fn run_record(manager: &mut LeaderboardManager, args: &[String]) -> Result<(), Error> {
    let [player, case_id, case_name, time, score, accuracy, difficulty, role] = args else {
        return Err(
            "usage: eduverse record <player> <case-id> <case-name> <time-seconds> <score> <accuracy> <difficulty> <role>"
                .into(),
        );
    };

    let time_elapsed = parse_number(time, "time-seconds")?;
    if time_elapsed < 0.0 {
        return Err("time-seconds must be non-negative".into());
    }
    let score = parse_number(score, "score")?;
    let accuracy = parse_number(accuracy, "accuracy")?;
    if !(0.0..=1.0).contains(&accuracy) {
        return Err("accuracy must be within [0, 1]".into());
    }
    let difficulty = Difficulty::from_arg(difficulty)
        .ok_or("difficulty must be beginner, intermediate or advanced")?;
    let role = Role::from_arg(role).ok_or("role must be defense or prosecution")?;

    let outcome = manager.record_entry(NewEntry {
        player_name: player.clone(),
        case_id: case_id.clone(),
        case_name: case_name.clone(),
        time_elapsed,
        score,
        accuracy,
        difficulty,
        role,
    });

    let views: Vec<&str> = outcome.admitted.iter().map(|c| c.label()).collect();
    let views = if views.is_empty() {
        "no views".to_string()
    } else {
        views.join(", ")
    };
    println!(
        "Recorded {} ({}) - on: {}",
        outcome.entry.player_name, outcome.entry.id, views
    );
    Ok(())
}

fn run_rank(manager: &mut LeaderboardManager, args: &[String]) -> Result<(), Error> {
    let [player, category_arg] = args else {
        return Err("usage: eduverse rank <player> <category>".into());
    };
    let category = Category::from_arg(category_arg)
        .ok_or("category must be fastest-wins, highest-scores or best-accuracy")?;

    match manager.get_player_rank(player, category) {
        Some(rank) => println!("{player} is #{rank} on {}", category.label()),
        None => println!("{player} is not on the {} board", category.label()),
    }
    Ok(())
}

fn parse_number(raw: &str, name: &str) -> Result<f64, Error> {
    raw.parse::<f64>()
        .map_err(|_| format!("invalid {name}: {raw}").into())
}

fn print_usage() {
    println!("EduVerse core commands:");
    println!("  caption <text> [duration-ms]   reveal a caption word by word");
    println!("  record <player> <case-id> <case-name> <time-seconds> <score> <accuracy> <difficulty> <role>");
    println!("  show                           print the three leaderboard views");
    println!("  rank <player> <category>       print a player's 1-based rank");
    println!("  reset                          clear the leaderboard");
}
