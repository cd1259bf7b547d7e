use std::sync::Arc;

use engine::{GameConfig, GameResult, GameService, MemoryStateLog, SeatSpec};

mod telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    // Configuration comes from ENGINE_* environment variables; unset values
    // use the defaults.
    let config = GameConfig::from_env().unwrap_or_else(|e| {
        eprintln!("bad engine configuration: {e}");
        std::process::exit(1);
    });

    let service = GameService::new(Arc::new(MemoryStateLog::new()));
    let seats = [
        SeatSpec::scripted("north"),
        SeatSpec::scripted("east"),
        SeatSpec::scripted("south"),
        SeatSpec::scripted("west"),
    ];
    let created = service.create_game(config, &seats)?;
    println!("running demo game {}", created.game_id);

    let completion = service.wait_completion(created.game_id).await?;
    match completion.result {
        GameResult::Winner { seat, settlement } => {
            println!("seat {seat} won after {} round(s)", completion.state.round_no);
            for (seat, profit) in &settlement.profits {
                println!("  seat {seat}: payout {}, profit {profit}", settlement.payouts[seat]);
            }
        }
        GameResult::NoWinner => {
            println!(
                "no proposal reached a supermajority in {} rounds; stakes returned",
                completion.state.max_rounds
            );
        }
        other => println!("game ended without settling: {other:?}"),
    }
    Ok(())
}
