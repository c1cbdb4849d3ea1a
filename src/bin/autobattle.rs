//! Headless AI vs AI battle runner
//!
//! Drives the player side with an attack policy too, so full battles
//! run without a UI. Useful for balancing: run a few hundred seeds and
//! compare win rates between policies.

use clap::Parser;
use gridstrike::ai::{AiController, AiPolicy, AiProfile};
use gridstrike::battle::{AttackOutcome, BattlePhase, BattleSession, Stats};
use gridstrike::core::types::Side;
use gridstrike::units::EnemyId;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "autobattle")]
#[command(about = "Run AI vs AI battles and report outcomes")]
struct Args {
    /// Policy driving the player side
    #[arg(long, default_value = "strategic")]
    player_policy: String,

    /// Opponent to fight
    #[arg(long, default_value = "carrier-a")]
    enemy: String,

    /// Number of battles to run
    #[arg(long, default_value_t = 1)]
    battles: u32,

    /// Base random seed; battle i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Serialize)]
struct RunSummary {
    battles: u32,
    player_wins: u32,
    enemy_wins: u32,
    avg_shots: f32,
    player_policy: String,
    enemy: String,
    seed: u64,
}

fn parse_policy(name: &str) -> Option<AiPolicy> {
    match name {
        "balanced" => Some(AiPolicy::Balanced),
        "aggressive" => Some(AiPolicy::Aggressive),
        "strategic" => Some(AiPolicy::Strategic),
        "expert" => Some(AiPolicy::Expert),
        _ => None,
    }
}

fn parse_enemy(name: &str) -> Option<EnemyId> {
    match name {
        "carrier-a" => Some(EnemyId::CarrierA),
        "madman-b" => Some(EnemyId::MadmanB),
        "colonel-z" => Some(EnemyId::ColonelZ),
        "bomber-j" => Some(EnemyId::BomberJ),
        _ => None,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridstrike=info".into()),
        )
        .init();

    let args = Args::parse();
    let Some(policy) = parse_policy(&args.player_policy) else {
        eprintln!("unknown policy: {}", args.player_policy);
        std::process::exit(2);
    };
    let Some(enemy_id) = parse_enemy(&args.enemy) else {
        eprintln!("unknown enemy: {}", args.enemy);
        std::process::exit(2);
    };

    let mut player_wins = 0u32;
    let mut total_shots = 0usize;

    for i in 0..args.battles {
        let seed = args.seed + i as u64;
        let (won, shots) = run_one(policy, enemy_id, seed);
        if won {
            player_wins += 1;
        }
        total_shots += shots;
    }

    let summary = RunSummary {
        battles: args.battles,
        player_wins,
        enemy_wins: args.battles - player_wins,
        avg_shots: total_shots as f32 / args.battles.max(1) as f32,
        player_policy: args.player_policy,
        enemy: args.enemy,
        seed: args.seed,
    };

    if args.format == "json" {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("failed to serialize summary: {}", e),
        }
    } else {
        println!(
            "{} battles vs {}: {} wins / {} losses, avg {:.1} shots",
            summary.battles,
            summary.enemy,
            summary.player_wins,
            summary.enemy_wins,
            summary.avg_shots
        );
    }
}

/// Run one battle to completion. Returns whether the player side won
/// and how many shots the battle took.
fn run_one(policy: AiPolicy, enemy_id: EnemyId, seed: u64) -> (bool, usize) {
    let mut session = BattleSession::new(enemy_id, Stats::new(100, 50, 10, 5, 1), seed);

    let mut placement_rng = ChaCha8Rng::seed_from_u64(seed ^ 0x9e37_79b9);
    let mut player_ai = AiController::new(policy, AiProfile::for_policy(policy));
    let roster = [
        gridstrike::units::UnitKind::GiantAirship,
        gridstrike::units::UnitKind::AircraftCarrier,
        gridstrike::units::UnitKind::M4Tank,
        gridstrike::units::UnitKind::FireTruck,
        gridstrike::units::UnitKind::Mine,
        gridstrike::units::UnitKind::Mine,
    ];
    player_ai.place_units(&mut session.state.player_field, &roster, &mut placement_rng);

    if let Err(e) = session.start_battle() {
        eprintln!("failed to start battle: {}", e);
        return (false, 0);
    }

    let mut now_ms = 0u64;
    loop {
        if session.state.phase != BattlePhase::Battle {
            break;
        }
        now_ms += 30_000;
        match session.state.turn {
            Side::Player => {
                let target =
                    player_ai.next_target(&session.state.enemy_field, &mut placement_rng);
                match session.player_attack(target, now_ms) {
                    Ok(result) => {
                        player_ai.observe(
                            &session.state.enemy_field,
                            target,
                            result.outcome == AttackOutcome::Hit,
                        );
                    }
                    Err(e) => {
                        eprintln!("player attack failed: {}", e);
                        break;
                    }
                }
            }
            Side::Enemy => {
                if let Err(e) = session.run_enemy_turn(now_ms) {
                    eprintln!("enemy turn failed: {}", e);
                    break;
                }
            }
        }
    }

    let won = session
        .victory()
        .map(|v| v.winner == Side::Player)
        .unwrap_or(false);
    (won, session.state.attack_history.len())
}
