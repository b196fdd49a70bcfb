//! Headless replay demo.
//!
//! Generates a seeded population, runs the demo engine, feeds the full
//! message stream through the visualization core, and steps playback to
//! completion, printing a summary report.

use clap::Parser;
use match_viz::{Canvas, DemoEngine, Inbound, Phase, Side, StepOutcome, VizEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(about = "Replay one stable-matching run through the visualization core")]
struct Args {
    /// Group size for each side
    #[arg(short = 'n', long, default_value_t = 5)]
    group_size: u32,

    /// Seed for population generation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print the generated groups and final pairings
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut engine = DemoEngine::new();
    let mut viz = VizEngine::new(Canvas {
        width: 1280.0,
        height: 720.0,
    });

    println!("Group size: {}", args.group_size);

    let population = engine.generate(args.group_size, &mut rng);
    if args.verbose {
        println!("Men:");
        for man in &population.men {
            println!("  ID: {}, Preferences: {:?}", man.id, man.preferences);
        }
        println!("Women:");
        for woman in &population.women {
            println!("  ID: {}, Preferences: {:?}", woman.id, woman.preferences);
        }
    }
    viz.apply(Inbound::People(population));

    println!("Starting matching process...");
    for msg in engine.run_messages() {
        viz.apply(msg);
    }

    let steps = viz.playback().log_len();
    let mut passes = 0u32;
    let mut advances = 0u32;
    while viz.playback().phase() != Phase::Idle {
        let (_, outcome) = viz.render_pass_with_outcome();
        passes += 1;
        if outcome != StepOutcome::Idle {
            advances += 1;
        }
    }

    let frame = viz.render_pass();
    let matched = viz
        .registry()
        .iter(Side::Man)
        .filter(|m| m.partner.is_some())
        .count();

    println!("\n=== Replay Report ===");
    println!("History steps:   {steps}");
    println!("Playback passes: {passes} ({advances} advances)");
    println!("Matched men:     {matched} / {}", viz.registry().len(Side::Man));
    println!("Frame markers:   {}", frame.markers.len());
    println!("Frame edges:     {}", frame.edges.len());
    if let Some(duration) = viz.duration() {
        println!("Engine run took: {duration}");
    }

    if args.verbose {
        println!("\nMatches:");
        println!("M <-> W");
        println!("=======");
        for man in viz.registry().iter(Side::Man) {
            if let Some(wife) = man.partner {
                println!("{} <-> {}", man.id, wife);
            }
        }
    }
}
