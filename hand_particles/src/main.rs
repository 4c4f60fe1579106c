//! hand_particles — interactive entry point.

use hand_particles::app::run;
use hand_particles::cli;
use tracing::error;

fn init_logging(level: Option<&str>) {
    tracing_subscriber::fmt().with_env_filter(cli::log_filter(level)).init();
}

fn main() {
    let args = cli::parse();
    init_logging(args.log_level.as_deref());

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Hand Particles — gesture-steered particle cloud       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  LeapMotion support: built in  (--leap to use it)");
    #[cfg(not(feature = "leap"))]
    println!("  LeapMotion support: off  (build with --features leap)");
    println!("  Simulated hand: Space shows it, Z/X/V close or open it, mouse moves it");
    println!();

    let cfg = match args.load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "bad configuration");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cfg) {
        error!(error = %e, "fatal");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
