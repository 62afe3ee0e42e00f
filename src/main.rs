use anyhow::{Context, Result};
use clap::Parser;
use diet_planner::audit::{AuditLog, AuditRecord};
use diet_planner::cli::Prompter;
use diet_planner::config::Config;
use diet_planner::{logging, report, RecommendationEngine, UserProfile};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use tracing::{info, warn};

struct DietPlanner {
    engine: RecommendationEngine,
    audit: Option<AuditLog>,
    config: Config,
    rng: StdRng,
}

impl DietPlanner {
    fn new(config: Config) -> Result<Self> {
        let engine = RecommendationEngine::from_sources(&config.reference_sources())
            .context("could not load reference data")?;
        let audit = config.audit_path().map(AuditLog::new);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            engine,
            audit,
            config,
            rng,
        })
    }

    /// Runs one request and prints the outcome. Returns false if the request failed.
    fn handle(&mut self, profile: &UserProfile) -> Result<bool> {
        let recommendation = match self.engine.recommend(profile, &mut self.rng) {
            Ok(rec) => rec,
            Err(e) => {
                println!("Could not produce a recommendation: {e}");
                return Ok(false);
            }
        };

        let text = report::render(&recommendation);
        if self.config.json {
            println!("{}", serde_json::to_string_pretty(&recommendation)?);
        } else {
            println!("\n{text}");
        }

        if let Some(audit) = &self.audit {
            audit.record(&AuditRecord::new(
                profile,
                &recommendation,
                self.engine.model_fingerprint(),
            ));
        }

        if let Some(dir) = &self.config.results_dir {
            match report::save_report(dir, &text, &profile.summary()) {
                Ok(path) => println!("Report saved to: {}", path.display()),
                Err(e) => warn!(dir = %dir.display(), error = %e, "could not save report"),
            }
        }
        Ok(true)
    }

    fn run_interactive(&mut self) -> Result<()> {
        println!("AI FOOD RECOMMENDATION SYSTEM");
        println!("=============================");
        println!("Press Enter to accept the default shown for any field.\n");

        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        loop {
            let profile = prompter.read_profile()?;
            self.handle(&profile)?;

            prompter.say(&format!("\n{}", "=".repeat(50)))?;
            if !prompter.confirm("Continue? (y/n): ")? {
                println!("Thank you for using the diet planner!");
                break;
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let config = Config::parse();
    logging::init("warn")?;

    if config.profile.any() && config.profile.complete().is_none() {
        anyhow::bail!("--age, --height, --weight, --activity, --region and --restriction must be given together");
    }

    let one_shot = config.profile.complete();
    let mut planner = DietPlanner::new(config)?;
    info!(
        fingerprint = planner.engine.model_fingerprint().unwrap_or("none"),
        "ready"
    );

    match one_shot {
        Some(profile) => {
            if !planner.handle(&profile)? {
                std::process::exit(1);
            }
            Ok(())
        }
        None => planner.run_interactive(),
    }
}
