use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use medvice_core::{Diagnosis, MedviceConfig, MedviceCore, SavedDiagnosis};

#[derive(Parser, Debug)]
#[command(about = "Hybrid symptom diagnosis: dataset lookup with AI fallback", version)]
struct Args {
    /// Configuration file; defaults apply when it does not exist.
    #[arg(long, value_name = "FILE", default_value = "medvice.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Diagnose a comma-separated list of symptoms.
    Diagnose {
        symptoms: String,
        #[arg(long)]
        json: bool,
    },
    /// List every symptom the dataset knows.
    Symptoms,
    /// Diagnose and save the result for a user.
    Save {
        symptoms: String,
        #[arg(long, value_name = "USER_ID")]
        user: String,
        #[arg(long)]
        json: bool,
    },
    /// Show a user's saved results, newest first.
    History {
        #[arg(long, value_name = "USER_ID")]
        user: String,
        #[arg(long)]
        json: bool,
    },
    /// Render the email and SMS texts for a saved result.
    Report {
        id: String,
        #[arg(long, value_name = "NAME")]
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Delete a saved result.
    Delete { id: String },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = MedviceConfig::load_from(&args.config)?;
    config.apply_env();

    let core = MedviceCore::open(&config).context("Failed to start MedVice")?;

    match args.command {
        Command::Diagnose { symptoms, json } => {
            let diagnosis = core.diagnose(require_symptoms(&symptoms)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&diagnosis)?);
            } else {
                print_diagnosis(&diagnosis);
            }
        }
        Command::Symptoms => {
            if !core.knowledge_available() {
                bail!("Dataset unavailable; check the datasets section of {}", args.config.display());
            }
            for label in core.symptom_labels() {
                println!("{}", label);
            }
        }
        Command::Save { symptoms, user, json } => {
            let symptoms = require_symptoms(&symptoms)?;
            let diagnosis = core.diagnose(symptoms);
            let saved = core.save_diagnosis(&user, symptoms, diagnosis.result)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&saved)?);
            } else {
                println!("Saved {}", saved.id);
                print_saved(&saved);
            }
        }
        Command::History { user, json } => {
            let history = core.history(&user)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else if history.is_empty() {
                println!("No saved results for {}", user);
            } else {
                for saved in &history {
                    print_saved(saved);
                }
            }
        }
        Command::Report { id, name, json } => {
            let report = core.report(&id, &name)?;
            if json {
                println!("{}", report.to_json()?);
            } else {
                println!("Subject: {}\n\n{}\nSMS: {}", report.subject, report.body, report.sms);
            }
        }
        Command::Delete { id } => {
            if !core.delete_saved(&id)? {
                bail!("No saved result with id {}", id);
            }
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

fn require_symptoms(symptoms: &str) -> Result<&str> {
    if symptoms.split(',').all(|token| token.trim().is_empty()) {
        bail!("Please enter at least one symptom");
    }
    Ok(symptoms)
}

fn print_diagnosis(diagnosis: &Diagnosis) {
    let result = &diagnosis.result;
    println!("Prediction: {}", result.predicted_condition);
    println!("Source:     {}", result.source.as_str());
    if !result.is_ai_powered() {
        println!("Confidence: {} ({} matched)", result.confidence, result.matched_count);
    }
    println!("\n{}", result.description);

    for (title, items) in [
        ("Medications", &result.medications),
        ("Precautions", &result.precautions),
        ("Diet", &result.diets),
        ("Workouts", &result.workouts),
    ] {
        println!("\n{}:", title);
        if items.is_empty() {
            println!("  N/A");
        }
        for item in items {
            println!("  - {}", item);
        }
    }

    for unknown in &diagnosis.unrecognized {
        if unknown.suggestions.is_empty() {
            println!("\nUnrecognized symptom '{}'", unknown.token);
        } else {
            println!(
                "\nUnrecognized symptom '{}', did you mean: {}?",
                unknown.token,
                unknown.suggestions.join(", ")
            );
        }
    }

    if !diagnosis.alternatives.is_empty() {
        println!("\nAlso consider:");
        for alternative in &diagnosis.alternatives {
            println!("  {} ({} matched)", alternative.name, alternative.match_count);
        }
    }
}

fn print_saved(saved: &SavedDiagnosis) {
    println!(
        "{}  {}  {} [{}] ({})",
        saved.saved_at,
        saved.id,
        saved.result.predicted_condition,
        saved.result.source.as_str(),
        saved.symptoms_input
    );
}
