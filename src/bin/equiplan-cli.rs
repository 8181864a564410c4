#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use equiplan::{
    detect_conflicts, generate_schedule, io,
    model::{ScheduleRequest, StaffId},
    render::{ScheduleRenderer, TextSummary},
    storage::{JsonStorage, Storage},
    template::{generate_shifts, load_template_from_file},
};
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification équitable (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer un planning à partir d'une requête JSON
    Generate {
        #[arg(long)]
        input: String,
        /// Résultat JSON (sinon imprimé sur stdout)
        #[arg(long)]
        out: Option<String>,
        /// Export CSV des affectations
        #[arg(long)]
        csv: Option<String>,
        /// Résumé texte sur stdout
        #[arg(long)]
        summary: bool,
    },

    /// Construire une requête JSON depuis des CSV
    BuildRequest {
        #[arg(long)]
        shifts: String,
        #[arg(long)]
        availability: String,
        /// liste "staff1,staff2,..." (défaut : personnes du CSV de disponibilités)
        #[arg(long)]
        staff: Option<String>,
        #[arg(long)]
        allow_multiple: bool,
        #[arg(long)]
        out: String,
    },

    /// Déplier une semaine type en CSV de shifts
    ExpandTemplate {
        #[arg(long)]
        template: String,
        /// YYYY-MM-DD
        #[arg(long)]
        from: String,
        /// YYYY-MM-DD (inclus)
        #[arg(long)]
        to: String,
        #[arg(long)]
        out: String,
    },

    /// Vérifier un résultat contre sa requête
    Check {
        #[arg(long)]
        input: String,
        #[arg(long)]
        result: String,
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Generate {
            input,
            out,
            csv,
            summary,
        } => {
            let request = JsonStorage::open(&input)?.load_request()?;
            let result = generate_schedule(&request)?;
            if let Some(path) = out {
                JsonStorage::open(path)?.save_result(&result)?;
            } else if !summary {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            if let Some(path) = csv {
                io::export_assignments_csv(path, &result)?;
            }
            if summary {
                print!("{}", TextSummary.render(&request, &result));
            }
            if result.is_complete() {
                0
            } else {
                eprintln!("{} slot(s) left unfilled", result.stats.unfilled_count);
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::BuildRequest {
            shifts,
            availability,
            staff,
            allow_multiple,
            out,
        } => {
            let shifts = io::import_shifts_csv(shifts)?;
            let (availability, seen) = io::import_availability_csv(availability)?;
            let staff_list: Vec<StaffId> = match staff {
                Some(list) => list
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(StaffId::new)
                    .collect(),
                None => seen,
            };
            if staff_list.is_empty() {
                bail!("no staff to schedule");
            }
            let request = ScheduleRequest {
                shifts,
                availability,
                staff_list,
                allow_multiple_shifts_per_day: allow_multiple,
            };
            JsonStorage::open(out)?.save_request(&request)?;
            0
        }
        Commands::ExpandTemplate {
            template,
            from,
            to,
            out,
        } => {
            let template = load_template_from_file(template)?;
            let from = NaiveDate::parse_from_str(&from, "%Y-%m-%d").context("--from")?;
            let to = NaiveDate::parse_from_str(&to, "%Y-%m-%d").context("--to")?;
            let shifts = generate_shifts(&template, from, to)?;
            io::export_shifts_csv(out, &shifts)?;
            println!("{} shift(s) generated from {}", shifts.len(), template.id);
            0
        }
        Commands::Check {
            input,
            result,
            report,
        } => {
            let request = JsonStorage::open(&input)?.load_request()?;
            let result = JsonStorage::open(&result)?.load_result()?;
            let conflicts = detect_conflicts(&request, &result);
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", conflicts.len());
                if let Some(path) = report {
                    // CSV simple
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["staff_id", "shift_a", "shift_b", "kind"])?;
                    for c in &conflicts {
                        w.write_record([
                            c.staff.as_ref().map_or("", StaffId::as_str),
                            c.shift_a.as_str(),
                            c.shift_b.as_ref().map_or("", |s| s.as_str()),
                            c.kind.as_str(),
                        ])?;
                    }
                    w.flush()?;
                }
                2
            }
        }
    };

    std::process::exit(code);
}
