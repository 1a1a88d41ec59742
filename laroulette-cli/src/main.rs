mod display;
mod input;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};

use laroulette_core::engine::{AdviceEngine, PatternEngine};
use laroulette_core::guard::{
    SessionCounter, UsageDecision, UsageGuard, DEFAULT_DAILY_LIMIT, DEFAULT_SESSION_LIMIT,
};
use laroulette_core::models::Recommendation;
use laroulette_core::wheel;
use laroulette_db::db::{
    db_path, fetch_last_entries, insert_entry, migrate, open_db, SqliteStore,
};

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum EngineKind {
    /// Moteur piloté par les motifs de l'historique observé
    #[default]
    Pattern,
}

#[derive(Parser)]
#[command(name = "laroulette", about = "Analyseur de tendances pour roulette européenne")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyser une séquence de numéros extraite d'une capture
    Analyse {
        /// Numéros observés, du plus récent au plus ancien (ex: "7 7 22 5")
        #[arg(short, long)]
        numbers: Option<String>,

        /// Fichier texte produit par l'extraction
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Moteur de décision
        #[arg(short, long, default_value = "pattern")]
        engine: EngineKind,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Budget quotidien d'analyses
        #[arg(long, default_value_t = DEFAULT_DAILY_LIMIT)]
        daily_limit: u32,

        /// Ne pas demander de confirmation en zone d'alerte
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Afficher les dernières recommandations enregistrées
    Historique {
        /// Nombre d'entrées à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Afficher l'état du compteur d'utilisation
    Usage {
        /// Budget quotidien d'analyses
        #[arg(long, default_value_t = DEFAULT_DAILY_LIMIT)]
        daily_limit: u32,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Remettre à zéro le compteur de session
    ResetSession,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    wheel::validate_wheel()?;

    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Analyse {
            numbers,
            file,
            engine,
            seed,
            daily_limit,
            yes,
        } => cmd_analyse(&conn, numbers, file, engine, seed, daily_limit, yes),
        Command::Historique { last } => cmd_historique(&conn, last),
        Command::Usage { daily_limit } => cmd_usage(&conn, daily_limit),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::ResetSession => cmd_reset_session(&conn),
    }
}

fn today() -> String {
    chrono::Local::now().date_naive().to_string()
}

fn now_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn build_engine(kind: EngineKind, seed: Option<u64>) -> Box<dyn AdviceEngine> {
    match kind {
        EngineKind::Pattern => Box::new(PatternEngine::new(seed)),
    }
}

fn cmd_analyse(
    conn: &laroulette_db::rusqlite::Connection,
    numbers: Option<String>,
    file: Option<PathBuf>,
    engine_kind: EngineKind,
    seed: Option<u64>,
    daily_limit: u32,
    yes: bool,
) -> Result<()> {
    // Entrée : le collaborateur d'extraction est remplacé par des
    // arguments ou un fichier. Une panne d'extraction traverse le cœur
    // telle quelle, en état ERROR.
    let raw = match (numbers, file) {
        (Some(s), _) => input::parse_numbers(&s),
        (None, Some(path)) => match input::read_numbers_file(&path) {
            Ok(numbers) => numbers,
            Err(e) => {
                eprintln!("Panne d'extraction : {e:#}");
                let rec = Recommendation::extraction_error(
                    "Extraction impossible : le fichier n'a pas pu être lu.",
                );
                display::display_recommendation(&rec);
                return Ok(());
            }
        },
        (None, None) => bail!("Fournissez --numbers ou --file"),
    };

    let store = SqliteStore::new(conn);
    let guard = UsageGuard::new(&store, daily_limit);
    let today = today();

    match guard.check(&today)? {
        UsageDecision::Deny => {
            let state = guard.state(&today)?;
            println!(
                "Budget quotidien atteint ({}/{} analyses, plafond de sécurité {}). Réessayez demain.",
                state.count,
                daily_limit,
                guard.safe_limit()
            );
            return Ok(());
        }
        UsageDecision::SoftWarn if !yes => {
            let state = guard.state(&today)?;
            println!(
                "Zone d'alerte budget : {}/{} analyses aujourd'hui.",
                state.count, daily_limit
            );
            let answer = prompt("Continuer quand même ? (o/n) : ")?;
            if answer.trim().to_lowercase() != "o" {
                println!("Analyse annulée.");
                return Ok(());
            }
        }
        _ => {}
    }

    let mut engine = build_engine(engine_kind, seed);
    let rec = engine.advise(&raw);
    display::display_recommendation(&rec);

    insert_entry(conn, &rec, &now_timestamp())?;
    guard.record_success(&today)?;

    let session = SessionCounter::new(&store, DEFAULT_SESSION_LIMIT);
    let signals = session.record()?;
    if signals >= session.limit() {
        println!(
            "\n⏸️  Pause conseillée : {} analyses cette session. \
             Lancez `laroulette reset-session` pour repartir de zéro.",
            signals
        );
    }

    Ok(())
}

fn cmd_historique(conn: &laroulette_db::rusqlite::Connection, last: u32) -> Result<()> {
    let entries = fetch_last_entries(conn, last)?;
    display::display_journal(&entries);
    Ok(())
}

fn cmd_usage(conn: &laroulette_db::rusqlite::Connection, daily_limit: u32) -> Result<()> {
    let store = SqliteStore::new(conn);
    let guard = UsageGuard::new(&store, daily_limit);
    let state = guard.state(&today())?;
    display::display_usage(&state, daily_limit, guard.warn_threshold(), guard.safe_limit());

    let session = SessionCounter::new(&store, DEFAULT_SESSION_LIMIT);
    println!(
        "Signaux de session : {}/{}",
        session.count()?,
        session.limit()
    );
    Ok(())
}

fn cmd_reset_session(conn: &laroulette_db::rusqlite::Connection) -> Result<()> {
    let store = SqliteStore::new(conn);
    let session = SessionCounter::new(&store, DEFAULT_SESSION_LIMIT);
    println!("Signaux de session : {}", session.count()?);

    let answer = prompt("Confirmer la remise à zéro ? (o/n) : ")?;
    if answer.trim().to_lowercase() == "o" {
        session.reset()?;
        println!("Compteur de session remis à zéro.");
    } else {
        println!("Remise à zéro annulée.");
    }
    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
