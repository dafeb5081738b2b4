mod display;
mod import;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use toto_db::db::{
    count_draws, db_path, fetch_all_draws, fetch_draw_by_date, fetch_last_draws, insert_draw,
    migrate, open_db,
};
use toto_db::models::{Draw, validate_draw};
use toto_db::rusqlite::Connection;
use toto_engine::backtest::{BacktestReport, evaluate_case, test_points};
use toto_engine::check::check_ticket;
use toto_engine::config::{CompatibilityWeighting, DecayShape};
use toto_engine::stats::{compute_stats, range_distribution};
use toto_engine::{EngineConfig, predict};

use crate::display::{
    display_backtest, display_check, display_draws, display_import_summary, display_prediction,
    display_stats,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DecayArg {
    Auto,
    Recent,
    Sigmoid,
    Blocks,
}

impl From<DecayArg> for DecayShape {
    fn from(arg: DecayArg) -> Self {
        match arg {
            DecayArg::Auto => DecayShape::Auto,
            DecayArg::Recent => DecayShape::Recent,
            DecayArg::Sigmoid => DecayShape::Sigmoid,
            DecayArg::Blocks => DecayShape::Blocks,
        }
    }
}

#[derive(Parser)]
#[command(name = "toto", about = "Analyse et prédiction des tirages TOTO (6/49)")]
struct Cli {
    /// Journalisation détaillée (équivaut à RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Options du moteur communes à `predict` et `backtest`.
#[derive(clap::Args)]
struct EngineArgs {
    /// Fichier de configuration JSON ; les options ci-dessous le surchargent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fenêtre d'analyse (nombre de tirages, 0 = tout l'historique)
    #[arg(short, long)]
    window: Option<usize>,

    /// Numéros de base, séparés par des virgules (ex: 10,16,22)
    #[arg(short, long, value_delimiter = ',')]
    anchors: Vec<u8>,

    /// Compter aussi le numéro complémentaire
    #[arg(long)]
    include_additional: bool,

    /// Tirages examinés pour détecter les numéros froids
    #[arg(long)]
    cold_lookback: Option<usize>,

    /// Nombre maximal de numéros froids admis
    #[arg(long)]
    max_cold: Option<usize>,

    /// Forme de la décroissance
    #[arg(long)]
    decay: Option<DecayArg>,

    /// Désactiver le score de compatibilité avec les bases
    #[arg(long)]
    no_compat: bool,

    /// Compatibilité en comptage brut au lieu de la décroissance
    #[arg(long)]
    raw_compat: bool,

    /// Désactiver le bonus de température
    #[arg(long)]
    no_temperature: bool,
}

impl EngineArgs {
    fn to_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("Lecture de la configuration {:?}", path))?,
            None => EngineConfig::default(),
        };
        if let Some(window) = self.window {
            config.window = window;
        }
        if self.include_additional {
            config.include_additional = true;
        }
        if let Some(lookback) = self.cold_lookback {
            config.cold_lookback = lookback;
        }
        if let Some(max_cold) = self.max_cold {
            config.max_cold_allowed = max_cold;
        }
        if let Some(decay) = self.decay {
            config.decay = decay.into();
        }
        if self.no_compat {
            config.compatibility = false;
        }
        if self.raw_compat {
            config.compatibility_weighting = CompatibilityWeighting::Raw;
        }
        if self.no_temperature {
            config.temperature = false;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV (Date,N1..N6,Additional)
        #[arg(short, long, default_value = "assets/toto_results.csv")]
        file: PathBuf,
    },

    /// Exporter la base au format CSV
    Export {
        /// Fichier de sortie
        #[arg(short, long, default_value = "toto_export.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Ajouter un tirage manuellement
    Add,

    /// Afficher les statistiques (fréquences, retards, températures)
    Stats {
        /// Fenêtre d'analyse (nombre de tirages, 0 = tout l'historique)
        #[arg(short, long, default_value = "50")]
        window: usize,

        /// Compter aussi le numéro complémentaire
        #[arg(long)]
        include_additional: bool,
    },

    /// Prédire une grille
    Predict {
        #[command(flatten)]
        engine: EngineArgs,

        /// Nombre de numéros affichés dans le tableau des scores
        #[arg(long, default_value = "15")]
        top: usize,

        /// Sortie JSON
        #[arg(long)]
        json: bool,

        /// Enregistrer la configuration effective dans ce fichier
        #[arg(long)]
        save_config: Option<PathBuf>,
    },

    /// Vérifier une grille contre un tirage
    Check {
        /// 6 numéros, séparés par des virgules
        #[arg(value_delimiter = ',', required = true)]
        numbers: Vec<u8>,

        /// Date du tirage (AAAA-MM-JJ) ; par défaut le plus récent
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Rejouer le moteur sur l'historique (walk-forward)
    Backtest {
        #[command(flatten)]
        engine: EngineArgs,

        /// Nombre de tirages testés, du plus récent au plus ancien
        #[arg(short, long, default_value = "100")]
        tests: usize,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::Export { file } => cmd_export(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Add => cmd_add(&conn),
        Command::Stats { window, include_additional } => cmd_stats(&conn, window, include_additional),
        Command::Predict { engine, top, json, save_config } => {
            cmd_predict(&conn, &engine, top, json, save_config)
        }
        Command::Check { numbers, date } => cmd_check(&conn, &numbers, date.as_deref()),
        Command::Backtest { engine, tests } => cmd_backtest(&conn, &engine, tests),
    }
}

/// Historique complet, ou `None` si la base est vide.
fn load_history(conn: &Connection) -> Result<Option<Vec<Draw>>> {
    if count_draws(conn)? == 0 {
        println!("Base vide. Lancez d'abord : toto import");
        return Ok(None);
    }
    Ok(Some(fetch_all_draws(conn)?))
}

fn cmd_import(conn: &Connection, file: &PathBuf) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_export(conn: &Connection, file: &PathBuf) -> Result<()> {
    let draws = fetch_all_draws(conn)?;
    import::export_csv(&draws, file)?;
    println!("{} tirages exportés vers {}", draws.len(), file.display());
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : toto import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

/// Même convention que le moteur : 0 ou trop grand => tout l'historique.
fn stats_window(window: usize, available: usize) -> usize {
    EngineConfig::with_window(window).effective_window(available)
}

fn cmd_stats(conn: &Connection, window: usize, include_additional: bool) -> Result<()> {
    let Some(draws) = load_history(conn)? else {
        return Ok(());
    };
    let effective_window = stats_window(window, draws.len());
    let stats = compute_stats(&draws, effective_window, include_additional);
    let ranges = range_distribution(&draws, effective_window, include_additional);
    display_stats(&stats, &ranges, effective_window);
    Ok(())
}

fn cmd_predict(
    conn: &Connection,
    engine: &EngineArgs,
    top: usize,
    json: bool,
    save_config: Option<PathBuf>,
) -> Result<()> {
    let config = engine.to_config()?;
    if let Some(path) = save_config {
        config
            .save(&path)
            .with_context(|| format!("Écriture de la configuration {:?}", path))?;
    }

    let Some(draws) = load_history(conn)? else {
        return Ok(());
    };
    let result = predict(&draws, &engine.anchors, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_prediction(&result, top);
    }
    Ok(())
}

fn cmd_check(conn: &Connection, numbers: &[u8], date: Option<&str>) -> Result<()> {
    let draw = match date {
        Some(date) => fetch_draw_by_date(conn, date)?
            .with_context(|| format!("Aucun tirage le {}", date))?,
        None => match fetch_last_draws(conn, 1)?.into_iter().next() {
            Some(draw) => draw,
            None => bail!("Base vide. Lancez d'abord : toto import"),
        },
    };
    let check = check_ticket(numbers, &draw)?;
    display_check(numbers, &draw, &check);
    Ok(())
}

fn cmd_backtest(conn: &Connection, engine: &EngineArgs, tests: usize) -> Result<()> {
    let config = engine.to_config()?;
    let Some(draws) = load_history(conn)? else {
        return Ok(());
    };

    let points = test_points(&draws, tests);
    if points.is_empty() {
        bail!("Historique trop court pour un backtest ({} tirages)", draws.len());
    }

    println!("Backtest sur {} tirages...", points.len());
    let pb = ProgressBar::new(points.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    let mut report = BacktestReport::default();
    for t in points {
        let case = evaluate_case(&draws, t, &engine.anchors, &config)?;
        pb.set_message(case.date.clone());
        report.record(&case);
        pb.inc(1);
    }
    pb.finish_and_clear();

    display_backtest(&report);
    Ok(())
}

fn cmd_add(conn: &Connection) -> Result<()> {
    println!("Ajout d'un tirage manuellement\n");

    let raw_date = prompt("Date (JJ/MM/AAAA) : ")?;
    let date_parts: Vec<&str> = raw_date.split('/').collect();
    if date_parts.len() != 3 {
        bail!("Format de date invalide");
    }
    let date = import::parse_date(&format!("{}-{}-{}", date_parts[2], date_parts[1], date_parts[0]))?;

    let (numbers, additional) = prompt_draw()?;

    let draw = Draw { date, numbers, additional };

    println!("\nTirage à insérer :");
    display_draws(std::slice::from_ref(&draw));

    let confirm = prompt("\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.trim().to_lowercase() == "o" {
        let inserted = insert_draw(conn, &draw)?;
        if inserted {
            println!("Tirage inséré avec succès.");
        } else {
            println!("Ce tirage existe déjà (doublon ignoré).");
        }
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}

fn prompt_draw() -> Result<([u8; 6], u8)> {
    loop {
        let input = prompt("6 numéros puis le complémentaire (séparés par des espaces, 1-49) : ")?;
        let nums: Result<Vec<u8>, _> = input.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) if v.len() == 7 => {
                let numbers = [v[0], v[1], v[2], v[3], v[4], v[5]];
                match validate_draw(&numbers, v[6]) {
                    Ok(()) => return Ok((numbers, v[6])),
                    Err(e) => println!("{}. Réessayez.", e),
                }
            }
            _ => println!("Entrez exactement 7 numéros. Réessayez."),
        }
    }
}
