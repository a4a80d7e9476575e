// ============================================================================
// qtrn - Point d'entrée
// ============================================================================
// qtrn chart AAPL -s 2016-12-01 -e 2017-06-20 -i 1d
//
// Étapes :
// 1. Logging vers fichier (le TUI occupe stdout)
// 2. Parsing de la ligne de commande
// 3. Fetch Yahoo Finance (async, via un runtime tokio)
// 4. Affichage du graphique jusqu'à ce qu'une touche soit pressée
//
// Une seule fonction décide du comportement de sortie : main().
// - ChartError::Usage : message sur stdout, code 0
// - toute autre erreur : loggée puis retournée, code non nul
// ============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::runtime::Runtime;
use tracing::{debug, error, info};

use qtrn::api::YahooProvider;
use qtrn::app::run_chart;
use qtrn::cli::{ChartArgs, Cli, Command};
use qtrn::ui;
use qtrn::ChartError;

/// Variable d'environnement pour forcer le répertoire des logs
const LOG_DIR_ENV: &str = "QTRN_LOG_DIR";

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Répertoire des logs
///
/// Ordre de priorité :
/// 1. $QTRN_LOG_DIR
/// 2. Linux : ~/.local/share/qtrn/logs, macOS : ~/Library/Application Support/qtrn/logs
/// 3. ./logs
fn log_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(LOG_DIR_ENV) {
        return PathBuf::from(dir);
    }

    dirs::data_local_dir()
        .map(|dir| dir.join("qtrn").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/qtrn/logs/qtrn.log.*
///
/// # Contrôler le niveau de log
/// RUST_LOG=trace qtrn chart AAPL
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "qtrn.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender) // Écrit dans le fichier
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            // RUST_LOG=trace : tout ; par défaut debug pour qtrn, info pour le reste
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qtrn=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================
// CONCEPT RUST : Async dans sync
// - main() est synchrone (pour le TUI)
// - Le fetch HTTP est async : tokio::runtime::Runtime + block_on
// ============================================================================

fn main() -> Result<()> {
    // Les erreurs de parsing (--help, date invalide...) sortent ici via clap
    let cli = Cli::parse();

    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
    });

    info!(command = ?cli.command, "qtrn starting up");

    let runtime = Runtime::new().context("Échec de la création du runtime tokio")?;

    let result = match cli.command {
        Command::Chart(args) => chart(&runtime, args),
    };

    match result {
        Ok(()) => {
            info!("qtrn exited normally");
            Ok(())
        }
        // Erreur "douce" : message, pas de code d'erreur
        Err(e) if e.is_usage() => {
            info!("Usage error, nothing to chart");
            print!("{}", e);
            Ok(())
        }
        Err(e) => {
            error!(error = ?e, "qtrn exited with error");
            Err(e.into())
        }
    }
}

/// Commande chart : requête -> fetch -> rendu
fn chart(runtime: &Runtime, args: ChartArgs) -> Result<(), ChartError> {
    let request = args.into_request()?;
    debug!(?request, "Chart request");

    let provider = YahooProvider::new()?;
    runtime.block_on(run_chart(&provider, request, ui::render))
}
