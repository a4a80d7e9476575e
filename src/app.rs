// ============================================================================
// Pipeline : fetch -> vérification -> rendu
// ============================================================================
// Orchestration de la commande chart, sans dépendance au terminal :
// le renderer est injecté, ce qui permet de vérifier qu'une série vide
// n'atteint jamais l'affichage.
//
// CONCEPT RUST : Générique FnOnce
// - Le renderer est appelé au plus une fois
// - En production : ui::render ; en test : une closure qui enregistre l'appel
// ============================================================================

use tracing::{debug, error, info, instrument};

use crate::api::{fetch_chart_series, HistoryProvider};
use crate::error::ChartError;
use crate::models::{ChartRequest, ChartSeries};

/// Exécute la commande chart de bout en bout
///
/// Ordre garanti :
/// 1. fetch (erreur fournisseur -> retour immédiat)
/// 2. série vide -> `ChartError::EmptyResult`, le renderer n'est pas appelé
/// 3. rendu, qui possède le terminal jusqu'à la sortie de l'utilisateur
#[instrument(skip_all, fields(symbol = %request.symbol))]
pub async fn run_chart<P, R>(provider: &P, request: ChartRequest, renderer: R) -> Result<(), ChartError>
where
    P: HistoryProvider + ?Sized,
    R: FnOnce(&str, &ChartSeries) -> Result<(), ChartError>,
{
    let series = fetch_chart_series(provider, &request).await?;

    // fetch_chart_series le garantit déjà, mais le renderer en dépend
    if series.is_empty() {
        error!("Refusing to render an empty series");
        return Err(ChartError::EmptyResult {
            symbol: request.symbol,
        });
    }

    debug!(points = series.len(), "Handing series to renderer");
    renderer(&request.symbol, &series)?;

    info!("Chart closed by user");
    Ok(())
}

// ============================================================================
// Tests unitaires
// ============================================================================
