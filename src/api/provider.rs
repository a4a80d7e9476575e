// ============================================================================
// Trait : HistoryProvider
// ============================================================================
// Abstraction du fournisseur de cotations historiques
//
// CONCEPTS RUST :
// 1. Trait : contrat commun (Yahoo en production, faux fournisseur en test)
// 2. async_trait : méthodes async dans un trait
// 3. Send + Sync : le fournisseur peut traverser le runtime tokio
// ============================================================================

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ChartError;
use crate::models::Interval;

/// Une barre historique telle que renvoyée par le fournisseur
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Date calendaire de la barre
    pub date: NaiveDate,

    /// Clôture ajustée (splits / dividendes), non arrondie
    pub adj_close: f64,
}

/// Fournisseur de barres historiques
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Nom lisible du fournisseur (logs, erreurs)
    fn name(&self) -> &str;

    /// Récupère les barres de [start, end] à l'intervalle donné
    ///
    /// L'ordre des barres est celui du fournisseur. Aucune relance,
    /// aucune validation du symbole ou de l'ordre des dates.
    async fn get_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<Bar>, ChartError>;
}
