// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le contrat du fournisseur de données historiques,
// son implémentation Yahoo Finance et le fetch qui produit une ChartSeries
// ============================================================================

pub mod history;  // Fetch : barres -> ChartSeries
pub mod provider; // Trait HistoryProvider + Bar
pub mod yahoo;    // Client API Yahoo Finance

// Re-export des éléments principaux
pub use history::fetch_chart_series;
pub use provider::{Bar, HistoryProvider};
pub use yahoo::YahooProvider;
