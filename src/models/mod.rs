// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de la commande chart
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module public (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod chart;    // ChartRequest, ChartPoint, ChartSeries
pub mod interval; // Interval (1d, 1wk, 1mo)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use qtrn::models::chart::ChartSeries;
// On peut faire : use qtrn::models::ChartSeries;
pub use chart::{ChartPoint, ChartRequest, ChartSeries, DEFAULT_END, DEFAULT_START};
pub use interval::Interval;
