// ============================================================================
// qtrn - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;    // Fournisseur de cotations historiques (Yahoo Finance)
pub mod app;    // Pipeline de la commande chart
pub mod cli;    // Définition de la ligne de commande
pub mod error;  // ChartError
pub mod models; // Structures de données
pub mod ui;     // Interface utilisateur

pub use error::ChartError;
