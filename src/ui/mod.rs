// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod chart;    // Widget graphique ligne + boucle d'affichage
pub mod events;   // Gestion des événements clavier
pub mod terminal; // Acquisition / restauration du terminal (RAII)

// Re-exports pour simplifier les imports
pub use chart::{render, LineChartSpec};
pub use events::{Event, EventHandler};
pub use terminal::{CrosstermControl, TerminalControl, TerminalSession};
