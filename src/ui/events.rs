// ============================================================================
// Gestion des événements
// ============================================================================
// Le graphique reste affiché jusqu'à ce qu'une touche soit pressée.
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Lecture bloquante : event::read() sans timeout
// 3. Error handling avec Result
// ============================================================================

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

use crate::error::ChartError;

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Terminal redimensionné : il faut redessiner
    Resize(u16, u16),

    /// Tout le reste (souris, focus, relâchement de touche...)
    Other,
}

/// Gestionnaire d'événements
pub struct EventHandler;

impl EventHandler {
    /// Crée un nouveau gestionnaire d'événements
    pub fn new() -> Self {
        Self
    }

    /// Lit le prochain événement (bloquant, sans timeout)
    ///
    /// CONCEPT : Filter sur KeyEventKind
    /// Sur certains OS, on reçoit Press ET Release pour une même touche.
    /// Seul Press compte, sinon le relâchement de la touche Entrée qui a
    /// lancé la commande pourrait fermer le graphique.
    pub fn next(&self) -> Result<Event, ChartError> {
        match event::read().map_err(ChartError::Display)? {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
            CrosstermEvent::Resize(width, height) => Ok(Event::Resize(width, height)),
            _ => Ok(Event::Other),
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Vrai pour n'importe quelle touche : c'est le signal d'arrêt de la boucle
pub fn is_stop_event(event: &Event) -> bool {
    matches!(event, Event::Key(_))
}

/// Vrai si le graphique doit être redessiné
pub fn is_redraw_event(event: &Event) -> bool {
    matches!(event, Event::Resize(..))
}

// ============================================================================
// Tests
// ============================================================================
