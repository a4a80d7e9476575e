// ============================================================================
// Erreurs de la commande chart
// ============================================================================
// Une seule enum pour toute la bibliothèque. Le binaire décide ensuite :
// - Usage : message affiché, sortie propre
// - tout le reste : fatal, remonté jusqu'à main()
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] génère Display + std::error::Error
// - #[source] chaîne l'erreur d'origine (visible avec {:?} via anyhow)
// ============================================================================

use std::io;

use thiserror::Error;

/// Erreurs possibles d'une invocation `qtrn chart`
#[derive(Debug, Error)]
pub enum ChartError {
    /// Mauvaise utilisation de la commande (trop de symboles, symbole vide)
    #[error("{0}")]
    Usage(String),

    /// Échec du fournisseur de données (réseau, symbole inconnu, quota...)
    #[error("provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    /// Le fournisseur a répondu, mais sans aucune barre
    #[error("no historical data returned for {symbol}")]
    EmptyResult { symbol: String },

    /// Impossible d'acquérir le terminal (pas un TTY, capacités manquantes)
    #[error("failed to initialize terminal display")]
    DisplayInit(#[source] io::Error),

    /// Erreur d'E/S pendant le dessin ou la lecture du clavier
    #[error("terminal display error")]
    Display(#[source] io::Error),
}

impl ChartError {
    /// Raccourci pour construire une erreur fournisseur
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        ChartError::Provider {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Vrai pour les erreurs "douces" (affichées, pas fatales)
    pub fn is_usage(&self) -> bool {
        matches!(self, ChartError::Usage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_message() {
        let err = ChartError::provider("Yahoo Finance", "HTTP 404 Not Found");
        assert_eq!(
            err.to_string(),
            "provider error (Yahoo Finance): HTTP 404 Not Found"
        );
        assert!(!err.is_usage());
    }

    #[test]
    fn test_usage_error_is_soft() {
        let err = ChartError::Usage("Too many symbols".to_string());
        assert!(err.is_usage());
        assert_eq!(err.to_string(), "Too many symbols");
    }

    #[test]
    fn test_display_init_keeps_source() {
        use std::error::Error as _;

        let err = ChartError::DisplayInit(io::Error::new(io::ErrorKind::Other, "not a tty"));
        assert_eq!(err.source().map(|s| s.to_string()), Some("not a tty".to_string()));
    }
}
