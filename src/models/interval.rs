// ============================================================================
// Enum : Interval
// ============================================================================
// Granularité des barres demandées au fournisseur (jour, semaine, mois)
//
// CONCEPTS RUST :
// 1. Enum Copy : valeur simple, copiée automatiquement
// 2. FromStr : permet à clap de parser "--interval 1wk" directement
// 3. Display : affichage dans les logs et messages
// ============================================================================

use std::fmt;
use std::str::FromStr;

/// Intervalle entre deux points du graphique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    /// 1 jour (daily)
    #[default]
    Daily,
    /// 1 semaine (weekly)
    Weekly,
    /// 1 mois (monthly)
    Monthly,
}

impl Interval {
    /// Convertit l'intervalle en string pour l'API Yahoo Finance
    ///
    /// CONCEPT RUST : &'static str
    /// - Retourne une string littérale (dans le binaire), pas d'allocation
    pub fn as_yahoo_str(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
            Interval::Monthly => "1mo",
        }
    }

    /// Tous les intervalles acceptés sur la ligne de commande
    pub fn all() -> [Interval; 3] {
        [Interval::Daily, Interval::Weekly, Interval::Monthly]
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_yahoo_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    /// Accepte exactement les valeurs du flag : 1d | 1wk | 1mo
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::all()
            .into_iter()
            .find(|interval| interval.as_yahoo_str() == s)
            .ok_or_else(|| format!("invalid interval '{}' (expected 1d | 1wk | 1mo)", s))
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_yahoo_string() {
        assert_eq!(Interval::Daily.as_yahoo_str(), "1d");
        assert_eq!(Interval::Weekly.as_yahoo_str(), "1wk");
        assert_eq!(Interval::Monthly.as_yahoo_str(), "1mo");
    }

    #[test]
    fn test_interval_from_str() {
        assert_eq!("1d".parse::<Interval>(), Ok(Interval::Daily));
        assert_eq!("1wk".parse::<Interval>(), Ok(Interval::Weekly));
        assert_eq!("1mo".parse::<Interval>(), Ok(Interval::Monthly));
        assert!("1h".parse::<Interval>().is_err());
        assert!("".parse::<Interval>().is_err());
    }

    #[test]
    fn test_interval_default_is_daily() {
        assert_eq!(Interval::default(), Interval::Daily);
        assert_eq!(Interval::default().to_string(), "1d");
    }
}
