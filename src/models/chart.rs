// ============================================================================
// Structures : ChartRequest, ChartPoint, ChartSeries
// ============================================================================
// - ChartRequest : ce que l'utilisateur a demandé (symbole, période, intervalle)
// - ChartPoint : un point du graphique (date + clôture ajustée arrondie)
// - ChartSeries : la suite ordonnée de points renvoyée par un fetch
//
// CONCEPTS RUST :
// 1. NaiveDate : date calendaire sans timezone (chrono)
// 2. Decimal : prix exact, arrondi à 2 décimales (rust_decimal)
// 3. Ownership : la série est construite une fois puis passée au rendu
// ============================================================================

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::api::Bar;
use crate::error::ChartError;
use crate::models::Interval;

/// Date de début par défaut (format YYYY-MM-DD)
pub const DEFAULT_START: &str = "2017-01-01";

/// Date de fin par défaut (format YYYY-MM-DD)
pub const DEFAULT_END: &str = "2017-06-20";

/// Nombre de décimales conservées sur les prix
const PRICE_DECIMALS: u32 = 2;

// ============================================================================
// ChartRequest
// ============================================================================

/// Paramètres d'une commande chart, passés par valeur au fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    /// Symbole du ticker (ex: "AAPL")
    pub symbol: String,

    /// Début de la période
    pub start: NaiveDate,

    /// Fin de la période
    pub end: NaiveDate,

    /// Granularité des barres
    pub interval: Interval,
}

impl ChartRequest {
    /// Construit une requête en validant le symbole
    ///
    /// L'ordre des dates n'est pas vérifié : le fournisseur fait foi.
    pub fn new(
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<Self, ChartError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ChartError::Usage(
                "\nA ticker symbol is required for charting.\n\n".to_string(),
            ));
        }

        Ok(Self {
            symbol: symbol.to_string(),
            start,
            end,
            interval,
        })
    }

    /// Requête avec les valeurs par défaut du CLI (2017-01-01 -> 2017-06-20, 1d)
    pub fn with_defaults(symbol: &str) -> Result<Self, ChartError> {
        Self::new(symbol, default_start(), default_end(), Interval::default())
    }
}

/// Date de début par défaut (même valeur que DEFAULT_START)
pub fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 1, 1).unwrap_or_default()
}

/// Date de fin par défaut (même valeur que DEFAULT_END)
pub fn default_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 6, 20).unwrap_or_default()
}

// ============================================================================
// ChartPoint
// ============================================================================

/// Un point du graphique, immuable après création
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    /// Date de la barre
    pub date: NaiveDate,

    /// Clôture ajustée, arrondie à 2 décimales
    pub close_price: Decimal,
}

impl ChartPoint {
    /// Convertit une barre du fournisseur en point de graphique
    ///
    /// CONCEPT RUST : Option -> Result avec ok_or_else
    /// - Decimal::from_f64 retourne None pour NaN / infini
    pub fn from_bar(bar: &Bar) -> Result<Self, ChartError> {
        let close_price = Decimal::from_f64(bar.adj_close)
            .ok_or_else(|| {
                ChartError::provider(
                    "history",
                    format!("invalid adjusted close {} on {}", bar.adj_close, bar.date),
                )
            })?
            .round_dp_with_strategy(PRICE_DECIMALS, RoundingStrategy::MidpointAwayFromZero);

        Ok(Self {
            date: bar.date,
            close_price,
        })
    }

    /// Label affiché sous le graphique : month/day/year, sans zéro initial
    pub fn label(&self) -> String {
        format!(
            "{}/{}/{}",
            self.date.month(),
            self.date.day(),
            self.date.year()
        )
    }

    /// Prix en f64 pour le widget Chart
    pub fn close_f64(&self) -> f64 {
        self.close_price.to_f64().unwrap_or_default()
    }
}

// ============================================================================
// ChartSeries
// ============================================================================

/// Suite ordonnée de points produite par un seul fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    /// Symbole du ticker
    pub symbol: String,

    /// Points dans l'ordre renvoyé par le fournisseur
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Crée une série vide pour un symbole
    pub fn new(symbol: String) -> Self {
        Self {
            symbol,
            points: Vec::new(),
        }
    }

    /// Ajoute un point en fin de série
    pub fn push(&mut self, point: ChartPoint) {
        self.points.push(point);
    }

    /// Nombre de points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Vrai si aucun point
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Premier point (le plus ancien si le fournisseur trie par date)
    pub fn first(&self) -> Option<&ChartPoint> {
        self.points.first()
    }

    /// Dernier point
    pub fn last(&self) -> Option<&ChartPoint> {
        self.points.last()
    }

    /// Clôtures en f64, dans l'ordre
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(ChartPoint::close_f64).collect()
    }

    /// Labels de dates, dans l'ordre
    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(ChartPoint::label).collect()
    }

    /// "first - last" pour le titre, None si la série est vide
    ///
    /// CONCEPT RUST : Option chaining avec ?
    pub fn date_range_label(&self) -> Option<String> {
        let first = self.first()?;
        let last = self.last()?;
        Some(format!("{} - {}", first.label(), last.label()))
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
