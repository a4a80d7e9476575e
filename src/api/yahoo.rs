// ============================================================================
// API Client : Yahoo Finance
// ============================================================================
// Récupère l'historique des clôtures ajustées depuis Yahoo Finance
//
// CONCEPTS RUST :
// 1. async/await : requête HTTP non-bloquante (reqwest)
// 2. Serde : désérialisation JSON automatique
// 3. Option<Vec<Option<f64>>> : Yahoo renvoie des null pour les jours vides
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::api::{Bar, HistoryProvider};
use crate::error::ChartError;
use crate::models::Interval;

const PROVIDER_NAME: &str = "Yahoo Finance";

/// URL de base de l'endpoint chart v8
const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// User-Agent pour éviter le blocage par Yahoo
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// Structures pour parser la réponse JSON de Yahoo Finance
// ============================================================================
// Yahoo retourne un JSON complexe, on ne garde que ce dont on a besoin :
// timestamps, décalage horaire de la place, clôtures ajustées
//
// CONCEPT RUST : #[serde(default)]
// - Champ absent du JSON -> valeur par défaut (None, Vec vide)
// ============================================================================

/// Réponse complète de l'API Yahoo Finance
#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

/// Erreur renvoyée dans le corps JSON (symbole inconnu, dates invalides...)
#[derive(Debug, Deserialize)]
struct YahooError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Meta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

/// Métadonnées du ticker
#[derive(Debug, Deserialize)]
struct Meta {
    #[serde(default)]
    symbol: Option<String>,
    /// Décalage (secondes) entre UTC et l'heure de la place de cotation
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    adjclose: Option<Vec<Option<f64>>>,
}

// ============================================================================
// YahooProvider
// ============================================================================

/// Fournisseur Yahoo Finance basé sur reqwest
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: Url,
}

impl YahooProvider {
    /// Crée le fournisseur avec l'URL officielle
    pub fn new() -> Result<Self, ChartError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Crée le fournisseur avec une URL de base personnalisée
    pub fn with_base_url(base_url: &str) -> Result<Self, ChartError> {
        debug!("Creating HTTP client");
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                ChartError::provider(
                    PROVIDER_NAME,
                    format!("Échec de la création du client HTTP : {}", e),
                )
            })?;

        Self::with_client(client, base_url)
    }

    /// Crée le fournisseur avec un client HTTP déjà configuré
    ///
    /// # Erreurs
    /// * `ChartError::Provider` - l'URL n'est pas une URL http(s) valide
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ChartError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ChartError::provider(PROVIDER_NAME, format!("URL invalide '{}' : {}", base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(ChartError::provider(
                PROVIDER_NAME,
                format!("URL invalide '{}' : pas de chemin", base_url),
            ));
        }

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl HistoryProvider for YahooProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    /// CONCEPT RUST : #[instrument]
    /// - Ajoute un span avec symbol / start / end / interval
    /// - Tous les logs à l'intérieur portent ce contexte
    #[instrument(skip(self, interval), fields(interval = %interval))]
    async fn get_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<Bar>, ChartError> {
        let url = build_yahoo_url(&self.base_url, symbol, start, end, interval)?;
        debug!(url = %url, "Built Yahoo Finance API URL");

        debug!("Sending HTTP request to Yahoo Finance");
        let response = self.client.get(url).send().await.map_err(|e| {
            ChartError::provider(
                PROVIDER_NAME,
                format!("Échec de la requête HTTP vers Yahoo Finance : {}", e),
            )
        })?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        let body = response.text().await.map_err(|e| {
            ChartError::provider(
                PROVIDER_NAME,
                format!("Échec de la lecture de la réponse Yahoo : {}", e),
            )
        })?;

        // Yahoo renvoie souvent un JSON d'erreur avec un statut 4xx :
        // on préfère son message au simple code HTTP
        if !status.is_success() {
            error!(status = %status, "Yahoo Finance returned error status");
            let detail = serde_json::from_str::<YahooResponse>(&body)
                .ok()
                .and_then(|r| r.chart.error)
                .map(|e| describe_error(&e))
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(ChartError::provider(PROVIDER_NAME, detail));
        }

        let bars = parse_history_body(&body, symbol)?;
        info!(bars = bars.len(), "Successfully fetched history");
        Ok(bars)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Construit l'URL de l'API Yahoo Finance
///
/// La plage est fermée : period2 pointe sur le lendemain de `end` à minuit UTC,
/// pour inclure la séance du jour de fin.
///
/// CONCEPT RUST : reqwest::Url
/// - Le symbole est ajouté comme segment de chemin, donc échappé
///   ("BRK/B" ne crée pas de sous-chemin, "#" ne coupe pas l'URL)
/// - query_pairs_mut encode les paramètres
fn build_yahoo_url(
    base_url: &Url,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    interval: Interval,
) -> Result<Url, ChartError> {
    let period1 = midnight_utc(start);
    let period2 = end
        .checked_add_days(Days::new(1))
        .map(midnight_utc)
        .unwrap_or_else(|| midnight_utc(end));

    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| ChartError::provider(PROVIDER_NAME, format!("URL invalide '{}' : pas de chemin", base_url)))?
        .pop_if_empty()
        .push(symbol);

    url.query_pairs_mut()
        .append_pair("interval", interval.as_yahoo_str())
        .append_pair("period1", &period1.to_string())
        .append_pair("period2", &period2.to_string())
        .append_pair("events", "div,splits");

    Ok(url)
}

/// Timestamp Unix de la date à 00:00 UTC
fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::default()).and_utc().timestamp()
}

fn describe_error(err: &YahooError) -> String {
    match (&err.code, &err.description) {
        (Some(code), Some(description)) => format!("{}: {}", code, description),
        (None, Some(description)) => description.clone(),
        (Some(code), None) => code.clone(),
        (None, None) => "unknown error".to_string(),
    }
}

/// Parse le corps JSON et le convertit en barres
fn parse_history_body(body: &str, symbol: &str) -> Result<Vec<Bar>, ChartError> {
    debug!("Parsing JSON response");
    let response: YahooResponse = serde_json::from_str(body).map_err(|e| {
        ChartError::provider(
            PROVIDER_NAME,
            format!("Échec du parsing JSON de la réponse Yahoo : {}", e),
        )
    })?;

    parse_yahoo_response(response, symbol)
}

/// Convertit la réponse Yahoo en barres (ordre du fournisseur conservé)
///
/// CONCEPT RUST : Ownership
/// - yahoo_response est "moved", on consomme ses Vec sans copie
fn parse_yahoo_response(yahoo_response: YahooResponse, symbol: &str) -> Result<Vec<Bar>, ChartError> {
    if let Some(err) = yahoo_response.chart.error {
        error!(error = ?err, "Yahoo Finance returned an error payload");
        return Err(ChartError::provider(PROVIDER_NAME, describe_error(&err)));
    }

    // Pas de résultat du tout : Yahoo n'a rien pour ce symbole / cette période
    let result = match yahoo_response.chart.result.and_then(|r| r.into_iter().next()) {
        Some(result) => result,
        None => {
            warn!(symbol = %symbol, "Yahoo Finance returned no chart result");
            return Ok(Vec::new());
        }
    };

    if let Some(returned) = result.meta.symbol.as_deref() {
        if !returned.eq_ignore_ascii_case(symbol) {
            warn!(requested = %symbol, returned = %returned, "Yahoo returned a different symbol");
        }
    }

    let timestamps = result.timestamp.unwrap_or_default();
    let gmtoffset = result.meta.gmtoffset;
    debug!(timestamp_count = timestamps.len(), gmtoffset, "Received timestamps from Yahoo");

    // Clôture ajustée si présente, sinon clôture brute (ex: intervalles sans adjclose)
    let closes = match result.indicators.adjclose.into_iter().next().and_then(|a| a.adjclose) {
        Some(adjclose) => adjclose,
        None => {
            debug!("No adjclose block, falling back to raw close");
            result
                .indicators
                .quote
                .into_iter()
                .next()
                .and_then(|q| q.close)
                .unwrap_or_default()
        }
    };

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped_count = 0;
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let adj_close = match closes.get(i).and_then(|&v| v) {
            Some(v) => v,
            None => {
                skipped_count += 1;
                continue;
            }
        };

        // Date dans le fuseau de la place, pas en UTC
        let date = DateTime::from_timestamp(timestamp + gmtoffset, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| {
                ChartError::provider(PROVIDER_NAME, format!("Timestamp invalide : {}", timestamp))
            })?;

        bars.push(Bar { date, adj_close });
    }

    if skipped_count > 0 {
        warn!(
            skipped = skipped_count,
            total = timestamps.len(),
            "Skipped bars with missing close"
        );
    }

    debug!(parsed = bars.len(), total = timestamps.len(), "Finished parsing history");
    Ok(bars)
}

// ============================================================================
// Tests unitaires
// ============================================================================
