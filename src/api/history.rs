// ============================================================================
// Fetcher : barres du fournisseur -> ChartSeries
// ============================================================================

use tracing::{debug, error, info, instrument};

use crate::api::HistoryProvider;
use crate::error::ChartError;
use crate::models::{ChartPoint, ChartRequest, ChartSeries};

/// Récupère l'historique demandé et le convertit en série de points
///
/// Chaque barre devient un point (clôture ajustée arrondie à 2 décimales,
/// label month/day/year), dans l'ordre renvoyé par le fournisseur.
///
/// # Erreurs
/// * `ChartError::Provider` - erreur du fournisseur, propagée telle quelle
/// * `ChartError::EmptyResult` - le fournisseur n'a renvoyé aucune barre
#[instrument(skip(provider, request), fields(provider = provider.name(), symbol = %request.symbol))]
pub async fn fetch_chart_series<P>(provider: &P, request: &ChartRequest) -> Result<ChartSeries, ChartError>
where
    P: HistoryProvider + ?Sized,
{
    debug!(start = %request.start, end = %request.end, interval = %request.interval, "Fetching history");

    let bars = provider
        .get_history(&request.symbol, request.start, request.end, request.interval)
        .await?;

    if bars.is_empty() {
        error!("Provider returned no bars");
        return Err(ChartError::EmptyResult {
            symbol: request.symbol.clone(),
        });
    }

    let mut series = ChartSeries::new(request.symbol.clone());
    for bar in &bars {
        series.push(ChartPoint::from_bar(bar)?);
    }

    info!(points = series.len(), "Chart series ready");
    Ok(series)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::Bar;
    use crate::models::Interval;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Faux fournisseur : renvoie des barres fixes et mémorise les appels
    struct FakeProvider {
        bars: Result<Vec<Bar>, String>,
        calls: Mutex<Vec<(String, NaiveDate, NaiveDate, Interval)>>,
    }

    impl FakeProvider {
        fn with_bars(bars: Vec<Bar>) -> Self {
            Self {
                bars: Ok(bars),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                bars: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HistoryProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        async fn get_history(
            &self,
            symbol: &str,
            start: NaiveDate,
            end: NaiveDate,
            interval: Interval,
        ) -> Result<Vec<Bar>, ChartError> {
            self.calls
                .lock()
                .unwrap()
                .push((symbol.to_string(), start, end, interval));
            self.bars
                .clone()
                .map_err(|message| ChartError::provider("fake", message))
        }
    }

    fn five_daily_bars() -> Vec<Bar> {
        [
            (date(2017, 6, 14), 115.00),
            (date(2017, 6, 15), 116.25),
            (date(2017, 6, 16), 114.80),
            (date(2017, 6, 19), 117.10),
            (date(2017, 6, 20), 118.00),
        ]
        .into_iter()
        .map(|(date, adj_close)| Bar { date, adj_close })
        .collect()
    }

    #[tokio::test]
    async fn test_fetch_maps_every_bar_in_order() {
        let provider = FakeProvider::with_bars(five_daily_bars());
        let request = ChartRequest::new("AAPL", date(2016, 12, 1), date(2017, 6, 20), Interval::Daily).unwrap();

        let series = fetch_chart_series(&provider, &request).await.unwrap();

        assert_eq!(series.symbol, "AAPL");
        assert_eq!(series.len(), 5);
        assert_eq!(
            series.points.iter().map(|p| p.close_price).collect::<Vec<_>>(),
            vec![
                Decimal::new(11500, 2),
                Decimal::new(11625, 2),
                Decimal::new(11480, 2),
                Decimal::new(11710, 2),
                Decimal::new(11800, 2),
            ]
        );
        assert_eq!(
            series.labels(),
            vec!["6/14/2017", "6/15/2017", "6/16/2017", "6/19/2017", "6/20/2017"]
        );

        // La requête est transmise telle quelle au fournisseur
        let calls = provider.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![("AAPL".to_string(), date(2016, 12, 1), date(2017, 6, 20), Interval::Daily)]
        );
    }

    #[tokio::test]
    async fn test_fetch_keeps_provider_order() {
        // Pas de tri : l'ordre du fournisseur fait foi
        let mut bars = five_daily_bars();
        bars.reverse();
        let provider = FakeProvider::with_bars(bars);
        let request = ChartRequest::with_defaults("AAPL").unwrap();

        let series = fetch_chart_series(&provider, &request).await.unwrap();
        assert_eq!(series.first().unwrap().label(), "6/20/2017");
        assert_eq!(series.last().unwrap().label(), "6/14/2017");
    }

    #[tokio::test]
    async fn test_fetch_empty_result() {
        let provider = FakeProvider::with_bars(Vec::new());
        let request = ChartRequest::with_defaults("AAPL").unwrap();

        let err = fetch_chart_series(&provider, &request).await.unwrap_err();
        assert!(matches!(err, ChartError::EmptyResult { ref symbol } if symbol == "AAPL"));
    }

    #[tokio::test]
    async fn test_fetch_propagates_provider_error() {
        let provider = FakeProvider::failing("HTTP 429 Too Many Requests");
        let request = ChartRequest::with_defaults("AAPL").unwrap();

        let err = fetch_chart_series(&provider, &request).await.unwrap_err();
        assert_eq!(err.to_string(), "provider error (fake): HTTP 429 Too Many Requests");
        // Une seule tentative, pas de relance
        assert_eq!(provider.calls.lock().unwrap().len(), 1);
    }
}
