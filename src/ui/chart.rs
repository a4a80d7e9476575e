// ============================================================================
// Chart - Rendu du graphique ligne pour un ticker
// ============================================================================
// Affiche les clôtures ajustées dans un graphique ligne, dans le coin haut
// gauche du terminal, jusqu'à ce qu'une touche soit pressée.
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de données à afficher
// 3. Axis : configuration des axes X et Y
// ============================================================================

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use tracing::{debug, info, instrument};

use crate::error::ChartError;
use crate::models::ChartSeries;
use crate::ui::events::{is_redraw_event, is_stop_event, EventHandler};
use crate::ui::terminal::TerminalSession;

/// Hauteur fixe du graphique (en lignes)
pub const CHART_HEIGHT: u16 = 20;

// ============================================================================
// LineChartSpec : description complète du widget
// ============================================================================
// Séparer "quoi dessiner" de "comment le dessiner" permet de tester la
// taille, le titre et les couleurs sans terminal.
// ============================================================================

/// Paramètres du graphique calculés depuis une série
#[derive(Debug, Clone, PartialEq)]
pub struct LineChartSpec {
    /// Titre affiché dans la bordure
    pub title: String,

    /// Clôtures, une par point
    pub data: Vec<f64>,

    /// Labels de dates, un par point
    pub labels: Vec<String>,

    /// Position et taille du widget
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,

    /// Type de marqueur des points
    pub marker: Marker,

    /// Couleur des axes et de la bordure
    pub axes_color: Color,

    /// Style de la courbe
    pub line_style: Style,
}

impl LineChartSpec {
    /// Construit le widget pour `symbol` à partir d'une série non vide
    pub fn new(symbol: &str, series: &ChartSeries) -> Result<Self, ChartError> {
        let range = series
            .date_range_label()
            .ok_or_else(|| ChartError::EmptyResult {
                symbol: symbol.to_string(),
            })?;

        Ok(Self {
            title: chart_title(symbol, &range),
            data: series.closes(),
            labels: series.labels(),
            x: 0,
            y: 0,
            width: chart_width(series.len()),
            height: CHART_HEIGHT,
            marker: Marker::Dot,
            axes_color: Color::White,
            line_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        })
    }

    /// Zone du widget, bornée par la zone disponible
    pub fn area(&self, available: Rect) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height).intersection(available)
    }
}

/// Titre de la bordure : "  AAPL Daily Chart (1/3/2017 - 6/20/2017)  "
pub fn chart_title(symbol: &str, range: &str) -> String {
    format!("  {} Daily Chart ({})  ", symbol, range)
}

/// Largeur : une colonne par point + 10% (division entière)
pub fn chart_width(points: usize) -> u16 {
    u16::try_from(points + points / 10).unwrap_or(u16::MAX)
}

// ============================================================================
// Dessin
// ============================================================================

/// Dessine le graphique dans la frame
///
/// CONCEPT RUST : Iterator chaining
/// - .iter().enumerate().map() : transforme les clôtures en points (x, y)
pub fn draw_chart(frame: &mut Frame, spec: &LineChartSpec) {
    let area = spec.area(frame.size());
    if area.area() == 0 {
        return;
    }

    let points: Vec<(f64, f64)> = spec
        .data
        .iter()
        .enumerate()
        .map(|(i, &close)| (i as f64, close))
        .collect();

    let (y_min, y_max) = y_bounds(&spec.data);
    let x_max = points.len().saturating_sub(1).max(1) as f64;
    let axis_style = Style::default().fg(spec.axes_color);

    let datasets = vec![Dataset::default()
        .marker(spec.marker)
        .graph_type(GraphType::Line)
        .style(spec.line_style)
        .data(&points)];

    let x_axis = Axis::default()
        .style(axis_style)
        .bounds([0.0, x_max])
        .labels(x_labels(&spec.labels));

    let y_axis = Axis::default()
        .style(axis_style)
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format!("{:.2}", y_min)),
            Span::raw(format!("{:.2}", (y_min + y_max) / 2.0)),
            Span::raw(format!("{:.2}", y_max)),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(axis_style)
                .title(spec.title.as_str()),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Bornes Y avec une marge de 5% (au moins 1.0 si tous les prix sont égaux)
fn y_bounds(data: &[f64]) -> (f64, f64) {
    let (min, max) = data
        .iter()
        .fold((f64::MAX, f64::MIN), |(min, max), &y| (min.min(y), max.max(y)));

    if min > max {
        return (0.0, 1.0);
    }

    let margin = ((max - min) * 0.05).max(if max == min { 1.0 } else { 0.0 });
    ((min - margin).max(0.0), max + margin)
}

/// Labels de l'axe X : premier, milieu, dernier
fn x_labels(labels: &[String]) -> Vec<Span<'static>> {
    match labels {
        [] => Vec::new(),
        [only] => vec![Span::raw(only.clone())],
        [first, last] => vec![Span::raw(first.clone()), Span::raw(last.clone())],
        [first, .., last] => vec![
            Span::raw(first.clone()),
            Span::raw(labels[labels.len() / 2].clone()),
            Span::raw(last.clone()),
        ],
    }
}

// ============================================================================
// Renderer : session + dessin + attente d'une touche
// ============================================================================

/// Affiche le graphique et bloque jusqu'à ce qu'une touche soit pressée
///
/// Le terminal est restauré à la sortie, quelle qu'elle soit : la session
/// est relâchée par son Drop (retour normal, `?`, panic).
///
/// # Erreurs
/// * `ChartError::EmptyResult` - série vide (aucun terminal acquis)
/// * `ChartError::DisplayInit` - terminal indisponible
/// * `ChartError::Display` - erreur d'E/S pendant le dessin ou la lecture
#[instrument(skip(series), fields(points = series.len()))]
pub fn render(symbol: &str, series: &ChartSeries) -> Result<(), ChartError> {
    let spec = LineChartSpec::new(symbol, series)?;
    debug!(width = spec.width, height = spec.height, title = %spec.title, "Chart widget built");

    let mut session = TerminalSession::acquire()?;
    let events = EventHandler::new();

    session.draw(|frame| draw_chart(frame, &spec))?;

    info!("Chart rendered, waiting for a key press");
    loop {
        let event = events.next()?;
        if is_stop_event(&event) {
            debug!("Key pressed, stopping event loop");
            break;
        }
        if is_redraw_event(&event) {
            session.draw(|frame| draw_chart(frame, &spec))?;
        }
    }

    Ok(())
}

// ============================================================================
// Tests unitaires
// ============================================================================
