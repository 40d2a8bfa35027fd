use crate::error::EngineError;
use crate::report::{EventOutcome, EventReport, StudyReport, ZoomReport};
use analytics::{AnalyticsEngine, align, normalize, returns};
use analyzer::Recommender;
use configuration::{Config, ZoomPreset};
use core_types::{Event, EventWindow, NormalizedWindow, PriceTable, WindowConfig};
use risk::{MarketBeta, RiskModel};

/// An event whose raw window has been carved out and normalized, ready to be
/// sliced at any zoom.
#[derive(Debug, Clone)]
pub struct PreparedEvent {
    pub event: Event,
    pub raw: EventWindow,
    pub normalized: NormalizedWindow,
}

impl PreparedEvent {
    pub fn anchor(&self) -> chrono::NaiveDate {
        self.raw.anchor()
    }

    pub fn max_zoom(&self) -> u32 {
        self.raw.max_zoom()
    }
}

/// The central orchestrator for an event study.
///
/// All components are fixed at construction and never mutated, so one study can
/// serve any number of events and zoom changes.
pub struct EventStudy {
    window: WindowConfig,
    analytics: AnalyticsEngine,
    risk_model: Box<dyn RiskModel>,
    recommender: Recommender,
}

impl EventStudy {
    /// Creates a study measuring betas against `market_ticker`.
    pub fn new(
        tickers: &[String],
        market_ticker: &str,
        window: WindowConfig,
    ) -> Result<Self, EngineError> {
        let risk_model = Box::new(MarketBeta::new(market_ticker)?);
        Ok(Self::with_risk_model(tickers, market_ticker, window, risk_model))
    }

    /// Creates a study with a custom risk model.
    pub fn with_risk_model(
        tickers: &[String],
        market_ticker: &str,
        window: WindowConfig,
        risk_model: Box<dyn RiskModel>,
    ) -> Self {
        Self {
            window,
            analytics: AnalyticsEngine::new(tickers, market_ticker),
            risk_model,
            recommender: Recommender::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, EngineError> {
        Self::new(
            &config.study.tickers,
            &config.study.market_ticker,
            config.study.window(),
        )
    }

    pub fn market_ticker(&self) -> &str {
        self.analytics.market_ticker()
    }

    /// Snaps the event to a trading day, then builds and normalizes its window.
    pub fn prepare(&self, table: &PriceTable, event: &Event) -> Result<PreparedEvent, EngineError> {
        let raw = align(table, event, self.window)?;
        let normalized = normalize(&raw)?;
        tracing::debug!(
            event = %event.label,
            rows = raw.len(),
            max_zoom = raw.max_zoom(),
            "Event window prepared."
        );
        Ok(PreparedEvent {
            event: event.clone(),
            raw,
            normalized,
        })
    }

    /// Computes every metric, the summary and the recommendations for the
    /// `[-zoom, +zoom]` slice of a prepared event. `zoom` is clamped to the window.
    pub fn analyze_zoom(&self, prepared: &PreparedEvent, zoom: u32) -> ZoomReport {
        let effective = zoom.min(prepared.max_zoom());
        self.analyze(prepared, format!("±{zoom} days"), Some(zoom), effective)
    }

    /// Like [`analyze_zoom`](Self::analyze_zoom), for a named preset.
    pub fn analyze_preset(&self, prepared: &PreparedEvent, preset: &ZoomPreset) -> ZoomReport {
        let effective = preset.resolve(prepared.max_zoom());
        self.analyze(prepared, preset.label.clone(), preset.days, effective)
    }

    fn analyze(
        &self,
        prepared: &PreparedEvent,
        label: String,
        requested_zoom: Option<u32>,
        effective_zoom: u32,
    ) -> ZoomReport {
        let raw = prepared.raw.zoom(effective_zoom);
        let norm = prepared.normalized.zoom(effective_zoom);
        let mut notes = Vec::new();

        let returns = match returns::compute(&norm) {
            Ok(returns) => Some(returns),
            Err(e) => {
                tracing::warn!(%label, error = %e, "Returns skipped for this slice.");
                notes.push(format!("Returns: {e}."));
                None
            }
        };

        let betas = match self.risk_model.evaluate(&raw) {
            Ok(betas) => Some(betas),
            Err(e) => {
                tracing::warn!(%label, error = %e, "Beta skipped for this slice.");
                notes.push(format!("Beta: {e}."));
                None
            }
        };

        let (summary, recommendations) = match (&returns, &betas) {
            (Some(returns), Some(betas)) => {
                let summary = self.analytics.build_summary(returns, betas, &norm, &raw);
                for metric in &summary.skipped {
                    notes.push(format!(
                        "{metric}: insufficient post-event data; column left empty."
                    ));
                }
                for gap in &summary.gaps {
                    notes.push(format!(
                        "{}: {} could not be measured in this slice.",
                        gap.ticker, gap.metric
                    ));
                }
                let recommendations = self.recommender.recommend(&summary);
                (Some(summary), Some(recommendations))
            }
            _ => {
                notes.push(
                    "Summary and recommendations need both returns and betas; skipped."
                        .to_string(),
                );
                (None, None)
            }
        };

        ZoomReport {
            label,
            requested_zoom,
            effective_zoom,
            visible_rows: raw.len(),
            returns,
            betas,
            summary,
            recommendations,
            notes,
        }
    }

    /// Analyses every event at every preset.
    ///
    /// An event that cannot be prepared is reported as failed and the run moves
    /// on to the next one.
    pub fn run(&self, table: &PriceTable, events: &[Event], presets: &[ZoomPreset]) -> StudyReport {
        let mut report = StudyReport {
            market_ticker: self.market_ticker().to_string(),
            outcomes: Vec::with_capacity(events.len()),
        };

        for event in events {
            tracing::info!(event = %event.label, date = %event.date, "Analysing event.");
            let outcome = match self.prepare(table, event) {
                Ok(prepared) => {
                    let zooms = presets
                        .iter()
                        .map(|preset| self.analyze_preset(&prepared, preset))
                        .collect();
                    EventOutcome::Completed(EventReport {
                        event: event.clone(),
                        anchor: prepared.anchor(),
                        window_rows: prepared.raw.len(),
                        max_zoom: prepared.max_zoom(),
                        zooms,
                    })
                }
                Err(e) => {
                    tracing::warn!(event = %event.label, error = %e, "Event skipped.");
                    EventOutcome::Failed {
                        event: event.clone(),
                        error: e.to_string(),
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        tracing::info!(
            events = events.len(),
            failed = report.failed(),
            "Event study complete."
        );
        report
    }
}
