use crate::application::dashboard::DashboardService;
use crate::config::Settings;
use crate::domain::{
    BreakdownRow, ComparisonStrategy, DateRange, DemographicSummary, FilterColumn, FilterSet,
    KpiComparison, KpiKind, RiskDistribution, TrendSeries,
};
use crate::infrastructure::log_messages;
use crate::infrastructure::{Database, SqliteMetricsStore};
use crate::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// PMPM by one dimension over the primary range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionBreakdown {
    pub dimension: FilterColumn,
    pub rows: Vec<BreakdownRow>,
}

/// Everything the dashboard shows for one date range and comparison choice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub range: DateRange,
    pub strategy: ComparisonStrategy,
    pub comparison_range: DateRange,
    pub kpis: Vec<KpiComparison>,
    pub trends: Vec<TrendSeries>,
    pub breakdowns: Vec<DimensionBreakdown>,
    pub demographics: DemographicSummary,
    pub risk_distribution: Option<RiskDistribution>,
}

/// Main application struct that coordinates all components
pub struct Application {
    settings: Settings,
    database: Database,
    dashboard: DashboardService<SqliteMetricsStore>,
}

impl Application {
    #[instrument]
    pub async fn new() -> Result<Self> {
        let settings = Settings::new()?;
        info!("{}", log_messages::application::SETTINGS_LOADED);
        Self::from_settings(settings).await
    }

    /// Open the configured database and make sure the fact tables exist
    #[instrument(skip(settings), fields(environment = %settings.application.environment))]
    pub async fn from_settings(settings: Settings) -> Result<Self> {
        let database = Database::connect(&settings.database).await?;
        database.health_check().await?;

        let store = SqliteMetricsStore::new(database.pool().clone());
        store.create_schema().await?;

        let dashboard = DashboardService::new(Arc::new(store), settings.cache.capacity);
        Ok(Self {
            settings,
            database,
            dashboard,
        })
    }

    /// Build the report for the configured range and comparison period
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<DashboardReport> {
        let report = &self.settings.report;
        info!(
            start = %report.start_date,
            end = %report.end_date,
            comparison = %report.comparison_period,
            "{}",
            log_messages::application::STARTING
        );

        let range = DateRange::parse_iso(&report.start_date, &report.end_date)?;
        let strategy = ComparisonStrategy::from_label(&report.comparison_period);
        let report = self.report(&range, strategy, &FilterSet::new()).await?;

        info!(kpis = report.kpis.len(), "{}", log_messages::application::REPORT_COMPLETED);
        Ok(report)
    }

    /// KPI cards, trend charts, breakdowns and the population profile for
    /// `range`. Filters narrow claims only; the population is unfiltered.
    pub async fn report(
        &self,
        range: &DateRange,
        strategy: ComparisonStrategy,
        filters: &FilterSet,
    ) -> Result<DashboardReport> {
        let kpis = self.dashboard.kpi_summary(range, strategy, filters).await?;

        let mut trends = Vec::with_capacity(KpiKind::ALL.len());
        for kind in KpiKind::ALL {
            trends.push(self.dashboard.trend(range, strategy, kind, filters).await?);
        }

        let mut breakdowns = Vec::with_capacity(FilterColumn::ALL.len());
        for dimension in FilterColumn::ALL {
            breakdowns.push(DimensionBreakdown {
                dimension,
                rows: self.dashboard.breakdown(dimension, range, filters).await?,
            });
        }

        let (demographics, risk_distribution) = tokio::try_join!(
            self.dashboard.demographics(range),
            self.dashboard.risk_distribution(range)
        )?;

        let comparison_range = kpis
            .first()
            .map_or(*range, |kpi| kpi.comparison_range);

        Ok(DashboardReport {
            range: *range,
            strategy,
            comparison_range,
            kpis,
            trends,
            breakdowns,
            demographics,
            risk_distribution,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn dashboard(&self) -> &DashboardService<SqliteMetricsStore> {
        &self.dashboard
    }
}
