//! Dashboard orchestration: resolve the comparison range, query both
//! periods, and derive KPI comparisons and trend series.

use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::application::cache::QueryCache;
use crate::config::CacheCapacity;
use crate::domain::{
    resolve_comparison_range, BreakdownRow, ComparisonStrategy, DateRange, DemographicSummary,
    FilterColumn, FilterSet, KpiComparison, KpiKind, MemberMonthTotals, MonthlyMetrics,
    RiskDistribution, TrendSeries, YearMonthKey,
};
use crate::infrastructure::log_messages::dashboard as messages;
use crate::infrastructure::MetricsStore;
use crate::Result;

type TotalsKey = (YearMonthKey, YearMonthKey, FilterSet);

/// Totals for a primary range and the range it is compared against
struct PeriodTotals {
    comparison_range: DateRange,
    primary: MemberMonthTotals,
    comparison: MemberMonthTotals,
}

/// KPI queries for the dashboard, backed by a [`MetricsStore`]
pub struct DashboardService<S> {
    store: Arc<S>,
    totals_cache: QueryCache<TotalsKey, MemberMonthTotals>,
    monthly_cache: QueryCache<FilterSet, Arc<Vec<MonthlyMetrics>>>,
}

impl<S: MetricsStore> DashboardService<S> {
    pub fn new(store: Arc<S>, capacity: CacheCapacity) -> Self {
        Self {
            store,
            totals_cache: QueryCache::new(capacity),
            monthly_cache: QueryCache::new(capacity),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// One KPI for `range` against the range `strategy` selects
    #[instrument(skip(self, filters), fields(range = %range, strategy = %strategy, kind = %kind))]
    pub async fn kpi_comparison(
        &self,
        range: &DateRange,
        strategy: ComparisonStrategy,
        kind: KpiKind,
        filters: &FilterSet,
    ) -> Result<KpiComparison> {
        let totals = self.period_totals(range, strategy, filters).await?;
        Ok(Self::compare(kind, strategy, range, &totals))
    }

    /// All three KPIs from a single pair of store queries
    #[instrument(skip(self, filters), fields(range = %range, strategy = %strategy))]
    pub async fn kpi_summary(
        &self,
        range: &DateRange,
        strategy: ComparisonStrategy,
        filters: &FilterSet,
    ) -> Result<Vec<KpiComparison>> {
        let totals = self.period_totals(range, strategy, filters).await?;
        Ok(KpiKind::ALL
            .into_iter()
            .map(|kind| Self::compare(kind, strategy, range, &totals))
            .collect())
    }

    /// Monthly KPI values over the months of `range` with the comparison line
    #[instrument(skip(self, filters), fields(range = %range, strategy = %strategy, kind = %kind))]
    pub async fn trend(
        &self,
        range: &DateRange,
        strategy: ComparisonStrategy,
        kind: KpiKind,
        filters: &FilterSet,
    ) -> Result<TrendSeries> {
        if !strategy.is_known() {
            warn!("{}", messages::UNKNOWN_STRATEGY);
        }
        let rows = self.monthly(filters).await?;
        Ok(TrendSeries::build(&rows, &range.months(), strategy, kind))
    }

    /// PMPM by encounter group, encounter type or CCSR category, over the
    /// claims left after `filters`
    #[instrument(skip(self, filters), fields(range = %range, dimension = %dimension))]
    pub async fn breakdown(
        &self,
        dimension: FilterColumn,
        range: &DateRange,
        filters: &FilterSet,
    ) -> Result<Vec<BreakdownRow>> {
        let (start, end) = range.key_bounds();
        self.store.breakdown(dimension, start, end, filters).await
    }

    /// Member-months, age, sex and average risk of the population in `range`
    #[instrument(skip(self), fields(range = %range))]
    pub async fn demographics(&self, range: &DateRange) -> Result<DemographicSummary> {
        let (start, end) = range.key_bounds();
        Ok(self.store.demographics(start, end).await?.summary())
    }

    /// Box-plot summary of risk scores in `range`; `None` when nobody is scored
    #[instrument(skip(self), fields(range = %range))]
    pub async fn risk_distribution(
        &self,
        range: &DateRange,
    ) -> Result<Option<RiskDistribution>> {
        let (start, end) = range.key_bounds();
        let scores = self.store.risk_scores(start, end).await?;
        Ok(RiskDistribution::from_scores(scores))
    }

    /// Drop every cached query result
    pub fn invalidate(&self) {
        self.totals_cache.clear();
        self.monthly_cache.clear();
        debug!("{}", messages::CACHE_INVALIDATED);
    }

    fn compare(
        kind: KpiKind,
        strategy: ComparisonStrategy,
        range: &DateRange,
        totals: &PeriodTotals,
    ) -> KpiComparison {
        KpiComparison::from_totals(
            kind,
            strategy,
            *range,
            totals.comparison_range,
            &totals.primary,
            &totals.comparison,
        )
    }

    async fn period_totals(
        &self,
        range: &DateRange,
        strategy: ComparisonStrategy,
        filters: &FilterSet,
    ) -> Result<PeriodTotals> {
        if !strategy.is_known() {
            warn!("{}", messages::UNKNOWN_STRATEGY);
        }
        let comparison_range = resolve_comparison_range(range, strategy);
        debug!(comparison = %comparison_range, "{}", messages::COMPARISON_RESOLVED);

        if comparison_range == *range {
            let primary = self.totals(range, filters).await?;
            return Ok(PeriodTotals {
                comparison_range,
                primary,
                comparison: primary,
            });
        }

        let (primary, comparison) = tokio::try_join!(
            self.totals(range, filters),
            self.totals(&comparison_range, filters)
        )?;
        Ok(PeriodTotals {
            comparison_range,
            primary,
            comparison,
        })
    }

    async fn totals(&self, range: &DateRange, filters: &FilterSet) -> Result<MemberMonthTotals> {
        let (start, end) = range.key_bounds();
        let key = (start, end, filters.clone());
        if let Some(totals) = self.totals_cache.get(&key) {
            debug!(%start, %end, "{}", messages::CACHE_HIT);
            return Ok(totals);
        }

        debug!(%start, %end, "{}", messages::CACHE_MISS);
        let totals = self.store.totals(start, end, filters).await?;
        self.totals_cache.insert(key, totals);
        Ok(totals)
    }

    async fn monthly(&self, filters: &FilterSet) -> Result<Arc<Vec<MonthlyMetrics>>> {
        if let Some(rows) = self.monthly_cache.get(filters) {
            debug!("{}", messages::CACHE_HIT);
            return Ok(rows);
        }

        debug!("{}", messages::CACHE_MISS);
        let rows = Arc::new(self.store.monthly(filters).await?);
        self.monthly_cache.insert(filters.clone(), Arc::clone(&rows));
        Ok(rows)
    }
}
