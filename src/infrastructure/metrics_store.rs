//! Aggregations over the claims and member-month fact tables
//!
//! Member-months are distinct `(PERSON_ID, YEAR_MONTH)` pairs and are never
//! narrowed by claim filters; they also drive the per-month trend rows and the
//! population profile. Filter values and month keys are always bound
//! as parameters; only [`FilterColumn`] expressions appear in SQL text.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::cmp::Ordering;
use tracing::{debug, info, instrument};

use crate::domain::metrics::constants::labels;
use crate::domain::{
    BreakdownRow, FilterColumn, FilterSet, MemberMonthTotals, MonthlyMetrics, PopulationTotals,
    YearMonthKey,
};
use crate::infrastructure::log_messages;
use crate::{Error, Result};

/// Read access to the aggregates behind the dashboard
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Paid amount, distinct encounters and member-months for `start..=end`
    async fn totals(
        &self,
        start: YearMonthKey,
        end: YearMonthKey,
        filters: &FilterSet,
    ) -> Result<MemberMonthTotals>;

    /// Per-month totals for every month with enrolled members, in month order
    ///
    /// Months whose claims are all filtered out still appear, with zero
    /// paid and zero encounters.
    async fn monthly(&self, filters: &FilterSet) -> Result<Vec<MonthlyMetrics>>;

    /// PMPM by dimension value over `start..=end`, highest first
    ///
    /// `filters` narrow the claims being split, so an encounter group filter
    /// drills the encounter type breakdown down to that group.
    async fn breakdown(
        &self,
        dimension: FilterColumn,
        start: YearMonthKey,
        end: YearMonthKey,
        filters: &FilterSet,
    ) -> Result<Vec<BreakdownRow>>;

    /// Enrollment, age, sex and risk aggregates for `start..=end`
    async fn demographics(
        &self,
        start: YearMonthKey,
        end: YearMonthKey,
    ) -> Result<PopulationTotals>;

    /// One normalized risk score per scored member-month in `start..=end`, ascending
    async fn risk_scores(&self, start: YearMonthKey, end: YearMonthKey) -> Result<Vec<f64>>;
}

const CLAIMS_FROM: &str = "FROM FACT_CLAIMS clm \
     LEFT JOIN DIM_ENCOUNTER_GROUP grp ON clm.ENCOUNTER_GROUP_SK = grp.ENCOUNTER_GROUP_SK \
     LEFT JOIN DIM_ENCOUNTER_TYPE typ ON clm.ENCOUNTER_TYPE_SK = typ.ENCOUNTER_TYPE_SK";

const MEMBER_MONTHS_QUERY: &str = "SELECT COUNT(DISTINCT PERSON_ID || '-' || YEAR_MONTH) AS member_months \
     FROM FACT_MEMBER_MONTHS \
     WHERE YEAR_MONTH BETWEEN ? AND ?";

/// Distinct member-months in the range, one risk score each
const MEMBER_MONTH_ROWS: &str = "SELECT PERSON_ID, YEAR_MONTH, MAX(NORMALIZED_RISK_SCORE) AS risk_score \
     FROM FACT_MEMBER_MONTHS \
     WHERE YEAR_MONTH BETWEEN ? AND ? \
     GROUP BY PERSON_ID, YEAR_MONTH";

const SCHEMA: [&str; 7] = [
    "CREATE TABLE IF NOT EXISTS FACT_CLAIMS (
        ENCOUNTER_ID TEXT,
        ENCOUNTER_GROUP_SK INTEGER,
        ENCOUNTER_TYPE_SK INTEGER,
        PRIMARY_DIAGNOSIS_CODE TEXT,
        PRIMARY_DIAGNOSIS_DESCRIPTION TEXT,
        CCSR_PARENT_CATEGORY TEXT,
        CCSR_CATEGORY TEXT,
        CCSR_CATEGORY_DESCRIPTION TEXT,
        PERSON_ID TEXT,
        YEAR_MONTH INTEGER NOT NULL,
        SERVICE_CATEGORY_SK INTEGER,
        CLAIM_ID TEXT,
        CLAIM_TYPE TEXT,
        PAID_AMOUNT REAL
    )",
    "CREATE TABLE IF NOT EXISTS FACT_MEMBER_MONTHS (
        PERSON_ID TEXT NOT NULL,
        YEAR_NBR INTEGER,
        YEAR_MONTH INTEGER NOT NULL,
        MEMBER_MONTHS REAL,
        TOTAL_YEAR_MONTHS INTEGER,
        MONTHALLOCATIONFACTOR REAL,
        DATA_SOURCE TEXT,
        PATIENT_SOURCE_KEY TEXT,
        PAYER TEXT,
        PLAN TEXT,
        NORMALIZED_RISK_SCORE REAL,
        POPULATION_NORMALIZED_RISK_SCORE REAL
    )",
    "CREATE TABLE IF NOT EXISTS DIM_MEMBER (
        PERSON_ID TEXT PRIMARY KEY,
        SEX TEXT,
        AGE INTEGER,
        RACE TEXT,
        STATE TEXT
    )",
    "CREATE TABLE IF NOT EXISTS DIM_ENCOUNTER_GROUP (
        ENCOUNTER_GROUP TEXT,
        ENCOUNTER_GROUP_SK INTEGER PRIMARY KEY
    )",
    "CREATE TABLE IF NOT EXISTS DIM_ENCOUNTER_TYPE (
        ENCOUNTER_TYPE TEXT,
        ENCOUNTER_TYPE_SK INTEGER PRIMARY KEY,
        ENCOUNTER_GROUP_SK INTEGER
    )",
    "CREATE INDEX IF NOT EXISTS IDX_FACT_CLAIMS_YEAR_MONTH ON FACT_CLAIMS (YEAR_MONTH)",
    "CREATE INDEX IF NOT EXISTS IDX_FACT_MEMBER_MONTHS_YEAR_MONTH ON FACT_MEMBER_MONTHS (YEAR_MONTH)",
];

/// [`MetricsStore`] over a SQLite copy of the fact tables
#[derive(Debug, Clone)]
pub struct SqliteMetricsStore {
    pool: SqlitePool,
}

impl SqliteMetricsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the fact and dimension tables if they do not exist
    #[instrument(skip(self))]
    pub async fn create_schema(&self) -> Result<()> {
        info!("{}", log_messages::database::SCHEMA_STARTED);
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("{}", log_messages::database::SCHEMA_COMPLETED);
        Ok(())
    }

    async fn member_months(&self, start: YearMonthKey, end: YearMonthKey) -> Result<u64> {
        let row = sqlx::query(MEMBER_MONTHS_QUERY)
            .bind(start.value())
            .bind(end.value())
            .fetch_one(&self.pool)
            .await?;
        count(&row, "member_months")
    }
}

#[async_trait]
impl MetricsStore for SqliteMetricsStore {
    #[instrument(skip(self, filters), fields(start = %start, end = %end, filters = filters.len()))]
    async fn totals(
        &self,
        start: YearMonthKey,
        end: YearMonthKey,
        filters: &FilterSet,
    ) -> Result<MemberMonthTotals> {
        let sql = format!(
            "SELECT CAST(COALESCE(SUM(clm.PAID_AMOUNT), 0) AS REAL) AS paid, \
             COUNT(DISTINCT clm.ENCOUNTER_ID) AS encounters \
             {CLAIMS_FROM} \
             WHERE clm.YEAR_MONTH BETWEEN ? AND ?{}",
            filters.sql_conditions()
        );

        let mut query = sqlx::query(&sql).bind(start.value()).bind(end.value());
        for (_, value) in filters.iter() {
            query = query.bind(value.to_string());
        }
        let row = query.fetch_one(&self.pool).await?;

        let totals = MemberMonthTotals::new(
            row.try_get("paid")?,
            count(&row, "encounters")?,
            self.member_months(start, end).await?,
        );
        debug!(?totals, "{}", log_messages::store::TOTALS_QUERIED);
        Ok(totals)
    }

    #[instrument(skip(self, filters), fields(filters = filters.len()))]
    async fn monthly(&self, filters: &FilterSet) -> Result<Vec<MonthlyMetrics>> {
        let sql = format!(
            "WITH members AS ( \
                 SELECT YEAR_MONTH AS year_month, COUNT(DISTINCT PERSON_ID) AS members \
                 FROM FACT_MEMBER_MONTHS \
                 GROUP BY YEAR_MONTH \
             ), \
             claims AS ( \
                 SELECT clm.YEAR_MONTH AS year_month, \
                        SUM(clm.PAID_AMOUNT) AS paid, \
                        COUNT(DISTINCT clm.ENCOUNTER_ID) AS encounters \
                 {CLAIMS_FROM} \
                 WHERE 1 = 1{} \
                 GROUP BY clm.YEAR_MONTH \
             ) \
             SELECT members.year_month, members.members, \
                    COALESCE(claims.encounters, 0) AS encounters, \
                    CAST(COALESCE(claims.paid, 0) AS REAL) AS paid \
             FROM members \
             LEFT JOIN claims ON members.year_month = claims.year_month \
             ORDER BY members.year_month",
            filters.sql_conditions()
        );

        let mut query = sqlx::query(&sql);
        for (_, value) in filters.iter() {
            query = query.bind(value.to_string());
        }
        let rows = query.fetch_all(&self.pool).await?;

        let metrics = rows
            .iter()
            .map(|row| -> Result<MonthlyMetrics> {
                Ok(MonthlyMetrics {
                    month: YearMonthKey::try_new(row.try_get("year_month")?)?,
                    members: count(row, "members")?,
                    encounters: count(row, "encounters")?,
                    paid: row.try_get("paid")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(months = metrics.len(), "{}", log_messages::store::MONTHLY_QUERIED);
        Ok(metrics)
    }

    #[instrument(
        skip(self, filters),
        fields(dimension = %dimension, start = %start, end = %end, filters = filters.len())
    )]
    async fn breakdown(
        &self,
        dimension: FilterColumn,
        start: YearMonthKey,
        end: YearMonthKey,
        filters: &FilterSet,
    ) -> Result<Vec<BreakdownRow>> {
        let sql = format!(
            "SELECT COALESCE({column}, ?) AS category, \
             CAST(COALESCE(SUM(clm.PAID_AMOUNT), 0) AS REAL) AS total_paid \
             {CLAIMS_FROM} \
             WHERE clm.YEAR_MONTH BETWEEN ? AND ?{conditions} \
             GROUP BY category",
            column = dimension.sql_column(),
            conditions = filters.sql_conditions()
        );

        let mut query = sqlx::query(&sql)
            .bind(labels::UNCATEGORIZED)
            .bind(start.value())
            .bind(end.value());
        for (_, value) in filters.iter() {
            query = query.bind(value.to_string());
        }
        let rows = query.fetch_all(&self.pool).await?;
        let member_months = self.member_months(start, end).await?;

        let mut breakdown = rows
            .iter()
            .map(|row| -> Result<BreakdownRow> {
                Ok(BreakdownRow::new(
                    row.try_get::<String, _>("category")?,
                    row.try_get("total_paid")?,
                    member_months,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        breakdown.sort_by(|a, b| match b.pmpm.total_cmp(&a.pmpm) {
            Ordering::Equal => a.category.cmp(&b.category),
            other => other,
        });

        debug!(categories = breakdown.len(), "{}", log_messages::store::BREAKDOWN_QUERIED);
        Ok(breakdown)
    }

    #[instrument(skip(self), fields(start = %start, end = %end))]
    async fn demographics(
        &self,
        start: YearMonthKey,
        end: YearMonthKey,
    ) -> Result<PopulationTotals> {
        let sql = format!(
            "WITH member_months AS ({MEMBER_MONTH_ROWS}) \
             SELECT COUNT(*) AS member_months, \
                    COUNT(DISTINCT mm.YEAR_MONTH) AS months, \
                    COALESCE(SUM(CASE WHEN LOWER(dm.SEX) = 'female' THEN 1 ELSE 0 END), 0) \
                        AS female_member_months, \
                    CAST(COALESCE(SUM(dm.AGE), 0) AS REAL) AS age_total, \
                    COUNT(dm.AGE) AS aged_member_months, \
                    CAST(COALESCE(SUM(mm.risk_score), 0) AS REAL) AS risk_total, \
                    COUNT(mm.risk_score) AS scored_member_months \
             FROM member_months mm \
             LEFT JOIN DIM_MEMBER dm ON mm.PERSON_ID = dm.PERSON_ID"
        );

        let row = sqlx::query(&sql)
            .bind(start.value())
            .bind(end.value())
            .fetch_one(&self.pool)
            .await?;

        let totals = PopulationTotals {
            member_months: count(&row, "member_months")?,
            months: count(&row, "months")?,
            female_member_months: count(&row, "female_member_months")?,
            age_total: row.try_get("age_total")?,
            aged_member_months: count(&row, "aged_member_months")?,
            risk_total: row.try_get("risk_total")?,
            scored_member_months: count(&row, "scored_member_months")?,
        };
        debug!(?totals, "{}", log_messages::store::DEMOGRAPHICS_QUERIED);
        Ok(totals)
    }

    #[instrument(skip(self), fields(start = %start, end = %end))]
    async fn risk_scores(&self, start: YearMonthKey, end: YearMonthKey) -> Result<Vec<f64>> {
        let sql = format!(
            "WITH member_months AS ({MEMBER_MONTH_ROWS}) \
             SELECT CAST(risk_score AS REAL) AS risk_score \
             FROM member_months \
             WHERE risk_score IS NOT NULL \
             ORDER BY risk_score"
        );

        let rows = sqlx::query(&sql)
            .bind(start.value())
            .bind(end.value())
            .fetch_all(&self.pool)
            .await?;
        let scores = rows
            .iter()
            .map(|row| -> Result<f64> { Ok(row.try_get("risk_score")?) })
            .collect::<Result<Vec<_>>>()?;

        debug!(scores = scores.len(), "{}", log_messages::store::RISK_SCORES_QUERIED);
        Ok(scores)
    }
}

fn count(row: &SqliteRow, column: &str) -> Result<u64> {
    let raw: i64 = row.try_get(column)?;
    u64::try_from(raw).map_err(|_| Error::invalid_input(column, format!("negative count {raw}")))
}
