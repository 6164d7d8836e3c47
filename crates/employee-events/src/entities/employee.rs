use super::table::{QueryPlan, EMPLOYEE_TABLE};
use super::{options_from_rows, EntityKind, EntityOption, EntityQuery};
use crate::config::ConfigError;
use crate::store::{QueryError, QueryExecutor};

const EMPLOYEE_FEATURES_SQL: &str = "
    SELECT SUM(positive_events) AS positive_events,
           SUM(negative_events) AS negative_events
    FROM employee
    JOIN employee_events USING (employee_id)
    WHERE employee.employee_id = ?1";

/// Queries scoped to a single employee.
#[derive(Debug, Clone)]
pub struct Employee {
    executor: QueryExecutor,
    plan: QueryPlan,
}

impl Employee {
    pub fn new(executor: QueryExecutor) -> Result<Self, ConfigError> {
        Ok(Self {
            executor,
            plan: EMPLOYEE_TABLE.plan()?,
        })
    }
}

impl EntityQuery for Employee {
    fn kind(&self) -> EntityKind {
        EntityKind::Employee
    }

    fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    fn list(&self) -> Result<Vec<EntityOption>, QueryError> {
        options_from_rows(self.executor.query(&self.plan.list, &[])?)
    }

    fn name_sql(&self) -> &str {
        &self.plan.name
    }

    /// Sums over every date, so the result is one row even without events
    /// (both sums NULL in that case).
    fn features_sql(&self) -> &str {
        EMPLOYEE_FEATURES_SQL
    }

    fn event_series_sql(&self) -> &str {
        &self.plan.event_series
    }

    fn notes_sql(&self) -> &str {
        &self.plan.notes
    }
}
