use super::table::{QueryPlan, TEAM_TABLE};
use super::{options_from_rows, EntityKind, EntityOption, EntityQuery};
use crate::config::ConfigError;
use crate::store::{QueryError, QueryExecutor};

// One row per member: the classifier is trained on individual employees, so a
// team is scored member by member rather than from a team-wide sum.
const TEAM_FEATURES_SQL: &str = "
    SELECT positive_events, negative_events
    FROM (
        SELECT employee_events.employee_id AS employee_id,
               SUM(positive_events) AS positive_events,
               SUM(negative_events) AS negative_events
        FROM team
        JOIN employee_events USING (team_id)
        WHERE team.team_id = ?1
        GROUP BY employee_events.employee_id
    )
    ORDER BY employee_id";

/// Queries scoped to a single team.
#[derive(Debug, Clone)]
pub struct Team {
    executor: QueryExecutor,
    plan: QueryPlan,
}

impl Team {
    pub fn new(executor: QueryExecutor) -> Result<Self, ConfigError> {
        Ok(Self {
            executor,
            plan: TEAM_TABLE.plan()?,
        })
    }
}

impl EntityQuery for Team {
    fn kind(&self) -> EntityKind {
        EntityKind::Team
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

    fn features_sql(&self) -> &str {
        TEAM_FEATURES_SQL
    }

    fn event_series_sql(&self) -> &str {
        &self.plan.event_series
    }

    fn notes_sql(&self) -> &str {
        &self.plan.notes
    }
}
