#![allow(dead_code)]

use employee_events::entities::EntityCatalog;
use employee_events::risk::{FeatureRow, ModelError, RiskClassifier};
use employee_events::store::QueryExecutor;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

const SCHEMA: &str = "
    CREATE TABLE team (
        team_id INTEGER PRIMARY KEY,
        team_name TEXT,
        shift TEXT,
        manager_name TEXT
    );
    CREATE TABLE employee (
        employee_id INTEGER PRIMARY KEY,
        first_name TEXT,
        last_name TEXT,
        team_id INTEGER REFERENCES team (team_id)
    );
    CREATE TABLE employee_events (
        event_date TEXT,
        employee_id INTEGER REFERENCES employee (employee_id),
        team_id INTEGER REFERENCES team (team_id),
        positive_events INTEGER,
        negative_events INTEGER
    );
    CREATE TABLE notes (
        employee_id INTEGER REFERENCES employee (employee_id),
        team_id INTEGER REFERENCES team (team_id),
        note TEXT,
        note_date TEXT
    );
";

// Team 1 has three members, each with 2 positive and 1 negative event spread
// over distinct dates. Team 2 has two members without events or notes; id 9
// has no first name on record.
const SEED: &str = "
    INSERT INTO team VALUES (1, 'Sales', 'Day', 'Morgan Lee');
    INSERT INTO team VALUES (2, 'Ops Desk', 'Night', 'Riley Park');

    INSERT INTO employee VALUES (1, 'Ada', 'Byron', 1);
    INSERT INTO employee VALUES (2, 'Chris', 'Jones', 1);
    INSERT INTO employee VALUES (3, 'Lin', 'Wu', 1);
    INSERT INTO employee VALUES (4, 'Lucas', 'Morales', 2);
    INSERT INTO employee VALUES (9, NULL, 'Solo', 2);

    INSERT INTO employee_events VALUES ('2023-01-02', 1, 1, 1, 0);
    INSERT INTO employee_events VALUES ('2023-01-05', 1, 1, 1, 1);
    INSERT INTO employee_events VALUES ('2023-01-03', 2, 1, 2, 0);
    INSERT INTO employee_events VALUES ('2023-01-08', 2, 1, 0, 1);
    INSERT INTO employee_events VALUES ('2023-01-04', 3, 1, 1, 1);
    INSERT INTO employee_events VALUES ('2023-01-09', 3, 1, 1, 0);

    INSERT INTO notes VALUES (1, 1, 'Asked about <promotion> timeline', '2023-01-06');
    INSERT INTO notes VALUES (1, 1, 'Completed onboarding', '2023-01-01');
    INSERT INTO notes VALUES (2, 1, 'Covering the Friday shift', '2023-01-07');
";

/// A seeded SQLite database living in a temporary directory.
pub struct Fixture {
    dir: TempDir,
    db_path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let db_path = dir.path().join("employee_events.db");
        let connection = Connection::open(&db_path).expect("create fixture database");
        connection
            .execute_batch(SCHEMA)
            .expect("create fixture schema");
        connection.execute_batch(SEED).expect("seed fixture rows");
        Self { dir, db_path }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn static_dir(&self) -> PathBuf {
        self.dir.path().join("static")
    }

    pub fn executor(&self) -> QueryExecutor {
        QueryExecutor::new(&self.db_path)
    }

    pub fn catalog(&self) -> EntityCatalog {
        EntityCatalog::new(self.executor()).expect("builtin tables are valid")
    }
}

/// Classifier returning scripted positive-class probabilities in order and
/// recording every row it was asked to score.
pub struct ScriptedClassifier {
    scores: Vec<f64>,
    seen: Mutex<Vec<FeatureRow>>,
}

impl ScriptedClassifier {
    pub fn new(scores: Vec<f64>) -> Self {
        Self {
            scores,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<FeatureRow> {
        self.seen.lock().expect("classifier mutex").clone()
    }
}

impl RiskClassifier for ScriptedClassifier {
    fn predict_proba(&self, features: &[FeatureRow]) -> Result<Vec<[f64; 2]>, ModelError> {
        self.seen
            .lock()
            .expect("classifier mutex")
            .extend_from_slice(features);
        Ok(features
            .iter()
            .enumerate()
            .map(|(index, _)| {
                let positive = self.scores.get(index).copied().unwrap_or(0.5);
                [1.0 - positive, positive]
            })
            .collect())
    }
}

/// Classifier that always fails, for exercising degraded charts.
pub struct BrokenClassifier;

impl RiskClassifier for BrokenClassifier {
    fn predict_proba(&self, _features: &[FeatureRow]) -> Result<Vec<[f64; 2]>, ModelError> {
        Err(ModelError::NonFinite)
    }
}
