use employee_events::risk::LogisticModel;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

const SEED: &str = "
    CREATE TABLE team (team_id INTEGER PRIMARY KEY, team_name TEXT, shift TEXT, manager_name TEXT);
    CREATE TABLE employee (employee_id INTEGER PRIMARY KEY, first_name TEXT, last_name TEXT, team_id INTEGER);
    CREATE TABLE employee_events (event_date TEXT, employee_id INTEGER, team_id INTEGER, positive_events INTEGER, negative_events INTEGER);
    CREATE TABLE notes (employee_id INTEGER, team_id INTEGER, note TEXT, note_date TEXT);
    INSERT INTO team VALUES (1, 'Platform', 'Day', 'Morgan Lee');
    INSERT INTO employee VALUES (7, 'Ada', 'Byron', 1);
    INSERT INTO employee VALUES (8, 'Chris', 'Jones', 1);
    INSERT INTO employee_events VALUES ('2023-02-01', 7, 1, 2, 0);
    INSERT INTO employee_events VALUES ('2023-02-03', 7, 1, 0, 1);
    INSERT INTO notes VALUES (7, 1, 'Mentoring new hires', '2023-02-02');
";

/// Writes the seeded database into `dir` and returns its path.
pub(crate) fn seed_database(dir: &Path) -> PathBuf {
    let db_path = dir.join("employee_events.db");
    Connection::open(&db_path)
        .and_then(|connection| connection.execute_batch(SEED))
        .expect("seed database");
    db_path
}

pub(crate) fn sample_model() -> LogisticModel {
    LogisticModel::from_json(r#"{"coefficients": [-0.35, 0.9], "intercept": -0.2}"#)
        .expect("model parses")
}
