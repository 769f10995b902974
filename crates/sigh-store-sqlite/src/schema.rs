//! SQL schema and reference-data seeds for the Sigh SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Timestamps are stored as INTEGER milliseconds since the Unix epoch.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS hunt_status (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS hunt (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    hunt_status_id INTEGER NOT NULL REFERENCES hunt_status(id),
    name           TEXT NOT NULL,
    notes          TEXT,
    start_date     INTEGER NOT NULL,
    end_date       INTEGER
);

CREATE TABLE IF NOT EXISTS company (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name     TEXT NOT NULL,
    url      TEXT,
    linkedin TEXT,
    notes    TEXT
);

CREATE TABLE IF NOT EXISTS currency (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS person (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id INTEGER NOT NULL REFERENCES company(id),
    first_name TEXT NOT NULL,
    last_name  TEXT NOT NULL,
    title      TEXT,
    phone      TEXT,
    email      TEXT,
    linkedin   TEXT,
    notes      TEXT
);

CREATE TABLE IF NOT EXISTS role (
    id                        INTEGER PRIMARY KEY AUTOINCREMENT,
    hunt_id                   INTEGER NOT NULL REFERENCES hunt(id),
    company_id                INTEGER NOT NULL REFERENCES company(id),
    title                     TEXT NOT NULL,
    created_at                INTEGER NOT NULL,  -- server-assigned
    description               TEXT,
    description_document_path TEXT,
    description_document_name TEXT,
    notes                     TEXT,
    salary_lower_end          INTEGER,
    salary_higher_end         INTEGER,
    currency_id               INTEGER REFERENCES currency(id)
);

CREATE TABLE IF NOT EXISTS tag (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS role_tag (
    role_id INTEGER NOT NULL REFERENCES role(id),
    tag_id  INTEGER NOT NULL REFERENCES tag(id),
    PRIMARY KEY (role_id, tag_id)
);

CREATE TABLE IF NOT EXISTS person_tag (
    person_id INTEGER NOT NULL REFERENCES person(id),
    tag_id    INTEGER NOT NULL REFERENCES tag(id),
    PRIMARY KEY (person_id, tag_id)
);

-- Two separate type catalogues, one shape.
CREATE TABLE IF NOT EXISTS interaction_type_role (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS interaction_type_person (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

-- company_id is denormalised from the role at insert time.
CREATE TABLE IF NOT EXISTS interaction_role (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id          INTEGER NOT NULL REFERENCES company(id),
    person_id           INTEGER REFERENCES person(id),
    role_id             INTEGER NOT NULL REFERENCES role(id),
    interaction_type_id INTEGER NOT NULL REFERENCES interaction_type_role(id),
    occurred_at         INTEGER NOT NULL,
    notes               TEXT
);

CREATE TABLE IF NOT EXISTS interaction_person (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id           INTEGER NOT NULL REFERENCES person(id),
    interaction_type_id INTEGER NOT NULL REFERENCES interaction_type_person(id),
    occurred_at         INTEGER NOT NULL,
    notes               TEXT
);

CREATE INDEX IF NOT EXISTS role_hunt_idx                ON role(hunt_id);
CREATE INDEX IF NOT EXISTS role_company_idx             ON role(company_id);
CREATE INDEX IF NOT EXISTS person_company_idx           ON person(company_id);
CREATE INDEX IF NOT EXISTS interaction_role_role_idx    ON interaction_role(role_id);
CREATE INDEX IF NOT EXISTS interaction_role_company_idx ON interaction_role(company_id);
CREATE INDEX IF NOT EXISTS interaction_role_person_idx  ON interaction_role(person_id);
CREATE INDEX IF NOT EXISTS interaction_person_idx       ON interaction_person(person_id);

PRAGMA user_version = 1;
";

/// Reference-data seeds, run on every startup. Each insert is guarded so a
/// restart never duplicates rows.
pub const SEED: &str = "
INSERT INTO hunt_status (name)
  SELECT 'active'    WHERE NOT EXISTS (SELECT 1 FROM hunt_status WHERE name = 'active');
INSERT INTO hunt_status (name)
  SELECT 'cancelled' WHERE NOT EXISTS (SELECT 1 FROM hunt_status WHERE name = 'cancelled');
INSERT INTO hunt_status (name)
  SELECT 'failed'    WHERE NOT EXISTS (SELECT 1 FROM hunt_status WHERE name = 'failed');
INSERT INTO hunt_status (name)
  SELECT 'success'   WHERE NOT EXISTS (SELECT 1 FROM hunt_status WHERE name = 'success');

INSERT INTO interaction_type_role (name)
  SELECT 'Email'                 WHERE NOT EXISTS (SELECT 1 FROM interaction_type_role WHERE name = 'Email');
INSERT INTO interaction_type_role (name)
  SELECT 'Phone Call'            WHERE NOT EXISTS (SELECT 1 FROM interaction_type_role WHERE name = 'Phone Call');
INSERT INTO interaction_type_role (name)
  SELECT 'Instant Message'       WHERE NOT EXISTS (SELECT 1 FROM interaction_type_role WHERE name = 'Instant Message');
INSERT INTO interaction_type_role (name)
  SELECT 'Rejected'              WHERE NOT EXISTS (SELECT 1 FROM interaction_type_role WHERE name = 'Rejected');
INSERT INTO interaction_type_role (name)
  SELECT 'Application Submitted' WHERE NOT EXISTS (SELECT 1 FROM interaction_type_role WHERE name = 'Application Submitted');
INSERT INTO interaction_type_role (name)
  SELECT 'Ghosted'               WHERE NOT EXISTS (SELECT 1 FROM interaction_type_role WHERE name = 'Ghosted');
INSERT INTO interaction_type_role (name)
  SELECT 'Interviewed'           WHERE NOT EXISTS (SELECT 1 FROM interaction_type_role WHERE name = 'Interviewed');
INSERT INTO interaction_type_role (name)
  SELECT 'Offer Received'        WHERE NOT EXISTS (SELECT 1 FROM interaction_type_role WHERE name = 'Offer Received');
INSERT INTO interaction_type_role (name)
  SELECT 'Offer Accepted'        WHERE NOT EXISTS (SELECT 1 FROM interaction_type_role WHERE name = 'Offer Accepted');
INSERT INTO interaction_type_role (name)
  SELECT 'Offer Declined'        WHERE NOT EXISTS (SELECT 1 FROM interaction_type_role WHERE name = 'Offer Declined');
INSERT INTO interaction_type_role (name)
  SELECT 'Decision To Not Pursue' WHERE NOT EXISTS (SELECT 1 FROM interaction_type_role WHERE name = 'Decision To Not Pursue');

INSERT INTO interaction_type_person (name)
  SELECT 'Email'           WHERE NOT EXISTS (SELECT 1 FROM interaction_type_person WHERE name = 'Email');
INSERT INTO interaction_type_person (name)
  SELECT 'Phone Call'      WHERE NOT EXISTS (SELECT 1 FROM interaction_type_person WHERE name = 'Phone Call');
INSERT INTO interaction_type_person (name)
  SELECT 'Instant Message' WHERE NOT EXISTS (SELECT 1 FROM interaction_type_person WHERE name = 'Instant Message');

INSERT OR IGNORE INTO currency (code) VALUES ('USD');
INSERT OR IGNORE INTO currency (code) VALUES ('EUR');
INSERT OR IGNORE INTO currency (code) VALUES ('GBP');
INSERT OR IGNORE INTO currency (code) VALUES ('CAD');
";
