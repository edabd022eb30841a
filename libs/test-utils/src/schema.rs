/// Tables the event DAOs read and write. Applied to every test database.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS venues (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    capacity INTEGER NOT NULL DEFAULT 0,
    latitude DOUBLE PRECISION NOT NULL,
    longitude DOUBLE PRECISION NOT NULL,
    address TEXT NOT NULL,
    city TEXT NOT NULL,
    state TEXT NOT NULL DEFAULT '',
    country TEXT NOT NULL,
    postal_code TEXT NOT NULL DEFAULT '',
    amenities TEXT[] NOT NULL DEFAULT '{}',
    images TEXT[] NOT NULL DEFAULT '{}'
);

CREATE TABLE IF NOT EXISTS events (
    id UUID PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    category TEXT NOT NULL,
    start_time TIMESTAMPTZ NOT NULL,
    end_time TIMESTAMPTZ NOT NULL,
    venue_id UUID NOT NULL REFERENCES venues (id),
    price DOUBLE PRECISION NOT NULL DEFAULT 0,
    available_tickets INTEGER NOT NULL DEFAULT 0
        CHECK (available_tickets >= 0),
    CHECK (end_time >= start_time)
);

CREATE INDEX IF NOT EXISTS events_start_time_idx ON events (start_time);
CREATE INDEX IF NOT EXISTS events_category_idx ON events (category);
CREATE INDEX IF NOT EXISTS venues_city_idx ON venues (city);
"#;
