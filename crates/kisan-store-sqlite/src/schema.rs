//! SQL schema for the Kisan SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS profiles (
    user_id     TEXT PRIMARY KEY,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    email       TEXT NOT NULL,
    mobile      TEXT,
    village     TEXT,
    taluka      TEXT,
    district    TEXT,
    state       TEXT,
    is_admin    INTEGER NOT NULL DEFAULT 0,
    is_creator  INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);

-- One row per (user, community); the primary key makes joins idempotent.
CREATE TABLE IF NOT EXISTS memberships (
    user_id         TEXT NOT NULL,
    community_name  TEXT NOT NULL,
    joined_at       TEXT NOT NULL,
    PRIMARY KEY (user_id, community_name)
);

CREATE TABLE IF NOT EXISTS communities (
    community_id  TEXT PRIMARY KEY,
    name          TEXT NOT NULL UNIQUE,   -- lowercase
    description   TEXT NOT NULL,
    info          TEXT,
    category      TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS posts (
    post_id       TEXT PRIMARY KEY,
    community_id  TEXT NOT NULL REFERENCES communities(community_id),
    category      TEXT NOT NULL,   -- PostCategory id
    title         TEXT NOT NULL,
    content       TEXT NOT NULL,   -- raw markup
    author_id     TEXT NOT NULL,
    author_name   TEXT NOT NULL,
    created_at    TEXT NOT NULL,   -- RFC 3339 UTC, fixed width
    updated_at    TEXT
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id    TEXT PRIMARY KEY,
    post_id       TEXT NOT NULL REFERENCES posts(post_id),
    community_id  TEXT NOT NULL,
    author_id     TEXT NOT NULL,
    author_name   TEXT NOT NULL,
    content       TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

-- At most one reaction per user per target.
CREATE TABLE IF NOT EXISTS reactions (
    reaction_id  TEXT PRIMARY KEY,
    target_type  TEXT NOT NULL,   -- 'post' | 'comment'
    target_id    TEXT NOT NULL,
    user_id      TEXT NOT NULL,
    kind         TEXT NOT NULL,   -- 'like' | 'dislike'
    reacted_at   TEXT NOT NULL,
    UNIQUE (target_type, target_id, user_id)
);

-- Single public document written by the stats job.
CREATE TABLE IF NOT EXISTS stats (
    key          TEXT PRIMARY KEY,
    members      INTEGER NOT NULL,
    communities  INTEGER NOT NULL,
    villages     INTEGER NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS memberships_community_idx ON memberships(community_name);
CREATE INDEX IF NOT EXISTS posts_community_idx       ON posts(community_id, created_at);
CREATE INDEX IF NOT EXISTS posts_author_idx          ON posts(author_id);
CREATE INDEX IF NOT EXISTS comments_post_idx         ON comments(post_id);
CREATE INDEX IF NOT EXISTS comments_author_idx       ON comments(author_id);
CREATE INDEX IF NOT EXISTS reactions_target_idx      ON reactions(target_type, target_id);
CREATE INDEX IF NOT EXISTS reactions_user_idx        ON reactions(user_id);

PRAGMA user_version = 1;
";
