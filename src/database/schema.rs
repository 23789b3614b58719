/// Bootstrap DDL, applied in order by `DatabaseManager::migrate`
pub const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(150) NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        date_joined TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS cats (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        breed VARCHAR(32) NOT NULL,
        description VARCHAR(250) NOT NULL DEFAULT '',
        age INTEGER NOT NULL,
        owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS cats_owner_id_idx ON cats(owner_id)",
    r#"
    CREATE TABLE IF NOT EXISTS toys (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(50) NOT NULL,
        color VARCHAR(20) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS feedings (
        id BIGSERIAL PRIMARY KEY,
        date DATE NOT NULL,
        meal VARCHAR(16) NOT NULL,
        cat_id BIGINT NOT NULL REFERENCES cats(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS feedings_cat_id_idx ON feedings(cat_id)",
    r#"
    CREATE TABLE IF NOT EXISTS cats_toys (
        cat_id BIGINT NOT NULL REFERENCES cats(id) ON DELETE CASCADE,
        toy_id BIGINT NOT NULL REFERENCES toys(id) ON DELETE CASCADE,
        PRIMARY KEY (cat_id, toy_id)
    )
    "#,
];
