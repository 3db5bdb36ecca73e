//! SQLite schema definition.

/// Complete database schema for the pharmacy store.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Categories
-- ============================================================================

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE CHECK (length(trim(name)) > 0),
    description TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- ============================================================================
-- Medicine Catalog
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicines (
    id INTEGER PRIMARY KEY AUTOINCREMENT,         -- never reused, newest = highest
    code TEXT NOT NULL UNIQUE CHECK (length(trim(code)) > 0),
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    generic_name TEXT,
    category TEXT,
    category_id INTEGER REFERENCES categories(id),
    unit TEXT,
    form TEXT,
    manufacturer TEXT,
    ingredients TEXT,
    specification TEXT,
    strength TEXT,
    barcode TEXT,
    description TEXT,
    usage_instruction TEXT,
    storage_instruction TEXT,
    image TEXT,
    price REAL NOT NULL DEFAULT 0 CHECK (price >= 0),
    cost_price REAL CHECK (cost_price IS NULL OR cost_price >= 0),
    status TEXT NOT NULL DEFAULT 'ACTIVE' CHECK (status IN ('ACTIVE', 'INACTIVE', 'EXPIRED')),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_medicines_status ON medicines(status);
CREATE INDEX IF NOT EXISTS idx_medicines_name ON medicines(name);
CREATE INDEX IF NOT EXISTS idx_medicines_category ON medicines(category_id);

-- ============================================================================
-- Stock Ledger
-- ============================================================================

CREATE TABLE IF NOT EXISTS stock_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    medicine_id INTEGER NOT NULL UNIQUE REFERENCES medicines(id),
    current_stock INTEGER NOT NULL DEFAULT 0 CHECK (current_stock >= 0),
    min_stock INTEGER NOT NULL DEFAULT 0 CHECK (min_stock >= 0),
    max_stock INTEGER NOT NULL DEFAULT 0 CHECK (max_stock >= min_stock),
    location TEXT,
    batch_number TEXT,
    expiry_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_stock_current ON stock_records(current_stock);
"#;
