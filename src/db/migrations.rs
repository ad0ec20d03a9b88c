use crate::config::AdminSeed;
use crate::db::user_repository::{UserRepository, USERS_TABLE};
use crate::db::{Database, StoreError};
use crate::models::user::Credential;
use crate::utils::password::hash_password;
use redb::{ReadableTable, TableDefinition, WriteTransaction};
use tracing::info;

/// version -> migration name
const SCHEMA_MIGRATIONS: TableDefinition<u64, &str> = TableDefinition::new("schema_migrations");

struct Migration {
    version: u64,
    name: &'static str,
    apply: fn(&WriteTransaction) -> Result<(), StoreError>,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create_users",
    apply: create_users,
}];

fn create_users(txn: &WriteTransaction) -> Result<(), StoreError> {
    txn.open_table(USERS_TABLE)?;
    Ok(())
}

/// Applies every pending migration in one write transaction and returns how
/// many ran.
pub fn run_migrations(db: &Database) -> Result<usize, StoreError> {
    info!("Starting migrations");

    let txn = db.db.begin_write()?;
    let mut applied = 0;
    {
        let mut history = txn.open_table(SCHEMA_MIGRATIONS)?;
        for migration in MIGRATIONS {
            if history.get(migration.version)?.is_some() {
                continue;
            }
            (migration.apply)(&txn)?;
            history.insert(migration.version, migration.name)?;
            info!(version = migration.version, name = migration.name, "Migration applied");
            applied += 1;
        }
    }
    txn.commit()?;

    info!(applied, "Migrations applied successfully");
    Ok(applied)
}

/// Creates the administrator account unless the username is already taken.
/// Returns whether an account was created.
pub fn seed_admin(repo: &UserRepository, seed: &AdminSeed) -> Result<bool, StoreError> {
    if repo.get_by_username(&seed.username)?.is_some() {
        info!(username = %seed.username, "Admin account already present, leaving it untouched");
        return Ok(false);
    }

    let password_hash = hash_password(&seed.password)
        .map_err(|e| StoreError::Hash(e.to_string()))?;

    repo.create(&Credential {
        username: seed.username.clone(),
        password_hash,
        role: seed.role.clone(),
        created_at: chrono::Utc::now(),
    })?;

    info!(username = %seed.username, "Admin user migration applied successfully");
    Ok(true)
}
