use crate::db::{Database, StoreError};
use crate::models::user::Credential;
use bincode::{Decode, Encode};
use redb::{ReadableTable, TableDefinition, TableError};
use tracing::info;

/// username -> bincode-encoded [`StoredCredential`]
pub(crate) const USERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

#[derive(Debug, Encode, Decode)]
pub struct StoredCredential {
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: i64, // Store as timestamp
}

impl From<&Credential> for StoredCredential {
    fn from(credential: &Credential) -> Self {
        StoredCredential {
            username: credential.username.clone(),
            password_hash: credential.password_hash.clone(),
            role: credential.role.clone(),
            created_at: credential.created_at.timestamp(),
        }
    }
}

impl From<StoredCredential> for Credential {
    fn from(stored: StoredCredential) -> Self {
        Credential {
            username: stored.username,
            password_hash: stored.password_hash,
            role: stored.role,
            created_at: chrono::DateTime::from_timestamp(stored.created_at, 0)
                .unwrap_or_else(chrono::Utc::now),
        }
    }
}

#[derive(Clone)]
pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    pub fn new(db: Database) -> Self {
        UserRepository { db }
    }

    /// Inserts a new credential; usernames are unique.
    pub fn create(&self, credential: &Credential) -> Result<(), StoreError> {
        let encoded = bincode::encode_to_vec(
            StoredCredential::from(credential),
            bincode::config::standard(),
        )?;

        let txn = self.db.db.begin_write()?;
        {
            let mut users = txn.open_table(USERS_TABLE)?;
            if users.get(credential.username.as_str())?.is_some() {
                return Err(StoreError::Duplicate(credential.username.clone()));
            }
            users.insert(credential.username.as_str(), encoded.as_slice())?;
        }
        txn.commit()?;

        info!(username = %credential.username, role = %credential.role, "User created in database");

        Ok(())
    }

    pub fn get_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        let txn = self.db.db.begin_read()?;
        let users = match txn.open_table(USERS_TABLE) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match users.get(username)? {
            Some(data) => {
                let (stored, _): (StoredCredential, usize) =
                    bincode::decode_from_slice(data.value(), bincode::config::standard())?;
                Ok(Some(Credential::from(stored)))
            }
            None => Ok(None),
        }
    }
}
