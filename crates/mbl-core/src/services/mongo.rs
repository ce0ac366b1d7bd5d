use async_trait::async_trait;
use mongodb::bson::Document;
use mongodb::options::{ClientOptions, Credential};
use mongodb::{Client, Database};

use crate::error::{BoxError, LauncherError, Result};

const ADMIN_DATABASE: &str = "admin";

/// Runs administrative commands against the `admin` database.
#[async_trait]
pub trait AdminCommandRunner: Send + Sync {
    async fn run_admin_command(&self, command: Document) -> std::result::Result<Document, BoxError>;
}

/// Production command channel backed by the MongoDB driver.
pub struct MongoAdmin {
    db: Database,
}

impl MongoAdmin {
    /// Build a client authenticating against `admin`. The driver connects lazily,
    /// so unreachable servers surface on the first command.
    pub async fn connect(uri: &str, username: &str, password: &str) -> Result<Self> {
        if !(uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://")) {
            return Err(LauncherError::Config(
                "MONGODB_URI must start with 'mongodb://' or 'mongodb+srv://'".into(),
            ));
        }

        let mut options = ClientOptions::parse(uri).await.map_err(client_error)?;
        options.credential = Some(
            Credential::builder()
                .username(username.to_string())
                .password(password.to_string())
                .source(ADMIN_DATABASE.to_string())
                .build(),
        );
        if options.app_name.is_none() {
            options.app_name = Some("mongodb-backup-launcher".to_string());
        }

        let client = Client::with_options(options).map_err(client_error)?;
        Ok(Self {
            db: client.database(ADMIN_DATABASE),
        })
    }
}

fn client_error(e: mongodb::error::Error) -> LauncherError {
    LauncherError::Client {
        client: "MongoDB",
        source: Box::new(e),
    }
}

#[async_trait]
impl AdminCommandRunner for MongoAdmin {
    async fn run_admin_command(&self, command: Document) -> std::result::Result<Document, BoxError> {
        Ok(self.db.run_command(command).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_non_mongodb_schemes() {
        for uri in ["http://mongodb-0.mongodb.database:27017", "mongodb-0:27017", ""] {
            let result = MongoAdmin::connect(uri, "backup", "secret").await;
            assert!(
                matches!(result, Err(LauncherError::Config(_))),
                "{uri:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn accepts_standard_connection_string_without_connecting() {
        let result = MongoAdmin::connect(
            "mongodb://mongodb-0.mongodb.database.svc.cluster.local:27017/?replicaSet=rs0",
            "backup",
            "secret",
        )
        .await;
        assert!(result.is_ok());
    }
}
