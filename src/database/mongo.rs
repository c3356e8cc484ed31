//! MongoDB database wrapper.

use mongodb::{options::ClientOptions, Client, Collection};
use tracing::info;

use super::models::{ContentKind, ServiceContent};

/// Database wrapper for MongoDB operations.
#[derive(Debug, Clone)]
pub struct Database {
    db: mongodb::Database,
}

impl Database {
    /// Connect to MongoDB with the given URI and database name.
    ///
    /// # Errors
    /// Returns error if connection fails.
    pub async fn connect(uri: &str, db_name: &str) -> anyhow::Result<Self> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;

        // Ping the database to verify connection
        client
            .database("admin")
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        info!("Successfully connected to MongoDB");

        let db = client.database(db_name);

        Ok(Self { db })
    }

    /// Get a typed collection from the database.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Seed the service content collection with defaults if it is empty.
    ///
    /// Hosted service bots reply with random entries from this collection,
    /// so a fresh deployment should not start with nothing to serve.
    pub async fn seed_service_content(&self) -> anyhow::Result<()> {
        let collection: Collection<ServiceContent> = self.collection(ServiceContent::COLLECTION);

        let count = collection
            .count_documents(mongodb::bson::doc! {})
            .await?;
        if count > 0 {
            return Ok(());
        }

        let seed = vec![
            ServiceContent::new(
                ContentKind::Quran,
                "قُلْ هُوَ اللَّهُ أَحَدٌ",
                "Surah Al-Ikhlas",
            ),
            ServiceContent::new(
                ContentKind::Quran,
                "إِنَّ مَعَ الْعُسْرِ يُسْرًا",
                "Surah Ash-Sharh",
            ),
            ServiceContent::new(
                ContentKind::Video,
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                "Sample Video 1",
            ),
        ];

        collection.insert_many(seed).await?;
        info!("Seeded default service content");

        Ok(())
    }
}
