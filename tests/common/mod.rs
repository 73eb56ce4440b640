#![allow(dead_code)]

use inventory::configuration::{get_configuration, DatabaseSettings};
use inventory::db::{MemoryProductStore, PgProductStore, ProductStore};
use serde_json::Value;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::fmt::Display;
use std::net::TcpListener;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn products_url(&self) -> String {
        format!("{}/api/products", self.address)
    }

    pub fn product_url(&self, id: impl Display) -> String {
        format!("{}/api/products/{}", self.address, id)
    }

    pub async fn list(&self) -> reqwest::Response {
        self.client
            .get(self.products_url())
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn show(&self, id: impl Display) -> reqwest::Response {
        self.client
            .get(self.product_url(id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.products_url())
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put(&self, id: impl Display, body: &Value) -> reqwest::Response {
        self.client
            .put(self.product_url(id))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete(&self, id: impl Display) -> reqwest::Response {
        self.client
            .delete(self.product_url(id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// POST and insist on 201; returns the created product.
    pub async fn create(&self, body: Value) -> Value {
        let resp = self.post(&body).await;
        assert_eq!(resp.status().as_u16(), 201, "create failed for {}", body);
        resp.json().await.expect("Failed to read body.")
    }

    pub async fn list_json(&self) -> Vec<Value> {
        let resp = self.list().await;
        assert!(resp.status().is_success());
        resp.json().await.expect("Failed to read body.")
    }
}

fn serve(store: Arc<dyn ProductStore>) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server = inventory::startup::run(listener, store).expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    }
}

/// Server over a fresh in-memory store.
pub async fn spawn_app() -> TestApp {
    serve(Arc::new(MemoryProductStore::new()))
}

/// Server over a fresh PostgreSQL database; `None` when PostgreSQL is not
/// reachable with the settings in `configuration.yaml`.
pub async fn spawn_pg_app() -> Option<TestApp> {
    let store = pg_store().await?;
    Some(serve(Arc::new(store)))
}

/// Store over a fresh PostgreSQL database, skipped like [`spawn_pg_app`].
pub async fn pg_store() -> Option<PgProductStore> {
    let mut configuration = get_configuration().expect("Failed to get configuration");
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();

    match configure_database(&configuration.database).await {
        Ok(pool) => Some(PgProductStore::new(pool)),
        Err(err) => {
            eprintln!("Skipping tests: failed to connect to postgres: {}", err);
            None
        }
    }
}

pub async fn configure_database(config: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let mut connection = PgConnection::connect(&config.connection_string_without_db()).await?;

    connection
        .execute(format!(r#"CREATE DATABASE "{}""#, config.database_name).as_str())
        .await?;

    let connection_pool = PgPool::connect(&config.connection_string()).await?;

    sqlx::migrate!("./migrations").run(&connection_pool).await?;

    Ok(connection_pool)
}
