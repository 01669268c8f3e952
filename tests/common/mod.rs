#![allow(dead_code)]

use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use taverna_backend::config::SiteConfig;
use taverna_backend::infrastructure::database;
use taverna_backend::services::storage::{FolderEntry, ObjectStore};
use taverna_backend::utils::auth::create_session_token;
use taverna_backend::utils::image_url::public_object_url;
use taverna_backend::{AppState, create_app};

pub const PUBLIC_BASE: &str = "https://store.example.com";
pub const JWT_SECRET: &str = "test_secret";
pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "parola-de-test";

/// In-memory object store standing in for the S3 endpoint.
pub struct MockObjectStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    public_base: String,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            public_base: PUBLIC_BASE.to_string(),
        }
    }

    pub fn put(&self, bucket: &str, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), data.to_vec());
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
        _cache_control: &str,
    ) -> anyhow::Result<()> {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), data);
        Ok(())
    }

    async fn download(&self, bucket: &str, key: &str) -> anyhow::Result<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("object not found: {bucket}/{key}"))
    }

    async fn delete(&self, bucket: &str, key: &str) -> anyhow::Result<()> {
        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn list_folder(&self, bucket: &str, prefix: &str) -> anyhow::Result<Vec<FolderEntry>> {
        let prefix = if prefix.is_empty() || prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{prefix}/")
        };

        let objects = self.objects.lock().unwrap();
        let mut folders = BTreeSet::new();
        let mut files = Vec::new();

        for (object_bucket, key) in objects.keys() {
            if object_bucket != bucket {
                continue;
            }
            let Some(rest) = key.strip_prefix(prefix.as_str()) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            match rest.split_once('/') {
                Some((folder, _)) => {
                    folders.insert(folder.to_string());
                }
                None => files.push(FolderEntry {
                    name: rest.to_string(),
                    is_folder: false,
                }),
            }
        }

        let mut entries: Vec<FolderEntry> = folders
            .into_iter()
            .map(|name| FolderEntry {
                name,
                is_folder: true,
            })
            .collect();
        entries.extend(files);
        Ok(entries)
    }

    async fn presigned_upload_url(
        &self,
        bucket: &str,
        key: &str,
        _expires_in: Duration,
    ) -> anyhow::Result<String> {
        Ok(format!(
            "{}/upload/{bucket}/{key}?token=test",
            self.public_base
        ))
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        public_object_url(&self.public_base, bucket, key)
    }
}

pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    database::run_migrations(&db).await.unwrap();
    db
}

pub fn test_config(static_root: PathBuf) -> SiteConfig {
    SiteConfig {
        admin_username: ADMIN_USER.to_string(),
        admin_password: ADMIN_PASS.to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        object_store_url: PUBLIC_BASE.to_string(),
        static_root,
        ..Default::default()
    }
}

pub async fn test_state(static_root: PathBuf) -> (AppState, Arc<MockObjectStore>) {
    let db = setup_test_db().await;
    let storage = Arc::new(MockObjectStore::new());

    let state = AppState {
        db,
        storage: storage.clone(),
        http: reqwest::Client::new(),
        config: test_config(static_root),
    };

    (state, storage)
}

pub async fn test_app(static_root: PathBuf) -> (axum::Router, AppState, Arc<MockObjectStore>) {
    let (state, storage) = test_state(static_root).await;
    (create_app(state.clone()), state, storage)
}

/// `Cookie` header value for an authenticated admin request.
pub fn admin_cookie() -> String {
    let token = create_session_token(ADMIN_USER, JWT_SECRET).unwrap();
    format!("auth_token={token}")
}
