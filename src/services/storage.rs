use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use std::time::Duration;

use crate::utils::image_url::public_object_url;

/// One entry of a non-recursive folder listing. Sub-folders are reported so
/// callers can skip (synchronizer) or descend into (mirror) them.
#[derive(Debug, Clone)]
pub struct FolderEntry {
    /// Name relative to the listed prefix, without any trailing separator.
    pub name: String,
    pub is_folder: bool,
}

/// Object-store access used by handlers and services. The production
/// implementation talks to an S3-compatible endpoint; tests inject an
/// in-memory store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> Result<()>;
    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
    async fn delete(&self, bucket: &str, key: &str) -> Result<()>;
    /// List the direct children of `prefix` (no recursion). A prefix with
    /// no objects yields an empty listing, not an error.
    async fn list_folder(&self, bucket: &str, prefix: &str) -> Result<Vec<FolderEntry>>;
    /// Presigned PUT URL for direct browser uploads.
    async fn presigned_upload_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String>;
    /// Public delivery URL for an object, as stored in metadata rows.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}

pub struct S3ObjectStore {
    client: Client,
    /// Public base URL the store serves objects from; also the base of
    /// every stored `image_url`.
    public_base: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, public_base: String) -> Self {
        Self {
            client,
            public_base,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .cache_control(cache_control)
            .send()
            .await?;
        Ok(())
    }

    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let res = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        let data = res.body.collect().await?.to_vec();
        Ok(data)
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }

    async fn list_folder(&self, bucket: &str, prefix: &str) -> Result<Vec<FolderEntry>> {
        let prefix = if prefix.is_empty() || prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{prefix}/")
        };

        let mut entries = Vec::new();
        let mut continuation_token = None;

        loop {
            let res = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(&prefix)
                .delimiter("/")
                .set_continuation_token(continuation_token)
                .send()
                .await?;

            for common in res.common_prefixes() {
                if let Some(folder) = common.prefix() {
                    let folder = folder.trim_end_matches('/');
                    let name = folder.strip_prefix(prefix.as_str()).unwrap_or(folder);
                    if !name.is_empty() {
                        entries.push(FolderEntry {
                            name: name.to_string(),
                            is_folder: true,
                        });
                    }
                }
            }

            for object in res.contents() {
                if let Some(key) = object.key() {
                    let name = key.strip_prefix(prefix.as_str()).unwrap_or(key);
                    // The prefix placeholder object lists as an empty name.
                    if !name.is_empty() {
                        entries.push(FolderEntry {
                            name: name.to_string(),
                            is_folder: false,
                        });
                    }
                }
            }

            if res.is_truncated().unwrap_or(false) {
                continuation_token = res.next_continuation_token().map(|t| t.to_string());
            } else {
                break;
            }
        }

        Ok(entries)
    }

    async fn presigned_upload_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String> {
        let presigned = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .presigned(PresigningConfig::expires_in(expires_in)?)
            .await?;
        Ok(presigned.uri().to_string())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        public_object_url(&self.public_base, bucket, key)
    }
}
