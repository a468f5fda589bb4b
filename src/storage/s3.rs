// S3 storage gateway - works against AWS or S3-compatible services
// (LocalStack, MinIO) via a custom endpoint

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::StorageGateway;
use crate::backup::types::BackupError;

/// Connection settings for the S3 gateway.
#[derive(Debug, Clone)]
pub struct S3GatewayConfig {
    pub bucket_name: String,
    pub region: String,
    pub key_prefix: String,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
}

impl Default for S3GatewayConfig {
    fn default() -> Self {
        Self {
            bucket_name: "storevault-backups".to_string(),
            region: "us-east-1".to_string(),
            key_prefix: "blobs/".to_string(),
            endpoint_url: None,
            force_path_style: false,
        }
    }
}

/// S3-backed storage gateway.
pub struct S3StorageGateway {
    client: Client,
    config: S3GatewayConfig,
}

impl S3StorageGateway {
    /// Create a gateway from the given configuration.
    pub async fn new(config: S3GatewayConfig) -> Result<Self, BackupError> {
        let mut aws_config_builder = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(ref endpoint) = config.endpoint_url {
            aws_config_builder = aws_config_builder.endpoint_url(endpoint);
        }

        let aws_config = aws_config_builder.load().await;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&aws_config);
        if config.force_path_style {
            s3_config_builder = s3_config_builder.force_path_style(true);
        }

        let client = Client::from_conf(s3_config_builder.build());

        Ok(Self { client, config })
    }

    /// Ensure the configured bucket exists, creating it if necessary.
    pub async fn ensure_bucket_exists(&self) -> Result<(), BackupError> {
        match self
            .client
            .head_bucket()
            .bucket(&self.config.bucket_name)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(_) => {
                let mut create_bucket = self
                    .client
                    .create_bucket()
                    .bucket(&self.config.bucket_name);

                if self.config.region != "us-east-1" {
                    use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
                    let location = BucketLocationConstraint::from(self.config.region.as_str());
                    let bucket_config = CreateBucketConfiguration::builder()
                        .location_constraint(location)
                        .build();
                    create_bucket = create_bucket.create_bucket_configuration(bucket_config);
                }

                create_bucket.send().await.map_err(|e| {
                    BackupError::StorageFailed(format!("failed to create bucket: {}", e))
                })?;

                Ok(())
            }
        }
    }

    fn object_key(&self, key: &str) -> String {
        format!("{}{}", self.config.key_prefix, key)
    }
}

#[async_trait]
impl StorageGateway for S3StorageGateway {
    async fn store(&self, key: &str, data: &[u8]) -> Result<(), BackupError> {
        self.client
            .put_object()
            .bucket(&self.config.bucket_name)
            .key(self.object_key(key))
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| BackupError::StorageFailed(format!("failed to put object: {}", e)))?;
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Vec<u8>, BackupError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.config.bucket_name)
            .key(self.object_key(key))
            .send()
            .await
            .map_err(|e| BackupError::StorageFailed(format!("failed to get object: {}", e)))?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| BackupError::StorageFailed(format!("failed to read object body: {}", e)))?;
        Ok(body.into_bytes().to_vec())
    }

    async fn delete(&self, key: &str) -> Result<(), BackupError> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket_name)
            .key(self.object_key(key))
            .send()
            .await
            .map_err(|e| BackupError::StorageFailed(format!("failed to delete object: {}", e)))?;
        Ok(())
    }
}
