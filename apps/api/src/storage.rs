use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
pub async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "skillsurger-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}

/// Key prefix under which all of a user's uploads are stored.
fn resume_prefix(user_id: Uuid) -> String {
    format!("resumes/{user_id}/")
}

fn resume_key(user_id: Uuid, upload_id: Uuid) -> String {
    format!("{}{upload_id}.pdf", resume_prefix(user_id))
}

/// True when `key` is exactly a key [`archive_resume`] would produce for
/// `user_id`: the user's prefix followed by `{upload_id}.pdf`.
pub fn is_user_resume_key(user_id: Uuid, key: &str) -> bool {
    key.strip_prefix(&resume_prefix(user_id))
        .and_then(|file| file.strip_suffix(".pdf"))
        .and_then(|upload_id| Uuid::parse_str(upload_id).ok())
        .is_some_and(|upload_id| resume_key(user_id, upload_id) == key)
}

/// Stores the original upload and returns its object key.
pub async fn archive_resume(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    user_id: Uuid,
    upload_id: Uuid,
    pdf: Bytes,
) -> Result<String> {
    let key = resume_key(user_id, upload_id);
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(pdf))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("S3 upload failed: {e}"))
        .with_context(|| format!("archiving résumé for user {user_id}"))?;

    info!("Uploaded résumé to s3://{bucket}/{key}");
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_key_layout() {
        let user_id = Uuid::nil();
        let upload_id = Uuid::from_u128(1);
        assert_eq!(
            resume_key(user_id, upload_id),
            "resumes/00000000-0000-0000-0000-000000000000/00000000-0000-0000-0000-000000000001.pdf"
        );
    }

    #[test]
    fn test_user_resume_key_ownership() {
        let user_id = Uuid::from_u128(7);
        let other = Uuid::from_u128(8);
        let upload_id = Uuid::from_u128(1);

        assert!(is_user_resume_key(user_id, &resume_key(user_id, upload_id)));
        assert!(!is_user_resume_key(other, &resume_key(user_id, upload_id)));

        let prefix = resume_prefix(user_id);
        for key in [
            format!("{prefix}../{other}/{upload_id}.pdf"),
            format!("{prefix}{upload_id}.exe"),
            format!("{prefix}{upload_id}"),
            format!("{prefix}nested/{upload_id}.pdf"),
            format!("{prefix}.pdf"),
            prefix.clone(),
        ] {
            assert!(!is_user_resume_key(user_id, &key), "{key}");
        }
    }
}
