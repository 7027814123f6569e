//! Canned ACL to access level integration tests.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::types::ObjectCannedAcl;
    use cephmeta_core::{AccessLevel, CephMetaError, resolve_acl};

    use crate::{cleanup_bucket, create_test_bucket, put_test_object, s3_client, source_bucket};

    async fn level_for(acl: ObjectCannedAcl) -> Result<AccessLevel, CephMetaError> {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "acl").await;
        put_test_object(&client, &bucket, "obj.txt", b"data", "text/plain", Some(acl)).await;

        let result = resolve_acl(&source_bucket(&bucket), "obj.txt").await;

        cleanup_bucket(&client, &bucket).await;
        result
    }

    #[tokio::test]
    #[ignore = "requires running RGW"]
    async fn test_should_resolve_private_acl() {
        let level = level_for(ObjectCannedAcl::Private).await.expect("resolve_acl");
        assert_eq!(level, AccessLevel::Private);
    }

    #[tokio::test]
    #[ignore = "requires running RGW"]
    async fn test_should_resolve_public_read_acl() {
        let level = level_for(ObjectCannedAcl::PublicRead).await.expect("resolve_acl");
        assert_eq!(level, AccessLevel::PublicRead);
    }

    #[tokio::test]
    #[ignore = "requires running RGW"]
    async fn test_should_resolve_public_read_write_acl() {
        let level = level_for(ObjectCannedAcl::PublicReadWrite)
            .await
            .expect("resolve_acl");
        // RGW expands public-read-write into separate READ and WRITE grants;
        // the first one listed decides.
        assert!(level.is_public(), "got {level}");
    }

    #[tokio::test]
    #[ignore = "requires running RGW"]
    async fn test_should_refuse_authenticated_read_acl() {
        let result = level_for(ObjectCannedAcl::AuthenticatedRead).await;
        assert!(matches!(
            result,
            Err(CephMetaError::NotImplementedAclMapping { .. })
        ));
    }
}
