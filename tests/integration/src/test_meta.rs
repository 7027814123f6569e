//! Object metadata lookup integration tests.

#[cfg(test)]
mod tests {
    use cephmeta_core::{AccessLevel, CephMetaError, fetch_file_meta, fetch_from_url};
    use http::StatusCode;

    use crate::{
        cleanup_bucket, create_test_bucket, object_url, put_test_object, s3_client,
        source_bucket,
    };

    #[tokio::test]
    #[ignore = "requires running RGW"]
    async fn test_should_fetch_private_object_meta() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "meta").await;
        let body = b"hello, cephmeta!";
        put_test_object(&client, &bucket, "dir/greeting.txt", body, "text/plain", None).await;

        let source = source_bucket(&bucket);
        let meta = fetch_from_url(&object_url(&bucket, "dir/greeting.txt"), &source)
            .await
            .expect("fetch_from_url");

        assert_eq!(meta.filesize, 16);
        assert_eq!(meta.mimetype, "text/plain");
        assert_eq!(meta.acl, AccessLevel::Private);

        let data = meta.reader.bytes().await.expect("read body");
        assert_eq!(data.as_ref(), body);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running RGW"]
    async fn test_should_release_unread_body() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "close").await;
        put_test_object(&client, &bucket, "a.bin", b"0123456789", "application/octet-stream", None)
            .await;

        let source = source_bucket(&bucket);
        for _ in 0..3 {
            let meta = fetch_file_meta(&source, "a.bin").await.expect("fetch_file_meta");
            assert_eq!(meta.filesize, 10);
            meta.reader.close();
        }

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running RGW"]
    async fn test_should_fail_on_missing_object() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "missing").await;

        let source = source_bucket(&bucket);
        let result = fetch_file_meta(&source, "does-not-exist").await;
        assert!(matches!(
            result,
            Err(CephMetaError::NotSuccessHttpStatus { status }) if status == StatusCode::NOT_FOUND
        ));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running RGW"]
    async fn test_should_fail_on_empty_object() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "empty").await;
        put_test_object(&client, &bucket, "empty.txt", b"", "text/plain", None).await;

        let source = source_bucket(&bucket);
        let result = fetch_file_meta(&source, "empty.txt").await;
        assert!(matches!(result, Err(CephMetaError::FileInvalidSize)));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running RGW"]
    async fn test_should_reject_url_outside_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "outside").await;

        let source = source_bucket(&bucket);
        let result = fetch_from_url(&object_url("some-other-bucket", "a.txt"), &source).await;
        assert!(matches!(result, Err(CephMetaError::EmptyObjectKey { .. })));

        cleanup_bucket(&client, &bucket).await;
    }
}
