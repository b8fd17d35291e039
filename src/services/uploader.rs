use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

use crate::{
    domain::models::{
        file::ImageData,
        remote::{AttemptOutcome, RemoteReference, UploadAttempt},
    },
    services::{
        connection::ConnectionManager, error::StorageError, retry::RetryPolicy,
        transport::StorageTransport,
    },
};

/// Terminal result of one `upload` call. Exactly one reference is handed
/// out, corresponding to the attempt that succeeded.
#[derive(Debug)]
pub struct UploadOutcome {
    pub reference: RemoteReference,
    pub attempts: u32,
}

/// Performs one transfer under timeout and retry policy, reusing the shared
/// Session and asking the ConnectionManager to replace it when a failure
/// shows the Session itself went bad.
pub struct UploadExecutor {
    connection: Arc<ConnectionManager>,
    transport: Arc<dyn StorageTransport>,
    policy: RetryPolicy,
    upload_timeout: Duration,
}

impl UploadExecutor {
    pub fn new(
        connection: Arc<ConnectionManager>,
        transport: Arc<dyn StorageTransport>,
        policy: RetryPolicy,
        upload_timeout: Duration,
    ) -> Self {
        Self {
            connection,
            transport,
            policy,
            upload_timeout,
        }
    }

    pub async fn upload(
        &self,
        destination: &str,
        image: &ImageData,
    ) -> Result<UploadOutcome, StorageError> {
        validate_destination(destination)?;

        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let session = self.connection.get_session().await?;

            let started = Instant::now();
            let result = match tokio::time::timeout(
                self.upload_timeout,
                self.transport.put_object(session.token(), destination, image),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(StorageError::Timeout),
            };

            match result {
                Ok(reference) => {
                    log_attempt(
                        &UploadAttempt {
                            destination: destination.to_string(),
                            byte_len: image.size(),
                            elapsed: started.elapsed(),
                            outcome: AttemptOutcome::Succeeded,
                        },
                        attempts,
                    );
                    return Ok(UploadOutcome {
                        reference,
                        attempts,
                    });
                }
                Err(e) => {
                    if e.invalidates_session() {
                        self.connection.invalidate(&session).await;
                    }

                    let retrying = e.is_transient() && self.policy.has_attempts_left(attempts);
                    log_attempt(
                        &UploadAttempt {
                            destination: destination.to_string(),
                            byte_len: image.size(),
                            elapsed: started.elapsed(),
                            outcome: if retrying {
                                AttemptOutcome::RetryScheduled
                            } else {
                                AttemptOutcome::Failed
                            },
                        },
                        attempts,
                    );

                    if retrying {
                        tokio::time::sleep(self.policy.backoff_delay(attempts)).await;
                    } else if e.is_transient() {
                        return Err(StorageError::RetriesExhausted {
                            attempts,
                            last: Box::new(e),
                        });
                    } else {
                        return Err(e);
                    }
                }
            }
        }
    }
}

/// Destination must be a relative path with no traversal segments.
fn validate_destination(destination: &str) -> Result<(), StorageError> {
    if destination.trim().is_empty() {
        return Err(StorageError::InvalidDestination(
            "destination is empty".to_string(),
        ));
    }
    if destination.starts_with('/') || destination.contains('\\') {
        return Err(StorageError::InvalidDestination(destination.to_string()));
    }
    if destination.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidDestination(destination.to_string()));
    }
    Ok(())
}

fn log_attempt(attempt: &UploadAttempt, attempt_number: u32) {
    match attempt.outcome {
        AttemptOutcome::Succeeded => info!(
            destination = %attempt.destination,
            bytes = attempt.byte_len,
            elapsed_ms = attempt.elapsed.as_millis() as u64,
            attempt = attempt_number,
            outcome = attempt.outcome_label(),
            "Upload attempt finished"
        ),
        _ => warn!(
            destination = %attempt.destination,
            bytes = attempt.byte_len,
            elapsed_ms = attempt.elapsed.as_millis() as u64,
            attempt = attempt_number,
            outcome = attempt.outcome_label(),
            "Upload attempt finished"
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    enum PutStep {
        Succeed(&'static str),
        Fail(StorageError),
        Hang,
    }

    struct ScriptedTransport {
        connects: AtomicU32,
        puts: AtomicU32,
        put_script: Mutex<VecDeque<PutStep>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<PutStep>) -> Self {
            Self {
                connects: AtomicU32::new(0),
                puts: AtomicU32::new(0),
                put_script: Mutex::new(script.into()),
            }
        }

        fn put_count(&self) -> u32 {
            self.puts.load(Ordering::SeqCst)
        }

        fn connect_count(&self) -> u32 {
            self.connects.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StorageTransport for ScriptedTransport {
        async fn connect(&self) -> Result<String, StorageError> {
            let n = self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(format!("token-{n}"))
        }

        async fn put_object(
            &self,
            _token: &str,
            _destination: &str,
            _image: &ImageData,
        ) -> Result<RemoteReference, StorageError> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            let step = self.put_script.lock().unwrap().pop_front();
            match step {
                None => Ok(RemoteReference::new("images/default.png")),
                Some(PutStep::Succeed(locator)) => Ok(RemoteReference::new(locator)),
                Some(PutStep::Fail(e)) => Err(e),
                Some(PutStep::Hang) => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        }
    }

    fn executor(transport: Arc<ScriptedTransport>, max_attempts: u32) -> UploadExecutor {
        let policy = RetryPolicy::new(max_attempts, Duration::from_millis(10));
        let connection = Arc::new(ConnectionManager::new(
            Arc::clone(&transport) as Arc<dyn StorageTransport>,
            policy,
            Duration::from_secs(1),
        ));
        UploadExecutor::new(connection, transport, policy, Duration::from_secs(30))
    }

    fn image() -> ImageData {
        ImageData::new(vec![1, 2, 3], "logo.png".into(), "image/png".into())
    }

    #[tokio::test(start_paused = true)]
    async fn traversal_path_is_rejected_before_any_network_call() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let executor = executor(Arc::clone(&transport), 3);

        let err = executor
            .upload("../../etc/passwd", &image())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidDestination(_)));
        assert_eq!(transport.connect_count(), 0);
        assert_eq!(transport.put_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_and_absolute_destinations_are_rejected() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let executor = executor(Arc::clone(&transport), 3);

        for destination in ["", "   ", "/etc/passwd", "images\\logo.png"] {
            let err = executor.upload(destination, &image()).await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidDestination(_)));
        }
        assert_eq!(transport.put_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_then_success_yield_one_reference() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            PutStep::Fail(StorageError::Timeout),
            PutStep::Fail(StorageError::Network("reset".into())),
            PutStep::Succeed("images/logo.png"),
        ]));
        let executor = executor(Arc::clone(&transport), 3);

        let outcome = executor.upload("images/logo.png", &image()).await.unwrap();
        assert_eq!(outcome.reference.as_str(), "images/logo.png");
        assert_eq!(outcome.attempts, 3);
        assert_eq!(transport.put_count(), 3);
        // session survives plain transient failures
        assert_eq!(transport.connect_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_failure_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![PutStep::Fail(
            StorageError::QuotaExceeded,
        )]));
        let executor = executor(Arc::clone(&transport), 3);

        let err = executor.upload("images/logo.png", &image()).await.unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded));
        assert_eq!(transport.put_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_carry_attempt_count_and_last_cause() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            PutStep::Fail(StorageError::Timeout),
            PutStep::Fail(StorageError::Timeout),
            PutStep::Fail(StorageError::Unavailable("503".into())),
        ]));
        let executor = executor(Arc::clone(&transport), 3);

        match executor.upload("images/logo.png", &image()).await.unwrap_err() {
            StorageError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, StorageError::Unavailable(_)));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn expired_session_is_replaced_before_the_next_attempt() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            PutStep::Fail(StorageError::SessionExpired),
            PutStep::Succeed("images/logo.png"),
        ]));
        let executor = executor(Arc::clone(&transport), 3);

        let outcome = executor.upload("images/logo.png", &image()).await.unwrap();
        assert_eq!(outcome.attempts, 2);
        // first attempt used the initial session, second a fresh one
        assert_eq!(transport.connect_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_upload_leaves_the_session_usable() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            PutStep::Hang,
            PutStep::Succeed("images/logo.png"),
        ]));
        let executor = Arc::new(executor(Arc::clone(&transport), 3));

        let task = tokio::spawn({
            let executor = Arc::clone(&executor);
            async move { executor.upload("images/logo.png", &image()).await }
        });
        // let the first attempt start and hang, then cancel it mid-transfer
        tokio::time::sleep(Duration::from_millis(1)).await;
        task.abort();
        assert!(task.await.is_err());
        assert_eq!(transport.put_count(), 1);

        // the shared session is untouched; the next upload reuses it
        let outcome = executor.upload("images/logo.png", &image()).await.unwrap();
        assert_eq!(outcome.attempts, 1);
        assert_eq!(transport.connect_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_transfer_times_out_and_is_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            PutStep::Hang,
            PutStep::Succeed("images/logo.png"),
        ]));
        let executor = executor(Arc::clone(&transport), 3);

        let outcome = executor.upload("images/logo.png", &image()).await.unwrap();
        assert_eq!(outcome.attempts, 2);
        assert_eq!(transport.put_count(), 2);
    }
}
