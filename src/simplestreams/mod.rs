//! Multi-source lookup: index -> products -> records, for every base URL.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::cloud::ResultRecord;
use crate::constraint::Constraint;
use crate::error::{ErrorKind, Result, SourceFailure, SourceFailures, StreamsError};
use crate::fetch::{CachingDataSource, DataSource, join_url};
use crate::matcher;
use crate::resolver::{self, IndexQuery};
use crate::signing::{self, Keyring, SignaturePolicy};

/// Where the index lives below each base URL.
pub const DEFAULT_INDEX_PATH: &str = "streams/v1/index.json";

/// Public Ubuntu cloud image catalog.
pub const DEFAULT_BASE_URL: &str = "https://cloud-images.ubuntu.com/releases/";

/// Resolves constraints against an ordered list of catalog sources.
pub struct Simplestreams {
    source: Arc<dyn DataSource>,
    keyring: Keyring,
    deadline: Option<Duration>,
}

impl Simplestreams {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            keyring: Keyring::new(),
            deadline: None,
        }
    }

    /// Keys trusted when verifying `.sjson` sidecars.
    pub fn with_keyring(mut self, keyring: Keyring) -> Self {
        self.keyring = keyring;
        self
    }

    /// Upper bound for a whole [`Simplestreams::fetch`] call. When it
    /// elapses, in-flight fetches are dropped and `Cancelled` is returned.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Look `constraint` up in every base URL and concatenate what matched,
    /// in base URL order. Identical records from different sources are kept.
    ///
    /// A source that fails is skipped. The call only fails when nothing
    /// matched and at least one source failed, when no base URL was given,
    /// when the constraint itself is unusable, or when the deadline elapsed.
    pub async fn fetch(
        &self,
        base_urls: &[String],
        index_path: &str,
        constraint: &Constraint,
        require_signed: bool,
    ) -> Result<Vec<ResultRecord>> {
        let ids = constraint.ids()?;
        if base_urls.is_empty() {
            return Err(StreamsError::AllSourcesFailed(SourceFailures::default()));
        }

        let cache = CachingDataSource::new(self.source.as_ref());
        let lookup = SourceLookup {
            cache: &cache,
            keyring: &self.keyring,
            policy: SignaturePolicy::from(require_signed),
            index_path,
            constraint,
            ids: &ids,
        };

        let pending = join_all(base_urls.iter().map(|base_url| lookup.run(base_url)));
        let outcomes = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, pending)
                .await
                .map_err(|_| StreamsError::Cancelled(deadline))?,
            None => pending.await,
        };

        let mut records = Vec::new();
        let mut failures = Vec::new();
        for (base_url, outcome) in base_urls.iter().zip(outcomes) {
            match outcome {
                Ok(found) => {
                    debug!(base_url = base_url.as_str(), records = found.len(), "source resolved");
                    records.extend(found);
                }
                Err(err) if err.kind() == ErrorKind::Configuration => return Err(err),
                Err(err) => {
                    warn!(base_url = base_url.as_str(), error = %err, "skipping metadata source");
                    failures.push(SourceFailure::new(base_url.as_str(), err));
                }
            }
        }

        if records.is_empty() && !failures.is_empty() {
            return Err(StreamsError::AllSourcesFailed(SourceFailures::new(failures)));
        }

        info!(
            records = records.len(),
            sources = base_urls.len(),
            failed = failures.len(),
            "metadata lookup finished"
        );
        Ok(records)
    }
}

/// Everything one base URL needs; shared by all sources of a call.
struct SourceLookup<'a> {
    cache: &'a CachingDataSource<'a>,
    keyring: &'a Keyring,
    policy: SignaturePolicy,
    index_path: &'a str,
    constraint: &'a Constraint,
    ids: &'a [String],
}

impl SourceLookup<'_> {
    async fn run(&self, base_url: &str) -> Result<Vec<ResultRecord>> {
        let index_url = join_url(base_url, self.index_path);
        let index_bytes = self.fetch_verified(&index_url).await?;
        let query = IndexQuery {
            data_type: self.constraint.data_type(),
            ids: self.ids,
            cloud: self.constraint.cloud(),
        };
        let Some(entry) = resolver::resolve(&index_bytes, &index_url, &query)? else {
            return Ok(Vec::new());
        };

        let products_url = resolver::products_url(base_url, &entry);
        let products_bytes = self.fetch_verified(&products_url).await?;
        let mut records = matcher::match_products(&products_bytes, &products_url, self.constraint)?;
        for record in &mut records {
            record.resolve_paths(base_url);
        }
        Ok(records)
    }

    /// Fetch `url` and check its sidecar according to the policy, before
    /// anything parses the bytes.
    async fn fetch_verified(&self, url: &str) -> Result<Vec<u8>> {
        let content = self.cache.fetch(url).await?;
        let sidecar = signing::sidecar_url(url);

        match self.policy {
            SignaturePolicy::Required => {
                let signature = self.cache.fetch(&sidecar).await.map_err(|err| {
                    if err.is_not_found() {
                        StreamsError::SignatureMissing {
                            url: url.to_string(),
                        }
                    } else {
                        err
                    }
                })?;
                signing::verify(&content, &signature, self.keyring, url)?;
                debug!(url, "signature verified");
            }
            SignaturePolicy::BestEffort if self.keyring.is_empty() => {}
            SignaturePolicy::BestEffort => match self.cache.fetch(&sidecar).await {
                Ok(signature) => match signing::verify(&content, &signature, self.keyring, url) {
                    Ok(()) => debug!(url, "signature verified"),
                    Err(err) => warn!(url, error = %err, "using document with an invalid signature"),
                },
                Err(err) if err.is_not_found() => debug!(url, "document is not signed"),
                Err(err) => warn!(url, error = %err, "cannot fetch signature"),
            },
        }

        Ok(content)
    }
}
