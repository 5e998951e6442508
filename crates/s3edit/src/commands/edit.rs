//! The edit workflow: fetch, edit locally, conditionally write back
//!
//! Strictly sequential: signed GET, blocking editor session, signed PUT,
//! and a cache purge when the PUT is rejected. Read-only mode stops after
//! the editor session without ever issuing a PUT.

use anyhow::Result;
use s3edit_core::{
    edit_in_editor, CachePurger, CredentialOverrides, Credentials, Error, ObjectLocation,
    ObjectStoreClient,
};
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::output;

/// Optional override for the purge endpoint (staging and test rigs)
const CACHE_ENDPOINT_ENV: &str = "S3EDIT_CACHE_ENDPOINT";

pub async fn run(args: Cli) -> Result<()> {
    let location = ObjectLocation::new(&args.bucket, &args.file)?;

    let overrides = CredentialOverrides {
        access_key: args.key,
        secret_key: args.secret,
        region: args.region,
    };
    let credentials = Credentials::resolve(
        overrides,
        args.profile.as_deref(),
        Credentials::default_credentials_path().as_deref(),
    )?;

    let mut client = ObjectStoreClient::new(credentials)?;
    if let Some(endpoint) = &args.endpoint {
        client = client.with_endpoint(endpoint);
    }

    let fetched = client.fetch(&location).await?;
    let edited = edit_in_editor(&fetched.body, location.filename()).await?;

    if args.readonly {
        output::info("read-only session, leaving the object untouched");
        return Ok(());
    }

    // the edited text is always written back, unchanged or not
    match client
        .put(&location, &edited, fetched.content_type.as_deref())
        .await
    {
        Ok(()) => {
            output::success(&format!(
                "wrote s3://{}{}",
                location.bucket(),
                location.path()
            ));
            Ok(())
        }
        Err(err) => {
            // a rejected write may leave the edge cache holding a copy
            // that no longer matches the store
            if matches!(err, Error::RemoteStatus { .. }) {
                purge_cache(location.path()).await;
            }
            Err(err.into())
        }
    }
}

/// Purge the edge cache for the object path, awaiting the response. The
/// purge outcome never changes this invocation's exit status.
async fn purge_cache(path: &str) {
    let purger = match CachePurger::new() {
        Ok(purger) => purger,
        Err(err) => {
            warn!("skipping cache purge: {}", err);
            return;
        }
    };
    let purger = match std::env::var(CACHE_ENDPOINT_ENV) {
        Ok(endpoint) => purger.with_endpoint(&endpoint),
        Err(_) => purger,
    };
    debug!("purging edge cache for {}", path);
    purger.purge(path).await;
}
