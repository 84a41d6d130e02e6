//! Core of the `zkcp` tool: copies a ZooKeeper subtree from one ensemble to another
//!
//! The entry point is [`replicate`], which checks the source root, optionally resets the
//! destination root ([`reset::reset`]) and then walks the source tree ([`copy::copy`]),
//! materializing destination ancestors on the way ([`materialize::ensure_path`]).
//!
//! Every failure is fatal: the first error stops the run and is returned to the caller along
//! with the [`Summary`] of what had been done. Re-running the copy is the way to recover, since
//! both ancestor creation and data writes are idempotent.
//!
//! Binaries drive the async code through [`run`], which sets up logging, the runtime and the
//! operations throttle.

use tracing::instrument;

pub mod client;
pub mod config;
pub mod copy;
pub mod error;
pub mod materialize;
pub mod reset;
pub mod zookeeper;
pub mod znode;

#[cfg(test)]
mod testutils;

pub use client::{ClientError, Coordinator, NodeRecord};
pub use config::{OutputConfig, ThrottleConfig};
pub use copy::Summary;
pub use error::{Error, ErrorKind};

#[derive(Debug, Copy, Clone, Default)]
pub struct Settings {
    /// Delete the destination root before copying
    pub update: bool,
    /// Suppress per-node progress lines
    pub quiet: bool,
}

/// Copies the subtree at `src` on `src_client` to `dst` on `dst_client`.
///
/// The source root must exist; this is checked before anything on the destination is touched.
/// With `settings.update` the destination root is deleted first.
#[instrument(skip(src_client, dst_client))]
pub async fn replicate<S: Coordinator, D: Coordinator>(
    src_client: &S,
    dst_client: &D,
    src: &str,
    dst: &str,
    settings: &Settings,
) -> Result<Summary, copy::Error> {
    let dst = znode::normalize(dst);
    let src_exists = src_client.exists(src).await.map_err(|err| {
        copy::Error::new(
            Error::new(ErrorKind::SourceRead, src, err),
            Default::default(),
        )
    })?;
    if !src_exists {
        return Err(copy::Error::new(
            Error::new(ErrorKind::SourceMissing, src, ClientError::NoNode),
            Default::default(),
        ));
    }
    let summary = if settings.update {
        reset::reset(
            dst_client,
            &dst,
            &reset::Settings {
                quiet: settings.quiet,
            },
        )
        .await?
    } else {
        Summary::default()
    };
    let copy_summary = copy::copy(
        src_client,
        dst_client,
        src,
        &dst,
        &copy::Settings {
            quiet: settings.quiet,
        },
    )
    .await
    .map_err(|err| copy::Error::new(err.source, summary + err.summary))?;
    Ok(summary + copy_summary)
}

/// Runs `func` to completion on a fresh runtime with logging and throttling configured.
///
/// Returns `None` if `func` failed; the error has been logged by then (unless quiet). The
/// summary is printed to stdout when requested or when running verbosely.
pub fn run<Fut, T, E>(
    output: OutputConfig,
    throttle_config: ThrottleConfig,
    func: impl FnOnce() -> Fut,
) -> Option<T>
where
    T: std::fmt::Display,
    E: std::fmt::Display,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(output.log_level()))
        .with_writer(std::io::stderr)
        .init();
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            tracing::error!("failed to build the runtime: {:#}", &error);
            return None;
        }
    };
    let res = runtime.block_on(async move {
        if throttle_config.ops_throttle > 0 {
            let (tokens, interval) = throttle::replenish_schedule(throttle_config.ops_throttle);
            tracing::debug!("throttling to {tokens} ops every {interval:?}");
            throttle::init_ops_tokens(tokens);
            tokio::spawn(throttle::run_ops_replenish_thread(tokens, interval));
        }
        func().await
    });
    match res {
        Ok(summary) => {
            if output.print_summary || output.verbose > 0 {
                println!("{summary}");
            }
            Some(summary)
        }
        Err(error) => {
            tracing::error!("{:#}", &error);
            None
        }
    }
}
