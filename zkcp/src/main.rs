use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::instrument;

use zkcp_tools_zkcp::validate::Plan;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "zkcp",
    version,
    about = "Copy a ZooKeeper subtree, including node data, from one ensemble to another",
    long_about = "`zkcp` recursively copies a ZooKeeper subtree and the data of every node in it from a source ensemble to a destination ensemble.

Every visited node is overwritten on the destination regardless of its version. Missing ancestors of the destination path are created as empty nodes. Nodes that exist only on the destination are left alone.

The first error aborts the copy, leaving the destination partially written. Re-running the same command is safe and completes the copy.

EXAMPLES:
    # Copy /app from one ensemble to /backup/app on another
    zkcp --source-zk zk1:2181,zk2:2181 --destination-zk zk9:2181 --source-path /app --destination-path /backup/app

    # Delete the destination node first, then copy
    zkcp --source-zk zk1:2181 --destination-zk zk9:2181 --source-path /app --destination-path /app --update"
)]
struct Args {
    // Source & destination
    /// Source ensemble, comma-separated list of host:port
    #[arg(long, value_name = "ENDPOINTS", help_heading = "Source & destination")]
    source_zk: String,

    /// Destination ensemble, comma-separated list of host:port
    #[arg(long, value_name = "ENDPOINTS", help_heading = "Source & destination")]
    destination_zk: String,

    /// Absolute path of the subtree to copy (no trailing '/', except for the root)
    #[arg(long, value_name = "PATH", help_heading = "Source & destination")]
    source_path: String,

    /// Absolute path the subtree is copied to
    #[arg(long, value_name = "PATH", help_heading = "Source & destination")]
    destination_path: String,

    // Copy options
    /// Delete the destination node before copying
    ///
    /// Only the destination node itself is deleted; if it has children ZooKeeper refuses and
    /// the copy is aborted. A missing destination node is not an error.
    #[arg(long, help_heading = "Copy options")]
    update: bool,

    /// Time allowed for establishing each connection
    ///
    /// Accepts human-readable durations like "500ms", "10s", "1min". Applies to connecting
    /// only, individual requests are not timed out.
    #[arg(
        long,
        default_value = "10s",
        value_name = "DURATION",
        value_parser = humantime::parse_duration,
        help_heading = "Copy options"
    )]
    connect_timeout: std::time::Duration,

    // Progress & output
    /// Print summary at the end
    #[arg(long, help_heading = "Progress & output")]
    summary: bool,

    /// Verbose level (implies "summary"): -v INFO / -vv DEBUG / -vvv TRACE (default: ERROR)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help_heading = "Progress & output")]
    verbose: u8,

    /// Quiet mode, don't print progress or report errors
    #[arg(short = 'q', long = "quiet", help_heading = "Progress & output")]
    quiet: bool,

    // Performance & throttling
    /// Throttle the number of nodes processed per second, 0 means no throttle
    #[arg(
        long,
        default_value = "0",
        value_name = "N",
        help_heading = "Performance & throttling"
    )]
    ops_throttle: usize,
}

#[instrument]
async fn async_main(args: Args) -> Result<common::Summary> {
    let plan = Plan::new(
        &args.source_zk,
        &args.destination_zk,
        &args.source_path,
        &args.destination_path,
    )?;
    let src_client = common::zookeeper::connect(&plan.source_endpoints, args.connect_timeout)
        .await
        .context("failed to connect to source ZooKeeper")?;
    let dst_client =
        common::zookeeper::connect(&plan.destination_endpoints, args.connect_timeout)
            .await
            .context("failed to connect to destination ZooKeeper")?;
    let summary = match common::replicate(
        &src_client,
        &dst_client,
        &plan.source_path,
        &plan.destination_path,
        &common::Settings {
            update: args.update,
            quiet: args.quiet,
        },
    )
    .await
    {
        Ok(summary) => summary,
        Err(error) => {
            if args.summary {
                return Err(anyhow!("{}\n\n{}", error, &error.summary));
            }
            return Err(anyhow!("{}", error));
        }
    };
    if !args.quiet {
        println!("Done.");
    }
    Ok(summary)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let func = {
        let args = args.clone();
        || async_main(args)
    };
    let output = common::OutputConfig {
        quiet: args.quiet,
        verbose: args.verbose,
        print_summary: args.summary,
    };
    let throttle = common::ThrottleConfig {
        ops_throttle: args.ops_throttle,
    };
    let res = common::run(output, throttle, func);
    if res.is_none() {
        std::process::exit(1);
    }
    Ok(())
}
