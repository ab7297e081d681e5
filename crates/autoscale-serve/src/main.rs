//! `autoscale-serve`: decision service and policy tooling

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use autoscale_rl_agent::{ArtifactPolicy, PolicyArtifact, PolicyModel, ThresholdPolicy};
use autoscale_rl_core::{DiscreteSpace, Policy, RandomPolicy};
use autoscale_rl_env::{CloudEnvConfig, CloudObservation, ScalingAction};
use autoscale_serve::{PolicyHandle, ServeConfig};

#[derive(Parser)]
#[command(name = "autoscale-serve")]
#[command(about = "Autoscaling policy service", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve decisions over HTTP
    Serve {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Listen address
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Policy artifact to load
        #[arg(short, long)]
        policy: Option<PathBuf>,

        /// Sample actions instead of taking the greedy one
        #[arg(long)]
        stochastic: bool,
    },

    /// Evaluate a policy in the simulator
    Rollout {
        /// Policy artifact to evaluate
        #[arg(short, long, required_unless_present = "random", conflicts_with = "random")]
        policy: Option<PathBuf>,

        /// Evaluate a uniformly random policy
        #[arg(long)]
        random: bool,

        /// Number of episodes
        #[arg(short = 'n', long, default_value = "10")]
        episodes: usize,

        /// Seed for the workload and the policy
        #[arg(short, long)]
        seed: Option<u64>,

        /// Sample actions from the policy instead of taking the greedy one
        #[arg(long)]
        stochastic: bool,

        /// Log every step
        #[arg(long)]
        render: bool,
    },

    /// Write the threshold baseline as a policy artifact
    ExportBaseline {
        /// Destination file
        #[arg(short, long)]
        output: PathBuf,

        /// Add a unit above this per-unit load
        #[arg(long, default_value = "0.8")]
        scale_up_above: f64,

        /// Remove a unit below this per-unit load
        #[arg(long, default_value = "0.4")]
        scale_down_below: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            bind,
            policy,
            stochastic,
        } => {
            let mut settings = match config {
                Some(path) => ServeConfig::load(&path).with_context(|| format!("loading {}", path.display()))?,
                None => ServeConfig::default(),
            };
            if let Some(bind) = bind {
                settings.bind = bind;
            }
            if let Some(policy) = policy {
                settings.policy_path = policy;
            }
            if stochastic {
                settings.deterministic = false;
            }

            let handle = PolicyHandle::init(&settings)
                .await
                .with_context(|| format!("failed to load policy from {}", settings.policy_path.display()))?;
            autoscale_serve::run(handle, settings.bind, autoscale_serve::shutdown_signal()).await?;
        }

        Commands::Rollout {
            policy,
            random,
            episodes,
            seed,
            stochastic,
            render,
        } => {
            let policy: Box<dyn Policy<Observation = CloudObservation, Action = ScalingAction>> = match policy {
                Some(path) if !random => {
                    let artifact = PolicyArtifact::load(&path)
                        .await
                        .with_context(|| format!("failed to load policy from {}", path.display()))?;
                    Box::new(ArtifactPolicy::new(Arc::new(artifact), !stochastic))
                }
                _ => Box::new(RandomPolicy::<CloudObservation, _>::new(DiscreteSpace::<ScalingAction>::new())),
            };

            let config = CloudEnvConfig {
                seed,
                ..CloudEnvConfig::default()
            };
            let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
            let summary = autoscale_serve::evaluate(config, policy.as_ref(), episodes, render, &mut rng)?;
            println!(
                "Average reward over {} episodes: {:.2}",
                summary.episode_rewards.len(),
                summary.mean_reward
            );
        }

        Commands::ExportBaseline {
            output,
            scale_up_above,
            scale_down_below,
        } => {
            let baseline = ThresholdPolicy {
                scale_up_above,
                scale_down_below,
            };
            baseline.validate()?;
            PolicyArtifact::new("threshold-baseline", PolicyModel::Threshold(baseline))
                .save(&output)
                .await
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Baseline policy written to {}", output.display());
        }
    }

    Ok(())
}
