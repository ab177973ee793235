use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, ValueHint};
use serde::Serialize;

use dh_arm_kinematics::actuation::{DryRunActuator, ServoPwm};
use dh_arm_kinematics::ik_solver::{IkConfig, IkResult, IkSolver, IkTarget};
use dh_arm_kinematics::jacobian::Jacobian;
use dh_arm_kinematics::kinematic_traits::Pose;
use dh_arm_kinematics::kinematics_impl::ChainModel;
use dh_arm_kinematics::parameters_from_file::ChainConfig;
use dh_arm_kinematics::parameters_robots;
use dh_arm_kinematics::presets::Presets;
use dh_arm_kinematics::utils::{dump_pose, format_joints};

#[derive(Parser)]
#[command(version, propagate_version = true)]
#[command(about = "Forward and inverse kinematics of DH serial arms", long_about = None)]
struct Args {
    /// Chain description (YAML). Takes precedence over --robot.
    #[arg(short = 'c', long = "config", value_name = "FILE", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// Built-in chain: two_link_planar, three_link_planar or desktop_arm_6dof.
    #[arg(short = 'r', long = "robot", default_value = "desktop_arm_6dof")]
    robot: String,
    /// Named presets (YAML).
    #[arg(short = 'p', long = "presets", value_name = "FILE", value_hint = ValueHint::FilePath)]
    presets: Option<PathBuf>,
    /// Print results as JSON.
    #[arg(long)]
    json: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Commands.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// End-effector pose and link positions for the given angles (degrees).
    Forward {
        #[arg(allow_negative_numbers = true, required = true)]
        angles: Vec<f64>,
    },
    /// Numeric Jacobian at the given angles (degrees).
    Jacobian {
        #[arg(allow_negative_numbers = true, required = true)]
        angles: Vec<f64>,
        /// Finite difference step, degrees.
        #[arg(long, default_value_t = 1e-6)]
        epsilon: f64,
    },
    /// Solve for a target, starting from the chain's initial angles.
    Inverse {
        #[command(flatten)]
        target: TargetArgs,
        #[command(flatten)]
        solver: SolverArgs,
    },
    /// Move to joint angles or a preset, executed by a dry run actuator.
    Move {
        /// Target angles (degrees).
        #[arg(allow_negative_numbers = true, conflicts_with = "preset")]
        angles: Vec<f64>,
        /// Use a named preset as the target.
        #[arg(long)]
        preset: Option<String>,
        /// Duration of the move, seconds.
        #[arg(short, long, default_value_t = 1.0)]
        duration: f64,
        /// Pace the dry run in real time.
        #[arg(long)]
        realtime: bool,
    },
    /// Manage named presets.
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
    /// Print the chain description as YAML.
    Config,
}

#[derive(clap::Subcommand)]
enum PresetAction {
    /// List all presets.
    List,
    /// Store angles (degrees) under a name.
    Save {
        name: String,
        #[arg(allow_negative_numbers = true, required = true)]
        angles: Vec<f64>,
    },
    /// Delete a preset.
    Remove { name: String },
}

#[derive(clap::Args)]
struct TargetArgs {
    #[arg(short, allow_negative_numbers = true)]
    x: f64,
    #[arg(short, allow_negative_numbers = true)]
    y: f64,
    #[arg(short, allow_negative_numbers = true)]
    z: f64,
    /// Roll, pitch and yaw (degrees). Defaults to 0, 0, 0.
    #[arg(long, num_args = 3, allow_negative_numbers = true, value_names = ["ROLL", "PITCH", "YAW"])]
    orientation: Option<Vec<f64>>,
    /// Ignore orientation, solve for the position only.
    #[arg(long, conflicts_with = "orientation")]
    position_only: bool,
}

impl TargetArgs {
    fn target(&self) -> IkTarget {
        let position = [self.x, self.y, self.z];
        if self.position_only {
            return IkTarget::Position(position);
        }
        let orientation = self.orientation.as_ref().map(|o| [o[0], o[1], o[2]]);
        IkTarget::pose(position, orientation)
    }
}

#[derive(clap::Args)]
struct SolverArgs {
    /// Seed angles (degrees) instead of the chain's initial angles.
    #[arg(long, num_args = 1.., allow_negative_numbers = true)]
    seed: Option<Vec<f64>>,
    #[arg(long, default_value_t = 100)]
    max_iterations: usize,
    #[arg(long, default_value_t = 1e-3)]
    tolerance: f64,
    #[arg(long, default_value_t = 0.1)]
    step_factor: f64,
}

impl SolverArgs {
    fn config(&self) -> IkConfig {
        IkConfig {
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            step_factor: self.step_factor,
            ..IkConfig::default()
        }
    }
}

#[derive(Serialize)]
struct ForwardReport {
    angles: Vec<f64>,
    pose: Pose,
    degenerate: bool,
    links: Vec<[f64; 3]>,
}

#[derive(Serialize)]
struct InverseReport {
    target: IkTarget,
    result: IkResult,
    pose: Pose,
}

#[derive(Serialize)]
struct MoveReport {
    from: Vec<f64>,
    to: Vec<f64>,
    steps: usize,
    duty_cycles: Vec<f64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut log_config = simplelog::ConfigBuilder::new();
    log_config.set_target_level(log::LevelFilter::Off);
    log_config.set_location_level(log::LevelFilter::Off);

    let log_level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let mut chain = load_chain(&args)?;
    log::debug!("Chain of {} joints at {}", chain.dof(), format_joints(chain.current_angles()));

    match &args.command {
        Command::Forward { angles } => {
            let pose = chain.end_effector_pose(angles)?;
            let report = ForwardReport {
                angles: angles.clone(),
                pose,
                degenerate: pose.is_degenerate(),
                links: chain.link_positions(angles)?,
            };
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                dump_pose(&pose);
                for (i, link) in report.links.iter().enumerate() {
                    println!("frame {}: [{:.5}, {:.5}, {:.5}]", i, link[0], link[1], link[2]);
                }
            }
        }
        Command::Jacobian { angles, epsilon } => {
            chain.validate(angles)?;
            let jacobian = Jacobian::new(&chain, angles, *epsilon)?;
            if args.json {
                let rows: Vec<Vec<f64>> =
                    jacobian.matrix().row_iter().map(|row| row.iter().copied().collect()).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{:.6}", jacobian.matrix());
            }
        }
        Command::Inverse { target, solver } => {
            let report = solve_inverse(&chain, target, solver)?;
            let failure = report.result.failure();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let result = &report.result;
                println!(
                    "{:?} after {} iterations, error {:.6}",
                    result.status, result.iterations, result.error_norm
                );
                println!("{}", format_joints(&result.angles));
                dump_pose(&report.pose);
            }
            if let Some(err) = failure {
                return Err(err.into());
            }
        }
        Command::Move { angles, preset, duration, realtime } => {
            let target = match preset {
                Some(name) => load_presets(&args)?.require(name)?.clone(),
                None if angles.is_empty() => bail!("either target angles or --preset is required"),
                None => angles.clone(),
            };
            let from = chain.current_angles().to_vec();
            let servo = ServoPwm::default();
            let mut actuator = DryRunActuator::new().realtime(*realtime).with_servo(servo);
            let duration = Duration::try_from_secs_f64(*duration).context("invalid duration")?;
            let steps = chain.plan_move(&target, duration)?.len();
            chain.move_to_angles(&target, duration, &mut actuator)?;

            let report = MoveReport {
                from,
                to: chain.current_angles().to_vec(),
                steps,
                duty_cycles: servo.duty_cycles(chain.current_angles()),
            };
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} -> {} in {} steps", format_joints(&report.from), format_joints(&report.to), steps);
                println!("duty cycles {}", format_joints(&report.duty_cycles));
            }
        }
        Command::Preset { action } => {
            let path = args.presets.as_ref().context("--presets FILE is required")?;
            let mut presets = if path.exists() { Presets::from_yaml_file(path)? } else { Presets::new() };
            match action {
                PresetAction::List => {
                    if args.json {
                        let all: std::collections::BTreeMap<&str, &Vec<f64>> = presets.iter().collect();
                        println!("{}", serde_json::to_string_pretty(&all)?);
                    } else {
                        for (name, angles) in presets.iter() {
                            println!("{}: {}", name, format_joints(angles));
                        }
                    }
                }
                PresetAction::Save { name, angles } => {
                    chain.validate(angles)?;
                    presets.insert(name.clone(), angles.clone())?;
                    presets.save_yaml_file(path)?;
                    log::info!("Saved preset {} as {}", name, format_joints(angles));
                }
                PresetAction::Remove { name } => {
                    if presets.remove(name).is_none() {
                        bail!("no preset named {}", name);
                    }
                    presets.save_yaml_file(path)?;
                }
            }
        }
        Command::Config => {
            print!("{}", ChainConfig::from_chain(&chain).to_yaml());
        }
    }

    Ok(())
}

fn load_chain(args: &Args) -> anyhow::Result<ChainModel> {
    match &args.config {
        Some(path) => {
            let config = ChainConfig::from_yaml_file(path)
                .with_context(|| format!("failed to read chain description {}", path.display()))?;
            Ok(config.into_chain()?)
        }
        None => {
            let joints = parameters_robots::by_name(&args.robot)
                .with_context(|| format!("unknown robot {}", args.robot))?;
            Ok(ChainModel::new(joints)?)
        }
    }
}

fn solve_inverse(chain: &ChainModel, target: &TargetArgs, solver: &SolverArgs) -> anyhow::Result<InverseReport> {
    let target = target.target();
    let config = solver.config();
    let result = match &solver.seed {
        Some(seed) => IkSolver::new(config).solve(chain, &target, seed)?,
        None => chain.solve(&target, &config),
    };
    let pose = chain.end_effector_pose(&result.angles)?;
    Ok(InverseReport { target, result, pose })
}

fn load_presets(args: &Args) -> anyhow::Result<Presets> {
    let path = args.presets.as_ref().context("--presets FILE is required")?;
    Presets::from_yaml_file(path).with_context(|| format!("failed to read presets {}", path.display()))
}
