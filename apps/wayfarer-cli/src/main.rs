mod script;

use clap::{Parser, Subcommand};
use glam::Vec3;
use script::{AxisScript, KeyScript, PropScript};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;
use wayfarer_common::{SceneConfig, Transform};
use wayfarer_input::{AxisEvent, ControllerLocomotion, EventSource, KeyEvent};
use wayfarer_kernel::{CameraRig, Entity, FrameTime, Prop, StaticScene, World};
use wayfarer_render::{DebugTextRenderer, RenderView, Renderer};

#[derive(Parser)]
#[command(name = "wayfarer-cli", about = "Headless driver for the wayfarer scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default tuning
    Info,
    /// Print the default scene config as JSON
    Config,
    /// Run the demo scene for a number of ticks with scripted input
    Simulate {
        /// Number of ticks to run
        #[arg(short, long, default_value = "60")]
        ticks: u64,
        /// Frame time per tick, in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: u64,
        /// Scene config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Key event as TICK:down|up:KEY (repeatable)
        #[arg(long = "key")]
        keys: Vec<KeyScript>,
        /// Thumbstick sample as TICK:left|right:X:Y (repeatable)
        #[arg(long = "axis")]
        axes: Vec<AxisScript>,
        /// Extra prop at X:Y:Z, given a generated id (repeatable)
        #[arg(long = "prop", allow_hyphen_values = true)]
        props: Vec<PropScript>,
        /// Print the world every N ticks (0 prints only the final state)
        #[arg(long, default_value = "0")]
        print_every: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Info => {
            let config = SceneConfig::default();
            println!("wayfarer-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("player: speed={} diameter={}", config.player.move_speed, config.player.diameter);
            println!("camera: smoothing={}", config.camera.smoothing);
            println!(
                "controller: speed={} snap={:.4} rad threshold={}",
                config.controller.move_speed,
                config.controller.snap_angle,
                config.controller.deflection_threshold
            );
        }
        Commands::Config => {
            println!("{}", SceneConfig::default().to_json()?);
        }
        Commands::Simulate {
            ticks,
            frame_ms,
            config,
            keys,
            axes,
            props,
            print_every,
        } => {
            let config = match config {
                Some(path) => SceneConfig::load(path)?,
                None => SceneConfig::default(),
            };
            let input = ScriptedInput {
                keys: &keys,
                axes: &axes,
                props: &props,
            };
            simulate(&config, ticks, FrameTime::from_millis(frame_ms), input, print_every)?;
        }
    }

    Ok(())
}

/// The demo scene: a 50x50 ground whose top is at y = -1 and a unit box.
fn demo_scene() -> StaticScene {
    let mut scene = StaticScene::new();
    scene.add_ground(50.0, 50.0, -1.0);
    scene.add_box(Vec3::new(1.0, 0.0, 3.0), 1.0);
    scene
}

struct ScriptedInput<'a> {
    keys: &'a [KeyScript],
    axes: &'a [AxisScript],
    props: &'a [PropScript],
}

fn simulate(
    config: &SceneConfig,
    ticks: u64,
    frame: FrameTime,
    input: ScriptedInput<'_>,
    print_every: u64,
) -> anyhow::Result<()> {
    let mut scene = demo_scene();
    let keyboard = EventSource::<KeyEvent>::new();
    let thumbsticks = EventSource::<AxisEvent>::new();

    let mut world = World::build(config, &mut scene, &keyboard)?;
    for prop in input.props {
        world.add(Box::new(Prop::unnamed(prop.position, &mut scene)))?;
    }
    let mut rig = CameraRig::new(&config.camera);

    let xr_camera = Rc::new(RefCell::new(Transform::from_position(Vec3::new(0.0, 2.0, -10.0))));
    let _locomotion = ControllerLocomotion::new(config.controller).bind(&thumbsticks, xr_camera.clone());

    let renderer = DebugTextRenderer::new();
    tracing::info!(ticks, frame_ms = frame.delta().as_millis() as u64, "simulation started");

    for tick in 0..ticks {
        for k in input.keys.iter().filter(|k| k.tick == tick) {
            keyboard.emit(&k.event);
        }
        for a in input.axes.iter().filter(|a| a.tick == tick) {
            thumbsticks.emit(&a.event);
        }

        let failed: usize = world.step(frame).iter().map(|r| r.failed).sum();
        if failed > 0 {
            tracing::warn!(tick, failed, "entity updates failed this tick");
        }
        rig.follow(&world);

        if print_every > 0 && (tick + 1) % print_every == 0 {
            print!("{}", renderer.render(&world, &RenderView::from_rig(&rig)));
        }
    }

    print!("{}", renderer.render(&world, &RenderView::from_rig(&rig)));
    let xr = *xr_camera.borrow();
    println!(
        "XR camera: pos=({:.2}, {:.2}, {:.2}) yaw={:.1} deg",
        xr.position.x,
        xr.position.y,
        xr.position.z,
        xr.yaw().to_degrees()
    );
    tracing::info!(
        player = %world.player().position(),
        camera = %rig.tracked_position(),
        "simulation finished"
    );
    Ok(())
}
