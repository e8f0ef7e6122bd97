use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use eduverse_kernel::{
    AgeGroup, Complexity, ObjectDescriptor, WorldBuilder, WorldDescriptor, card, catalog,
    classify, matched_keyword, scene_template,
};
use eduverse_scene::{DebugTextRenderer, Renderer, SceneViewer, ViewerConfig};
use eduverse_session::{Action, Session, SessionConfig};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eduverse-cli", about = "Classify topics, build learning worlds, dump scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Show which template a topic maps to
    Classify { topic: String },
    /// Build a world for a free-text topic
    Generate {
        topic: String,
        #[arg(long, default_value = "middle-school")]
        age_group: AgeGroup,
        #[arg(long, default_value = "intermediate")]
        complexity: Complexity,
        /// Print the descriptor as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the prebuilt worlds
    Catalog,
    /// Build the world for a prebuilt card
    Select {
        id: u32,
        #[arg(long)]
        json: bool,
    },
    /// Dump the scene graph a world produces
    Scene {
        /// Free-text topic (required unless --card is given)
        topic: Option<String>,
        /// Use a prebuilt card instead of a topic
        #[arg(long, conflicts_with = "topic")]
        card: Option<u32>,
        /// JSON file with an array of objects to use instead of the template
        #[arg(long, requires = "topic")]
        objects: Option<PathBuf>,
        #[arg(long, default_value = "middle-school")]
        age_group: AgeGroup,
        #[arg(long, default_value = "intermediate")]
        complexity: Complexity,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| if cli.verbose { "debug" } else { "info" }.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("eduverse-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", eduverse_kernel::crate_info());
            println!("scene: {}", eduverse_scene::crate_info());
            println!("session: {}", eduverse_session::crate_info());
            println!("prebuilt worlds: {}", catalog().len());
        }
        Commands::Classify { topic } => {
            let category = classify(&topic);
            match matched_keyword(&topic) {
                Some((_, keyword)) => {
                    println!("{} ({}) via keyword {keyword:?}", category.label(), category.slug())
                }
                None => println!("{} ({}) - no keyword matched", category.label(), category.slug()),
            }
            for object in scene_template(category, &topic) {
                println!("  {:<8} {}", object.kind, object.name);
            }
        }
        Commands::Generate {
            topic,
            age_group,
            complexity,
            json,
        } => {
            let world = WorldBuilder::new().build(&topic, age_group, complexity)?;
            emit(&world, json)?;
        }
        Commands::Catalog => {
            for c in catalog() {
                println!("[{}] {} ({})", c.id, c.title, c.difficulty);
                println!("    {}", c.description);
            }
        }
        Commands::Select { id, json } => {
            let c = card(id).with_context(|| format!("no prebuilt world with id {id}"))?;
            let world = WorldBuilder::new().from_card(c)?;
            emit(&world, json)?;
        }
        Commands::Scene {
            topic,
            card,
            objects,
            age_group,
            complexity,
        } => {
            let mut renderer = DebugTextRenderer::new();
            if let Some(path) = objects {
                let topic = topic.unwrap_or_default();
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let objects: Vec<ObjectDescriptor> = serde_json::from_str(&text)
                    .with_context(|| format!("parsing objects in {}", path.display()))?;
                let world = WorldBuilder::new().build_custom(&topic, age_group, complexity, objects)?;
                let mut viewer = SceneViewer::new(ViewerConfig::default());
                viewer.show_world(world);
                print!("{}", renderer.render(viewer.graph(), viewer.camera()));
                return Ok(());
            }

            let action = match (card, topic) {
                (Some(id), _) => Action::SelectPrebuilt(id),
                (None, Some(topic)) => Action::generate(topic, age_group, complexity),
                (None, None) => bail!("give a topic or --card <id>"),
            };
            let mut session = Session::new(SessionConfig {
                generation_delay: Duration::ZERO,
                ..SessionConfig::default()
            });
            let now = Instant::now();
            tracing::debug!(?action, "driving session");
            session.apply(action, now)?;
            session.tick(now, 0.0);
            let viewer = session.viewer();
            print!("{}", renderer.render(viewer.graph(), viewer.camera()));
        }
    }

    Ok(())
}

fn emit(world: &WorldDescriptor, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(world)?);
        return Ok(());
    }
    println!("{} [{}]", world.title(), world.id());
    println!("{}", world.description());
    println!(
        "Audience: {} | Complexity: {}",
        world.age_group().label(),
        world.complexity().label()
    );
    println!();
    println!("{}", world.narration());
    println!();
    println!("Objects:");
    for object in world.objects() {
        let p = object.position;
        println!(
            "  {:<8} {:<22} ({:.1}, {:.1}, {:.1}) {}",
            object.kind, object.name, p.x, p.y, p.z, object.color
        );
    }
    println!("Learning objectives:");
    for objective in world.learning_objectives() {
        println!("  - {objective}");
    }
    Ok(())
}
